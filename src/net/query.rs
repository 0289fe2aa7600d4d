//! Query-string construction and pagination translation.
//!
//! DESIGN
//! ======
//! Parameters keep insertion order and may be scalar or repeated; repeated
//! values serialize with bracket notation (`tag[]=a&tag[]=b`), the array
//! convention the backend's filters expect. [`Query::paginate`] rewrites the
//! caller-facing 0-based `page` into the wire-level `limit`/`offset` pair;
//! `page` itself never reaches the wire.

/// Default page size when a paged query names no explicit limit.
pub(crate) const DEFAULT_PAGE_LIMIT: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Value {
    One(String),
    Many(Vec<String>),
}

/// Ordered query parameters for a backend call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: Vec<(String, Value)>,
}

impl Query {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scalar parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), Value::One(value.into())));
        self
    }

    /// Append a repeated parameter, serialized with bracket notation.
    #[must_use]
    pub fn repeated<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.params.push((key.into(), Value::Many(values)));
        self
    }

    /// Append a 0-based page number.
    #[must_use]
    pub fn page(self, page: u64) -> Self {
        self.param("page", page.to_string())
    }

    /// Append a page number when one is given.
    #[must_use]
    pub fn maybe_page(self, page: Option<u64>) -> Self {
        match page {
            Some(page) => self.page(page),
            None => self,
        }
    }

    /// Append a page size.
    #[must_use]
    pub fn limit(self, limit: u64) -> Self {
        self.param("limit", limit.to_string())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Translate `page` into `limit`/`offset`.
    ///
    /// When `page` is present and parses as a non-negative integer, the
    /// outgoing query carries `limit` (existing value, or 10) and
    /// `offset = page * limit`, and `page` is removed. Otherwise the query
    /// passes through unchanged.
    #[must_use]
    pub fn paginate(mut self) -> Self {
        let Some(page) = self.scalar("page").and_then(|v| v.parse::<u64>().ok()) else {
            return self;
        };
        let limit = self
            .scalar("limit")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_PAGE_LIMIT);

        self.remove("page");
        self.set("limit", limit.to_string());
        self.set("offset", (page * limit).to_string());
        self
    }

    /// Flatten into serializable pairs; repeated keys gain a `[]` suffix.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for (key, value) in &self.params {
            match value {
                Value::One(value) => pairs.push((key.clone(), value.clone())),
                Value::Many(values) => {
                    for value in values {
                        pairs.push((format!("{key}[]"), value.clone()));
                    }
                }
            }
        }
        pairs
    }

    fn scalar(&self, key: &str) -> Option<&str> {
        self.params.iter().find_map(|(k, v)| match v {
            Value::One(value) if k == key => Some(value.as_str()),
            _ => None,
        })
    }

    fn set(&mut self, key: &str, value: String) {
        match self.params.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = Value::One(value),
            None => self.params.push((key.to_string(), Value::One(value))),
        }
    }

    fn remove(&mut self, key: &str) {
        self.params.retain(|(k, _)| k != key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_params_serialize_plain() {
        let pairs = Query::new().param("author", "anna").param("limit", "5").to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("author".to_string(), "anna".to_string()),
                ("limit".to_string(), "5".to_string()),
            ]
        );
    }

    #[test]
    fn repeated_params_use_bracket_notation() {
        let pairs = Query::new().repeated("tag", ["rust", "async"]).to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("tag[]".to_string(), "rust".to_string()),
                ("tag[]".to_string(), "async".to_string()),
            ]
        );
    }

    #[test]
    fn paginate_defaults_limit_to_ten() {
        let pairs = Query::new().page(2).paginate().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "20".to_string()),
            ]
        );
    }

    #[test]
    fn paginate_respects_existing_limit() {
        let pairs = Query::new().param("author", "anna").limit(5).page(3).paginate().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("author".to_string(), "anna".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("offset".to_string(), "15".to_string()),
            ]
        );
    }

    #[test]
    fn paginate_page_zero_yields_offset_zero() {
        let pairs = Query::new().page(0).paginate().to_pairs();
        assert_eq!(
            pairs,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("offset".to_string(), "0".to_string()),
            ]
        );
    }

    #[test]
    fn paginate_without_page_passes_through() {
        let query = Query::new().param("tag", "rust").limit(20);
        assert_eq!(query.clone().paginate(), query);
    }

    #[test]
    fn paginate_with_non_integer_page_passes_through() {
        let query = Query::new().param("page", "latest");
        assert_eq!(query.clone().paginate(), query);
    }

    #[test]
    fn paginate_never_transmits_page() {
        let pairs = Query::new().page(4).paginate().to_pairs();
        assert!(pairs.iter().all(|(key, _)| key != "page"));
    }
}
