//! Wire types for the Conduit backend.
//!
//! Envelope structs mirror the backend's JSON shapes (`{"user": ...}`,
//! `{"articles": [...], "articlesCount": n}`); resource clients unwrap them
//! so callers only ever see the inner payload.

use serde::{Deserialize, Serialize};

// =============================================================================
// RESOURCES
// =============================================================================

/// Registered account, as returned by the auth endpoints.
///
/// Auth responses carry the session token inside the user object; it is
/// split off before the user reaches application state (see
/// [`split_token`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub bio: Option<String>,
    pub image: Option<String>,
}

/// Public profile of an account, with the viewer's follow relationship.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub username: String,
    pub bio: Option<String>,
    pub image: Option<String>,
    pub following: bool,
}

/// A published article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Article {
    pub slug: String,
    pub title: String,
    pub description: String,
    pub body: String,
    pub tag_list: Vec<String>,
    pub created_at: String,
    pub updated_at: String,
    pub favorited: bool,
    pub favorites_count: u64,
    pub author: Profile,
}

/// A comment on an article.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Comment {
    pub id: u64,
    pub created_at: String,
    pub updated_at: String,
    pub body: String,
    pub author: Profile,
}

/// One page of articles plus the unpaged total.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ArticleList {
    pub articles: Vec<Article>,
    pub articles_count: u64,
}

// =============================================================================
// REQUEST PAYLOADS
// =============================================================================

/// Settings accepted by `PUT /user`; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Payload for `POST /articles`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub description: String,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tag_list: Vec<String>,
}

/// Edit payload for an existing article.
///
/// `slug` identifies the article and routes the request; it is split out by
/// [`split_update`] and never appears in the serialized body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleUpdate {
    pub slug: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub body: Option<String>,
}

/// Body remainder of an [`ArticleUpdate`] once the slug is split off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

// =============================================================================
// PAYLOAD SHAPING
// =============================================================================

/// Extract the session token from an auth response, returning the remainder.
///
/// Application state tracks the token separately from the user it belongs
/// to; the returned user carries `token: None`.
#[must_use]
pub fn split_token(mut user: User) -> (Option<String>, User) {
    let token = user.token.take();
    (token, user)
}

/// Extract the routing slug from an edit payload, returning the remainder.
#[must_use]
pub fn split_update(update: ArticleUpdate) -> (String, ArticlePatch) {
    let ArticleUpdate { slug, title, description, body } = update;
    (slug, ArticlePatch { title, description, body })
}

// =============================================================================
// ENVELOPES
// =============================================================================

#[derive(Debug, Deserialize)]
pub(crate) struct UserEnvelope {
    pub user: User,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileEnvelope {
    pub profile: Profile,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ArticleEnvelope {
    pub article: Article,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentEnvelope {
    pub comment: Comment,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommentListEnvelope {
    pub comments: Vec<Comment>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagsEnvelope {
    pub tags: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_deserializes_camel_case_fields() {
        let json = r#"{
            "slug": "how-to-train-your-dragon",
            "title": "How to train your dragon",
            "description": "Ever wonder how?",
            "body": "It takes a Jacobian",
            "tagList": ["dragons", "training"],
            "createdAt": "2016-02-18T03:22:56.637Z",
            "updatedAt": "2016-02-18T03:48:35.824Z",
            "favorited": false,
            "favoritesCount": 3,
            "author": {"username": "jake", "bio": null, "image": null, "following": false}
        }"#;
        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.tag_list, vec!["dragons", "training"]);
        assert_eq!(article.favorites_count, 3);
        assert_eq!(article.author.username, "jake");
    }

    #[test]
    fn user_tolerates_missing_optional_fields() {
        let user: User = serde_json::from_str(r#"{"username": "anna", "email": "anna@example.test"}"#).unwrap();
        assert_eq!(user.username, "anna");
        assert!(user.token.is_none());
        assert!(user.bio.is_none());
    }

    #[test]
    fn split_token_strips_token_from_user() {
        let user: User =
            serde_json::from_str(r#"{"username": "anna", "email": "a@b.c", "token": "jwt.abc"}"#).unwrap();
        let (token, user) = split_token(user);
        assert_eq!(token.as_deref(), Some("jwt.abc"));
        assert!(user.token.is_none());
        assert_eq!(user.username, "anna");
    }

    #[test]
    fn split_update_keeps_slug_out_of_the_body() {
        let update = ArticleUpdate {
            slug: "my-slug".to_string(),
            title: Some("New title".to_string()),
            ..ArticleUpdate::default()
        };
        let (slug, patch) = split_update(update);
        assert_eq!(slug, "my-slug");

        let body = serde_json::to_value(&patch).unwrap();
        assert_eq!(body, serde_json::json!({"title": "New title"}));
    }

    #[test]
    fn user_update_skips_absent_fields() {
        let update = UserUpdate { bio: Some("hi".to_string()), ..UserUpdate::default() };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"bio": "hi"}));
    }
}
