//! Resource clients for the Conduit REST collections.
//!
//! Each group builds one backend call per method and delegates credential
//! injection, serialization, and error normalization to [`Transport`].
//! Methods return the unwrapped inner resource, never the envelope.

use std::sync::Arc;

use serde::Serialize;

use crate::net::error::ApiError;
use crate::net::query::Query;
use crate::net::transport::Transport;
use crate::net::types::{
    Article, ArticleEnvelope, ArticleList, ArticleUpdate, Comment, CommentEnvelope,
    CommentListEnvelope, NewArticle, Profile, ProfileEnvelope, TagsEnvelope, User, UserEnvelope,
    UserUpdate, split_update,
};

/// Articles listed under a profile are paged five at a time.
const PROFILE_PAGE_LIMIT: u64 = 5;

// =============================================================================
// REQUEST WRAPPERS
// =============================================================================

#[derive(Serialize)]
struct UserBody<T: Serialize> {
    user: T,
}

#[derive(Serialize)]
struct ArticleBody<T: Serialize> {
    article: T,
}

#[derive(Serialize)]
struct CommentBody<T: Serialize> {
    comment: T,
}

#[derive(Serialize)]
struct LoginUser<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterUser<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct CommentFields<'a> {
    body: &'a str,
}

// =============================================================================
// AUTH
// =============================================================================

/// Account endpoints: current user, login, register, settings.
#[derive(Clone)]
pub struct Auth {
    transport: Arc<Transport>,
}

impl Auth {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Fetch the authenticated user.
    pub async fn current(&self) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.transport.get("/user", Query::new()).await?;
        Ok(envelope.user)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let body = UserBody { user: LoginUser { email, password } };
        let envelope: UserEnvelope = self.transport.post("/users/login", &body).await?;
        Ok(envelope.user)
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, ApiError> {
        let body = UserBody { user: RegisterUser { username, email, password } };
        let envelope: UserEnvelope = self.transport.post("/users", &body).await?;
        Ok(envelope.user)
    }

    /// Update the authenticated user's settings.
    pub async fn save(&self, user: &UserUpdate) -> Result<User, ApiError> {
        let envelope: UserEnvelope = self.transport.put("/user", &UserBody { user }).await?;
        Ok(envelope.user)
    }
}

// =============================================================================
// TAGS
// =============================================================================

#[derive(Clone)]
pub struct Tags {
    transport: Arc<Transport>,
}

impl Tags {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Fetch every known tag.
    pub async fn all(&self) -> Result<Vec<String>, ApiError> {
        let envelope: TagsEnvelope = self.transport.get("/tags", Query::new()).await?;
        Ok(envelope.tags)
    }
}

// =============================================================================
// ARTICLES
// =============================================================================

/// Article endpoints: listings, feed, CRUD, favorites.
#[derive(Clone)]
pub struct Articles {
    transport: Arc<Transport>,
}

impl Articles {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List articles with caller-supplied filters.
    ///
    /// Filters like `tag` and `author` may be repeated via
    /// [`Query::repeated`]; a `page` entry is translated to
    /// `limit`/`offset` before transmission.
    pub async fn all(&self, query: Query) -> Result<ArticleList, ApiError> {
        self.transport.get("/articles", query).await
    }

    pub async fn by_author(&self, author: &str, page: Option<u64>) -> Result<ArticleList, ApiError> {
        let query = Query::new()
            .param("author", author)
            .limit(PROFILE_PAGE_LIMIT)
            .maybe_page(page);
        self.transport.get("/articles", query).await
    }

    pub async fn by_tag(&self, tag: &str, page: Option<u64>) -> Result<ArticleList, ApiError> {
        let query = Query::new().param("tag", tag).maybe_page(page);
        self.transport.get("/articles", query).await
    }

    pub async fn favorited_by(&self, username: &str, page: Option<u64>) -> Result<ArticleList, ApiError> {
        let query = Query::new()
            .param("favorited", username)
            .limit(PROFILE_PAGE_LIMIT)
            .maybe_page(page);
        self.transport.get("/articles", query).await
    }

    /// Articles by followed authors.
    pub async fn feed(&self, page: Option<u64>) -> Result<ArticleList, ApiError> {
        self.transport.get("/articles/feed", Query::new().maybe_page(page)).await
    }

    pub async fn get(&self, slug: &str) -> Result<Article, ApiError> {
        let envelope: ArticleEnvelope = self.transport.get(&format!("/articles/{slug}"), Query::new()).await?;
        Ok(envelope.article)
    }

    pub async fn create(&self, article: &NewArticle) -> Result<Article, ApiError> {
        let envelope: ArticleEnvelope = self.transport.post("/articles", &ArticleBody { article }).await?;
        Ok(envelope.article)
    }

    /// Update an existing article; the slug routes the request and the
    /// remainder of the payload forms the body.
    pub async fn update(&self, update: ArticleUpdate) -> Result<Article, ApiError> {
        let (slug, patch) = split_update(update);
        let envelope: ArticleEnvelope = self
            .transport
            .put(&format!("/articles/{slug}"), &ArticleBody { article: patch })
            .await?;
        Ok(envelope.article)
    }

    pub async fn delete(&self, slug: &str) -> Result<(), ApiError> {
        self.transport.delete_no_content(&format!("/articles/{slug}")).await
    }

    pub async fn favorite(&self, slug: &str) -> Result<Article, ApiError> {
        let envelope: ArticleEnvelope = self.transport.post_empty(&format!("/articles/{slug}/favorite")).await?;
        Ok(envelope.article)
    }

    /// Remove a favorite; returns the article with its updated count.
    pub async fn unfavorite(&self, slug: &str) -> Result<Article, ApiError> {
        let envelope: ArticleEnvelope = self.transport.delete(&format!("/articles/{slug}/favorite")).await?;
        Ok(envelope.article)
    }
}

// =============================================================================
// COMMENTS
// =============================================================================

#[derive(Clone)]
pub struct Comments {
    transport: Arc<Transport>,
}

impl Comments {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn create(&self, slug: &str, body: &str) -> Result<Comment, ApiError> {
        let payload = CommentBody { comment: CommentFields { body } };
        let envelope: CommentEnvelope = self
            .transport
            .post(&format!("/articles/{slug}/comments"), &payload)
            .await?;
        Ok(envelope.comment)
    }

    pub async fn delete(&self, slug: &str, id: u64) -> Result<(), ApiError> {
        self.transport
            .delete_no_content(&format!("/articles/{slug}/comments/{id}"))
            .await
    }

    pub async fn for_article(&self, slug: &str) -> Result<Vec<Comment>, ApiError> {
        let envelope: CommentListEnvelope = self
            .transport
            .get(&format!("/articles/{slug}/comments"), Query::new())
            .await?;
        Ok(envelope.comments)
    }
}

// =============================================================================
// PROFILES
// =============================================================================

#[derive(Clone)]
pub struct Profiles {
    transport: Arc<Transport>,
}

impl Profiles {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn get(&self, username: &str) -> Result<Profile, ApiError> {
        let envelope: ProfileEnvelope = self.transport.get(&format!("/profiles/{username}"), Query::new()).await?;
        Ok(envelope.profile)
    }

    pub async fn follow(&self, username: &str) -> Result<Profile, ApiError> {
        let envelope: ProfileEnvelope = self.transport.post_empty(&format!("/profiles/{username}/follow")).await?;
        Ok(envelope.profile)
    }

    /// Unfollow; returns the profile with its updated relationship.
    pub async fn unfollow(&self, username: &str) -> Result<Profile, ApiError> {
        let envelope: ProfileEnvelope = self.transport.delete(&format!("/profiles/{username}/follow")).await?;
        Ok(envelope.profile)
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
