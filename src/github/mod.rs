//! GitHub capability layer.
//!
//! The search controller only ever talks to [`GitHubApi`]; the reqwest-backed
//! [`HttpGitHub`] is the production implementation and tests provide their own.
//!
mod http;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;

pub use http::{DEFAULT_API_URL, HttpGitHub, HttpSettings};

/// One account returned by `GET /search/users`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct UserResult {
    pub id: u64,
    pub login: String,
    pub avatar_url: String,
}

/// One repository returned by `GET /users/{login}/repos`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RepositorySummary {
    pub id: u64,
    pub name: String,
}

/// Body of the search endpoint; only `items` is used.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub items: Vec<UserResult>,
}

/// The two GitHub endpoints the application consumes.
///
/// Implementations map any non-success HTTP status to [`ApiError::Status`].
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Search users matching `query`, returning at most `max_results` in relevance order.
    async fn search_users(&self, query: &str, max_results: u8) -> Result<Vec<UserResult>, ApiError>;

    /// Fetch one page (1-based) of public repositories owned by `login`.
    async fn list_repos(
        &self,
        login: &str,
        page: u32,
        per_page: u8,
    ) -> Result<Vec<RepositorySummary>, ApiError>;
}
