use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{Client, Response};
use tracing::debug;

use super::{GitHubApi, RepositorySummary, SearchResponse, UserResult};
use crate::error::{ApiError, Context, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Connection settings for [`HttpGitHub`].
#[derive(Clone, Debug)]
pub struct HttpSettings {
    pub api_url: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

/// GitHub REST client over a shared `reqwest::Client`.
#[derive(Clone, Debug)]
pub struct HttpGitHub {
    client: Client,
    api_url: String,
}

impl HttpGitHub {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(concat!("ghuser-search/", env!("CARGO_PKG_VERSION"))));
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static("2022-11-28"));

        if let Some(token) = settings.token.as_deref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {token}"))
                .with_ctx(|| "invalid GitHub token".to_string())?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(settings.timeout)
            .build()
            .with_ctx(|| "failed to build HTTP client".to_string())?;

        Ok(Self {
            client,
            api_url: settings.api_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, url: &str, query: &[(&str, String)]) -> std::result::Result<Response, ApiError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "github response");
        if !status.is_success() {
            return Err(ApiError::Status(status.as_u16()));
        }
        Ok(response)
    }
}

#[async_trait]
impl GitHubApi for HttpGitHub {
    async fn search_users(&self, query: &str, max_results: u8) -> std::result::Result<Vec<UserResult>, ApiError> {
        let url = format!("{}/search/users", self.api_url);
        let params = [("q", query.to_string()), ("per_page", max_results.to_string())];
        let body: SearchResponse = self.get(&url, &params).await?.json().await?;
        Ok(body.items)
    }

    async fn list_repos(
        &self,
        login: &str,
        page: u32,
        per_page: u8,
    ) -> std::result::Result<Vec<RepositorySummary>, ApiError> {
        let url = format!("{}/users/{}/repos", self.api_url, login);
        let params = [("page", page.to_string()), ("per_page", per_page.to_string())];
        let repos: Vec<RepositorySummary> = self.get(&url, &params).await?.json().await?;
        Ok(repos)
    }
}
