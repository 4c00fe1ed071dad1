// In-memory GitHub used by the integration and unit tests.
#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use ghuser_search::error::ApiError;
use ghuser_search::github::{GitHubApi, RepositorySummary, UserResult};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    Search { query: String, max_results: u8 },
    Repos { login: String, page: u32, per_page: u8 },
}

#[derive(Default)]
pub struct FakeGitHub {
    searches: HashMap<String, Result<Vec<UserResult>, ApiError>>,
    // pages[i] answers page i + 1; later pages are empty
    pages: HashMap<String, Vec<Result<Vec<RepositorySummary>, ApiError>>>,
    // answers from the second fetch of a login onwards
    refetch_pages: HashMap<String, Vec<Result<Vec<RepositorySummary>, ApiError>>>,
    gate: Option<(String, Arc<Notify>)>,
    gate_used: AtomicBool,
    calls: Mutex<Vec<Call>>,
    answered: Mutex<Vec<Call>>,
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: &str, logins: &[&str]) -> Self {
        let users = logins.iter().enumerate().map(|(i, l)| user(i as u64 + 1, l)).collect();
        self.searches.insert(query.to_string(), Ok(users));
        self
    }

    pub fn search_error(mut self, query: &str, err: ApiError) -> Self {
        self.searches.insert(query.to_string(), Err(err));
        self
    }

    pub fn repos(mut self, login: &str, pages: Vec<Result<Vec<RepositorySummary>, ApiError>>) -> Self {
        self.pages.insert(login.to_string(), pages);
        self
    }

    pub fn repos_on_refetch(mut self, login: &str, pages: Vec<Result<Vec<RepositorySummary>, ApiError>>) -> Self {
        self.refetch_pages.insert(login.to_string(), pages);
        self
    }

    /// Hold the first repository request for `login` until `notify` fires.
    pub fn gate_first_fetch(mut self, login: &str, notify: Arc<Notify>) -> Self {
        self.gate = Some((login.to_string(), notify));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn answered(&self) -> Vec<Call> {
        self.answered.lock().unwrap().clone()
    }

    pub fn search_calls(&self) -> usize {
        self.calls().iter().filter(|c| matches!(c, Call::Search { .. })).count()
    }

    pub fn repo_pages_requested(&self, login: &str) -> Vec<u32> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Repos { login: l, page, .. } if l == login => Some(page),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn search_users(&self, query: &str, max_results: u8) -> Result<Vec<UserResult>, ApiError> {
        let call = Call::Search {
            query: query.to_string(),
            max_results,
        };
        self.calls.lock().unwrap().push(call.clone());
        let result = self.searches.get(query).cloned().unwrap_or_else(|| Ok(Vec::new()));
        self.answered.lock().unwrap().push(call);
        result
    }

    async fn list_repos(&self, login: &str, page: u32, per_page: u8) -> Result<Vec<RepositorySummary>, ApiError> {
        let call = Call::Repos {
            login: login.to_string(),
            page,
            per_page,
        };
        self.calls.lock().unwrap().push(call.clone());
        if let Some((gated, notify)) = &self.gate {
            if gated == login && !self.gate_used.swap(true, Ordering::SeqCst) {
                notify.notified().await;
            }
        }
        let fetches = self.repo_pages_requested(login).iter().filter(|&&p| p == 1).count();
        let source = match self.refetch_pages.get(login) {
            Some(later) if fetches > 1 => Some(later),
            _ => self.pages.get(login),
        };
        let result = source
            .and_then(|pages| pages.get(page as usize - 1).cloned())
            .unwrap_or_else(|| Ok(Vec::new()));
        self.answered.lock().unwrap().push(call);
        result
    }
}

pub fn user(id: u64, login: &str) -> UserResult {
    UserResult {
        id,
        login: login.to_string(),
        avatar_url: format!("https://avatars.githubusercontent.com/u/{id}?v=4"),
    }
}

/// `count` repositories with ids starting at `first_id`.
pub fn page_of(first_id: u64, count: usize) -> Vec<RepositorySummary> {
    (0..count as u64)
        .map(|i| RepositorySummary {
            id: first_id + i,
            name: format!("repo-{}", first_id + i),
        })
        .collect()
}
