//! Search state and its reducer.
//!
//! Every mutation goes through [`SearchState::apply`]. Events from network
//! tasks carry the generation of the search that spawned them; anything that
//! no longer matches the current result list is dropped here.
//!
use std::collections::HashMap;

use crate::github::{RepositorySummary, UserResult};

/// Cap on users requested from and held after a search.
pub const MAX_USER_RESULTS: u8 = 5;
/// Page size for repository listing; a full page means "ask for the next one".
pub const REPOS_PER_PAGE: u8 = 100;

/// Repository data for one login. A login absent from the map has not been requested.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RepoState {
    /// Pages received so far are held here and never exposed as the user's list.
    Loading {
        ticket: u64,
        received: Vec<RepositorySummary>,
        pages: u32,
    },
    Ready(Vec<RepositorySummary>),
    Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    QueryEdited,
    QueryRejected,
    SearchSubmitted,
    SearchSucceeded {
        generation: u64,
        users: Vec<UserResult>,
    },
    SearchFailed {
        generation: u64,
        reason: String,
    },
    RepoFetchStarted {
        generation: u64,
        ticket: u64,
        login: String,
    },
    RepoPageReceived {
        generation: u64,
        ticket: u64,
        login: String,
        page: u32,
        items: Vec<RepositorySummary>,
    },
    RepoFetchCompleted {
        generation: u64,
        ticket: u64,
        login: String,
    },
    RepoFetchFailed {
        generation: u64,
        ticket: u64,
        login: String,
        reason: String,
    },
    ExpansionToggled {
        position: usize,
    },
}

#[derive(Clone, Debug, Default)]
pub struct SearchState {
    generation: u64,
    results_generation: u64,
    searching: bool,
    validation_error: bool,
    users: Vec<UserResult>,
    repos: HashMap<String, RepoState>,
    expanded: Option<usize>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event. Returns `false` when the event was stale or otherwise ignored.
    pub fn apply(&mut self, event: Event) -> bool {
        match event {
            Event::QueryEdited => {
                self.validation_error = false;
                true
            }
            Event::QueryRejected => {
                self.validation_error = true;
                true
            }
            Event::SearchSubmitted => {
                self.generation += 1;
                self.searching = true;
                self.validation_error = false;
                self.expanded = None;
                true
            }
            Event::SearchSucceeded { generation, mut users } => {
                if generation != self.generation {
                    return false;
                }
                users.truncate(MAX_USER_RESULTS as usize);
                self.users = users;
                self.repos.clear();
                self.expanded = None;
                self.results_generation = generation;
                self.searching = false;
                true
            }
            Event::SearchFailed { generation, .. } => {
                if generation != self.generation {
                    return false;
                }
                self.searching = false;
                true
            }
            Event::RepoFetchStarted {
                generation,
                ticket,
                login,
            } => {
                if !self.is_current(generation, &login) {
                    return false;
                }
                self.repos.insert(
                    login,
                    RepoState::Loading {
                        ticket,
                        received: Vec::new(),
                        pages: 0,
                    },
                );
                true
            }
            Event::RepoPageReceived {
                generation,
                ticket,
                login,
                page,
                items,
            } => {
                if !self.is_current(generation, &login) {
                    return false;
                }
                match self.repos.get_mut(&login) {
                    Some(RepoState::Loading {
                        ticket: active,
                        received,
                        pages,
                    }) if *active == ticket && page == *pages + 1 => {
                        received.extend(items);
                        *pages = page;
                        true
                    }
                    _ => false,
                }
            }
            Event::RepoFetchCompleted {
                generation,
                ticket,
                login,
            } => {
                if !self.is_current(generation, &login) || !self.holds_ticket(&login, ticket) {
                    return false;
                }
                if let Some(RepoState::Loading { received, .. }) = self.repos.remove(&login) {
                    self.repos.insert(login, RepoState::Ready(received));
                }
                true
            }
            Event::RepoFetchFailed {
                generation,
                ticket,
                login,
                reason,
            } => {
                if !self.is_current(generation, &login) || !self.holds_ticket(&login, ticket) {
                    return false;
                }
                self.repos.insert(login, RepoState::Failed(reason));
                true
            }
            Event::ExpansionToggled { position } => {
                if position >= self.users.len() {
                    return false;
                }
                self.expanded = if self.expanded == Some(position) { None } else { Some(position) };
                true
            }
        }
    }

    fn is_current(&self, generation: u64, login: &str) -> bool {
        generation == self.results_generation && self.users.iter().any(|u| u.login == login)
    }

    fn holds_ticket(&self, login: &str, ticket: u64) -> bool {
        matches!(self.repos.get(login), Some(RepoState::Loading { ticket: active, .. }) if *active == ticket)
    }

    /// Generation of the most recently submitted search.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Generation whose results are currently displayed.
    pub fn results_generation(&self) -> u64 {
        self.results_generation
    }

    pub fn is_searching(&self) -> bool {
        self.searching
    }

    pub fn validation_error(&self) -> bool {
        self.validation_error
    }

    pub fn users(&self) -> &[UserResult] {
        &self.users
    }

    pub fn expanded(&self) -> Option<usize> {
        self.expanded
    }

    pub fn is_expanded(&self, position: usize) -> bool {
        self.expanded == Some(position)
    }

    pub fn repo_state(&self, login: &str) -> Option<&RepoState> {
        self.repos.get(login)
    }

    /// The stored repository list for `login`; `None` unless its fetch completed.
    pub fn repositories(&self, login: &str) -> Option<&[RepositorySummary]> {
        match self.repos.get(login) {
            Some(RepoState::Ready(list)) => Some(list),
            _ => None,
        }
    }

    pub fn is_loading_repos(&self, login: &str) -> bool {
        matches!(self.repos.get(login), Some(RepoState::Loading { .. }))
    }

    pub fn any_repos_loading(&self) -> bool {
        self.repos.values().any(|s| matches!(s, RepoState::Loading { .. }))
    }

    /// Logins that have any repository state, requested or finished.
    pub fn tracked_logins(&self) -> impl Iterator<Item = &str> {
        self.repos.keys().map(String::as_str)
    }
}
