use std::collections::HashMap;
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use super::state::{Event, MAX_USER_RESULTS, REPOS_PER_PAGE, SearchState};
use crate::error::{ApiError, ValidationError};
use crate::github::GitHubApi;

/// Owns the search state and drives the network work behind it.
///
/// Requests run as tasks on `runtime` and report back through a channel; state
/// only changes when the owner drains that channel with [`drain_events`] or
/// [`next_event`], so the UI thread stays the single writer.
///
/// [`drain_events`]: SearchController::drain_events
/// [`next_event`]: SearchController::next_event
pub struct SearchController {
    state: SearchState,
    api: Arc<dyn GitHubApi>,
    runtime: Handle,
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
    search_task: Option<JoinHandle<()>>,
    repo_tasks: HashMap<String, JoinHandle<()>>,
    next_ticket: u64,
    cancel_stale: bool,
}

impl SearchController {
    pub fn new(api: Arc<dyn GitHubApi>, runtime: Handle) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: SearchState::new(),
            api,
            runtime,
            tx,
            rx,
            search_task: None,
            repo_tasks: HashMap::new(),
            next_ticket: 0,
            cancel_stale: false,
        }
    }

    /// Abort in-flight requests of a previous search once a new one supersedes them.
    pub fn with_cancel_stale(mut self, cancel_stale: bool) -> Self {
        self.cancel_stale = cancel_stale;
        self
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    /// Notify that the query text changed; clears a pending validation message.
    pub fn query_edited(&mut self) {
        self.state.apply(Event::QueryEdited);
    }

    /// Start a user search. Returns the generation assigned to it.
    ///
    /// An empty (or whitespace-only) query is rejected without touching the
    /// network or the current results.
    pub fn submit_search(&mut self, query: &str) -> Result<u64, ValidationError> {
        let query = query.trim();
        if query.is_empty() {
            self.state.apply(Event::QueryRejected);
            debug!("rejected empty query");
            return Err(ValidationError::EmptyQuery);
        }

        self.state.apply(Event::SearchSubmitted);
        let generation = self.state.generation();
        info!(generation, query, "searching users");

        let api = Arc::clone(&self.api);
        let tx = self.tx.clone();
        let query = query.to_string();
        let handle = self.runtime.spawn(async move {
            let event = match api.search_users(&query, MAX_USER_RESULTS).await {
                Ok(users) => {
                    debug!(generation, count = users.len(), "search returned");
                    Event::SearchSucceeded { generation, users }
                }
                Err(err) => {
                    log_failure("search users", &query, &err);
                    Event::SearchFailed {
                        generation,
                        reason: err.to_string(),
                    }
                }
            };
            let _ = tx.send(event);
        });

        if let Some(previous) = self.search_task.replace(handle) {
            if self.cancel_stale {
                previous.abort();
            }
        }
        Ok(generation)
    }

    /// Fetch every repository page for `login`, replacing whatever was stored.
    ///
    /// Returns `false` if `login` is not part of the current results.
    pub fn fetch_repositories(&mut self, login: &str) -> bool {
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let generation = self.state.results_generation();
        if !self.state.apply(Event::RepoFetchStarted {
            generation,
            ticket,
            login: login.to_string(),
        }) {
            debug!(login, "not in current results, skipping repository fetch");
            return false;
        }

        let handle = self.runtime.spawn(fetch_all_pages(
            Arc::clone(&self.api),
            self.tx.clone(),
            login.to_string(),
            generation,
            ticket,
        ));
        if let Some(previous) = self.repo_tasks.insert(login.to_string(), handle) {
            previous.abort();
        }
        true
    }

    pub fn toggle_expansion(&mut self, position: usize) -> bool {
        self.state.apply(Event::ExpansionToggled { position })
    }

    /// Apply every event already waiting in the channel. Never blocks.
    pub fn drain_events(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.rx.try_recv() {
            self.handle(event);
            applied += 1;
        }
        applied
    }

    /// Wait for the next event from a network task and apply it.
    pub async fn next_event(&mut self) {
        if let Some(event) = self.rx.recv().await {
            self.handle(event);
        }
    }

    /// True when neither the search nor any repository fetch is in flight.
    pub fn is_settled(&self) -> bool {
        !self.state.is_searching() && !self.state.any_repos_loading()
    }

    /// Apply events until [`is_settled`](Self::is_settled) holds.
    pub async fn settle(&mut self) {
        while !self.is_settled() {
            self.next_event().await;
        }
    }

    /// Unfinished repository tasks started for the current results.
    pub fn outstanding_tasks(&self) -> usize {
        self.repo_tasks.values().filter(|h| !h.is_finished()).count()
    }

    /// Abort every in-flight request.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.search_task.take() {
            task.abort();
        }
        for (_, task) in self.repo_tasks.drain() {
            task.abort();
        }
    }

    fn handle(&mut self, event: Event) {
        let fan_out = matches!(event, Event::SearchSucceeded { .. });
        if !self.state.apply(event) {
            return;
        }
        if fan_out {
            self.retire_stale_tasks();
            let logins: Vec<String> = self.state.users().iter().map(|u| u.login.clone()).collect();
            for login in logins {
                self.fetch_repositories(&login);
            }
        }
    }

    fn retire_stale_tasks(&mut self) {
        for (login, task) in self.repo_tasks.drain() {
            if self.cancel_stale && !task.is_finished() {
                debug!(%login, "cancelling stale repository fetch");
                task.abort();
            }
        }
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

async fn fetch_all_pages(
    api: Arc<dyn GitHubApi>,
    tx: UnboundedSender<Event>,
    login: String,
    generation: u64,
    ticket: u64,
) {
    let mut page = 1u32;
    loop {
        match api.list_repos(&login, page, REPOS_PER_PAGE).await {
            Ok(items) => {
                let full = items.len() == REPOS_PER_PAGE as usize;
                debug!(%login, page, count = items.len(), "repository page");
                let _ = tx.send(Event::RepoPageReceived {
                    generation,
                    ticket,
                    login: login.clone(),
                    page,
                    items,
                });
                if !full {
                    break;
                }
                page += 1;
            }
            Err(err) => {
                log_failure("list repositories", &login, &err);
                let _ = tx.send(Event::RepoFetchFailed {
                    generation,
                    ticket,
                    login,
                    reason: err.to_string(),
                });
                return;
            }
        }
    }
    let _ = tx.send(Event::RepoFetchCompleted {
        generation,
        ticket,
        login,
    });
}

fn log_failure(operation: &str, subject: &str, err: &ApiError) {
    if err.is_transport() {
        error!(operation, subject, error = %err, "github request failed");
    } else {
        warn!(operation, subject, error = %err, "github request rejected");
    }
}
