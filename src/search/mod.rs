//! User search and repository fan-out.
//!
//! [`SearchController`] issues the requests; [`state`] holds the reducer that
//! every result is funnelled through.
//!
mod controller;
pub mod state;

pub use controller::SearchController;
pub use state::{Event, MAX_USER_RESULTS, REPOS_PER_PAGE, RepoState, SearchState};
