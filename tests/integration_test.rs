// Integration tests for the search controller against an in-memory GitHub.

mod common;

use common::{Call, FakeGitHub, page_of};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::Notify;

use ghuser_search::error::{ApiError, ValidationError};
use ghuser_search::search::{MAX_USER_RESULTS, REPOS_PER_PAGE, RepoState, SearchController};

fn controller(api: &Arc<FakeGitHub>) -> SearchController {
    SearchController::new(api.clone(), Handle::current())
}

fn logins(c: &SearchController) -> Vec<String> {
    c.state().users().iter().map(|u| u.login.clone()).collect()
}

#[tokio::test]
async fn empty_query_is_rejected_without_a_request() {
    let api = Arc::new(FakeGitHub::new().search("octo", &["octocat"]));
    let mut c = controller(&api);

    c.submit_search("octo").unwrap();
    c.settle().await;
    assert_eq!(api.search_calls(), 1);

    for query in ["", "   "] {
        assert_eq!(c.submit_search(query), Err(ValidationError::EmptyQuery));
    }
    assert!(c.state().validation_error());
    assert!(!c.state().is_searching());
    assert_eq!(api.search_calls(), 1);
    assert_eq!(logins(&c), ["octocat"]);

    c.query_edited();
    assert!(!c.state().validation_error());
}

#[tokio::test]
async fn results_keep_server_order_and_request_the_cap() {
    let api = Arc::new(FakeGitHub::new().search("rust", &["zeta", "alpha", "mid"]));
    let mut c = controller(&api);

    c.submit_search("  rust ").unwrap();
    assert!(c.state().is_searching());
    c.settle().await;

    assert_eq!(logins(&c), ["zeta", "alpha", "mid"]);
    assert_eq!(
        api.calls()[0],
        Call::Search {
            query: "rust".into(),
            max_results: MAX_USER_RESULTS
        }
    );
    // every user got its repositories requested without any expansion
    for login in ["zeta", "alpha", "mid"] {
        assert_eq!(api.repo_pages_requested(login), [1]);
        assert_eq!(c.state().repositories(login), Some(&[][..]));
    }
    assert_eq!(c.state().expanded(), None);
}

#[tokio::test]
async fn short_first_page_stops_after_one_request() {
    let api = Arc::new(
        FakeGitHub::new()
            .search("q", &["a"])
            .repos("a", vec![Ok(page_of(1, 42))]),
    );
    let mut c = controller(&api);
    c.submit_search("q").unwrap();
    c.settle().await;

    assert_eq!(api.repo_pages_requested("a"), [1]);
    assert_eq!(c.state().repositories("a").unwrap().len(), 42);
    assert!(api.calls().contains(&Call::Repos {
        login: "a".into(),
        page: 1,
        per_page: REPOS_PER_PAGE
    }));
}

#[tokio::test]
async fn full_pages_keep_paginating_in_order() {
    let full = REPOS_PER_PAGE as usize;
    let api = Arc::new(
        FakeGitHub::new()
            .search("q", &["a", "b"])
            .repos("a", vec![Ok(page_of(1, full)), Ok(page_of(101, full)), Ok(page_of(201, 3))])
            .repos("b", vec![Ok(page_of(1, full))]),
    );
    let mut c = controller(&api);
    c.submit_search("q").unwrap();
    c.settle().await;

    assert_eq!(api.repo_pages_requested("a"), [1, 2, 3]);
    let ids: Vec<u64> = c.state().repositories("a").unwrap().iter().map(|r| r.id).collect();
    assert_eq!(ids, (1..=203).collect::<Vec<_>>());

    // a full page followed by an empty one
    assert_eq!(api.repo_pages_requested("b"), [1, 2]);
    assert_eq!(c.state().repositories("b").unwrap().len(), full);
}

#[tokio::test]
async fn failure_on_second_page_stores_nothing() {
    let full = REPOS_PER_PAGE as usize;
    let api = Arc::new(
        FakeGitHub::new()
            .search("q", &["a"])
            .repos("a", vec![Ok(page_of(1, full)), Err(ApiError::Status(502)), Ok(page_of(500, 1))]),
    );
    let mut c = controller(&api);
    c.submit_search("q").unwrap();
    c.settle().await;

    assert_eq!(api.repo_pages_requested("a"), [1, 2]);
    assert_eq!(c.state().repositories("a"), None);
    assert!(matches!(c.state().repo_state("a"), Some(RepoState::Failed(reason)) if reason.contains("502")));
    assert!(!c.state().is_loading_repos("a"));
}

#[tokio::test]
async fn one_failing_user_does_not_affect_the_others() {
    let api = Arc::new(
        FakeGitHub::new()
            .search("octo", &["A", "B", "C"])
            .repos("A", vec![Ok(page_of(1, 2))])
            .repos("B", vec![Err(ApiError::Transport("connection reset".into()))])
            .repos("C", vec![Ok(page_of(10, 1))]),
    );
    let mut c = controller(&api);
    c.submit_search("octo").unwrap();
    c.settle().await;

    assert_eq!(c.state().repositories("A").unwrap().len(), 2);
    assert_eq!(c.state().repositories("C").unwrap().len(), 1);
    assert_eq!(c.state().repositories("B"), None);
    for login in ["A", "B", "C"] {
        assert!(!c.state().is_loading_repos(login));
    }
    assert!(!c.state().is_searching());
}

#[tokio::test]
async fn failed_search_leaves_previous_results() {
    let api = Arc::new(
        FakeGitHub::new()
            .search("good", &["keep"])
            .repos("keep", vec![Ok(page_of(1, 1))])
            .search_error("bad", ApiError::Status(422)),
    );
    let mut c = controller(&api);
    c.submit_search("good").unwrap();
    c.settle().await;
    c.toggle_expansion(0);

    c.submit_search("bad").unwrap();
    assert_eq!(c.state().expanded(), None);
    c.settle().await;

    assert!(!c.state().is_searching());
    assert_eq!(logins(&c), ["keep"]);
    assert_eq!(c.state().repositories("keep").unwrap().len(), 1);
}

#[tokio::test]
async fn toggling_keeps_a_single_expanded_entry_without_requests() {
    let api = Arc::new(FakeGitHub::new().search("q", &["a", "b", "c"]));
    let mut c = controller(&api);
    c.submit_search("q").unwrap();
    c.settle().await;
    let requests = api.calls().len();

    assert!(c.toggle_expansion(1));
    assert!(c.state().is_expanded(1));
    assert!(c.toggle_expansion(2));
    assert!(!c.state().is_expanded(1));
    assert!(c.state().is_expanded(2));
    assert!(c.toggle_expansion(2));
    assert_eq!(c.state().expanded(), None);
    assert!(!c.toggle_expansion(7));

    assert_eq!(api.calls().len(), requests);
}

#[tokio::test]
async fn new_search_replaces_results_and_repositories() {
    let api = Arc::new(
        FakeGitHub::new()
            .search("one", &["a", "b"])
            .search("two", &["c"])
            .repos("a", vec![Ok(page_of(1, 1))])
            .repos("c", vec![Ok(page_of(5, 2))]),
    );
    let mut c = controller(&api);
    c.submit_search("one").unwrap();
    c.settle().await;
    c.submit_search("two").unwrap();
    c.settle().await;

    assert_eq!(logins(&c), ["c"]);
    assert!(c.state().repo_state("a").is_none());
    let tracked: Vec<&str> = c.state().tracked_logins().collect();
    assert_eq!(tracked, ["c"]);
}

#[tokio::test]
async fn fetch_for_unknown_login_is_refused() {
    let api = Arc::new(FakeGitHub::new().search("q", &["a"]));
    let mut c = controller(&api);
    c.submit_search("q").unwrap();
    c.settle().await;

    assert!(!c.fetch_repositories("stranger"));
    assert!(api.repo_pages_requested("stranger").is_empty());
    assert!(c.state().repo_state("stranger").is_none());
}

#[tokio::test]
async fn late_result_from_previous_search_is_ignored() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(
        FakeGitHub::new()
            .search("first", &["slow"])
            .search("second", &["other"])
            .repos("slow", vec![Ok(page_of(2, 1))])
            .gate_first_fetch("slow", gate.clone()),
    );
    let mut c = controller(&api);
    c.submit_search("first").unwrap();
    while c.state().users().is_empty() {
        c.next_event().await;
    }
    assert!(c.state().is_loading_repos("slow"));

    c.submit_search("second").unwrap();
    c.settle().await;
    assert_eq!(logins(&c), ["other"]);

    // release the first fetch; its page and completion arrive and are dropped
    gate.notify_one();
    c.next_event().await;
    c.next_event().await;
    assert_eq!(api.repo_pages_requested("slow"), [1]);
    assert!(c.state().repo_state("slow").is_none());
    assert!(c.is_settled());
}

#[tokio::test]
async fn cancel_stale_aborts_previous_fetches() {
    let gate = Arc::new(Notify::new());
    let api = Arc::new(
        FakeGitHub::new()
            .search("first", &["slow"])
            .search("second", &["other"])
            .gate_first_fetch("slow", gate.clone()),
    );
    let mut c = controller(&api).with_cancel_stale(true);
    c.submit_search("first").unwrap();
    while c.state().users().is_empty() {
        c.next_event().await;
    }
    c.submit_search("second").unwrap();
    c.settle().await;

    gate.notify_one();
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(c.drain_events(), 0);
    let answered_slow = api
        .answered()
        .into_iter()
        .filter(|call| matches!(call, Call::Repos { login, .. } if login == "slow"))
        .count();
    assert_eq!(answered_slow, 0);
    assert_eq!(c.outstanding_tasks(), 0);
}

#[tokio::test]
async fn refetch_replaces_stored_list() {
    let api = Arc::new(
        FakeGitHub::new()
            .search("q", &["a"])
            .repos("a", vec![Ok(page_of(1, 3))]),
    );
    let mut c = controller(&api);
    c.submit_search("q").unwrap();
    c.settle().await;

    assert!(c.fetch_repositories("a"));
    assert!(c.state().is_loading_repos("a"));
    c.settle().await;
    assert_eq!(c.state().repositories("a").unwrap().len(), 3);
    assert_eq!(api.repo_pages_requested("a"), [1, 1]);
}
