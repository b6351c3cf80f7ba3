//! End-to-end flow tests for cinefind
//!
//! Drives the App the way the event loop does: key presses produce fetch
//! requests, the Fetcher runs them against a mock TMDB server, and the
//! outcomes are fed back into the App. Also covers the CLI search command.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use mockito::{Matcher, Server, ServerGuard};

use cinefind::api::TmdbClient;
use cinefind::app::{App, InputMode};
use cinefind::cli::{ExitCode, Output, SearchCmd};
use cinefind::commands;
use cinefind::effects::{self, Fetcher, OutcomeReceiver};
use cinefind::query::{Completion, FetchRequest, FetchStatus};

// =============================================================================
// Mock Response Fixtures
// =============================================================================

fn page_body(page: u32, total_pages: u32, ids: &[u64]) -> String {
    let results: Vec<String> = ids
        .iter()
        .map(|id| {
            format!(
                r#"{{"id":{id},"title":"Movie {id}","overview":"About {id}","release_date":"2001-05-0{d}","vote_average":6.5,"poster_path":"/{id}.jpg","backdrop_path":null}}"#,
                id = id,
                d = (id % 9) + 1
            )
        })
        .collect();
    format!(
        r#"{{"page":{},"results":[{}],"total_pages":{},"total_results":{}}}"#,
        page,
        results.join(","),
        total_pages,
        total_pages * 20
    )
}

async fn mock_page(server: &mut ServerGuard, query: &str, page: u32, body: String) -> mockito::Mock {
    server
        .mock("GET", "/search/movie")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), query.into()),
            Matcher::UrlEncoded("page".into(), page.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_and_submit(app: &mut App, text: &str) -> Option<FetchRequest> {
    app.handle_key(key(KeyCode::Char('/')));
    for c in text.chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Enter))
}

/// Wait for the next outcome and commit it
async fn pump(app: &mut App, rx: &mut OutcomeReceiver) -> Completion {
    let outcome = rx.recv().await.expect("fetch task dropped its sender");
    app.on_outcome(outcome, Instant::now())
}

fn quiet_output() -> Output {
    Output {
        json: true,
        quiet: true,
    }
}

// =============================================================================
// TUI Flow
// =============================================================================

#[tokio::test]
async fn test_search_select_close_flow() {
    let mut server = Server::new_async().await;
    let mock = mock_page(&mut server, "batman", 1, page_body(1, 5, &[1, 2, 3])).await;

    let (fetcher, mut rx) = Fetcher::new(TmdbClient::with_base_url("t", server.url()));
    let mut app = App::new();

    let req = type_and_submit(&mut app, "batman").unwrap();
    assert_eq!(app.input_mode, InputMode::Normal);
    fetcher.spawn(req);

    assert_eq!(pump(&mut app, &mut rx).await, Completion::Committed(None));
    mock.assert_async().await;

    assert_eq!(app.orchestrator.state().status, FetchStatus::Success);
    assert_eq!(app.orchestrator.displayed().len(), 3);
    assert_eq!(app.cursor.len, 3);

    app.handle_key(key(KeyCode::Right));
    app.handle_key(key(KeyCode::Enter));
    assert_eq!(app.orchestrator.selected().map(|m| m.id), Some(2));

    app.handle_key(key(KeyCode::Char('x')));
    assert!(app.orchestrator.selected().is_none());
    assert!(!app.overlay.is_open());
}

#[tokio::test]
async fn test_page_change_keeps_previous_page_until_resolved() {
    let mut server = Server::new_async().await;
    let _p1 = mock_page(&mut server, "batman", 1, page_body(1, 5, &[1, 2, 3])).await;
    let _p2 = mock_page(&mut server, "batman", 2, page_body(2, 5, &[21, 22])).await;

    let (fetcher, mut rx) = Fetcher::new(TmdbClient::with_base_url("t", server.url()));
    let mut app = App::new();

    fetcher.spawn(type_and_submit(&mut app, "batman").unwrap());
    pump(&mut app, &mut rx).await;

    let req = app.handle_key(key(KeyCode::Char(']'))).unwrap();
    assert_eq!(req.page, 2);
    fetcher.spawn(req);

    // Still showing page 1 while page 2 is in flight
    let view = app.orchestrator.view();
    assert!(view.loading);
    assert_eq!(view.movies.map(|m| m[0].id), Some(1));

    pump(&mut app, &mut rx).await;
    let ids: Vec<u64> = app.orchestrator.displayed().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![21, 22]);
    assert_eq!(app.orchestrator.view().pagination.map(|p| p.current), Some(2));
}

#[tokio::test]
async fn test_overlapping_fetches_commit_only_latest() {
    let mut server = Server::new_async().await;
    let _p1 = mock_page(&mut server, "batman", 1, page_body(1, 5, &[1, 2, 3])).await;
    let _p3 = mock_page(&mut server, "batman", 3, page_body(3, 5, &[31, 32, 33])).await;
    let _p2 = mock_page(&mut server, "batman", 2, page_body(2, 5, &[21, 22, 23])).await;

    let (fetcher, mut rx) = Fetcher::new(TmdbClient::with_base_url("t", server.url()));
    let mut app = App::new();

    fetcher.spawn(type_and_submit(&mut app, "batman").unwrap());
    pump(&mut app, &mut rx).await;
    fetcher.spawn(app.orchestrator.change_page(3).unwrap());
    pump(&mut app, &mut rx).await;

    // A: page 1, B: page 2, both in flight together
    let a = app.orchestrator.change_page(1).unwrap();
    let b = app.orchestrator.change_page(2).unwrap();
    fetcher.spawn(a);
    fetcher.spawn(b);

    // Whatever order they land in, only B is committed
    let first = pump(&mut app, &mut rx).await;
    let second = pump(&mut app, &mut rx).await;
    let committed = [&first, &second]
        .iter()
        .filter(|c| matches!(c, Completion::Committed(_)))
        .count();
    assert_eq!(committed, 1);

    let ids: Vec<u64> = app.orchestrator.displayed().iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![21, 22, 23]);
}

#[tokio::test]
async fn test_no_results_notifies_once() {
    let mut server = Server::new_async().await;
    let _empty = mock_page(&mut server, "zzzxnonexistent", 1, page_body(1, 0, &[])).await;

    let (fetcher, mut rx) = Fetcher::new(TmdbClient::with_base_url("t", server.url()));
    let mut app = App::new();

    fetcher.spawn(type_and_submit(&mut app, "zzzxnonexistent").unwrap());
    pump(&mut app, &mut rx).await;

    assert_eq!(app.orchestrator.state().status, FetchStatus::Success);
    assert_eq!(app.toasts.len(), 1);
    assert_eq!(
        app.toasts.iter().next().map(|t| t.message.as_str()),
        Some("No movies found for your request.")
    );
    assert!(app.orchestrator.view().movies.is_none());
}

#[tokio::test]
async fn test_unauthorized_then_user_retry() {
    let mut server = Server::new_async().await;
    let rejected = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::UrlEncoded("query".into(), "batman".into()))
        .with_status(401)
        .with_body(r#"{"status_code":7,"status_message":"Invalid API key","success":false}"#)
        .expect(2)
        .create_async()
        .await;

    let (fetcher, mut rx) = Fetcher::new(TmdbClient::with_base_url("bad", server.url()));
    let mut app = App::new();

    fetcher.spawn(type_and_submit(&mut app, "batman").unwrap());
    pump(&mut app, &mut rx).await;
    assert_eq!(
        app.orchestrator.state().status,
        FetchStatus::Error("Invalid API key".into())
    );
    assert_eq!(app.toasts.len(), 1);

    // Resubmitting the same query after a failure retries
    let retry = app.handle_key(key(KeyCode::Char('/')));
    assert!(retry.is_none());
    let retry = app.handle_key(key(KeyCode::Enter)).unwrap();
    fetcher.spawn(retry);
    pump(&mut app, &mut rx).await;

    rejected.assert_async().await;
    assert_eq!(app.toasts.len(), 2);
}

#[tokio::test]
async fn test_run_tags_outcome_with_sequence() {
    let client = TmdbClient::with_base_url("t", "http://127.0.0.1:1");
    let outcome = effects::run(
        &client,
        FetchRequest {
            seq: 42,
            query: "batman".into(),
            page: 1,
        },
    )
    .await;
    assert_eq!(outcome.seq, 42);
    assert!(outcome.result.unwrap_err().is_network());
}

// =============================================================================
// CLI Flow
// =============================================================================

#[tokio::test]
async fn test_cli_search_success() {
    let mut server = Server::new_async().await;
    let mock = mock_page(&mut server, "dune", 2, page_body(2, 3, &[5, 6])).await;
    let client = TmdbClient::with_base_url("t", server.url());

    let cmd = SearchCmd {
        query: "dune".into(),
        page: 2,
    };
    let code = commands::search_cmd(cmd, &client, &quiet_output()).await;

    mock.assert_async().await;
    assert_eq!(code, ExitCode::Success);
}

#[tokio::test]
async fn test_cli_search_no_results() {
    let mut server = Server::new_async().await;
    let _empty = mock_page(&mut server, "zzzxnonexistent", 1, page_body(1, 0, &[])).await;
    let client = TmdbClient::with_base_url("t", server.url());

    let cmd = SearchCmd {
        query: "zzzxnonexistent".into(),
        page: 1,
    };
    assert_eq!(
        commands::search_cmd(cmd, &client, &quiet_output()).await,
        ExitCode::NoResults
    );
}

#[tokio::test]
async fn test_cli_search_api_error() {
    let mut server = Server::new_async().await;
    let _rejected = server
        .mock("GET", "/search/movie")
        .match_query(Matcher::Any)
        .with_status(401)
        .create_async()
        .await;
    let client = TmdbClient::with_base_url("bad", server.url());

    let cmd = SearchCmd {
        query: "batman".into(),
        page: 1,
    };
    assert_eq!(
        commands::search_cmd(cmd, &client, &quiet_output()).await,
        ExitCode::ApiError
    );
}

#[tokio::test]
async fn test_cli_search_network_error() {
    let client = TmdbClient::with_base_url("t", "http://127.0.0.1:1");
    let cmd = SearchCmd {
        query: "batman".into(),
        page: 1,
    };
    assert_eq!(
        commands::search_cmd(cmd, &client, &quiet_output()).await,
        ExitCode::NetworkError
    );
}
