//! Shared setup for the client integration tests.

use client_lib::cli::state::AppState;
use client_lib::config::Config;
use std::path::Path;
use std::sync::Arc;
use wiremock::MockServer;

/// Builds the real application state against a mock API server and a session
/// file inside `dir`.
pub fn app_state(server: &MockServer, dir: &Path) -> AppState {
    let session_file = dir.join("session.json");
    let config = Config::from_lookup(|key| match key {
        "API_BASE_URL" => Some(server.uri()),
        "SESSION_FILE" => Some(session_file.display().to_string()),
        _ => None,
    })
    .expect("test config");
    AppState::new(Arc::new(config)).expect("app state")
}

pub fn review_json(id: &str, title: &str, is_mine: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "url": format!("https://example.com/{id}"),
        "detail": "a novel",
        "review": "worth reading",
        "reviewer": "Taro",
        "isMine": is_mine,
    })
}

/// Runs a command and returns whether it succeeded along with everything it printed.
pub async fn run(state: &AppState, args: &[&str]) -> (client_lib::cli::Outcome, String) {
    use clap::Parser;

    let cli = client_lib::cli::Cli::try_parse_from(
        std::iter::once("book-reviews").chain(args.iter().copied()),
    )
    .expect("valid arguments");
    let mut out = Vec::new();
    let outcome = client_lib::cli::dispatch(state, cli.command, &mut out)
        .await
        .expect("command ran");
    (outcome, String::from_utf8(out).expect("utf-8 output"))
}
