//! services/client/src/cli/browse.rs
//!
//! The interactive review browser. Pagination commands are applied immediately;
//! the list controller runs in its own task and every view it publishes is printed.

use super::render;
use super::state::AppState;
use super::Outcome;
use crate::error::ClientError;
use book_review_core::{ListSync, Pagination, ReviewDetail};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::task::JoinHandle;
use tracing::{info, warn};

const HELP: &str = "Commands: n (next page), p (previous page), open <id>, h (help), q (quit)";

pub async fn browse<R, W>(state: &AppState, input: R, out: &mut W) -> Result<Outcome, ClientError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    render::header(out, &state.credentials.session())?;
    writeln!(out, "{HELP}")?;

    let pagination = Pagination::new();
    let sync = ListSync::new(state.gateway.clone());
    let view_log = sync.view_log();
    let mut view = sync.subscribe();
    let driver = tokio::spawn(sync.run(pagination.subscribe()));

    let mut lines = input.lines();
    let mut pending_logs: Vec<JoinHandle<()>> = Vec::new();

    loop {
        tokio::select! {
            changed = view.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = view.borrow_and_update().clone();
                render::list(out, &current)?;
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                let mut words = line.split_whitespace();
                match (words.next(), words.next()) {
                    (None, _) => {}
                    (Some("n" | "next"), None) => {
                        pagination.next();
                    }
                    (Some("p" | "prev"), None) => {
                        let before = pagination.state();
                        if pagination.prev() == before {
                            writeln!(out, "Already on the first page.")?;
                        }
                    }
                    (Some("open"), Some(id)) => {
                        info!(id, "Opening review");
                        pending_logs.retain(|handle| !handle.is_finished());
                        pending_logs.push(view_log.record_selected(id));
                        let mut detail = ReviewDetail::new(state.gateway.clone());
                        render::detail(out, detail.load(id).await)?;
                    }
                    (Some("h" | "help"), None) => writeln!(out, "{HELP}")?,
                    (Some("q" | "quit"), None) => break,
                    _ => writeln!(out, "Unknown command. {HELP}")?,
                }
            }
        }
    }

    drop(pagination);
    driver
        .await
        .map_err(|e| ClientError::Internal(format!("review list task failed: {e}")))?;
    for handle in pending_logs {
        if let Err(e) = handle.await {
            warn!("View log task did not finish: {}", e);
        }
    }
    Ok(Outcome::Success)
}
