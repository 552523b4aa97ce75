//! services/client/src/cli/reviews.rs
//!
//! Review list, detail, editing and profile commands.

use super::render;
use super::state::AppState;
use super::{DraftArgs, EditArgs, Outcome};
use crate::error::ClientError;
use book_review_core::{
    DetailStatus, ListStatus, ListSync, Pagination, ProfileEditor, ReviewDetail, ReviewDraft,
    ReviewEditor,
};
use std::io::Write;
use tracing::warn;

pub async fn list<W: Write>(state: &AppState, page: u32, out: &mut W) -> Result<Outcome, ClientError> {
    let pagination = Pagination::at_page(page);

    let mut sync = ListSync::new(state.gateway.clone());
    let view = sync.refresh(&pagination.state()).await;
    render::list(out, &view)?;

    Ok(match view.status {
        ListStatus::Failed(_) => Outcome::Failed,
        _ => Outcome::Success,
    })
}

pub async fn show<W: Write>(state: &AppState, id: &str, out: &mut W) -> Result<Outcome, ClientError> {
    let view_log = ListSync::new(state.gateway.clone()).view_log();
    let logged = view_log.record_selected(id);

    let mut detail = ReviewDetail::new(state.gateway.clone());
    let status = detail.load(id).await;
    render::detail(out, status)?;
    let outcome = match status {
        DetailStatus::Ready(_) => Outcome::Success,
        _ => Outcome::Failed,
    };

    // Give the view log a chance to land before the process exits.
    if let Err(e) = logged.await {
        warn!("View log task did not finish: {}", e);
    }
    Ok(outcome)
}

pub async fn create<W: Write>(
    state: &AppState,
    args: DraftArgs,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    let draft = ReviewDraft {
        title: args.title,
        url: args.url,
        detail: args.detail,
        review: args.review,
    };
    match ReviewEditor::new(state.gateway.clone()).create(&draft).await {
        Ok(()) => {
            writeln!(out, "Review posted.")?;
            list(state, 1, out).await
        }
        Err(e) => {
            render::action_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

pub async fn edit<W: Write>(
    state: &AppState,
    id: &str,
    changes: EditArgs,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    let editor = ReviewEditor::new(state.gateway.clone());
    let mut draft = match editor.load(id).await {
        Ok(draft) => draft,
        Err(e) => {
            render::action_error(out, &e)?;
            return Ok(Outcome::Failed);
        }
    };

    if let Some(title) = changes.title {
        draft.title = title;
    }
    if let Some(url) = changes.url {
        draft.url = url;
    }
    if let Some(detail) = changes.detail {
        draft.detail = detail;
    }
    if let Some(review) = changes.review {
        draft.review = review;
    }

    match editor.update(id, &draft).await {
        Ok(()) => {
            writeln!(out, "Review updated.")?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            render::action_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

pub async fn delete<W: Write>(state: &AppState, id: &str, out: &mut W) -> Result<Outcome, ClientError> {
    match ReviewEditor::new(state.gateway.clone()).delete(id).await {
        Ok(()) => {
            writeln!(out, "Review deleted.")?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            render::action_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}

pub async fn profile<W: Write>(
    state: &AppState,
    name: Option<&str>,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    let editor = ProfileEditor::new(state.gateway.clone());
    let result = match name {
        Some(name) => editor
            .update(name)
            .await
            .map(|()| format!("Name changed to {}.", name.trim())),
        None => editor.load().await.map(|profile| format!("Name: {}", profile.name)),
    };

    match result {
        Ok(line) => {
            writeln!(out, "{line}")?;
            Ok(Outcome::Success)
        }
        Err(e) => {
            render::action_error(out, &e)?;
            Ok(Outcome::Failed)
        }
    }
}
