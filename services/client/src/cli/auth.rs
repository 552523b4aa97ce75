//! services/client/src/cli/auth.rs
//!
//! Login, signup, logout and status commands.

use super::render;
use super::reviews;
use super::state::AppState;
use super::Outcome;
use crate::error::ClientError;
use book_review_core::{SessionController, SessionState};
use std::io::Write;
use tracing::info;

pub async fn login<W: Write>(
    state: &AppState,
    email: &str,
    password: &str,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    let mut session = SessionController::new(state.gateway.clone());
    if session.already_authenticated() {
        render::header(out, &state.credentials.session())?;
        return Ok(Outcome::Success);
    }

    let result = session.login(email, password).await.clone();
    finish(state, result, out).await
}

pub async fn signup<W: Write>(
    state: &AppState,
    name: &str,
    email: &str,
    password: &str,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    let mut session = SessionController::new(state.gateway.clone());
    let result = session.signup(name, email, password).await.clone();
    finish(state, result, out).await
}

/// After a successful login or signup the user lands on the first page of reviews.
async fn finish<W: Write>(
    state: &AppState,
    result: SessionState,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    match result {
        SessionState::Authenticated => {
            info!("Logged in; showing the review list");
            render::header(out, &state.credentials.session())?;
            reviews::list(state, 1, out).await
        }
        SessionState::Rejected(message) => {
            writeln!(out, "{message}")?;
            Ok(Outcome::Failed)
        }
        other => Err(ClientError::Internal(format!(
            "session ended in unexpected state {other:?}"
        ))),
    }
}

pub fn logout<W: Write>(state: &AppState, out: &mut W) -> Result<Outcome, ClientError> {
    SessionController::new(state.gateway.clone()).logout();
    writeln!(out, "Logged out.")?;
    Ok(Outcome::Success)
}

pub fn status<W: Write>(state: &AppState, out: &mut W) -> Result<Outcome, ClientError> {
    render::header(out, &state.credentials.session())?;
    Ok(Outcome::Success)
}
