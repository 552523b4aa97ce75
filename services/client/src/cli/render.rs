//! services/client/src/cli/render.rs
//!
//! Plain-text rendering of the views.

use book_review_core::{ActionError, DetailStatus, ListStatus, ListViewState, ReviewRecord, Session};
use std::io::{self, Write};

pub fn header<W: Write>(out: &mut W, session: &Session) -> io::Result<()> {
    if session.is_authenticated() {
        let name = session.display_name.as_deref().unwrap_or("guest");
        writeln!(out, "Logged in as {name}. Run `book-reviews logout` to log out.")
    } else {
        writeln!(out, "Not logged in. Run `book-reviews login` to log in.")
    }
}

pub fn list<W: Write>(out: &mut W, view: &ListViewState) -> io::Result<()> {
    match &view.status {
        ListStatus::Loading => writeln!(out, "Loading page {}...", view.page()),
        ListStatus::Failed(message) => writeln!(out, "Page {}: {}", view.page(), message),
        ListStatus::Ready if view.records.is_empty() => {
            writeln!(out, "Page {}: no reviews on this page.", view.page())
        }
        ListStatus::Ready => {
            writeln!(out, "Page {}", view.page())?;
            for record in &view.records {
                summary(out, record)?;
            }
            Ok(())
        }
    }
}

fn summary<W: Write>(out: &mut W, record: &ReviewRecord) -> io::Result<()> {
    let mine = if record.is_mine == Some(true) { " (yours)" } else { "" };
    writeln!(out, "  [{}] {}{}", record.id, record.title, mine)?;
    writeln!(out, "      reviewer: {}", record.reviewer)?;
    writeln!(out, "      {}", record.url)
}

pub fn detail<W: Write>(out: &mut W, status: &DetailStatus) -> io::Result<()> {
    match status {
        DetailStatus::Loading => writeln!(out, "Loading..."),
        DetailStatus::Failed {
            message,
            login_required,
        } => {
            writeln!(out, "{message}")?;
            if *login_required {
                writeln!(out, "Run `book-reviews login` and try again.")?;
            }
            Ok(())
        }
        DetailStatus::Ready(record) => {
            writeln!(out, "{}", record.title)?;
            writeln!(out, "  url:      {}", record.url)?;
            writeln!(out, "  reviewer: {}", record.reviewer)?;
            writeln!(out, "  detail:   {}", record.detail)?;
            writeln!(out, "  review:   {}", record.review)
        }
    }
}

pub fn action_error<W: Write>(out: &mut W, error: &ActionError) -> io::Result<()> {
    writeln!(out, "{error}")?;
    if error.requires_login() {
        writeln!(out, "Run `book-reviews login` and try again.")?;
    }
    Ok(())
}
