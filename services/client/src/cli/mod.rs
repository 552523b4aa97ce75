pub mod auth;
pub mod browse;
pub mod render;
pub mod reviews;
pub mod state;

use crate::error::ClientError;
use book_review_core::MAX_PAGE;
use clap::{Args, Parser, Subcommand};
use state::AppState;
use std::io::Write;

/// Browse and manage book reviews from the terminal.
#[derive(Debug, Parser)]
#[command(name = "book-reviews", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session.
    Login {
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Create an account and store the session.
    Signup {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
    },
    /// Forget the stored session.
    Logout,
    /// Show who is logged in.
    Status,
    /// Print one page of reviews.
    List {
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PAGE)))]
        page: u32,
    },
    /// Page through reviews interactively.
    Browse,
    /// Show one review.
    Show { id: String },
    /// Post a new review.
    New(DraftArgs),
    /// Edit one of your reviews. Omitted fields keep their current value.
    Edit {
        id: String,
        #[command(flatten)]
        changes: EditArgs,
    },
    /// Delete one of your reviews.
    Delete { id: String },
    /// Show your profile, or rename yourself with --name.
    Profile {
        #[arg(long)]
        name: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct DraftArgs {
    #[arg(long, default_value = "")]
    pub title: String,
    #[arg(long, default_value = "")]
    pub url: String,
    #[arg(long, default_value = "")]
    pub detail: String,
    #[arg(long, default_value = "")]
    pub review: String,
}

#[derive(Debug, Args)]
pub struct EditArgs {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub detail: Option<String>,
    #[arg(long)]
    pub review: Option<String>,
}

/// Whether a command achieved what the user asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

/// Runs one command, writing its output to `out`.
pub async fn dispatch<W: Write>(
    state: &AppState,
    command: Command,
    out: &mut W,
) -> Result<Outcome, ClientError> {
    match command {
        Command::Login { email, password } => auth::login(state, &email, &password, out).await,
        Command::Signup {
            name,
            email,
            password,
        } => auth::signup(state, &name, &email, &password, out).await,
        Command::Logout => auth::logout(state, out),
        Command::Status => auth::status(state, out),
        Command::List { page } => reviews::list(state, page, out).await,
        Command::Browse => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            browse::browse(state, stdin, out).await
        }
        Command::Show { id } => reviews::show(state, &id, out).await,
        Command::New(draft) => reviews::create(state, draft, out).await,
        Command::Edit { id, changes } => reviews::edit(state, &id, changes, out).await,
        Command::Delete { id } => reviews::delete(state, &id, out).await,
        Command::Profile { name } => reviews::profile(state, name.as_deref(), out).await,
    }
}
