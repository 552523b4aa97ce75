//! crates/book_review_core/src/reviews.rs
//!
//! Create, edit and delete the user's own reviews. Nothing is changed locally:
//! after a successful write the caller refetches the list.

use crate::domain::{ReviewDraft, ReviewRecord};
use crate::error::{ActionError, ActionResult};
use crate::gateway::{json_body, Gateway, GatewayError};
use crate::ports::HttpMethod;
use tracing::{info, warn};

pub const MISSING_REVIEW_FIELDS: &str = "title, url, detail and review are required";
pub const CREATE_FAILED: &str = "failed to post the book review";
pub const LOAD_FAILED: &str = "failed to load the book review";
pub const UPDATE_FAILED: &str = "failed to update the book review";
pub const DELETE_FAILED: &str = "failed to delete the book review";

pub struct ReviewEditor {
    gateway: Gateway,
}

impl ReviewEditor {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn create(&self, draft: &ReviewDraft) -> ActionResult<()> {
        validate(draft)?;
        let body = json_body(draft).map_err(|e| self.fail(e, CREATE_FAILED))?;
        self.gateway
            .call(HttpMethod::Post, "/books", Some(body))
            .await
            .map_err(|e| self.fail(e, CREATE_FAILED))?;
        info!(title = %draft.title, "Review posted");
        Ok(())
    }

    /// Fetches the current contents of a review to prefill the edit form.
    pub async fn load(&self, id: &str) -> ActionResult<ReviewDraft> {
        let record = self
            .gateway
            .call_json::<ReviewRecord>(HttpMethod::Get, &format!("/books/{id}"), None)
            .await
            .map_err(|e| self.fail(e, LOAD_FAILED))?;
        Ok(record.into())
    }

    pub async fn update(&self, id: &str, draft: &ReviewDraft) -> ActionResult<()> {
        validate(draft)?;
        let body = json_body(draft).map_err(|e| self.fail(e, UPDATE_FAILED))?;
        self.gateway
            .call(HttpMethod::Put, &format!("/books/{id}"), Some(body))
            .await
            .map_err(|e| self.fail(e, UPDATE_FAILED))?;
        info!(id, "Review updated");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> ActionResult<()> {
        self.gateway
            .call(HttpMethod::Delete, &format!("/books/{id}"), None)
            .await
            .map_err(|e| self.fail(e, DELETE_FAILED))?;
        info!(id, "Review deleted");
        Ok(())
    }

    fn fail(&self, error: GatewayError, fallback: &str) -> ActionError {
        warn!("{}: {}", fallback, error);
        let error = ActionError::from_gateway(error, fallback);
        if error.requires_login() {
            self.gateway.expire_session();
        }
        error
    }
}

fn validate(draft: &ReviewDraft) -> ActionResult<()> {
    let fields = [&draft.title, &draft.url, &draft.detail, &draft.review];
    if fields.iter().any(|f| f.trim().is_empty()) {
        return Err(ActionError::LocalValidation(MISSING_REVIEW_FIELDS.to_string()));
    }
    Ok(())
}
