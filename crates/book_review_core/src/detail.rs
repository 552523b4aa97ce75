//! crates/book_review_core/src/detail.rs
//!
//! The review detail view. Each load starts from `Loading`, so a failure can never
//! show a record fetched earlier.

use crate::domain::{DetailStatus, ReviewRecord};
use crate::gateway::{Gateway, GatewayError};
use crate::ports::HttpMethod;
use tracing::{info, warn};

pub const DETAIL_AUTH_FAILED: &str = "authentication error: please log in";
pub const DETAIL_FAILED: &str = "failed to load the book review";

pub struct ReviewDetail {
    gateway: Gateway,
    status: DetailStatus,
}

impl ReviewDetail {
    pub fn new(gateway: Gateway) -> Self {
        Self {
            gateway,
            status: DetailStatus::Loading,
        }
    }

    pub fn status(&self) -> &DetailStatus {
        &self.status
    }

    pub async fn load(&mut self, id: &str) -> &DetailStatus {
        self.status = DetailStatus::Loading;
        let result = self
            .gateway
            .call_json::<ReviewRecord>(HttpMethod::Get, &format!("/books/{id}"), None)
            .await;

        self.status = match result {
            Ok(record) => {
                info!(id, "Review loaded");
                DetailStatus::Ready(record)
            }
            Err(GatewayError::Unauthorized) => {
                warn!(id, "Session rejected while loading a review; clearing it");
                self.gateway.expire_session();
                DetailStatus::Failed {
                    message: DETAIL_AUTH_FAILED.to_string(),
                    login_required: true,
                }
            }
            Err(e) => {
                warn!(id, "Failed to load review: {}", e);
                DetailStatus::Failed {
                    message: DETAIL_FAILED.to_string(),
                    login_required: false,
                }
            }
        };
        &self.status
    }
}
