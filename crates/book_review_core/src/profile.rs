//! crates/book_review_core/src/profile.rs
//!
//! Reads and updates the logged-in user's display name.

use crate::domain::UserProfile;
use crate::error::{ActionError, ActionResult};
use crate::gateway::{Gateway, GatewayError};
use crate::ports::HttpMethod;
use serde_json::json;
use tracing::{error, info, warn};

pub const MISSING_NAME: &str = "name is required";
pub const PROFILE_LOAD_FAILED: &str = "failed to load the user profile";
pub const PROFILE_UPDATE_FAILED: &str = "failed to update the user profile";

pub struct ProfileEditor {
    gateway: Gateway,
}

impl ProfileEditor {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    pub async fn load(&self) -> ActionResult<UserProfile> {
        self.gateway
            .call_json::<UserProfile>(HttpMethod::Get, "/users", None)
            .await
            .map_err(|e| self.fail(e, PROFILE_LOAD_FAILED))
    }

    /// Renames the user. The stored display name follows a successful update.
    pub async fn update(&self, name: &str) -> ActionResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ActionError::LocalValidation(MISSING_NAME.to_string()));
        }

        self.gateway
            .call(HttpMethod::Put, "/users", Some(json!({ "name": name })))
            .await
            .map_err(|e| self.fail(e, PROFILE_UPDATE_FAILED))?;

        if let Err(e) = self.gateway.credentials().set_display_name(name) {
            error!("Profile updated but the display name could not be stored: {}", e);
        }
        info!("Profile updated");
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
