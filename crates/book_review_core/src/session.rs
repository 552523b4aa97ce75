//! crates/book_review_core/src/session.rs
//!
//! The session controller: login, signup and logout transitions.
//! Only successful logins/signups and logout ever write to the credential store.

use crate::credentials::CredentialStore;
use crate::gateway::{Gateway, GatewayError};
use crate::ports::HttpMethod;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info, warn};

pub const MISSING_LOGIN_FIELDS: &str = "email and password are required";
pub const LOGIN_REJECTED: &str = "login failed: email or password is incorrect";
pub const LOGIN_FAILED: &str = "login failed";
pub const MISSING_SIGNUP_FIELDS: &str = "name, email and password are required";
pub const SIGNUP_FAILED: &str = "registration failed";

/// An enum representing where the login/signup form currently stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Submitting,
    Authenticated,
    Rejected(String),
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(rename = "userName", default)]
    user_name: Option<String>,
}

pub struct SessionController {
    gateway: Gateway,
    credentials: CredentialStore,
    state: SessionState,
}

impl SessionController {
    pub fn new(gateway: Gateway) -> Self {
        let credentials = gateway.credentials().clone();
        Self {
            gateway,
            credentials,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Mount-time guard: true when a token is already stored, so the form can be skipped.
    /// Makes no network call.
    pub fn already_authenticated(&self) -> bool {
        self.credentials.get_token().is_some()
    }

    pub async fn login(&mut self, email: &str, password: &str) -> &SessionState {
        if email.trim().is_empty() || password.trim().is_empty() {
            self.state = SessionState::Rejected(MISSING_LOGIN_FIELDS.to_string());
            return &self.state;
        }

        self.state = SessionState::Submitting;
        let body = json!({ "email": email, "password": password });
        let result = self
            .gateway
            .call_json::<AuthResponse>(HttpMethod::Post, "/signin", Some(body))
            .await;

        self.state = match result {
            Ok(response) => self.establish(response, LOGIN_FAILED),
            Err(GatewayError::ValidationFailed { .. }) | Err(GatewayError::Unauthorized) => {
                info!("Login rejected by the server");
                SessionState::Rejected(LOGIN_REJECTED.to_string())
            }
            Err(GatewayError::NetworkOrServer(e)) => {
                warn!("Login failed: {}", e);
                SessionState::Rejected(LOGIN_FAILED.to_string())
            }
        };
        &self.state
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> &SessionState {
        if [name, email, password].iter().any(|f| f.trim().is_empty()) {
            self.state = SessionState::Rejected(MISSING_SIGNUP_FIELDS.to_string());
            return &self.state;
        }

        self.state = SessionState::Submitting;
        let body = json!({ "name": name, "email": email, "password": password });
        let result = self
            .gateway
            .call_json::<AuthResponse>(HttpMethod::Post, "/users", Some(body))
            .await;

        self.state = match result {
            Ok(response) => self.establish(response, SIGNUP_FAILED),
            Err(GatewayError::ValidationFailed {
                message: Some(message),
                ..
            }) => {
                info!("Signup rejected by the server: {}", message);
                SessionState::Rejected(message)
            }
            Err(e) => {
                warn!("Signup failed: {}", e);
                SessionState::Rejected(SIGNUP_FAILED.to_string())
            }
        };
        &self.state
    }

    /// Forgets the stored session. Always ends `Idle`.
    pub fn logout(&mut self) -> &SessionState {
        if let Err(e) = self.credentials.clear_session() {
            error!("Failed to clear the stored session: {}", e);
        }
        self.state = SessionState::Idle;
        &self.state
    }

    fn establish(&self, response: AuthResponse, failure: &str) -> SessionState {
        if response.token.is_empty() {
            warn!("Server accepted the credentials but returned an empty token");
            return SessionState::Rejected(failure.to_string());
        }
        match self
            .credentials
            .set_session(&response.token, response.user_name.as_deref())
        {
            Ok(()) => {
                info!("Session established");
                SessionState::Authenticated
            }
            Err(e) => {
                error!("Failed to persist the session: {}", e);
                // Leave nothing half-written behind.
                if let Err(e) = self.credentials.clear_session() {
                    error!("Failed to clear the partially stored session: {}", e);
                }
                SessionState::Rejected(failure.to_string())
            }
        }
    }
}
