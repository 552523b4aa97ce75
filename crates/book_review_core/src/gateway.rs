//! crates/book_review_core/src/gateway.rs
//!
//! The authenticated request gateway. Every API call goes through here so the
//! bearer token is attached consistently and responses are classified the same
//! way for every caller.

use crate::credentials::CredentialStore;
use crate::ports::{ApiRequest, ApiResponse, HttpMethod, HttpTransport};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// The non-success classifications of an API call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// A 4xx other than 401. `message` is the server's text when it sent one.
    #[error("request rejected with status {status}")]
    ValidationFailed {
        status: u16,
        message: Option<String>,
    },
    #[error("unauthorized")]
    Unauthorized,
    #[error("network or server error: {0}")]
    NetworkOrServer(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Clone)]
pub struct Gateway {
    transport: Arc<dyn HttpTransport>,
    credentials: CredentialStore,
}

impl Gateway {
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: CredentialStore) -> Self {
        Self {
            transport,
            credentials,
        }
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Forgets the stored session. For callers that treat `Unauthorized` as fatal.
    pub fn expire_session(&self) {
        if let Err(e) = self.credentials.clear_session() {
            error!("Failed to clear the stored session: {}", e);
        }
    }

    /// Issues one call, authenticated when a token is stored.
    ///
    /// Never retries and never touches the session, even on `Unauthorized`.
    pub async fn call(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> GatewayResult<Value> {
        let request = ApiRequest {
            method,
            path: path.to_string(),
            bearer_token: self.credentials.get_token(),
            body,
        };
        debug!(
            %method,
            path,
            authenticated = request.bearer_token.is_some(),
            "Sending API request"
        );

        let response = self.transport.send(request).await.map_err(|e| {
            warn!(%method, path, "API request failed before a response: {}", e);
            GatewayError::NetworkOrServer(e.to_string())
        })?;

        classify(response)
    }

    /// Like [`Gateway::call`], decoding the success body into `T`.
    pub async fn call_json<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<Value>,
    ) -> GatewayResult<T> {
        let value = self.call(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| {
            warn!(%method, path, "Unexpected response body: {}", e);
            GatewayError::NetworkOrServer(format!("unexpected response body: {e}"))
        })
    }
}

/// Serializes a request body.
pub fn json_body<B: Serialize>(body: &B) -> GatewayResult<Value> {
    serde_json::to_value(body)
        .map_err(|e| GatewayError::NetworkOrServer(format!("failed to encode request body: {e}")))
}

fn classify(response: ApiResponse) -> GatewayResult<Value> {
    match response.status {
        200..=299 => {
            if response.body.trim().is_empty() {
                return Ok(Value::Null);
            }
            serde_json::from_str(&response.body).map_err(|e| {
                GatewayError::NetworkOrServer(format!("malformed response body: {e}"))
            })
        }
        401 => Err(GatewayError::Unauthorized),
        400..=499 => Err(GatewayError::ValidationFailed {
            status: response.status,
            message: server_message(&response.body),
        }),
        status => Err(GatewayError::NetworkOrServer(format!(
            "server responded with status {status}"
        ))),
    }
}

/// Pulls the human-readable error out of a 4xx body, preferring the localized text.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["ErrorMessageJP", "message", "ErrorMessageEN"]
        .iter()
        .filter_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|message| !message.is_empty())
        .map(str::to_string)
}
