//! crates/book_review_core/src/ports.rs
//!
//! Defines the capability contracts (traits) the controllers depend on.
//! These traits form the boundary of the hexagonal architecture, keeping the core
//! independent of a concrete HTTP client or persistence backend.

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., filesystem, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Wire Types
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound API call, relative to the configured base URL.
#[derive(Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    /// Path plus optional query string, e.g. `/books?offset=10`.
    pub path: String,
    pub bearer_token: Option<String>,
    pub body: Option<Value>,
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "[REDACTED]"))
            .field("body", &self.body)
            .finish()
    }
}

/// The raw outcome of an API call that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// Sends requests to the remote book-review API.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs the call. Any response the server produced, whatever its status,
    /// is `Ok`; only failures to obtain a response are errors.
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse>;
}

/// Durable storage of named strings.
///
/// Reads are served from memory; writes are persisted before they return.
pub trait KeyValueStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> PortResult<()>;
    /// Removing a missing key succeeds.
    fn remove(&self, key: &str) -> PortResult<()>;
}
