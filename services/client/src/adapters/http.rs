//! services/client/src/adapters/http.rs
//!
//! This module contains the HTTP adapter, the concrete implementation of the
//! `HttpTransport` port from the `core` crate, built on `reqwest`.

use async_trait::async_trait;
use book_review_core::ports::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, PortError, PortResult};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use tracing::debug;
use url::Url;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements the `HttpTransport` port against a fixed base URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
    base_url: Url,
}

impl ReqwestTransport {
    /// Creates a new `ReqwestTransport`. No request timeout is configured.
    pub fn new(base_url: Url) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder().default_headers(headers).build()?;
        Ok(Self { http, base_url })
    }

    /// Joins the base URL (which may carry a path prefix) with an API path.
    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url.as_str().trim_end_matches('/'), path)
    }
}

fn to_reqwest(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
    }
}

//=========================================================================================
// `HttpTransport` Trait Implementation
//=========================================================================================

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        let url = self.url_for(&request.path);
        let mut builder = self.http.request(to_reqwest(request.method), &url);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            PortError::Transport(format!("{} {}: {}", request.method, request.path, e))
        })?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            PortError::Transport(format!(
                "{} {}: failed to read response body: {}",
                request.method, request.path, e
            ))
        })?;
        debug!(method = %request.method, path = %request.path, status, "API response received");

        Ok(ApiResponse { status, body })
    }
}
