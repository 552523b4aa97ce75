//! In-process transport double for controller tests.

use crate::ports::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, PortError, PortResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

struct Scripted {
    response: ApiResponse,
    delay: Duration,
}

/// Answers from a script keyed by method and path, recording every request.
/// Unscripted calls fail as transport errors.
#[derive(Default)]
pub struct StubTransport {
    script: Mutex<HashMap<(HttpMethod, String), Scripted>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.respond_after(method, path, status, body, Duration::ZERO);
    }

    pub fn respond_after(
        &self,
        method: HttpMethod,
        path: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) {
        self.script.lock().unwrap().insert(
            (method, path.to_string()),
            Scripted {
                response: ApiResponse {
                    status,
                    body: body.to_string(),
                },
                delay,
            },
        );
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }
}

#[async_trait]
impl HttpTransport for StubTransport {
    async fn send(&self, request: ApiRequest) -> PortResult<ApiResponse> {
        let key = (request.method, request.path.clone());
        self.requests.lock().unwrap().push(request);

        let scripted = self
            .script
            .lock()
            .unwrap()
            .get(&key)
            .map(|s| (s.response.clone(), s.delay));
        let (response, delay) =
            scripted.ok_or_else(|| PortError::Transport(format!("no route for {} {}", key.0, key.1)))?;

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(response)
    }
}

/// A JSON array of `count` reviews whose ids are prefixed with `tag`.
pub fn reviews_json(tag: &str, count: usize) -> String {
    let records: Vec<serde_json::Value> = (0..count)
        .map(|i| {
            serde_json::json!({
                "id": format!("{tag}-{i}"),
                "title": format!("Book {tag}-{i}"),
                "url": "https://example.com/book",
                "detail": "detail",
                "review": "review",
                "reviewer": "Taro",
            })
        })
        .collect();
    serde_json::Value::Array(records).to_string()
}
