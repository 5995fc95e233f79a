//! Request transport seam.
//!
//! [`HttpTransport`] talks to the real backend through a blocking reqwest
//! client. [`MockTransport`] answers from canned responses and records every
//! request, for view and contract tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use serde_json::Value;

use super::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// One outgoing API call, before it is bound to a base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    /// Absolute path starting with `/api/`.
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Bearer token for the `Authorization` header.
    pub bearer: Option<String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            bearer: None,
            body: None,
        }
    }
}

/// Status and decoded JSON body. Empty or non-JSON bodies decode as `Null`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one request and waits for the full response.
///
/// Implementations do not retry.
pub trait Transport: Send + Sync {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError>;
}

// ═══════════════════════════════════════════════════════════
// HttpTransport
// ═══════════════════════════════════════════════════════════

/// reqwest-backed transport rooted at the backend base URL.
pub struct HttpTransport {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport for `base_url`. `timeout` of `None` never times out.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ApiError> {
        // reqwest's blocking client defaults to 30s; None must mean no limit.
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        })
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, request.path);
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        tracing::debug!(method = request.method.as_str(), path = %request.path, "API request");

        let response = builder.send().map_err(|e| {
            if e.is_timeout() {
                let secs = self.timeout.map(|t| t.as_secs()).unwrap_or_default();
                ApiError::Network(format!("Request timed out after {secs}s"))
            } else if e.is_connect() {
                ApiError::Network(format!("Cannot reach {}", self.base_url))
            } else {
                ApiError::Network(e.to_string())
            }
        })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::Null)
        };

        Ok(ApiResponse { status, body })
    }
}

// ═══════════════════════════════════════════════════════════
// MockTransport
// ═══════════════════════════════════════════════════════════

#[derive(Clone)]
enum MockReply {
    Response(ApiResponse),
    Fail(String),
}

/// Canned-response transport that records every request it receives.
///
/// Replies are matched on method + path (query ignored). When several
/// replies are queued for a route they are served in order and the last
/// one repeats. Unmatched routes answer 404 `{"msg": "Not Found"}`.
#[derive(Default)]
pub struct MockTransport {
    routes: Mutex<HashMap<(Method, String), VecDeque<MockReply>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON reply for `method path`.
    pub fn respond(self, method: Method, path: &str, status: u16, body: Value) -> Self {
        self.push(method, path, MockReply::Response(ApiResponse::new(status, body)));
        self
    }

    /// Queue a transport failure for `method path`.
    pub fn fail(self, method: Method, path: &str, reason: &str) -> Self {
        self.push(method, path, MockReply::Fail(reason.to_string()));
        self
    }

    /// Replace every queued reply for `method path` with a single one.
    pub fn set_response(&self, method: Method, path: &str, status: u16, body: Value) {
        if let Ok(mut routes) = self.routes.lock() {
            let queue = routes.entry((method, path.to_string())).or_default();
            queue.clear();
            queue.push_back(MockReply::Response(ApiResponse::new(status, body)));
        }
    }

    fn push(&self, method: Method, path: &str, reply: MockReply) {
        if let Ok(mut routes) = self.routes.lock() {
            routes
                .entry((method, path.to_string()))
                .or_default()
                .push_back(reply);
        }
    }

    /// Every request sent so far, in order.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    /// Requests sent to exactly `method path`.
    pub fn requests_to(&self, method: Method, path: &str) -> Vec<ApiRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    /// Number of requests with the given method.
    pub fn count_method(&self, method: Method) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    pub fn clear_requests(&self) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.clear();
        }
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        let mut routes = self
            .routes
            .lock()
            .map_err(|_| ApiError::Network("mock lock poisoned".into()))?;
        let Some(queue) = routes.get_mut(&(request.method, request.path.clone())) else {
            return Ok(ApiResponse::new(404, serde_json::json!({"msg": "Not Found"})));
        };

        let reply = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Fail(reason)) => Err(ApiError::Network(reason)),
            None => Ok(ApiResponse::new(404, serde_json::json!({"msg": "Not Found"}))),
        }
    }
}
