//! HTTP client trait and implementations.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::FetchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        })
    }
}

/// Trait for HTTP clients, enabling mockability in tests.
///
/// All bodies are JSON. An empty response body decodes to `Value::Null`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError>;

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError>;

    async fn delete_json(&self, url: &str) -> Result<Value, FetchError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).get_json(url).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        (**self).post_json(url, body).await
    }

    async fn delete_json(&self, url: &str) -> Result<Value, FetchError> {
        (**self).delete_json(url).await
    }
}

/// Configuration for ReqwestClient.
#[derive(Clone)]
pub struct ReqwestClientBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestClientBuilder {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(crate::config::DEFAULT_TIMEOUT_SECS),
            user_agent: concat!("mealdeck/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    pub fn build(self) -> Result<ReqwestClient, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .build()?;

        Ok(ReqwestClient { inner })
    }
}

/// Production HTTP client. Cloning shares the connection pool.
#[derive(Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Create a new ReqwestClient with default configuration.
    pub fn new() -> Result<Self, reqwest::Error> {
        ReqwestClientBuilder::new().build()
    }

    /// Get a builder for custom configuration.
    pub fn builder() -> ReqwestClientBuilder {
        ReqwestClientBuilder::new()
    }

    async fn send(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, FetchError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let mut request = match method {
            Method::Get => self.inner.get(parsed),
            Method::Post => self.inner.post(parsed),
            Method::Delete => self.inner.delete(parsed),
        };
        if let Some(body) = body {
            request = request.json(body);
        }

        tracing::debug!(%method, url, "network: sending");
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!(%method, url, %status, "network: request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let text = response.text().await?;
        tracing::debug!(%method, url, %status, bytes = text.len(), "network: ok");

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| FetchError::InvalidBody(format!("{url}: {e}")))
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.send(Method::Get, url, None).await
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        self.send(Method::Post, url, Some(body)).await
    }

    async fn delete_json(&self, url: &str) -> Result<Value, FetchError> {
        self.send(Method::Delete, url, None).await
    }
}

/// Mock response for testing.
#[derive(Clone, Debug)]
pub enum MockResponse {
    Json(Value),
    Status(u16),
    Error(String),
}

/// Mock HTTP client for testing.
///
/// Each `(method, url)` pair holds a list of responses; the nth call gets the
/// nth response and the last one repeats. Every call is recorded.
#[derive(Default)]
pub struct MockClient {
    responses: HashMap<(Method, String), Vec<MockResponse>>,
    calls: Mutex<Vec<(Method, String, Option<Value>)>>,
}

impl MockClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response for a request. Repeated calls append to the sequence.
    pub fn with_response(mut self, method: Method, url: &str, response: MockResponse) -> Self {
        self.responses
            .entry((method, url.to_string()))
            .or_default()
            .push(response);
        self
    }

    /// Add a JSON response for a GET.
    pub fn with_json(self, url: &str, body: Value) -> Self {
        self.with_response(Method::Get, url, MockResponse::Json(body))
    }

    /// Add a transport error for a GET.
    pub fn with_error(self, url: &str, error: &str) -> Self {
        self.with_response(Method::Get, url, MockResponse::Error(error.to_string()))
    }

    /// All recorded calls as `(method, url)`, in order.
    pub fn calls(&self) -> Vec<(Method, String)> {
        self.lock_calls()
            .iter()
            .map(|(method, url, _)| (*method, url.clone()))
            .collect()
    }

    /// Bodies sent with POST requests, in order.
    pub fn posted_bodies(&self) -> Vec<Value> {
        self.lock_calls()
            .iter()
            .filter_map(|(_, _, body)| body.clone())
            .collect()
    }

    /// Number of recorded calls to one `(method, url)`.
    pub fn call_count(&self, method: Method, url: &str) -> usize {
        self.lock_calls()
            .iter()
            .filter(|(m, u, _)| *m == method && u == url)
            .count()
    }

    fn lock_calls(&self) -> std::sync::MutexGuard<'_, Vec<(Method, String, Option<Value>)>> {
        self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn respond(&self, method: Method, url: &str, body: Option<&Value>) -> Result<Value, FetchError> {
        let nth = {
            let mut calls = self.lock_calls();
            let nth = calls.iter().filter(|(m, u, _)| *m == method && u == url).count();
            calls.push((method, url.to_string(), body.cloned()));
            nth
        };

        let response = self
            .responses
            .get(&(method, url.to_string()))
            .and_then(|seq| seq.get(nth).or_else(|| seq.last()));

        match response {
            Some(MockResponse::Json(value)) => Ok(value.clone()),
            Some(MockResponse::Status(status)) => Err(FetchError::Status {
                status: *status,
                url: url.to_string(),
            }),
            Some(MockResponse::Error(e)) => Err(FetchError::InvalidUrl(e.clone())),
            None => Err(FetchError::InvalidUrl(format!(
                "No mock response for {} {}",
                method, url
            ))),
        }
    }
}

#[async_trait]
impl HttpClient for MockClient {
    async fn get_json(&self, url: &str) -> Result<Value, FetchError> {
        self.respond(Method::Get, url, None)
    }

    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, FetchError> {
        self.respond(Method::Post, url, Some(body))
    }

    async fn delete_json(&self, url: &str) -> Result<Value, FetchError> {
        self.respond(Method::Delete, url, None)
    }
}
