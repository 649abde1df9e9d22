use reqwest::{Method, StatusCode};
use serde_json::Value;
use std::time::Duration;

type ReqwestResult = Result<reqwest::Response, reqwest::Error>;

/// Shown when a failed response carries nothing we can display.
const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// An API client for interfacing with the backend.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct APIClient {
    pub address: String,
    pub inner_client: reqwest::Client,
}

/// Helper methods for http actions
impl APIClient {
    /// Build a client where every request shares one fixed timeout budget.
    pub fn new(
        address: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ClientError> {
        let inner_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            address: address.into(),
            inner_client,
        })
    }

    fn format_url(&self, path: &str) -> String {
        format!("{}{path}", self.address.trim_end_matches('/'))
    }

    async fn empty_get(&self, path: &str) -> ReqwestResult {
        self.inner_client.get(self.format_url(path)).send().await
    }

    async fn query_get(&self, path: &str, term: &str) -> ReqwestResult {
        self.inner_client
            .get(self.format_url(path))
            .query(&[("query", term)])
            .send()
            .await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> ReqwestResult {
        let request = self.inner_client.request(method, self.format_url(path));
        let request = match body {
            Some(body) => request.json(body),
            None => request,
        };
        request.send().await
    }
}

/// Methods on the backend API
impl APIClient {
    pub async fn health_check(&self) -> Result<(), ClientError> {
        let response = self.empty_get("/api/health_check").await?;
        ok_empty(response).await
    }

    /// Fetch the raw JSON at `path`, optionally filtered by a search term
    /// sent as `?query=<term>`.
    pub async fn get_json(
        &self,
        path: &str,
        query: Option<&str>,
    ) -> Result<Value, ClientError> {
        let response = match query {
            Some(term) => self.query_get(path, term).await?,
            None => self.empty_get(path).await?,
        };
        ok_json(response).await
    }

    /// Issue one write and return the raw response body. An empty body is
    /// returned as `Value::Null`.
    pub async fn write_json(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ClientError> {
        let response = self.send(method, path, body).await?;
        ok_json(response).await
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// An unhandled API error to display, containing the server's message.
    #[error("{1}")]
    APIError(StatusCode, String),
    #[error("The request timed out.")]
    Timeout(#[source] reqwest::Error),
    #[error("Network error. Please check your connection.")]
    Network(#[source] reqwest::Error),
    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for ClientError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

/// Return a successful response's body as JSON, treating an empty body as
/// `null`.
pub async fn ok_json(response: reqwest::Response) -> Result<Value, ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    let text = response.text().await?;
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}

/// Check that an empty response is OK, returning a ClientError if not.
pub async fn ok_empty(response: reqwest::Response) -> Result<(), ClientError> {
    if !response.status().is_success() {
        return Err(api_error(response).await);
    }
    Ok(())
}

async fn api_error(response: reqwest::Response) -> ClientError {
    let status = response.status();
    match response.text().await {
        Ok(body) => ClientError::APIError(status, error_message(&body)),
        Err(e) => e.into(),
    }
}

/// Pick the message to surface from a failed response body: a JSON
/// `message` or `error` string, else the raw text, else a generic message.
pub fn error_message(body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        for field in ["message", "error"] {
            if let Some(Value::String(message)) = fields.get(field) {
                return message.clone();
            }
        }
        return GENERIC_ERROR.to_string();
    }
    match body.trim() {
        "" => GENERIC_ERROR.to_string(),
        text => text.to_string(),
    }
}
