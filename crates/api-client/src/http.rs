//! Request/response model and the transport seam.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// One outbound API call, before the gateway pipeline runs.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, e.g. "/payments".
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    /// Marks the login call: a 401 on an exempt request must not clear
    /// the session or redirect (a failed login is not a logout).
    pub auth_exempt: bool,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            auth_exempt: false,
        }
    }

    pub fn post<B: Serialize>(path: impl Into<String>, body: &B) -> Result<Self, ApiError> {
        let body = serde_json::to_value(body)
            .map_err(|e| ApiError::Decode(format!("failed to encode request body: {}", e)))?;
        Ok(Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: Some(body),
            headers: Vec::new(),
            auth_exempt: false,
        })
    }

    /// POST with no payload (e.g. settlement approval).
    pub fn post_empty(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
            auth_exempt: false,
        }
    }

    pub fn push_query(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.query.push((key.into(), value.into()));
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    pub fn auth_exempt(mut self) -> Self {
        self.auth_exempt = true;
        self
    }

    /// Full URL with the query string appended. Values are percent-encoded;
    /// keys are fixed identifiers and pass through as-is.
    pub fn url(&self, base: &str) -> String {
        if self.query.is_empty() {
            return format!("{}{}", base, self.path);
        }
        let query = self
            .query
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}{}?{}", base, self.path, query)
    }
}

/// Raw response as seen by the pipeline: status plus undecoded body text.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// The actual I/O. Production uses browser fetch (`crate::fetch`);
/// tests script responses.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<RawResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_query_has_no_separator() {
        let req = ApiRequest::get("/payments");
        assert_eq!(req.url("http://api.test"), "http://api.test/payments");
    }

    #[test]
    fn url_encodes_query_values() {
        let mut req = ApiRequest::get("/payments");
        req.push_query("order_no", "PAY 001+x");
        req.push_query("page", "1");
        assert_eq!(
            req.url("http://api.test"),
            "http://api.test/payments?order_no=PAY%20001%2Bx&page=1"
        );
    }
}
