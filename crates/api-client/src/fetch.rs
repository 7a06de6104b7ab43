//! Browser fetch transport (wasm32 only).

use async_trait::async_trait;
use gloo_net::http::Request;

use crate::http::{ApiRequest, HttpTransport, Method, RawResponse, TransportError};

/// Production transport over the browser's fetch API.
#[derive(Debug, Default)]
pub struct FetchTransport;

impl FetchTransport {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        let mut builder = match request.method {
            Method::Get => Request::get(url),
            Method::Post => Request::post(url),
        };
        builder = builder.header("Accept", "application/json");
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = match &request.body {
            Some(body) => builder
                .json(body)
                .map_err(|e| TransportError(format!("failed to serialize request: {}", e)))?
                .send()
                .await,
            None => builder.send().await,
        }
        .map_err(|e| TransportError(format!("failed to send request: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError(format!("failed to read response: {}", e)))?;
        Ok(RawResponse { status, body })
    }
}
