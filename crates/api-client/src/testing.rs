//! Shared test doubles: scripted transport and gateway wiring.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use crate::config::ApiConfig;
use crate::gateway::{GatewayClient, UnauthorizedHook};
use crate::http::{ApiRequest, HttpTransport, Method, RawResponse, TransportError};
use crate::storage::{KeyValueStorage, MemoryStorage};

pub(crate) struct CapturedRequest {
    pub url: String,
    pub method: Method,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub auth_exempt: bool,
}

/// Transport double: records every request as the transport saw it
/// (after the pipeline ran) and replays scripted responses in order.
#[derive(Default)]
pub(crate) struct MockTransport {
    requests: RefCell<Vec<CapturedRequest>>,
    responses: RefCell<VecDeque<Result<RawResponse, TransportError>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, status: u16, body: &str) {
        self.responses.borrow_mut().push_back(Ok(RawResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn push_network_error(&self, message: &str) {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError(message.to_string())));
    }

    pub fn take_requests(&self) -> Vec<CapturedRequest> {
        self.requests.borrow_mut().drain(..).collect()
    }
}

#[async_trait(?Send)]
impl HttpTransport for MockTransport {
    async fn execute(&self, url: &str, request: &ApiRequest) -> Result<RawResponse, TransportError> {
        self.requests.borrow_mut().push(CapturedRequest {
            url: url.to_string(),
            method: request.method,
            path: request.path.clone(),
            query: request.query.clone(),
            headers: request.headers.clone(),
            body: request.body.clone(),
            auth_exempt: request.auth_exempt,
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or(Ok(RawResponse {
                status: 200,
                body: "{}".to_string(),
            }))
    }
}

pub(crate) fn test_gateway(
    transport: &Rc<MockTransport>,
    storage: &Rc<MemoryStorage>,
    on_unauthorized: UnauthorizedHook,
) -> GatewayClient {
    GatewayClient::new(
        ApiConfig::new("http://api.test", "secret-42"),
        Rc::clone(transport) as Rc<dyn HttpTransport>,
        Rc::clone(storage) as Rc<dyn KeyValueStorage>,
        on_unauthorized,
    )
}
