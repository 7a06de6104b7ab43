//! Single egress point for all API calls.
//!
//! Credential attachment and credential-rejection handling are pipeline
//! stages wired at construction, not per-call decisions — a new call site
//! cannot forget them.

use std::rc::Rc;

use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{ApiRequest, HttpTransport, RawResponse};
use crate::session::{ACCESS_TOKEN_KEY, ADMIN_DATA_KEY};
use crate::storage::KeyValueStorage;

/// Invoked after the unauthorized guard clears the session; the frontend
/// installs a hook that navigates to the login view.
pub type UnauthorizedHook = Rc<dyn Fn()>;

/// Transforms an outbound request before it is sent.
pub trait RequestStage {
    fn apply(&self, request: &mut ApiRequest);
}

/// Observes every response after it is received.
pub trait ResponseStage {
    fn inspect(&self, request: &ApiRequest, response: &RawResponse);
}

/// Attaches the persisted credential as a bearer token. Requests issued
/// without a persisted credential go out unauthenticated.
struct BearerAuth {
    storage: Rc<dyn KeyValueStorage>,
}

impl RequestStage for BearerAuth {
    fn apply(&self, request: &mut ApiRequest) {
        if let Some(token) = self.storage.get(ACCESS_TOKEN_KEY) {
            request
                .headers
                .push(("Authorization".to_string(), format!("Bearer {}", token)));
        }
    }
}

/// On 401 for any non-exempt request: clear credential and identity
/// together, then hand control to the unauthorized hook. The login call
/// is exempt so a failed login does not trigger a logout-redirect loop.
struct UnauthorizedGuard {
    storage: Rc<dyn KeyValueStorage>,
    on_unauthorized: UnauthorizedHook,
}

impl ResponseStage for UnauthorizedGuard {
    fn inspect(&self, request: &ApiRequest, response: &RawResponse) {
        if response.status != 401 || request.auth_exempt {
            return;
        }
        log::warn!("credential rejected on {}, clearing session", request.path);
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(ADMIN_DATA_KEY);
        (self.on_unauthorized)();
    }
}

pub struct GatewayClient {
    config: ApiConfig,
    transport: Rc<dyn HttpTransport>,
    request_stages: Vec<Box<dyn RequestStage>>,
    response_stages: Vec<Box<dyn ResponseStage>>,
}

impl GatewayClient {
    pub fn new(
        config: ApiConfig,
        transport: Rc<dyn HttpTransport>,
        storage: Rc<dyn KeyValueStorage>,
        on_unauthorized: UnauthorizedHook,
    ) -> Self {
        Self {
            config,
            transport,
            request_stages: vec![Box::new(BearerAuth {
                storage: Rc::clone(&storage),
            })],
            response_stages: vec![Box::new(UnauthorizedGuard {
                storage,
                on_unauthorized,
            })],
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Run the pipeline: request stages, transport, response stages.
    /// Every status passes through to the caller; the unauthorized guard
    /// acts as a side effect only.
    pub async fn send(&self, mut request: ApiRequest) -> Result<RawResponse, ApiError> {
        for stage in &self.request_stages {
            stage.apply(&mut request);
        }
        let url = request.url(&self.config.base_url);
        log::debug!("{} {}", request.method.as_str(), url);

        let response = self
            .transport
            .execute(&url, &request)
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        for stage in &self.response_stages {
            stage.inspect(&request, &response);
        }
        Ok(response)
    }

    /// Send and decode a JSON body, mapping non-2xx statuses to the
    /// error taxonomy.
    pub async fn request_json<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let path = request.path.clone();
        let response = self.send(request).await?;
        if !response.is_success() {
            log::error!("{} -> HTTP {}", path, response.status);
            return Err(ApiError::from_response(response.status, &response.body));
        }
        serde_json::from_str(&response.body).map_err(|e| {
            log::error!("{} -> undecodable body: {}", path, e);
            ApiError::Decode(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::http::ApiRequest;
    use crate::session::{ACCESS_TOKEN_KEY, ADMIN_DATA_KEY};
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::testing::{test_gateway, MockTransport};

    #[tokio::test]
    async fn attaches_bearer_token_when_credential_present() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        storage.set(ACCESS_TOKEN_KEY, "tok-123");
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(200, "{}");
        gateway.send(ApiRequest::get("/payments")).await.unwrap();

        let sent = transport.take_requests();
        assert_eq!(
            sent[0].headers,
            vec![("Authorization".to_string(), "Bearer tok-123".to_string())]
        );
    }

    #[tokio::test]
    async fn sends_unauthenticated_without_credential() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(200, "{}");
        gateway.send(ApiRequest::get("/payments")).await.unwrap();

        assert!(transport.take_requests()[0].headers.is_empty());
    }

    #[tokio::test]
    async fn rejected_credential_clears_session_and_redirects() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        storage.set(ACCESS_TOKEN_KEY, "tok-123");
        storage.set(ADMIN_DATA_KEY, "{}");
        let redirected = Rc::new(Cell::new(false));
        let flag = Rc::clone(&redirected);
        let gateway = test_gateway(&transport, &storage, Rc::new(move || flag.set(true)));

        transport.push_ok(401, r#"{"detail": "token expired"}"#);
        let response = gateway.send(ApiRequest::get("/payments")).await.unwrap();

        assert_eq!(response.status, 401);
        assert!(redirected.get());
        // Credential and identity go together, always.
        assert!(storage.get(ACCESS_TOKEN_KEY).is_none());
        assert!(storage.get(ADMIN_DATA_KEY).is_none());
    }

    #[tokio::test]
    async fn login_call_is_exempt_from_the_unauthorized_guard() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let redirected = Rc::new(Cell::new(false));
        let flag = Rc::clone(&redirected);
        let gateway = test_gateway(&transport, &storage, Rc::new(move || flag.set(true)));

        transport.push_ok(401, r#"{"detail": "Incorrect username or password"}"#);
        let request = ApiRequest::post("/auth/login", &serde_json::json!({}))
            .unwrap()
            .auth_exempt();
        let response = gateway.send(request).await.unwrap();

        assert_eq!(response.status, 401);
        assert!(!redirected.get());
    }

    #[tokio::test]
    async fn other_statuses_pass_through_untouched() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        storage.set(ACCESS_TOKEN_KEY, "tok-123");
        let gateway = test_gateway(&transport, &storage, Rc::new(|| panic!("no redirect on 403")));

        transport.push_ok(403, r#"{"detail": "Forbidden"}"#);
        let response = gateway.send(ApiRequest::get("/payments")).await.unwrap();

        assert_eq!(response.status, 403);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok-123"));
    }
}
