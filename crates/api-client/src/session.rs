//! Single source of truth for "is there a logged-in admin".

use std::rc::Rc;

use contracts::system::auth::{AdminInfo, LoginRequest, LoginResponse};

use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::http::ApiRequest;
use crate::storage::KeyValueStorage;

/// Fixed storage keys, shared with the gateway's unauthorized guard.
/// Both entries are always written and cleared together so the cached
/// identity can never outlive the credential.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const ADMIN_DATA_KEY: &str = "admin_data";

pub struct SessionStore {
    storage: Rc<dyn KeyValueStorage>,
}

impl SessionStore {
    pub fn new(storage: Rc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    /// Authenticate against the backend and persist the session.
    ///
    /// The login request is exempt from the gateway's 401 redirect; a
    /// rejected login surfaces here as the underlying [`ApiError`],
    /// passed through unmodified.
    pub async fn login(
        &self,
        gateway: &GatewayClient,
        username: &str,
        password: &str,
    ) -> Result<AdminInfo, ApiError> {
        let request = ApiRequest::post(
            "/auth/login",
            &LoginRequest {
                username: username.to_string(),
                password: password.to_string(),
            },
        )?
        .auth_exempt();

        let response: LoginResponse = gateway.request_json(request).await?;

        let admin_raw = serde_json::to_string(&response.admin)
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        self.storage.set(ACCESS_TOKEN_KEY, &response.access_token);
        self.storage.set(ADMIN_DATA_KEY, &admin_raw);
        log::info!("admin {} signed in", response.admin.username);

        Ok(response.admin)
    }

    /// Clear credential and identity in one operation. Idempotent; no
    /// network call.
    pub fn logout(&self) {
        self.storage.remove(ACCESS_TOKEN_KEY);
        self.storage.remove(ADMIN_DATA_KEY);
        log::info!("session cleared");
    }

    /// Presence check only — no server round-trip, no expiry validation.
    /// Expired tokens are the server's to reject with a 401.
    pub fn is_authenticated(&self) -> bool {
        self.storage.get(ACCESS_TOKEN_KEY).is_some()
    }

    /// Last-known authenticated identity, if a session is persisted.
    pub fn current_identity(&self) -> Option<AdminInfo> {
        let raw = self.storage.get(ADMIN_DATA_KEY)?;
        serde_json::from_str(&raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::storage::{KeyValueStorage, MemoryStorage};
    use crate::testing::{test_gateway, MockTransport};

    fn login_body() -> String {
        serde_json::json!({
            "access_token": "tok-abc",
            "token_type": "bearer",
            "expires_in": 3600,
            "admin": {
                "id": 7,
                "username": "ops",
                "role": "operator",
                "is_active": true,
                "requires_second_factor": false
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn login_persists_credential_and_identity_together() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));
        let session = SessionStore::new(storage.clone() as Rc<dyn KeyValueStorage>);

        transport.push_ok(200, &login_body());
        let admin = session.login(&gateway, "ops", "pw").await.unwrap();

        assert_eq!(admin.username, "ops");
        // No further round-trip for either check.
        assert!(session.is_authenticated());
        assert_eq!(session.current_identity().unwrap().id, 7);
        assert_eq!(storage.get(ACCESS_TOKEN_KEY).as_deref(), Some("tok-abc"));

        let sent = transport.take_requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].auth_exempt);
        assert_eq!(sent[0].path, "/auth/login");
    }

    #[tokio::test]
    async fn failed_login_passes_the_cause_through_and_persists_nothing() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| panic!("no redirect")));
        let session = SessionStore::new(storage.clone() as Rc<dyn KeyValueStorage>);

        transport.push_ok(401, r#"{"detail": "Incorrect username or password"}"#);
        let err = session.login(&gateway, "ops", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "Incorrect username or password");
        assert!(!session.is_authenticated());
        assert!(session.current_identity().is_none());
    }

    #[tokio::test]
    async fn logout_clears_both_entries_and_is_idempotent() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));
        let session = SessionStore::new(storage.clone() as Rc<dyn KeyValueStorage>);

        transport.push_ok(200, &login_body());
        session.login(&gateway, "ops", "pw").await.unwrap();

        session.logout();
        assert!(!session.is_authenticated());
        assert!(session.current_identity().is_none());
        assert!(storage.get(ADMIN_DATA_KEY).is_none());

        // Already logged out: still fine.
        session.logout();
        assert!(!session.is_authenticated());
    }
}
