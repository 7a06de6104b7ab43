/// Header carrying the collaborator shared secret for the
/// verification-retry action. Fixed by the backend contract.
pub const VERIFY_SECRET_HEADER: &str = "X-Verify-Secret";

/// Client configuration, fixed at startup. Not user-configurable at runtime.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the admin API, e.g. "https://pay.example.com:3000/api".
    pub base_url: String,
    /// Static shared secret sent on the query-timeout-order action.
    /// Collaborator credential, not session-derived.
    pub verify_secret: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, verify_secret: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            verify_secret: verify_secret.into(),
        }
    }
}
