use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Declared token lifetime in seconds. The client does not track
    /// expiry itself; the server rejects stale tokens with 401.
    pub expires_in: i64,
    pub admin: AdminInfo,
}

/// Authenticated admin identity, cached client-side next to the token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminInfo {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub is_active: bool,
    pub requires_second_factor: bool,
}
