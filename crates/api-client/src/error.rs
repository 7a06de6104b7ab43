use contracts::common::error::ApiErrorBody;

use crate::permission::PermissionError;

/// Failure taxonomy for API calls.
///
/// 401 is additionally handled globally by the gateway's unauthorized
/// guard (session cleared, login redirect); the variant still exists so
/// the login call itself can report a rejected credential.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("{}", detail.as_deref().unwrap_or("authentication required"))]
    Unauthorized { detail: Option<String> },

    #[error("{0}")]
    Forbidden(PermissionError),

    #[error("not found")]
    NotFound { detail: Option<String> },

    /// Validation or business-rule rejection; `detail` is surfaced verbatim.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    #[error("network failure: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a non-2xx response to the taxonomy. The body's `{detail}` field
    /// is decoded leniently; a missing or malformed body degrades to the
    /// status-only variant.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.detail);

        match status {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden(PermissionError::from_detail(detail.as_deref().unwrap_or(""))),
            404 => ApiError::NotFound { detail },
            400..=499 => ApiError::Rejected {
                status,
                detail: detail.unwrap_or_else(|| format!("request rejected (HTTP {})", status)),
            },
            _ => ApiError::Server { status },
        }
    }

    /// Message shown to the operator; `action` names what was attempted,
    /// e.g. "view payments" or "approve the settlement".
    pub fn user_message(&self, action: &str) -> String {
        match self {
            ApiError::Unauthorized { .. } => {
                "Your session has expired. Please sign in again.".to_string()
            }
            ApiError::Forbidden(err) => err.user_message(action),
            ApiError::NotFound { detail } => match detail {
                Some(detail) => detail.clone(),
                None => format!("Could not {}: not found", action),
            },
            ApiError::Rejected { detail, .. } => detail.clone(),
            ApiError::Server { .. } | ApiError::Network(_) => {
                format!("Failed to {}. Please try again.", action)
            }
            ApiError::Decode(_) => {
                format!("Failed to {}: unexpected response from the server", action)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_403_with_marker_to_named_permission() {
        let err = ApiError::from_response(
            403,
            r#"{"detail": "Missing admin permission: payments.view"}"#,
        );
        match err {
            ApiError::Forbidden(p) => {
                assert_eq!(p.missing_permission.as_deref(), Some("payments.view"))
            }
            other => panic!("expected Forbidden, got {:?}", other),
        }
    }

    #[test]
    fn maps_400_detail_verbatim() {
        let err = ApiError::from_response(400, r#"{"detail": "order is not in timeout state"}"#);
        assert_eq!(
            err.user_message("re-query the order"),
            "order is not in timeout state"
        );
    }

    #[test]
    fn missing_body_degrades_to_status_only() {
        let err = ApiError::from_response(422, "");
        assert_eq!(
            err,
            ApiError::Rejected {
                status: 422,
                detail: "request rejected (HTTP 422)".to_string()
            }
        );
    }

    #[test]
    fn server_errors_are_generic_and_retryable() {
        let err = ApiError::from_response(502, r#"{"detail": "upstream exploded"}"#);
        assert_eq!(
            err.user_message("load settlements"),
            "Failed to load settlements. Please try again."
        );
    }
}
