//! Parsing of 403 bodies into actionable permission errors.

use std::fmt;

/// Literal marker the backend embeds in 403 `detail` strings.
///
/// This is an external compatibility contract: the classifier is a pure
/// string match against the backend's error format and must not change
/// unless the backend does.
pub const MISSING_PERMISSION_MARKER: &str = "Missing admin permission: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionError {
    /// Server-provided detail string, kept verbatim.
    pub raw_detail: String,
    /// Permission name extracted from the marker, when present.
    pub missing_permission: Option<String>,
}

impl PermissionError {
    /// Classify a 403 detail string. A marker followed by a permission name
    /// (up to end of line) yields a named error; anything else is generic.
    pub fn from_detail(detail: &str) -> Self {
        let missing_permission = detail
            .find(MISSING_PERMISSION_MARKER)
            .map(|idx| &detail[idx + MISSING_PERMISSION_MARKER.len()..])
            .and_then(|rest| rest.lines().next())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty());

        Self {
            raw_detail: detail.to_string(),
            missing_permission,
        }
    }

    /// User-facing message; `action` names the attempted operation,
    /// e.g. "view payments".
    pub fn user_message(&self, action: &str) -> String {
        match &self.missing_permission {
            Some(permission) => {
                format!("You don't have permission to {} ({})", action, permission)
            }
            None => format!("You don't have sufficient permissions to {}", action),
        }
    }
}

impl fmt::Display for PermissionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.missing_permission {
            Some(permission) => write!(f, "missing permission {}", permission),
            None => write!(f, "insufficient permissions"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_permission_name_after_marker() {
        let err = PermissionError::from_detail("Missing admin permission: disbursements.view");
        assert_eq!(
            err.missing_permission.as_deref(),
            Some("disbursements.view")
        );
        assert_eq!(err.raw_detail, "Missing admin permission: disbursements.view");
    }

    #[test]
    fn extraction_stops_at_end_of_line() {
        let err = PermissionError::from_detail(
            "Missing admin permission: payments.refund\nContact an administrator.",
        );
        assert_eq!(err.missing_permission.as_deref(), Some("payments.refund"));
    }

    #[test]
    fn markerless_detail_yields_generic_error() {
        let err = PermissionError::from_detail("Forbidden");
        assert_eq!(err.missing_permission, None);
        assert_eq!(
            err.user_message("view disbursements"),
            "You don't have sufficient permissions to view disbursements"
        );
    }

    #[test]
    fn named_message_includes_action_and_permission() {
        let err = PermissionError::from_detail("Missing admin permission: disbursements.view");
        assert_eq!(
            err.user_message("view disbursements"),
            "You don't have permission to view disbursements (disbursements.view)"
        );
    }

    #[test]
    fn empty_name_after_marker_is_generic() {
        let err = PermissionError::from_detail("Missing admin permission: ");
        assert_eq!(err.missing_permission, None);
    }
}
