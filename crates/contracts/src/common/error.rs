use serde::{Deserialize, Serialize};

/// Error body returned by the backend on 4xx/5xx responses.
///
/// The `detail` field is free text; 403 bodies embed the missing
/// permission name in it (see the api-client permission module).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub detail: Option<String>,
}
