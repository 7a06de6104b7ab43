use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pagination fields every list response carries alongside its item array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageMeta {
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub total_pages: u64,
}

/// Count-and-amount rollup for one status bucket.
///
/// Computed server-side over the full filtered set, not the current page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusBucket {
    pub status: String,
    pub count: u64,
    pub amount: Decimal,
}

/// Bare success indicator returned by mutation endpoints that do not
/// echo the mutated resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}
