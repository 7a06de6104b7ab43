use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::page::{PageMeta, StatusBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisbursementStatus {
    Pending,
    Processing,
    Paid,
    Failed,
    Refunded,
}

impl DisbursementStatus {
    pub fn code(&self) -> &'static str {
        match self {
            DisbursementStatus::Pending => "pending",
            DisbursementStatus::Processing => "processing",
            DisbursementStatus::Paid => "paid",
            DisbursementStatus::Failed => "failed",
            DisbursementStatus::Refunded => "refunded",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            DisbursementStatus::Pending => "Pending",
            DisbursementStatus::Processing => "Processing",
            DisbursementStatus::Paid => "Paid",
            DisbursementStatus::Failed => "Failed",
            DisbursementStatus::Refunded => "Refunded",
        }
    }

    pub fn all() -> Vec<DisbursementStatus> {
        vec![
            DisbursementStatus::Pending,
            DisbursementStatus::Processing,
            DisbursementStatus::Paid,
            DisbursementStatus::Failed,
            DisbursementStatus::Refunded,
        ]
    }
}

/// Payout order to a merchant-supplied bank account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disbursement {
    pub id: i64,
    pub order_no: String,
    pub third_party_id: Option<String>,
    pub merchant_id: i64,
    pub provider_id: i64,
    pub currency_id: i64,
    pub amount: Decimal,
    pub fee: Decimal,
    pub status: DisbursementStatus,
    /// Masked destination account, display only.
    #[serde(default)]
    pub bank_account_no: Option<String>,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisbursementListResponse {
    pub disbursements: Vec<Disbursement>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub total_amount: Decimal,
    pub status_stats: Vec<StatusBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepushDisbursementOrderRequest {
    pub order_no: String,
}
