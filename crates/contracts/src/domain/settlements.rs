use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::page::{PageMeta, StatusBucket};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementStatus {
    Pending,
    Approved,
    Rejected,
    Paid,
}

impl SettlementStatus {
    pub fn code(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "pending",
            SettlementStatus::Approved => "approved",
            SettlementStatus::Rejected => "rejected",
            SettlementStatus::Paid => "paid",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SettlementStatus::Pending => "Pending",
            SettlementStatus::Approved => "Approved",
            SettlementStatus::Rejected => "Rejected",
            SettlementStatus::Paid => "Paid",
        }
    }

    pub fn all() -> Vec<SettlementStatus> {
        vec![
            SettlementStatus::Pending,
            SettlementStatus::Approved,
            SettlementStatus::Rejected,
            SettlementStatus::Paid,
        ]
    }
}

/// Merchant settlement over a billing period, awaiting operator review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settlement {
    pub id: i64,
    pub merchant_id: i64,
    pub currency_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub gross_amount: Decimal,
    pub fee_amount: Decimal,
    pub net_amount: Decimal,
    pub status: SettlementStatus,
    pub created_at: DateTime<Utc>,
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub reviewed_by: Option<String>,
    #[serde(default)]
    pub reject_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementListResponse {
    pub settlements: Vec<Settlement>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub total_net_amount: Decimal,
    pub status_stats: Vec<StatusBucket>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectSettlementRequest {
    pub reason: String,
}
