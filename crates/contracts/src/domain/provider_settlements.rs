use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::page::PageMeta;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSettlementStatus {
    Pending,
    Matched,
    Discrepancy,
    Closed,
}

impl ProviderSettlementStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ProviderSettlementStatus::Pending => "pending",
            ProviderSettlementStatus::Matched => "matched",
            ProviderSettlementStatus::Discrepancy => "discrepancy",
            ProviderSettlementStatus::Closed => "closed",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderSettlementStatus::Pending => "Pending",
            ProviderSettlementStatus::Matched => "Matched",
            ProviderSettlementStatus::Discrepancy => "Discrepancy",
            ProviderSettlementStatus::Closed => "Closed",
        }
    }

    pub fn all() -> Vec<ProviderSettlementStatus> {
        vec![
            ProviderSettlementStatus::Pending,
            ProviderSettlementStatus::Matched,
            ProviderSettlementStatus::Discrepancy,
            ProviderSettlementStatus::Closed,
        ]
    }
}

/// Reconciliation record between our ledger and a provider statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettlement {
    pub id: i64,
    pub provider_id: i64,
    pub currency_id: i64,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Amount our ledger expects for the period.
    pub expected_amount: Decimal,
    /// Amount the provider statement reports.
    pub reported_amount: Decimal,
    pub delta: Decimal,
    pub status: ProviderSettlementStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettlementListResponse {
    pub provider_settlements: Vec<ProviderSettlement>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub total_delta: Decimal,
}
