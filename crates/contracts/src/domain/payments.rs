use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::page::{PageMeta, StatusBucket};

/// Lifecycle states of a payment order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Failed,
    Refunded,
    Timeout,
}

impl PaymentStatus {
    pub fn code(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
            PaymentStatus::Timeout => "timeout",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::Timeout => "Timeout",
        }
    }

    pub fn all() -> Vec<PaymentStatus> {
        vec![
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
            PaymentStatus::Timeout,
        ]
    }
}

/// Payment order as listed by the admin API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    /// Merchant-facing order number, the identifying field for mutations.
    pub order_no: String,
    /// Order id on the provider side, absent until the provider acks.
    pub third_party_id: Option<String>,
    pub merchant_id: i64,
    pub provider_id: i64,
    pub payment_method_id: i64,
    pub currency_id: i64,
    pub amount: Decimal,
    pub fee: Decimal,
    pub status: PaymentStatus,
    #[serde(default)]
    pub callback_status: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentListResponse {
    pub payments: Vec<Payment>,
    #[serde(flatten)]
    pub meta: PageMeta,
    pub total_amount: Decimal,
    pub status_stats: Vec<StatusBucket>,
}

// =============================================================================
// Mutation DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerCallbackRequest {
    pub order_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryTimeoutOrderRequest {
    pub order_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkPaidOrderRefundedRequest {
    pub order_no: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateThirdPartyIdRequest {
    pub order_no: String,
    pub third_party_id: String,
}
