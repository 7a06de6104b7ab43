use contracts::common::page::StatusBucket;
use contracts::domain::settlements::{
    RejectSettlementRequest, Settlement, SettlementListResponse,
};
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::http::ApiRequest;
use crate::query::{FilterParams, Paged, ResourceQuery};

#[derive(Debug, Clone, Default)]
pub struct SettlementAggregates {
    pub total_net_amount: Decimal,
    pub status_stats: Vec<StatusBucket>,
}

pub struct SettlementsQuery;

impl ResourceQuery for SettlementsQuery {
    type Item = Settlement;
    type Stats = SettlementAggregates;

    const ACTION: &'static str = "view settlements";
    const ENDPOINT: &'static str = "/settlements";
    const PARAMS: FilterParams = FilterParams::DEFAULT;

    fn decode_page(body: &str) -> Result<(Paged<Settlement>, SettlementAggregates), ApiError> {
        let response: SettlementListResponse =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let stats = SettlementAggregates {
            total_net_amount: response.total_net_amount,
            status_stats: response.status_stats,
        };
        Ok((
            Paged::from_parts(response.settlements, &response.meta),
            stats,
        ))
    }
}

pub async fn approve_settlement(gateway: &GatewayClient, id: i64) -> Result<Settlement, ApiError> {
    gateway
        .request_json(ApiRequest::post_empty(format!(
            "/settlements/{}/approve",
            id
        )))
        .await
}

pub async fn reject_settlement(
    gateway: &GatewayClient,
    id: i64,
    reason: &str,
) -> Result<Settlement, ApiError> {
    let request = ApiRequest::post(
        format!("/settlements/{}/reject", id),
        &RejectSettlementRequest {
            reason: reason.to_string(),
        },
    )?;
    gateway.request_json(request).await
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::storage::MemoryStorage;
    use crate::testing::{test_gateway, MockTransport};

    fn settlement_body() -> String {
        serde_json::json!({
            "id": 4,
            "merchant_id": 3,
            "currency_id": 1,
            "period_start": "2024-03-01",
            "period_end": "2024-03-07",
            "gross_amount": "1000.00",
            "fee_amount": "30.00",
            "net_amount": "970.00",
            "status": "approved",
            "created_at": "2024-03-08T00:10:00Z",
            "reviewed_at": "2024-03-08T09:00:00Z",
            "reviewed_by": "ops",
            "reject_reason": null
        })
        .to_string()
    }

    #[tokio::test]
    async fn approve_posts_to_the_settlement_action_path() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(200, &settlement_body());
        let settlement = approve_settlement(&gateway, 4).await.unwrap();

        assert_eq!(settlement.id, 4);
        let sent = transport.take_requests();
        assert_eq!(sent[0].path, "/settlements/4/approve");
        assert!(sent[0].body.is_none());
    }

    #[tokio::test]
    async fn reject_sends_the_reason_payload() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(200, &settlement_body());
        reject_settlement(&gateway, 4, "amount mismatch").await.unwrap();

        let sent = transport.take_requests();
        assert_eq!(sent[0].path, "/settlements/4/reject");
        assert_eq!(
            sent[0].body.as_ref().unwrap()["reason"],
            serde_json::json!("amount mismatch")
        );
    }
}
