use contracts::common::page::{AckResponse, StatusBucket};
use contracts::domain::disbursements::{
    Disbursement, DisbursementListResponse, RepushDisbursementOrderRequest,
};
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::http::ApiRequest;
use crate::query::{FilterParams, Paged, ResourceQuery};

#[derive(Debug, Clone, Default)]
pub struct DisbursementAggregates {
    pub total_amount: Decimal,
    pub status_stats: Vec<StatusBucket>,
}

pub struct DisbursementsQuery;

impl ResourceQuery for DisbursementsQuery {
    type Item = Disbursement;
    type Stats = DisbursementAggregates;

    const ACTION: &'static str = "view disbursements";
    const ENDPOINT: &'static str = "/disbursements";
    const PARAMS: FilterParams = FilterParams::DEFAULT;

    fn decode_page(body: &str) -> Result<(Paged<Disbursement>, DisbursementAggregates), ApiError> {
        let response: DisbursementListResponse =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let stats = DisbursementAggregates {
            total_amount: response.total_amount,
            status_stats: response.status_stats,
        };
        Ok((
            Paged::from_parts(response.disbursements, &response.meta),
            stats,
        ))
    }
}

pub async fn get_disbursement(
    gateway: &GatewayClient,
    order_no: &str,
) -> Result<Disbursement, ApiError> {
    gateway
        .request_json(ApiRequest::get(format!(
            "/disbursements/{}",
            urlencoding::encode(order_no)
        )))
        .await
}

/// Push a stuck disbursement order to the provider again. The backend
/// answers with a bare success indicator, not the mutated resource.
pub async fn repush_disbursement_order(
    gateway: &GatewayClient,
    order_no: &str,
) -> Result<AckResponse, ApiError> {
    let request = ApiRequest::post(
        "/disbursements/repush-disbursement-order",
        &RepushDisbursementOrderRequest {
            order_no: order_no.to_string(),
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

    #[tokio::test]
    async fn repush_returns_the_bare_success_indicator() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(200, r#"{"success": true, "message": "queued"}"#);
        let ack = repush_disbursement_order(&gateway, "DSB-100").await.unwrap();

        assert!(ack.success);
        assert_eq!(ack.message.as_deref(), Some("queued"));
        let sent = transport.take_requests();
        assert_eq!(sent[0].path, "/disbursements/repush-disbursement-order");
        assert_eq!(
            sent[0].body.as_ref().unwrap()["order_no"],
            serde_json::json!("DSB-100")
        );
    }

    #[test]
    fn decodes_page_with_aggregates() {
        let body = serde_json::json!({
            "disbursements": [{
                "id": 11,
                "order_no": "DSB-100",
                "third_party_id": null,
                "merchant_id": 3,
                "provider_id": 5,
                "currency_id": 1,
                "amount": "900.00",
                "fee": "9.00",
                "status": "processing",
                "bank_account_no": "****1234",
                "created_at": "2024-02-02T10:00:00Z",
                "completed_at": null
            }],
            "total": 1,
            "page": 1,
            "per_page": 20,
            "total_pages": 1,
            "total_amount": "900.00",
            "status_stats": [{"status": "processing", "count": 1, "amount": "900.00"}]
        })
        .to_string();

        let (page, stats) = DisbursementsQuery::decode_page(&body).unwrap();
        assert_eq!(page.items[0].order_no, "DSB-100");
        assert_eq!(stats.status_stats[0].count, 1);
    }
}
