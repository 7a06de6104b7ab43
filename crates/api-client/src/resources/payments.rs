use contracts::common::page::StatusBucket;
use contracts::domain::payments::{
    MarkPaidOrderRefundedRequest, Payment, PaymentListResponse, QueryTimeoutOrderRequest,
    TriggerCallbackRequest, UpdateThirdPartyIdRequest,
};
use rust_decimal::Decimal;

use crate::config::VERIFY_SECRET_HEADER;
use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::http::ApiRequest;
use crate::query::{FilterParams, Paged, ResourceQuery};

#[derive(Debug, Clone, Default)]
pub struct PaymentAggregates {
    pub total_amount: Decimal,
    pub status_stats: Vec<StatusBucket>,
}

pub struct PaymentsQuery;

impl ResourceQuery for PaymentsQuery {
    type Item = Payment;
    type Stats = PaymentAggregates;

    const ACTION: &'static str = "view payments";
    const ENDPOINT: &'static str = "/payments";
    // The payments endpoint names its status parameter `order_status`.
    const PARAMS: FilterParams = FilterParams {
        status: "order_status",
        ..FilterParams::DEFAULT
    };

    fn decode_page(body: &str) -> Result<(Paged<Payment>, PaymentAggregates), ApiError> {
        let response: PaymentListResponse =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let stats = PaymentAggregates {
            total_amount: response.total_amount,
            status_stats: response.status_stats,
        };
        Ok((Paged::from_parts(response.payments, &response.meta), stats))
    }
}

pub async fn get_payment(gateway: &GatewayClient, order_no: &str) -> Result<Payment, ApiError> {
    gateway
        .request_json(ApiRequest::get(format!(
            "/payments/{}",
            urlencoding::encode(order_no)
        )))
        .await
}

/// Re-send the merchant callback for an order.
pub async fn trigger_callback(gateway: &GatewayClient, order_no: &str) -> Result<Payment, ApiError> {
    let request = ApiRequest::post(
        "/payments/trigger-callback",
        &TriggerCallbackRequest {
            order_no: order_no.to_string(),
        },
    )?;
    gateway.request_json(request).await
}

/// Re-query the provider for a timed-out order. Carries the static
/// verification secret in addition to the session credential.
pub async fn query_timeout_order(
    gateway: &GatewayClient,
    order_no: &str,
) -> Result<Payment, ApiError> {
    let request = ApiRequest::post(
        "/payments/query-timeout-order",
        &QueryTimeoutOrderRequest {
            order_no: order_no.to_string(),
        },
    )?
    .with_header(VERIFY_SECRET_HEADER, gateway.config().verify_secret.clone());
    gateway.request_json(request).await
}

pub async fn mark_paid_order_refunded(
    gateway: &GatewayClient,
    order_no: &str,
) -> Result<Payment, ApiError> {
    let request = ApiRequest::post(
        "/payments/mark-paid-order-refunded",
        &MarkPaidOrderRefundedRequest {
            order_no: order_no.to_string(),
        },
    )?;
    gateway.request_json(request).await
}

pub async fn update_third_party_id(
    gateway: &GatewayClient,
    order_no: &str,
    third_party_id: &str,
) -> Result<Payment, ApiError> {
    let request = ApiRequest::post(
        "/payments/update-third-party-id",
        &UpdateThirdPartyIdRequest {
            order_no: order_no.to_string(),
            third_party_id: third_party_id.to_string(),
        },
    )?;
    gateway.request_json(request).await
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use chrono::NaiveDate;

    use super::*;
    use crate::query::{Filter, QueryController};
    use crate::storage::MemoryStorage;
    use crate::testing::{test_gateway, MockTransport};

    fn sample_page() -> String {
        serde_json::json!({
            "payments": [{
                "id": 1,
                "order_no": "PAY-001",
                "third_party_id": "tp-9",
                "merchant_id": 3,
                "provider_id": 2,
                "payment_method_id": 1,
                "currency_id": 2,
                "amount": "150.00",
                "fee": "4.50",
                "status": "pending",
                "callback_status": null,
                "created_at": "2024-01-01T08:30:00Z",
                "paid_at": null
            }],
            "total": 41,
            "page": 1,
            "per_page": 20,
            "total_pages": 3,
            "total_amount": "6150.00",
            "status_stats": [
                {"status": "pending", "count": 40, "amount": "6000.00"},
                {"status": "paid", "count": 1, "amount": "150.00"}
            ]
        })
        .to_string()
    }

    #[test]
    fn decodes_page_and_passes_aggregates_through() {
        let (page, stats) = PaymentsQuery::decode_page(&sample_page()).unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].order_no, "PAY-001");
        assert_eq!(page.total, 41);
        // Server invariants hold on a well-formed page.
        assert_eq!(page.total_pages, (page.total + 19) / 20);
        assert!(page.items.len() <= 20);
        // Aggregates are pass-through, not recomputed from the page.
        assert_eq!(stats.total_amount.to_string(), "6150.00");
        assert_eq!(stats.status_stats.len(), 2);
    }

    #[tokio::test]
    async fn list_request_uses_the_order_status_parameter_name() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = Rc::new(test_gateway(&transport, &storage, Rc::new(|| {})));
        let ctrl = QueryController::<PaymentsQuery>::new(gateway);

        ctrl.set_filter(Filter::StartDate(Some(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )));
        ctrl.set_filter(Filter::EndDate(Some(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        )));
        ctrl.set_filter(Filter::Status(Some("pending".to_string())));
        ctrl.set_filter(Filter::Currency(Some(2)));

        transport.push_ok(200, &sample_page());
        ctrl.fetch().await;

        let mut query = transport.take_requests()[0].query.clone();
        query.sort();
        let mut expected = vec![
            ("page".to_string(), "1".to_string()),
            ("per_page".to_string(), "20".to_string()),
            ("order_status".to_string(), "pending".to_string()),
            ("currency_id".to_string(), "2".to_string()),
            ("start_date".to_string(), "2024-01-01T00:00".to_string()),
            ("end_date".to_string(), "2024-01-01T23:59".to_string()),
        ];
        expected.sort();
        assert_eq!(query, expected);
    }

    #[tokio::test]
    async fn query_timeout_order_carries_the_verification_secret() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(
            200,
            &serde_json::json!({
                "id": 1,
                "order_no": "PAY-001",
                "third_party_id": null,
                "merchant_id": 3,
                "provider_id": 2,
                "payment_method_id": 1,
                "currency_id": 2,
                "amount": "150.00",
                "fee": "4.50",
                "status": "paid",
                "created_at": "2024-01-01T08:30:00Z",
                "paid_at": "2024-01-01T08:31:00Z"
            })
            .to_string(),
        );
        query_timeout_order(&gateway, "PAY-001").await.unwrap();

        let sent = transport.take_requests();
        assert!(sent[0]
            .headers
            .contains(&("X-Verify-Secret".to_string(), "secret-42".to_string())));
    }

    #[tokio::test]
    async fn trigger_callback_does_not_carry_the_secret() {
        let transport = Rc::new(MockTransport::new());
        let storage = Rc::new(MemoryStorage::new());
        let gateway = test_gateway(&transport, &storage, Rc::new(|| {}));

        transport.push_ok(
            200,
            &serde_json::json!({
                "id": 1,
                "order_no": "PAY-001",
                "third_party_id": null,
                "merchant_id": 3,
                "provider_id": 2,
                "payment_method_id": 1,
                "currency_id": 2,
                "amount": "150.00",
                "fee": "4.50",
                "status": "paid",
                "created_at": "2024-01-01T08:30:00Z",
                "paid_at": null
            })
            .to_string(),
        );
        trigger_callback(&gateway, "PAY-001").await.unwrap();

        let sent = transport.take_requests();
        assert!(!sent[0]
            .headers
            .iter()
            .any(|(name, _)| name == "X-Verify-Secret"));
    }
}
