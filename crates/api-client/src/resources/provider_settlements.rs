use contracts::domain::provider_settlements::{
    ProviderSettlement, ProviderSettlementListResponse,
};
use rust_decimal::Decimal;

use crate::error::ApiError;
use crate::query::{FilterParams, Paged, ResourceQuery};

#[derive(Debug, Clone, Default)]
pub struct ProviderSettlementAggregates {
    pub total_delta: Decimal,
}

pub struct ProviderSettlementsQuery;

impl ResourceQuery for ProviderSettlementsQuery {
    type Item = ProviderSettlement;
    type Stats = ProviderSettlementAggregates;

    const ACTION: &'static str = "view provider settlements";
    const ENDPOINT: &'static str = "/provider-settlements";
    const PARAMS: FilterParams = FilterParams::DEFAULT;

    fn decode_page(
        body: &str,
    ) -> Result<(Paged<ProviderSettlement>, ProviderSettlementAggregates), ApiError> {
        let response: ProviderSettlementListResponse =
            serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let stats = ProviderSettlementAggregates {
            total_delta: response.total_delta,
        };
        Ok((
            Paged::from_parts(response.provider_settlements, &response.meta),
            stats,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_page_with_delta_aggregate() {
        let body = serde_json::json!({
            "provider_settlements": [{
                "id": 2,
                "provider_id": 5,
                "currency_id": 1,
                "period_start": "2024-03-01",
                "period_end": "2024-03-07",
                "expected_amount": "5000.00",
                "reported_amount": "4990.00",
                "delta": "-10.00",
                "status": "discrepancy",
                "created_at": "2024-03-08T00:10:00Z"
            }],
            "total": 1,
            "page": 1,
            "per_page": 20,
            "total_pages": 1,
            "total_delta": "-10.00"
        })
        .to_string();

        let (page, stats) = ProviderSettlementsQuery::decode_page(&body).unwrap();
        assert_eq!(page.items[0].id, 2);
        assert_eq!(stats.total_delta.to_string(), "-10.00");
    }
}
