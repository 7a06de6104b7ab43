//! Reference lists for filter dropdowns, fetched through the gateway.

use contracts::domain::refdata::{Currency, Merchant, PaymentMethod, Provider};

use crate::error::ApiError;
use crate::gateway::GatewayClient;
use crate::http::ApiRequest;

pub async fn fetch_merchants(gateway: &GatewayClient) -> Result<Vec<Merchant>, ApiError> {
    gateway.request_json(ApiRequest::get("/merchants")).await
}

pub async fn fetch_providers(gateway: &GatewayClient) -> Result<Vec<Provider>, ApiError> {
    gateway.request_json(ApiRequest::get("/providers")).await
}

pub async fn fetch_payment_methods(
    gateway: &GatewayClient,
) -> Result<Vec<PaymentMethod>, ApiError> {
    gateway
        .request_json(ApiRequest::get("/payment-methods"))
        .await
}

pub async fn fetch_currencies(gateway: &GatewayClient) -> Result<Vec<Currency>, ApiError> {
    gateway.request_json(ApiRequest::get("/currencies")).await
}
