//! Session-aware API client for the payment admin console.
//!
//! Everything the console sends to the backend goes through the
//! [`gateway::GatewayClient`]; credential attachment and 401 handling live
//! there as pipeline stages, so no call site repeats them. List pages are
//! driven by one generic [`query::QueryController`] parameterized per
//! resource. Browser bindings are `wasm32`-gated; the crate builds and
//! tests natively against an in-memory storage and a mock transport.

pub mod config;
pub mod error;
pub mod gateway;
pub mod http;
pub mod permission;
pub mod query;
pub mod resources;
pub mod session;
pub mod storage;

#[cfg(target_arch = "wasm32")]
pub mod fetch;

#[cfg(test)]
pub(crate) mod testing;
