//! # paylink-gateway
//!
//! HTTP implementations of the `paylink-core` gateway traits: the
//! verify name lookup, the payment submission call, and the transaction
//! status reads the poller consumes. One `HttpGateway` covers all three
//! over a shared `reqwest` client.

mod config;
mod http;

pub use config::GatewayConfig;
pub use http::HttpGateway;
