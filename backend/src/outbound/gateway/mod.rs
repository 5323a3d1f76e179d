//! Payment gateway outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `PaymentGateway`
//! port against a hosted-checkout API.

mod dto;
mod http_gateway;

pub use http_gateway::FlutterwaveHttpGateway;
