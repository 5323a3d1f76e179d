//! Outbound adapters implementing the domain's driven ports.
//!
//! - **persistence**: PostgreSQL repositories via Diesel with async pooling
//! - **gateway**: HTTP client for the hosted payment gateway
//!
//! Adapters translate between domain types and infrastructure
//! representations; they contain no business logic.

pub mod gateway;
pub mod persistence;
