//! Actix middleware for the HTTP surface.

pub mod trace;
