//! Axum handlers. Each one extracts its parameters, calls an engine
//! operation and serializes the result.

pub mod bids;
pub mod ping;
pub mod reviews;
pub mod tenders;
