//! Domain layer for the tender/bid procurement service.
//!
//! Zero IO: identifiers, closed status enums, the quorum decision rules,
//! version/rollback rules and input parsing live here so the store and the
//! HTTP layer share one definition of each.

pub mod bid;
pub mod error;
pub mod pagination;
pub mod quorum;
pub mod tender;
pub mod types;
pub mod versioning;
