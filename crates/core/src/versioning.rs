//! Version counter rules shared by tenders and bids.
//!
//! Every mutation snapshots the entity at its current version and then
//! writes the live row with `version + 1`. A rollback is a mutation like any
//! other: it copies content fields from an older snapshot and still moves the
//! counter forward.

use crate::error::CoreError;

/// Version assigned to a freshly created tender or bid.
pub const INITIAL_VERSION: i32 = 1;

/// The version a live row takes after a mutation from `current`.
pub fn next_version(current: i32) -> i32 {
    current + 1
}

/// Parse a rollback target from a path segment.
pub fn parse_target_version(raw: &str) -> Result<i32, CoreError> {
    match raw.parse::<i32>() {
        Ok(version) if version >= INITIAL_VERSION => Ok(version),
        _ => Err(CoreError::Validation(format!("Invalid version '{raw}'"))),
    }
}

/// Which kind of entity a snapshot belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Tender,
    Bid,
}

impl EntityKind {
    /// Entity name used in not-found errors for a missing snapshot.
    pub fn version_entity(self) -> &'static str {
        match self {
            EntityKind::Tender => "TenderVersion",
            EntityKind::Bid => "BidVersion",
        }
    }
}
