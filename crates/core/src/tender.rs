//! Tender lifecycle states.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle state of a tender.
///
/// Only `Published` tenders are visible outside the owning organization.
/// `Closed` is reached either by an explicit status edit or as the side
/// effect of a finalized bid decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TenderStatus {
    Created,
    Published,
    Closed,
}

impl TenderStatus {
    pub const ALL: [TenderStatus; 3] = [
        TenderStatus::Created,
        TenderStatus::Published,
        TenderStatus::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TenderStatus::Created => "Created",
            TenderStatus::Published => "Published",
            TenderStatus::Closed => "Closed",
        }
    }

    /// Whether non-members of the owning organization may see the tender.
    pub fn is_public(self) -> bool {
        matches!(self, TenderStatus::Published)
    }
}

impl fmt::Display for TenderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TenderStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TenderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Undefined tender status '{s}'")))
    }
}

impl TryFrom<String> for TenderStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
