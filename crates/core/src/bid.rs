//! Bid lifecycle states, decisions and author kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Maximum length of a single feedback entry.
pub const MAX_FEEDBACK_LEN: usize = 1000;

/// Lifecycle state of a bid. `Canceled` means the decision is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    Created,
    Published,
    Canceled,
}

impl BidStatus {
    pub const ALL: [BidStatus; 3] = [BidStatus::Created, BidStatus::Published, BidStatus::Canceled];

    pub fn as_str(self) -> &'static str {
        match self {
            BidStatus::Created => "Created",
            BidStatus::Published => "Published",
            BidStatus::Canceled => "Canceled",
        }
    }

    pub fn is_public(self) -> bool {
        matches!(self, BidStatus::Published)
    }
}

impl fmt::Display for BidStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BidStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Undefined bid status '{s}'")))
    }
}

impl TryFrom<String> for BidStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Recorded outcome of the approval process.
///
/// Stored as `"None"`, `"Approved"` or `"Rejected"`. `Pending` moves to a
/// terminal value at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidDecision {
    #[serde(rename = "None")]
    Pending,
    Approved,
    Rejected,
}

impl BidDecision {
    pub const ALL: [BidDecision; 3] = [
        BidDecision::Pending,
        BidDecision::Approved,
        BidDecision::Rejected,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            BidDecision::Pending => "None",
            BidDecision::Approved => "Approved",
            BidDecision::Rejected => "Rejected",
        }
    }

    pub fn is_final(self) -> bool {
        !matches!(self, BidDecision::Pending)
    }
}

impl fmt::Display for BidDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BidDecision {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BidDecision::ALL
            .into_iter()
            .find(|decision| decision.as_str() == s)
            .ok_or_else(|| CoreError::Validation(format!("Undefined decision '{s}'")))
    }
}

impl TryFrom<String> for BidDecision {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Who submitted a bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorType {
    Organization,
    User,
}

impl AuthorType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthorType::Organization => "Organization",
            AuthorType::User => "User",
        }
    }
}

impl fmt::Display for AuthorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthorType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Organization" => Ok(AuthorType::Organization),
            "User" => Ok(AuthorType::User),
            other => Err(CoreError::Validation(format!(
                "Undefined author type '{other}'"
            ))),
        }
    }
}

impl TryFrom<String> for AuthorType {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validate a feedback text submitted for a bid.
pub fn validate_feedback(text: &str) -> Result<(), CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::Validation("No review provided".into()));
    }
    if text.chars().count() > MAX_FEEDBACK_LEN {
        return Err(CoreError::Validation(format!(
            "Review must be at most {MAX_FEEDBACK_LEN} characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pending_decision_is_stored_as_none() {
        assert_eq!(BidDecision::Pending.as_str(), "None");
        assert_eq!("None".parse::<BidDecision>().unwrap(), BidDecision::Pending);
        assert_eq!(
            serde_json::to_string(&BidDecision::Pending).unwrap(),
            "\"None\""
        );
    }

    #[test]
    fn only_terminal_decisions_are_final() {
        assert!(!BidDecision::Pending.is_final());
        assert!(BidDecision::Approved.is_final());
        assert!(BidDecision::Rejected.is_final());
    }

    #[test]
    fn bid_status_round_trips_through_str() {
        for status in BidStatus::ALL {
            assert_eq!(status.as_str().parse::<BidStatus>().unwrap(), status);
        }
        assert_matches!("Closed".parse::<BidStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn author_type_rejects_unknown_values() {
        assert_eq!("User".parse::<AuthorType>().unwrap(), AuthorType::User);
        assert_eq!(
            AuthorType::try_from("Organization".to_string()).unwrap(),
            AuthorType::Organization
        );
        assert_matches!("user".parse::<AuthorType>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn feedback_must_not_be_blank() {
        assert!(validate_feedback("solid offer").is_ok());
        assert_matches!(validate_feedback("   "), Err(CoreError::Validation(_)));
        let long = "x".repeat(MAX_FEEDBACK_LEN + 1);
        assert_matches!(validate_feedback(&long), Err(CoreError::Validation(_)));
    }
}
