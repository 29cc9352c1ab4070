//! Quorum rules for bid decisions.
//!
//! A bid starts with decision `None`. One `Rejected` vote finalizes it
//! immediately. `Approved` votes accumulate in `approved_count` until the
//! quorum target is reached, at which point the bid is finalized as
//! `Approved`. Either terminal decision moves the bid to `Canceled`.
//!
//! These functions only decide *what* happens; the caller persists the
//! outcome (snapshot first, then update) inside one store transaction.

use std::fmt;
use std::str::FromStr;

use crate::bid::{BidDecision, BidStatus};
use crate::error::CoreError;

/// Quorum never requires more approving votes than this.
pub const MAX_QUORUM: i32 = 3;

/// A vote as submitted by a responsible employee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Approved,
    Rejected,
}

impl Verdict {
    pub fn as_decision(self) -> BidDecision {
        match self {
            Verdict::Approved => BidDecision::Approved,
            Verdict::Rejected => BidDecision::Rejected,
        }
    }

    /// Parse the optional `decision` request parameter.
    pub fn parse_param(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw.filter(|s| !s.is_empty()) {
            None => Err(CoreError::Validation("No decision provided".into())),
            Some(s) => s.parse(),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_decision().as_str())
    }
}

impl FromStr for Verdict {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Approved" => Ok(Verdict::Approved),
            "Rejected" => Ok(Verdict::Rejected),
            other => Err(CoreError::Validation(format!("Undefined decision '{other}'"))),
        }
    }
}

/// Number of approving votes needed to finalize a bid.
///
/// Capped at [`MAX_QUORUM`], and shrinks for organizations with fewer
/// responsible employees than that.
pub fn quorum_target(responsible_count: i64) -> i32 {
    // Bounded by MAX_QUORUM, so the narrowing cast is lossless.
    responsible_count.clamp(0, i64::from(MAX_QUORUM)) as i32
}

/// Fail unless the bid can still receive votes.
pub fn ensure_open(decision: BidDecision, status: BidStatus) -> Result<(), CoreError> {
    if decision.is_final() {
        return Err(CoreError::Validation("Decision already made".into()));
    }
    if status == BidStatus::Canceled {
        return Err(CoreError::Validation(
            "Bid is canceled and no longer accepts decisions".into(),
        ));
    }
    Ok(())
}

/// What a vote does to the bid's live fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The decision becomes terminal; the bid is canceled and its tender closed.
    Finalized {
        decision: BidDecision,
        approved_count: i32,
    },
    /// The vote counts toward quorum; the decision stays `None`.
    Recorded { approved_count: i32 },
}

impl DecisionOutcome {
    pub fn is_final(&self) -> bool {
        matches!(self, DecisionOutcome::Finalized { .. })
    }

    pub fn approved_count(&self) -> i32 {
        match *self {
            DecisionOutcome::Finalized { approved_count, .. }
            | DecisionOutcome::Recorded { approved_count } => approved_count,
        }
    }

    /// The decision to store after applying this outcome.
    pub fn decision(&self) -> BidDecision {
        match *self {
            DecisionOutcome::Finalized { decision, .. } => decision,
            DecisionOutcome::Recorded { .. } => BidDecision::Pending,
        }
    }

    /// The status to store after applying this outcome, given the current one.
    pub fn status(&self, current: BidStatus) -> BidStatus {
        match self {
            DecisionOutcome::Finalized { .. } => BidStatus::Canceled,
            DecisionOutcome::Recorded { .. } => current,
        }
    }
}

/// Plan the effect of a vote on a bid with `approved_count` votes so far.
///
/// A rejection vetoes immediately. The rejecting vote is counted as `-1` and
/// the finalizing write adds the usual `+1`, so the stored count is left as
/// it was. An approval finalizes once `approved_count + 1` reaches `quorum`.
pub fn plan(verdict: Verdict, approved_count: i32, quorum: i32) -> DecisionOutcome {
    match verdict {
        Verdict::Rejected => {
            let vetoed = approved_count - 1;
            DecisionOutcome::Finalized {
                decision: BidDecision::Rejected,
                approved_count: vetoed + 1,
            }
        }
        Verdict::Approved => {
            let approved_count = approved_count + 1;
            if approved_count >= quorum {
                DecisionOutcome::Finalized {
                    decision: BidDecision::Approved,
                    approved_count,
                }
            } else {
                DecisionOutcome::Recorded { approved_count }
            }
        }
    }
}
