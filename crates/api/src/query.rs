//! Query parameter types for API handlers.
//!
//! Every value arrives as an optional string and is validated by the
//! engines, so a missing identity or a malformed number produces the
//! domain error rather than a generic deserialization failure.

use serde::Deserialize;
use tenderhub_core::error::CoreError;
use tenderhub_core::pagination::{parse_page, Page};

/// `?username=`
#[derive(Debug, Default, Deserialize)]
pub struct UserParams {
    pub username: Option<String>,
}

/// `?limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl PaginationParams {
    /// Validate both values as non-negative integers.
    pub fn to_page(&self) -> Result<Page, CoreError> {
        parse_page(self.limit.as_deref(), self.offset.as_deref())
    }
}

/// `GET /tenders?service_type=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct TenderListParams {
    pub service_type: Option<String>,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// `?username=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
pub struct UserListParams {
    pub username: Option<String>,
    #[serde(flatten)]
    pub page: PaginationParams,
}

/// `PUT .../status?status=&username=`
#[derive(Debug, Default, Deserialize)]
pub struct StatusParams {
    pub status: Option<String>,
    pub username: Option<String>,
}

/// `PUT /bids/{id}/submit_decision?decision=&username=`
#[derive(Debug, Default, Deserialize)]
pub struct DecisionParams {
    pub decision: Option<String>,
    pub username: Option<String>,
}

/// `PUT /bids/{id}/feedback?bidFeedback=&username=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackParams {
    pub bid_feedback: Option<String>,
    pub username: Option<String>,
}

/// `GET /bids/{tenderId}/reviews?authorUsername=&requesterUsername=&limit=&offset=`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub author_username: Option<String>,
    pub requester_username: Option<String>,
    #[serde(flatten)]
    pub page: PaginationParams,
}
