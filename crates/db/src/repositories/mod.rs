//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async query methods.
//! Methods are generic over [`sqlx::PgExecutor`] so the same query runs
//! against the pool or inside an open transaction.

pub mod bid_approve_repo;
pub mod bid_repo;
pub mod bid_review_repo;
pub mod bid_version_repo;
pub mod employee_repo;
pub mod organization_repo;
pub mod tender_repo;
pub mod tender_version_repo;

pub use bid_approve_repo::BidApproveRepo;
pub use bid_repo::BidRepo;
pub use bid_review_repo::BidReviewRepo;
pub use bid_version_repo::BidVersionRepo;
pub use employee_repo::EmployeeRepo;
pub use organization_repo::OrganizationRepo;
pub use tender_repo::TenderRepo;
pub use tender_version_repo::TenderVersionRepo;
