pub mod bid;
pub mod organization;
pub mod review;
pub mod tender;
