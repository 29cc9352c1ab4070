//! Request engines.
//!
//! Each engine takes the [`Store`](tenderhub_db::Store) handle explicitly
//! and returns domain values or an [`AppError`](crate::error::AppError).
//! Handlers stay thin: extract parameters, call one engine function,
//! serialize the result.
//!
//! Precondition order is the same everywhere: identity (401), then the
//! target entity (404), then rights (403), then request parameters (400).
//! Mutations re-read the live row under lock inside a transaction before
//! snapshotting and updating it.

pub mod bids;
pub mod decision;
pub mod gate;
pub mod reviews;
pub mod rollback;
pub mod tenders;
pub mod versions;

#[cfg(test)]
pub(crate) mod fixtures;
