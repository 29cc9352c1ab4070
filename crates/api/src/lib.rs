//! Tenderhub API server library.
//!
//! Exposes configuration, state, error handling, the engines and the router
//! so integration tests and the binary entrypoint can both access them.

pub mod config;
pub mod engine;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod query;
pub mod router;
pub mod routes;
pub mod state;
