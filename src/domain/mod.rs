//! Domain layer for ragloom
//!
//! This module contains core models, errors and the port traits that
//! infrastructure adapters implement.

pub mod errors;
pub mod models;
pub mod ports;

// Re-export error types for convenient access
pub use errors::{DomainError, DomainResult};
