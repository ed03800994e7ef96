//! Core client infrastructure.
//!
//! - [`config`] - Configuration building, file loading, and validation
//! - [`error`] - Error taxonomy shared by every operation

pub mod config;
pub mod error;
