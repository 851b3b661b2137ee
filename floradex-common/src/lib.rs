//! Shared types for floradex services
//!
//! Holds the error taxonomy and configuration-file plumbing used by the
//! floradex-id web service.

pub mod config;
pub mod error;

pub use error::{Error, Result};
