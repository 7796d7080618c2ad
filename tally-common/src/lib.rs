//! # Tally Common Library
//!
//! Shared code for the Tally attendance sync service:
//! - Error types
//! - Configuration loading and root folder resolution
//! - Provider timestamp parsing and local-zone conversion
//! - Database pool and schema initialization

pub mod config;
pub mod db;
pub mod error;
pub mod time;

pub use error::{Error, Result};
