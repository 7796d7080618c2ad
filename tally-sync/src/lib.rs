//! tally-sync library interface
//!
//! Exposes the sync pipeline for integration testing

pub mod config;
pub mod db;
pub mod models;
pub mod services;

pub use models::{SyncOutcome, SyncReport};
pub use services::SyncOrchestrator;
