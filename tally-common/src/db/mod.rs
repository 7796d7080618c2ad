//! Shared SQLite database access for Tally

pub mod init;

pub use init::{init_database_pool, init_tables};
