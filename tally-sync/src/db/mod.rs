//! Database access for tally-sync
//!
//! Pool creation and schema live in `tally_common::db`; this module holds
//! the per-table accessors the sync pass uses.

pub mod checkins;
pub mod employees;
pub mod settings;

pub use tally_common::db::{init_database_pool, init_tables};
