//! # Corebank Statements
//!
//! Read-side aggregation over the transaction log: what happened on an
//! account in a window, and where does that leave it. Pure queries, no
//! mutation; each aggregation reads inside one sqlx transaction so balance
//! and log always describe the same snapshot, and results are identical
//! across repeated calls with no intervening writes.

pub mod statement;
pub mod summary;

pub use statement::{Statement, StatementAggregator, DEFAULT_WINDOW_DAYS};
pub use summary::{AccountSummary, RECENT_LIMIT};
