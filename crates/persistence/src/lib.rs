//! # Corebank Persistence
//!
//! SQLite persistence for Corebank. Four tables (`account_holders`,
//! `accounts`, `transactions`, `cards`) accessed through repository types;
//! decimals are stored as TEXT and parsed on read.
//!
//! The pool is capped at a single connection. Together with one sqlx
//! transaction per mutating ledger operation this serializes conflicting
//! writers, which is what makes the check-then-update sections in
//! `corebank-ledger` safe against lost updates.

pub mod error;
pub mod sqlite;

pub use error::{PersistenceError, PersistenceResult};
pub use sqlite::repos::{
    create_pool, init_database, AccountRepo, CardRepo, HolderRepo, NewCard, NewTransaction,
    TransactionRepo,
};
pub use sqlite::schema::{AccountRow, CardRow, HolderRow, TransactionRow};
