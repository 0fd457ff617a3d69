//! SQLite persistence module
//!
//! Repository pattern for SQLite database access.

pub mod repos;
pub mod schema;

pub use repos::{
    create_pool, init_database, AccountRepo, CardRepo, HolderRepo, NewCard, NewTransaction,
    TransactionRepo,
};
pub use schema::{AccountRow, CardRow, HolderRow, TransactionRow};
