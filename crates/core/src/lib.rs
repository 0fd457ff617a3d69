//! # Corebank Core
//!
//! Domain types for the Corebank back office. Pure data and balance rules,
//! no I/O: persistence lives in `corebank-persistence`, the transactional
//! ledger operations in `corebank-ledger`.

pub mod account;
pub mod card;
pub mod error;
pub mod holder;
pub mod transaction;

pub use account::{Account, AccountType};
pub use card::{Card, CardBrand};
pub use error::{CoreError, CoreResult};
pub use holder::{AccountHolder, Role};
pub use transaction::{Transaction, TransactionKind};
