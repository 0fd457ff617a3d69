//! CLI command implementations, one module per command family.

pub mod account;
pub mod card;
pub mod holder;
pub mod money;
pub mod statement;
