//! Account management commands

use anyhow::Result;
use corebank_core::AccountType;
use corebank_ledger::resolve_owned_account;
use corebank_persistence::{AccountRepo, HolderRepo};
use std::path::Path;

use crate::db;

/// Open a new account for a holder
pub async fn create(db_path: &Path, holder_id: i64, account_type: AccountType) -> Result<()> {
    let pool = db::connect(db_path).await?;

    // existence check up front for a readable error
    let holder = HolderRepo::get_by_id(&pool, holder_id).await?;
    let account_id = AccountRepo::insert(&pool, holder.id, account_type.as_str()).await?;

    println!("✅ Account opened");
    println!("   Id:      {account_id}");
    println!("   Type:    {account_type}");
    println!("   Holder:  {} <{}>", holder.id, holder.email);
    println!("   Balance: 0");

    pool.close().await;
    Ok(())
}

/// List a holder's accounts
pub async fn list(db_path: &Path, holder_id: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let rows = AccountRepo::list_by_holder(&pool, holder_id).await?;
    if rows.is_empty() {
        println!("No accounts for holder {holder_id}");
    } else {
        println!("Accounts for holder {holder_id}:");
        for row in rows {
            println!(
                "   {:>4}  {:<8}  balance {}",
                row.id, row.account_type, row.balance
            );
        }
    }

    pool.close().await;
    Ok(())
}

/// Show one account the holder owns
pub async fn show(db_path: &Path, holder_id: i64, account_id: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let account = resolve_owned_account(&pool, holder_id, account_id).await?;

    println!("Account {}", account.id);
    println!("   Type:    {}", account.account_type);
    println!("   Balance: {}", account.balance);
    println!("   Opened:  {}", account.created_at.to_rfc3339());
    if let Some(updated) = account.updated_at {
        println!("   Updated: {}", updated.to_rfc3339());
    }

    pool.close().await;
    Ok(())
}
