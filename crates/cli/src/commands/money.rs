//! Money movement commands: deposit, withdraw, transfer, transaction list

use anyhow::Result;
use corebank_ledger::{resolve_owned_account, Ledger, TransactionLog, TransferOrchestrator};
use rust_decimal::Decimal;
use std::path::Path;

use crate::db;

/// Deposit funds into an account
pub async fn deposit(
    db_path: &Path,
    holder_id: i64,
    account_id: i64,
    amount: Decimal,
    description: Option<&str>,
) -> Result<()> {
    let pool = db::connect(db_path).await?;

    resolve_owned_account(&pool, holder_id, account_id).await?;
    let txn = Ledger::new(&pool).deposit(account_id, amount, description).await?;

    println!("✅ Deposit committed");
    println!("   Transaction: {}", txn.id);
    println!("   Account:     {account_id}");
    println!("   Amount:      {amount}");

    pool.close().await;
    Ok(())
}

/// Withdraw funds from an account
pub async fn withdraw(
    db_path: &Path,
    holder_id: i64,
    account_id: i64,
    amount: Decimal,
    description: Option<&str>,
) -> Result<()> {
    let pool = db::connect(db_path).await?;

    resolve_owned_account(&pool, holder_id, account_id).await?;
    let txn = Ledger::new(&pool).withdraw(account_id, amount, description).await?;

    println!("✅ Withdrawal committed");
    println!("   Transaction: {}", txn.id);
    println!("   Account:     {account_id}");
    println!("   Amount:      {amount}");

    pool.close().await;
    Ok(())
}

/// Transfer between two accounts of the same holder
pub async fn transfer(
    db_path: &Path,
    holder_id: i64,
    from: i64,
    to: i64,
    amount: Decimal,
    description: Option<&str>,
) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let receipt = TransferOrchestrator::new(&pool)
        .transfer(holder_id, from, to, amount, description)
        .await?;

    println!("✅ Transfer committed");
    println!("   Transaction: {}", receipt.transaction_id);
    println!("   From:        {}", receipt.from_account_id);
    println!("   To:          {}", receipt.to_account_id);
    println!("   Amount:      {}", receipt.amount);
    println!("   At:          {}", receipt.created_at.to_rfc3339());

    pool.close().await;
    Ok(())
}

/// List an account's transactions, newest first
pub async fn transactions(db_path: &Path, holder_id: i64, account_id: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;

    resolve_owned_account(&pool, holder_id, account_id).await?;
    let transactions = TransactionLog::new(&pool).list(account_id, None, None).await?;

    if transactions.is_empty() {
        println!("No transactions on account {account_id}");
    } else {
        println!("Transactions on account {account_id}:");
        for txn in transactions {
            println!(
                "   {:>6}  {}  {:<10}  {:>12}  {}",
                txn.id,
                txn.created_at.format("%Y-%m-%d %H:%M:%S"),
                txn.kind,
                txn.amount,
                txn.description.as_deref().unwrap_or("-")
            );
        }
    }

    pool.close().await;
    Ok(())
}
