//! Statement and summary commands

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use corebank_ledger::resolve_owned_account;
use corebank_statements::StatementAggregator;
use std::path::Path;

use crate::db;
use crate::OutputFormat;

fn parse_day_start(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {s}"))?;
    Ok(date
        .and_hms_opt(0, 0, 0)
        .expect("midnight is always valid")
        .and_utc())
}

fn parse_day_end(s: &str) -> Result<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {s}"))?;
    Ok(date
        .and_hms_opt(23, 59, 59)
        .expect("end of day is always valid")
        .and_utc())
}

/// Print an account statement for a window
pub async fn statement(
    db_path: &Path,
    holder_id: i64,
    account_id: i64,
    start: Option<&str>,
    end: Option<&str>,
    format: OutputFormat,
) -> Result<()> {
    let pool = db::connect(db_path).await?;

    resolve_owned_account(&pool, holder_id, account_id).await?;

    let start = start.map(parse_day_start).transpose()?;
    let end = end.map(parse_day_end).transpose()?;

    let statement = StatementAggregator::new(&pool)
        .statement(account_id, start, end)
        .await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&statement)?),
        OutputFormat::Text => {
            println!("📄 Statement for account {}", statement.account_id);
            println!(
                "   Window: {} .. {}",
                statement.start.format("%Y-%m-%d"),
                statement.end.format("%Y-%m-%d")
            );
            println!("   Deposits:    {}", statement.total_deposits);
            println!("   Withdrawals: {}", statement.total_withdrawals);
            println!("   Balance now: {}", statement.ending_balance);
            println!();
            for txn in &statement.transactions {
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
    }

    pool.close().await;
    Ok(())
}

/// Print a quick account summary
pub async fn summary(db_path: &Path, holder_id: i64, account_id: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;

    resolve_owned_account(&pool, holder_id, account_id).await?;
    let summary = StatementAggregator::new(&pool).summary(account_id).await?;

    println!("📊 Account {} ({})", summary.account_id, summary.account_type);
    println!("   Balance:     {}", summary.current_balance);
    println!("   Deposits:    {}", summary.deposit_count);
    println!("   Withdrawals: {}", summary.withdrawal_count);
    println!("   Recent txns: {}", summary.recent_transactions);
    println!("   Opened:      {}", summary.created_at.to_rfc3339());
    if let Some(updated) = summary.updated_at {
        println!("   Updated:     {}", updated.to_rfc3339());
    }

    pool.close().await;
    Ok(())
}
