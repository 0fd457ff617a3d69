//! Database bootstrap and status

use anyhow::{Context, Result};
use corebank_persistence::{init_database, AccountRepo, CardRepo, HolderRepo, TransactionRepo};
use sqlx::SqlitePool;
use std::path::Path;

fn db_url(db_path: &Path) -> String {
    format!("sqlite:{}?mode=rwc", db_path.display())
}

/// Connect to an existing database, creating schema on the fly if needed.
pub async fn connect(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).context("Failed to create database directory")?;
        }
    }
    init_database(&db_url(db_path))
        .await
        .context("Failed to open database")
}

/// Initialize the database schema
pub async fn init(db_path: &Path, force: bool) -> Result<()> {
    if force && db_path.exists() {
        std::fs::remove_file(db_path).context("Failed to remove existing database")?;
        println!("🗑️  Removed existing database");
    }

    let pool = connect(db_path).await?;
    pool.close().await;

    println!("✅ Database ready at {:?}", db_path);
    Ok(())
}

/// Show database status
pub async fn show_status(db_path: &Path) -> Result<()> {
    if !db_path.exists() {
        println!("❌ Database not found at {:?}", db_path);
        println!("   Run 'corebank init' to create it");
        return Ok(());
    }

    let pool = connect(db_path).await?;

    println!("📊 Database Status");
    println!("   Path: {:?}", db_path);
    println!();
    println!("   Holders:      {}", HolderRepo::count(&pool).await?);
    println!("   Accounts:     {}", AccountRepo::count(&pool).await?);
    println!("   Transactions: {}", TransactionRepo::count(&pool).await?);
    println!("   Cards:        {}", CardRepo::count(&pool).await?);

    pool.close().await;
    Ok(())
}
