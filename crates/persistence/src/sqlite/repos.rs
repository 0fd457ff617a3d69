//! Repository implementations for SQLite
//!
//! One repository struct per table. Read helpers take the pool; write
//! helpers take any executor so the ledger can run them inside a sqlx
//! transaction (`&mut *tx`) and commit a balance update together with its
//! transaction row.

use chrono::{DateTime, Utc};
use corebank_core::TransactionKind;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Executor, Sqlite, SqlitePool};
use std::str::FromStr;

use crate::error::{PersistenceError, PersistenceResult};
use crate::sqlite::schema::{AccountRow, CardRow, HolderRow, TransactionRow};

// ============================================================================
// Pool and schema
// ============================================================================

/// Create the connection pool.
///
/// Capped at one connection on purpose: the single writer serializes
/// conflicting ledger operations, so check-then-update sections cannot
/// interleave.
pub async fn create_pool(database_url: &str) -> PersistenceResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| PersistenceError::Configuration(e.to_string()))?
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Create the pool and the schema. Idempotent.
pub async fn init_database(database_url: &str) -> PersistenceResult<SqlitePool> {
    let pool = create_pool(database_url).await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Create all tables and indexes if they do not exist yet.
pub async fn create_schema(pool: &SqlitePool) -> PersistenceResult<()> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS account_holders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            email TEXT NOT NULL UNIQUE,
            full_name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'customer',
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS accounts (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            holder_id INTEGER NOT NULL REFERENCES account_holders(id),
            account_type TEXT NOT NULL,
            balance TEXT NOT NULL DEFAULT '0',
            created_at TEXT NOT NULL,
            updated_at TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS transactions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL REFERENCES accounts(id),
            kind TEXT NOT NULL,
            amount TEXT NOT NULL,
            description TEXT,
            created_at TEXT NOT NULL
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS cards (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            account_id INTEGER NOT NULL REFERENCES accounts(id),
            holder_id INTEGER NOT NULL REFERENCES account_holders(id),
            masked_number TEXT NOT NULL,
            brand TEXT NOT NULL,
            last4 TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL,
            updated_at TEXT
        )
        "#,
        "CREATE INDEX IF NOT EXISTS idx_accounts_holder ON accounts(holder_id)",
        "CREATE INDEX IF NOT EXISTS idx_transactions_account_created
            ON transactions(account_id, created_at)",
        "CREATE INDEX IF NOT EXISTS idx_cards_holder ON cards(holder_id)",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

// ============================================================================
// Holder Repository
// ============================================================================

/// Repository for the `account_holders` table
pub struct HolderRepo;

impl HolderRepo {
    /// Insert a new holder. The UNIQUE index on email is the sole duplicate
    /// guard, so a racing signup surfaces as `AlreadyExists` too.
    pub async fn insert(
        pool: &SqlitePool,
        email: &str,
        full_name: &str,
        password_hash: &str,
        role: &str,
    ) -> PersistenceResult<i64> {
        let result = sqlx::query(
            "INSERT INTO account_holders (email, full_name, password_hash, role, active, created_at)
             VALUES (?, ?, ?, ?, 1, ?)",
        )
        .bind(email)
        .bind(full_name)
        .bind(password_hash)
        .bind(role)
        .bind(Utc::now())
        .execute(pool)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(PersistenceError::already_exists("AccountHolder", email))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> PersistenceResult<HolderRow> {
        sqlx::query_as::<_, HolderRow>("SELECT * FROM account_holders WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| PersistenceError::not_found("AccountHolder", id))
    }

    pub async fn get_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> PersistenceResult<Option<HolderRow>> {
        let row =
            sqlx::query_as::<_, HolderRow>("SELECT * FROM account_holders WHERE email = ?")
                .bind(email)
                .fetch_optional(pool)
                .await?;
        Ok(row)
    }

    /// Update the display name
    pub async fn update_name(pool: &SqlitePool, id: i64, full_name: &str) -> PersistenceResult<()> {
        let result = sqlx::query(
            "UPDATE account_holders SET full_name = ?, updated_at = ? WHERE id = ?",
        )
        .bind(full_name)
        .bind(Utc::now())
        .bind(id)
        .execute(pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("AccountHolder", id));
        }
        Ok(())
    }

    /// Holders are never deleted; deactivation only.
    pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> PersistenceResult<()> {
        let result =
            sqlx::query("UPDATE account_holders SET active = ?, updated_at = ? WHERE id = ?")
                .bind(active)
                .bind(Utc::now())
                .bind(id)
                .execute(pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("AccountHolder", id));
        }
        Ok(())
    }

    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM account_holders")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Account Repository
// ============================================================================

/// Repository for the `accounts` table
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account with a zero balance.
    pub async fn insert(
        pool: &SqlitePool,
        holder_id: i64,
        account_type: &str,
    ) -> PersistenceResult<i64> {
        let result = sqlx::query(
            "INSERT INTO accounts (holder_id, account_type, balance, created_at)
             VALUES (?, ?, '0', ?)",
        )
        .bind(holder_id)
        .bind(account_type)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Fetch an account row, `None` when it does not exist. Takes any
    /// executor so it can run inside a ledger transaction.
    pub async fn find<'e, E>(executor: E, id: i64) -> PersistenceResult<Option<AccountRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row = sqlx::query_as::<_, AccountRow>("SELECT * FROM accounts WHERE id = ?")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &SqlitePool, id: i64) -> PersistenceResult<AccountRow> {
        Self::find(pool, id)
            .await?
            .ok_or_else(|| PersistenceError::not_found("Account", id))
    }

    pub async fn list_by_holder(
        pool: &SqlitePool,
        holder_id: i64,
    ) -> PersistenceResult<Vec<AccountRow>> {
        let rows = sqlx::query_as::<_, AccountRow>(
            "SELECT * FROM accounts WHERE holder_id = ? ORDER BY id",
        )
        .bind(holder_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    /// Overwrite the cached balance. Must only be called inside the same
    /// transaction that records the corresponding transaction row.
    pub async fn update_balance<'e, E>(
        executor: E,
        id: i64,
        balance: Decimal,
        updated_at: DateTime<Utc>,
    ) -> PersistenceResult<()>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query("UPDATE accounts SET balance = ?, updated_at = ? WHERE id = ?")
            .bind(balance.to_string())
            .bind(updated_at)
            .bind(id)
            .execute(executor)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Account", id));
        }
        Ok(())
    }

    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM accounts")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Transaction Repository
// ============================================================================

/// Insert payload for a transaction row; id and timestamp are assigned here.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub account_id: i64,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: Option<String>,
}

/// Repository for the append-only `transactions` table.
///
/// There are deliberately no update or delete methods.
pub struct TransactionRepo;

impl TransactionRepo {
    /// Append a transaction. The row id (monotonically increasing) and the
    /// commit timestamp are server-assigned.
    pub async fn insert<'e, E>(
        executor: E,
        tx: &NewTransaction,
        created_at: DateTime<Utc>,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "INSERT INTO transactions (account_id, kind, amount, description, created_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(tx.account_id)
        .bind(tx.kind.as_str())
        .bind(tx.amount.to_string())
        .bind(&tx.description)
        .bind(created_at)
        .execute(executor)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Transactions for one account, optionally restricted to a
    /// `[from, to]` window, newest first. Ties on `created_at` are broken
    /// by descending id so the order is total. Takes any executor so
    /// aggregated reads can pin it to one snapshot.
    pub async fn list_by_account<'e, E>(
        executor: E,
        account_id: i64,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> PersistenceResult<Vec<TransactionRow>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT * FROM transactions
             WHERE account_id = ?1
               AND (?2 IS NULL OR created_at >= ?2)
               AND (?3 IS NULL OR created_at <= ?3)
             ORDER BY created_at DESC, id DESC",
        )
        .bind(account_id)
        .bind(from)
        .bind(to)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// All-time count of one kind for an account.
    pub async fn count_by_kind<'e, E>(
        executor: E,
        account_id: i64,
        kind: TransactionKind,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM transactions WHERE account_id = ? AND kind = ?",
        )
        .bind(account_id)
        .bind(kind.as_str())
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    /// Count of the most recent transactions, capped at `limit`.
    pub async fn recent_count<'e, E>(
        executor: E,
        account_id: i64,
        limit: i64,
    ) -> PersistenceResult<i64>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM (
                SELECT id FROM transactions WHERE account_id = ?
                ORDER BY created_at DESC, id DESC LIMIT ?
            )",
        )
        .bind(account_id)
        .bind(limit)
        .fetch_one(executor)
        .await?;
        Ok(row.0)
    }

    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM transactions")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

// ============================================================================
// Card Repository
// ============================================================================

/// Insert payload for a card row.
#[derive(Debug, Clone)]
pub struct NewCard {
    pub account_id: i64,
    pub holder_id: i64,
    pub masked_number: String,
    pub brand: String,
    pub last4: String,
}

/// Repository for the `cards` table
pub struct CardRepo;

impl CardRepo {
    pub async fn insert(pool: &SqlitePool, card: &NewCard) -> PersistenceResult<i64> {
        let result = sqlx::query(
            "INSERT INTO cards (account_id, holder_id, masked_number, brand, last4, active, created_at)
             VALUES (?, ?, ?, ?, ?, 1, ?)",
        )
        .bind(card.account_id)
        .bind(card.holder_id)
        .bind(&card.masked_number)
        .bind(&card.brand)
        .bind(&card.last4)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    pub async fn find(pool: &SqlitePool, id: i64) -> PersistenceResult<Option<CardRow>> {
        let row = sqlx::query_as::<_, CardRow>("SELECT * FROM cards WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row)
    }

    pub async fn list_by_holder(
        pool: &SqlitePool,
        holder_id: i64,
    ) -> PersistenceResult<Vec<CardRow>> {
        let rows = sqlx::query_as::<_, CardRow>(
            "SELECT * FROM cards WHERE holder_id = ? ORDER BY id",
        )
        .bind(holder_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_by_account(
        pool: &SqlitePool,
        account_id: i64,
    ) -> PersistenceResult<Vec<CardRow>> {
        let rows = sqlx::query_as::<_, CardRow>(
            "SELECT * FROM cards WHERE account_id = ? ORDER BY id",
        )
        .bind(account_id)
        .fetch_all(pool)
        .await?;
        Ok(rows)
    }

    pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> PersistenceResult<()> {
        let result = sqlx::query("UPDATE cards SET active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PersistenceError::not_found("Card", id));
        }
        Ok(())
    }

    pub async fn count(pool: &SqlitePool) -> PersistenceResult<i64> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM cards")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    async fn memory_pool() -> SqlitePool {
        init_database("sqlite::memory:").await.expect("init db")
    }

    #[tokio::test]
    async fn test_schema_is_idempotent() {
        let pool = memory_pool().await;
        create_schema(&pool).await.unwrap();
        assert_eq!(HolderRepo::count(&pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("bank.db").display());

        {
            let pool = init_database(&url).await.unwrap();
            HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
                .await
                .unwrap();
            pool.close().await;
        }

        let pool = init_database(&url).await.unwrap();
        assert_eq!(HolderRepo::count(&pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_holder_unique_email() {
        let pool = memory_pool().await;
        HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();
        let err = HolderRepo::insert(&pool, "a@b.io", "A2", "hash2", "customer")
            .await
            .unwrap_err();
        assert!(matches!(err, PersistenceError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_holder_rename_and_deactivate() {
        let pool = memory_pool().await;
        let id = HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();

        HolderRepo::update_name(&pool, id, "Alicia").await.unwrap();
        HolderRepo::set_active(&pool, id, false).await.unwrap();

        let row = HolderRepo::get_by_id(&pool, id).await.unwrap();
        assert_eq!(row.full_name, "Alicia");
        assert!(!row.active);
        assert!(row.updated_at.is_some());

        assert!(matches!(
            HolderRepo::update_name(&pool, 9999, "X").await.unwrap_err(),
            PersistenceError::NotFound { .. }
        ));
        assert!(matches!(
            HolderRepo::set_active(&pool, 9999, true).await.unwrap_err(),
            PersistenceError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_account_insert_starts_at_zero() {
        let pool = memory_pool().await;
        let holder = HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();
        let id = AccountRepo::insert(&pool, holder, "CHECKING").await.unwrap();

        let row = AccountRepo::get_by_id(&pool, id).await.unwrap();
        assert_eq!(row.balance, "0");
        assert_eq!(row.account_type, "CHECKING");
    }

    #[tokio::test]
    async fn test_transaction_list_ordering() {
        let pool = memory_pool().await;
        let holder = HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();
        let account = AccountRepo::insert(&pool, holder, "CHECKING").await.unwrap();

        // identical timestamps force the id tie-break
        let at = Utc::now();
        for amount in [dec!(1), dec!(2), dec!(3)] {
            let tx = NewTransaction {
                account_id: account,
                kind: TransactionKind::Deposit,
                amount,
                description: None,
            };
            TransactionRepo::insert(&pool, &tx, at).await.unwrap();
        }

        let rows = TransactionRepo::list_by_account(&pool, account, None, None)
            .await
            .unwrap();
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[tokio::test]
    async fn test_transaction_window_filter() {
        let pool = memory_pool().await;
        let holder = HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();
        let account = AccountRepo::insert(&pool, holder, "SAVINGS").await.unwrap();

        let old = Utc::now() - chrono::Duration::days(60);
        let recent = Utc::now();
        let tx = |amount| NewTransaction {
            account_id: account,
            kind: TransactionKind::Deposit,
            amount,
            description: None,
        };
        TransactionRepo::insert(&pool, &tx(dec!(10)), old).await.unwrap();
        TransactionRepo::insert(&pool, &tx(dec!(20)), recent).await.unwrap();

        let from = Utc::now() - chrono::Duration::days(30);
        let rows = TransactionRepo::list_by_account(&pool, account, Some(from), Some(Utc::now()))
            .await
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, "20");
    }

    #[tokio::test]
    async fn test_card_list_by_account() {
        let pool = memory_pool().await;
        let holder = HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();
        let checking = AccountRepo::insert(&pool, holder, "CHECKING").await.unwrap();
        let savings = AccountRepo::insert(&pool, holder, "SAVINGS").await.unwrap();

        for (account, last4) in [(checking, "1111"), (checking, "2222"), (savings, "3333")] {
            let card = NewCard {
                account_id: account,
                holder_id: holder,
                masked_number: format!("****-****-****-{last4}"),
                brand: "VISA".to_string(),
                last4: last4.to_string(),
            };
            CardRepo::insert(&pool, &card).await.unwrap();
        }

        let rows = CardRepo::list_by_account(&pool, checking).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|c| c.account_id == checking));
        assert_eq!(CardRepo::list_by_holder(&pool, holder).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_card_set_active() {
        let pool = memory_pool().await;
        let holder = HolderRepo::insert(&pool, "a@b.io", "A", "hash", "customer")
            .await
            .unwrap();
        let account = AccountRepo::insert(&pool, holder, "CHECKING").await.unwrap();

        let card = NewCard {
            account_id: account,
            holder_id: holder,
            masked_number: "****-****-****-1234".to_string(),
            brand: "VISA".to_string(),
            last4: "1234".to_string(),
        };
        let card_id = CardRepo::insert(&pool, &card).await.unwrap();

        CardRepo::set_active(&pool, card_id, false).await.unwrap();
        let row = CardRepo::find(&pool, card_id).await.unwrap().unwrap();
        assert!(!row.active);
    }
}
