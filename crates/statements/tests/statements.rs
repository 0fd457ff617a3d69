//! Integration tests for statement aggregation against in-memory SQLite.

use chrono::{Duration, Utc};
use corebank_core::{AccountType, Transaction, TransactionKind};
use corebank_ledger::{Ledger, LedgerError, TransferOrchestrator};
use corebank_persistence::{init_database, AccountRepo, HolderRepo, NewTransaction, TransactionRepo};
use corebank_statements::{StatementAggregator, RECENT_LIMIT};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sqlx::SqlitePool;

async fn setup() -> (SqlitePool, i64, i64) {
    let pool = init_database("sqlite::memory:").await.expect("init db");
    let holder = HolderRepo::insert(&pool, "alice@example.com", "Alice", "hash", "customer")
        .await
        .expect("insert holder");
    let account = AccountRepo::insert(&pool, holder, "CHECKING")
        .await
        .expect("insert account");
    (pool, holder, account)
}

#[tokio::test]
async fn statement_totals_and_live_ending_balance() {
    let (pool, _, account) = setup().await;
    let ledger = Ledger::new(&pool);
    ledger.deposit(account, dec!(1000), None).await.unwrap();
    ledger.withdraw(account, dec!(200), None).await.unwrap();

    let statement = StatementAggregator::new(&pool)
        .statement(account, None, None)
        .await
        .unwrap();

    assert_eq!(statement.total_deposits, dec!(1000));
    assert_eq!(statement.total_withdrawals, dec!(200));
    assert_eq!(statement.ending_balance, dec!(800));
    assert_eq!(statement.transactions.len(), 2);
    // newest first
    assert_eq!(statement.transactions[0].kind, TransactionKind::Withdrawal);
}

#[tokio::test]
async fn statement_defaults_to_thirty_day_window() {
    let (pool, _, account) = setup().await;

    // a deposit dated well outside the default window
    let old = NewTransaction {
        account_id: account,
        kind: TransactionKind::Deposit,
        amount: dec!(5000),
        description: None,
    };
    TransactionRepo::insert(&pool, &old, Utc::now() - Duration::days(45))
        .await
        .unwrap();

    Ledger::new(&pool).deposit(account, dec!(100), None).await.unwrap();

    let statement = StatementAggregator::new(&pool)
        .statement(account, None, None)
        .await
        .unwrap();

    assert_eq!(statement.transactions.len(), 1);
    assert_eq!(statement.total_deposits, dec!(100));
    assert!(statement.end - statement.start == Duration::days(30));
}

#[tokio::test]
async fn statement_ending_balance_ignores_window_bounds() {
    let (pool, _, account) = setup().await;
    let ledger = Ledger::new(&pool);
    ledger.deposit(account, dec!(300), None).await.unwrap();

    // a window in the distant past contains nothing, but the ending
    // balance is still the live one
    let end = Utc::now() - Duration::days(365);
    let start = end - Duration::days(30);
    let statement = StatementAggregator::new(&pool)
        .statement(account, Some(start), Some(end))
        .await
        .unwrap();

    assert!(statement.transactions.is_empty());
    assert_eq!(statement.total_deposits, dec!(0));
    assert_eq!(statement.ending_balance, dec!(300));
}

#[tokio::test]
async fn statement_read_is_idempotent() {
    let (pool, holder, account) = setup().await;
    let other = AccountRepo::insert(&pool, holder, "SAVINGS").await.unwrap();
    let ledger = Ledger::new(&pool);
    ledger.deposit(account, dec!(1000), None).await.unwrap();
    TransferOrchestrator::new(&pool)
        .transfer(holder, account, other, dec!(400), None)
        .await
        .unwrap();

    let agg = StatementAggregator::new(&pool);
    let end = Utc::now();
    let start = end - Duration::days(7);

    let first = agg.statement(account, Some(start), Some(end)).await.unwrap();
    let second = agg.statement(account, Some(start), Some(end)).await.unwrap();

    assert_eq!(first.total_deposits, second.total_deposits);
    assert_eq!(first.total_withdrawals, second.total_withdrawals);
    assert_eq!(first.ending_balance, second.ending_balance);
    let ids = |s: &corebank_statements::Statement| {
        s.transactions.iter().map(|t| t.id).collect::<Vec<_>>()
    };
    assert_eq!(ids(&first), ids(&second));
}

#[tokio::test]
async fn summary_counts_and_recent_cap() {
    let (pool, _, account) = setup().await;
    let ledger = Ledger::new(&pool);

    for _ in 0..12 {
        ledger.deposit(account, dec!(10), None).await.unwrap();
    }
    ledger.withdraw(account, dec!(30), None).await.unwrap();

    let summary = StatementAggregator::new(&pool).summary(account).await.unwrap();

    assert_eq!(summary.account_type, AccountType::Checking);
    assert_eq!(summary.current_balance, dec!(90));
    assert_eq!(summary.deposit_count, 12);
    assert_eq!(summary.withdrawal_count, 1);
    assert_eq!(summary.recent_transactions, RECENT_LIMIT);
    assert!(summary.updated_at.is_some());
}

#[tokio::test]
async fn summary_of_quiet_account() {
    let (pool, _, account) = setup().await;
    let summary = StatementAggregator::new(&pool).summary(account).await.unwrap();

    assert_eq!(summary.current_balance, dec!(0));
    assert_eq!(summary.deposit_count, 0);
    assert_eq!(summary.withdrawal_count, 0);
    assert_eq!(summary.recent_transactions, 0);
    assert!(summary.updated_at.is_none());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn statement_snapshot_is_never_torn_by_concurrent_writes() {
    let (pool, _, account) = setup().await;

    let writer = {
        let pool = pool.clone();
        tokio::spawn(async move {
            let ledger = Ledger::new(&pool);
            for _ in 0..50 {
                ledger.deposit(account, dec!(1), None).await.unwrap();
            }
        })
    };

    // window wide enough to hold the whole log, so the signed sum of the
    // statement's transactions must equal the balance read with them
    let agg = StatementAggregator::new(&pool);
    let start = Utc::now() - Duration::days(1);
    for _ in 0..50 {
        let end = Utc::now() + Duration::days(1);
        let statement = agg.statement(account, Some(start), Some(end)).await.unwrap();
        assert_eq!(
            statement.ending_balance,
            Transaction::net_total(&statement.transactions),
            "balance and log must come from one snapshot"
        );
    }

    writer.await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn summary_balance_and_counts_come_from_one_snapshot() {
    let (pool, _, account) = setup().await;

    let writer = {
        let pool = pool.clone();
        tokio::spawn(async move {
            let ledger = Ledger::new(&pool);
            for _ in 0..50 {
                ledger.deposit(account, dec!(10), None).await.unwrap();
            }
        })
    };

    let agg = StatementAggregator::new(&pool);
    for _ in 0..50 {
        let summary = agg.summary(account).await.unwrap();
        assert_eq!(
            summary.current_balance,
            Decimal::from(summary.deposit_count) * dec!(10),
            "balance and deposit count must come from one snapshot"
        );
    }

    writer.await.unwrap();
}

#[tokio::test]
async fn statement_for_missing_account_fails() {
    let (pool, _, _) = setup().await;
    let err = StatementAggregator::new(&pool)
        .statement(9999, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(9999)));
}
