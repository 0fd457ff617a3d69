//! Card management commands

use anyhow::{bail, Result};
use corebank_core::{Card, CardBrand};
use corebank_ledger::resolve_owned_account;
use corebank_persistence::{CardRepo, NewCard};
use rand::Rng;
use std::path::Path;

use crate::db;

fn random_card() -> (CardBrand, String) {
    let mut rng = rand::thread_rng();
    let brands = CardBrand::all();
    let brand = brands[rng.gen_range(0..brands.len())];
    let last4 = format!("{:04}", rng.gen_range(0..10_000));
    (brand, last4)
}

/// Issue a new card against an account the holder owns
pub async fn issue(db_path: &Path, holder_id: i64, account_id: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;

    resolve_owned_account(&pool, holder_id, account_id).await?;

    let (brand, last4) = random_card();
    let card = NewCard {
        account_id,
        holder_id,
        masked_number: Card::mask(&last4),
        brand: brand.as_str().to_string(),
        last4,
    };
    let card_id = CardRepo::insert(&pool, &card).await?;

    println!("✅ Card issued");
    println!("   Id:      {card_id}");
    println!("   Number:  {}", card.masked_number);
    println!("   Brand:   {brand}");
    println!("   Account: {account_id}");

    pool.close().await;
    Ok(())
}

/// List the holder's cards, optionally narrowed to one account
pub async fn list(db_path: &Path, holder_id: i64, account_id: Option<i64>) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let rows = match account_id {
        Some(account) => {
            resolve_owned_account(&pool, holder_id, account).await?;
            CardRepo::list_by_account(&pool, account).await?
        }
        None => CardRepo::list_by_holder(&pool, holder_id).await?,
    };
    if rows.is_empty() {
        println!("No cards for holder {holder_id}");
    } else {
        println!("Cards for holder {holder_id}:");
        for row in rows {
            println!(
                "   {:>4}  {:<12}  {}  account {}  {}",
                row.id,
                row.brand,
                row.masked_number,
                row.account_id,
                if row.active { "active" } else { "inactive" }
            );
        }
    }

    pool.close().await;
    Ok(())
}

/// Activate or deactivate a card the holder owns
pub async fn set_active(db_path: &Path, holder_id: i64, card_id: i64, active: bool) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let Some(card) = CardRepo::find(&pool, card_id).await? else {
        bail!("Card not found: {card_id}");
    };
    if card.holder_id != holder_id {
        bail!("Card not found: {card_id}");
    }

    CardRepo::set_active(&pool, card_id, active).await?;
    println!(
        "✅ Card {} is now {}",
        card_id,
        if active { "active" } else { "inactive" }
    );

    pool.close().await;
    Ok(())
}
