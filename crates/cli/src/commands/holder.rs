//! Holder registration, login, and profile management

use anyhow::Result;
use corebank_auth::{hash_password, verify_password, AccessToken, AuthError};
use corebank_core::Role;
use corebank_persistence::{HolderRepo, PersistenceError};
use std::path::Path;

use crate::db;

/// Register a new account holder
pub async fn signup(db_path: &Path, email: &str, name: &str, password: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let hash = hash_password(password);
    let holder_id =
        match HolderRepo::insert(&pool, email, name, &hash, Role::Customer.as_str()).await {
            Ok(id) => id,
            Err(PersistenceError::AlreadyExists { .. }) => {
                return Err(AuthError::EmailTaken(email.to_string()).into())
            }
            Err(err) => return Err(err.into()),
        };

    println!("✅ Holder registered");
    println!("   Id:    {holder_id}");
    println!("   Email: {email}");
    println!("   Name:  {name}");

    pool.close().await;
    Ok(())
}

/// Authenticate a holder and print an access token
pub async fn login(db_path: &Path, email: &str, password: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let row = HolderRepo::get_by_email(&pool, email).await?;
    let Some(row) = row else {
        return Err(AuthError::InvalidCredentials.into());
    };
    if !verify_password(password, &row.password_hash)? {
        return Err(AuthError::InvalidCredentials.into());
    }
    if !row.active {
        return Err(AuthError::HolderInactive.into());
    }

    let token = AccessToken::issue(row.id);

    println!("✅ Login successful");
    println!("   Holder:  {} <{}>", row.id, row.email);
    println!("   Token:   {}", token.token);
    println!("   Expires: {}", token.expires_at.to_rfc3339());

    pool.close().await;
    Ok(())
}

/// Show a holder's profile
pub async fn show(db_path: &Path, holder_id: i64) -> Result<()> {
    let pool = db::connect(db_path).await?;

    let row = HolderRepo::get_by_id(&pool, holder_id).await?;

    println!("Holder {} <{}>", row.id, row.email);
    println!("   Name:   {}", row.full_name);
    println!("   Role:   {}", row.role);
    println!("   Status: {}", if row.active { "active" } else { "inactive" });
    println!("   Joined: {}", row.created_at.to_rfc3339());

    pool.close().await;
    Ok(())
}

/// Change a holder's display name
pub async fn rename(db_path: &Path, holder_id: i64, name: &str) -> Result<()> {
    let pool = db::connect(db_path).await?;

    HolderRepo::update_name(&pool, holder_id, name).await?;
    println!("✅ Holder {holder_id} renamed to {name}");

    pool.close().await;
    Ok(())
}

/// Activate or deactivate a holder
pub async fn set_active(db_path: &Path, holder_id: i64, active: bool) -> Result<()> {
    let pool = db::connect(db_path).await?;

    HolderRepo::set_active(&pool, holder_id, active).await?;
    println!(
        "✅ Holder {} is now {}",
        holder_id,
        if active { "active" } else { "inactive" }
    );

    pool.close().await;
    Ok(())
}
