//! # Account Holder Module
//!
//! The identity record behind one or more accounts. Holders are never
//! hard-deleted; deactivation flips the `active` flag.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Holder role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular account holder
    Customer,
    /// Back-office staff
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "customer" => Some(Role::Customer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Registered account holder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountHolder {
    pub id: i64,
    /// Unique across the system
    pub email: String,
    pub full_name: String,
    /// Salted hash, never the plaintext password
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl AccountHolder {
    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl fmt::Display for AccountHolder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Holder {} <{}> ({}, {})",
            self.id,
            self.email,
            self.role,
            if self.active { "active" } else { "inactive" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        assert_eq!(Role::parse("customer"), Some(Role::Customer));
        assert_eq!(Role::parse("ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("auditor"), None);
        assert_eq!(Role::Customer.as_str(), "customer");
    }

    #[test]
    fn test_holder_display_hides_hash() {
        let holder = AccountHolder {
            id: 7,
            email: "alice@example.com".to_string(),
            full_name: "Alice".to_string(),
            password_hash: "sensitive".to_string(),
            role: Role::Customer,
            active: true,
            created_at: Utc::now(),
            updated_at: None,
        };
        let shown = holder.to_string();
        assert!(shown.contains("alice@example.com"));
        assert!(!shown.contains("sensitive"));
    }
}
