//! # Card Module
//!
//! Cards belong to one account and one holder. Only the masked number and
//! the last four digits are ever stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Card brand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
}

impl CardBrand {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardBrand::Visa => "VISA",
            CardBrand::Mastercard => "MASTERCARD",
            CardBrand::Amex => "AMEX",
            CardBrand::Discover => "DISCOVER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "VISA" => Some(CardBrand::Visa),
            "MASTERCARD" => Some(CardBrand::Mastercard),
            "AMEX" => Some(CardBrand::Amex),
            "DISCOVER" => Some(CardBrand::Discover),
            _ => None,
        }
    }

    /// All issuable brands
    pub fn all() -> [CardBrand; 4] {
        [
            CardBrand::Visa,
            CardBrand::Mastercard,
            CardBrand::Amex,
            CardBrand::Discover,
        ]
    }
}

impl fmt::Display for CardBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A card issued against an account.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: i64,
    pub account_id: i64,
    pub holder_id: i64,
    /// Format: `****-****-****-1234`
    pub masked_number: String,
    pub brand: CardBrand,
    pub last4: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Card {
    /// Build the masked representation for a last-4 block.
    pub fn mask(last4: &str) -> String {
        format!("****-****-****-{last4}")
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Card {} {} {} ({})",
            self.id,
            self.brand,
            self.masked_number,
            if self.active { "active" } else { "inactive" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brand_roundtrip() {
        assert_eq!(CardBrand::parse("VISA"), Some(CardBrand::Visa));
        assert_eq!(CardBrand::parse("mastercard"), Some(CardBrand::Mastercard));
        assert_eq!(CardBrand::parse("JCB"), None);
    }

    #[test]
    fn test_mask_format() {
        assert_eq!(Card::mask("1234"), "****-****-****-1234");
    }
}
