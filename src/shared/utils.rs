//! Utility functions and helpers

use num_format::{Locale, ToFormattedString};

use super::types::Coins;

/// Format a coin amount with thousands separators
pub fn format_coins(amount: Coins) -> String {
    amount.to_formatted_string(&Locale::en)
}

/// Generate unique ID
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
