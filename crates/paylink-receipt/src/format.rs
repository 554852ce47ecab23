//! Display Formatting
//!
//! Currency, timestamp, and reference formatting for the receipt card.

use chrono::{DateTime, Utc};

/// Maximum number of reference characters shown on the card
pub const REFERENCE_DISPLAY_LEN: usize = 15;

/// Format a whole-UGX amount with thousands grouping, e.g. `UGX 1,250,000`
pub fn format_ugx(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("UGX {}", grouped)
}

/// Long-form confirmation timestamp, e.g. `14 March 2025, 09:26`
pub fn format_paid_at(paid_at: &DateTime<Utc>) -> String {
    paid_at.format("%-d %B %Y, %H:%M").to_string()
}

/// Truncate a reference to the display length, marking the cut with a
/// single ellipsis character. Shorter references pass through unchanged.
pub fn truncate_reference(reference: &str) -> String {
    let mut chars = reference.chars();
    let head: String = chars.by_ref().take(REFERENCE_DISPLAY_LEN).collect();

    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}
