//! Payment Link Builder
//!
//! Derives the canonical shareable URL for a payment page.

/// Default public domain for payment pages
pub const DEFAULT_PAYMENT_DOMAIN: &str = "guto.me";

/// Build the canonical payment link for a handle on the default domain.
///
/// The amount query parameter is appended only when the amount is a
/// positive number. Pure and idempotent; used for display, copy, and
/// outbound social-preview metadata.
pub fn payment_link(handle: &str, amount: Option<u64>) -> String {
    payment_link_on(DEFAULT_PAYMENT_DOMAIN, handle, amount)
}

/// Build the canonical payment link on a specific domain
pub fn payment_link_on(domain: &str, handle: &str, amount: Option<u64>) -> String {
    let handle = handle.trim().trim_start_matches('@');
    let mut url = format!("https://{}/@{}", domain, handle);
    if let Some(amount) = amount {
        if amount > 0 {
            url.push_str(&format!("?amount={}", amount));
        }
    }
    url
}
