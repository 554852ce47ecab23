//! Phone Normalization
//!
//! Validates and normalizes Ugandan mobile numbers into the canonical
//! wire format: country code followed by the 9-digit subscriber number,
//! digits only.

use serde::{Deserialize, Serialize};

/// Country calling code, digits only
pub const COUNTRY_CODE: &str = "256";

/// Subscriber number length (without country code)
const SUBSCRIBER_LEN: usize = 9;

/// A normalized mobile number: `256` + 9 subscriber digits, no separators
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanonicalPhone(String);

impl CanonicalPhone {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 9-digit subscriber number after the country code
    pub fn subscriber(&self) -> &str {
        &self.0[COUNTRY_CODE.len()..]
    }
}

impl std::fmt::Display for CanonicalPhone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Normalize a raw phone input into canonical form.
///
/// Accepts three shapes of a subscriber number beginning with 7:
/// leading zero (`07…`), bare country code (`2567…`), and plus-prefixed
/// country code (`+2567…`). Anything else yields `None`; there is no
/// partial normalization.
pub fn normalize(input: &str) -> Option<CanonicalPhone> {
    // Keep digits plus a single leading '+', drop everything else
    // (spaces, dashes, parentheses).
    let mut cleaned = String::with_capacity(input.len());
    for ch in input.chars() {
        if ch.is_ascii_digit() || (ch == '+' && cleaned.is_empty()) {
            cleaned.push(ch);
        }
    }

    let digits = cleaned.strip_prefix('+').unwrap_or(&cleaned);

    let subscriber = if let Some(rest) = digits.strip_prefix(COUNTRY_CODE) {
        // "+2567…" lands here too once the plus is stripped
        rest
    } else if cleaned.starts_with('+') {
        // A plus sign with the wrong country code is never local form
        return None;
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        return None;
    };

    if subscriber.len() != SUBSCRIBER_LEN || !subscriber.starts_with('7') {
        return None;
    }

    Some(CanonicalPhone(format!("{}{}", COUNTRY_CODE, subscriber)))
}

/// Mobile network operator, derived from the number prefix
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Carrier {
    Mtn,
    Airtel,
    Unknown,
}

impl std::fmt::Display for Carrier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Carrier::Mtn => "MTN",
            Carrier::Airtel => "Airtel",
            Carrier::Unknown => "Unknown",
        };
        write!(f, "{}", name)
    }
}

/// Best-effort carrier hint from the two digits after the country code.
///
/// Advisory UI content only; never gates submission.
pub fn carrier_hint(phone: &CanonicalPhone) -> Carrier {
    match &phone.subscriber()[..2] {
        "76" | "77" | "78" => Carrier::Mtn,
        "70" | "74" | "75" => Carrier::Airtel,
        _ => Carrier::Unknown,
    }
}
