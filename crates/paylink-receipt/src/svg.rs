//! Receipt Composition
//!
//! Builds the fixed-size 1080×1080 vector receipt. The SVG string is
//! the preview form and is usable immediately; rasterization is a
//! separate, best-effort step in `raster`.

use base64::Engine;

use paylink_core::{PaidReceipt, UserProfile};

use crate::format::{format_paid_at, format_ugx, truncate_reference};

/// Receipt canvas edge in pixels
pub const RECEIPT_SIZE: u32 = 1080;

/// Brand colors and labels for the receipt card
#[derive(Clone, Debug)]
pub struct BrandTheme {
    /// Page background
    pub background: String,

    /// Card surface
    pub card: String,

    /// Accent (badge, amount)
    pub accent: String,

    /// Primary text
    pub text: String,

    /// Secondary text
    pub muted: String,

    /// Brand wordmark shown in the footer
    pub brand_name: String,
}

impl Default for BrandTheme {
    fn default() -> Self {
        Self {
            background: "#0f172a".into(),
            card: "#1e293b".into(),
            accent: "#34d399".into(),
            text: "#f8fafc".into(),
            muted: "#94a3b8".into(),
            brand_name: "Guto".into(),
        }
    }
}

fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Compose the receipt SVG.
///
/// The layout is a single centered card: amount, recipient identity,
/// confirmation time, references, payer number, the payment link, and
/// the PAID badge.
pub fn render_svg(
    receipt: &PaidReceipt,
    profile: &UserProfile,
    paylink: &str,
    theme: &BrandTheme,
) -> String {
    let amount = xml_escape(&format_ugx(receipt.amount));
    let name = xml_escape(&receipt.recipient_name);
    let handle = profile
        .handle
        .as_deref()
        .map(|h| xml_escape(&format!("@{}", h.trim_start_matches('@'))))
        .unwrap_or_default();
    let paid_at = xml_escape(&format_paid_at(&receipt.paid_at));
    let reference = xml_escape(&truncate_reference(receipt.reference.as_str()));
    let provider_line = receipt
        .provider_reference
        .as_deref()
        .map(|provider| {
            format!(
                r#"<text x="540" y="742" text-anchor="middle" font-family="sans-serif" font-size="26" fill="{muted}">Provider ref: {reference}</text>"#,
                muted = theme.muted,
                reference = xml_escape(&truncate_reference(provider)),
            )
        })
        .unwrap_or_default();
    let payer = xml_escape(receipt.payer_phone.as_str());
    let paylink = xml_escape(paylink);
    let brand = xml_escape(&theme.brand_name);

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">
  <rect width="{size}" height="{size}" fill="{background}"/>
  <circle cx="1000" cy="90" r="220" fill="{card}" opacity="0.45"/>
  <circle cx="70" cy="1010" r="260" fill="{card}" opacity="0.45"/>
  <rect x="120" y="150" width="840" height="780" rx="48" fill="{card}"/>
  <rect x="430" y="200" width="220" height="64" rx="32" fill="{accent}"/>
  <text x="540" y="243" text-anchor="middle" font-family="sans-serif" font-size="34" font-weight="bold" fill="{background}">PAID</text>
  <text x="540" y="395" text-anchor="middle" font-family="sans-serif" font-size="92" font-weight="bold" fill="{accent}">{amount}</text>
  <text x="540" y="490" text-anchor="middle" font-family="sans-serif" font-size="44" font-weight="bold" fill="{text}">{name}</text>
  <text x="540" y="545" text-anchor="middle" font-family="sans-serif" font-size="32" fill="{muted}">{handle}</text>
  <text x="540" y="640" text-anchor="middle" font-family="sans-serif" font-size="30" fill="{text}">{paid_at}</text>
  <text x="540" y="700" text-anchor="middle" font-family="sans-serif" font-size="26" fill="{muted}">Ref: {reference}</text>
  {provider_line}
  <text x="540" y="800" text-anchor="middle" font-family="sans-serif" font-size="28" fill="{text}">From {payer}</text>
  <text x="540" y="880" text-anchor="middle" font-family="sans-serif" font-size="26" fill="{accent}">{paylink}</text>
  <text x="540" y="1010" text-anchor="middle" font-family="sans-serif" font-size="30" font-weight="bold" fill="{muted}">{brand}</text>
</svg>"#,
        size = RECEIPT_SIZE,
        background = theme.background,
        card = theme.card,
        accent = theme.accent,
        text = theme.text,
        muted = theme.muted,
        amount = amount,
        name = name,
        handle = handle,
        paid_at = paid_at,
        reference = reference,
        provider_line = provider_line,
        payer = payer,
        paylink = paylink,
        brand = brand,
    )
}

/// Encode an SVG string as a `data:` URL for immediate display
pub fn svg_data_url(svg: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(svg);
    format!("data:image/svg+xml;base64,{}", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use paylink_core::{normalize, TxReference};

    fn receipt() -> PaidReceipt {
        PaidReceipt {
            amount: 25_000,
            reference: TxReference::from_string("11111111-2222-3333-4444-555555555555"),
            provider_reference: Some("MP-2231".into()),
            paid_at: Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 53).unwrap(),
            payer_phone: normalize("0701234567").unwrap(),
            recipient_phone: normalize("0772123456").unwrap(),
            recipient_name: "Okello Crafts".into(),
        }
    }

    fn profile() -> UserProfile {
        UserProfile {
            name: "Okello Crafts".into(),
            payment_key: "pk_live_okello".into(),
            phone: normalize("0772123456").unwrap(),
            handle: Some("okello".into()),
            avatar_url: None,
            verified: Some(true),
        }
    }

    #[test]
    fn test_svg_carries_receipt_fields() {
        let svg = render_svg(
            &receipt(),
            &profile(),
            "https://guto.me/@okello",
            &BrandTheme::default(),
        );

        assert!(svg.contains(r#"width="1080" height="1080""#));
        assert!(svg.contains("UGX 25,000"));
        assert!(svg.contains("Okello Crafts"));
        assert!(svg.contains("@okello"));
        assert!(svg.contains("14 March 2025, 09:26"));
        assert!(svg.contains("11111111-2222-3…")); // 15 chars + ellipsis
        assert!(svg.contains("MP-2231"));
        assert!(svg.contains("256701234567"));
        assert!(svg.contains("https://guto.me/@okello"));
        assert!(svg.contains("PAID"));
    }

    #[test]
    fn test_provider_reference_optional() {
        let mut bare = receipt();
        bare.provider_reference = None;

        let svg = render_svg(
            &bare,
            &profile(),
            "https://guto.me/@okello",
            &BrandTheme::default(),
        );
        assert!(!svg.contains("Provider ref"));
    }

    #[test]
    fn test_name_is_escaped() {
        let mut spicy = receipt();
        spicy.recipient_name = "Okello & Sons <Ltd>".into();

        let svg = render_svg(
            &spicy,
            &profile(),
            "https://guto.me/@okello",
            &BrandTheme::default(),
        );
        assert!(svg.contains("Okello &amp; Sons &lt;Ltd&gt;"));
    }

    #[test]
    fn test_data_url_prefix() {
        let url = svg_data_url("<svg/>");
        assert!(url.starts_with("data:image/svg+xml;base64,"));
    }
}
