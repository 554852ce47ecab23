//! Gateway Configuration

/// Gateway endpoint configuration
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Base URL for the page's own API routes (`/api/verify`, `/api/pay`)
    pub base_url: String,

    /// Base URL for transaction status reads; the transaction id is
    /// appended as a path segment
    pub status_base: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "https://guto.me".into(),
            status_base: "https://pay.munopay.com/api/v1/transactions".into(),
            timeout_secs: 30,
        }
    }
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = std::env::var("PAYLINK_GATEWAY_URL").unwrap_or(defaults.base_url);
        let status_base = std::env::var("PAYLINK_STATUS_BASE").unwrap_or(defaults.status_base);
        let timeout_secs = std::env::var("PAYLINK_HTTP_TIMEOUT")
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(defaults.timeout_secs);

        Self {
            base_url,
            status_base,
            timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = GatewayConfig::default();
        assert!(config.base_url.starts_with("https://"));
        assert!(config.status_base.starts_with("https://"));
        assert_eq!(config.timeout_secs, 30);
    }
}
