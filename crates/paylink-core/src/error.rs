//! Error Types

use thiserror::Error;

/// Result type alias for paylink operations
pub type Result<T> = std::result::Result<T, PaylinkError>;

/// Paylink error types
#[derive(Error, Debug)]
pub enum PaylinkError {
    /// Amount outside the configured bounds
    #[error("Amount must be between {min} and {max} UGX")]
    AmountOutOfRange { min: u64, max: u64 },

    /// Phone number did not normalize to a canonical mobile number
    #[error("Unrecognized mobile number")]
    InvalidPhone,

    /// Account name missing or blank
    #[error("Account name is required")]
    MissingAccountName,

    /// The recipient's payment key was not supplied by the page
    #[error("Recipient payment key is missing")]
    MissingPaymentKey,

    /// Operation invoked while the session is on a different step
    #[error("Session is at step '{actual}', expected '{expected}'")]
    WrongStep {
        expected: &'static str,
        actual: &'static str,
    },

    /// Gateway accepted the request transport-wise but declined the payment
    #[error("Payment request declined: {0}")]
    GatewayRejected(String),

    /// Network or transport failure on an outbound call
    #[error("Transport error: {0}")]
    Transport(String),

    /// Gateway response did not carry the expected fields
    #[error("Unexpected gateway response: {0}")]
    GatewayResponse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PaylinkError {
    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaylinkError::GatewayRejected(_)
                | PaylinkError::Transport(_)
                | PaylinkError::GatewayResponse(_)
        )
    }

    /// Check if the error is an input-validation failure (step does not advance)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            PaylinkError::AmountOutOfRange { .. }
                | PaylinkError::InvalidPhone
                | PaylinkError::MissingAccountName
                | PaylinkError::MissingPaymentKey
        )
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            PaylinkError::AmountOutOfRange { min, max } => {
                format!("Enter an amount between {} and {} UGX.", min, max)
            }
            PaylinkError::InvalidPhone => {
                "That doesn't look like a valid mobile number.".into()
            }
            PaylinkError::MissingAccountName => "Please enter the account name.".into(),
            PaylinkError::MissingPaymentKey => {
                "This payment page is not set up to receive payments yet.".into()
            }
            PaylinkError::GatewayRejected(msg) => {
                format!("The payment request was declined: {}", msg)
            }
            PaylinkError::Transport(_) | PaylinkError::GatewayResponse(_) => {
                "Could not reach the payment service. Please try again.".into()
            }
            _ => "Something went wrong. Please try again.".into(),
        }
    }
}

impl From<anyhow::Error> for PaylinkError {
    fn from(err: anyhow::Error) -> Self {
        PaylinkError::Transport(err.to_string())
    }
}
