//! # paylink-core
//!
//! Core logic for a hosted payment-link page: the payment session state
//! machine with asynchronous confirmation polling, plus the phone
//! normalization and link derivation it depends on.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PaymentSession                           │
//! │  amount → phone → account → submitting → waiting → terminal  │
//! │       │            │             │            │              │
//! │   normalize    NameLookup   PaymentGateway  poll_status      │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gateway traits (`NameLookup`, `PaymentGateway`, `StatusSource`)
//! keep the machine independent of any processor; `paylink-gateway`
//! supplies the HTTP implementations and `MockGateway` a scripted one.

pub mod clock;
pub mod error;
pub mod gateway;
pub mod link;
pub mod model;
pub mod phone;
pub mod poller;
pub mod session;
pub mod status;

pub use error::{PaylinkError, Result};
pub use gateway::{
    GatewayAcceptance, MockGateway, NameLookup, PaymentGateway, PaymentSubmission, StatusSource,
};
pub use link::payment_link;
pub use model::{PaidReceipt, PaymentIntent, SessionConfig, TxReference, UserProfile};
pub use phone::{normalize, CanonicalPhone, Carrier};
pub use poller::{PollConfig, PollOutcome};
pub use session::{PaymentSession, Step};
pub use status::TransactionStatus;
