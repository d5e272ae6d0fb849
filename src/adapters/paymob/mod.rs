//! Paymob payment provider adapter.
//!
//! Implements the `PaymentProvider` port against the Paymob Accept API:
//! - Auth token exchange with in-process caching
//! - Order registration and payment key minting
//! - Transaction retrieval, void, capture and refund
//! - Transaction webhook HMAC-SHA512 verification
//!
//! # Security
//!
//! - Webhook signatures use HMAC-SHA512 with constant-time comparison
//! - All secrets are handled via `secrecy::SecretString`
//!
//! # Provider quirks
//!
//! Authenticated calls carry the bearer token inside the JSON body
//! (`auth_token`), not an Authorization header; transaction retrieval is
//! the one GET and takes the token as a query parameter.

mod api_types;
mod mock_payment_provider;
mod paymob_adapter;
mod webhook;

pub use mock_payment_provider::{MockPaymentProvider, MOCK_HMAC_SECRET};
pub use paymob_adapter::{PaymobConfig, PaymobPaymentAdapter};
pub use webhook::{compute_signature, verify_signature};
