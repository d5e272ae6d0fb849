//! Payment provider port for external payment processing.
//!
//! Defines the contract for the escrow-style rental payment flow: create an
//! order, mint a payment key for the hosted checkout, then drive the held
//! transaction to release (capture), cancellation (void) or refund.
//! Implementations wrap a concrete gateway (Paymob in production).
//!
//! # Design
//!
//! - **Gateway agnostic**: request/response types carry no provider names
//! - **Explicit DI**: the adapter is constructed once at the composition
//!   root and passed by `Arc` to every consumer; no global lookup
//! - **No retries**: every remote failure propagates to the caller with
//!   the provider's raw error text attached

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::payment::BillingData;

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Register an order with the provider.
    ///
    /// `merchant_order_id` is the caller's idempotency token; the provider
    /// rejects duplicates.
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, PaymentError>;

    /// Mint a payment key driving the provider's hosted checkout.
    ///
    /// Missing billing fields are filled from the configured defaults
    /// before submission.
    async fn create_payment_key(
        &self,
        request: CreatePaymentKeyRequest,
    ) -> Result<PaymentKey, PaymentError>;

    /// Fetch a transaction's current state (read-only).
    async fn get_transaction(&self, transaction_id: u64) -> Result<Transaction, PaymentError>;

    /// Void an authorized transaction before settlement.
    async fn void_transaction(&self, transaction_id: u64) -> Result<Transaction, PaymentError>;

    /// Capture a held transaction, releasing funds to the host.
    ///
    /// `amount` defaults to the full held amount when `None`.
    async fn capture_transaction(
        &self,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError>;

    /// Refund a settled transaction back to the renter.
    ///
    /// `amount` defaults to the full settled amount when `None`.
    async fn refund_transaction(
        &self,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError>;

    /// Verify a transaction webhook signature.
    ///
    /// Infallible boundary: internal errors (malformed payload, bad hex)
    /// degrade to `false`, indistinguishable from a signature mismatch.
    fn verify_webhook(&self, payload: &serde_json::Value, signature: &str) -> bool;
}

/// Request to register an order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    /// Positive amount in major units (e.g. EGP).
    pub amount: f64,

    /// ISO currency code (e.g. "EGP").
    pub currency: String,

    /// Caller-supplied idempotency token.
    pub merchant_order_id: String,
}

/// An order registered with the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Provider-assigned order id.
    pub id: u64,
}

/// Request to mint a payment key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatePaymentKeyRequest {
    /// Provider order id from [`PaymentProvider::create_order`].
    pub order_id: u64,

    /// Positive amount in major units; must match the order.
    pub amount: f64,

    /// ISO currency code.
    pub currency: String,

    /// Partial billing data; absent fields get documented defaults.
    pub billing: BillingData,
}

/// An opaque payment key for the provider's hosted checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentKey {
    pub token: String,
}

/// A transaction as reported by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Provider transaction id.
    pub id: u64,

    /// Provider order id this transaction belongs to, when the provider
    /// reports one.
    pub order_id: Option<u64>,

    /// Amount in minor units.
    pub amount_cents: i64,

    /// ISO currency code.
    pub currency: String,

    pub success: bool,
    pub pending: bool,
    pub is_voided: bool,
    pub is_refunded: bool,
}

impl Transaction {
    /// Collapse the provider's flag set into a single status.
    pub fn status(&self) -> TransactionStatus {
        if self.is_refunded {
            TransactionStatus::Refunded
        } else if self.is_voided {
            TransactionStatus::Voided
        } else if self.pending {
            TransactionStatus::Pending
        } else if self.success {
            TransactionStatus::Succeeded
        } else {
            TransactionStatus::Failed
        }
    }
}

/// Derived transaction status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Succeeded,
    Voided,
    Refunded,
    Failed,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message, carrying the provider's raw error text
    /// for remote failures.
    pub message: String,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            retryable: code.is_retryable(),
        }
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }

    /// Create an invalid request error.
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    /// Create an invalid response error.
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidResponse, message)
    }

    /// Create a provider error from an operation name and response text.
    pub fn provider(operation: &str, response_text: impl Into<String>) -> Self {
        Self::new(
            PaymentErrorCode::ProviderError,
            format!("{} failed: {}", operation, response_text.into()),
        )
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// Token exchange with the provider failed.
    AuthenticationError,

    /// Request rejected before reaching the provider.
    InvalidRequest,

    /// Provider response could not be parsed.
    InvalidResponse,

    /// Resource not found.
    NotFound,

    /// Provider API error.
    ProviderError,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PaymentErrorCode::NetworkError)
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::InvalidResponse => "invalid_response",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::ProviderError => "provider_error",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transaction() -> Transaction {
        Transaction {
            id: 1,
            order_id: Some(2),
            amount_cents: 20000,
            currency: "EGP".to_string(),
            success: false,
            pending: false,
            is_voided: false,
            is_refunded: false,
        }
    }

    #[test]
    fn status_priority_refunded_first() {
        let tx = Transaction {
            is_refunded: true,
            is_voided: true,
            pending: true,
            success: true,
            ..transaction()
        };
        assert_eq!(tx.status(), TransactionStatus::Refunded);
    }

    #[test]
    fn status_voided_beats_pending_and_success() {
        let tx = Transaction {
            is_voided: true,
            pending: true,
            success: true,
            ..transaction()
        };
        assert_eq!(tx.status(), TransactionStatus::Voided);
    }

    #[test]
    fn status_pending_beats_success() {
        let tx = Transaction {
            pending: true,
            success: true,
            ..transaction()
        };
        assert_eq!(tx.status(), TransactionStatus::Pending);
    }

    #[test]
    fn status_success_and_failed() {
        let tx = Transaction {
            success: true,
            ..transaction()
        };
        assert_eq!(tx.status(), TransactionStatus::Succeeded);
        assert_eq!(transaction().status(), TransactionStatus::Failed);
    }

    #[test]
    fn only_network_errors_are_retryable() {
        assert!(PaymentError::network("timeout").retryable);
        assert!(!PaymentError::authentication("bad key").retryable);
        assert!(!PaymentError::provider("refund", "declined").retryable);
    }
}
