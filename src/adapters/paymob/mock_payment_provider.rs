//! Mock payment provider for testing.
//!
//! Deterministic in-memory implementation of the `PaymentProvider` port:
//! orders get sequential ids, payment keys are derived from the order id,
//! and transaction actions mutate an in-memory transaction table. Webhook
//! verification uses the same HMAC scheme as the real adapter with a fixed
//! test secret.
//!
//! Testing only; methods panic if internal locks are poisoned.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::payment::to_minor_units;
use crate::ports::{
    CreateOrderRequest, CreatePaymentKeyRequest, Order, PaymentError, PaymentKey, PaymentProvider,
    Transaction,
};

use super::webhook;

/// Secret the mock verifies webhooks with.
pub const MOCK_HMAC_SECRET: &str = "mock-hmac-secret";

/// In-memory payment provider for tests.
pub struct MockPaymentProvider {
    next_order_id: AtomicU64,
    orders: Mutex<Vec<CreateOrderRequest>>,
    transactions: Mutex<HashMap<u64, Transaction>>,
    /// When set, every operation fails with a clone of this error.
    scripted_failure: Mutex<Option<PaymentError>>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self {
            next_order_id: AtomicU64::new(1),
            orders: Mutex::new(Vec::new()),
            transactions: Mutex::new(HashMap::new()),
            scripted_failure: Mutex::new(None),
        }
    }

    // === Test Helpers ===

    /// Make every subsequent operation fail with `error`.
    pub fn fail_with(&self, error: PaymentError) {
        *self.scripted_failure.lock().expect("MockPaymentProvider: lock poisoned") = Some(error);
    }

    /// Seed a transaction the mock will serve and mutate.
    pub fn seed_transaction(&self, transaction: Transaction) {
        self.transactions
            .lock()
            .expect("MockPaymentProvider: lock poisoned")
            .insert(transaction.id, transaction);
    }

    /// Orders created so far (for assertions).
    pub fn created_orders(&self) -> Vec<CreateOrderRequest> {
        self.orders
            .lock()
            .expect("MockPaymentProvider: lock poisoned")
            .clone()
    }

    fn check_failure(&self) -> Result<(), PaymentError> {
        match &*self.scripted_failure.lock().expect("MockPaymentProvider: lock poisoned") {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    fn with_transaction(
        &self,
        transaction_id: u64,
        mutate: impl FnOnce(&mut Transaction),
    ) -> Result<Transaction, PaymentError> {
        let mut transactions = self
            .transactions
            .lock()
            .expect("MockPaymentProvider: lock poisoned");
        let transaction = transactions
            .get_mut(&transaction_id)
            .ok_or_else(|| PaymentError::not_found("Transaction"))?;
        mutate(transaction);
        Ok(transaction.clone())
    }
}

impl Default for MockPaymentProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, PaymentError> {
        self.check_failure()?;
        to_minor_units(request.amount).map_err(|e| PaymentError::invalid_request(e.to_string()))?;

        let id = self.next_order_id.fetch_add(1, Ordering::SeqCst);
        self.orders
            .lock()
            .expect("MockPaymentProvider: lock poisoned")
            .push(request);
        Ok(Order { id })
    }

    async fn create_payment_key(
        &self,
        request: CreatePaymentKeyRequest,
    ) -> Result<PaymentKey, PaymentError> {
        self.check_failure()?;
        to_minor_units(request.amount).map_err(|e| PaymentError::invalid_request(e.to_string()))?;

        Ok(PaymentKey {
            token: format!("pmk_test_{}", request.order_id),
        })
    }

    async fn get_transaction(&self, transaction_id: u64) -> Result<Transaction, PaymentError> {
        self.check_failure()?;
        self.with_transaction(transaction_id, |_| {})
    }

    async fn void_transaction(&self, transaction_id: u64) -> Result<Transaction, PaymentError> {
        self.check_failure()?;
        self.with_transaction(transaction_id, |tx| {
            tx.is_voided = true;
            tx.pending = false;
        })
    }

    async fn capture_transaction(
        &self,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError> {
        self.check_failure()?;
        let amount_cents = amount
            .map(|a| to_minor_units(a).map_err(|e| PaymentError::invalid_request(e.to_string())))
            .transpose()?;
        self.with_transaction(transaction_id, |tx| {
            if let Some(cents) = amount_cents {
                tx.amount_cents = cents;
            }
            tx.pending = false;
            tx.success = true;
        })
    }

    async fn refund_transaction(
        &self,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError> {
        self.check_failure()?;
        let amount_cents = amount
            .map(|a| to_minor_units(a).map_err(|e| PaymentError::invalid_request(e.to_string())))
            .transpose()?;
        self.with_transaction(transaction_id, |tx| {
            if let Some(cents) = amount_cents {
                tx.amount_cents = cents;
            }
            tx.is_refunded = true;
            tx.pending = false;
        })
    }

    fn verify_webhook(&self, payload: &serde_json::Value, signature: &str) -> bool {
        webhook::verify_signature(MOCK_HMAC_SECRET, payload, signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_request(amount: f64) -> CreateOrderRequest {
        CreateOrderRequest {
            amount,
            currency: "EGP".to_string(),
            merchant_order_id: "rental-42".to_string(),
        }
    }

    #[tokio::test]
    async fn orders_get_sequential_ids() {
        let mock = MockPaymentProvider::new();
        let first = mock.create_order(order_request(100.0)).await.unwrap();
        let second = mock.create_order(order_request(200.0)).await.unwrap();
        assert_eq!(first.id + 1, second.id);
        assert_eq!(mock.created_orders().len(), 2);
    }

    #[tokio::test]
    async fn scripted_failure_propagates() {
        let mock = MockPaymentProvider::new();
        mock.fail_with(PaymentError::network("connection reset"));
        let err = mock.create_order(order_request(100.0)).await.unwrap_err();
        assert!(err.retryable);
    }

    #[tokio::test]
    async fn unknown_transaction_is_not_found() {
        let mock = MockPaymentProvider::new();
        let err = mock.get_transaction(404).await.unwrap_err();
        assert_eq!(err.code, crate::ports::PaymentErrorCode::NotFound);
    }
}
