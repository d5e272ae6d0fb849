//! Escrow payment handler.
//!
//! Drives the rental escrow flow over the `PaymentProvider` port: register
//! an order and mint a payment key when the renter checks out, then settle
//! the held transaction once both parties have confirmed (or not) by
//! releasing it to the host, cancelling the hold, or refunding the renter.

use std::sync::Arc;

use crate::domain::payment::BillingData;
use crate::ports::{
    CreateOrderRequest, CreatePaymentKeyRequest, PaymentError, PaymentProvider, Transaction,
};

/// Command to start a rental checkout.
#[derive(Debug, Clone)]
pub struct BeginCheckoutCommand {
    /// Rental total in major units.
    pub amount: f64,

    /// ISO currency code.
    pub currency: String,

    /// Caller's idempotency token, typically the rental booking id.
    pub merchant_order_id: String,

    /// Whatever billing data the renter's profile has.
    pub billing: BillingData,
}

/// A started checkout: the provider order plus the key that drives the
/// hosted payment page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutSession {
    pub order_id: u64,
    pub payment_token: String,
}

/// How to settle a held transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleAction {
    /// Both parties confirmed: release funds to the host.
    Release,
    /// Rental cancelled before settlement: void the hold.
    Cancel,
    /// Dispute resolved for the renter: refund.
    Refund,
}

/// Handler for the escrow payment lifecycle.
pub struct EscrowPaymentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl EscrowPaymentHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    /// Register the order and mint a payment key for the hosted checkout.
    pub async fn begin_checkout(
        &self,
        cmd: BeginCheckoutCommand,
    ) -> Result<CheckoutSession, PaymentError> {
        let order = self
            .payment_provider
            .create_order(CreateOrderRequest {
                amount: cmd.amount,
                currency: cmd.currency.clone(),
                merchant_order_id: cmd.merchant_order_id.clone(),
            })
            .await?;

        let key = self
            .payment_provider
            .create_payment_key(CreatePaymentKeyRequest {
                order_id: order.id,
                amount: cmd.amount,
                currency: cmd.currency,
                billing: cmd.billing,
            })
            .await?;

        tracing::info!(
            order_id = order.id,
            merchant_order_id = %cmd.merchant_order_id,
            "rental checkout started"
        );

        Ok(CheckoutSession {
            order_id: order.id,
            payment_token: key.token,
        })
    }

    /// Settle a held transaction.
    ///
    /// `amount` limits a partial release or refund; `None` settles the full
    /// held amount. Void is always full.
    pub async fn settle(
        &self,
        transaction_id: u64,
        action: SettleAction,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError> {
        let transaction = match action {
            SettleAction::Release => {
                self.payment_provider
                    .capture_transaction(transaction_id, amount)
                    .await?
            }
            SettleAction::Cancel => {
                self.payment_provider
                    .void_transaction(transaction_id)
                    .await?
            }
            SettleAction::Refund => {
                self.payment_provider
                    .refund_transaction(transaction_id, amount)
                    .await?
            }
        };

        tracing::info!(
            transaction_id,
            status = ?transaction.status(),
            ?action,
            "escrow transaction settled"
        );
        Ok(transaction)
    }

    /// Current provider-side state of a transaction.
    pub async fn transaction_state(
        &self,
        transaction_id: u64,
    ) -> Result<Transaction, PaymentError> {
        self.payment_provider.get_transaction(transaction_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::paymob::MockPaymentProvider;
    use crate::ports::TransactionStatus;

    fn checkout_command() -> BeginCheckoutCommand {
        BeginCheckoutCommand {
            amount: 1250.5,
            currency: "EGP".to_string(),
            merchant_order_id: "booking-77".to_string(),
            billing: BillingData::default(),
        }
    }

    fn held_transaction(id: u64) -> Transaction {
        Transaction {
            id,
            order_id: Some(1),
            amount_cents: 125050,
            currency: "EGP".to_string(),
            success: false,
            pending: true,
            is_voided: false,
            is_refunded: false,
        }
    }

    #[tokio::test]
    async fn begin_checkout_orders_then_mints_key() {
        let mock = Arc::new(MockPaymentProvider::new());
        let handler = EscrowPaymentHandler::new(mock.clone());

        let session = handler.begin_checkout(checkout_command()).await.unwrap();
        assert_eq!(session.payment_token, format!("pmk_test_{}", session.order_id));

        let orders = mock.created_orders();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].merchant_order_id, "booking-77");
    }

    #[tokio::test]
    async fn begin_checkout_propagates_provider_failure() {
        let mock = Arc::new(MockPaymentProvider::new());
        mock.fail_with(PaymentError::provider("create_order", "duplicate order"));
        let handler = EscrowPaymentHandler::new(mock);

        let err = handler.begin_checkout(checkout_command()).await.unwrap_err();
        assert!(err.message.contains("duplicate order"));
    }

    #[tokio::test]
    async fn release_captures_the_transaction() {
        let mock = Arc::new(MockPaymentProvider::new());
        mock.seed_transaction(held_transaction(9));
        let handler = EscrowPaymentHandler::new(mock);

        let tx = handler.settle(9, SettleAction::Release, None).await.unwrap();
        assert_eq!(tx.status(), TransactionStatus::Succeeded);
    }

    #[tokio::test]
    async fn cancel_voids_the_transaction() {
        let mock = Arc::new(MockPaymentProvider::new());
        mock.seed_transaction(held_transaction(9));
        let handler = EscrowPaymentHandler::new(mock);

        let tx = handler.settle(9, SettleAction::Cancel, None).await.unwrap();
        assert_eq!(tx.status(), TransactionStatus::Voided);
    }

    #[tokio::test]
    async fn partial_refund_carries_the_amount() {
        let mock = Arc::new(MockPaymentProvider::new());
        mock.seed_transaction(held_transaction(9));
        let handler = EscrowPaymentHandler::new(mock);

        let tx = handler
            .settle(9, SettleAction::Refund, Some(100.0))
            .await
            .unwrap();
        assert_eq!(tx.status(), TransactionStatus::Refunded);
        assert_eq!(tx.amount_cents, 10000);
    }
}
