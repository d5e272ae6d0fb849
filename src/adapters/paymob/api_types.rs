//! Paymob-specific wire types.
//!
//! These mirror the Accept API's JSON bodies. Response types deserialize
//! permissively (`#[serde(default)]`) because the provider omits flags on
//! some endpoints; absent booleans read as `false`.

use serde::{Deserialize, Serialize};

use crate::domain::payment::ResolvedBilling;

/// Payment key lifetime requested from the provider, in seconds.
pub const PAYMENT_KEY_EXPIRATION_SECS: u64 = 3600;

// ════════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
pub struct AuthRequest<'a> {
    pub api_key: &'a str,
}

#[derive(Debug, Serialize)]
pub struct OrderRequest<'a> {
    pub auth_token: &'a str,
    pub delivery_needed: bool,
    pub amount_cents: i64,
    pub currency: &'a str,
    pub merchant_order_id: &'a str,
    /// The provider requires the field even when empty.
    pub items: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct PaymentKeyRequest<'a> {
    pub auth_token: &'a str,
    pub amount_cents: i64,
    pub expiration: u64,
    pub order_id: u64,
    pub billing_data: &'a ResolvedBilling,
    pub currency: &'a str,
    pub integration_id: &'a str,
}

#[derive(Debug, Serialize)]
pub struct TransactionActionRequest<'a> {
    pub auth_token: &'a str,
    pub transaction_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_cents: Option<i64>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderResponse {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct PaymentKeyResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct OrderRef {
    pub id: u64,
}

#[derive(Debug, Deserialize)]
pub struct TransactionResponse {
    pub id: u64,
    #[serde(default)]
    pub amount_cents: i64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub pending: bool,
    #[serde(default)]
    pub is_voided: bool,
    #[serde(default)]
    pub is_refunded: bool,
    #[serde(default)]
    pub order: Option<OrderRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_response_tolerates_missing_flags() {
        let tx: TransactionResponse = serde_json::from_str(
            r#"{"id": 7001234, "amount_cents": 20000, "order": {"id": 5009876}}"#,
        )
        .unwrap();
        assert_eq!(tx.id, 7001234);
        assert_eq!(tx.order.unwrap().id, 5009876);
        assert!(!tx.success);
        assert!(!tx.is_voided);
        assert!(tx.currency.is_none());
    }

    #[test]
    fn action_request_omits_absent_amount() {
        let body = serde_json::to_value(TransactionActionRequest {
            auth_token: "tok",
            transaction_id: 42,
            amount_cents: None,
        })
        .unwrap();
        assert!(body.get("amount_cents").is_none());
        assert_eq!(body["transaction_id"], 42);
    }
}
