//! Paymob Accept adapter implementing the `PaymentProvider` port.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::Mutex;

use crate::config::{PaymentConfig, DEFAULT_PAYMOB_BASE_URL};
use crate::domain::payment::{to_minor_units, BillingDefaults};
use crate::ports::{
    CreateOrderRequest, CreatePaymentKeyRequest, Order, PaymentError, PaymentKey, PaymentProvider,
    Transaction,
};

use super::api_types::{
    AuthRequest, AuthResponse, OrderRequest, OrderResponse, PaymentKeyRequest, PaymentKeyResponse,
    TransactionActionRequest, TransactionResponse, PAYMENT_KEY_EXPIRATION_SECS,
};
use super::webhook;

/// Provider-stated auth token lifetime.
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Safety margin subtracted from the stated lifetime when caching.
const TOKEN_SAFETY_MARGIN_SECS: i64 = 600;

/// Paymob Accept API configuration.
#[derive(Debug, Clone)]
pub struct PaymobConfig {
    /// Static API key exchanged for short-lived auth tokens.
    api_key: SecretString,

    /// Shared secret for webhook HMAC verification.
    hmac_secret: SecretString,

    /// Integration id for the card payment channel (opaque to us).
    integration_id: String,

    /// Base URL for the Accept API.
    api_base_url: String,

    /// Defaults applied to absent billing fields.
    billing_defaults: BillingDefaults,
}

impl PaymobConfig {
    /// Create a new Paymob configuration.
    pub fn new(
        api_key: impl Into<String>,
        integration_id: impl Into<String>,
        hmac_secret: impl Into<String>,
    ) -> Self {
        Self {
            api_key: SecretString::new(api_key.into()),
            hmac_secret: SecretString::new(hmac_secret.into()),
            integration_id: integration_id.into(),
            api_base_url: DEFAULT_PAYMOB_BASE_URL.to_string(),
            billing_defaults: BillingDefaults::default(),
        }
    }

    /// Build from the application payment config.
    pub fn from_config(config: &PaymentConfig) -> Self {
        Self {
            api_key: config.paymob_api_key.clone(),
            hmac_secret: config.paymob_hmac_secret.clone(),
            integration_id: config.paymob_integration_id.clone(),
            api_base_url: config.base_url.clone(),
            billing_defaults: BillingDefaults::default(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// Override the billing defaults.
    ///
    /// # Errors
    ///
    /// Rejects defaults with any empty field; the provider would refuse
    /// them at payment-key time, so they are caught here instead.
    pub fn with_billing_defaults(
        mut self,
        defaults: BillingDefaults,
    ) -> Result<Self, PaymentError> {
        defaults.validate().map_err(|field| {
            PaymentError::invalid_request(format!("billing default {} must not be empty", field))
        })?;
        self.billing_defaults = defaults;
        Ok(self)
    }
}

/// Cached auth token with a conservative expiry.
#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    expires_at: i64,
}

/// In-process auth token cache.
///
/// Time is injected so the cache is testable without a clock or network.
#[derive(Debug, Default)]
pub(super) struct TokenCache {
    current: Option<CachedToken>,
}

impl TokenCache {
    pub(super) fn new() -> Self {
        Self { current: None }
    }

    /// The cached token, if `now` is still before its recorded expiry.
    pub(super) fn get(&self, now: i64) -> Option<String> {
        self.current
            .as_ref()
            .filter(|cached| now < cached.expires_at)
            .map(|cached| cached.token.clone())
    }

    /// Cache a fresh token, stamping expiry a safety margin short of the
    /// provider's stated lifetime.
    pub(super) fn store(&mut self, token: String, now: i64) {
        self.current = Some(CachedToken {
            token,
            expires_at: now + TOKEN_LIFETIME_SECS - TOKEN_SAFETY_MARGIN_SECS,
        });
    }
}

/// Paymob payment provider adapter.
///
/// Construct once at the composition root and share via `Arc`; the only
/// mutable state is the token cache. Two callers racing an expired token
/// may both re-authenticate (the cache lock is not held across the network
/// call); wasteful but safe, each token is independently valid.
pub struct PaymobPaymentAdapter {
    config: PaymobConfig,
    http_client: reqwest::Client,
    token_cache: Mutex<TokenCache>,
}

impl PaymobPaymentAdapter {
    /// Create a new Paymob adapter with the given configuration.
    pub fn new(config: PaymobConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
            token_cache: Mutex::new(TokenCache::new()),
        }
    }

    /// Return a valid auth token, exchanging the API key only when the
    /// cached token is absent or expired.
    async fn authenticate(&self) -> Result<String, PaymentError> {
        let now = chrono::Utc::now().timestamp();
        if let Some(token) = self.token_cache.lock().await.get(now) {
            tracing::debug!("reusing cached Paymob auth token");
            return Ok(token);
        }

        let url = format!("{}/api/auth/tokens", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&AuthRequest {
                api_key: self.config.api_key.expose_secret(),
            })
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(error = %error_text, "Paymob authentication failed");
            return Err(PaymentError::authentication(format!(
                "Paymob auth error: {}",
                error_text
            )));
        }

        let auth: AuthResponse = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse auth response: {}", e))
        })?;

        let now = chrono::Utc::now().timestamp();
        self.token_cache.lock().await.store(auth.token.clone(), now);
        tracing::debug!("exchanged API key for fresh Paymob auth token");

        Ok(auth.token)
    }

    /// Map a non-success response to an operation-specific provider error
    /// carrying the raw response text.
    async fn provider_failure(
        operation: &'static str,
        response: reqwest::Response,
    ) -> PaymentError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();
        tracing::error!(%status, error = %error_text, operation, "Paymob call failed");
        if status == reqwest::StatusCode::NOT_FOUND {
            PaymentError::not_found("Transaction")
        } else {
            PaymentError::provider(operation, error_text)
        }
    }

    fn to_transaction(tx: TransactionResponse) -> Transaction {
        Transaction {
            id: tx.id,
            order_id: tx.order.map(|o| o.id),
            amount_cents: tx.amount_cents,
            currency: tx.currency.unwrap_or_default(),
            success: tx.success,
            pending: tx.pending,
            is_voided: tx.is_voided,
            is_refunded: tx.is_refunded,
        }
    }

    /// POST a transaction action (void/refund/capture) and parse the
    /// resulting transaction.
    async fn transaction_action(
        &self,
        operation: &'static str,
        path: &str,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError> {
        let amount_cents = amount
            .map(|a| to_minor_units(a).map_err(|e| PaymentError::invalid_request(e.to_string())))
            .transpose()?;

        let token = self.authenticate().await?;
        let url = format!("{}{}", self.config.api_base_url, path);
        let response = self
            .http_client
            .post(&url)
            .json(&TransactionActionRequest {
                auth_token: &token,
                transaction_id,
                amount_cents,
            })
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_failure(operation, response).await);
        }

        let tx: TransactionResponse = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse {} response: {}", operation, e))
        })?;

        tracing::info!(transaction_id = tx.id, operation, "Paymob transaction action applied");
        Ok(Self::to_transaction(tx))
    }
}

#[async_trait]
impl PaymentProvider for PaymobPaymentAdapter {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<Order, PaymentError> {
        let amount_cents = to_minor_units(request.amount)
            .map_err(|e| PaymentError::invalid_request(e.to_string()))?;

        let token = self.authenticate().await?;
        let url = format!("{}/api/ecommerce/orders", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&OrderRequest {
                auth_token: &token,
                delivery_needed: false,
                amount_cents,
                currency: &request.currency,
                merchant_order_id: &request.merchant_order_id,
                items: Vec::new(),
            })
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_failure("create_order", response).await);
        }

        let order: OrderResponse = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse order response: {}", e))
        })?;

        tracing::info!(
            order_id = order.id,
            merchant_order_id = %request.merchant_order_id,
            "Paymob order registered"
        );
        Ok(Order { id: order.id })
    }

    async fn create_payment_key(
        &self,
        request: CreatePaymentKeyRequest,
    ) -> Result<PaymentKey, PaymentError> {
        let amount_cents = to_minor_units(request.amount)
            .map_err(|e| PaymentError::invalid_request(e.to_string()))?;
        let billing = request.billing.resolve(&self.config.billing_defaults);

        let token = self.authenticate().await?;
        let url = format!("{}/api/acceptance/payment_keys", self.config.api_base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&PaymentKeyRequest {
                auth_token: &token,
                amount_cents,
                expiration: PAYMENT_KEY_EXPIRATION_SECS,
                order_id: request.order_id,
                billing_data: &billing,
                currency: &request.currency,
                integration_id: &self.config.integration_id,
            })
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_failure("create_payment_key", response).await);
        }

        let key: PaymentKeyResponse = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse payment key response: {}", e))
        })?;

        tracing::info!(order_id = request.order_id, "Paymob payment key minted");
        Ok(PaymentKey { token: key.token })
    }

    async fn get_transaction(&self, transaction_id: u64) -> Result<Transaction, PaymentError> {
        let token = self.authenticate().await?;
        let url = format!(
            "{}/api/acceptance/transactions/{}",
            self.config.api_base_url, transaction_id
        );
        let response = self
            .http_client
            .get(&url)
            .query(&[("token", token.as_str())])
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::provider_failure("get_transaction", response).await);
        }

        let tx: TransactionResponse = response.json().await.map_err(|e| {
            PaymentError::invalid_response(format!("Failed to parse transaction response: {}", e))
        })?;

        Ok(Self::to_transaction(tx))
    }

    async fn void_transaction(&self, transaction_id: u64) -> Result<Transaction, PaymentError> {
        self.transaction_action(
            "void_transaction",
            "/api/acceptance/void_refund/void",
            transaction_id,
            None,
        )
        .await
    }

    async fn capture_transaction(
        &self,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError> {
        self.transaction_action(
            "capture_transaction",
            "/api/acceptance/capture",
            transaction_id,
            amount,
        )
        .await
    }

    async fn refund_transaction(
        &self,
        transaction_id: u64,
        amount: Option<f64>,
    ) -> Result<Transaction, PaymentError> {
        self.transaction_action(
            "refund_transaction",
            "/api/acceptance/void_refund/refund",
            transaction_id,
            amount,
        )
        .await
    }

    fn verify_webhook(&self, payload: &serde_json::Value, signature: &str) -> bool {
        let verified = webhook::verify_signature(
            self.config.hmac_secret.expose_secret(),
            payload,
            signature,
        );
        if !verified {
            tracing::warn!("Paymob webhook signature rejected");
        }
        verified
    }
}
