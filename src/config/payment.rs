//! Payment configuration (Paymob)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Default Paymob Accept API base URL.
pub const DEFAULT_PAYMOB_BASE_URL: &str = "https://accept.paymob.com";

/// Payment configuration (Paymob Accept)
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// Static Paymob API key, exchanged for short-lived auth tokens
    pub paymob_api_key: SecretString,

    /// Paymob integration id for the card payment channel (opaque to us)
    pub paymob_integration_id: String,

    /// Shared secret for transaction webhook HMAC verification
    pub paymob_hmac_secret: SecretString,

    /// Base URL for the Paymob Accept API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_PAYMOB_BASE_URL.to_string()
}

impl PaymentConfig {
    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.paymob_api_key.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMOB_API_KEY"));
        }
        if self.paymob_integration_id.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMOB_INTEGRATION_ID"));
        }
        if self.paymob_hmac_secret.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("PAYMOB_HMAC_SECRET"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidPaymobBaseUrl);
        }

        Ok(())
    }
}
