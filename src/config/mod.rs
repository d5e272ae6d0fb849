//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is loaded
//! with the `RENTLINE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use rentline::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod firestore;
mod payment;

pub use error::{ConfigError, ValidationError};
pub use firestore::{FirestoreConfig, DEFAULT_FIRESTORE_BASE_URL};
pub use payment::{PaymentConfig, DEFAULT_PAYMOB_BASE_URL};

use serde::Deserialize;

/// Root application configuration
///
/// Contains all configuration sections for the Rentline backend services.
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Payment configuration (Paymob)
    pub payment: PaymentConfig,

    /// Firestore configuration (REST documents API)
    pub firestore: FirestoreConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `RENTLINE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `RENTLINE__PAYMENT__PAYMOB_API_KEY=...` -> `payment.paymob_api_key`
    /// - `RENTLINE__FIRESTORE__PROJECT_ID=...` -> `firestore.project_id`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed into the expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RENTLINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.payment.validate()?;
        self.firestore.validate()?;
        Ok(())
    }
}
