//! Firestore configuration
//!
//! The operator CLIs talk to the Firestore REST documents API directly, so
//! all they need is the project id and a pre-minted OAuth access token
//! (credential provisioning is outside this crate's responsibility).

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Default Firestore REST API base URL.
pub const DEFAULT_FIRESTORE_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Firestore configuration (REST documents API)
#[derive(Debug, Clone, Deserialize)]
pub struct FirestoreConfig {
    /// GCP project id hosting the Firestore database
    pub project_id: String,

    /// OAuth2 access token with Firestore scope
    pub access_token: SecretString,

    /// Base URL for the Firestore REST API
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_FIRESTORE_BASE_URL.to_string()
}

impl FirestoreConfig {
    /// Validate Firestore configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.project_id.is_empty() {
            return Err(ValidationError::MissingRequired("FIRESTORE_PROJECT_ID"));
        }
        if self.access_token.expose_secret().is_empty() {
            return Err(ValidationError::MissingRequired("FIRESTORE_ACCESS_TOKEN"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidFirestoreBaseUrl);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> FirestoreConfig {
        FirestoreConfig {
            project_id: "rentline-prod".to_string(),
            access_token: SecretString::new("ya29.test".to_string()),
            base_url: default_base_url(),
        }
    }

    #[test]
    fn test_validation_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_validation_missing_project_id() {
        let mut config = valid_config();
        config.project_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_missing_access_token() {
        let mut config = valid_config();
        config.access_token = SecretString::new(String::new());
        assert!(config.validate().is_err());
    }
}
