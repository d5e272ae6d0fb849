//! Billing data and its defaults.
//!
//! The provider rejects payment-key requests with missing billing fields,
//! but the app often only knows a subset (guests can check out before
//! completing a profile). Every fallback lives in one [`BillingDefaults`]
//! structure resolved once at the boundary instead of ad-hoc per-field
//! defaulting at each call site.

use serde::{Deserialize, Serialize};

/// Placeholder the provider accepts for fields we genuinely don't know.
const UNKNOWN: &str = "NA";

/// Billing data supplied by the caller; every field optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingData {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub apartment: Option<String>,
    pub floor: Option<String>,
    pub street: Option<String>,
    pub building: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// The documented default for every billing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingDefaults {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub apartment: String,
    pub floor: String,
    pub street: String,
    pub building: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl Default for BillingDefaults {
    fn default() -> Self {
        Self {
            first_name: "Guest".to_string(),
            last_name: "Guest".to_string(),
            email: UNKNOWN.to_string(),
            phone_number: UNKNOWN.to_string(),
            apartment: UNKNOWN.to_string(),
            floor: UNKNOWN.to_string(),
            street: UNKNOWN.to_string(),
            building: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
            state: UNKNOWN.to_string(),
            country: "EG".to_string(),
            postal_code: UNKNOWN.to_string(),
        }
    }
}

impl BillingDefaults {
    /// Check no default is empty; the provider rejects empty strings.
    pub fn validate(&self) -> Result<(), &'static str> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone_number", &self.phone_number),
            ("apartment", &self.apartment),
            ("floor", &self.floor),
            ("street", &self.street),
            ("building", &self.building),
            ("city", &self.city),
            ("state", &self.state),
            ("country", &self.country),
            ("postal_code", &self.postal_code),
        ];
        for (name, value) in fields {
            if value.is_empty() {
                return Err(name);
            }
        }
        Ok(())
    }
}

/// Billing data with every field filled in, ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedBilling {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone_number: String,
    pub apartment: String,
    pub floor: String,
    pub street: String,
    pub building: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
}

impl BillingData {
    /// Fill every absent or empty field from `defaults`.
    pub fn resolve(&self, defaults: &BillingDefaults) -> ResolvedBilling {
        fn pick(value: &Option<String>, default: &str) -> String {
            match value {
                Some(v) if !v.trim().is_empty() => v.clone(),
                _ => default.to_string(),
            }
        }

        ResolvedBilling {
            first_name: pick(&self.first_name, &defaults.first_name),
            last_name: pick(&self.last_name, &defaults.last_name),
            email: pick(&self.email, &defaults.email),
            phone_number: pick(&self.phone_number, &defaults.phone_number),
            apartment: pick(&self.apartment, &defaults.apartment),
            floor: pick(&self.floor, &defaults.floor),
            street: pick(&self.street, &defaults.street),
            building: pick(&self.building, &defaults.building),
            city: pick(&self.city, &defaults.city),
            state: pick(&self.state, &defaults.state),
            country: pick(&self.country, &defaults.country),
            postal_code: pick(&self.postal_code, &defaults.postal_code),
        }
    }
}
