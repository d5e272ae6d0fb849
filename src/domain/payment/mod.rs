//! Payment domain primitives shared by the provider port and its adapters.

pub mod amount;
pub mod billing;

pub use amount::{to_minor_units, AmountError};
pub use billing::{BillingData, BillingDefaults, ResolvedBilling};
