//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `calendar` - Availability calendar state model for rental listings
//! - `chat` - Chat document invariants: participant sets, key derivation, audit
//! - `payment` - Monetary amounts and billing data defaulting

pub mod calendar;
pub mod chat;
pub mod payment;
