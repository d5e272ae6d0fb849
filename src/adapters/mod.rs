//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `paymob` - Paymob Accept payment gateway (`PaymentProvider`)
//! - `firestore` - Firestore REST documents API (`ChatStore`)
//! - `memory` - In-memory chat store for tests

pub mod firestore;
pub mod memory;
pub mod paymob;

pub use firestore::FirestoreChatStore;
pub use memory::InMemoryChatStore;
pub use paymob::{MockPaymentProvider, PaymobConfig, PaymobPaymentAdapter};
