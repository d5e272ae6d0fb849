//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Payment gateway integration (Paymob)
//! - `ChatStore` - Chat document storage (Firestore)

mod chat_store;
mod payment_provider;

pub use chat_store::{ChatStore, ChatStoreError};
pub use payment_provider::{
    CreateOrderRequest, CreatePaymentKeyRequest, Order, PaymentError, PaymentErrorCode,
    PaymentKey, PaymentProvider, Transaction, TransactionStatus,
};
