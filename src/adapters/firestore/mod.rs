//! Firestore chat store adapter.
//!
//! Implements the `ChatStore` port against the Firestore REST documents
//! API. Only the handful of fields the operator tooling touches are
//! decoded; everything else in a document is left alone (PATCH uses an
//! update mask limited to `participants` and `participantsKey`).

mod firestore_store;
mod value;

pub use firestore_store::FirestoreChatStore;
