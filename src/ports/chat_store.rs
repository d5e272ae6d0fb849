//! Chat store port for chat document access.
//!
//! The operator tooling reads and patches a small number of chat documents;
//! this port keeps that tooling independent of the concrete document store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::chat::{ChatDocument, ChatMessage};

/// Port for chat document storage.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Fetch a chat document by id. `None` if it does not exist.
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatDocument>, ChatStoreError>;

    /// List every message in the chat's message subcollection.
    async fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ChatStoreError>;

    /// Overwrite the chat's participant list and derived key.
    ///
    /// Unconditional write: no optimistic concurrency check, last writer
    /// wins. Acceptable for operator tooling, not a general library
    /// contract.
    async fn update_participants(
        &self,
        chat_id: &str,
        participants: &[String],
        participants_key: &str,
    ) -> Result<(), ChatStoreError>;
}

/// Errors from chat store operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatStoreError {
    #[error("chat {0} not found")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("store error: {0}")]
    Provider(String),

    #[error("failed to decode document: {0}")]
    Decode(String),
}
