//! In-memory chat store for testing.
//!
//! Deterministic `ChatStore` implementation backed by hash maps. Testing
//! only; methods panic if internal locks are poisoned.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::chat::{ChatDocument, ChatMessage};
use crate::ports::{ChatStore, ChatStoreError};

/// In-memory chat store.
#[derive(Default)]
pub struct InMemoryChatStore {
    chats: RwLock<HashMap<String, ChatDocument>>,
    messages: RwLock<HashMap<String, Vec<ChatMessage>>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// Insert or replace a chat document.
    pub fn insert_chat(&self, chat: ChatDocument) {
        self.chats
            .write()
            .expect("InMemoryChatStore: chats lock poisoned")
            .insert(chat.id.clone(), chat);
    }

    /// Append a message to a chat's subcollection.
    pub fn insert_message(&self, chat_id: &str, message: ChatMessage) {
        self.messages
            .write()
            .expect("InMemoryChatStore: messages lock poisoned")
            .entry(chat_id.to_string())
            .or_default()
            .push(message);
    }

    /// Current state of a chat (for assertions).
    pub fn chat(&self, chat_id: &str) -> Option<ChatDocument> {
        self.chats
            .read()
            .expect("InMemoryChatStore: chats lock poisoned")
            .get(chat_id)
            .cloned()
    }
}

#[async_trait]
impl ChatStore for InMemoryChatStore {
    async fn get_chat(&self, chat_id: &str) -> Result<Option<ChatDocument>, ChatStoreError> {
        Ok(self.chat(chat_id))
    }

    async fn list_messages(&self, chat_id: &str) -> Result<Vec<ChatMessage>, ChatStoreError> {
        Ok(self
            .messages
            .read()
            .expect("InMemoryChatStore: messages lock poisoned")
            .get(chat_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn update_participants(
        &self,
        chat_id: &str,
        participants: &[String],
        participants_key: &str,
    ) -> Result<(), ChatStoreError> {
        let mut chats = self
            .chats
            .write()
            .expect("InMemoryChatStore: chats lock poisoned");
        let chat = chats
            .get_mut(chat_id)
            .ok_or_else(|| ChatStoreError::NotFound(chat_id.to_string()))?;
        chat.participants = participants.to_vec();
        chat.participants_key = Some(participants_key.to_string());
        Ok(())
    }
}
