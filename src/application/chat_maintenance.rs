//! Chat maintenance handlers: audit and repair.
//!
//! One-shot operator workflows over the `ChatStore` port. The audit never
//! mutates; the repair overwrites the participant fields unconditionally.
//! There is no optimistic concurrency: two concurrent repairs race and the
//! last writer wins, but both converge on the same canonical fields.

use std::sync::Arc;

use thiserror::Error;

use crate::domain::chat::{
    audit_messages, repair, ChatDocument, MessageFinding, ParticipantError,
};
use crate::ports::{ChatStore, ChatStoreError};

/// Errors from chat maintenance workflows.
#[derive(Debug, Error)]
pub enum ChatMaintenanceError {
    #[error("chat {0} not found")]
    ChatNotFound(String),

    #[error(transparent)]
    Store(#[from] ChatStoreError),

    #[error(transparent)]
    Participants(#[from] ParticipantError),
}

// ════════════════════════════════════════════════════════════════════════════════
// Audit
// ════════════════════════════════════════════════════════════════════════════════

/// Command to audit a chat's messages.
#[derive(Debug, Clone)]
pub struct AuditChatCommand {
    pub chat_id: String,
}

/// Result of auditing a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatAuditReport {
    pub chat_id: String,
    pub participants: Vec<String>,
    pub message_count: usize,
    pub findings: Vec<MessageFinding>,
}

impl ChatAuditReport {
    /// A chat is valid when no message was flagged.
    pub fn is_valid(&self) -> bool {
        self.findings.is_empty()
    }
}

/// Handler auditing a chat's messages against its participant list.
pub struct AuditChatHandler {
    store: Arc<dyn ChatStore>,
}

impl AuditChatHandler {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: AuditChatCommand,
    ) -> Result<ChatAuditReport, ChatMaintenanceError> {
        let chat = self.fetch_chat(&cmd.chat_id).await?;
        let messages = self.store.list_messages(&cmd.chat_id).await?;
        let findings = audit_messages(&chat.participants, &messages);

        tracing::info!(
            chat_id = %cmd.chat_id,
            message_count = messages.len(),
            finding_count = findings.len(),
            "chat audit complete"
        );

        Ok(ChatAuditReport {
            chat_id: cmd.chat_id,
            participants: chat.participants,
            message_count: messages.len(),
            findings,
        })
    }

    async fn fetch_chat(&self, chat_id: &str) -> Result<ChatDocument, ChatMaintenanceError> {
        self.store
            .get_chat(chat_id)
            .await?
            .ok_or_else(|| ChatMaintenanceError::ChatNotFound(chat_id.to_string()))
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Repair
// ════════════════════════════════════════════════════════════════════════════════

/// Command to repair a chat's participant fields.
#[derive(Debug, Clone)]
pub struct RepairChatCommand {
    pub chat_id: String,
}

/// Result of repairing a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairChatResult {
    pub chat_id: String,
    pub participants: Vec<String>,
    pub participants_key: String,
    /// Whether the list had to be rebuilt from the legacy key.
    pub reconstructed_from_key: bool,
    /// Whether the write changed anything (it happens regardless).
    pub changed: bool,
}

/// Handler restoring a chat's participant invariants.
pub struct RepairChatHandler {
    store: Arc<dyn ChatStore>,
}

impl RepairChatHandler {
    pub fn new(store: Arc<dyn ChatStore>) -> Self {
        Self { store }
    }

    pub async fn handle(
        &self,
        cmd: RepairChatCommand,
    ) -> Result<RepairChatResult, ChatMaintenanceError> {
        let chat = self
            .store
            .get_chat(&cmd.chat_id)
            .await?
            .ok_or_else(|| ChatMaintenanceError::ChatNotFound(cmd.chat_id.clone()))?;

        let repaired = repair(&chat.participants, chat.participants_key.as_deref())?;
        let changed = repaired.participants != chat.participants
            || Some(repaired.participants_key.as_str()) != chat.participants_key.as_deref();

        // Written back even when nothing changed; reruns stay trivially safe.
        self.store
            .update_participants(
                &cmd.chat_id,
                &repaired.participants,
                &repaired.participants_key,
            )
            .await?;

        tracing::info!(
            chat_id = %cmd.chat_id,
            participants_key = %repaired.participants_key,
            reconstructed = repaired.reconstructed_from_key,
            changed,
            "chat participant fields repaired"
        );

        Ok(RepairChatResult {
            chat_id: cmd.chat_id,
            participants: repaired.participants,
            participants_key: repaired.participants_key,
            reconstructed_from_key: repaired.reconstructed_from_key,
            changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryChatStore;
    use crate::domain::chat::ChatMessage;

    fn chat(id: &str, participants: &[&str], key: Option<&str>) -> ChatDocument {
        ChatDocument {
            id: id.to_string(),
            participants: participants.iter().map(|s| s.to_string()).collect(),
            participants_key: key.map(str::to_string),
        }
    }

    fn message(id: &str, sender: &str) -> ChatMessage {
        ChatMessage {
            id: id.to_string(),
            sender_id: sender.to_string(),
        }
    }

    #[tokio::test]
    async fn audit_reports_valid_chat() {
        let store = Arc::new(InMemoryChatStore::new());
        store.insert_chat(chat("c1", &["u1", "u2"], Some("u1:u2")));
        store.insert_message("c1", message("m1", "u1"));
        store.insert_message("c1", message("m2", "u2"));

        let handler = AuditChatHandler::new(store);
        let report = handler
            .handle(AuditChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap();

        assert!(report.is_valid());
        assert_eq!(report.message_count, 2);
    }

    #[tokio::test]
    async fn audit_flags_foreign_and_missing_senders() {
        let store = Arc::new(InMemoryChatStore::new());
        store.insert_chat(chat("c1", &["u1", "u2"], Some("u1:u2")));
        store.insert_message("c1", message("m1", "intruder"));
        store.insert_message("c1", message("m2", ""));

        let handler = AuditChatHandler::new(store);
        let report = handler
            .handle(AuditChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap();

        assert!(!report.is_valid());
        assert_eq!(report.findings.len(), 2);
    }

    #[tokio::test]
    async fn audit_missing_chat_is_not_found() {
        let handler = AuditChatHandler::new(Arc::new(InMemoryChatStore::new()));
        let err = handler
            .handle(AuditChatCommand {
                chat_id: "ghost".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatMaintenanceError::ChatNotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn repair_rebuilds_from_legacy_key_and_writes_back() {
        let store = Arc::new(InMemoryChatStore::new());
        store.insert_chat(chat("c1", &["u1"], Some("u2:u1")));

        let handler = RepairChatHandler::new(store.clone());
        let result = handler
            .handle(RepairChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap();

        assert!(result.reconstructed_from_key);
        assert!(result.changed);
        assert_eq!(result.participants_key, "u1:u2");

        let stored = store.chat("c1").unwrap();
        assert_eq!(stored.participants, vec!["u2", "u1"]);
        assert_eq!(stored.participants_key.as_deref(), Some("u1:u2"));
    }

    #[tokio::test]
    async fn repair_of_consistent_chat_is_unchanged_but_still_written() {
        let store = Arc::new(InMemoryChatStore::new());
        store.insert_chat(chat("c1", &["u1", "u2"], Some("u1:u2")));

        let handler = RepairChatHandler::new(store.clone());
        let result = handler
            .handle(RepairChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap();

        assert!(!result.changed);
        assert!(!result.reconstructed_from_key);
        assert_eq!(store.chat("c1").unwrap().participants_key.as_deref(), Some("u1:u2"));
    }

    #[tokio::test]
    async fn repair_is_idempotent_end_to_end() {
        let store = Arc::new(InMemoryChatStore::new());
        store.insert_chat(chat("c1", &["u2", "", "u1", "u2"], None));

        let handler = RepairChatHandler::new(store.clone());
        let first = handler
            .handle(RepairChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap();
        let second = handler
            .handle(RepairChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap();

        assert!(first.changed);
        assert!(!second.changed);
        assert_eq!(first.participants, second.participants);
        assert_eq!(first.participants_key, second.participants_key);
    }

    #[tokio::test]
    async fn repair_with_no_recoverable_participants_fails() {
        let store = Arc::new(InMemoryChatStore::new());
        store.insert_chat(chat("c1", &["u1"], None));

        let handler = RepairChatHandler::new(store);
        let err = handler
            .handle(RepairChatCommand {
                chat_id: "c1".to_string(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ChatMaintenanceError::Participants(_)));
    }
}
