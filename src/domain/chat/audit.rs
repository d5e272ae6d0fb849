//! Message sender audit.
//!
//! Read-only check that every message in a chat was written by one of the
//! chat's participants. Produces per-message findings; mutating anything is
//! the repair path's job.

use super::ChatMessage;

/// A per-message audit finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageFinding {
    /// The message has no sender id at all.
    MissingSender { message_id: String },

    /// The sender id is not in the chat's participant list.
    UnknownSender {
        message_id: String,
        sender_id: String,
    },
}

/// Audit every message against the chat's participant list.
///
/// A message is flagged when its sender id is empty or not a member of
/// `participants`. An empty result means the chat is fully valid.
pub fn audit_messages(participants: &[String], messages: &[ChatMessage]) -> Vec<MessageFinding> {
    messages
        .iter()
        .filter_map(|message| {
            let sender = message.sender_id.trim();
            if sender.is_empty() {
                Some(MessageFinding::MissingSender {
                    message_id: message.id.clone(),
                })
            } else if !participants.iter().any(|p| p == sender) {
                Some(MessageFinding::UnknownSender {
                    message_id: message.id.clone(),
                    sender_id: sender.to_string(),
                })
            } else {
                None
            }
        })
        .collect()
}
