//! Chat document domain logic.
//!
//! A chat document holds the participant user ids of a conversation plus a
//! derived lookup key (`participantsKey`): the deduplicated participant set,
//! sorted and colon-joined. Historically the mobile app only wrote the key,
//! so older documents may carry an empty or truncated participant list. The
//! functions here restore and check the invariants; all I/O lives behind the
//! [`ChatStore`](crate::ports::ChatStore) port.

pub mod audit;
pub mod participants;

pub use audit::{audit_messages, MessageFinding};
pub use participants::{
    normalize_participants, participants_key, repair, ParticipantError, RepairedParticipants,
};

use serde::{Deserialize, Serialize};

/// A chat document as stored in the `chats` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatDocument {
    /// Document id.
    pub id: String,

    /// Participant user ids. Invariant (restored by repair, not assumed):
    /// deduplicated, no empty entries, at least two ids.
    pub participants: Vec<String>,

    /// Derived lookup key: participants deduplicated, sorted, colon-joined.
    pub participants_key: Option<String>,
}

/// A message in a chat's `messages` subcollection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Document id.
    pub id: String,

    /// Sender user id. Valid iff non-empty and a member of the parent
    /// chat's participants.
    pub sender_id: String,
}
