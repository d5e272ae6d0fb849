//! Participant set normalization and key derivation.
//!
//! The participants key is the canonical identity of a conversation: the
//! same pair of users must always map to the same key regardless of the
//! order they were stored in, so the key is computed from the sorted,
//! deduplicated participant set.

use std::collections::HashSet;

use thiserror::Error;

/// Separator used in the derived participants key.
pub const KEY_SEPARATOR: char = ':';

/// Errors from participant repair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParticipantError {
    /// Neither the participant list nor the legacy key yields two ids.
    #[error("expected at least two participants, found {found}")]
    NotEnoughParticipants { found: usize },
}

/// Drop empty/whitespace ids and deduplicate, preserving first occurrence.
pub fn normalize_participants<S: AsRef<str>>(raw: &[S]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for id in raw {
        let id = id.as_ref().trim();
        if id.is_empty() {
            continue;
        }
        if seen.insert(id.to_string()) {
            out.push(id.to_string());
        }
    }
    out
}

/// Derive the canonical lookup key: deduplicated, sorted, colon-joined.
pub fn participants_key(participants: &[String]) -> String {
    let mut ids: Vec<&str> = participants.iter().map(String::as_str).collect();
    ids.sort_unstable();
    ids.dedup();
    ids.join(&KEY_SEPARATOR.to_string())
}

/// Result of repairing a chat's participant fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepairedParticipants {
    /// Normalized participant ids (first-occurrence order).
    pub participants: Vec<String>,

    /// Recomputed canonical key.
    pub participants_key: String,

    /// Whether the participant list had to be rebuilt from the legacy key.
    pub reconstructed_from_key: bool,
}

/// Repair a chat's participant fields.
///
/// Normalizes the stored participant list; if fewer than two ids survive,
/// falls back to splitting the legacy colon-joined key. The returned key is
/// always the canonical form of the returned participants, so applying
/// `repair` to its own output is a no-op.
///
/// # Errors
///
/// Returns [`ParticipantError::NotEnoughParticipants`] when no source
/// yields at least two ids.
pub fn repair(
    participants: &[String],
    legacy_key: Option<&str>,
) -> Result<RepairedParticipants, ParticipantError> {
    let mut normalized = normalize_participants(participants);
    let mut reconstructed = false;

    if normalized.len() < 2 {
        if let Some(key) = legacy_key {
            let from_key: Vec<&str> = key.split(KEY_SEPARATOR).collect();
            let recovered = normalize_participants(&from_key);
            if recovered.len() >= 2 {
                normalized = recovered;
                reconstructed = true;
            }
        }
    }

    if normalized.len() < 2 {
        return Err(ParticipantError::NotEnoughParticipants {
            found: normalized.len(),
        });
    }

    let key = participants_key(&normalized);
    Ok(RepairedParticipants {
        participants: normalized,
        participants_key: key,
        reconstructed_from_key: reconstructed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn normalize_drops_empty_and_duplicates() {
        let normalized = normalize_participants(&ids(&["u2", "", "u1", "u2", "  "]));
        assert_eq!(normalized, ids(&["u2", "u1"]));
    }

    #[test]
    fn key_is_sorted_and_deduplicated() {
        assert_eq!(participants_key(&ids(&["u2", "u1", "u2"])), "u1:u2");
    }

    #[test]
    fn repair_keeps_healthy_chat() {
        let repaired = repair(&ids(&["u2", "u1"]), Some("u1:u2")).unwrap();
        assert_eq!(repaired.participants, ids(&["u2", "u1"]));
        assert_eq!(repaired.participants_key, "u1:u2");
        assert!(!repaired.reconstructed_from_key);
    }

    #[test]
    fn repair_reconstructs_from_legacy_key() {
        let repaired = repair(&ids(&["u1"]), Some("u2:u1:u1")).unwrap();
        assert_eq!(repaired.participants, ids(&["u2", "u1"]));
        assert_eq!(repaired.participants_key, "u1:u2");
        assert!(repaired.reconstructed_from_key);
    }

    #[test]
    fn repair_fails_without_recoverable_participants() {
        let err = repair(&ids(&["u1"]), Some("u1")).unwrap_err();
        assert_eq!(err, ParticipantError::NotEnoughParticipants { found: 1 });

        let err = repair(&[], None).unwrap_err();
        assert_eq!(err, ParticipantError::NotEnoughParticipants { found: 0 });
    }

    #[test]
    fn repair_ignores_falsy_entries_in_legacy_key() {
        let repaired = repair(&[], Some("u1::u2:")).unwrap();
        assert_eq!(repaired.participants, ids(&["u1", "u2"]));
        assert_eq!(repaired.participants_key, "u1:u2");
    }

    proptest! {
        #[test]
        fn repair_is_idempotent(raw in proptest::collection::vec("[a-z0-9]{1,8}", 0..8)) {
            let participants = ids(&raw.iter().map(String::as_str).collect::<Vec<_>>());
            if let Ok(first) = repair(&participants, None) {
                let second = repair(&first.participants, Some(&first.participants_key)).unwrap();
                prop_assert_eq!(&second.participants, &first.participants);
                prop_assert_eq!(&second.participants_key, &first.participants_key);
                prop_assert!(!second.reconstructed_from_key);
            }
        }

        #[test]
        fn key_matches_sorted_deduplicated_form(raw in proptest::collection::vec("[a-z0-9]{1,8}", 0..8)) {
            let participants = ids(&raw.iter().map(String::as_str).collect::<Vec<_>>());
            let key = participants_key(&participants);
            let mut expected: Vec<String> = participants.clone();
            expected.sort();
            expected.dedup();
            prop_assert_eq!(key, expected.join(":"));
        }
    }
}
