//! Chat ledger entry types.

use serde::{Deserialize, Serialize};

/// Represents the author of a chat entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// Entry authored by the user.
    User,
    /// Entry authored by the advisory backend.
    Assistant,
}

/// One bubble in the ordered conversation ledger.
///
/// The ledger is append-only: entries are never reordered or removed, and
/// only the most recently appended assistant entry has its content mutated
/// in place (by the reveal effect, or by the error overwrite).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatEntry {
    /// The author of the entry.
    pub role: ChatRole,
    /// The entry text. Mutable while a reveal is in progress.
    pub content: String,
    /// Timestamp when the entry was appended (RFC 3339).
    #[serde(default)]
    pub timestamp: String,
}

impl ChatEntry {
    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a user entry.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Creates an assistant entry.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// Creates the empty assistant entry appended before a reply is known.
    pub fn placeholder() -> Self {
        Self::new(ChatRole::Assistant, "")
    }
}
