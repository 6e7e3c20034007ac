use serde::{Deserialize, Serialize};

use crate::api::error::ValidationError;

/// Upper bound on note length, counted in characters after trimming.
pub const MAX_NOTE_LENGTH: usize = 300;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub content: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Note {
    /// A note whose timestamps differ has been edited at least once.
    pub fn is_edited(&self) -> bool {
        self.created_at != self.updated_at
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteStats {
    pub total_notes: usize,
    pub max_length: usize,
}

/// Trim `raw` and check it against the note length rules.
///
/// Returns the trimmed content that should be sent to the server.
pub fn validate_content(raw: &str) -> Result<String, ValidationError> {
    let content = raw.trim();
    if content.is_empty() {
        return Err(ValidationError::Empty);
    }

    let actual = content.chars().count();
    if actual > MAX_NOTE_LENGTH {
        return Err(ValidationError::TooLong {
            max: MAX_NOTE_LENGTH,
            actual,
        });
    }

    Ok(content.to_string())
}
