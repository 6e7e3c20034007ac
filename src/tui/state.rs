use crate::api::{MAX_NOTE_LENGTH, Note};

/// Edit modal state. At most one note is open at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Idle,
    Editing { note_id: u64, buffer: String },
}

impl EditState {
    /// Enter the editing state for a freshly fetched note.
    ///
    /// Returns false, leaving the current modal untouched, if a note is
    /// already being edited.
    pub fn open(&mut self, note: &Note) -> bool {
        if self.is_editing() {
            return false;
        }
        *self = EditState::Editing {
            note_id: note.id,
            buffer: note.content.clone(),
        };
        true
    }

    /// Discard the modal and whatever was typed into it.
    pub fn close(&mut self) {
        *self = EditState::Idle;
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, EditState::Editing { .. })
    }

    pub fn note_id(&self) -> Option<u64> {
        match self {
            EditState::Editing { note_id, .. } => Some(*note_id),
            EditState::Idle => None,
        }
    }

    pub fn buffer(&self) -> Option<&str> {
        match self {
            EditState::Editing { buffer, .. } => Some(buffer.as_str()),
            EditState::Idle => None,
        }
    }

    pub fn buffer_mut(&mut self) -> Option<&mut String> {
        match self {
            EditState::Editing { buffer, .. } => Some(buffer),
            EditState::Idle => None,
        }
    }

    /// What a save would submit: the note id and the raw buffer.
    pub fn submission(&self) -> Option<(u64, String)> {
        match self {
            EditState::Editing { note_id, buffer } => Some((*note_id, buffer.clone())),
            EditState::Idle => None,
        }
    }
}

/// Buffer behind the "new note" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateForm {
    pub buffer: String,
}

impl CreateForm {
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Live `n/300` counter shown under both text areas.
pub fn char_counter(buffer: &str) -> String {
    format!("{}/{}", buffer.chars().count(), MAX_NOTE_LENGTH)
}
