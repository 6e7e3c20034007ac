pub mod client;
pub mod error;
pub mod note;

pub use client::NotesClient;
pub use error::{ApiError, ValidationError};
pub use note::{MAX_NOTE_LENGTH, Note, NoteStats, validate_content};
