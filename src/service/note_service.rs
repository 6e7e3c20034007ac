use log::info;

use crate::api::{ApiError, Note, NoteStats, NotesClient, validate_content};
use crate::render;

/// Note operations as the UI sees them.
///
/// Content is validated here, before any request is made, and lists come
/// back newest first (descending id) whatever order the server used.
pub struct NoteService {
    client: NotesClient,
}

impl NoteService {
    pub fn new(client: NotesClient) -> Self {
        NoteService { client }
    }

    pub fn client(&self) -> &NotesClient {
        &self.client
    }

    /// Load all notes, newest first
    pub async fn list_notes(&self) -> Result<Vec<Note>, ApiError> {
        let mut notes = self.client.list_notes().await?;
        sort_newest_first(&mut notes);
        Ok(notes)
    }

    /// Get a note by ID
    pub async fn get_note(&self, id: u64) -> Result<Note, ApiError> {
        self.client.get_note(id).await
    }

    /// Create a new note from raw (untrimmed) input
    pub async fn create_note(&self, raw: &str) -> Result<Note, ApiError> {
        let content = validate_content(raw)?;
        let note = self.client.create_note(&content).await?;
        info!(
            "event=note_created module=service status=ok id={} len={}",
            note.id,
            content.chars().count()
        );
        Ok(note)
    }

    /// Replace the content of an existing note
    pub async fn update_note(&self, id: u64, raw: &str) -> Result<Note, ApiError> {
        let content = validate_content(raw)?;
        let note = self.client.update_note(id, &content).await?;
        info!(
            "event=note_updated module=service status=ok id={} len={}",
            note.id,
            content.chars().count()
        );
        Ok(note)
    }

    /// Delete a note
    pub async fn delete_note(&self, id: u64) -> Result<String, ApiError> {
        let message = self.client.delete_note(id).await?;
        info!("event=note_deleted module=service status=ok id={}", id);
        Ok(message)
    }

    /// Get statistics about the notes on the server
    pub async fn get_statistics(&self) -> Result<NoteStats, ApiError> {
        self.client.stats().await
    }

    /// Export notes to an HTML fragment
    pub fn export_notes_to_html(&self, notes: &[Note]) -> String {
        render::render_notes(notes)
    }
}

pub fn sort_newest_first(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.id.cmp(&a.id));
}
