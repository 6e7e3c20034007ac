//! HTML rendering of note cards.
//!
//! Everything here is pure: a note list goes in, a markup fragment comes
//! out. Stored content is escaped before it is inserted.

use chrono::{DateTime, NaiveDateTime};

use crate::api::Note;

pub const EMPTY_STATE_HTML: &str =
    r#"<div class="empty-state"><p>No notes yet. Create your first note above!</p></div>"#;

/// Escape the characters that are significant in HTML text and attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Format a server timestamp for display, or return it untouched if it
/// cannot be parsed.
pub fn format_timestamp(raw: &str) -> String {
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return parsed.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return parsed.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    raw.to_string()
}

pub fn render_note_card(note: &Note) -> String {
    let mut meta = format!(
        "<span>Created: {}</span>",
        escape_html(&format_timestamp(&note.created_at))
    );
    if note.is_edited() {
        meta.push_str(&format!(
            "<span>Updated: {}</span>",
            escape_html(&format_timestamp(&note.updated_at))
        ));
    }

    format!(
        concat!(
            r#"<div class="note-card" data-note-id="{id}">"#,
            r#"<div class="note-header">"#,
            r#"<span class="note-id">#{id}</span>"#,
            r#"<div class="note-actions">"#,
            r#"<button class="btn btn-edit" data-action="edit" data-note-id="{id}">Edit</button>"#,
            r#"<button class="btn btn-danger" data-action="delete" data-note-id="{id}">Delete</button>"#,
            r#"</div>"#,
            r#"</div>"#,
            r#"<div class="note-content">{content}</div>"#,
            r#"<div class="note-meta">{meta}</div>"#,
            r#"</div>"#,
        ),
        id = note.id,
        content = escape_html(&note.content),
        meta = meta,
    )
}

/// Render the whole list, newest first, or the empty-state placeholder.
pub fn render_notes(notes: &[Note]) -> String {
    if notes.is_empty() {
        return EMPTY_STATE_HTML.to_string();
    }

    let mut sorted: Vec<&Note> = notes.iter().collect();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));

    let cards: String = sorted.into_iter().map(render_note_card).collect();
    format!(r#"<div class="notes-list">{}</div>"#, cards)
}
