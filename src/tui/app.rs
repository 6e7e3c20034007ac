use crate::api::{ApiError, Note, NoteStats};
use crate::render::format_timestamp;
use crate::service::NoteService;
use crate::tui::state::{CreateForm, EditState, char_counter};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use log::{error, info};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    List,
    Create,
    Edit,
    DeleteConfirm,
    Statistics,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Blocking notification. While one is shown, the next key only dismisses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn success(message: impl Into<String>) -> Self {
        Notice {
            kind: NoticeKind::Success,
            message: message.into(),
        }
    }

    fn error(action: &str, err: &ApiError) -> Self {
        Notice {
            kind: NoticeKind::Error,
            message: format!("{}: {}", action, err),
        }
    }
}

pub struct App {
    pub service: NoteService,
    pub notes: Vec<Note>,
    pub selected_index: usize,
    pub mode: AppMode,
    pub edit: EditState,
    pub create: CreateForm,
    pub pending_delete: Option<u64>,
    pub stats: Option<NoteStats>,
    pub notice: Option<Notice>,
    pub export_path: PathBuf,
    pub viewport: Rect,
    pub should_quit: bool,
}

impl App {
    pub fn new(service: NoteService, export_path: impl Into<PathBuf>) -> Self {
        App {
            service,
            notes: Vec::new(),
            selected_index: 0,
            mode: AppMode::List,
            edit: EditState::default(),
            create: CreateForm::default(),
            pending_delete: None,
            stats: None,
            notice: None,
            export_path: export_path.into(),
            viewport: Rect::default(),
            should_quit: false,
        }
    }

    /// Re-fetch the list from the server. On failure the old list stays
    /// and an error notice is raised.
    pub async fn reload(&mut self) -> bool {
        match self.service.list_notes().await {
            Ok(notes) => {
                self.notes = notes;
                if self.selected_index >= self.notes.len() {
                    self.selected_index = self.notes.len().saturating_sub(1);
                }
                true
            }
            Err(e) => {
                error!("event=load_notes module=tui status=error error={}", e);
                self.notice = Some(Notice::error("Failed to load notes", &e));
                false
            }
        }
    }

    /// Reload after a successful mutation. The success message only stands
    /// alone when the list could be refreshed.
    async fn reload_after(&mut self, success: &str) {
        if self.reload().await {
            self.notice = Some(Notice::success(success));
        } else if let Some(ref mut notice) = self.notice {
            notice.message = format!("{} {}", success, notice.message);
        }
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected_index)
    }

    pub async fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        if self.notice.take().is_some() {
            return Ok(());
        }

        match self.mode {
            AppMode::List => self.handle_list_key(key).await?,
            AppMode::Create => self.handle_create_key(key, modifiers).await?,
            AppMode::Edit => self.handle_edit_key(key, modifiers).await?,
            AppMode::DeleteConfirm => self.handle_delete_confirm_key(key).await?,
            AppMode::Statistics | AppMode::Help => self.handle_info_key(key),
        }
        Ok(())
    }

    /// A click outside the edit modal closes it, like clicking the backdrop.
    pub fn handle_mouse(&mut self, event: MouseEvent) {
        if self.notice.is_some() || self.mode != AppMode::Edit {
            return;
        }
        if let MouseEventKind::Down(MouseButton::Left) = event.kind {
            let modal = modal_area(self.viewport);
            let inside = event.column >= modal.x
                && event.column < modal.x + modal.width
                && event.row >= modal.y
                && event.row < modal.y + modal.height;
            if !inside {
                self.close_edit();
            }
        }
    }

    async fn handle_list_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let max_index = self.notes.len().saturating_sub(1);
                if self.selected_index < max_index {
                    self.selected_index += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }
            KeyCode::Char('n') => {
                self.mode = AppMode::Create;
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = self.selected_note().map(|n| n.id) {
                    self.open_edit(id).await;
                }
            }
            KeyCode::Char('d') => {
                if let Some(id) = self.selected_note().map(|n| n.id) {
                    self.pending_delete = Some(id);
                    self.mode = AppMode::DeleteConfirm;
                }
            }
            KeyCode::Char('r') => {
                self.reload().await;
            }
            KeyCode::Char('s') => match self.service.get_statistics().await {
                Ok(stats) => {
                    self.stats = Some(stats);
                    self.mode = AppMode::Statistics;
                }
                Err(e) => {
                    self.notice = Some(Notice::error("Failed to load statistics", &e));
                }
            },
            KeyCode::Char('E') => self.export_html(),
            KeyCode::Char('?') => {
                self.mode = AppMode::Help;
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_create_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match key {
            KeyCode::Esc => {
                // the form keeps its text, only focus leaves it
                self.mode = AppMode::List;
            }
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.submit_create().await;
            }
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => {
                self.create.buffer.push(c);
            }
            KeyCode::Backspace => {
                self.create.buffer.pop();
            }
            KeyCode::Enter => {
                self.create.buffer.push('\n');
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_edit_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> Result<()> {
        match key {
            KeyCode::Esc => {
                self.close_edit();
            }
            KeyCode::Char('s') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.save_edit().await;
            }
            KeyCode::Char(_) if modifiers.contains(KeyModifiers::CONTROL) => {}
            KeyCode::Char(c) => {
                if let Some(buffer) = self.edit.buffer_mut() {
                    buffer.push(c);
                }
            }
            KeyCode::Backspace => {
                if let Some(buffer) = self.edit.buffer_mut() {
                    buffer.pop();
                }
            }
            KeyCode::Enter => {
                if let Some(buffer) = self.edit.buffer_mut() {
                    buffer.push('\n');
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn handle_delete_confirm_key(&mut self, key: KeyCode) -> Result<()> {
        match key {
            KeyCode::Char('y') | KeyCode::Enter => {
                if let Some(id) = self.pending_delete.take() {
                    match self.service.delete_note(id).await {
                        Ok(_) => {
                            self.reload_after("Note deleted successfully!").await;
                        }
                        Err(e) => {
                            error!("event=delete_note module=tui status=error id={} error={}", id, e);
                            self.notice = Some(Notice::error("Failed to delete note", &e));
                        }
                    }
                }
                self.mode = AppMode::List;
            }
            KeyCode::Esc | KeyCode::Char('n') => {
                self.pending_delete = None;
                self.mode = AppMode::List;
            }
            _ => {}
        }
        Ok(())
    }

    fn handle_info_key(&mut self, key: KeyCode) {
        if let KeyCode::Esc | KeyCode::Char('q') = key {
            self.mode = AppMode::List;
        }
    }

    async fn submit_create(&mut self) {
        match self.service.create_note(&self.create.buffer).await {
            Ok(_) => {
                self.create.clear();
                self.mode = AppMode::List;
                self.selected_index = 0;
                self.reload_after("Note created successfully!").await;
            }
            Err(e) => {
                self.notice = Some(Notice::error("Failed to create note", &e));
            }
        }
    }

    /// Fetch the note and open the modal. Nothing changes if the fetch fails.
    async fn open_edit(&mut self, id: u64) {
        match self.service.get_note(id).await {
            Ok(note) => {
                if self.edit.open(&note) {
                    self.mode = AppMode::Edit;
                }
            }
            Err(e) => {
                error!("event=open_edit module=tui status=error id={} error={}", id, e);
                self.notice = Some(Notice::error("Failed to load note", &e));
            }
        }
    }

    async fn save_edit(&mut self) {
        let Some((id, content)) = self.edit.submission() else {
            return;
        };
        match self.service.update_note(id, &content).await {
            Ok(_) => {
                self.close_edit();
                self.reload().await;
            }
            Err(e) => {
                // modal stays open with the text intact
                self.notice = Some(Notice::error("Failed to update note", &e));
            }
        }
    }

    fn close_edit(&mut self) {
        self.edit.close();
        self.mode = AppMode::List;
    }

    fn export_html(&mut self) {
        let html = self.service.export_notes_to_html(&self.notes);
        match std::fs::write(&self.export_path, html) {
            Ok(_) => {
                info!(
                    "event=export_html module=tui status=ok notes={} path={}",
                    self.notes.len(),
                    self.export_path.display()
                );
                self.notice = Some(Notice::success(format!(
                    "✓ Exported {} notes to {}",
                    self.notes.len(),
                    self.export_path.display()
                )));
            }
            Err(e) => {
                error!("event=export_html module=tui status=error error={}", e);
                self.notice = Some(Notice {
                    kind: NoticeKind::Error,
                    message: format!("Export failed: {}", e),
                });
            }
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        match self.mode {
            AppMode::List | AppMode::Create | AppMode::Edit | AppMode::DeleteConfirm => {
                self.render_list(frame);
            }
            AppMode::Statistics => self.render_statistics(frame),
            AppMode::Help => self.render_help(frame),
        }

        match self.mode {
            AppMode::Edit => self.render_edit_modal(frame),
            AppMode::DeleteConfirm => self.render_delete_confirm(frame),
            _ => {}
        }

        if let Some(ref notice) = self.notice {
            render_notice(frame, notice);
        }
    }

    fn render_list(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(7),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(frame.area());

        // Title bar
        let title = Paragraph::new(format!("notedeck - {}", self.service.client().api_base()))
            .block(Block::default().borders(Borders::ALL).title("notedeck"))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(title, chunks[0]);

        // Create form
        let focused = self.mode == AppMode::Create;
        let form_title = format!("New Note ({})", char_counter(&self.create.buffer));
        let form_style = if focused {
            Style::default().fg(Color::White)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let form_text = if self.create.buffer.is_empty() && !focused {
            "Press n to write a note..."
        } else {
            self.create.buffer.as_str()
        };
        let form = Paragraph::new(form_text)
            .block(Block::default().borders(Borders::ALL).title(form_title))
            .wrap(Wrap { trim: false })
            .style(form_style);
        frame.render_widget(form, chunks[1]);

        // Notes
        let list_title = format!("Notes ({})", self.notes.len());
        if self.notes.is_empty() {
            let empty = Paragraph::new("No notes yet. Create your first note above!")
                .block(Block::default().borders(Borders::ALL).title(list_title))
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, chunks[2]);
        } else {
            // borders and the highlight symbol take four columns
            let width = chunks[2].width.saturating_sub(4) as usize;
            let items: Vec<ListItem> = self.notes.iter().map(|note| note_card(note, width)).collect();
            let mut state = ListState::default();
            state.select(Some(self.selected_index));
            let list = List::new(items)
                .block(Block::default().borders(Borders::ALL).title(list_title))
                .highlight_style(Style::default().fg(Color::Yellow).bg(Color::DarkGray))
                .highlight_symbol("▶ ");
            frame.render_stateful_widget(list, chunks[2], &mut state);
        }

        // Help bar
        let help_text = if focused {
            "Ctrl+S: create | Enter: newline | Esc: leave form"
        } else {
            "j/k: navigate | n: new | e: edit | d: delete | r: refresh | s: stats | E: export | ?: help | q: quit"
        };
        let help = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }

    fn render_edit_modal(&self, frame: &mut Frame) {
        let (Some(id), Some(buffer)) = (self.edit.note_id(), self.edit.buffer()) else {
            return;
        };
        let area = modal_area(frame.area());
        frame.render_widget(Clear, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(area);

        let title = format!("Edit Note #{} ({})", id, char_counter(buffer));
        let content = Paragraph::new(buffer)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .border_style(Style::default().fg(Color::Yellow)),
            )
            .wrap(Wrap { trim: false })
            .style(Style::default().fg(Color::White));
        frame.render_widget(content, chunks[0]);

        let help = Paragraph::new("Ctrl+S: save | Esc or click outside: cancel")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[1]);
    }

    fn render_delete_confirm(&self, frame: &mut Frame) {
        let area = centered_rect(50, 20, frame.area());
        frame.render_widget(Clear, area);

        let message = match self.pending_delete {
            Some(id) => format!(
                "Are you sure you want to delete note #{}?\n\nEnter/y: confirm | Esc/n: cancel",
                id
            ),
            None => "Delete note?".to_string(),
        };
        let confirm = Paragraph::new(message)
            .block(Block::default().borders(Borders::ALL).title("Confirm Delete"))
            .wrap(Wrap { trim: true })
            .style(Style::default().fg(Color::Red));
        frame.render_widget(confirm, area);
    }

    fn render_statistics(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        let title = Paragraph::new("notedeck")
            .block(Block::default().borders(Borders::ALL).title("notedeck"))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(title, chunks[0]);

        if let Some(ref stats) = self.stats {
            let stats_text = format!(
                "Server Statistics\n\n\
                Total Notes: {}\n\
                Maximum Note Length: {} characters",
                stats.total_notes, stats.max_length
            );
            let stats_para = Paragraph::new(stats_text)
                .block(Block::default().borders(Borders::ALL).title("Statistics"))
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Yellow));
            frame.render_widget(stats_para, chunks[1]);
        }

        let help = Paragraph::new("Esc: back")
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }

    fn render_help(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(frame.area());

        let title = Paragraph::new("notedeck")
            .block(Block::default().borders(Borders::ALL).title("notedeck"))
            .style(Style::default().fg(Color::Cyan));
        frame.render_widget(title, chunks[0]);

        let help_text = "\
            List\n\
            \x20 j/k, ↑/↓   move selection\n\
            \x20 n          focus the new-note form\n\
            \x20 e, Enter   edit the selected note\n\
            \x20 d          delete the selected note\n\
            \x20 r          reload from the server\n\
            \x20 s          server statistics\n\
            \x20 E          export the list as HTML\n\
            \x20 q, Esc     quit\n\n\
            New note form / edit modal\n\
            \x20 Ctrl+S     submit\n\
            \x20 Enter      newline\n\
            \x20 Esc        leave (the edit modal discards changes)";
        let body = Paragraph::new(help_text)
            .block(Block::default().borders(Borders::ALL).title("Keys"));
        frame.render_widget(body, chunks[1]);

        let help = Paragraph::new("Esc: back")
            .block(Block::default().borders(Borders::ALL).title("Help"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[2]);
    }
}

fn note_card(note: &Note, width: usize) -> ListItem<'static> {
    let mut lines = vec![Line::from(Span::styled(
        format!("#{}", note.id),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ))];

    for line in note.content.lines() {
        for row in wrap_line(line, width) {
            lines.push(Line::from(Span::styled(row, Style::default().fg(Color::White))));
        }
    }

    let mut meta = vec![Span::styled(
        format!("Created: {}", format_timestamp(&note.created_at)),
        Style::default().fg(Color::DarkGray),
    )];
    if note.is_edited() {
        meta.push(Span::styled(
            format!("  Updated: {}", format_timestamp(&note.updated_at)),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines.push(Line::from(meta));
    lines.push(Line::default());

    ListItem::new(lines)
}

/// Break `line` into rows of at most `width` characters, preferring to
/// break after whitespace. Words longer than a row are split.
pub fn wrap_line(line: &str, width: usize) -> Vec<String> {
    if width == 0 || line.chars().count() <= width {
        return vec![line.to_string()];
    }

    let mut rows = Vec::new();
    let mut rest: Vec<char> = line.chars().collect();
    while rest.len() > width {
        let split = rest[..=width]
            .iter()
            .rposition(|c| c.is_whitespace())
            .filter(|&i| i > 0)
            .unwrap_or(width);
        rows.push(rest[..split].iter().collect::<String>().trim_end().to_string());
        rest.drain(..split);
        while rest.first().is_some_and(|c| c.is_whitespace()) {
            rest.remove(0);
        }
    }
    if !rest.is_empty() {
        rows.push(rest.into_iter().collect());
    }
    rows
}

fn render_notice(frame: &mut Frame, notice: &Notice) {
    let area = centered_rect(50, 20, frame.area());
    frame.render_widget(Clear, area);

    let (title, color) = match notice.kind {
        NoticeKind::Success => ("Done", Color::Green),
        NoticeKind::Error => ("Error", Color::Red),
    };
    let text = format!("{}\n\nPress any key to continue", notice.message);
    let popup = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color));
    frame.render_widget(popup, area);
}

/// Area covered by the edit modal for a given screen size.
pub fn modal_area(area: Rect) -> Rect {
    centered_rect(60, 50, area)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
