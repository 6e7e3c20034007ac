use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::prelude::*;
use std::io;

use notedeck::api::NotesClient;
use notedeck::config::Cli;
use notedeck::logging::init_logging;
use notedeck::service::NoteService;
use notedeck::tui::app::App;
use notedeck::tui::terminal::TerminalGuard;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = init_logging(&cli.log_level, &cli.log_dir())?;

    let service = NoteService::new(NotesClient::new(&cli.api_url));
    let mut app = App::new(service, &cli.export_path);
    app.reload().await;

    // Setup terminal; the guard undoes it on every exit path
    let mut guard = TerminalGuard::new();
    guard.enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend).map_err(|e| anyhow::anyhow!("Failed to create terminal: {}. Make sure you're running in a terminal.", e))?;

    let result = run(&mut terminal, &mut app).await;

    // Restore terminal
    guard.restore()?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("event=app_exit module=main status=error error={:#}", e);
    }
    result
}

async fn run<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    while !app.should_quit {
        let size = terminal.size()?;
        app.viewport = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| app.render(f))?;

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                app.handle_key(key.code, key.modifiers).await?;
            }
            Event::Mouse(mouse) => app.handle_mouse(mouse),
            _ => {}
        }
    }
    Ok(())
}
