use anyhow::Result;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use std::io;

/// Undoes whatever terminal setup succeeded, on `restore` or on drop.
///
/// Each step is tracked on its own so a failure halfway through `enter`
/// still leaves raw mode switched off again.
#[derive(Debug, Default)]
pub struct TerminalGuard {
    raw_mode: bool,
    alternate_screen: bool,
}

impl TerminalGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&mut self) -> Result<()> {
        enable_raw_mode().map_err(|e| anyhow::anyhow!("Failed to enable raw mode: {}. Make sure you're running in a terminal.", e))?;
        self.raw_mode = true;

        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture).map_err(|e| anyhow::anyhow!("Failed to enter alternate screen: {}. Make sure you're running in a terminal.", e))?;
        self.alternate_screen = true;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.raw_mode || self.alternate_screen
    }

    pub fn restore(&mut self) -> Result<()> {
        if self.alternate_screen {
            self.alternate_screen = false;
            execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture)?;
        }
        if self.raw_mode {
            self.raw_mode = false;
            disable_raw_mode()?;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}
