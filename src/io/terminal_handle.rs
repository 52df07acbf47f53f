use std::io::Stdout;

use crossterm::execute;
use crossterm::terminal::{
    Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode,
    enable_raw_mode,
};
use tracing::error;

/// Owns the terminal for the lifetime of the interface.
///
/// Raw mode and the alternate screen are undone on drop, also when unwinding.
pub struct TerminalHandle {
    sink: Stdout,
    active: bool,
}

impl TerminalHandle {
    pub fn start() -> std::io::Result<Self> {
        enable_raw_mode()?;

        let mut terminal_handle = Self {
            sink: std::io::stdout(),
            active: true,
        };

        execute!(terminal_handle, EnterAlternateScreen)?;
        execute!(terminal_handle, Clear(ClearType::All))?;

        Ok(terminal_handle)
    }

    pub fn leave_alternate_screen(&mut self) -> std::io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;

        execute!(self, LeaveAlternateScreen)?;
        disable_raw_mode()
    }
}

impl Drop for TerminalHandle {
    fn drop(&mut self) {
        if let Err(e) = self.leave_alternate_screen() {
            error!("Failed to restore terminal: {e:?}");
        }
    }
}

impl std::io::Write for TerminalHandle {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.sink.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.sink.flush()
    }
}
