use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Char(char),
    Up,
    Down,
    Esc,
    Enter,
    Backspace,
    CtrlC,
    Other,
}

impl From<KeyEvent> for Input {
    fn from(event: KeyEvent) -> Self {
        // Terminals that report releases would otherwise trigger every action twice
        if event.kind == KeyEventKind::Release {
            return Input::Other;
        }

        match event.code {
            KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => Input::CtrlC,
            KeyCode::Char(c) if !c.is_control() => Input::Char(c),
            KeyCode::Esc => Input::Esc,
            KeyCode::Up => Input::Up,
            KeyCode::Down => Input::Down,
            KeyCode::Enter => Input::Enter,
            KeyCode::Backspace => Input::Backspace,
            other => {
                trace!("{other:?}");
                Input::Other
            }
        }
    }
}
