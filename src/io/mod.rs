mod terminal_handle;

pub use terminal_handle::TerminalHandle;
