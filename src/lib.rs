pub mod app;
pub mod cli;
pub mod input;
pub mod io;
pub mod names;
pub mod picker;
pub mod session;
pub mod tui;
mod version;

pub use names::{LoadError, NameList};
pub use picker::{Highlight, Picker, PickerConfig, PickerError};
pub use session::{Session, SessionError, State};
pub use version::VERSION;
