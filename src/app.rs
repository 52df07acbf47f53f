use std::path::PathBuf;

use tracing::{debug, info, trace, warn};

use crate::input::Input;
use crate::names::NameList;
use crate::picker::{Highlight, Picker, PickerError};

/// One-time message shown in a popup until dismissed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Picked(String),
    Info(String),
    Error(String),
}

pub fn display_name(name: &str) -> &str {
    if name.is_empty() { "(blank)" } else { name }
}

pub fn count_names(count: usize) -> String {
    match count {
        1 => "1 name".into(),
        n => format!("{n} names"),
    }
}

/// Presentation state, everything the renderer shows comes from here.
pub struct App {
    picker: Picker,

    names: NameList,
    run: Option<u64>,
    current: Option<Highlight>,
    scroll: usize,

    prompt: Option<String>,
    notice: Option<Notice>,
    quit: bool,
}

impl App {
    pub fn new(picker: Picker) -> Self {
        Self {
            picker,
            names: Default::default(),
            run: None,
            current: None,
            scroll: 0,
            prompt: None,
            notice: None,
            quit: false,
        }
    }

    pub fn names(&self) -> &NameList {
        &self.names
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    /// Name highlighted by the last tick of the current run.
    pub fn current(&self) -> Option<&Highlight> {
        self.current.as_ref()
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn handle_highlight(&mut self, highlight: Highlight) {
        if self.run != Some(highlight.run) {
            trace!(run = highlight.run, "Dropping stale highlight");
            return;
        }

        self.current = Some(highlight);
    }

    /// Only fails when the picker is gone, every user facing error becomes a notice.
    pub async fn handle_input(&mut self, input: Input) -> Result<(), PickerError> {
        if input == Input::CtrlC {
            self.quit();
            return Ok(());
        }

        if self.notice.is_some() {
            if input != Input::Other {
                self.notice = None;
            }
            return Ok(());
        }

        if let Some(prompt) = self.prompt.as_mut() {
            match input {
                Input::Char(c) => prompt.push(c),
                Input::Backspace => {
                    prompt.pop();
                }
                Input::Enter => {
                    let path = self.prompt.take().unwrap_or_default();
                    if !path.trim().is_empty() {
                        self.load(path.trim()).await?;
                    }
                }
                Input::Esc => {
                    debug!("Prompt cancelled");
                    self.prompt = None;
                }
                _ => {}
            }
            return Ok(());
        }

        match input {
            Input::Char('q') => self.quit(),
            Input::Char('s') | Input::Enter => self.start().await?,
            Input::Char(' ') | Input::Char('x') => self.stop().await?,
            Input::Char('o') => {
                trace!("Opening prompt");
                self.prompt = Some(String::new());
            }
            Input::Char('k') | Input::Up => {
                self.scroll = self.scroll.saturating_sub(1);
            }
            Input::Char('j') | Input::Down => {
                if self.scroll + 1 < self.names.len() {
                    self.scroll += 1;
                }
            }
            _ => {}
        }

        Ok(())
    }

    pub async fn load(&mut self, path: impl Into<PathBuf>) -> Result<(), PickerError> {
        let path = path.into();

        match self.picker.load(&path).await {
            Ok(names) => {
                info!(path = %path.display(), count = names.len(), "Names loaded");
                self.notice = Some(Notice::Info(format!(
                    "Loaded {} from {}",
                    count_names(names.len()),
                    path.display()
                )));

                // The old highlight may not be in the new list, the next tick brings a fresh one
                self.current = None;
                // An empty list ends a run, the session is reset in that case
                if names.is_empty() {
                    self.run = None;
                }
                self.names = names;
                self.scroll = 0;
            }
            Err(PickerError::Load(err)) => {
                self.notice = Some(Notice::Error(err.to_string()));
            }
            Err(err) => return Err(err),
        }

        Ok(())
    }

    async fn start(&mut self) -> Result<(), PickerError> {
        if self.is_running() {
            return Ok(());
        }

        match self.picker.start().await {
            Ok(run) => {
                self.run = Some(run);
                self.current = None;
            }
            Err(PickerError::Session(err)) => {
                warn!("Could not start: {err}");
                self.notice = Some(Notice::Error(err.to_string()));
            }
            Err(err) => return Err(err),
        }

        Ok(())
    }

    async fn stop(&mut self) -> Result<(), PickerError> {
        if !self.is_running() {
            return Ok(());
        }

        let pick = self.picker.stop().await?;
        self.run = None;
        self.current = None;

        if let Some(pick) = pick {
            info!(pick, "Picked");
            self.notice = Some(Notice::Picked(pick));
        }

        Ok(())
    }

    fn quit(&mut self) {
        debug!("Quitting");
        self.picker.close();
        self.quit = true;
    }
}
