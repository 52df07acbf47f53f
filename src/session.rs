use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng as _};
use tracing::{debug, trace};

use crate::names::NameList;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("The list is empty, load a list first")]
    EmptyList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum State {
    #[default]
    Idle,
    Running,
    Stopped,
}

/// Random selection session.
///
/// While running every [`Session::tick`] highlights a uniformly random name.
/// [`Session::stop`] makes one more independent draw and reports that as the
/// result, so the final pick does not have to match the last highlighted name.
#[derive(Debug)]
pub struct Session {
    names: NameList,
    rng: StdRng,
    state: State,
    current_pick: Option<String>,
    final_pick: Option<String>,
}

impl Session {
    pub fn new(names: NameList) -> Self {
        Self::with_rng(names, StdRng::from_entropy())
    }

    pub fn with_seed(names: NameList, seed: u64) -> Self {
        Self::with_rng(names, StdRng::seed_from_u64(seed))
    }

    fn with_rng(names: NameList, rng: StdRng) -> Self {
        Self {
            names,
            rng,
            state: State::Idle,
            current_pick: None,
            final_pick: None,
        }
    }

    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == State::Running
    }

    pub fn names(&self) -> &NameList {
        &self.names
    }

    pub fn current_pick(&self) -> Option<&str> {
        self.current_pick.as_deref()
    }

    pub fn final_pick(&self) -> Option<&str> {
        self.final_pick.as_deref()
    }

    /// Swap in a freshly loaded list.
    ///
    /// The highlighted name always belongs to the list in effect, so it is
    /// cleared even when the run carries on over the new list.
    pub fn replace(&mut self, names: NameList) {
        self.names = names;
        self.current_pick = None;

        if self.is_running() && !self.names.is_empty() {
            debug!(count = self.names.len(), "List replaced while running");
            return;
        }

        debug!(count = self.names.len(), "List replaced, resetting session");
        self.state = State::Idle;
        self.final_pick = None;
    }

    pub fn start(&mut self) -> Result<(), SessionError> {
        if self.names.is_empty() {
            return Err(SessionError::EmptyList);
        }

        if self.is_running() {
            trace!("Already running");
            return Ok(());
        }

        debug!("Starting");
        self.state = State::Running;
        self.current_pick = None;
        self.final_pick = None;

        Ok(())
    }

    pub fn tick(&mut self) -> Option<(usize, &str)> {
        if !self.is_running() {
            return None;
        }

        let index = self.draw();
        trace!(index, "tick");
        self.current_pick = Some(self.names[index].clone());

        Some((index, self.names[index].as_str()))
    }

    pub fn stop(&mut self) -> Option<String> {
        if !self.is_running() {
            return None;
        }

        let index = self.draw();
        let pick = self.names[index].clone();
        debug!(pick, "Stopped");

        self.state = State::Stopped;
        self.current_pick = None;
        self.final_pick = Some(pick.clone());

        Some(pick)
    }

    fn draw(&mut self) -> usize {
        self.rng.gen_range(0..self.names.len())
    }
}
