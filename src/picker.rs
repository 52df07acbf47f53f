use std::path::PathBuf;
use std::time::Duration;

use tokio::select;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::sync::oneshot;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::names::{LoadError, NameList};
use crate::session::{Session, SessionError};

pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);
pub const MIN_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Debug, thiserror::Error)]
pub enum PickerError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("Loading task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
    #[error("Picker is no longer running")]
    Closed,
}

#[derive(Debug, Clone, Copy)]
pub struct PickerConfig {
    /// Time between two ticks, anything shorter than [`MIN_INTERVAL`] is raised to it
    pub interval: Duration,
    pub seed: Option<u64>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            seed: None,
        }
    }
}

/// Name highlighted by a single tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub run: u64,
    pub index: usize,
    pub name: String,
}

enum Message {
    Replace(NameList),
    Start(oneshot::Sender<Result<u64, SessionError>>),
    Stop(oneshot::Sender<Option<String>>),
    Close,
}

struct PickerInner {
    session: Session,
    interval: Interval,
    run: u64,
    rx: UnboundedReceiver<Message>,
    highlights: UnboundedSender<Highlight>,

    token: CancellationToken,
}

impl PickerInner {
    fn tick(&mut self) {
        let Some((index, name)) = self.session.tick() else {
            return;
        };

        let highlight = Highlight {
            run: self.run,
            index,
            name: name.to_string(),
        };

        // Nobody listening is fine, the session state is still updated
        self.highlights.send(highlight).ok();
    }

    fn start(&mut self) -> Result<u64, SessionError> {
        if self.session.is_running() {
            return Ok(self.run);
        }

        self.session.start()?;
        self.run += 1;
        self.interval.reset();
        debug!(run = self.run, "Run started");

        Ok(self.run)
    }

    async fn run(&mut self) {
        loop {
            select! {
                // Commands win over a tick that became ready at the same time
                biased;

                message = self.rx.recv() => {
                    let Some(message) = message else {
                        debug!("All handles dropped");
                        break;
                    };

                    match message {
                        Message::Replace(names) => self.session.replace(names),
                        Message::Start(reply) => {
                            reply.send(self.start()).ok();
                        }
                        Message::Stop(reply) => {
                            reply.send(self.session.stop()).ok();
                        }
                        Message::Close => {
                            break;
                        }
                    }
                }
                _ = self.interval.tick(), if self.session.is_running() => {
                    self.tick();
                }
                _ = self.token.cancelled() => {
                    debug!("Graceful shutdown");
                    break;
                }
            }
        }
    }
}

/// Handle to the task that owns the [`Session`].
///
/// Every operation goes through a single queue, so a tick can never interleave
/// with a start, stop or list replacement.
#[derive(Debug, Clone)]
pub struct Picker {
    tx: UnboundedSender<Message>,
}

impl Picker {
    pub fn spawn(
        names: NameList,
        config: PickerConfig,
        token: CancellationToken,
    ) -> (Self, UnboundedReceiver<Highlight>) {
        let (tx, rx) = unbounded_channel();
        let (highlights, highlights_rx) = unbounded_channel();

        let session = match config.seed {
            Some(seed) => Session::with_seed(names, seed),
            None => Session::new(names),
        };

        // tokio panics on a zero period
        let mut interval = tokio::time::interval(config.interval.max(MIN_INTERVAL));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut inner = PickerInner {
            session,
            interval,
            run: 0,
            rx,
            highlights,
            token,
        };

        tokio::spawn(async move { inner.run().await });

        (Self { tx }, highlights_rx)
    }

    fn send(&self, message: Message) -> Result<(), PickerError> {
        self.tx.send(message).map_err(|_| PickerError::Closed)
    }

    /// Read a list from disk and hand it to the session.
    ///
    /// The session keeps its current list unless the read succeeds.
    pub async fn load(&self, path: impl Into<PathBuf>) -> Result<NameList, PickerError> {
        let path = path.into();
        trace!(path = %path.display(), "Loading names");

        let names = tokio::task::spawn_blocking(move || NameList::load(path))
            .await?
            .inspect_err(|err| warn!("Failed to load names: {err}"))?;

        self.send(Message::Replace(names.clone()))?;

        Ok(names)
    }

    /// Replace the list with names that are already in memory.
    pub fn replace(&self, names: NameList) -> Result<(), PickerError> {
        self.send(Message::Replace(names))
    }

    /// Begin a run, returning its id.
    pub async fn start(&self) -> Result<u64, PickerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Message::Start(reply))?;

        Ok(rx.await.map_err(|_| PickerError::Closed)??)
    }

    /// End the current run and make the final pick.
    ///
    /// Once this returns the run will not produce any further highlights.
    pub async fn stop(&self) -> Result<Option<String>, PickerError> {
        let (reply, rx) = oneshot::channel();
        self.send(Message::Stop(reply))?;

        rx.await.map_err(|_| PickerError::Closed)
    }

    pub fn close(&self) {
        self.tx.send(Message::Close).ok();
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use tokio::sync::mpsc::error::TryRecvError;

    use super::*;

    fn names() -> NameList {
        NameList::new(["Alice", "Bob", "", "Carol"])
    }

    fn config(seed: u64) -> PickerConfig {
        PickerConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    async fn advance(duration: Duration) {
        tokio::time::advance(duration).await;
        // Let the picker task observe the new time
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    async fn advance_intervals(n: u32) {
        for _ in 0..n {
            advance(DEFAULT_INTERVAL).await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_only_while_running() {
        let (picker, mut highlights) = Picker::spawn(names(), config(1), CancellationToken::new());

        advance_intervals(5).await;
        assert_eq!(highlights.try_recv(), Err(TryRecvError::Empty));

        let run = picker.start().await.unwrap();
        // First tick comes one full interval after start
        advance(DEFAULT_INTERVAL / 2).await;
        assert_eq!(highlights.try_recv(), Err(TryRecvError::Empty));

        advance_intervals(3).await;
        let mut count = 0;
        while let Ok(highlight) = highlights.try_recv() {
            assert_eq!(highlight.run, run);
            assert_eq!(names()[highlight.index], highlight.name);
            count += 1;
        }
        assert!(count >= 3, "expected at least 3 ticks, got {count}");

        let pick = picker.stop().await.unwrap().unwrap();
        assert!(names().contains(&pick));

        advance_intervals(5).await;
        assert_eq!(highlights.try_recv(), Err(TryRecvError::Empty));
    }

    #[tokio::test(start_paused = true)]
    async fn start_on_empty_list_fails() {
        let (picker, _highlights) =
            Picker::spawn(NameList::default(), config(1), CancellationToken::new());

        let err = picker.start().await.unwrap_err();
        assert!(matches!(err, PickerError::Session(SessionError::EmptyList)));
        assert_eq!(picker.stop().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_without_start_is_a_no_op() {
        let (picker, _highlights) = Picker::spawn(names(), config(1), CancellationToken::new());
        assert_eq!(picker.stop().await.unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn each_start_gets_a_new_run_id() {
        let (picker, _highlights) = Picker::spawn(names(), config(1), CancellationToken::new());

        let first = picker.start().await.unwrap();
        assert_eq!(picker.start().await.unwrap(), first);
        picker.stop().await.unwrap();

        let second = picker.start().await.unwrap();
        assert!(second > first);
    }

    #[tokio::test]
    async fn failed_load_keeps_previous_list() {
        let (picker, _highlights) = Picker::spawn(names(), config(1), CancellationToken::new());

        let dir = tempfile::tempdir().unwrap();
        let err = picker.load(dir.path().join("missing.txt")).await.unwrap_err();
        assert!(matches!(err, PickerError::Load(LoadError::NotFound(_))));

        picker.start().await.unwrap();
        let pick = picker.stop().await.unwrap().unwrap();
        assert!(names().contains(&pick));
    }

    #[tokio::test]
    async fn load_replaces_list() {
        let (picker, _highlights) =
            Picker::spawn(NameList::default(), config(1), CancellationToken::new());

        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "  Dave  ").unwrap();

        let loaded = picker.load(file.path()).await.unwrap();
        assert_eq!(&*loaded, ["Dave"]);

        picker.start().await.unwrap();
        assert_eq!(picker.stop().await.unwrap().as_deref(), Some("Dave"));
    }

    #[tokio::test(start_paused = true)]
    async fn same_seed_gives_same_highlights() {
        async fn run(seed: u64) -> Vec<String> {
            let (picker, mut highlights) =
                Picker::spawn(names(), config(seed), CancellationToken::new());
            picker.start().await.unwrap();
            advance_intervals(4).await;
            let pick = picker.stop().await.unwrap().unwrap();

            let mut seen = Vec::new();
            while let Ok(highlight) = highlights.try_recv() {
                seen.push(highlight.name);
            }
            seen.push(pick);
            seen
        }

        assert_eq!(run(5).await, run(5).await);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_is_clamped() {
        let config = PickerConfig {
            interval: Duration::ZERO,
            seed: Some(1),
        };
        let (picker, mut highlights) = Picker::spawn(names(), config, CancellationToken::new());

        let run = picker.start().await.unwrap();
        advance(MIN_INTERVAL).await;
        assert_eq!(highlights.try_recv().unwrap().run, run);
    }

    #[tokio::test(start_paused = true)]
    async fn replace_while_running_draws_from_new_list() {
        let (picker, mut highlights) = Picker::spawn(names(), config(1), CancellationToken::new());

        picker.start().await.unwrap();
        picker.replace(NameList::new(["Dave", "Erin"])).unwrap();
        advance_intervals(3).await;

        let mut count = 0;
        while let Ok(highlight) = highlights.try_recv() {
            assert!(highlight.name == "Dave" || highlight.name == "Erin");
            count += 1;
        }
        assert!(count > 0);

        let pick = picker.stop().await.unwrap().unwrap();
        assert!(pick == "Dave" || pick == "Erin");
    }

    #[tokio::test(start_paused = true)]
    async fn replace_with_empty_list_abandons_run() {
        let (picker, mut highlights) = Picker::spawn(names(), config(1), CancellationToken::new());

        picker.start().await.unwrap();
        picker.replace(NameList::default()).unwrap();
        advance_intervals(3).await;

        assert_eq!(highlights.try_recv(), Err(TryRecvError::Empty));
        assert_eq!(picker.stop().await.unwrap(), None);
        assert!(matches!(
            picker.start().await,
            Err(PickerError::Session(SessionError::EmptyList))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_token_closes_picker() {
        let token = CancellationToken::new();
        let (picker, _highlights) = Picker::spawn(names(), config(1), token.clone());

        token.cancel();
        advance(Duration::from_millis(1)).await;

        assert!(matches!(picker.start().await, Err(PickerError::Closed)));
    }

    #[tokio::test(start_paused = true)]
    async fn close_ends_the_task() {
        let (picker, mut highlights) = Picker::spawn(names(), config(1), CancellationToken::new());

        picker.close();
        assert_eq!(highlights.recv().await, None);
        assert!(matches!(picker.stop().await, Err(PickerError::Closed)));
    }
}
