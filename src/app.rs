//! Fixed-rate game loop and the collaborators it drives
//!
//! The loop owns no game logic: every tick it waits on the [`Pacer`],
//! drains the [`InputSource`], runs [`tick`], forwards audio cues to the
//! [`AudioSink`] and hands a [`Frame`] to the [`Renderer`].

use std::collections::VecDeque;
use std::fmt;
use std::time::{Duration, Instant};

use crate::sim::{AudioCue, Frame, GameState, InputEvent, TickInput, tick};

/// Failure in a frontend collaborator
#[derive(Debug)]
pub enum FrontendError {
    Io(std::io::Error),
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Io(e) => write!(f, "terminal I/O failed: {e}"),
        }
    }
}

impl std::error::Error for FrontendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrontendError::Io(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for FrontendError {
    fn from(e: std::io::Error) -> Self {
        FrontendError::Io(e)
    }
}

/// Draws snapshots
pub trait Renderer {
    fn draw(&mut self, frame: &Frame) -> Result<(), FrontendError>;
}

/// Yields the events that arrived since the last poll; never blocks
pub trait InputSource {
    fn poll(&mut self) -> Result<Vec<InputEvent>, FrontendError>;
}

/// Plays cues; failures stay inside the sink
pub trait AudioSink {
    fn play(&mut self, cue: AudioCue);
}

/// Caps the loop rate
pub trait Pacer {
    fn wait(&mut self);
}

/// Sleeps away whatever is left of each tick's time slice
#[derive(Debug)]
pub struct FixedRate {
    period: Duration,
    next: Option<Instant>,
}

impl FixedRate {
    pub fn new(ticks_per_second: u32) -> Self {
        Self {
            period: Duration::from_secs(1) / ticks_per_second.max(1),
            next: None,
        }
    }

}

impl Pacer for FixedRate {
    fn wait(&mut self) {
        let now = Instant::now();
        let deadline = self.next.unwrap_or(now);
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        // After a stall, resync instead of bursting to catch up
        let base = if deadline + self.period < now { now } else { deadline };
        self.next = Some(base + self.period);
    }
}

/// Pacer for headless runs and tests
#[derive(Debug, Default)]
pub struct Unpaced;

impl Pacer for Unpaced {
    fn wait(&mut self) {}
}

/// Discards cues
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Replays a fixed per-tick script of events, then stays silent
#[derive(Debug, Default)]
pub struct ScriptedInput {
    ticks: VecDeque<Vec<InputEvent>>,
}

impl ScriptedInput {
    pub fn new(ticks: impl IntoIterator<Item = Vec<InputEvent>>) -> Self {
        Self {
            ticks: ticks.into_iter().collect(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Result<Vec<InputEvent>, FrontendError> {
        Ok(self.ticks.pop_front().unwrap_or_default())
    }
}

/// Keeps every frame it is asked to draw
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pub frames: Vec<Frame>,
}

impl Renderer for FrameRecorder {
    fn draw(&mut self, frame: &Frame) -> Result<(), FrontendError> {
        self.frames.push(frame.clone());
        Ok(())
    }
}

/// What a run looked like when it stopped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub rounds: u32,
    pub best_score: Option<u32>,
    /// False when the run hit its tick limit instead
    pub quit: bool,
}

/// Run until quit (or `max_ticks`, if given)
///
/// The game state is consumed: on quit it is dropped in full, together
/// with whatever round was in progress. A quitting tick is not drawn.
pub fn run(
    mut state: GameState,
    renderer: &mut dyn Renderer,
    input: &mut dyn InputSource,
    audio: &mut dyn AudioSink,
    pacer: &mut dyn Pacer,
    max_ticks: Option<u64>,
) -> Result<RunSummary, FrontendError> {
    log::info!("Game loop running (seed {})", state.seed);
    let mut ticks = 0u64;
    let mut quit = false;

    while max_ticks.is_none_or(|max| ticks < max) {
        pacer.wait();
        let events = input.poll()?;
        let outcome = tick(&mut state, &TickInput { events });
        ticks += 1;
        // Cues from events applied before a quit still play
        for cue in outcome.cues {
            audio.play(cue);
        }
        if outcome.quit {
            quit = true;
            break;
        }
        renderer.draw(&state.frame())?;
    }

    let summary = RunSummary {
        ticks,
        rounds: state.rounds,
        best_score: state.session.best(),
        quit,
    };
    log::info!("Game loop stopped after {} ticks", summary.ticks);
    Ok(summary)
}
