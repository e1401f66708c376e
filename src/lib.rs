//! Flappy - a side-scrolling flap-through-the-gaps arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring, phases)
//! - `tuning`: Data-driven game balance
//! - `app`: Fixed-rate loop and the collaborator traits it drives
//! - `frontend`: Terminal renderer, keyboard input and audio cues
//! - `settings`: Player preferences
//! - `session`: In-memory leaderboard for the running process

pub mod app;
pub mod frontend;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::SessionScores;
pub use settings::Settings;
pub use tuning::{ConfigError, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Logical screen size in pixels
    pub const SCREEN_WIDTH: f32 = 400.0;
    pub const SCREEN_HEIGHT: f32 = 600.0;

    /// Fixed loop rate (ticks per second)
    pub const TICK_RATE: u32 = 60;
}
