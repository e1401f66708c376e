//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod entity;
pub mod frame;
pub mod mask;
pub mod obstacles;
pub mod physics;
pub mod scoring;
pub mod sdf;
pub mod state;
pub mod tick;

pub use collision::{Collision, Silhouettes, collides};
pub use entity::{Actor, GroundSegment, Obstacle, ObstaclePair, Rect};
pub use frame::{Frame, Sprite, SpriteKind};
pub use mask::Mask;
pub use obstacles::spawn_pair;
pub use physics::{advance_animation, impulse, integrate};
pub use scoring::update_score;
pub use state::{GamePhase, GameState, Round};
pub use tick::{AudioCue, InputEvent, TickInput, TickOutcome, tick};
