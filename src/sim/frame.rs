//! Drawable snapshot of a game state
//!
//! The renderer only ever sees a [`Frame`]: sprite kinds, positions and
//! animation frames in draw order, plus the numbers for the HUD.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};

/// Entity kinds a renderer has to know how to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Actor,
    ObstacleLower,
    ObstacleUpper,
    Ground,
}

/// One positioned drawable
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    /// Top-left corner in screen pixels
    pub pos: Vec2,
    pub size: Vec2,
    /// Animation frame (always 0 for static sprites)
    pub frame: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub phase: GamePhase,
    pub tick: u64,
    pub screen: Vec2,
    /// Actor first, then obstacles in spawn order, then ground
    pub sprites: Vec<Sprite>,
    pub score: u32,
    /// Only on the game-over screens
    pub final_score: Option<u32>,
    pub best_score: Option<u32>,
}

impl GameState {
    /// Snapshot the current state for drawing
    pub fn frame(&self) -> Frame {
        let round = &self.round;
        let mut sprites = Vec::with_capacity(1 + round.pairs.len() * 2 + round.ground.len());

        sprites.push(Sprite {
            kind: SpriteKind::Actor,
            pos: round.actor.pos(),
            size: round.actor.size,
            frame: round.actor.frame,
        });
        for pair in &round.pairs {
            for obstacle in pair.members() {
                let kind = if obstacle.inverted {
                    SpriteKind::ObstacleUpper
                } else {
                    SpriteKind::ObstacleLower
                };
                sprites.push(Sprite {
                    kind,
                    pos: obstacle.rect().min,
                    size: obstacle.size,
                    frame: 0,
                });
            }
        }
        for seg in &round.ground {
            sprites.push(Sprite {
                kind: SpriteKind::Ground,
                pos: seg.rect().min,
                size: seg.size,
                frame: 0,
            });
        }

        let final_score = match self.phase {
            GamePhase::Ended => Some(round.score),
            GamePhase::AwaitingRestart => self.final_score,
            GamePhase::Begin | GamePhase::Playing => None,
        };

        Frame {
            phase: self.phase,
            tick: self.time_ticks,
            screen: Vec2::new(self.tuning.screen_width, self.tuning.screen_height),
            sprites,
            score: round.score,
            final_score,
            best_score: self.session.best(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{TickInput, tick};
    use crate::tuning::Tuning;

    #[test]
    fn test_draw_order() {
        let state = GameState::new(Tuning::default(), 77).unwrap();
        let frame = state.frame();
        let kinds: Vec<_> = frame.sprites.iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SpriteKind::Actor,
                SpriteKind::ObstacleLower,
                SpriteKind::ObstacleUpper,
                SpriteKind::ObstacleLower,
                SpriteKind::ObstacleUpper,
                SpriteKind::Ground,
                SpriteKind::Ground,
            ]
        );
        assert_eq!(frame.sprites[1].pos.x, 600.0);
        assert_eq!(frame.sprites[3].pos.x, 900.0);
        assert_eq!(frame.final_score, None);
        assert_eq!(frame.screen, Vec2::new(400.0, 600.0));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let mut a = GameState::new(Tuning::default(), 31).unwrap();
        let mut b = GameState::new(Tuning::default(), 31).unwrap();
        let inputs = [TickInput::default(), TickInput::jump(), TickInput::default()];
        for input in &inputs {
            tick(&mut a, input);
            tick(&mut b, input);
        }
        let ja = serde_json::to_string(&a.frame()).unwrap();
        let jb = serde_json::to_string(&b.frame()).unwrap();
        assert_eq!(ja, jb);
        assert!(ja.contains("\"phase\":\"Playing\""));
    }
}
