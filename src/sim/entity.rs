//! Plain entity records: the actor, obstacle pairs and ground segments
//!
//! Positions are top-left corners in screen space (y grows downward).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Axis-aligned rectangle (top-left + size)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    /// Strict overlap (touching edges do not count). NaN never intersects.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// The controllable entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    /// Fixed after spawn
    pub(crate) x: f32,
    /// Only the integrator moves this
    pub(crate) y: f32,
    /// Vertical velocity (negative = upward)
    pub(crate) vel: f32,
    pub size: Vec2,
    /// Current animation frame index
    pub frame: u32,
    /// Ticks since the last frame advance
    pub frame_counter: u32,
}

impl Actor {
    /// Spawn at the tuning's fixed coordinates, at rest
    pub fn spawn(tuning: &Tuning) -> Self {
        Self::at(
            tuning.spawn_x,
            tuning.spawn_y,
            Vec2::new(tuning.actor_width, tuning.actor_height),
        )
    }

    pub fn at(x: f32, y: f32, size: Vec2) -> Self {
        Self {
            x,
            y,
            vel: 0.0,
            size,
            frame: 0,
            frame_counter: 0,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn y(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn velocity(&self) -> f32 {
        self.vel
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: self.pos(),
            size: self.size,
        }
    }
}

/// One half of an obstacle pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub(crate) x: f32,
    /// Top edge; never changes after spawn
    pub(crate) y: f32,
    pub size: Vec2,
    /// Upper halves are drawn flipped and hang from the top of the screen
    pub inverted: bool,
    pub scored: bool,
}

impl Obstacle {
    pub fn new(x: f32, y: f32, size: Vec2, inverted: bool) -> Self {
        Self {
            x,
            y,
            size,
            inverted,
            scored: false,
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.size.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.size.x
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: Vec2::new(self.x, self.y),
            size: self.size,
        }
    }

    /// Fully past the left screen edge
    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x < -self.size.x
    }
}

/// Two obstacles sharing one x and one randomized split
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstaclePair {
    pub lower: Obstacle,
    pub upper: Obstacle,
    /// Randomized split height the pair was spawned with
    pub split: u32,
}

impl ObstaclePair {
    #[inline]
    pub fn x(&self) -> f32 {
        self.lower.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.lower.right()
    }

    /// Vertical clearance between the halves
    #[inline]
    pub fn gap(&self) -> f32 {
        self.lower.top() - self.upper.bottom()
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.lower.is_off_screen()
    }

    /// Move both halves left by `dx`
    pub fn scroll(&mut self, dx: f32) {
        self.lower.x -= dx;
        self.upper.x -= dx;
    }

    /// Members in spawn order (lower first)
    pub fn members(&self) -> [&Obstacle; 2] {
        [&self.lower, &self.upper]
    }

    pub fn members_mut(&mut self) -> [&mut Obstacle; 2] {
        [&mut self.lower, &mut self.upper]
    }

    pub fn is_scored(&self) -> bool {
        self.lower.scored
    }
}

/// A tile of the scrolling ground strip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub(crate) x: f32,
    pub(crate) y: f32,
    pub size: Vec2,
}

impl GroundSegment {
    pub fn new(x: f32, tuning: &Tuning) -> Self {
        Self {
            x,
            y: tuning.ground_top(),
            size: Vec2::new(tuning.ground_width(), tuning.ground_height),
        }
    }

    #[inline]
    pub fn x(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.size.x
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: Vec2::new(self.x, self.y),
            size: self.size,
        }
    }

    #[inline]
    pub fn is_off_screen(&self) -> bool {
        self.x < -self.size.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_intersection() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(a.intersects(&Rect::new(5.0, 5.0, 10.0, 10.0)));
        // Touching edges are not an overlap
        assert!(!a.intersects(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.intersects(&Rect::new(f32::NAN, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn test_actor_spawn() {
        let tuning = Tuning::default();
        let actor = Actor::spawn(&tuning);
        assert_eq!(actor.pos(), Vec2::new(67.0, 300.0));
        assert_eq!(actor.velocity(), 0.0);
        assert_eq!(actor.frame, 0);
        assert_eq!(actor.rect().right(), 67.0 + 34.0);
    }

    #[test]
    fn test_obstacle_off_screen() {
        let mut obstacle = Obstacle::new(0.0, 100.0, Vec2::new(80.0, 500.0), false);
        assert!(!obstacle.is_off_screen());
        obstacle.x = -80.0;
        assert!(!obstacle.is_off_screen());
        obstacle.x = -80.5;
        assert!(obstacle.is_off_screen());
    }

    #[test]
    fn test_ground_segment_layout() {
        let tuning = Tuning::default();
        let ground = GroundSegment::new(800.0, &tuning);
        assert_eq!(ground.rect(), Rect::new(800.0, 500.0, 800.0, 100.0));
        assert_eq!(ground.right(), 1600.0);
    }
}
