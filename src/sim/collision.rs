//! Collision detection between the actor and the world
//!
//! Two phases: a cheap bounding-box reject, then per-pixel mask overlap so
//! the rounded actor can graze an obstacle's corner without dying.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::{Actor, GroundSegment, ObstaclePair, Rect};
use super::mask::Mask;
use super::sdf::{sd_box, sd_circle, sd_ellipse, sd_union};
use crate::tuning::Tuning;

/// What the actor ran into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Collision {
    Ground,
    /// Index of the pair (oldest = 0) and which half
    Obstacle { pair: usize, upper: bool },
}

/// Collision shapes for every entity kind, rasterized once per tuning
#[derive(Debug, Clone)]
pub struct Silhouettes {
    pub actor: Mask,
    pub lower: Mask,
    pub upper: Mask,
    pub ground: Mask,
}

impl Silhouettes {
    pub fn new(tuning: &Tuning) -> Self {
        let lower = obstacle_mask(tuning);
        let upper = lower.flipped_vertical();
        Self {
            actor: actor_mask(tuning),
            lower,
            upper,
            ground: Mask::filled(
                pixels(tuning.ground_width()),
                pixels(tuning.ground_height),
            ),
        }
    }
}

fn pixels(len: f32) -> usize {
    len.ceil().max(0.0) as usize
}

/// Rounded body with a small beak poking out of the front
fn actor_mask(tuning: &Tuning) -> Mask {
    let size = Vec2::new(tuning.actor_width, tuning.actor_height);
    let body_radii = size * Vec2::new(0.44, 0.5);
    let body_center = Vec2::new(body_radii.x, size.y * 0.5);
    let beak_radius = size.y * 0.2;
    let beak_center = Vec2::new(size.x - beak_radius, size.y * 0.55);
    Mask::from_sdf(pixels(size.x), pixels(size.y), |p| {
        sd_union(
            sd_ellipse(p, body_center, body_radii),
            sd_circle(p, beak_center, beak_radius),
        )
    })
}

/// Upright obstacle: full-width lip at the top, inset body below
fn obstacle_mask(tuning: &Tuning) -> Mask {
    let size = Vec2::new(tuning.obstacle_width, tuning.obstacle_height);
    let lip = tuning.lip_height.min(size.y);
    let lip_half = Vec2::new(size.x * 0.5, lip * 0.5);
    let body_half = Vec2::new(size.x * 0.5 - tuning.body_inset, (size.y - lip) * 0.5);
    Mask::from_sdf(pixels(size.x), pixels(size.y), |p| {
        sd_union(
            sd_box(p, lip_half, lip_half),
            sd_box(p, Vec2::new(size.x * 0.5, lip + body_half.y), body_half),
        )
    })
}

/// Integer pixel offset of `other` relative to `origin`; non-finite values collapse to 0
#[inline]
fn pixel_offset(origin: Vec2, other: Vec2) -> IVec2 {
    let d = other.floor() - origin.floor();
    IVec2::new(d.x as i32, d.y as i32)
}

fn masks_touch(actor: &Rect, actor_mask: &Mask, other: &Rect, other_mask: &Mask) -> bool {
    actor.intersects(other)
        && actor_mask
            .overlap(other_mask, pixel_offset(actor.min, other.min))
            .is_some()
}

/// Test the actor against every ground segment and obstacle half
///
/// Ground is checked first, then obstacles in spawn order; the first hit
/// wins. Pure and total for any geometry.
pub fn collides(
    actor: &Actor,
    pairs: &[ObstaclePair],
    ground: &[GroundSegment],
    shapes: &Silhouettes,
) -> Option<Collision> {
    let actor_rect = actor.rect();

    if ground
        .iter()
        .any(|seg| masks_touch(&actor_rect, &shapes.actor, &seg.rect(), &shapes.ground))
    {
        return Some(Collision::Ground);
    }

    for (index, pair) in pairs.iter().enumerate() {
        if masks_touch(&actor_rect, &shapes.actor, &pair.lower.rect(), &shapes.lower) {
            return Some(Collision::Obstacle {
                pair: index,
                upper: false,
            });
        }
        if masks_touch(&actor_rect, &shapes.actor, &pair.upper.rect(), &shapes.upper) {
            return Some(Collision::Obstacle {
                pair: index,
                upper: true,
            });
        }
    }

    None
}
