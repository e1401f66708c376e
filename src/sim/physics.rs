//! Actor motion: gravity integration, jump impulse and flap animation

use super::entity::Actor;

/// Advance the actor one step under constant gravity
///
/// Velocity is updated before position (semi-implicit Euler). Nothing is
/// clamped; leaving the screen or hitting the ground is the collision
/// detector's business.
#[inline]
pub fn integrate(actor: &mut Actor, gravity: f32, dt: f32) {
    actor.vel += gravity * dt;
    actor.y += actor.vel * dt;
}

/// Overwrite vertical velocity with an upward kick (never accumulates)
#[inline]
pub fn impulse(actor: &mut Actor, jump_speed: f32) {
    actor.vel = -jump_speed;
}

/// Tick the flap animation; every `threshold` ticks the frame index cycles
pub fn advance_animation(actor: &mut Actor, threshold: u32, frames: u32) {
    actor.frame_counter += 1;
    if actor.frame_counter >= threshold {
        actor.frame_counter = 0;
        actor.frame = (actor.frame + 1) % frames.max(1);
    }
}
