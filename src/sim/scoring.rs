//! Score keeping: one point per obstacle pair the actor gets past

use super::entity::{Actor, ObstaclePair};

/// Award a point for the oldest pair once the actor is past its right edge
///
/// Only the first obstacle in spawn order (the oldest pair's lower half) is
/// inspected. When it scores, the obstacle after it in spawn order is
/// marked as well, which is the upper half of that same pair.
pub fn update_score(actor: &Actor, pairs: &mut [ObstaclePair], score: u32) -> u32 {
    let mut members = pairs.iter_mut().flat_map(ObstaclePair::members_mut);
    let Some(oldest) = members.next() else {
        return score;
    };
    if oldest.scored || actor.x() <= oldest.right() {
        return score;
    }

    oldest.scored = true;
    if let Some(next) = members.next() {
        next.scored = true;
    }
    let score = score.saturating_add(1);
    log::debug!("Scored: {score}");
    score
}
