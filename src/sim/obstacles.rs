//! Obstacle pair generation, scrolling and recycling, plus the ground strip

use glam::Vec2;
use rand::Rng;

use super::entity::{GroundSegment, Obstacle, ObstaclePair};
use crate::tuning::Tuning;

/// Spawn a pair at `x` with a random split height
///
/// The lower half's top edge sits `split` pixels above the bottom of the
/// screen; the upper half ends exactly `gap` pixels above that.
pub fn spawn_pair<R: Rng + ?Sized>(x: f32, rng: &mut R, tuning: &Tuning) -> ObstaclePair {
    let split = rng.random_range(tuning.split_min..=tuning.split_max);
    pair_with_split(x, split, tuning)
}

/// Deterministic constructor used by [`spawn_pair`]
pub fn pair_with_split(x: f32, split: u32, tuning: &Tuning) -> ObstaclePair {
    let size = Vec2::new(tuning.obstacle_width, tuning.obstacle_height);
    let lower_top = tuning.screen_height - split as f32;
    let upper_bottom = lower_top - tuning.gap;
    ObstaclePair {
        lower: Obstacle::new(x, lower_top, size, false),
        upper: Obstacle::new(x, upper_bottom - size.y, size, true),
        split,
    }
}

/// The two pairs every round starts with
pub fn initial_pairs<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> Vec<ObstaclePair> {
    let first = tuning.first_pair_x();
    vec![
        spawn_pair(first, rng, tuning),
        spawn_pair(first + tuning.horizontal_spacing, rng, tuning),
    ]
}

/// Replace the oldest pair once it has fully left the screen
///
/// The replacement goes one spacing to the right of the newest live pair,
/// so consecutive pairs stay exactly `horizontal_spacing` apart. Returns
/// true when a pair was recycled.
pub fn recycle_pairs<R: Rng + ?Sized>(
    pairs: &mut Vec<ObstaclePair>,
    rng: &mut R,
    tuning: &Tuning,
) -> bool {
    let Some(oldest) = pairs.first() else {
        return false;
    };
    if !oldest.is_off_screen() {
        return false;
    }

    let removed = pairs.remove(0);
    let frontier = pairs.last().map_or(removed.x(), ObstaclePair::x);
    let pair = spawn_pair(frontier + tuning.horizontal_spacing, rng, tuning);
    log::trace!("Recycled pair: new split {} at x {}", pair.split, pair.x());
    pairs.push(pair);
    true
}

/// Scroll every obstacle left by `dx`
pub fn scroll_pairs(pairs: &mut [ObstaclePair], dx: f32) {
    for pair in pairs {
        pair.scroll(dx);
    }
}

/// Two ground tiles covering the screen side by side
pub fn initial_ground(tuning: &Tuning) -> Vec<GroundSegment> {
    (0..2)
        .map(|i| GroundSegment::new(tuning.ground_width() * i as f32, tuning))
        .collect()
}

/// Move an off-screen ground tile to the right edge of the other one
pub fn recycle_ground(ground: &mut Vec<GroundSegment>, tuning: &Tuning) -> bool {
    let Some(first) = ground.first() else {
        return false;
    };
    if !first.is_off_screen() {
        return false;
    }

    let removed = ground.remove(0);
    let x = ground.last().map_or(removed.right(), GroundSegment::right);
    ground.push(GroundSegment::new(x, tuning));
    true
}

pub fn scroll_ground(ground: &mut [GroundSegment], dx: f32) {
    for seg in ground {
        seg.x -= dx;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pair_geometry() {
        let tuning = Tuning::default();
        let pair = pair_with_split(600.0, 200, &tuning);
        assert_eq!(pair.lower.top(), 400.0);
        assert_eq!(pair.upper.bottom(), 250.0);
        assert_eq!(pair.gap(), 150.0);
        assert!(pair.upper.inverted);
        assert!(!pair.lower.inverted);
        assert_eq!(pair.lower.x(), pair.upper.x());
        assert!(!pair.is_scored());
    }

    #[test]
    fn test_initial_layout() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let pairs = initial_pairs(&mut rng, &tuning);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].x(), 600.0);
        assert_eq!(pairs[1].x(), 900.0);
        for pair in &pairs {
            assert!((100..=300).contains(&pair.split));
        }
    }

    #[test]
    fn test_recycle_only_when_fully_off_screen() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut pairs = initial_pairs(&mut rng, &tuning);

        // Scroll until the right edge of the oldest pair is exactly at x = 0
        scroll_pairs(&mut pairs, 680.0);
        assert_eq!(pairs[0].right(), 0.0);
        assert!(!recycle_pairs(&mut pairs, &mut rng, &tuning));

        scroll_pairs(&mut pairs, 5.0);
        assert!(recycle_pairs(&mut pairs, &mut rng, &tuning));
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].x(), 215.0);
        assert_eq!(pairs[1].x(), 515.0);
    }

    #[test]
    fn test_ground_recycles_seamlessly() {
        let tuning = Tuning::default();
        let mut ground = initial_ground(&tuning);
        assert_eq!(ground[0].x(), 0.0);
        assert_eq!(ground[1].x(), 800.0);

        for _ in 0..1000 {
            recycle_ground(&mut ground, &tuning);
            scroll_ground(&mut ground, tuning.scroll_speed);
            assert_eq!(ground.len(), 2);
            assert_eq!(ground[0].right(), ground[1].x());
            // The visible screen stays covered
            assert!(ground[0].x() <= 0.0);
            assert!(ground[1].right() >= tuning.screen_width);
            // At most one tile is off-screen at a time
            assert!(!ground[1].is_off_screen());
        }
    }

    proptest! {
        #[test]
        fn prop_spacing_survives_recycling(seed in any::<u64>(), ticks in 1usize..2000) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pairs = initial_pairs(&mut rng, &tuning);
            for _ in 0..ticks {
                recycle_pairs(&mut pairs, &mut rng, &tuning);
                scroll_pairs(&mut pairs, tuning.scroll_speed);
                prop_assert_eq!(pairs.len(), 2);
                for w in pairs.windows(2) {
                    prop_assert_eq!(w[1].x() - w[0].x(), tuning.horizontal_spacing);
                }
            }
        }

        #[test]
        fn prop_gap_is_invariant(seed in any::<u64>(), ticks in 0usize..500) {
            let tuning = Tuning::default();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut pairs = initial_pairs(&mut rng, &tuning);
            for _ in 0..ticks {
                recycle_pairs(&mut pairs, &mut rng, &tuning);
                scroll_pairs(&mut pairs, tuning.scroll_speed);
                for pair in &pairs {
                    prop_assert_eq!(pair.gap(), tuning.gap);
                    prop_assert_eq!(pair.lower.x(), pair.upper.x());
                }
            }
        }
    }
}
