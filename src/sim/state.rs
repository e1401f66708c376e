//! Game state and core simulation types

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Silhouettes;
use super::entity::{Actor, GroundSegment, ObstaclePair};
use super::obstacles::{initial_ground, initial_pairs};
use crate::session::SessionScores;
use crate::tuning::{Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Actor idles in place, waiting for the first jump
    Begin,
    /// Active simulation
    Playing,
    /// Collision happened this round; lasts one tick
    Ended,
    /// Game-over screen, waiting for restart or quit
    AwaitingRestart,
}

/// Everything belonging to one playthrough
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub score: u32,
    pub actor: Actor,
    /// Oldest (leftmost) first
    pub pairs: Vec<ObstaclePair>,
    pub ground: Vec<GroundSegment>,
}

impl Round {
    pub fn new(rng: &mut Pcg32, tuning: &Tuning) -> Self {
        Self {
            score: 0,
            actor: Actor::spawn(tuning),
            pairs: initial_pairs(rng, tuning),
            ground: initial_ground(tuning),
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) tuning: Tuning,
    pub(crate) shapes: Silhouettes,
    pub phase: GamePhase,
    pub round: Round,
    /// Score of the most recently finished round
    pub final_score: Option<u32>,
    /// Rounds started since the process began (1 = first round)
    pub rounds: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub session: SessionScores,
}

impl GameState {
    /// Validate the tuning and set up the first round
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);
        let round = Round::new(&mut rng, &tuning);
        let shapes = Silhouettes::new(&tuning);
        log::info!("Game initialized with seed: {seed}");
        Ok(Self {
            seed,
            rng,
            tuning,
            shapes,
            phase: GamePhase::Begin,
            round,
            final_score: None,
            rounds: 1,
            time_ticks: 0,
            session: SessionScores::new(),
        })
    }

    /// Drop the current round and start a fresh one in Begin
    ///
    /// The RNG keeps running, so rounds differ but stay reproducible.
    pub fn new_round(&mut self) {
        self.round = Round::new(&mut self.rng, &self.tuning);
        self.phase = GamePhase::Begin;
        self.final_score = None;
        self.rounds += 1;
        log::info!("Round {} ready", self.rounds);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = GameState::new(Tuning::default(), 42).unwrap();
        assert_eq!(state.phase, GamePhase::Begin);
        assert_eq!(state.round.score, 0);
        assert_eq!(state.round.pairs.len(), 2);
        assert_eq!(state.round.ground.len(), 2);
        assert_eq!(state.final_score, None);
        assert_eq!(state.rounds, 1);
    }

    #[test]
    fn test_rejects_bad_tuning() {
        let tuning = Tuning {
            horizontal_spacing: 0.0,
            ..Default::default()
        };
        assert!(GameState::new(tuning, 1).is_err());
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(Tuning::default(), 9).unwrap();
        let b = GameState::new(Tuning::default(), 9).unwrap();
        assert_eq!(a.round, b.round);
    }

    #[test]
    fn test_new_round_resets() {
        let mut state = GameState::new(Tuning::default(), 5).unwrap();
        state.round.score = 12;
        state.round.pairs.clear();
        state.phase = GamePhase::AwaitingRestart;
        state.final_score = Some(12);

        state.new_round();
        assert_eq!(state.phase, GamePhase::Begin);
        assert_eq!(state.round.score, 0);
        assert_eq!(state.round.pairs.len(), 2);
        assert_eq!(state.final_score, None);
        assert_eq!(state.rounds, 2);
    }
}
