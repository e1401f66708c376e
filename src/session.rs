//! Session leaderboard
//!
//! Tracks the best round scores of the running process only. Nothing is
//! written to disk; a new process starts with an empty board.

use serde::{Deserialize, Serialize};

/// Maximum number of scores to keep
pub const MAX_SESSION_SCORES: usize = 5;

/// Best scores so far, sorted descending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionScores {
    pub entries: Vec<u32>,
}

impl SessionScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Place a finished round's score on the board
    ///
    /// Returns the 1-based rank, or `None` when it does not make the board.
    /// A round that scored nothing is never recorded.
    pub fn record(&mut self, score: u32) -> Option<usize> {
        if score == 0 {
            return None;
        }
        // Ties keep the earlier round ahead
        let slot = self.entries.partition_point(|&e| e >= score);
        if slot >= MAX_SESSION_SCORES {
            return None;
        }
        self.entries.insert(slot, score);
        self.entries.truncate(MAX_SESSION_SCORES);
        Some(slot + 1)
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_is_never_recorded() {
        let mut scores = SessionScores::new();
        assert_eq!(scores.record(0), None);
        assert!(scores.entries.is_empty());
        assert_eq!(scores.best(), None);
    }

    #[test]
    fn test_ranking_and_truncation() {
        let mut scores = SessionScores::new();
        assert_eq!(scores.record(3), Some(1));
        assert_eq!(scores.record(10), Some(1));
        assert_eq!(scores.record(3), Some(3));
        assert_eq!(scores.record(5), Some(2));
        assert_eq!(scores.record(1), Some(5));
        assert_eq!(scores.entries, vec![10, 5, 3, 3, 1]);

        // Full board: must beat the lowest entry
        assert_eq!(scores.record(1), None);
        assert_eq!(scores.record(4), Some(3));
        assert_eq!(scores.entries, vec![10, 5, 4, 3, 3]);
        assert_eq!(scores.best(), Some(10));
    }
}
