//! Endless-mode record bookkeeping
//!
//! Tracks the top runs by score plus best-wave convenience accessors. Pure
//! in-memory: persistence belongs to an external collaborator that
//! serializes this struct after each run.

use serde::{Deserialize, Serialize};

/// Maximum number of record entries to keep
pub const MAX_RECORDS: usize = 10;

/// One finished endless run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub score: u64,
    pub wave: u32,
}

/// Endless leaderboard, sorted descending by score
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndlessRecords {
    pub entries: Vec<RecordEntry>,
}

impl EndlessRecords {
    pub fn new() -> Self {
        Self::default()
    }

    /// Would this score make the board?
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_RECORDS {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Record a finished run. Returns the rank achieved (1-indexed) when the
    /// score makes the board.
    pub fn submit(&mut self, score: u64, wave: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let entry = RecordEntry { score, wave };
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };
        self.entries.truncate(MAX_RECORDS);
        Some(rank)
    }

    pub fn best_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Deepest wave ever reached, regardless of that run's score rank
    pub fn best_wave(&self) -> Option<u32> {
        self.entries.iter().map(|e| e.wave).max()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_keeps_descending_order_and_ranks() {
        let mut records = EndlessRecords::new();
        assert_eq!(records.submit(100, 3), Some(1));
        assert_eq!(records.submit(300, 5), Some(1));
        assert_eq!(records.submit(200, 9), Some(2));
        assert_eq!(records.best_score(), Some(300));
        assert_eq!(records.best_wave(), Some(9));
    }

    #[test]
    fn zero_score_never_qualifies() {
        let mut records = EndlessRecords::new();
        assert!(!records.qualifies(0));
        assert_eq!(records.submit(0, 12), None);
        assert!(records.is_empty());
    }

    #[test]
    fn board_truncates_at_capacity() {
        let mut records = EndlessRecords::new();
        for i in 1..=(MAX_RECORDS as u64 + 5) {
            records.submit(i * 10, i as u32);
        }
        assert_eq!(records.entries.len(), MAX_RECORDS);
        // Lowest surviving score is the 10th best
        assert_eq!(records.entries.last().map(|e| e.score), Some(60));
        // A score below the floor no longer qualifies
        assert!(!records.qualifies(50));
    }
}
