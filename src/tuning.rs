//! Data-driven game balance
//!
//! The contact-ratio threshold and window size were tuned by feel, not
//! derived; they live here as overridable parameters rather than hard
//! invariants so designers can retune difficulty from JSON without a
//! recompile.

use serde::{Deserialize, Serialize};

/// Parameters for the runtime collision hysteresis filter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CollisionTuning {
    /// Rolling history length in frames
    pub window: usize,
    /// Fraction of contact samples (with a full window) that confirms a collision
    pub contact_ratio: f32,
    /// Consecutive clean frames before a pair's history is discarded
    pub clean_frame_reset: u32,
    /// Slack added to the static placement check
    pub placement_epsilon: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            window: 12,
            contact_ratio: 0.5,
            clean_frame_reset: 3,
            placement_epsilon: crate::consts::PLACEMENT_EPSILON,
        }
    }
}

/// Gameplay balance knobs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GameTuning {
    pub collision: CollisionTuning,

    /// Bomb blast radius (raw center distance, independent of figure radii)
    pub blast_radius: f32,
    /// Seconds of collision-check suspension after a shield absorbs a hit
    pub shield_cooldown: f32,
    /// Seconds the vibration clock stays frozen
    pub freeze_duration: f32,
    /// Delay between Celebrating and Win
    pub celebration_delay: f32,
    /// Seconds a notification stays on screen
    pub notification_duration: f32,

    /// Streak bonus per consecutive placement
    pub streak_step: f32,
    /// Streak bonus cap (+50% after 5 placements by default)
    pub streak_cap: f32,

    /// Every Nth level pays a boosted completion bonus
    pub milestone_interval: u32,
    pub milestone_multiplier: f32,
    /// Flat completion bonus per level number
    pub completion_bonus_per_level: u64,
    /// Score per second of remaining time on a win
    pub time_bonus_rate: u64,

    /// Flat time grant when a second chance fires
    pub second_chance_time_bonus: f32,

    /// Placements between endless mutation choices
    pub mutation_interval: u32,
}

impl Default for GameTuning {
    fn default() -> Self {
        Self {
            collision: CollisionTuning::default(),
            blast_radius: 150.0,
            shield_cooldown: 1.5,
            freeze_duration: 5.0,
            celebration_delay: 2.0,
            notification_duration: 2.5,
            streak_step: 0.1,
            streak_cap: 0.5,
            milestone_interval: 5,
            milestone_multiplier: 1.5,
            completion_bonus_per_level: 100,
            time_bonus_rate: 10,
            second_chance_time_bonus: 5.0,
            mutation_interval: 10,
        }
    }
}

impl GameTuning {
    /// Parse a JSON override blob. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
