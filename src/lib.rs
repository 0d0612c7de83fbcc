//! Petri Panic - a vibrating-figure placement puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (placement, collision hysteresis, game state)
//! - `tuning`: Data-driven game balance
//! - `records`: Endless-mode best score/wave bookkeeping
//!
//! The crate is headless: hosts feed it pointer placements and wall-clock
//! timer ticks, and read back state snapshots plus the event list each
//! mutating call returns. Rendering, persistence and accounts live outside.

pub mod records;
pub mod sim;
pub mod tuning;

pub use records::EndlessRecords;
pub use tuning::{CollisionTuning, GameTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Nominal frame duration the hysteresis window is calibrated against
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Canvas defaults (logical pixels at canvas scale 1.0)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Resting radius of a scale-1.0 figure
    pub const BASE_FIGURE_SIZE: f32 = 30.0;
    /// Fixed padding added on top of the vibration envelope
    pub const COLLISION_PADDING: f32 = 2.0;
    /// Extra slack applied to the static placement check
    pub const PLACEMENT_EPSILON: f32 = 0.5;

    /// Play-area inset before any shrinking has happened
    pub const BASE_BOUNDARY_PADDING: f32 = 20.0;

    /// Queue id of the bomb pseudo-figure (not a collidable template)
    pub const BOMB_ID: &str = "bomb";
}

/// Squared distance between two canvas points
#[inline]
pub fn distance_sq(a: Vec2, b: Vec2) -> f32 {
    (a - b).length_squared()
}

/// Distance between two canvas points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (a - b).length()
}
