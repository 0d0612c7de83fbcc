//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (queue generation, mutation offers)
//! - Explicit event lists returned from every mutating call
//! - Stable iteration order (placed figures kept sorted by instance id)
//! - No rendering or platform dependencies

pub mod catalog;
pub mod collision;
pub mod mitigation;
pub mod radius;
pub mod state;
pub mod tick;
pub mod tools;
pub mod upgrades;
pub mod vibration;

pub use catalog::{Catalog, FigureTemplate, Rarity, ShapeKind, ShapePrimitive, VibrationPattern};
pub use collision::{ContactTracker, PairKey, blocking_figure, placement_allowed};
pub use radius::effective_radius;
pub use state::{
    ActiveMutation, FigureInstance, GameEvent, GameMode, GameOverReason, GamePhase, GameState,
    LevelConfig, MutationKind,
};
pub use tick::{frame, place_figure, timer_tick, PlacementResult};
pub use tools::{detonate, detonate_targeted, lasso_clear, point_in_polygon, ClearResult};
pub use upgrades::{UpgradeKind, Upgrades};
