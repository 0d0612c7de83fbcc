//! Area-effect tools: bomb blasts and the lasso cleanser
//!
//! Both mutate the placed-figure set and report back to the state machine.
//! One `detonate` primitive serves both bomb flows (placing a queued bomb
//! and firing a pre-armed targeting reticle), so the clearing semantics
//! cannot drift apart.

use glam::Vec2;

use crate::distance;

use super::state::GameState;

/// Result of a clearing tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearResult {
    pub cleared: u32,
    /// `false` means a precondition failed and nothing was mutated
    pub success: bool,
}

impl ClearResult {
    fn failed() -> Self {
        Self {
            cleared: 0,
            success: false,
        }
    }
}

/// Arm the bomb targeting reticle. Requires a charge and an active run.
pub fn arm_bomb(state: &mut GameState) -> bool {
    if !state.in_play() || state.bombs_left == 0 || state.bomb_targeting {
        return false;
    }
    state.bomb_targeting = true;
    true
}

/// Shared clearing core of both bomb flows: every placed figure whose
/// *center* lies within the blast radius is removed. A raw Euclidean test on
/// purpose - the blast ignores the victims' own effective radii.
pub(crate) fn blast(state: &mut GameState, point: Vec2) -> u32 {
    let radius = state.tuning.blast_radius * state.canvas_scale;
    let before = state.placed.len();
    state.placed.retain(|f| distance(f.pos, point) > radius);
    let cleared = (before - state.placed.len()) as u32;

    state.figures_placed = state.figures_placed.saturating_sub(cleared);
    state.bomb_targeting = false;
    log::debug!("bomb at ({:.0},{:.0}) cleared {}", point.x, point.y, cleared);
    cleared
}

/// Detonate a charge from the pool at a target point. Fails closed when no
/// charge is available; a bomb drawn from the queue fires through
/// [`blast`] directly instead, since the queue entry is its own charge.
pub fn detonate(state: &mut GameState, point: Vec2) -> ClearResult {
    if !state.in_play() || state.bombs_left == 0 {
        return ClearResult::failed();
    }
    state.bombs_left -= 1;
    ClearResult {
        cleared: blast(state, point),
        success: true,
    }
}

/// Targeting-reticle flow: only valid while armed, then shares the exact
/// clearing semantics of the queue-bomb flow.
pub fn detonate_targeted(state: &mut GameState, point: Vec2) -> ClearResult {
    if !state.bomb_targeting {
        return ClearResult::failed();
    }
    detonate(state, point)
}

/// Enter lasso mode. Requires a cleanser charge and an active run.
pub fn enter_lasso_mode(state: &mut GameState) -> bool {
    if !state.in_play() || state.cleanser_charges == 0 || state.lasso_mode {
        return false;
    }
    state.lasso_mode = true;
    true
}

/// Finish a free-drawn lasso: figures whose *centers* fall inside the
/// polygon (even-odd rule) are cleared and one cleanser charge is consumed.
/// Fewer than 3 points aborts with nothing cleared and nothing mutated.
pub fn lasso_clear(state: &mut GameState, points: &[Vec2]) -> ClearResult {
    if !state.lasso_mode || state.cleanser_charges == 0 {
        return ClearResult::failed();
    }
    if points.len() < 3 {
        return ClearResult::failed();
    }

    let before = state.placed.len();
    state.placed.retain(|f| !point_in_polygon(f.pos, points));
    let cleared = (before - state.placed.len()) as u32;

    state.figures_placed = state.figures_placed.saturating_sub(cleared);
    state.cleanser_charges -= 1;
    state.lasso_mode = false;
    log::debug!("lasso over {} points cleared {}", points.len(), cleared);

    ClearResult {
        cleared,
        success: true,
    }
}

/// Ray-casting even-odd containment test
pub fn point_in_polygon(p: Vec2, polygon: &[Vec2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[j];
        if ((a.y > p.y) != (b.y > p.y))
            && (p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x)
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
