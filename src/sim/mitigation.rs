//! Mitigation mechanics: shield, second chance, freeze
//!
//! Each is a guarded state transition with one-time-per-life consumption.
//! All return plain `bool` success; failure leaves the state untouched.

use super::state::{GameMode, GamePhase, GameState, ScheduledAction};

/// Intercept a would-be-fatal collision or boundary event.
///
/// Consumes one shield charge, marks the shield used for this life, and
/// opens a cooldown window during which runtime collision checks are
/// suspended entirely (otherwise the same overlap would re-confirm on the
/// very next frame). Resets the placement streak.
pub fn use_shield(state: &mut GameState) -> bool {
    if state.shield_used || state.upgrades.shield_charges == 0 {
        return false;
    }
    state.upgrades.shield_charges -= 1;
    state.shield_used = true;
    state.shield_cooldown = state.tuning.shield_cooldown;
    state.contacts.clear();
    state.streak = 0;
    log::info!(
        "shield fired, {} charges left",
        state.upgrades.shield_charges
    );
    true
}

/// Undo the run-ending mistake: usable only from GameOver, once per life.
///
/// Removes the most recently placed figure, grants a small flat time bonus,
/// and resumes play with the timer where it stopped - not reset.
pub fn use_second_chance(state: &mut GameState) -> bool {
    if state.phase != GamePhase::GameOver
        || state.second_chance_used
        || state.upgrades.second_chance == 0
    {
        return false;
    }
    state.upgrades.second_chance -= 1;
    state.second_chance_used = true;
    state.pop_last_placed();
    state.contacts.clear();
    state.streak = 0;
    state.time_remaining += state.tuning.second_chance_time_bonus;
    state.phase = match state.mode {
        GameMode::Level => GamePhase::Playing,
        GameMode::Endless => GamePhase::EndlessPlaying,
    };
    log::info!("second chance, resuming at {:.0}s", state.time_remaining);
    true
}

/// Halt the vibration clock for a fixed duration. Cannot stack.
pub fn use_freeze(state: &mut GameState) -> bool {
    if !state.in_play() || state.frozen || state.freeze_charges == 0 {
        return false;
    }
    state.freeze_charges -= 1;
    state.frozen = true;
    state.schedule(state.tuning.freeze_duration, ScheduledAction::EndFreeze);
    true
}
