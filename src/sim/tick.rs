//! Frame update, timer tick, and placement
//!
//! The engine runs inside the host's render callback (`frame`, once per
//! drawn frame) plus a coarser wall-clock tick (`timer_tick`, once per real
//! second). All mutation is synchronous; every entry point returns the side
//! effects it produced as an explicit event list.

use glam::Vec2;
use rand::Rng;

use crate::consts::BOMB_ID;

use super::collision::blocking_figure;
use super::mitigation;
use super::state::{
    FigureInstance, GameEvent, GameMode, GameOverReason, GamePhase, GameState, LevelConfig,
    MutationKind, ScheduledAction,
};
use super::tools;

/// Outcome of a placement request
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    /// The newly placed figure, or `None` for any of: no active template,
    /// static collision, boundary violation, bomb flow
    pub instance: Option<FigureInstance>,
    pub events: Vec<GameEvent>,
}

impl PlacementResult {
    fn rejected() -> Self {
        Self {
            instance: None,
            events: Vec::new(),
        }
    }
}

/// Start a campaign level. Entry point for Playing.
pub fn initialize_game(state: &mut GameState, level_number: u32) -> Vec<GameEvent> {
    let config = LevelConfig::for_level(level_number);
    state.mode = GameMode::Level;
    state.level_number = level_number;
    state.wave = 0;
    reset_run(state, config);
    state.phase = GamePhase::Playing;

    let mut events = Vec::new();
    notify(state, &mut events, format!("Level {level_number}"));
    log::info!(
        "level {} start: {} figures, {:.0}s budget, shrink {}/s",
        level_number,
        state.total_figures,
        state.time_budget,
        state.level.area_shrink_rate
    );
    events
}

/// Start an endless run. Entry point for EndlessPlaying.
pub fn initialize_endless(state: &mut GameState) -> Vec<GameEvent> {
    state.mode = GameMode::Endless;
    state.wave = 1;
    reset_run(state, LevelConfig::for_endless_wave(1));
    state.phase = GamePhase::EndlessPlaying;

    let mut events = Vec::new();
    notify(state, &mut events, "Endless: wave 1".to_string());
    log::info!("endless start, seed {}", state.seed);
    events
}

/// Shared new-life reset: board, queue, charges, one-shot flags
fn reset_run(state: &mut GameState, config: LevelConfig) {
    state.level = config;
    state.placed.clear();
    state.contacts.clear();
    state.scheduled.clear();
    state.notification = None;

    state.figures_placed = 0;
    state.placements_made = 0;
    state.total_figures = config.figures_required;
    state.time_budget = config.time_budget;
    state.time_remaining = config.time_budget;

    state.bombs_left = 1 + state.upgrades.bomb_count;
    state.cleanser_charges = 1;
    state.freeze_charges = 1;
    state.frozen = false;

    state.score = 0;
    state.streak = 0;
    state.shield_used = false;
    state.shield_cooldown = 0.0;
    state.second_chance_used = false;
    state.bomb_targeting = false;
    state.lasso_mode = false;
    state.mutation = None;
    state.offered_mutations = None;

    state.queue = generate_queue(state, state.upgrades.queue_capacity(), true);
}

/// Weighted-random queue batch. The initial batch gets a guaranteed bomb
/// near the middle; every slot additionally rolls a small bomb chance
/// scaled by the luck upgrade.
fn generate_queue(state: &mut GameState, slots: usize, guaranteed_bomb: bool) -> Vec<String> {
    let bomb_chance = 0.05 + state.upgrades.luck_bomb_chance();
    let total_weight = state.catalog.total_weight();
    let mut rng = state.rng_state.next_rng();

    let mut queue = Vec::with_capacity(slots + 1);
    for _ in 0..slots {
        if rng.random::<f32>() < bomb_chance {
            queue.push(BOMB_ID.to_string());
        } else {
            let roll = rng.random_range(0..total_weight);
            queue.push(state.catalog.pick_weighted(roll).id.to_string());
        }
    }
    if guaranteed_bomb {
        queue.insert(slots / 2, BOMB_ID.to_string());
    }
    queue
}

/// Top up the queue once it runs low
fn maybe_replenish(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.queue.len() <= 2 {
        let batch = generate_queue(state, state.upgrades.queue_capacity(), false);
        state.queue.extend(batch);
        events.push(GameEvent::QueueReplenished);
    }
}

/// Attempt to place the active queued figure at (x, y).
///
/// Rejection semantics follow the two-speed contract: a static collision is
/// a disallowed move and returns silently without mutating anything; only a
/// boundary touch is fatal (subject to shield). A queued bomb bypasses the
/// static check entirely and detonates instead of placing.
pub fn place_figure(state: &mut GameState, x: f32, y: f32) -> PlacementResult {
    if !state.in_play() {
        return PlacementResult::rejected();
    }
    let Some(template_id) = state.active_template().map(str::to_owned) else {
        return PlacementResult::rejected();
    };

    let mut events = Vec::new();
    let point = Vec2::new(x, y);

    if template_id == BOMB_ID {
        // A queued bomb is its own charge: it always fires and advances the
        // queue, drawing down the shared pool when a charge backs it. Only
        // the targeting reticle requires bombs_left.
        let cleared = tools::blast(state, point);
        state.bombs_left = state.bombs_left.saturating_sub(1);
        state.queue.remove(0);
        events.push(GameEvent::BombDetonated { cleared });
        maybe_replenish(state, &mut events);
        return PlacementResult {
            instance: None,
            events,
        };
    }

    let template = state.catalog.get(&template_id);
    let base_scale = template.map(|t| t.base_scale).unwrap_or(1.0);
    let coin_value = template.map(|t| t.coin_value).unwrap_or(0);

    let mut candidate = FigureInstance {
        id: 0,
        template_id: template_id.clone(),
        pos: point,
        rotation: 0.0,
        scale: base_scale * state.scale_multiplier(),
        phase: 0.0,
    };

    // Boundary touch is fatal, same as a runtime collision
    let radius = state.radius_of(&candidate);
    if !state.in_bounds(point, radius) {
        events.push(GameEvent::BoundaryHit { x, y });
        fatal(state, &mut events, GameOverReason::Boundary);
        return PlacementResult {
            instance: None,
            events,
        };
    }

    // Static envelope check; rejection is silent and mutates nothing
    if blocking_figure(
        &candidate,
        &state.placed,
        &state.catalog,
        state.canvas_scale,
        state.tuning.collision.placement_epsilon,
    )
    .is_some()
    {
        return PlacementResult::rejected();
    }

    candidate.id = state.next_instance_id();
    candidate.phase = state.rng_state.next_rng().random_range(0.0..std::f32::consts::TAU);

    state.placed.push(candidate.clone());
    state.normalize_order();
    state.figures_placed += 1;
    state.placements_made += 1;
    state.streak += 1;
    events.push(GameEvent::Placed { id: candidate.id });

    // Score and coins: template value x coin boost x placement bonus x
    // mutation reward, with the streak bonus on top of score. The bonus
    // reaches its cap on the fifth consecutive placement.
    let reward_mult = state.mutation.map(|m| m.reward_multiplier).unwrap_or(1.0);
    let streak_bonus =
        (state.tuning.streak_step * state.streak as f32).min(state.tuning.streak_cap);
    let coin_delta = (coin_value as f32 * state.upgrades.coin_multiplier() * reward_mult).round()
        as u64;
    let score_delta = (coin_value as f32
        * state.upgrades.coin_multiplier()
        * state.upgrades.placement_multiplier()
        * reward_mult
        * (1.0 + streak_bonus))
        .round() as u64;
    state.score += score_delta;
    state.coins += coin_delta;
    events.push(GameEvent::ScoreDelta {
        score: score_delta,
        coins: coin_delta,
    });

    let time_mult = state
        .mutation
        .map(|m| m.time_bonus_multiplier)
        .unwrap_or(1.0);
    state.time_remaining +=
        state.level.time_bonus * time_mult + state.upgrades.extra_time_bonus();

    state.queue.remove(0);
    maybe_replenish(state, &mut events);

    match state.mode {
        GameMode::Level => {
            if state.figures_placed >= state.total_figures {
                state.phase = GamePhase::Celebrating;
                state.schedule(
                    state.tuning.celebration_delay,
                    ScheduledAction::FinishCelebration,
                );
                events.push(GameEvent::Celebrating);
                notify(state, &mut events, "Dish complete!".to_string());
            }
        }
        GameMode::Endless => {
            // Counts cumulative placements, not board population: clears
            // must not let the same threshold re-trigger.
            if state.placements_made % state.tuning.mutation_interval == 0 {
                let choices = offer_mutations(state);
                state.phase = GamePhase::MutationChoice;
                events.push(GameEvent::MutationOffered { choices });
            }
        }
    }

    PlacementResult {
        instance: Some(candidate),
        events,
    }
}

/// Draw three mutation cards in seeded-random order
fn offer_mutations(state: &mut GameState) -> [MutationKind; 3] {
    let mut choices = MutationKind::ALL;
    let mut rng = state.rng_state.next_rng();
    // Fisher-Yates over the three cards
    for i in (1..choices.len()).rev() {
        let j = rng.random_range(0..=i);
        choices.swap(i, j);
    }
    state.offered_mutations = Some(choices);
    choices
}

/// Apply the chosen mutation and resume endless play
pub fn choose_mutation(state: &mut GameState, index: usize) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::MutationChoice {
        return events;
    }
    let Some(choices) = state.offered_mutations else {
        return events;
    };
    let Some(kind) = choices.get(index).copied() else {
        return events;
    };

    state.mutation = Some(kind.modifiers());
    state.offered_mutations = None;
    state.wave += 1;
    state.level = LevelConfig::for_endless_wave(state.wave);
    state.phase = GamePhase::EndlessPlaying;
    events.push(GameEvent::MutationApplied { kind });
    notify(state, &mut events, format!("Wave {}", state.wave));
    log::info!("wave {} mutation {:?}", state.wave, kind);
    events
}

/// Advance the simulation by one render frame.
///
/// Steps the hysteresis window exactly once, fires due scheduled entries,
/// and decays the shield cooldown. The countdown is *not* here; it runs on
/// the wall-clock `timer_tick`.
pub fn frame(state: &mut GameState, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if !matches!(
        state.phase,
        GamePhase::Playing | GamePhase::EndlessPlaying | GamePhase::Celebrating
    ) {
        return events;
    }

    state.sim_time += dt as f64;
    if !state.frozen {
        state.vib_time += dt as f64;
    }
    state.shield_cooldown = (state.shield_cooldown - dt).max(0.0);

    // Fire due scheduled entries
    let now = state.sim_time;
    let due: Vec<ScheduledAction> = state
        .scheduled
        .iter()
        .filter(|e| e.fire_at <= now)
        .map(|e| e.action)
        .collect();
    state.scheduled.retain(|e| e.fire_at > now);
    for action in due {
        match action {
            ScheduledAction::FinishCelebration => {
                if state.phase == GamePhase::Celebrating {
                    finish_celebration(state, &mut events);
                }
            }
            ScheduledAction::ClearNotification => {
                state.notification = None;
            }
            ScheduledAction::EndFreeze => {
                if state.frozen {
                    state.frozen = false;
                    events.push(GameEvent::FreezeEnded);
                }
            }
        }
    }

    // Runtime hysteresis check, suspended entirely during shield cooldown
    if state.in_play() && state.shield_cooldown <= 0.0 {
        let speed = state.speed_multiplier();
        let confirmed = state.contacts.step(
            &state.placed,
            &state.catalog,
            state.canvas_scale,
            state.vib_time,
            speed,
            &state.tuning.collision,
        );
        if let Some(pair) = confirmed.first() {
            log::debug!("contact confirmed between {} and {}", pair.0, pair.1);
            events.push(GameEvent::Collision {
                a: pair.0,
                b: pair.1,
            });
            fatal(state, &mut events, GameOverReason::Collision);
        }
    }

    state.contacts.prune(&state.placed);
    events
}

/// Celebrating -> Win, paying the completion bonus
fn finish_celebration(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let mut bonus = state.tuning.completion_bonus_per_level * state.level_number as u64;
    if state.level_number % state.tuning.milestone_interval == 0 {
        bonus = (bonus as f32 * state.tuning.milestone_multiplier) as u64;
    }
    bonus += (state.time_remaining.max(0.0) as u64) * state.tuning.time_bonus_rate;

    state.score += bonus;
    state.phase = GamePhase::Win;
    events.push(GameEvent::Win { bonus });
    log::info!("level {} won, bonus {}", state.level_number, bonus);
}

/// Wall-clock countdown, invoked once per real second
pub fn timer_tick(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.in_play() {
        return events;
    }

    state.time_remaining = (state.time_remaining - 1.0).max(0.0);
    if state.time_remaining <= 0.0 {
        notify(state, &mut events, "Time's up!".to_string());
        game_over(state, &mut events, GameOverReason::TimeOut);
    }
    events
}

/// A would-be-fatal event: the shield intercepts it once per life,
/// otherwise the run ends
pub(crate) fn fatal(state: &mut GameState, events: &mut Vec<GameEvent>, reason: GameOverReason) {
    if mitigation::use_shield(state) {
        events.push(GameEvent::ShieldAbsorbed);
        notify(state, events, "Shield absorbed the hit!".to_string());
    } else {
        game_over(state, events, reason);
    }
}

pub(crate) fn game_over(
    state: &mut GameState,
    events: &mut Vec<GameEvent>,
    reason: GameOverReason,
) {
    state.phase = GamePhase::GameOver;
    state.frozen = false;
    state.unschedule(ScheduledAction::FinishCelebration);
    if state.mode == GameMode::Endless {
        state.records.submit(state.score, state.wave);
    }
    events.push(GameEvent::GameOver { reason });
    log::info!(
        "game over ({:?}) at score {}, {} placed",
        reason,
        state.score,
        state.figures_placed
    );
}

/// Set the HUD notification and schedule its auto-clear
pub(crate) fn notify(state: &mut GameState, events: &mut Vec<GameEvent>, text: String) {
    state.unschedule(ScheduledAction::ClearNotification);
    state.notification = Some(text.clone());
    let delay = state.tuning.notification_duration;
    state.schedule(delay, ScheduledAction::ClearNotification);
    events.push(GameEvent::Notification { text });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;

    fn fresh_level(seed: u64, level: u32) -> GameState {
        let mut state = GameState::new(seed);
        initialize_game(&mut state, level);
        state
    }

    /// Grid spots far enough apart that no pair can ever collide
    fn grid_spot(i: usize) -> (f32, f32) {
        let xs = [100.0, 220.0, 340.0, 460.0, 580.0];
        let ys = [100.0, 230.0, 360.0, 490.0];
        (xs[i % xs.len()], ys[(i / xs.len()) % ys.len()])
    }

    /// Drive placements until `count` figures are on the board, detonating
    /// queued bombs in an empty corner
    fn place_n(state: &mut GameState, count: u32) -> Vec<GameEvent> {
        let mut all_events = Vec::new();
        let mut spot = 0usize;
        while state.figures_placed < count && state.in_play() {
            if state.active_template() == Some(crate::consts::BOMB_ID) {
                // Detonate away from the grid so nothing is cleared
                let result = place_figure(state, 780.0, 580.0);
                all_events.extend(result.events);
                continue;
            }
            let (x, y) = grid_spot(spot);
            spot += 1;
            let result = place_figure(state, x, y);
            assert!(result.instance.is_some(), "grid spot must be legal");
            all_events.extend(result.events);
        }
        all_events
    }

    #[test]
    fn queue_generation_is_deterministic_per_seed() {
        let a = fresh_level(777, 1);
        let b = fresh_level(777, 1);
        assert_eq!(a.queue, b.queue);

        let c = fresh_level(778, 1);
        // Different seed, different draws (same length though)
        assert_eq!(a.queue.len(), c.queue.len());
        assert_ne!(a.seed, c.seed);
    }

    #[test]
    fn initial_queue_has_guaranteed_bomb_near_middle() {
        let state = fresh_level(42, 1);
        let mid = state.upgrades.queue_capacity() / 2;
        assert_eq!(state.queue[mid], crate::consts::BOMB_ID);
    }

    #[test]
    fn placement_success_updates_score_time_and_queue() {
        let mut state = fresh_level(9, 1);
        // Make sure the front of the queue is a real figure
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }
        let before_time = state.time_remaining;
        let before_len = state.queue.len();

        let result = place_figure(&mut state, 400.0, 300.0);
        let placed = result.instance.expect("open spot");
        assert_eq!(state.figures_placed, 1);
        assert!(state.score > 0);
        assert!(state.time_remaining > before_time);
        assert!(state.placed.iter().any(|f| f.id == placed.id));
        assert!(state.queue.len() >= before_len - 1);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::Placed { .. })));
    }

    #[test]
    fn rejected_placement_mutates_nothing_and_never_ends_the_game() {
        let mut state = fresh_level(9, 1);
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }
        place_figure(&mut state, 400.0, 300.0).instance.expect("first placement");
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }

        let score = state.score;
        let placed = state.figures_placed;
        let result = place_figure(&mut state, 400.0, 300.0);
        assert!(result.instance.is_none());
        assert!(result.events.is_empty());
        assert_eq!(state.score, score);
        assert_eq!(state.figures_placed, placed);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn boundary_touch_is_fatal_without_shield() {
        let mut state = fresh_level(3, 1);
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }
        let result = place_figure(&mut state, 10.0, 10.0);
        assert!(result.instance.is_none());
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BoundaryHit { .. })));
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn boundary_touch_with_shield_continues_play() {
        let mut state = GameState::new(3);
        state.upgrades.shield_charges = 1;
        initialize_game(&mut state, 1);
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }

        let result = place_figure(&mut state, 10.0, 10.0);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::ShieldAbsorbed)));
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.shield_used);
        assert!(state.shield_cooldown > 0.0);

        // Second boundary touch in the same life ends the run
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }
        place_figure(&mut state, 10.0, 10.0);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn win_condition_celebrates_then_wins_with_milestone_bonus() {
        let mut state = fresh_level(1234, 5);
        let required = state.total_figures;
        let events = place_n(&mut state, required);
        assert_eq!(state.phase, GamePhase::Celebrating);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Celebrating)));

        let score_before = state.score;
        let time_before = state.time_remaining;

        // One short frame: not due yet
        let events = frame(&mut state, FRAME_DT);
        assert_eq!(state.phase, GamePhase::Celebrating);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Win { .. })));

        // Past the celebration delay: Win fires with the milestone bonus
        let delay = state.tuning.celebration_delay + 0.1;
        let events = frame(&mut state, delay);
        assert_eq!(state.phase, GamePhase::Win);
        let expected = (state.tuning.completion_bonus_per_level * 5) as f32
            * state.tuning.milestone_multiplier;
        let expected = expected as u64 + (time_before.max(0.0) as u64) * state.tuning.time_bonus_rate;
        assert!(events.contains(&GameEvent::Win { bonus: expected }));
        assert_eq!(state.score, score_before + expected);
    }

    #[test]
    fn timer_runs_out_to_game_over() {
        let mut state = fresh_level(5, 1);
        let mut saw_game_over = false;
        for _ in 0..(state.time_budget as u32 + 1) {
            let events = timer_tick(&mut state);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::GameOver { reason: GameOverReason::TimeOut }))
            {
                saw_game_over = true;
                break;
            }
        }
        assert!(saw_game_over);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.time_remaining, 0.0);
    }

    #[test]
    fn queued_bomb_detonates_instead_of_placing() {
        let mut state = fresh_level(8, 1);
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }
        place_figure(&mut state, 300.0, 300.0).instance.expect("spot is open");

        state.queue.insert(0, crate::consts::BOMB_ID.to_string());
        let bombs = state.bombs_left;
        let result = place_figure(&mut state, 300.0, 300.0);
        assert!(result.instance.is_none());
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BombDetonated { cleared: 1 })));
        assert_eq!(state.bombs_left, bombs - 1);
        assert!(state.placed.is_empty());
        assert_eq!(state.figures_placed, 0);
    }

    #[test]
    fn queued_bomb_fires_even_with_no_charges_left() {
        let mut state = fresh_level(8, 1);
        state.bombs_left = 0;
        state.queue.insert(0, crate::consts::BOMB_ID.to_string());
        let queue_len = state.queue.len();

        // The queue must advance rather than wedge on an unbackable bomb
        let result = place_figure(&mut state, 400.0, 300.0);
        assert!(result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BombDetonated { .. })));
        assert_eq!(state.queue.len(), queue_len - 1);
        assert_eq!(state.bombs_left, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn streak_bonus_caps_on_fifth_consecutive_placement() {
        let mut state = fresh_level(21, 1);
        while state.active_template() == Some(crate::consts::BOMB_ID) {
            state.queue.remove(0);
        }
        state.streak = 4;

        let result = place_figure(&mut state, 400.0, 300.0);
        let placed = result.instance.expect("open spot");
        let value = state
            .catalog
            .get(&placed.template_id)
            .expect("real template")
            .coin_value;
        // Fifth consecutive placement pays the full +50% streak bonus
        let expected = (value as f32 * 1.5).round() as u64;
        assert!(result.events.contains(&GameEvent::ScoreDelta {
            score: expected,
            coins: value,
        }));
    }

    #[test]
    fn runtime_collision_needs_full_window_then_ends_game() {
        let mut state = fresh_level(2, 1);
        // Force a permanent deep overlap, bypassing the static check
        let a = state.next_instance_id();
        let b = state.next_instance_id();
        for (id, x) in [(a, 300.0), (b, 310.0)] {
            state.placed.push(FigureInstance {
                id,
                template_id: "coccus".to_string(),
                pos: Vec2::new(x, 300.0),
                rotation: 0.0,
                scale: 1.0,
                phase: 0.0,
            });
        }

        let window = state.tuning.collision.window;
        let mut collision_frame = None;
        for i in 0..window + 4 {
            let events = frame(&mut state, FRAME_DT);
            if let Some(GameEvent::Collision { a: ca, b: cb }) = events
                .iter()
                .find(|e| matches!(e, GameEvent::Collision { .. }))
            {
                assert_eq!((*ca, *cb), (a, b));
                collision_frame = Some(i);
                break;
            }
        }
        assert_eq!(collision_frame, Some(window - 1));
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn endless_offers_mutations_on_interval() {
        let mut state = GameState::new(11);
        initialize_endless(&mut state);
        let interval = state.tuning.mutation_interval;
        let events = place_n(&mut state, interval);
        assert_eq!(state.phase, GamePhase::MutationChoice);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::MutationOffered { .. })));

        let events = choose_mutation(&mut state, 0);
        assert_eq!(state.phase, GamePhase::EndlessPlaying);
        assert_eq!(state.wave, 2);
        assert!(state.mutation.is_some());
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::MutationApplied { .. })));
    }

    #[test]
    fn mutation_offers_track_cumulative_placements_not_board_population() {
        let mut state = GameState::new(11);
        initialize_endless(&mut state);
        let interval = state.tuning.mutation_interval;
        place_n(&mut state, interval);
        assert_eq!(state.phase, GamePhase::MutationChoice);
        choose_mutation(&mut state, 0);

        // Lasso away one figure, then refill the board to the same
        // population: the threshold must not re-trigger mid-interval.
        assert!(tools::enter_lasso_mode(&mut state));
        let loop_points = [
            Vec2::new(540.0, 60.0),
            Vec2::new(620.0, 60.0),
            Vec2::new(620.0, 140.0),
            Vec2::new(540.0, 140.0),
        ];
        let result = tools::lasso_clear(&mut state, &loop_points);
        assert_eq!(result.cleared, 1);
        assert_eq!(state.figures_placed, interval - 1);

        while state.active_template() == Some(crate::consts::BOMB_ID) {
            place_figure(&mut state, 780.0, 580.0);
        }
        let result = place_figure(&mut state, 650.0, 420.0);
        assert!(result.instance.is_some(), "replacement spot is open");
        assert_eq!(state.figures_placed, interval);
        assert_eq!(state.placements_made, interval + 1);
        assert_eq!(state.phase, GamePhase::EndlessPlaying);
        assert!(!result
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::MutationOffered { .. })));
    }

    #[test]
    fn endless_game_over_records_best_score_and_wave() {
        let mut state = GameState::new(11);
        initialize_endless(&mut state);
        state.score = 4321;
        state.wave = 7;
        let mut events = Vec::new();
        game_over(&mut state, &mut events, GameOverReason::TimeOut);
        assert_eq!(state.records.best_score(), Some(4321));
        assert_eq!(state.records.best_wave(), Some(7));
    }

    #[test]
    fn notification_auto_clears_on_schedule() {
        let mut state = fresh_level(6, 1);
        assert!(state.notification.is_some());
        let delay = state.tuning.notification_duration + 0.1;
        frame(&mut state, delay);
        assert!(state.notification.is_none());
    }
}
