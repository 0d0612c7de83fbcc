//! Game state and core simulation types
//!
//! Everything a host needs to snapshot after a mutating call lives here. The
//! state is an explicit context object: hosts own it, pass it to the engine
//! functions in `tick`/`tools`/`mitigation`, and read the returned event
//! lists. No hidden globals, no ambient timers.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{BASE_BOUNDARY_PADDING, CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::records::EndlessRecords;
use crate::tuning::GameTuning;

use super::catalog::Catalog;
use super::collision::ContactTracker;
use super::radius::effective_radius;
use super::upgrades::Upgrades;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    LevelSelect,
    Shop,
    /// Active level play
    Playing,
    /// Last figure landed; Win fires after a scheduled delay
    Celebrating,
    GameOver,
    Win,
    /// Active endless play
    EndlessPlaying,
    /// Endless only: pick one of the offered mutations
    MutationChoice,
}

/// Which kind of run is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    Level,
    Endless,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverReason {
    /// Runtime hysteresis check confirmed two figures truly touching
    Collision,
    /// A placement touched the shrinking play-area boundary
    Boundary,
    TimeOut,
}

/// A placed figure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureInstance {
    pub id: u32,
    /// Owned id string: unknown ids must stay representable
    pub template_id: String,
    pub pos: Vec2,
    pub rotation: f32,
    /// template base scale x level size multiplier x shrink upgrade
    pub scale: f32,
    /// Per-instance vibration phase offset, drawn at placement
    pub phase: f32,
}

/// Per-level difficulty parameters, selected by level number
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub figures_required: u32,
    /// Starting time budget in seconds
    pub time_budget: f32,
    /// Seconds granted per successful placement
    pub time_bonus: f32,
    /// Vibration phase-speed multiplier
    pub speed_multiplier: f32,
    /// Figure scale multiplier
    pub size_multiplier: f32,
    /// Play-area shrink in px/second (0 for early levels)
    pub area_shrink_rate: f32,
}

impl LevelConfig {
    /// Difficulty curve for campaign levels (1-based)
    pub fn for_level(level: u32) -> Self {
        let n = level.max(1);
        Self {
            figures_required: 4 + n * 2,
            time_budget: (28.0 + n as f32 * 4.0).min(90.0),
            time_bonus: 2.0,
            speed_multiplier: 1.0 + n as f32 * 0.05,
            size_multiplier: (1.0 + n as f32 * 0.02).min(1.4),
            area_shrink_rate: if n <= 3 {
                0.0
            } else {
                ((n - 3) as f32 * 0.4).min(4.0)
            },
        }
    }

    /// Escalating endless-wave parameters (1-based wave)
    pub fn for_endless_wave(wave: u32) -> Self {
        let w = wave.max(1);
        Self {
            figures_required: u32::MAX,
            time_budget: 60.0,
            time_bonus: 1.5,
            speed_multiplier: 1.0 + w as f32 * 0.08,
            size_multiplier: (1.0 + w as f32 * 0.03).min(1.5),
            area_shrink_rate: (w as f32 * 0.3).min(5.0),
        }
    }
}

/// Endless-mode mutation cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationKind {
    /// Everything vibrates faster, pays a little more
    Swarm,
    /// Figures grow, rewards grow more
    Gigantism,
    /// Smaller time grants, double rewards
    TimeCrunch,
}

impl MutationKind {
    pub const ALL: [MutationKind; 3] =
        [MutationKind::Swarm, MutationKind::Gigantism, MutationKind::TimeCrunch];

    pub fn modifiers(&self) -> ActiveMutation {
        match self {
            MutationKind::Swarm => ActiveMutation {
                kind: *self,
                speed_multiplier: 1.3,
                size_multiplier: 1.0,
                time_bonus_multiplier: 1.0,
                reward_multiplier: 1.25,
            },
            MutationKind::Gigantism => ActiveMutation {
                kind: *self,
                speed_multiplier: 1.0,
                size_multiplier: 1.2,
                time_bonus_multiplier: 1.0,
                reward_multiplier: 1.5,
            },
            MutationKind::TimeCrunch => ActiveMutation {
                kind: *self,
                speed_multiplier: 1.0,
                size_multiplier: 1.0,
                time_bonus_multiplier: 0.5,
                reward_multiplier: 2.0,
            },
        }
    }
}

/// Modifier multipliers of the mutation currently in effect
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveMutation {
    pub kind: MutationKind,
    pub speed_multiplier: f32,
    pub size_multiplier: f32,
    pub time_bonus_multiplier: f32,
    pub reward_multiplier: f32,
}

/// Side-effect notifications returned from engine calls.
///
/// A thin adapter maps these onto whatever reactive mechanism the host UI
/// uses; the core never calls back into the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Placed { id: u32 },
    QueueReplenished,
    ScoreDelta { score: u64, coins: u64 },
    /// Runtime hysteresis verdict: these two figures are truly touching
    Collision { a: u32, b: u32 },
    /// A placement touched the shrinking boundary
    BoundaryHit { x: f32, y: f32 },
    ShieldAbsorbed,
    SecondChanceUsed,
    FreezeStarted,
    FreezeEnded,
    BombDetonated { cleared: u32 },
    LassoCleared { cleared: u32 },
    Celebrating,
    Win { bonus: u64 },
    GameOver { reason: GameOverReason },
    MutationOffered { choices: [MutationKind; 3] },
    MutationApplied { kind: MutationKind },
    Notification { text: String },
}

/// What a scheduled entry does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ScheduledAction {
    /// Celebrating -> Win, paying the completion bonus
    FinishCelebration,
    ClearNotification,
    EndFreeze,
}

/// "Fire at sim_time + delay" entry; replaces ambient host timers so delayed
/// transitions stay deterministic and die with the state that scheduled them
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub fire_at: f64,
    pub action: ScheduledAction,
}

/// RNG state wrapper for serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    /// Bumped per draw batch so successive generations differ
    pub stream: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, stream: 0 }
    }

    /// Fresh generator on a new stream; deterministic per (seed, call count)
    pub fn next_rng(&mut self) -> Pcg32 {
        self.stream = self.stream.wrapping_add(1);
        Pcg32::new(self.seed, self.stream)
    }
}

/// Complete simulation context (owned by the host, threaded through all
/// engine calls)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng_state: RngState,

    pub phase: GamePhase,
    pub mode: GameMode,
    pub level_number: u32,
    pub level: LevelConfig,

    /// Canvas responsiveness factor applied to all px quantities
    pub canvas_scale: f32,
    pub canvas_size: Vec2,

    pub score: u64,
    pub coins: u64,
    pub time_remaining: f32,
    /// Level-start budget, used to derive elapsed time for shrinkage
    pub time_budget: f32,

    pub figures_placed: u32,
    /// Cumulative successful placements this run; unlike `figures_placed`
    /// this never decreases when figures are cleared
    pub placements_made: u32,
    pub total_figures: u32,
    pub bombs_left: u32,
    pub cleanser_charges: u32,
    pub freeze_charges: u32,

    /// Upcoming template ids; front is the active one
    pub queue: Vec<String>,
    /// Placed figures, sorted by id
    pub placed: Vec<FigureInstance>,
    next_id: u32,

    /// Monotone simulation clock (never resets while playing)
    pub sim_time: f64,
    /// Vibration clock; halts while frozen
    pub vib_time: f64,
    pub frozen: bool,

    pub shield_used: bool,
    /// Seconds of runtime-check suspension left after a shield fired
    pub shield_cooldown: f32,
    pub second_chance_used: bool,
    /// Consecutive successful placements; decays on shield/second chance
    pub streak: u32,

    pub bomb_targeting: bool,
    pub lasso_mode: bool,

    pub upgrades: Upgrades,

    /// Endless bookkeeping
    pub wave: u32,
    pub mutation: Option<ActiveMutation>,
    pub offered_mutations: Option<[MutationKind; 3]>,
    pub records: EndlessRecords,

    pub notification: Option<String>,
    pub scheduled: Vec<ScheduledEvent>,

    pub tuning: GameTuning,

    #[serde(skip)]
    pub catalog: Catalog,
    #[serde(skip)]
    pub contacts: ContactTracker,
}

impl GameState {
    /// Fresh context in the menu, with nothing placed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng_state: RngState::new(seed),
            phase: GamePhase::Menu,
            mode: GameMode::Level,
            level_number: 1,
            level: LevelConfig::for_level(1),
            canvas_scale: 1.0,
            canvas_size: Vec2::new(CANVAS_WIDTH, CANVAS_HEIGHT),
            score: 0,
            coins: 0,
            time_remaining: 0.0,
            time_budget: 0.0,
            figures_placed: 0,
            placements_made: 0,
            total_figures: 0,
            bombs_left: 0,
            cleanser_charges: 0,
            freeze_charges: 0,
            queue: Vec::new(),
            placed: Vec::new(),
            next_id: 1,
            sim_time: 0.0,
            vib_time: 0.0,
            frozen: false,
            shield_used: false,
            shield_cooldown: 0.0,
            second_chance_used: false,
            streak: 0,
            bomb_targeting: false,
            lasso_mode: false,
            upgrades: Upgrades::default(),
            wave: 0,
            mutation: None,
            offered_mutations: None,
            records: EndlessRecords::default(),
            notification: None,
            scheduled: Vec::new(),
            tuning: GameTuning::default(),
            catalog: Catalog::builtin(),
            contacts: ContactTracker::new(),
        }
    }

    /// Allocate a new instance id
    pub fn next_instance_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Is a run currently being played?
    pub fn in_play(&self) -> bool {
        matches!(self.phase, GamePhase::Playing | GamePhase::EndlessPlaying)
    }

    /// The active (front-of-queue) template id
    pub fn active_template(&self) -> Option<&str> {
        self.queue.first().map(|s| s.as_str())
    }

    /// Seconds of play elapsed this level, for boundary shrinkage
    pub fn elapsed_time(&self) -> f32 {
        (self.time_budget - self.time_remaining).max(0.0)
    }

    /// Current play-area inset. Shrinks monotonically: time bonuses raise
    /// `time_remaining` but elapsed time is clamped at zero, and the shrink
    /// term never goes negative.
    pub fn boundary_padding(&self) -> f32 {
        let shrink_mult = self.upgrades.slow_mo_multiplier();
        BASE_BOUNDARY_PADDING * self.canvas_scale
            + (self.elapsed_time() * self.level.area_shrink_rate * shrink_mult * self.canvas_scale)
                .max(0.0)
    }

    /// Would a figure of this radius at this center stay inside the current
    /// play area?
    pub fn in_bounds(&self, pos: Vec2, radius: f32) -> bool {
        let pad = self.boundary_padding();
        pos.x - radius > pad
            && pos.y - radius > pad
            && pos.x + radius < self.canvas_size.x - pad
            && pos.y + radius < self.canvas_size.y - pad
    }

    /// Effective vibration speed multiplier (level x active mutation)
    pub fn speed_multiplier(&self) -> f32 {
        let mutation = self.mutation.map(|m| m.speed_multiplier).unwrap_or(1.0);
        self.level.speed_multiplier * mutation
    }

    /// Effective figure scale multiplier (level x mutation x shrink upgrade)
    pub fn scale_multiplier(&self) -> f32 {
        let mutation = self.mutation.map(|m| m.size_multiplier).unwrap_or(1.0);
        self.level.size_multiplier * mutation * self.upgrades.shrink_multiplier()
    }

    /// Effective radius of a placed instance under the current catalog/scale
    pub fn radius_of(&self, instance: &FigureInstance) -> f32 {
        effective_radius(instance, &self.catalog, self.canvas_scale)
    }

    /// Remove the most recently placed figure (used by second chance)
    pub fn pop_last_placed(&mut self) -> Option<FigureInstance> {
        let last = self.placed.pop();
        if last.is_some() {
            self.figures_placed = self.figures_placed.saturating_sub(1);
        }
        last
    }

    /// Queue a scheduled action `delay` seconds from now
    pub fn schedule(&mut self, delay: f32, action: ScheduledAction) {
        self.scheduled.push(ScheduledEvent {
            fire_at: self.sim_time + delay as f64,
            action,
        });
    }

    /// Drop pending entries of one action kind (early state exit)
    pub fn unschedule(&mut self, action: ScheduledAction) {
        self.scheduled.retain(|e| e.action != action);
    }

    /// Keep placed figures sorted by id for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.placed.sort_by_key(|f| f.id);
    }

    /// Menu navigation; allowed from any terminal or browsing phase
    pub fn to_menu(&mut self) {
        if !self.in_play() {
            self.phase = GamePhase::Menu;
        }
    }

    pub fn open_level_select(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = GamePhase::LevelSelect;
        }
    }

    pub fn open_shop(&mut self) {
        if matches!(self.phase, GamePhase::Menu | GamePhase::LevelSelect) {
            self.phase = GamePhase::Shop;
        }
    }
}
