//! Collision engine
//!
//! Two algorithms sharing the effective-radius calculator:
//!
//! - a strict static check at placement time, run against worst-case
//!   vibration envelopes so players must leave margin, and
//! - a forgiving runtime check with temporal hysteresis, run against actual
//!   vibration-displaced positions.
//!
//! The split is the heart of the game feel: adjacent-but-legal figures
//! legitimately graze each other at certain phase alignments, and a naive
//! per-frame boolean test would end runs constantly. The tracker only
//! confirms a collision once a full rolling window of samples is mostly
//! in contact.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::tuning::CollisionTuning;
use crate::{distance, distance_sq};

use super::catalog::Catalog;
use super::radius::effective_radius;
use super::state::FigureInstance;
use super::vibration;

/// Unordered pair of instance ids, stored low-high
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PairKey(pub u32, pub u32);

impl PairKey {
    pub fn new(a: u32, b: u32) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Static placement check: id of the first placed figure the candidate would
/// overlap, or `None` if the spot is legal.
///
/// Conservative by design: both radii include the vibration envelope, so this
/// refuses geometrically tight spots even when they look clear at the moment
/// of the tap. Rejection never mutates anything and never ends the game.
pub fn blocking_figure(
    candidate: &FigureInstance,
    placed: &[FigureInstance],
    catalog: &Catalog,
    canvas_scale: f32,
    epsilon: f32,
) -> Option<u32> {
    let r_candidate = effective_radius(candidate, catalog, canvas_scale);
    for other in placed {
        let r_other = effective_radius(other, catalog, canvas_scale);
        let threshold = r_candidate + r_other + epsilon;
        if distance_sq(candidate.pos, other.pos) < threshold * threshold {
            return Some(other.id);
        }
    }
    None
}

/// Convenience wrapper over [`blocking_figure`]
pub fn placement_allowed(
    candidate: &FigureInstance,
    placed: &[FigureInstance],
    catalog: &Catalog,
    canvas_scale: f32,
    epsilon: f32,
) -> bool {
    blocking_figure(candidate, placed, catalog, canvas_scale, epsilon).is_none()
}

/// Per-pair rolling contact history
#[derive(Debug, Clone, Default)]
struct PairHistory {
    /// Penetration samples, oldest first; 0.0 means clear that frame
    samples: Vec<f32>,
    /// Consecutive clear frames since the last contact
    clean_frames: u32,
}

impl PairHistory {
    fn contact_frames(&self) -> usize {
        self.samples.iter().filter(|p| **p > 0.0).count()
    }
}

/// Temporal hysteresis filter over per-frame pair penetrations.
///
/// Advance exactly once per render frame. Frame-rate dependence is an
/// accepted trade-off: at higher frame rates the window covers less
/// wall-clock time.
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    pairs: HashMap<PairKey, PairHistory>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one frame's penetration sample for a pair. Returns `true` when
    /// this sample confirms a real collision: the window is full and the
    /// contact ratio has reached the threshold. A confirmed pair's history is
    /// dropped so the verdict fires once.
    pub fn observe(&mut self, key: PairKey, penetration: f32, tuning: &CollisionTuning) -> bool {
        let history = self.pairs.entry(key).or_default();

        if penetration > 0.0 {
            history.clean_frames = 0;
            history.samples.push(penetration);
        } else {
            history.clean_frames += 1;
            if history.clean_frames >= tuning.clean_frame_reset {
                // Genuine separation: stale "mostly touching" history must
                // not linger and poison the ratio later.
                self.pairs.remove(&key);
                return false;
            }
            history.samples.push(0.0);
        }

        if history.samples.len() > tuning.window {
            history.samples.remove(0);
        }

        let full = history.samples.len() == tuning.window;
        let ratio = history.contact_frames() as f32 / history.samples.len() as f32;
        if full && ratio >= tuning.contact_ratio {
            self.pairs.remove(&key);
            return true;
        }
        false
    }

    /// Advance the filter one frame over every unordered pair of placed
    /// figures, computing penetration from actual vibration-displaced
    /// positions. Returns the pairs confirmed this frame.
    pub fn step(
        &mut self,
        placed: &[FigureInstance],
        catalog: &Catalog,
        canvas_scale: f32,
        vib_time: f64,
        speed_mult: f32,
        tuning: &CollisionTuning,
    ) -> Vec<PairKey> {
        let displaced: Vec<(u32, Vec2, f32)> = placed
            .iter()
            .map(|inst| {
                let pos = match catalog.get(&inst.template_id) {
                    Some(t) => {
                        inst.pos
                            + vibration::offset(
                                t.pattern,
                                t.speed * speed_mult,
                                t.amplitude * canvas_scale,
                                vib_time,
                                inst.phase,
                            )
                    }
                    None => inst.pos,
                };
                (inst.id, pos, effective_radius(inst, catalog, canvas_scale))
            })
            .collect();

        let mut confirmed = Vec::new();
        for i in 0..displaced.len() {
            for j in (i + 1)..displaced.len() {
                let (id_a, pos_a, r_a) = displaced[i];
                let (id_b, pos_b, r_b) = displaced[j];
                let penetration = ((r_a + r_b) - distance(pos_a, pos_b)).max(0.0);
                let key = PairKey::new(id_a, id_b);
                if self.observe(key, penetration, tuning) {
                    confirmed.push(key);
                }
            }
        }
        confirmed
    }

    /// Drop histories for pairs no longer fully present (cleared by bomb,
    /// lasso, or second chance)
    pub fn prune(&mut self, placed: &[FigureInstance]) {
        self.pairs
            .retain(|key, _| placed.iter().any(|f| f.id == key.0) && placed.iter().any(|f| f.id == key.1));
    }

    /// Forget everything (level restart, shield cooldown exit)
    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Number of pairs currently being tracked
    pub fn tracked_pairs(&self) -> usize {
        self.pairs.len()
    }
}
