//! Effective-radius calculator
//!
//! The single source of truth for all collision and boundary math. Static
//! placement and runtime drift detection both go through here, which is what
//! keeps the two checks consistent with each other.

use crate::consts::{BASE_FIGURE_SIZE, COLLISION_PADDING};

use super::catalog::Catalog;
use super::state::FigureInstance;
use super::vibration;

/// Conservative bounding radius for a figure instance.
///
/// resting radius + worst-case vibration envelope + fixed padding.
///
/// Unknown template ids (the bomb pseudo-id, ids from newer catalogs) fall
/// back to the bare scaled base radius instead of failing; geometry code must
/// never crash on an id it has not seen.
pub fn effective_radius(instance: &FigureInstance, catalog: &Catalog, canvas_scale: f32) -> f32 {
    let rest = BASE_FIGURE_SIZE * instance.scale * canvas_scale;
    match catalog.get(&instance.template_id) {
        Some(template) => {
            // Amplitude scaled the same way the runtime displacement scales
            // it, so the envelope always covers the worst-case excursion
            let envelope =
                vibration::envelope(template.pattern, template.amplitude * canvas_scale, rest);
            rest + envelope + COLLISION_PADDING
        }
        None => rest,
    }
}
