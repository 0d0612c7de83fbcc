//! Figure template catalog
//!
//! Static definitions of every placeable figure: shape primitives for the
//! renderer, vibration behavior for the simulation, rarity for queue
//! generation. Built once at startup, never mutated.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// How a figure oscillates around its placed position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VibrationPattern {
    Horizontal,
    Vertical,
    Circular,
    /// No positional drift; the body breathes ±10% in scale instead
    Pulse,
    Diagonal,
}

/// Rarity tier, carrying the queue-generation weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
}

impl Rarity {
    /// Relative weight for weighted-random queue draws
    pub fn weight(&self) -> u32 {
        match self {
            Rarity::Common => 55,
            Rarity::Uncommon => 30,
            Rarity::Rare => 12,
            Rarity::Epic => 3,
        }
    }
}

/// Primitive shape kinds the renderer understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Capsule,
}

/// One drawable primitive of a figure, in template-local space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapePrimitive {
    pub kind: ShapeKind,
    pub offset: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    /// 0xRRGGBB
    pub color: u32,
}

/// Immutable figure definition
///
/// Templates carry `&'static str` ids (serialize-only); instances store owned
/// id strings so snapshots round-trip and unknown ids stay representable.
#[derive(Debug, Clone, Serialize)]
pub struct FigureTemplate {
    pub id: &'static str,
    pub name: &'static str,
    pub shapes: Vec<ShapePrimitive>,
    pub pattern: VibrationPattern,
    /// Hz-like phase speed scalar
    pub speed: f32,
    /// Peak oscillation in px at canvas scale 1.0
    pub amplitude: f32,
    pub base_scale: f32,
    pub rarity: Rarity,
    pub coin_value: u64,
}

/// The full template catalog, keyed by template id
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    templates: Vec<FigureTemplate>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The shipped bacteria roster
    pub fn builtin() -> Self {
        fn blob(kind: ShapeKind, size: Vec2, color: u32) -> Vec<ShapePrimitive> {
            vec![ShapePrimitive {
                kind,
                offset: Vec2::ZERO,
                size,
                rotation: 0.0,
                color,
            }]
        }

        let templates = vec![
            FigureTemplate {
                id: "coccus",
                name: "Coccus",
                shapes: blob(ShapeKind::Circle, Vec2::splat(1.0), 0x7ec850),
                pattern: VibrationPattern::Pulse,
                speed: 2.0,
                amplitude: 0.0,
                base_scale: 1.0,
                rarity: Rarity::Common,
                coin_value: 10,
            },
            FigureTemplate {
                id: "bacillus",
                name: "Bacillus",
                shapes: blob(ShapeKind::Capsule, Vec2::new(1.4, 0.7), 0x4f9dd1),
                pattern: VibrationPattern::Horizontal,
                speed: 3.0,
                amplitude: 4.0,
                base_scale: 1.0,
                rarity: Rarity::Common,
                coin_value: 10,
            },
            FigureTemplate {
                id: "diplococcus",
                name: "Diplococcus",
                shapes: vec![
                    ShapePrimitive {
                        kind: ShapeKind::Circle,
                        offset: Vec2::new(-0.4, 0.0),
                        size: Vec2::splat(0.7),
                        rotation: 0.0,
                        color: 0xc9a14e,
                    },
                    ShapePrimitive {
                        kind: ShapeKind::Circle,
                        offset: Vec2::new(0.4, 0.0),
                        size: Vec2::splat(0.7),
                        rotation: 0.0,
                        color: 0xc9a14e,
                    },
                ],
                pattern: VibrationPattern::Vertical,
                speed: 2.5,
                amplitude: 5.0,
                base_scale: 1.0,
                rarity: Rarity::Common,
                coin_value: 12,
            },
            FigureTemplate {
                id: "spirillum",
                name: "Spirillum",
                shapes: blob(ShapeKind::Ellipse, Vec2::new(1.3, 0.5), 0xd14f8e),
                pattern: VibrationPattern::Circular,
                speed: 2.2,
                amplitude: 6.0,
                base_scale: 1.1,
                rarity: Rarity::Uncommon,
                coin_value: 25,
            },
            FigureTemplate {
                id: "vibrio",
                name: "Vibrio",
                shapes: blob(ShapeKind::Capsule, Vec2::new(1.2, 0.5), 0x59c2b8),
                pattern: VibrationPattern::Diagonal,
                speed: 3.5,
                amplitude: 5.0,
                base_scale: 0.9,
                rarity: Rarity::Uncommon,
                coin_value: 25,
            },
            FigureTemplate {
                id: "amoeba",
                name: "Amoeba",
                shapes: blob(ShapeKind::Ellipse, Vec2::new(1.5, 1.3), 0x9b6fd1),
                pattern: VibrationPattern::Pulse,
                speed: 1.4,
                amplitude: 0.0,
                base_scale: 1.3,
                rarity: Rarity::Rare,
                coin_value: 60,
            },
            FigureTemplate {
                id: "paramecium",
                name: "Paramecium",
                shapes: blob(ShapeKind::Ellipse, Vec2::new(1.8, 0.8), 0xd1cb4f),
                pattern: VibrationPattern::Circular,
                speed: 4.0,
                amplitude: 8.0,
                base_scale: 1.2,
                rarity: Rarity::Rare,
                coin_value: 60,
            },
            FigureTemplate {
                id: "tardigrade",
                name: "Tardigrade",
                shapes: blob(ShapeKind::Capsule, Vec2::new(1.6, 1.0), 0xe08c3a),
                pattern: VibrationPattern::Diagonal,
                speed: 1.8,
                amplitude: 10.0,
                base_scale: 1.4,
                rarity: Rarity::Epic,
                coin_value: 150,
            },
        ];

        Self { templates }
    }

    /// Look up a template by id. Unknown ids (including the bomb pseudo-id)
    /// return `None`; geometry callers must fail soft.
    pub fn get(&self, id: &str) -> Option<&FigureTemplate> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// All templates, in catalog order
    pub fn templates(&self) -> &[FigureTemplate] {
        &self.templates
    }

    /// Sum of rarity weights, used by the weighted queue draw
    pub fn total_weight(&self) -> u32 {
        self.templates.iter().map(|t| t.rarity.weight()).sum()
    }

    /// Weighted pick by rarity given a roll in `0..total_weight()`
    pub fn pick_weighted(&self, roll: u32) -> &FigureTemplate {
        let mut acc = 0u32;
        for t in &self.templates {
            acc += t.rarity.weight();
            if roll < acc {
                return t;
            }
        }
        // Roll out of range only if the caller ignored total_weight()
        self.templates.last().expect("catalog is never empty")
    }
}
