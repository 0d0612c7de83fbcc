//! Upgrade axes and the purchase transaction
//!
//! Ten per-player progression axes. Leveled upgrades cost `base_cost * next
//! level` and cap at a max level; consumables (bomb, shield, second chance)
//! cost a flat `base_cost` and stack without bound. A purchase either fully
//! commits or leaves coins and levels untouched.

use serde::{Deserialize, Serialize};

/// The ten upgrade axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    BombCount,
    FigureShrink,
    QueueSize,
    TimeBonus,
    PlacementBonus,
    SlowMo,
    ShieldCharges,
    CoinBoost,
    Luck,
    SecondChance,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 10] = [
        UpgradeKind::BombCount,
        UpgradeKind::FigureShrink,
        UpgradeKind::QueueSize,
        UpgradeKind::TimeBonus,
        UpgradeKind::PlacementBonus,
        UpgradeKind::SlowMo,
        UpgradeKind::ShieldCharges,
        UpgradeKind::CoinBoost,
        UpgradeKind::Luck,
        UpgradeKind::SecondChance,
    ];

    /// Consumables have no level cap and a flat price
    pub fn is_consumable(&self) -> bool {
        matches!(
            self,
            UpgradeKind::BombCount | UpgradeKind::ShieldCharges | UpgradeKind::SecondChance
        )
    }

    pub fn base_cost(&self) -> u64 {
        match self {
            UpgradeKind::BombCount => 50,
            UpgradeKind::FigureShrink => 120,
            UpgradeKind::QueueSize => 100,
            UpgradeKind::TimeBonus => 80,
            UpgradeKind::PlacementBonus => 90,
            UpgradeKind::SlowMo => 110,
            UpgradeKind::ShieldCharges => 150,
            UpgradeKind::CoinBoost => 100,
            UpgradeKind::Luck => 130,
            UpgradeKind::SecondChance => 200,
        }
    }

    /// Cap for leveled upgrades; consumables return `u32::MAX`
    pub fn max_level(&self) -> u32 {
        if self.is_consumable() { u32::MAX } else { 5 }
    }
}

/// Per-player upgrade levels / consumable counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub bomb_count: u32,
    pub figure_shrink: u32,
    pub queue_size: u32,
    pub time_bonus: u32,
    pub placement_bonus: u32,
    pub slow_mo: u32,
    pub shield_charges: u32,
    pub coin_boost: u32,
    pub luck: u32,
    pub second_chance: u32,
}

impl Upgrades {
    pub fn level(&self, kind: UpgradeKind) -> u32 {
        match kind {
            UpgradeKind::BombCount => self.bomb_count,
            UpgradeKind::FigureShrink => self.figure_shrink,
            UpgradeKind::QueueSize => self.queue_size,
            UpgradeKind::TimeBonus => self.time_bonus,
            UpgradeKind::PlacementBonus => self.placement_bonus,
            UpgradeKind::SlowMo => self.slow_mo,
            UpgradeKind::ShieldCharges => self.shield_charges,
            UpgradeKind::CoinBoost => self.coin_boost,
            UpgradeKind::Luck => self.luck,
            UpgradeKind::SecondChance => self.second_chance,
        }
    }

    fn level_mut(&mut self, kind: UpgradeKind) -> &mut u32 {
        match kind {
            UpgradeKind::BombCount => &mut self.bomb_count,
            UpgradeKind::FigureShrink => &mut self.figure_shrink,
            UpgradeKind::QueueSize => &mut self.queue_size,
            UpgradeKind::TimeBonus => &mut self.time_bonus,
            UpgradeKind::PlacementBonus => &mut self.placement_bonus,
            UpgradeKind::SlowMo => &mut self.slow_mo,
            UpgradeKind::ShieldCharges => &mut self.shield_charges,
            UpgradeKind::CoinBoost => &mut self.coin_boost,
            UpgradeKind::Luck => &mut self.luck,
            UpgradeKind::SecondChance => &mut self.second_chance,
        }
    }

    /// Price of the next step: `base_cost * (level + 1)` for leveled axes,
    /// flat `base_cost` for consumables
    pub fn next_cost(&self, kind: UpgradeKind) -> u64 {
        if kind.is_consumable() {
            kind.base_cost()
        } else {
            kind.base_cost() * (self.level(kind) as u64 + 1)
        }
    }

    /// Purchase transaction: checks affordability and the level cap, then
    /// debits coins and bumps the level. Failure mutates nothing.
    pub fn purchase(&mut self, kind: UpgradeKind, coins: &mut u64) -> bool {
        if self.level(kind) >= kind.max_level() {
            return false;
        }
        let cost = self.next_cost(kind);
        if *coins < cost {
            return false;
        }
        *coins -= cost;
        *self.level_mut(kind) += 1;
        true
    }

    // Derived gameplay multipliers

    /// Figure scale reduction: -5% per level, floored at 0.6x
    pub fn shrink_multiplier(&self) -> f32 {
        (1.0 - self.figure_shrink as f32 * 0.05).max(0.6)
    }

    /// Queue depth
    pub fn queue_capacity(&self) -> usize {
        3 + self.queue_size as usize
    }

    /// Extra seconds granted per placement
    pub fn extra_time_bonus(&self) -> f32 {
        self.time_bonus as f32 * 0.5
    }

    /// Score multiplier from the placement-bonus axis
    pub fn placement_multiplier(&self) -> f32 {
        1.0 + self.placement_bonus as f32 * 0.05
    }

    /// Area-shrink slowdown: -7% per level, floored at 0.3x
    pub fn slow_mo_multiplier(&self) -> f32 {
        (1.0 - self.slow_mo as f32 * 0.07).max(0.3)
    }

    /// Coin/score reward multiplier
    pub fn coin_multiplier(&self) -> f32 {
        1.0 + self.coin_boost as f32 * 0.1
    }

    /// Additional per-slot bomb chance in queue generation
    pub fn luck_bomb_chance(&self) -> f32 {
        self.luck as f32 * 0.02
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leveled_cost_scales_with_level() {
        let mut u = Upgrades::default();
        let mut coins = 10_000u64;

        // Level 0 -> 1 costs base, 1 -> 2 costs 2x base, ...
        assert_eq!(u.next_cost(UpgradeKind::CoinBoost), 100);
        assert!(u.purchase(UpgradeKind::CoinBoost, &mut coins));
        assert_eq!(coins, 9_900);
        assert_eq!(u.next_cost(UpgradeKind::CoinBoost), 200);
        assert!(u.purchase(UpgradeKind::CoinBoost, &mut coins));
        assert_eq!(coins, 9_700);
        assert_eq!(u.coin_boost, 2);
    }

    #[test]
    fn purchase_past_max_level_fails_without_mutation() {
        let mut u = Upgrades {
            luck: UpgradeKind::Luck.max_level(),
            ..Default::default()
        };
        let mut coins = 100_000u64;
        assert!(!u.purchase(UpgradeKind::Luck, &mut coins));
        assert_eq!(coins, 100_000);
        assert_eq!(u.luck, UpgradeKind::Luck.max_level());
    }

    #[test]
    fn consumables_cost_flat_and_never_cap() {
        let mut u = Upgrades {
            shield_charges: 17,
            ..Default::default()
        };
        let mut coins = 1_000u64;
        assert_eq!(u.next_cost(UpgradeKind::ShieldCharges), 150);
        assert!(u.purchase(UpgradeKind::ShieldCharges, &mut coins));
        assert_eq!(coins, 850);
        assert_eq!(u.shield_charges, 18);
        // Still flat at the higher count
        assert_eq!(u.next_cost(UpgradeKind::ShieldCharges), 150);
    }

    #[test]
    fn unaffordable_purchase_leaves_state_untouched() {
        let mut u = Upgrades::default();
        let mut coins = 10u64;
        assert!(!u.purchase(UpgradeKind::SecondChance, &mut coins));
        assert_eq!(coins, 10);
        assert_eq!(u.second_chance, 0);
    }

    #[test]
    fn derived_multipliers_respect_floors() {
        let u = Upgrades {
            figure_shrink: 50,
            slow_mo: 50,
            ..Default::default()
        };
        assert!((u.shrink_multiplier() - 0.6).abs() < 1e-6);
        assert!((u.slow_mo_multiplier() - 0.3).abs() < 1e-6);
    }
}
