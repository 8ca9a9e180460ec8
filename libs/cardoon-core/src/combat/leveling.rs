//! Experience, level-ups and bonus stats.

use serde::{Deserialize, Serialize};

use crate::types::{Bonus, BonusKind, Hero, HeroProfile};

/// Stat increases granted on each level-up.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelUpGains {
    pub max_health: f64,
    pub attack_damage: f64,
    pub defense: f64,
    /// Factor applied to the experience required for the next level.
    pub experience_growth: f64,
}

impl Default for LevelUpGains {
    fn default() -> Self {
        Self {
            max_health: 10.0,
            attack_damage: 2.0,
            defense: 1.0,
            experience_growth: 1.5,
        }
    }
}

impl Hero {
    /// Advance one level: raise stats, reset experience and fully heal.
    pub fn level_up(&mut self, gains: &LevelUpGains) {
        self.level += 1;
        self.max_health += gains.max_health;
        self.attack_damage += gains.attack_damage;
        self.defense += gains.defense;
        self.experience = 0;
        let next = (self.experience_to_next_level as f64 * gains.experience_growth).floor() as u32;
        // always require more than the previous level
        self.experience_to_next_level = next.max(self.experience_to_next_level + 1);
        self.current_health = self.max_health;
        tracing::info!(level = self.level, "hero leveled up");
    }

    /// Add experience, leveling up when the threshold is reached.
    ///
    /// # Returns
    ///
    /// Whether the hero leveled up
    pub fn gain_experience(&mut self, amount: u32, gains: &LevelUpGains) -> bool {
        self.experience = self.experience.saturating_add(amount);
        if self.experience >= self.experience_to_next_level {
            self.level_up(gains);
            return true;
        }
        false
    }

    /// Apply an enemy bonus to the run stats.
    pub fn apply_bonus(&mut self, bonus: &Bonus) {
        let amount = bonus.amount.max(0.0);
        match bonus.kind {
            BonusKind::Attack => self.attack_damage += amount,
            BonusKind::Hp => {
                self.max_health += amount;
                self.current_health = (self.current_health + amount).min(self.max_health);
            }
            BonusKind::Regeneration => self.regeneration_rate += amount,
        }
    }
}

impl HeroProfile {
    /// Apply an enemy bonus to the permanent stats.
    pub fn apply_bonus(&mut self, bonus: &Bonus) {
        let amount = bonus.amount.max(0.0);
        match bonus.kind {
            BonusKind::Attack => self.attack_damage += amount,
            BonusKind::Hp => self.max_health += amount,
            BonusKind::Regeneration => self.regeneration_rate += amount,
        }
    }
}
