//! Boundary for persisting enemy rewards.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Bonus, BonusKind, HeroProfile, UserProgress};

/// Reward for a defeated enemy, as sent to the account service.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BonusRequest {
    #[serde(rename = "type")]
    pub kind: BonusKind,
    pub amount: f64,
    #[serde(default)]
    pub coins_drop: u32,
}

impl BonusRequest {
    pub fn bonus(&self) -> Bonus {
        Bonus {
            kind: self.kind,
            amount: self.amount,
        }
    }
}

/// Persists a bonus to the user's permanent hero profile.
pub trait BonusGateway {
    /// Store the bonus and coins, returning the updated hero profile.
    fn add_hero_bonus(&mut self, request: &BonusRequest) -> Result<HeroProfile>;
}

impl UserProgress {
    /// Apply a defeated enemy's reward to the permanent profile and purse.
    pub fn apply_enemy_reward(&mut self, request: &BonusRequest) {
        self.hero.apply_bonus(&request.bonus());
        self.gold += f64::from(request.coins_drop);
    }
}

/// Gateway that writes straight into an in-memory account, for offline play.
impl BonusGateway for UserProgress {
    fn add_hero_bonus(&mut self, request: &BonusRequest) -> Result<HeroProfile> {
        self.apply_enemy_reward(request);
        Ok(self.hero)
    }
}
