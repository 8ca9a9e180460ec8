//! Enemy catalog: the enemies available on each adventure level.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::types::Enemy;

/// Source of enemy pools for adventure levels.
pub trait EnemyCatalog: Send + Sync {
    /// Active enemies of a level, at full health.
    fn enemies_for_level(&self, level_id: &str) -> Result<Vec<Enemy>>;
}

/// Enemy entry of a level, with its availability flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelEnemy {
    #[serde(flatten)]
    pub enemy: Enemy,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub id: String,
    pub name: String,
    pub enemies: Vec<LevelEnemy>,
}

/// Catalog loaded once from a JSON document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaticCatalog {
    pub levels: Vec<Level>,
}

const BUILTIN_CATALOG: &str = include_str!("../data/enemies.json");

impl StaticCatalog {
    /// Parse and validate a catalog document.
    pub fn from_json(json: &str) -> Result<Self> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|e| CoreError::validation(format!("invalid enemy catalog: {e}")))?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The catalog shipped with the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_CATALOG)
    }

    pub fn level(&self, level_id: &str) -> Option<&Level> {
        self.levels.iter().find(|l| l.id == level_id)
    }

    fn validate(&self) -> Result<()> {
        for (i, level) in self.levels.iter().enumerate() {
            if self.levels[..i].iter().any(|l| l.id == level.id) {
                return Err(CoreError::validation(format!("duplicate level id {}", level.id)));
            }
            for entry in &level.enemies {
                let e = &entry.enemy;
                let stats_ok = e.max_health > 0.0
                    && e.attack_damage >= 0.0
                    && e.defense >= 0.0
                    && e.bonus.amount >= 0.0;
                if !stats_ok {
                    return Err(CoreError::validation(format!(
                        "enemy {} on level {} has invalid stats",
                        e.id, level.id
                    )));
                }
            }
        }
        Ok(())
    }
}

impl EnemyCatalog for StaticCatalog {
    fn enemies_for_level(&self, level_id: &str) -> Result<Vec<Enemy>> {
        let level = self
            .level(level_id)
            .ok_or_else(|| CoreError::not_found(format!("level {level_id}")))?;
        Ok(level
            .enemies
            .iter()
            .filter(|entry| entry.active)
            .map(|entry| entry.enemy.spawned())
            .collect())
    }
}
