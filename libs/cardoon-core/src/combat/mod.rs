//! Adventure combat: damage resolution, leveling, spawning and sessions.

pub mod bonus;
pub mod damage;
pub mod leveling;
pub mod session;
pub mod spawn;
pub mod timers;

pub use bonus::{BonusGateway, BonusRequest};
pub use damage::{
    apply_damage, apply_regeneration, calculate_enemy_damage, calculate_hero_damage,
    calculate_penalty_damage, resolve_attack, AttackOutcome, AttackResolution,
};
pub use leveling::LevelUpGains;
pub use session::{CombatSession, CombatTuning, SessionEvent, TimerSlot};
pub use spawn::{pick_uniform, pick_weighted};
pub use timers::TimerTable;
