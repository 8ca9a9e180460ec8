//! Core library for the Cardoon flashcard game.
//!
//! Provides:
//! - Interval scheduling for reviewed cards (streak and accuracy based)
//! - Review bookkeeping (score, gold, daily goal)
//! - Combat resolution, leveling and enemy spawning for adventure runs
//! - Combat sessions with cancellable delayed state transitions
//! - Enemy catalog and shop item models

pub mod algorithm;
pub mod catalog;
pub mod combat;
pub mod error;
pub mod review;
pub mod shop;
pub mod types;

pub use algorithm::{SchedulingResult, SpacedRepetitionAlgorithm, StreakScheduler};
pub use catalog::{EnemyCatalog, StaticCatalog};
pub use combat::{
    resolve_attack, AttackOutcome, AttackResolution, BonusGateway, BonusRequest, CombatSession,
    CombatTuning, SessionEvent,
};
pub use error::{CoreError, Result};
pub use review::{apply_answer, ReviewOutcome};
pub use shop::{gold_multiplier, Item, ItemEffect, ShopEntry, UserItem};
pub use types::{
    ActorState, Bonus, BonusKind, DailyGoal, Enemy, Hero, HeroProfile, ReviewCard, UserAccuracy,
    UserProgress,
};
