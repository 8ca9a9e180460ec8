//! Core types for the Cardoon domain.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Scheduling state of one card for one user.
///
/// Intervals are whole seconds. Once the card has been reviewed,
/// `next_review == last_reviewed + interval` holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCard {
    pub card_id: i64,
    pub interval: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: DateTime<Utc>,
    pub answer_streak: u32,
}

impl ReviewCard {
    /// Interval given to a card when it is attached to a user.
    pub const DEFAULT_INTERVAL_SECS: i64 = 3600;

    /// Create the review state for a freshly attached card. The card is due immediately.
    pub fn new(card_id: i64, initial_interval: i64, now: DateTime<Utc>) -> Result<Self> {
        if initial_interval < 1 {
            return Err(CoreError::validation(format!(
                "interval must be at least 1 second, got {initial_interval}"
            )));
        }
        Ok(Self {
            card_id,
            interval: initial_interval,
            last_reviewed: None,
            next_review: now,
            answer_streak: 0,
        })
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review <= now
    }

    pub fn interval_duration(&self) -> Duration {
        Duration::seconds(self.interval)
    }
}

/// Running answer accuracy of a user across all cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccuracy {
    pub correct_answers: u64,
    pub wrong_answers: u64,
}

impl UserAccuracy {
    /// Ratio of correct answers, 0.5 when nothing has been answered yet.
    pub fn answers_ratio(&self) -> f64 {
        let total = self.correct_answers + self.wrong_answers;
        if total == 0 {
            return 0.5;
        }
        self.correct_answers as f64 / total as f64
    }

    pub fn record(&mut self, is_correct: bool) {
        if is_correct {
            self.correct_answers += 1;
        } else {
            self.wrong_answers += 1;
        }
    }
}

/// Per-day count of correct answers toward a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyGoal {
    pub target: u32,
    pub progress: u32,
    pub day: NaiveDate,
}

impl DailyGoal {
    pub const DEFAULT_TARGET: u32 = 20;

    pub fn new(target: u32, today: NaiveDate) -> Self {
        Self {
            target,
            progress: 0,
            day: today,
        }
    }

    /// Start over when `today` is a new day. Progress from an earlier day
    /// does not count.
    pub fn roll_over(&mut self, today: NaiveDate) {
        if today != self.day {
            self.day = today;
            self.progress = 0;
        }
    }

    /// Count one unit of progress, starting over when `today` is a new day.
    pub fn record(&mut self, today: NaiveDate) {
        self.roll_over(today);
        self.progress = self.progress.saturating_add(1);
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.target
    }

    /// Whether the goal is met for `today`.
    pub fn is_complete_on(&self, today: NaiveDate) -> bool {
        self.day == today && self.is_complete()
    }
}

/// Persisted account progress. Survives runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProgress {
    pub score: u64,
    pub gold: f64,
    pub accuracy: UserAccuracy,
    pub daily_goal: DailyGoal,
    pub hero: HeroProfile,
}

impl UserProgress {
    pub fn new(daily_target: u32, today: NaiveDate) -> Self {
        Self {
            score: 0,
            gold: 0.0,
            accuracy: UserAccuracy::default(),
            daily_goal: DailyGoal::new(daily_target, today),
            hero: HeroProfile::default(),
        }
    }
}

/// Stat a bonus increases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Attack,
    Hp,
    Regeneration,
}

impl BonusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Hp => "hp",
            Self::Regeneration => "regeneration",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "attack" => Some(Self::Attack),
            "hp" => Some(Self::Hp),
            "regeneration" => Some(Self::Regeneration),
            _ => None,
        }
    }
}

/// Permanent stat increase granted for defeating an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bonus {
    #[serde(rename = "type")]
    pub kind: BonusKind,
    pub amount: f64,
}

/// Permanent hero stats stored with the account.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeroProfile {
    pub max_health: f64,
    pub attack_damage: f64,
    pub defense: f64,
    pub regeneration_rate: f64,
}

impl Default for HeroProfile {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            attack_damage: 10.0,
            defense: 2.0,
            regeneration_rate: 1.0,
        }
    }
}

/// Hero state for a single run of the combat mini-game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub max_health: f64,
    pub current_health: f64,
    pub attack_damage: f64,
    pub defense: f64,
    pub regeneration_rate: f64,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
}

impl Hero {
    pub const BASE_EXPERIENCE_TO_NEXT_LEVEL: u32 = 100;

    /// Fresh level 1 hero at full health.
    pub fn from_profile(profile: &HeroProfile) -> Self {
        Self {
            max_health: profile.max_health,
            current_health: profile.max_health,
            attack_damage: profile.attack_damage,
            defense: profile.defense,
            regeneration_rate: profile.regeneration_rate,
            level: 1,
            experience: 0,
            experience_to_next_level: Self::BASE_EXPERIENCE_TO_NEXT_LEVEL,
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.current_health <= 0.0
    }

    /// Verify health and stat bounds.
    pub fn check_bounds(&self) -> Result<()> {
        check_health("hero", self.current_health, self.max_health)?;
        if self.level == 0 {
            return Err(CoreError::inconsistent("hero level is 0"));
        }
        if self.attack_damage < 0.0 || self.defense < 0.0 || self.regeneration_rate < 0.0 {
            return Err(CoreError::inconsistent("hero has a negative stat"));
        }
        Ok(())
    }
}

impl Default for Hero {
    fn default() -> Self {
        Self::from_profile(&HeroProfile::default())
    }
}

/// An enemy, either as a catalog entry or as the live opponent of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: String,
    pub name: String,
    pub max_health: f64,
    #[serde(default)]
    pub current_health: f64,
    pub attack_damage: f64,
    pub defense: f64,
    pub experience: u32,
    pub bonus: Bonus,
    pub spawn_weight: u32,
    #[serde(default)]
    pub coins_drop: u32,
}

impl Enemy {
    /// Copy of this enemy at full health, ready to fight.
    pub fn spawned(&self) -> Self {
        Self {
            current_health: self.max_health,
            ..self.clone()
        }
    }

    pub fn is_defeated(&self) -> bool {
        self.current_health <= 0.0
    }

    pub fn check_bounds(&self) -> Result<()> {
        check_health(&format!("enemy {}", self.id), self.current_health, self.max_health)
    }
}

fn check_health(who: &str, current: f64, max: f64) -> Result<()> {
    if !current.is_finite() || current < 0.0 || current > max {
        return Err(CoreError::inconsistent(format!(
            "{who} health {current} outside [0, {max}]"
        )));
    }
    Ok(())
}

/// Animation state of one side of a fight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorState {
    #[default]
    Idle,
    Attacking,
    Defeated,
}
