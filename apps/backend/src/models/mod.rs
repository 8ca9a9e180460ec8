//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Re-export shared types from cardoon-core
pub use cardoon_core::{
    BonusRequest, DailyGoal, Enemy, HeroProfile, Item, ItemEffect, ReviewCard, ReviewOutcome,
    ShopEntry, UserAccuracy, UserItem, UserProgress,
};

// === Database Entity Types ===

/// User row with persisted progress
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub token: String,
    pub name: Option<String>,
    pub score: i64,
    pub gold: f64,
    pub correct_answers: i64,
    pub wrong_answers: i64,
    pub daily_goal_target: i32,
    pub daily_goal_progress: i32,
    pub daily_goal_day: NaiveDate,
    pub hero_max_health: f64,
    pub hero_attack_damage: f64,
    pub hero_defense: f64,
    pub hero_regeneration_rate: f64,
    pub created_at: DateTime<Utc>,
    pub last_seen_at: DateTime<Utc>,
}

impl DbUser {
    /// Convert to cardoon-core UserProgress
    pub fn to_progress(&self) -> UserProgress {
        UserProgress {
            score: self.score.max(0) as u64,
            gold: self.gold,
            accuracy: UserAccuracy {
                correct_answers: self.correct_answers.max(0) as u64,
                wrong_answers: self.wrong_answers.max(0) as u64,
            },
            daily_goal: DailyGoal {
                target: self.daily_goal_target.max(0) as u32,
                progress: self.daily_goal_progress.max(0) as u32,
                day: self.daily_goal_day,
            },
            hero: HeroProfile {
                max_health: self.hero_max_health,
                attack_damage: self.hero_attack_damage,
                defense: self.hero_defense,
                regeneration_rate: self.hero_regeneration_rate,
            },
        }
    }

    /// Response as seen on `today`: a goal from an earlier day reads as fresh
    pub fn to_response(&self, today: NaiveDate) -> UserResponse {
        let mut progress = self.to_progress();
        progress.daily_goal.roll_over(today);
        UserResponse {
            user_id: self.id,
            name: self.name.clone(),
            answers_ratio: progress.accuracy.answers_ratio(),
            daily_goal_complete: progress.daily_goal.is_complete_on(today),
            progress,
        }
    }
}

/// Review state row, one per user and card
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbReviewCard {
    pub card_id: i64,
    pub user_id: Uuid,
    pub interval_secs: i64,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: DateTime<Utc>,
    pub answer_streak: i32,
}

impl DbReviewCard {
    /// Convert to cardoon-core ReviewCard
    pub fn to_core(&self) -> ReviewCard {
        ReviewCard {
            card_id: self.card_id,
            interval: self.interval_secs,
            last_reviewed: self.last_reviewed,
            next_review: self.next_review,
            answer_streak: self.answer_streak.max(0) as u32,
        }
    }
}

/// Card content joined with the user's review state
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCardWithReview {
    pub card_id: i64,
    pub question: String,
    pub answer: String,
    pub interval_secs: i64,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: DateTime<Utc>,
    pub answer_streak: i32,
}

impl DbCardWithReview {
    pub fn to_response(&self) -> CardResponse {
        CardResponse {
            card_id: self.card_id,
            question: self.question.clone(),
            answer: self.answer.clone(),
            review: ReviewCard {
                card_id: self.card_id,
                interval: self.interval_secs,
                last_reviewed: self.last_reviewed,
                next_review: self.next_review,
                answer_streak: self.answer_streak.max(0) as u32,
            },
        }
    }
}

/// Shop item row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub effect_kind: String,
    pub effect_factor: Option<f64>,
}

impl DbItem {
    /// Convert to cardoon-core Item
    pub fn to_item(&self) -> Item {
        let effect = match (self.effect_kind.as_str(), self.effect_factor) {
            ("gold_multiplier", Some(factor)) => ItemEffect::GoldMultiplier { factor },
            _ => ItemEffect::Cosmetic,
        };
        Item {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            effect,
        }
    }
}

/// Owned item row (item columns joined with ownership)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUserItem {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub effect_kind: String,
    pub effect_factor: Option<f64>,
    pub equipped: bool,
}

impl DbUserItem {
    pub fn to_user_item(&self) -> UserItem {
        let item = DbItem {
            id: self.id,
            name: self.name.clone(),
            price: self.price,
            effect_kind: self.effect_kind.clone(),
            effect_factor: self.effect_factor,
        };
        UserItem {
            item: item.to_item(),
            equipped: self.equipped,
        }
    }
}

// === API Request/Response Types ===

/// User registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: Option<String>,
}

/// User registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

/// Current user with progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub name: Option<String>,
    pub answers_ratio: f64,
    pub daily_goal_complete: bool,
    #[serde(flatten)]
    pub progress: UserProgress,
}

/// Create and attach a card
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardRequest {
    pub question: String,
    pub answer: String,
}

/// Card content with its review state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardResponse {
    pub card_id: i64,
    pub question: String,
    pub answer: String,
    pub review: ReviewCard,
}

/// Due cards query parameters
#[derive(Debug, Clone, Deserialize)]
pub struct DueCardsQuery {
    pub limit: Option<i64>,
}

/// Due cards response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DueCardsResponse {
    pub cards: Vec<CardResponse>,
}

/// Answer submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerRequest {
    pub is_correct: bool,
}

/// Result of an answer submission
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    pub card: ReviewCard,
    pub outcome: ReviewOutcome,
    pub progress: UserProgress,
}

/// Enemy pool of a level
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemiesResponse {
    pub level_id: String,
    pub enemies: Vec<Enemy>,
}

/// Shop listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShopResponse {
    pub gold: f64,
    pub entries: Vec<ShopEntry>,
}
