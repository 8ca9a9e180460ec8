//! PostgreSQL database operations

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

const USER_COLUMNS: &str = r#"
    id, token, name, score, gold, correct_answers, wrong_answers,
    daily_goal_target, daily_goal_progress, daily_goal_day,
    hero_max_health, hero_attack_damage, hero_defense, hero_regeneration_rate,
    created_at, last_seen_at
"#;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create a pool that connects on first use
    pub fn connect_lazy(database_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect_lazy(database_url)?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    /// Create a user with default progress and a generated token
    pub async fn create_user(
        &self,
        name: Option<&str>,
        daily_goal_target: u32,
        today: NaiveDate,
    ) -> Result<DbUser> {
        let token = Uuid::new_v4().to_string();
        let hero = HeroProfile::default();
        let user = sqlx::query_as::<_, DbUser>(&format!(
            r#"
            INSERT INTO users (token, name, daily_goal_target, daily_goal_day,
                               hero_max_health, hero_attack_damage, hero_defense, hero_regeneration_rate)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USER_COLUMNS}
            "#
        ))
        .bind(&token)
        .bind(name)
        .bind(daily_goal_target as i32)
        .bind(today)
        .bind(hero.max_health)
        .bind(hero.attack_damage)
        .bind(hero.defense)
        .bind(hero.regeneration_rate)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by token
    pub async fn get_user_by_token(&self, token: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE token = $1"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Get user by ID
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user last_seen_at timestamp
    pub async fn update_last_seen(&self, user_id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET last_seen_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Write score, gold, accuracy, daily goal and hero profile
    pub async fn update_user_progress(&self, user_id: Uuid, progress: &UserProgress) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                score = $2,
                gold = $3,
                correct_answers = $4,
                wrong_answers = $5,
                daily_goal_target = $6,
                daily_goal_progress = $7,
                daily_goal_day = $8,
                hero_max_health = $9,
                hero_attack_damage = $10,
                hero_defense = $11,
                hero_regeneration_rate = $12
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .bind(progress.score as i64)
        .bind(progress.gold)
        .bind(progress.accuracy.correct_answers as i64)
        .bind(progress.accuracy.wrong_answers as i64)
        .bind(progress.daily_goal.target as i32)
        .bind(progress.daily_goal.progress as i32)
        .bind(progress.daily_goal.day)
        .bind(progress.hero.max_health)
        .bind(progress.hero.attack_damage)
        .bind(progress.hero.defense)
        .bind(progress.hero.regeneration_rate)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(format!("User {} not found", user_id)));
        }
        Ok(())
    }

    // === Card Repository ===

    /// Create a card and attach it to its owner, due immediately
    pub async fn create_card(
        &self,
        owner_id: Uuid,
        question: &str,
        answer: &str,
        review: &ReviewCard,
    ) -> Result<DbCardWithReview> {
        let mut tx = self.pool.begin().await?;

        let card_id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO cards (owner_id, question, answer)
            VALUES ($1, $2, $3)
            RETURNING id
            "#,
        )
        .bind(owner_id)
        .bind(question)
        .bind(answer)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO review_cards (card_id, user_id, interval_secs, last_reviewed, next_review, answer_streak)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(card_id)
        .bind(owner_id)
        .bind(review.interval)
        .bind(review.last_reviewed)
        .bind(review.next_review)
        .bind(review.answer_streak as i32)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DbCardWithReview {
            card_id,
            question: question.to_string(),
            answer: answer.to_string(),
            interval_secs: review.interval,
            last_reviewed: review.last_reviewed,
            next_review: review.next_review,
            answer_streak: review.answer_streak as i32,
        })
    }

    // === Review Card Repository ===

    /// Get a user's review state for a card
    pub async fn get_review_card(&self, user_id: Uuid, card_id: i64) -> Result<Option<DbReviewCard>> {
        let card = sqlx::query_as::<_, DbReviewCard>(
            r#"
            SELECT card_id, user_id, interval_secs, last_reviewed, next_review, answer_streak
            FROM review_cards
            WHERE card_id = $1 AND user_id = $2
            "#,
        )
        .bind(card_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(card)
    }

    /// Upsert a user's review state for a card
    pub async fn upsert_review_card(&self, user_id: Uuid, card: &ReviewCard) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO review_cards (card_id, user_id, interval_secs, last_reviewed, next_review, answer_streak)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (card_id, user_id) DO UPDATE SET
                interval_secs = EXCLUDED.interval_secs,
                last_reviewed = EXCLUDED.last_reviewed,
                next_review = EXCLUDED.next_review,
                answer_streak = EXCLUDED.answer_streak,
                updated_at = NOW()
            "#,
        )
        .bind(card.card_id)
        .bind(user_id)
        .bind(card.interval)
        .bind(card.last_reviewed)
        .bind(card.next_review)
        .bind(card.answer_streak as i32)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get cards due for review, earliest first
    pub async fn get_due_cards(
        &self,
        user_id: Uuid,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<DbCardWithReview>> {
        let cards = sqlx::query_as::<_, DbCardWithReview>(
            r#"
            SELECT c.id AS card_id, c.question, c.answer,
                   rc.interval_secs, rc.last_reviewed, rc.next_review, rc.answer_streak
            FROM review_cards rc
            JOIN cards c ON c.id = rc.card_id
            WHERE rc.user_id = $1 AND rc.next_review <= $2
            ORDER BY rc.next_review
            LIMIT $3
            "#,
        )
        .bind(user_id)
        .bind(now)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(cards)
    }

    // === Shop Repository ===

    /// Get all shop items
    pub async fn list_items(&self) -> Result<Vec<DbItem>> {
        let items = sqlx::query_as::<_, DbItem>(
            r#"
            SELECT id, name, price, effect_kind, effect_factor
            FROM items
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Get a shop item by ID
    pub async fn get_item(&self, item_id: i64) -> Result<Option<DbItem>> {
        let item = sqlx::query_as::<_, DbItem>(
            r#"
            SELECT id, name, price, effect_kind, effect_factor
            FROM items
            WHERE id = $1
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Get the items a user owns
    pub async fn get_user_items(&self, user_id: Uuid) -> Result<Vec<DbUserItem>> {
        let items = sqlx::query_as::<_, DbUserItem>(
            r#"
            SELECT i.id, i.name, i.price, i.effect_kind, i.effect_factor, ui.equipped
            FROM user_items ui
            JOIN items i ON i.id = ui.item_id
            WHERE ui.user_id = $1
            ORDER BY i.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Deduct the price and record ownership in one transaction
    ///
    /// Nothing is written when the user cannot afford the item or already
    /// owns it.
    pub async fn purchase_item(&self, user_id: Uuid, item: &Item) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let paid = sqlx::query(
            r#"
            UPDATE users
            SET gold = gold - $2
            WHERE id = $1 AND gold >= $2
            "#,
        )
        .bind(user_id)
        .bind(item.price)
        .execute(&mut *tx)
        .await?;

        if paid.rows_affected() == 0 {
            return Err(ApiError::BadRequest(format!(
                "Item {} costs {} gold, not enough gold",
                item.id, item.price
            )));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO user_items (user_id, item_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, item_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(item.id)
        .execute(&mut *tx)
        .await?;

        // Dropping the transaction rolls the deduction back
        if inserted.rows_affected() == 0 {
            return Err(ApiError::BadRequest(format!("Item {} already owned", item.id)));
        }

        tx.commit().await?;

        Ok(())
    }

    /// Set the equipped flag of an owned item
    pub async fn set_item_equipped(&self, user_id: Uuid, item_id: i64, equipped: bool) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE user_items
            SET equipped = $3
            WHERE user_id = $1 AND item_id = $2
            "#,
        )
        .bind(user_id)
        .bind(item_id)
        .bind(equipped)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
