//! Combat session: one run of the adventure mini-game.
//!
//! The session owns the run hero, the current enemy and two independent
//! animation state machines:
//!
//! ```text
//! hero:  idle --correct--> attacking --delay--> idle
//!        *    --health 0-> defeated  --reset_run--> idle
//! enemy: idle --answer---> attacking --delay--> idle
//!        *    --health 0-> defeated  --delay--> idle (new enemy)
//! ```
//!
//! Delayed transitions go through a [`TimerTable`]; time is passed in by the
//! caller via [`CombatSession::tick`].

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bonus::{BonusGateway, BonusRequest};
use super::damage::{resolve_attack_with, AttackOutcome, PENALTY_MULTIPLIER};
use super::leveling::LevelUpGains;
use super::spawn::{pick_uniform, pick_weighted};
use super::timers::TimerTable;
use crate::catalog::EnemyCatalog;
use crate::error::{CoreError, Result};
use crate::types::{ActorState, Bonus, Enemy, Hero, HeroProfile};

/// Tunable combat parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub penalty_multiplier: f64,
    /// How long an attack animation keeps an actor in `attacking`.
    pub attack_delay_ms: i64,
    /// How long a defeated enemy stays on screen before the next one spawns.
    pub defeat_delay_ms: i64,
    pub level_up: LevelUpGains,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            penalty_multiplier: PENALTY_MULTIPLIER,
            attack_delay_ms: 500,
            defeat_delay_ms: 1000,
            level_up: LevelUpGains::default(),
        }
    }
}

impl CombatTuning {
    fn attack_delay(&self) -> Duration {
        Duration::milliseconds(self.attack_delay_ms.max(0))
    }

    fn defeat_delay(&self) -> Duration {
        Duration::milliseconds(self.defeat_delay_ms.max(0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerSlot {
    HeroIdle,
    EnemyIdle,
    EnemyRespawn,
}

/// Something that happened while timers were processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SessionEvent {
    HeroIdle,
    EnemyIdle,
    EnemyRespawned {
        defeated: String,
        spawned: Option<String>,
        experience_gained: u32,
        leveled_up: bool,
        bonus: Bonus,
    },
    /// The reward was applied to the run but the account service rejected it.
    BonusNotPersisted { reason: String },
}

pub struct CombatSession<R> {
    profile: HeroProfile,
    hero: Hero,
    hero_state: ActorState,
    enemy: Option<Enemy>,
    enemy_state: ActorState,
    pool: Vec<Enemy>,
    timers: TimerTable<TimerSlot>,
    /// Set when the hero fell in the exchange that defeated the enemy.
    run_reward_forfeit: bool,
    tuning: CombatTuning,
    rng: R,
}

impl<R: Rng> CombatSession<R> {
    /// Start a run against `pool`. The first enemy is picked uniformly.
    pub fn new(profile: HeroProfile, pool: Vec<Enemy>, tuning: CombatTuning, mut rng: R) -> Self {
        let enemy = pick_uniform(&pool, &mut rng).map(Enemy::spawned);
        Self {
            profile,
            hero: Hero::from_profile(&profile),
            hero_state: ActorState::Idle,
            enemy,
            enemy_state: ActorState::Idle,
            pool,
            timers: TimerTable::new(),
            run_reward_forfeit: false,
            tuning,
            rng,
        }
    }

    /// Start a run on a catalog level.
    pub fn for_level(
        catalog: &dyn EnemyCatalog,
        level_id: &str,
        profile: HeroProfile,
        tuning: CombatTuning,
        rng: R,
    ) -> Result<Self> {
        let pool = catalog.enemies_for_level(level_id)?;
        Ok(Self::new(profile, pool, tuning, rng))
    }

    pub fn hero(&self) -> &Hero {
        &self.hero
    }

    pub fn enemy(&self) -> Option<&Enemy> {
        self.enemy.as_ref()
    }

    pub fn hero_state(&self) -> ActorState {
        self.hero_state
    }

    pub fn enemy_state(&self) -> ActorState {
        self.enemy_state
    }

    pub fn profile(&self) -> &HeroProfile {
        &self.profile
    }

    pub fn tuning(&self) -> &CombatTuning {
        &self.tuning
    }

    /// When the next delayed transition is due, if any.
    pub fn next_deadline(&self) -> Option<DateTime<Utc>> {
        self.timers.next_deadline()
    }

    /// Resolve an answer against the current enemy.
    ///
    /// Returns `Ok(None)` without touching state when there is no enemy to
    /// fight (empty pool, or the last one is waiting to respawn).
    pub fn attack(&mut self, is_correct: bool, now: DateTime<Utc>) -> Result<Option<AttackOutcome>> {
        if self.hero_state == ActorState::Defeated {
            return Err(CoreError::validation("hero is defeated, start a new run"));
        }
        if self.enemy_state == ActorState::Defeated {
            return Ok(None);
        }
        let Some(enemy) = self.enemy.as_ref() else {
            return Ok(None);
        };

        let resolution =
            resolve_attack_with(&self.hero, enemy, is_correct, self.tuning.penalty_multiplier)?;
        let outcome = resolution.outcome;
        self.hero = resolution.hero;
        self.enemy = Some(resolution.enemy);

        if outcome.enemy_defeated {
            tracing::info!("enemy defeated");
            self.enemy_state = ActorState::Defeated;
            self.timers.cancel(TimerSlot::EnemyIdle);
            self.timers
                .schedule(TimerSlot::EnemyRespawn, now, self.tuning.defeat_delay());
        } else {
            self.enemy_state = ActorState::Attacking;
            self.timers
                .schedule(TimerSlot::EnemyIdle, now, self.tuning.attack_delay());
        }

        if outcome.hero_defeated {
            tracing::info!(level = self.hero.level, "hero defeated");
            // decided now, the respawn timer may fire after a reset
            self.run_reward_forfeit |= outcome.enemy_defeated;
            self.hero_state = ActorState::Defeated;
            self.timers.cancel(TimerSlot::HeroIdle);
        } else if is_correct {
            self.hero_state = ActorState::Attacking;
            self.timers
                .schedule(TimerSlot::HeroIdle, now, self.tuning.attack_delay());
        }

        Ok(Some(outcome))
    }

    /// Fire every delayed transition due at `now`.
    pub fn tick(&mut self, now: DateTime<Utc>, gateway: &mut dyn BonusGateway) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        for slot in self.timers.drain_due(now) {
            match slot {
                TimerSlot::HeroIdle => {
                    if self.hero_state == ActorState::Attacking {
                        self.hero_state = ActorState::Idle;
                        events.push(SessionEvent::HeroIdle);
                    }
                }
                TimerSlot::EnemyIdle => {
                    if self.enemy_state == ActorState::Attacking {
                        self.enemy_state = ActorState::Idle;
                        events.push(SessionEvent::EnemyIdle);
                    }
                }
                TimerSlot::EnemyRespawn => self.finish_enemy_defeat(gateway, &mut events),
            }
        }
        events
    }

    /// Rewards for the defeated enemy, then the next one from the pool.
    fn finish_enemy_defeat(&mut self, gateway: &mut dyn BonusGateway, events: &mut Vec<SessionEvent>) {
        let Some(defeated) = self.enemy.take() else {
            self.enemy_state = ActorState::Idle;
            return;
        };

        let mut experience_gained = 0;
        let mut leveled_up = false;
        // a fallen hero keeps no run rewards, the permanent bonus is still stored
        if !std::mem::take(&mut self.run_reward_forfeit) {
            experience_gained = defeated.experience;
            leveled_up = self
                .hero
                .gain_experience(defeated.experience, &self.tuning.level_up);
            self.hero.apply_bonus(&defeated.bonus);
        }

        let request = BonusRequest {
            kind: defeated.bonus.kind,
            amount: defeated.bonus.amount,
            coins_drop: defeated.coins_drop,
        };
        match gateway.add_hero_bonus(&request) {
            Ok(profile) => self.profile = profile,
            Err(err) => {
                tracing::warn!(%err, enemy = %defeated.id, "enemy bonus was not persisted");
                events.push(SessionEvent::BonusNotPersisted {
                    reason: err.to_string(),
                });
            }
        }

        self.enemy = pick_weighted(&self.pool, &mut self.rng).map(Enemy::spawned);
        self.enemy_state = ActorState::Idle;
        tracing::debug!(
            defeated = %defeated.id,
            spawned = ?self.enemy.as_ref().map(|e| e.id.as_str()),
            "enemy respawned"
        );

        events.push(SessionEvent::EnemyRespawned {
            defeated: defeated.id,
            spawned: self.enemy.as_ref().map(|e| e.id.clone()),
            experience_gained,
            leveled_up,
            bonus: defeated.bonus,
        });
    }

    /// Start the run over from the persisted profile: level 1, full health.
    ///
    /// The current enemy stays and is healed, unless it is waiting to respawn.
    pub fn reset_run(&mut self) {
        self.hero = Hero::from_profile(&self.profile);
        self.hero_state = ActorState::Idle;
        self.timers.cancel(TimerSlot::HeroIdle);
        if self.enemy_state != ActorState::Defeated {
            if let Some(enemy) = self.enemy.as_mut() {
                enemy.current_health = enemy.max_health;
            }
            self.enemy_state = ActorState::Idle;
            self.timers.cancel(TimerSlot::EnemyIdle);
        }
    }

    /// Explicit "new adventure": reset the run and face a fresh enemy.
    ///
    /// An enemy still waiting to respawn is settled first: its bonus goes to
    /// `gateway` and its replacement becomes the first enemy of the new run.
    /// The old run's experience is dropped.
    pub fn new_adventure(&mut self, gateway: &mut dyn BonusGateway) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        if self.timers.cancel(TimerSlot::EnemyRespawn) {
            self.run_reward_forfeit = true;
            self.finish_enemy_defeat(gateway, &mut events);
        } else {
            self.enemy = pick_uniform(&self.pool, &mut self.rng).map(Enemy::spawned);
            self.enemy_state = ActorState::Idle;
        }
        self.timers.clear();
        self.run_reward_forfeit = false;
        self.hero = Hero::from_profile(&self.profile);
        self.hero_state = ActorState::Idle;
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BonusKind;
    use pretty_assertions::assert_eq;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct RecordingGateway {
        profile: HeroProfile,
        requests: Vec<BonusRequest>,
        fail: bool,
    }

    impl RecordingGateway {
        fn new() -> Self {
            Self {
                profile: HeroProfile::default(),
                requests: Vec::new(),
                fail: false,
            }
        }
    }

    impl BonusGateway for RecordingGateway {
        fn add_hero_bonus(&mut self, request: &BonusRequest) -> Result<HeroProfile> {
            self.requests.push(*request);
            if self.fail {
                return Err(CoreError::not_found("user"));
            }
            self.profile.apply_bonus(&request.bonus());
            Ok(self.profile)
        }
    }

    fn t(ms: i64) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
            + Duration::milliseconds(ms)
    }

    fn goblin(max_health: f64, attack_damage: f64) -> Enemy {
        Enemy {
            id: "goblin".to_string(),
            name: "Goblin".to_string(),
            max_health,
            current_health: max_health,
            attack_damage,
            defense: 0.0,
            experience: 100,
            bonus: Bonus {
                kind: BonusKind::Attack,
                amount: 2.0,
            },
            spawn_weight: 1,
            coins_drop: 4,
        }
    }

    fn session(pool: Vec<Enemy>) -> CombatSession<StdRng> {
        CombatSession::new(
            HeroProfile::default(),
            pool,
            CombatTuning::default(),
            StdRng::seed_from_u64(11),
        )
    }

    #[test]
    fn correct_answer_animates_both_then_returns_to_idle() {
        let mut s = session(vec![goblin(100.0, 5.0)]);
        let mut gw = RecordingGateway::new();

        let outcome = s.attack(true, t(0)).unwrap().unwrap();
        assert_eq!(outcome.damage_dealt, 10.0);
        assert_eq!(s.hero_state(), ActorState::Attacking);
        assert_eq!(s.enemy_state(), ActorState::Attacking);

        let events = s.tick(t(500), &mut gw);
        assert_eq!(events.len(), 2);
        assert_eq!(s.hero_state(), ActorState::Idle);
        assert_eq!(s.enemy_state(), ActorState::Idle);
    }

    #[test]
    fn wrong_answer_keeps_hero_idle() {
        let mut s = session(vec![goblin(100.0, 5.0)]);
        s.attack(false, t(0)).unwrap();
        assert_eq!(s.hero_state(), ActorState::Idle);
        assert_eq!(s.enemy_state(), ActorState::Attacking);
        assert_eq!(s.enemy().unwrap().current_health, 100.0);
    }

    #[test]
    fn new_attack_replaces_stale_idle_timer() {
        let mut s = session(vec![goblin(100.0, 5.0)]);
        let mut gw = RecordingGateway::new();

        s.attack(true, t(0)).unwrap();
        s.attack(true, t(400)).unwrap();

        // first attack's timer would have fired at 500
        assert!(s.tick(t(600), &mut gw).is_empty());
        assert_eq!(s.hero_state(), ActorState::Attacking);

        s.tick(t(900), &mut gw);
        assert_eq!(s.hero_state(), ActorState::Idle);
    }

    #[test]
    fn enemy_defeat_rewards_and_respawns_after_delay() {
        let mut s = session(vec![goblin(10.0, 0.0)]);
        let mut gw = RecordingGateway::new();

        let outcome = s.attack(true, t(0)).unwrap().unwrap();
        assert!(outcome.enemy_defeated);
        assert_eq!(s.enemy_state(), ActorState::Defeated);

        // no fighting a corpse
        assert_eq!(s.attack(true, t(100)).unwrap(), None);

        assert!(s
            .tick(t(999), &mut gw)
            .iter()
            .all(|e| !matches!(e, SessionEvent::EnemyRespawned { .. })));

        let events = s.tick(t(1000), &mut gw);
        assert!(events.contains(&SessionEvent::EnemyRespawned {
            defeated: "goblin".to_string(),
            spawned: Some("goblin".to_string()),
            experience_gained: 100,
            leveled_up: true,
            bonus: Bonus {
                kind: BonusKind::Attack,
                amount: 2.0
            },
        }));

        assert_eq!(s.enemy_state(), ActorState::Idle);
        assert_eq!(s.enemy().unwrap().current_health, 10.0);
        assert_eq!(s.hero().level, 2);
        // 10 base + 2 level-up + 2 bonus
        assert_eq!(s.hero().attack_damage, 14.0);
        assert_eq!(gw.requests.len(), 1);
        assert_eq!(gw.requests[0].coins_drop, 4);
        assert_eq!(s.profile().attack_damage, 12.0);
    }

    #[test]
    fn failed_bonus_persistence_is_surfaced() {
        let mut s = session(vec![goblin(10.0, 0.0)]);
        let mut gw = RecordingGateway::new();
        gw.fail = true;

        s.attack(true, t(0)).unwrap();
        let events = s.tick(t(1000), &mut gw);

        assert!(events
            .iter()
            .any(|e| matches!(e, SessionEvent::BonusNotPersisted { .. })));
        // run state still advanced
        assert_eq!(s.hero().level, 2);
        assert_eq!(s.profile().attack_damage, HeroProfile::default().attack_damage);
    }

    #[test]
    fn lethal_wrong_answer_defeats_hero() {
        let mut s = session(vec![goblin(100.0, 5.0)]);
        s.hero.current_health = 3.0;
        s.hero.regeneration_rate = 5.0;

        // enemy damage 3, penalty 4.5
        let outcome = s.attack(false, t(0)).unwrap().unwrap();
        assert!(outcome.hero_defeated);
        assert_eq!(s.hero().current_health, 0.0);
        assert_eq!(s.hero_state(), ActorState::Defeated);

        let err = s.attack(true, t(10)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[test]
    fn reset_run_restores_level_and_health() {
        let mut s = session(vec![goblin(10.0, 0.0)]);
        let mut gw = RecordingGateway::new();
        s.attack(true, t(0)).unwrap();
        s.tick(t(1000), &mut gw);
        assert_eq!(s.hero().level, 2);

        s.hero.current_health = 0.0;
        s.hero_state = ActorState::Defeated;
        s.reset_run();

        assert_eq!(s.hero_state(), ActorState::Idle);
        assert_eq!(s.hero().level, 1);
        assert_eq!(s.hero().experience, 0);
        assert_eq!(s.hero().current_health, s.hero().max_health);
        // permanent bonus from the profile survives the reset
        assert_eq!(s.hero().attack_damage, 12.0);
    }

    #[test]
    fn empty_pool_is_a_no_op() {
        let mut s = session(Vec::new());
        let before = s.hero().clone();
        assert_eq!(s.attack(true, t(0)).unwrap(), None);
        assert_eq!(s.hero(), &before);
        assert_eq!(s.hero_state(), ActorState::Idle);
        assert!(s.next_deadline().is_none());
    }

    #[test]
    fn new_adventure_clears_pending_timers() {
        let mut s = session(vec![goblin(100.0, 5.0)]);
        let mut gw = RecordingGateway::new();
        s.attack(true, t(0)).unwrap();
        assert!(s.new_adventure(&mut gw).is_empty());
        assert!(s.next_deadline().is_none());
        assert_eq!(s.hero_state(), ActorState::Idle);
        assert_eq!(s.enemy().unwrap().current_health, 100.0);
        assert!(gw.requests.is_empty());
    }

    #[test]
    fn mutual_defeat_reward_is_not_collected_after_reset() {
        // one correct answer kills both sides
        let mut s = session(vec![goblin(10.0, 200.0)]);
        let mut gw = RecordingGateway::new();

        let outcome = s.attack(true, t(0)).unwrap().unwrap();
        assert!(outcome.enemy_defeated && outcome.hero_defeated);

        s.reset_run();
        let events = s.tick(t(1000), &mut gw);

        assert!(events.contains(&SessionEvent::EnemyRespawned {
            defeated: "goblin".to_string(),
            spawned: Some("goblin".to_string()),
            experience_gained: 0,
            leveled_up: false,
            bonus: Bonus {
                kind: BonusKind::Attack,
                amount: 2.0
            },
        }));
        assert_eq!(s.hero().level, 1);
        assert_eq!(s.hero().experience, 0);
        // the permanent bonus still reaches the account and the new run
        assert_eq!(gw.requests.len(), 1);
        assert_eq!(s.profile().attack_damage, 12.0);
        assert_eq!(s.hero().attack_damage, 10.0);

        // the next kill pays out again
        s.hero.defense = 500.0;
        s.attack(true, t(2000)).unwrap();
        let events = s.tick(t(3000), &mut gw);
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::EnemyRespawned { experience_gained: 100, .. }
        )));
    }

    #[test]
    fn new_adventure_settles_pending_respawn() {
        let mut s = session(vec![goblin(10.0, 0.0)]);
        let mut gw = RecordingGateway::new();

        s.attack(true, t(0)).unwrap();
        assert_eq!(s.enemy_state(), ActorState::Defeated);

        let events = s.new_adventure(&mut gw);
        assert_eq!(gw.requests.len(), 1);
        assert_eq!(gw.requests[0].coins_drop, 4);
        assert!(events.iter().any(|e| matches!(
            e,
            SessionEvent::EnemyRespawned { experience_gained: 0, leveled_up: false, .. }
        )));

        assert_eq!(s.hero().level, 1);
        assert_eq!(s.profile().attack_damage, 12.0);
        assert_eq!(s.enemy_state(), ActorState::Idle);
        assert_eq!(s.enemy().unwrap().current_health, 10.0);

        // nothing left to fire from the old run
        assert!(s.next_deadline().is_none());
        assert!(s.tick(t(5000), &mut gw).is_empty());
        assert_eq!(gw.requests.len(), 1);
    }
}
