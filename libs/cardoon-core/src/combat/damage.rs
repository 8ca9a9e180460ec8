//! Damage calculation and per-attack resolution.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::{Enemy, Hero};

/// Multiplier applied to enemy damage when the hero answers wrong.
pub const PENALTY_MULTIPLIER: f64 = 1.5;

/// Damage the hero deals to the enemy.
///
/// ```text
/// max(0, hero.attack_damage - enemy.defense)
/// ```
pub fn calculate_hero_damage(hero: &Hero, enemy: &Enemy) -> f64 {
    (hero.attack_damage - enemy.defense).max(0.0)
}

/// Damage the enemy deals to the hero on a normal exchange.
pub fn calculate_enemy_damage(enemy: &Enemy, hero: &Hero) -> f64 {
    (enemy.attack_damage - hero.defense).max(0.0)
}

/// Damage the hero takes for a wrong answer.
pub fn calculate_penalty_damage(enemy: &Enemy, hero: &Hero) -> f64 {
    PENALTY_MULTIPLIER * calculate_enemy_damage(enemy, hero)
}

/// Apply damage to current health.
///
/// # Returns
///
/// New health value (clamped to 0)
pub fn apply_damage(current_health: f64, damage: f64) -> f64 {
    (current_health - damage.max(0.0)).max(0.0)
}

/// Heal the hero by its regeneration rate, capped at max health.
///
/// # Returns
///
/// Amount of health actually restored
pub fn apply_regeneration(hero: &mut Hero) -> f64 {
    let before = hero.current_health;
    let healed = (hero.current_health + hero.regeneration_rate.max(0.0)).min(hero.max_health);
    hero.current_health = healed.max(before);
    hero.current_health - before
}

/// Numbers produced by one attack exchange.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackOutcome {
    pub is_correct: bool,
    pub damage_dealt: f64,
    pub damage_taken: f64,
    pub regenerated: f64,
    pub enemy_defeated: bool,
    pub hero_defeated: bool,
}

/// Hero and enemy after an exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct AttackResolution {
    pub hero: Hero,
    pub enemy: Enemy,
    pub outcome: AttackOutcome,
}

/// Resolve one attack exchange.
///
/// A correct answer trades blows: the enemy takes hero damage and the hero
/// takes enemy damage. A wrong answer leaves the enemy untouched and the hero
/// takes penalty damage. A surviving hero then regenerates.
pub fn resolve_attack(hero: &Hero, enemy: &Enemy, is_correct: bool) -> Result<AttackResolution> {
    resolve_attack_with(hero, enemy, is_correct, PENALTY_MULTIPLIER)
}

/// [`resolve_attack`] with an explicit wrong-answer multiplier.
pub fn resolve_attack_with(
    hero: &Hero,
    enemy: &Enemy,
    is_correct: bool,
    penalty_multiplier: f64,
) -> Result<AttackResolution> {
    let mut hero = hero.clone();
    let mut enemy = enemy.clone();

    let (damage_dealt, damage_taken) = if is_correct {
        (
            calculate_hero_damage(&hero, &enemy),
            calculate_enemy_damage(&enemy, &hero),
        )
    } else {
        (0.0, penalty_multiplier * calculate_enemy_damage(&enemy, &hero))
    };

    if is_correct {
        enemy.current_health = apply_damage(enemy.current_health, damage_dealt);
    }
    hero.current_health = apply_damage(hero.current_health, damage_taken);

    // No healing for a hero that fell this turn.
    let regenerated = if hero.is_defeated() {
        0.0
    } else {
        apply_regeneration(&mut hero)
    };

    if let Err(err) = hero.check_bounds().and_then(|_| enemy.check_bounds()) {
        tracing::error!(%err, "attack resolution produced out-of-bounds state");
        return Err(err);
    }

    let outcome = AttackOutcome {
        is_correct,
        damage_dealt,
        damage_taken,
        regenerated,
        enemy_defeated: enemy.is_defeated(),
        hero_defeated: hero.is_defeated(),
    };

    Ok(AttackResolution {
        hero,
        enemy,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::types::{Bonus, BonusKind};
    use pretty_assertions::assert_eq;

    fn hero(attack_damage: f64, defense: f64) -> Hero {
        Hero {
            attack_damage,
            defense,
            regeneration_rate: 0.0,
            ..Hero::default()
        }
    }

    fn enemy(attack_damage: f64, defense: f64, health: f64) -> Enemy {
        Enemy {
            id: "slime".to_string(),
            name: "Slime".to_string(),
            max_health: health,
            current_health: health,
            attack_damage,
            defense,
            experience: 10,
            bonus: Bonus {
                kind: BonusKind::Attack,
                amount: 1.0,
            },
            spawn_weight: 1,
            coins_drop: 0,
        }
    }

    #[test]
    fn damage_formulas_match_reference_numbers() {
        let h = hero(5.0, 2.0);
        let e = enemy(6.0, 1.0, 20.0);
        assert_eq!(calculate_hero_damage(&h, &e), 4.0);
        assert_eq!(calculate_enemy_damage(&e, &h), 4.0);
        assert_eq!(calculate_penalty_damage(&e, &h), 6.0);
    }

    #[test]
    fn damage_is_never_negative() {
        let h = hero(1.0, 50.0);
        let e = enemy(3.0, 10.0, 20.0);
        assert_eq!(calculate_hero_damage(&h, &e), 0.0);
        assert_eq!(calculate_enemy_damage(&e, &h), 0.0);
        assert_eq!(calculate_penalty_damage(&e, &h), 0.0);
    }

    #[test]
    fn penalty_is_exactly_one_and_a_half() {
        for (atk, def) in [(6.0, 2.0), (7.0, 0.0), (13.0, 4.0), (100.0, 1.0)] {
            let h = hero(1.0, def);
            let e = enemy(atk, 0.0, 20.0);
            assert_eq!(
                calculate_penalty_damage(&e, &h),
                1.5 * calculate_enemy_damage(&e, &h)
            );
        }
    }

    #[test]
    fn correct_answer_trades_damage() {
        let h = hero(5.0, 2.0);
        let e = enemy(6.0, 1.0, 20.0);
        let res = resolve_attack(&h, &e, true).unwrap();
        assert_eq!(res.enemy.current_health, 16.0);
        assert_eq!(res.hero.current_health, 96.0);
        assert_eq!(res.outcome.damage_dealt, 4.0);
        assert_eq!(res.outcome.damage_taken, 4.0);
    }

    #[test]
    fn wrong_answer_only_hurts_hero() {
        let h = hero(5.0, 2.0);
        let e = enemy(6.0, 1.0, 20.0);
        let res = resolve_attack(&h, &e, false).unwrap();
        assert_eq!(res.enemy.current_health, 20.0);
        assert_eq!(res.hero.current_health, 94.0);
        assert_eq!(res.outcome.damage_dealt, 0.0);
    }

    #[test]
    fn wrong_answers_never_reduce_enemy_health() {
        let mut h = hero(50.0, 0.0);
        h.max_health = 10_000.0;
        h.current_health = 10_000.0;
        let mut e = enemy(1.0, 0.0, 30.0);
        for _ in 0..50 {
            let res = resolve_attack(&h, &e, false).unwrap();
            assert_eq!(res.enemy.current_health, 30.0);
            h = res.hero;
            e = res.enemy;
        }
    }

    #[test]
    fn lethal_penalty_skips_regeneration() {
        let mut h = hero(5.0, 2.0);
        h.current_health = 3.0;
        h.regeneration_rate = 5.0;
        // enemy damage 3, penalty 4.5
        let e = enemy(5.0, 1.0, 20.0);
        let res = resolve_attack(&h, &e, false).unwrap();
        assert_eq!(res.outcome.damage_taken, 4.5);
        assert_eq!(res.hero.current_health, 0.0);
        assert_eq!(res.outcome.regenerated, 0.0);
        assert!(res.outcome.hero_defeated);
    }

    #[test]
    fn surviving_hero_regenerates_up_to_max() {
        let mut h = hero(5.0, 2.0);
        h.current_health = 99.0;
        h.regeneration_rate = 10.0;
        let e = enemy(3.0, 1.0, 20.0);
        let res = resolve_attack(&h, &e, true).unwrap();
        // 99 - 1 + 10 capped at 100
        assert_eq!(res.hero.current_health, 100.0);
        assert_eq!(res.outcome.regenerated, 2.0);
    }

    #[test]
    fn regeneration_stays_within_bounds() {
        for (current, rate) in [(0.5, 3.0), (50.0, 0.0), (99.9, 1.0), (100.0, 5.0)] {
            let mut h = hero(1.0, 1.0);
            h.current_health = current;
            h.regeneration_rate = rate;
            apply_regeneration(&mut h);
            assert!(h.current_health <= h.max_health);
            assert!(h.current_health >= current);
        }
    }

    #[test]
    fn enemy_health_floors_at_zero() {
        let h = hero(50.0, 2.0);
        let e = enemy(1.0, 0.0, 20.0);
        let res = resolve_attack(&h, &e, true).unwrap();
        assert_eq!(res.enemy.current_health, 0.0);
        assert!(res.outcome.enemy_defeated);
    }

    #[test]
    fn corrupted_input_is_reported() {
        let mut h = hero(5.0, 2.0);
        h.current_health = h.max_health + 50.0;
        h.regeneration_rate = 0.0;
        let e = enemy(0.0, 0.0, 20.0);
        let err = resolve_attack(&h, &e, true).unwrap_err();
        assert!(matches!(err, CoreError::InconsistentState(_)));
    }
}
