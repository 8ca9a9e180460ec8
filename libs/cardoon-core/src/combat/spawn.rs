//! Enemy selection from a level's pool.

use rand::Rng;

use crate::types::Enemy;

/// Pick any enemy with equal probability. Used for the first spawn of a run.
pub fn pick_uniform<'a, R: Rng + ?Sized>(pool: &'a [Enemy], rng: &mut R) -> Option<&'a Enemy> {
    if pool.is_empty() {
        return None;
    }
    pool.get(rng.gen_range(0..pool.len()))
}

/// Cumulative-weight roulette over `spawn_weight`.
///
/// Falls back to [`pick_uniform`] when every weight is zero.
pub fn pick_weighted<'a, R: Rng + ?Sized>(pool: &'a [Enemy], rng: &mut R) -> Option<&'a Enemy> {
    let total: u64 = pool.iter().map(|e| u64::from(e.spawn_weight)).sum();
    if total == 0 {
        return pick_uniform(pool, rng);
    }

    let roll = rng.gen_range(0..total);
    let mut cumulative = 0u64;
    for enemy in pool {
        cumulative += u64::from(enemy.spawn_weight);
        if roll < cumulative {
            return Some(enemy);
        }
    }
    pool.last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Bonus, BonusKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn enemy(id: &str, spawn_weight: u32) -> Enemy {
        Enemy {
            id: id.to_string(),
            name: id.to_string(),
            max_health: 10.0,
            current_health: 10.0,
            attack_damage: 1.0,
            defense: 0.0,
            experience: 5,
            bonus: Bonus {
                kind: BonusKind::Attack,
                amount: 1.0,
            },
            spawn_weight,
            coins_drop: 0,
        }
    }

    #[test]
    fn empty_pool_yields_nothing() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_uniform(&[], &mut rng).is_none());
        assert!(pick_weighted(&[], &mut rng).is_none());
    }

    #[test]
    fn weighted_draws_follow_weights() {
        let pool = vec![enemy("rare", 10), enemy("common", 90)];
        let mut rng = StdRng::seed_from_u64(0xCA4D);
        let draws = 10_000;
        let common = (0..draws)
            .filter(|_| pick_weighted(&pool, &mut rng).map(|e| e.id.as_str()) == Some("common"))
            .count();
        let share = common as f64 / draws as f64;
        assert!((share - 0.9).abs() <= 0.03, "common share {share}");
    }

    #[test]
    fn zero_weight_enemy_is_never_weighted_pick() {
        let pool = vec![enemy("never", 0), enemy("always", 5)];
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..500 {
            assert_eq!(pick_weighted(&pool, &mut rng).unwrap().id, "always");
        }
    }

    #[test]
    fn all_zero_weights_fall_back_to_uniform() {
        let pool = vec![enemy("a", 0), enemy("b", 0)];
        let mut rng = StdRng::seed_from_u64(9);
        let mut seen_a = false;
        let mut seen_b = false;
        for _ in 0..200 {
            match pick_weighted(&pool, &mut rng).unwrap().id.as_str() {
                "a" => seen_a = true,
                _ => seen_b = true,
            }
        }
        assert!(seen_a && seen_b);
    }
}
