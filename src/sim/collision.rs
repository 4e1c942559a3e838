//! Circle collision detection
//!
//! Every collidable actor is a circle. Bullets are paired with enemies by a
//! brute-force O(bullets × enemies) scan; both lists stay in the tens.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::Actor;
use super::bullet::Bullet;
use super::enemy::Enemy;

/// A collision circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn collides(&self, other: &Circle) -> bool {
        circles_collide(self, other)
    }
}

/// Touching circles collide (`distance <= r1 + r2`). A zero radius never
/// collides.
#[inline]
pub fn circles_collide(a: &Circle, b: &Circle) -> bool {
    if a.radius <= 0.0 || b.radius <= 0.0 {
        return false;
    }
    a.center.distance(b.center) <= a.radius + b.radius
}

/// A bullet that struck an enemy this tick
#[derive(Debug, Clone)]
pub struct BulletHit {
    /// The bullet, already removed from its list
    pub bullet: Bullet,
    /// Index of the struck enemy in the enemy list
    pub enemy: usize,
    /// Whether the hit destroyed the enemy
    pub destroyed: bool,
}

/// Pair each bullet with the first live enemy it touches.
///
/// The enemy takes `bullet.power()` damage and the bullet is removed from
/// `bullets` whatever the outcome, so a bullet hits at most one enemy per
/// tick. Bullets that hit nothing keep their order. Area damage is left to
/// the caller through `bullet.effect_radius()`.
pub fn detect_bullet_hits(bullets: &mut Vec<Bullet>, enemies: &mut [Enemy]) -> Vec<BulletHit> {
    let mut hits = Vec::new();
    let mut missed = Vec::with_capacity(bullets.len());

    for bullet in bullets.drain(..) {
        let circle = bullet.body().circle();
        match first_contact(&circle, enemies) {
            Some(index) => {
                let destroyed = enemies[index].hit(bullet.power());
                hits.push(BulletHit {
                    bullet,
                    enemy: index,
                    destroyed,
                });
            }
            None => missed.push(bullet),
        }
    }

    *bullets = missed;
    hits
}

/// Index of the first live actor touching `circle`
pub fn first_contact<A: Actor>(circle: &Circle, actors: &[A]) -> Option<usize> {
    actors
        .iter()
        .position(|actor| actor.body().alive && circle.collides(&actor.body().circle()))
}

/// Indices of live actors whose circle reaches within `radius` of `center`
pub fn within_blast<A: Actor>(center: Vec2, radius: f32, actors: &[A]) -> Vec<usize> {
    actors
        .iter()
        .enumerate()
        .filter(|(_, actor)| {
            let body = actor.body();
            body.alive && center.distance(body.position) <= radius + body.radius
        })
        .map(|(index, _)| index)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::BulletKind;
    use crate::sim::enemy::EnemyKind;
    use proptest::prelude::*;

    fn bullet_at(x: f32, y: f32) -> Bullet {
        Bullet::new(BulletKind::ArenaShot, Vec2::new(x, y), Vec2::new(1.0, 0.0), 0.0)
    }

    fn enemy_at(kind: EnemyKind, x: f32, y: f32) -> Enemy {
        Enemy::new(kind, Vec2::new(x, y), Vec2::ZERO)
    }

    #[test]
    fn test_bullet_overlapping_enemy() {
        let bullet = Circle::new(Vec2::new(100.0, 100.0), 12.0);
        let near = Circle::new(Vec2::new(108.0, 100.0), 22.0);
        let far = Circle::new(Vec2::new(150.0, 100.0), 22.0);
        assert!(bullet.collides(&near));
        assert!(!bullet.collides(&far));
    }

    #[test]
    fn test_touching_counts_as_collision() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 10.0);
        let b = Circle::new(Vec2::new(30.0, 0.0), 20.0);
        assert!(circles_collide(&a, &b));
    }

    #[test]
    fn test_zero_radius_never_collides() {
        let a = Circle::new(Vec2::new(0.0, 0.0), 0.0);
        let b = Circle::new(Vec2::new(0.0, 0.0), 20.0);
        assert!(!circles_collide(&a, &b));
    }

    #[test]
    fn test_bullet_hits_one_enemy_only() {
        let mut bullets = vec![bullet_at(100.0, 100.0)];
        let mut enemies = vec![
            enemy_at(EnemyKind::Dumbo, 105.0, 100.0),
            enemy_at(EnemyKind::Dumbo, 95.0, 100.0),
        ];
        let hits = detect_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].enemy, 0);
        assert!(hits[0].destroyed);
        assert!(bullets.is_empty());
        assert!(enemies[1].body().alive);
    }

    #[test]
    fn test_missed_bullets_keep_order() {
        let mut bullets = vec![
            bullet_at(0.0, 0.0),
            bullet_at(500.0, 500.0),
            bullet_at(1000.0, 0.0),
        ];
        let mut enemies = vec![enemy_at(EnemyKind::Borg, 500.0, 520.0)];
        let hits = detect_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(hits.len(), 1);
        assert!(!hits[0].destroyed);
        assert_eq!(bullets.len(), 2);
        assert_eq!(bullets[0].body().position.x, 0.0);
        assert_eq!(bullets[1].body().position.x, 1000.0);
    }

    #[test]
    fn test_dead_enemy_is_not_a_target() {
        let mut bullets = vec![bullet_at(100.0, 100.0), bullet_at(100.0, 100.0)];
        let mut enemies = vec![enemy_at(EnemyKind::Dumbo, 100.0, 100.0)];
        let hits = detect_bullet_hits(&mut bullets, &mut enemies);
        assert_eq!(hits.len(), 1);
        assert_eq!(bullets.len(), 1);
    }

    #[test]
    fn test_within_blast_includes_enemy_radius() {
        let enemies = vec![
            enemy_at(EnemyKind::Dumbo, 60.0, 0.0),
            enemy_at(EnemyKind::Dumbo, 200.0, 0.0),
        ];
        let inside = within_blast(Vec2::ZERO, 45.0, &enemies);
        assert_eq!(inside, vec![0]);
    }

    proptest! {
        #[test]
        fn collision_iff_distance_within_radii(
            ax in -500.0f32..500.0,
            ay in -500.0f32..500.0,
            bx in -500.0f32..500.0,
            by in -500.0f32..500.0,
            r1 in 0.1f32..100.0,
            r2 in 0.1f32..100.0,
        ) {
            let a = Circle::new(Vec2::new(ax, ay), r1);
            let b = Circle::new(Vec2::new(bx, by), r2);
            let d = a.center.distance(b.center);
            prop_assert_eq!(circles_collide(&a, &b), d <= r1 + r2);
            prop_assert_eq!(circles_collide(&a, &b), circles_collide(&b, &a));
        }
    }
}
