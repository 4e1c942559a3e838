//! World space and boundary policies
//!
//! The world is a square of side `size` with a square view window that the
//! renderer maps onto the screen. What happens to an actor that leaves the
//! square is a per-scene [`BoundaryPolicy`]:
//! - [`ToroidalWrap`]: asteroid field, actors re-enter from the opposite edge
//! - [`BoundedReflect`]: arena, actors bounce and bullets dissipate

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole};
use super::vector::Kinematics;
use crate::consts::{PLAYER_WALL_DAMPING, REFLECT_DAMPING, VIEW_EDGE_FRACTION};
use crate::rad_to_deg;

/// Coordinate space and visible window of a scene
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// Side length of the square world
    pub size: f32,
    pub view_x: f32,
    pub view_y: f32,
    /// Side length of the visible window in world units
    pub view_size: f32,
    /// Screen pixels per world unit
    pub scale: f32,
}

impl World {
    /// World with the view centred
    pub fn new(size: f32, view_size: f32, screen_width: f32) -> Self {
        let view = size / 2.0 - view_size / 2.0;
        Self {
            size,
            view_x: view,
            view_y: view,
            view_size,
            scale: screen_width / view_size,
        }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }

    /// Re-centre the view on `target` unless it is near a world edge
    pub fn follow(&mut self, target: Vec2) {
        let edge = self.view_size * VIEW_EDGE_FRACTION;
        if target.x > edge && target.x < self.size - edge {
            self.view_x = target.x - self.view_size * 0.5;
        }
        if target.y > edge && target.y < self.size - edge {
            self.view_y = target.y - self.view_size * 0.5;
        }
    }

    /// Screen position of a world point, or `None` when a circle of `radius`
    /// around it is entirely outside the view
    pub fn world_to_screen(&self, position: Vec2, radius: f32) -> Option<Vec2> {
        let view = position - Vec2::new(self.view_x, self.view_y);
        let visible = view.x < self.view_size + radius
            && view.y < self.view_size + radius
            && view.x > -radius
            && view.y > -radius;
        visible.then(|| view * self.scale)
    }
}

/// Result of applying a boundary policy to one actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundaryOutcome {
    /// Actor stays in its list
    Keep,
    /// Actor leaves play; an impact effect belongs at `position`
    Dissipate { position: Vec2, vector: Vec2 },
}

/// Rule for actors that cross the world edge after integration
pub trait BoundaryPolicy: fmt::Debug {
    fn name(&self) -> &'static str;

    /// Correct `actor` in place. `bounce_player_bullets` lets player bullets
    /// reflect where they would otherwise dissipate.
    fn apply(
        &self,
        world: &World,
        actor: &mut dyn Actor,
        bounce_player_bullets: bool,
    ) -> BoundaryOutcome;
}

/// Teleport to the opposite edge, independently per axis. Velocity is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToroidalWrap;

impl ToroidalWrap {
    #[inline]
    fn wrap(value: f32, extent: f32) -> f32 {
        if value >= extent {
            0.0
        } else if value < 0.0 {
            extent - 1.0
        } else {
            value
        }
    }
}

impl BoundaryPolicy for ToroidalWrap {
    fn name(&self) -> &'static str {
        "toroidal-wrap"
    }

    fn apply(&self, world: &World, actor: &mut dyn Actor, _bounce: bool) -> BoundaryOutcome {
        let body = actor.body_mut();
        body.position.x = Self::wrap(body.position.x, world.size);
        body.position.y = Self::wrap(body.position.y, world.size);
        BoundaryOutcome::Keep
    }
}

/// Arena walls.
///
/// The player reverses at 75% speed and takes one corrective step. Bullets
/// dissipate at the clamp point. Everything else is clamped and mirrored off
/// the wall at 90% speed, turning its heading with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundedReflect;

impl BoundedReflect {
    fn reflect(actor: &mut dyn Actor, axis: Vec2) {
        let body = actor.body_mut();
        let h = body.vector.theta_to2(axis);
        body.vector.rotate_by(h * 2.0);
        body.vector *= REFLECT_DAMPING;
        body.position += body.vector;
        if let Some(heading) = actor.heading_mut() {
            *heading += rad_to_deg(h * 2.0);
        }
    }
}

impl BoundaryPolicy for BoundedReflect {
    fn name(&self) -> &'static str {
        "bounded-reflect"
    }

    fn apply(
        &self,
        world: &World,
        actor: &mut dyn Actor,
        bounce_player_bullets: bool,
    ) -> BoundaryOutcome {
        let size = world.size;
        let role = actor.role();

        if role == ActorRole::Player {
            let body = actor.body_mut();
            let p = body.position;
            if p.x >= size || p.x < 0.0 || p.y >= size || p.y < 0.0 {
                body.vector.invert();
                body.vector *= PLAYER_WALL_DAMPING;
                body.position += body.vector;
            }
            return BoundaryOutcome::Keep;
        }

        let body = actor.body_mut();
        let mut bounce_x = false;
        let mut bounce_y = false;
        if body.position.x >= size {
            body.position.x = size;
            bounce_x = true;
        } else if body.position.x < 0.0 {
            body.position.x = 0.0;
            bounce_x = true;
        }
        if body.position.y >= size {
            body.position.y = size;
            bounce_y = true;
        } else if body.position.y < 0.0 {
            body.position.y = 0.0;
            bounce_y = true;
        }
        if !bounce_x && !bounce_y {
            return BoundaryOutcome::Keep;
        }

        let dissipates = match role {
            ActorRole::PlayerBullet => !bounce_player_bullets,
            ActorRole::EnemyBullet => true,
            _ => false,
        };
        if dissipates {
            return BoundaryOutcome::Dissipate {
                position: body.position,
                vector: body.vector * 0.5,
            };
        }

        if bounce_x {
            Self::reflect(actor, Vec2::Y);
        }
        if bounce_y {
            Self::reflect(actor, Vec2::X);
        }
        BoundaryOutcome::Keep
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::bullet::{Bullet, BulletKind};
    use crate::sim::enemy::{Enemy, EnemyKind};
    use crate::sim::player::Player;
    use crate::Variant;
    use proptest::prelude::*;

    fn world(size: f32) -> World {
        World::new(size, size, size)
    }

    fn integrate(actor: &mut dyn Actor) {
        let body = actor.body_mut();
        body.position += body.vector;
    }

    #[test]
    fn test_view_starts_centred() {
        let world = World::new(1500.0, 500.0, 1000.0);
        assert_eq!(world.view_x, 500.0);
        assert_eq!(world.view_y, 500.0);
        assert_eq!(world.scale, 2.0);
    }

    #[test]
    fn test_follow_stops_near_edges() {
        let mut world = World::new(1500.0, 500.0, 500.0);
        world.follow(Vec2::new(800.0, 50.0));
        assert_eq!(world.view_x, 550.0);
        assert_eq!(world.view_y, 500.0);
    }

    #[test]
    fn test_world_to_screen_culls_offscreen() {
        let world = World::new(1500.0, 500.0, 1000.0);
        let on = world.world_to_screen(Vec2::new(600.0, 600.0), 10.0);
        assert_eq!(on, Some(Vec2::new(200.0, 200.0)));
        assert!(world.world_to_screen(Vec2::new(100.0, 600.0), 10.0).is_none());
        // partially visible circles are kept
        assert!(world.world_to_screen(Vec2::new(495.0, 600.0), 10.0).is_some());
    }

    #[test]
    fn test_wrap_right_edge_to_zero() {
        let mut enemy = Enemy::asteroid(2, Vec2::new(799.5, 100.0), Vec2::new(1.0, 0.0));
        integrate(&mut enemy);
        let outcome = ToroidalWrap.apply(&world(800.0), &mut enemy, false);
        assert_eq!(outcome, BoundaryOutcome::Keep);
        assert_eq!(enemy.body().position.x, 0.0);
        assert_eq!(enemy.body().vector, Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_wrap_negative_to_far_edge() {
        let mut enemy = Enemy::asteroid(2, Vec2::new(0.5, 0.5), Vec2::new(-1.0, -1.0));
        integrate(&mut enemy);
        ToroidalWrap.apply(&world(800.0), &mut enemy, false);
        assert_eq!(enemy.body().position, Vec2::new(799.0, 799.0));
    }

    #[test]
    fn test_reflect_right_wall_inverts_x() {
        let mut enemy = Enemy::new(EnemyKind::Dumbo, Vec2::new(1498.0, 700.0), Vec2::new(4.0, 3.0));
        integrate(&mut enemy);
        BoundedReflect.apply(&world(1500.0), &mut enemy, false);
        let v = enemy.body().vector;
        assert!((v.x + 3.6).abs() < 0.001);
        assert!((v.y - 2.7).abs() < 0.001);
        assert!(enemy.body().position.x < 1500.0);
    }

    #[test]
    fn test_reflect_corner_applies_both_axes() {
        let mut enemy = Enemy::new(EnemyKind::Dumbo, Vec2::new(1.0, 1.0), Vec2::new(-4.0, -4.0));
        integrate(&mut enemy);
        BoundedReflect.apply(&world(1500.0), &mut enemy, false);
        let v = enemy.body().vector;
        assert!(v.x > 0.0 && v.y > 0.0);
        assert!((v.length() - 4.0 * 2f32.sqrt() * 0.81).abs() < 0.01);
    }

    #[test]
    fn test_player_bounces_back_damped() {
        let mut player = Player::new(Variant::Arena, Vec2::new(1495.0, 700.0));
        player.body_mut().vector = Vec2::new(10.0, 0.0);
        integrate(&mut player);
        BoundedReflect.apply(&world(1500.0), &mut player, false);
        assert_eq!(player.body().vector, Vec2::new(-7.5, 0.0));
        assert_eq!(player.body().position.x, 1497.5);
    }

    #[test]
    fn test_bullet_dissipates_at_wall() {
        let mut bullet = Bullet::new(BulletKind::ArenaShot, Vec2::new(10.0, 700.0), Vec2::new(-20.0, 0.0), 270.0);
        integrate(&mut bullet);
        let outcome = BoundedReflect.apply(&world(1500.0), &mut bullet, false);
        assert_eq!(
            outcome,
            BoundaryOutcome::Dissipate {
                position: Vec2::new(0.0, 700.0),
                vector: Vec2::new(-10.0, 0.0),
            }
        );
    }

    #[test]
    fn test_bouncing_bullet_turns_heading() {
        let mut bullet = Bullet::new(BulletKind::ArenaShot, Vec2::new(10.0, 700.0), Vec2::new(-20.0, 0.0), 270.0);
        integrate(&mut bullet);
        let outcome = BoundedReflect.apply(&world(1500.0), &mut bullet, true);
        assert_eq!(outcome, BoundaryOutcome::Keep);
        assert!(bullet.body().vector.x > 0.0);
        assert!((bullet.heading.rem_euclid(360.0) - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_enemy_bullet_always_dissipates() {
        let mut bullet = Bullet::new(BulletKind::ArenaEnemyShot, Vec2::new(700.0, 5.0), Vec2::new(0.0, -10.0), 0.0);
        integrate(&mut bullet);
        let outcome = BoundedReflect.apply(&world(1500.0), &mut bullet, true);
        assert!(matches!(outcome, BoundaryOutcome::Dissipate { .. }));
    }

    proptest! {
        #[test]
        fn wrap_keeps_actors_inside(
            x in 0.0f32..800.0,
            y in 0.0f32..800.0,
            vx in -50.0f32..50.0,
            vy in -50.0f32..50.0,
        ) {
            let mut enemy = Enemy::asteroid(1, Vec2::new(x, y), Vec2::new(vx, vy));
            integrate(&mut enemy);
            ToroidalWrap.apply(&world(800.0), &mut enemy, false);
            let p = enemy.body().position;
            prop_assert!(p.x >= 0.0 && p.x < 800.0);
            prop_assert!(p.y >= 0.0 && p.y < 800.0);
        }

        #[test]
        fn reflect_off_right_wall_flips_and_damps(
            y in 100.0f32..1400.0,
            vx in 1.0f32..20.0,
            vy in -20.0f32..20.0,
        ) {
            let mut enemy = Enemy::new(EnemyKind::Dumbo, Vec2::new(1499.5, y), Vec2::new(vx, vy));
            integrate(&mut enemy);
            BoundedReflect.apply(&world(1500.0), &mut enemy, false);
            let v = enemy.body().vector;
            prop_assert!((v.x + vx * 0.9).abs() < 1e-3 * (1.0 + vx));
            prop_assert!((v.length() - Vec2::new(vx, vy).length() * 0.9).abs() < 1e-3 * (1.0 + vx.abs() + vy.abs()));
        }
    }
}
