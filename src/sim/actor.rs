//! Actor contract
//!
//! Every simulated object (player, enemies, bullets, effects, collectables)
//! carries a [`Body`] and implements [`Actor`]. The scene loop owns the
//! integration step: actors never apply `position += vector` themselves.

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::collectable::Collectable;
use super::collision::Circle;
use super::effects::Effect;
use super::enemy::Enemy;
use super::tick::TickInput;
use crate::consts::INSTANT_KILL;

/// Kinematic state shared by all actors
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Body {
    pub position: Vec2,
    /// Velocity in world units per tick
    pub vector: Vec2,
    pub alive: bool,
    /// Collision radius. Zero opts out of collision detection.
    pub radius: f32,
}

impl Body {
    pub fn new(position: Vec2, vector: Vec2, radius: f32) -> Self {
        Self {
            position,
            vector,
            alive: true,
            radius,
        }
    }

    /// Collision circle at the current position
    #[inline]
    pub fn circle(&self) -> Circle {
        Circle::new(self.position, self.radius)
    }
}

/// Which boundary rule family an actor belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActorRole {
    Player,
    PlayerBullet,
    EnemyBullet,
    Enemy,
    Effect,
    Collectable,
}

impl ActorRole {
    pub fn is_bullet(self) -> bool {
        matches!(self, ActorRole::PlayerBullet | ActorRole::EnemyBullet)
    }
}

/// What enemies and weapons may observe about the player during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerView {
    pub position: Vec2,
    pub vector: Vec2,
    pub alive: bool,
}

/// Actors created during a tick. Appended to the scene lists after
/// collision detection, so they are first updated on the next tick.
#[derive(Debug, Default)]
pub struct Spawns {
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub effects: Vec<Effect>,
    pub collectables: Vec<Collectable>,
}

impl Spawns {
    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
            && self.player_bullets.is_empty()
            && self.enemy_bullets.is_empty()
            && self.effects.is_empty()
            && self.collectables.is_empty()
    }
}

/// Per-tick context handed to `Actor::on_update`
pub struct TickContext<'a> {
    /// Current simulation frame
    pub frame: u64,
    pub rng: &'a mut Pcg32,
    pub input: &'a TickInput,
    pub player: PlayerView,
    /// Player bullet circles as they were at the start of the tick
    pub threats: &'a [Circle],
    pub spawns: &'a mut Spawns,
    /// Spawn particle bursts for effects (off keeps effect actors empty)
    pub particles: bool,
}

/// Lifecycle contract for every simulated object.
///
/// Per tick the scene calls `on_update`, then `expired`; survivors are
/// integrated and passed through the boundary policy.
pub trait Actor {
    fn body(&self) -> &Body;

    fn body_mut(&mut self) -> &mut Body;

    fn role(&self) -> ActorRole;

    /// AI, timers and countdowns. Must not integrate position.
    fn on_update(&mut self, _ctx: &mut TickContext<'_>) {}

    /// Removal predicate. Pure.
    fn expired(&self) -> bool {
        !self.body().alive
    }

    /// Apply `force` damage; [`INSTANT_KILL`] destroys unconditionally.
    /// Returns whether the actor is now destroyed.
    fn hit(&mut self, force: i32) -> bool {
        let _ = force;
        self.body_mut().alive = false;
        true
    }

    /// Heading in degrees, for actors that are drawn rotated
    fn heading_mut(&mut self) -> Option<&mut f32> {
        None
    }
}

/// Shared health bookkeeping for destructible actors
#[inline]
pub(crate) fn apply_damage(health: &mut i32, alive: &mut bool, force: i32) -> bool {
    if force == INSTANT_KILL {
        *health = 0;
    } else {
        *health -= force;
    }
    if *health <= 0 {
        *alive = false;
    }
    !*alive
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_damage_counts_down() {
        let (mut health, mut alive) = (3, true);
        assert!(!apply_damage(&mut health, &mut alive, 2));
        assert!(alive);
        assert!(apply_damage(&mut health, &mut alive, 1));
        assert!(!alive);
    }

    #[test]
    fn test_apply_damage_instant_kill() {
        let (mut health, mut alive) = (50, true);
        assert!(apply_damage(&mut health, &mut alive, INSTANT_KILL));
        assert_eq!(health, 0);
    }

    #[test]
    fn test_zero_radius_body_circle() {
        let body = Body::new(Vec2::new(5.0, 5.0), Vec2::ZERO, 0.0);
        assert_eq!(body.circle().radius, 0.0);
        assert!(body.alive);
    }
}
