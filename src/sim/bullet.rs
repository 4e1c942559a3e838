//! Bullets
//!
//! Player and enemy projectiles. A bullet lives for a fixed number of ticks,
//! carries a damage power and, for bombs, an area effect radius.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, Body, TickContext};

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Projectile families with their fixed stats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletKind {
    /// Arena player shot
    ArenaShot,
    /// Arena bomber shot
    ArenaEnemyShot,
    /// Asteroid field player shot
    Shot,
    /// Twin cannon shot (double power)
    HeavyShot,
    /// Area effect bomb
    Bomb,
    /// Saucer shot
    EnemyShot,
}

struct BulletStats {
    radius: f32,
    lifespan: u32,
    power: i32,
    effect_radius: f32,
    /// Radius shrinks linearly to zero over the last `FADE_LENGTH` ticks
    shrinks: bool,
}

/// Ticks over which a shrinking bullet fades out
pub const FADE_LENGTH: u32 = 5;

impl BulletKind {
    fn stats(self) -> BulletStats {
        match self {
            BulletKind::ArenaShot => BulletStats {
                radius: 12.0,
                lifespan: 30,
                power: 1,
                effect_radius: 0.0,
                shrinks: false,
            },
            BulletKind::ArenaEnemyShot => BulletStats {
                radius: 10.0,
                lifespan: 75,
                power: 10,
                effect_radius: 0.0,
                shrinks: false,
            },
            BulletKind::Shot => BulletStats {
                radius: 4.0,
                lifespan: 40,
                power: 1,
                effect_radius: 0.0,
                shrinks: false,
            },
            BulletKind::HeavyShot => BulletStats {
                radius: 6.0,
                lifespan: 50,
                power: 2,
                effect_radius: 0.0,
                shrinks: false,
            },
            BulletKind::Bomb => BulletStats {
                radius: 4.0,
                lifespan: 80,
                power: 1,
                effect_radius: 45.0,
                shrinks: true,
            },
            BulletKind::EnemyShot => BulletStats {
                radius: 4.0,
                lifespan: 60,
                power: 1,
                effect_radius: 0.0,
                shrinks: true,
            },
        }
    }

    pub fn owner(self) -> BulletOwner {
        match self {
            BulletKind::ArenaEnemyShot | BulletKind::EnemyShot => BulletOwner::Enemy,
            _ => BulletOwner::Player,
        }
    }
}

/// A projectile in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    body: Body,
    kind: BulletKind,
    /// Facing in degrees
    pub heading: f32,
    lifespan: u32,
    power: i32,
}

impl Bullet {
    pub fn new(kind: BulletKind, position: Vec2, vector: Vec2, heading: f32) -> Self {
        let stats = kind.stats();
        Self {
            body: Body::new(position, vector, stats.radius),
            kind,
            heading,
            lifespan: stats.lifespan,
            power: stats.power,
        }
    }

    /// Override the default lifespan (side and rear guns fire short-lived shots)
    pub fn with_lifespan(mut self, lifespan: u32) -> Self {
        self.lifespan = lifespan.max(1);
        self
    }

    pub fn kind(&self) -> BulletKind {
        self.kind
    }

    pub fn owner(&self) -> BulletOwner {
        self.kind.owner()
    }

    /// Damage dealt on impact
    pub fn power(&self) -> i32 {
        self.power
    }

    /// Area effect radius; zero for single-target bullets
    pub fn effect_radius(&self) -> f32 {
        self.kind.stats().effect_radius
    }

    /// Ticks remaining
    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }
}

impl Actor for Bullet {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn role(&self) -> ActorRole {
        match self.owner() {
            BulletOwner::Player => ActorRole::PlayerBullet,
            BulletOwner::Enemy => ActorRole::EnemyBullet,
        }
    }

    fn on_update(&mut self, _ctx: &mut TickContext<'_>) {
        debug_assert!(self.lifespan > 0, "bullet updated after expiry");
        self.lifespan = self.lifespan.saturating_sub(1);

        let stats = self.kind.stats();
        if stats.shrinks && self.lifespan <= FADE_LENGTH {
            self.body.radius = stats.radius / FADE_LENGTH as f32 * self.lifespan as f32;
        }
    }

    fn expired(&self) -> bool {
        self.lifespan == 0 || !self.body.alive
    }

    fn heading_mut(&mut self) -> Option<&mut f32> {
        Some(&mut self.heading)
    }
}
