//! Enemies
//!
//! Per-kind stats and AI live in a static strategy table keyed by
//! [`EnemyKind`]. Arena ships spend their first frames spawning in without
//! moving, then pick a diagonal drift and run their behavior every tick.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, Body, TickContext, apply_damage};
use super::bullet::{Bullet, BulletKind};
use super::vector::Kinematics;
use super::weapon::RechargeGate;

/// Enemy families across both game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Arena: drifts, occasionally flips vertical direction
    Dumbo,
    /// Arena: slowly homes on the player
    Zoner,
    /// Arena: aggressively homes on the player
    Tracker,
    /// Arena: big, lunges at the player then coasts to a stop
    Borg,
    /// Arena: sidesteps nearby player bullets
    Dodger,
    /// Arena: breaks into two minis when destroyed by the player
    Splitter,
    /// Arena: holds range and shoots
    Bomber,
    /// Arena: fragment of a splitter
    SplitterMini,
    /// Asteroid field: inert rock of size 1 to 4
    Asteroid,
    /// Asteroid field: large saucer
    Saucer,
    /// Asteroid field: small, faster-firing saucer
    SmallSaucer,
}

/// Per-tick AI routine
pub type Behavior = fn(&mut Enemy, &mut TickContext<'_>);

/// Static per-kind configuration
pub struct EnemyStats {
    /// Collision radius (per size class for asteroids)
    pub radius: f32,
    /// Starting health (per size class for asteroids)
    pub health: i32,
    /// Energy removed from the arena player on contact
    pub player_damage: i32,
    /// Score class: arena score is `(score_type + 1) * 5 * multiplier`
    pub score_type: u32,
    pub drops_multiplier: bool,
    /// Frames spent spawning in before moving
    pub spawn_frames: u32,
    /// Frames between shots for armed enemies
    pub fire_recharge: u64,
    pub behavior: Behavior,
}

static STATS: [EnemyStats; 11] = [
    // Dumbo
    EnemyStats {
        radius: 22.0,
        health: 1,
        player_damage: 10,
        score_type: 0,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: dumbo,
    },
    // Zoner
    EnemyStats {
        radius: 22.0,
        health: 1,
        player_damage: 10,
        score_type: 1,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: zoner,
    },
    // Tracker
    EnemyStats {
        radius: 22.0,
        health: 2,
        player_damage: 15,
        score_type: 2,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: tracker,
    },
    // Borg
    EnemyStats {
        radius: 52.0,
        health: 5,
        player_damage: 25,
        score_type: 3,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: borg,
    },
    // Dodger
    EnemyStats {
        radius: 25.0,
        health: 1,
        player_damage: 10,
        score_type: 4,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: dodger,
    },
    // Splitter
    EnemyStats {
        radius: 25.0,
        health: 3,
        player_damage: 20,
        score_type: 5,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: splitter,
    },
    // Bomber
    EnemyStats {
        radius: 28.0,
        health: 5,
        player_damage: 20,
        score_type: 6,
        drops_multiplier: true,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 50,
        behavior: bomber,
    },
    // SplitterMini
    EnemyStats {
        radius: 12.0,
        health: 1,
        player_damage: 5,
        score_type: 4,
        drops_multiplier: false,
        spawn_frames: ARENA_SPAWN_FRAMES,
        fire_recharge: 0,
        behavior: splitter_mini,
    },
    // Asteroid
    EnemyStats {
        radius: 8.0,
        health: 1,
        player_damage: 0,
        score_type: 0,
        drops_multiplier: false,
        spawn_frames: 0,
        fire_recharge: 0,
        behavior: inert,
    },
    // Saucer
    EnemyStats {
        radius: 16.0,
        health: 1,
        player_damage: 0,
        score_type: 0,
        drops_multiplier: false,
        spawn_frames: 0,
        fire_recharge: 60,
        behavior: saucer,
    },
    // SmallSaucer
    EnemyStats {
        radius: 8.0,
        health: 1,
        player_damage: 0,
        score_type: 0,
        drops_multiplier: false,
        spawn_frames: 0,
        fire_recharge: 45,
        behavior: saucer,
    },
];

/// Frames an arena ship spends materialising
pub const ARENA_SPAWN_FRAMES: u32 = 20;
/// Minimum spawn distance from the player in the arena
const ARENA_SPAWN_CLEARANCE: f32 = 220.0;
/// Minimum spawn distance from the player in the asteroid field
const ASTEROID_SPAWN_CLEARANCE: f32 = 125.0;
/// Give up looking for a clear spawn point after this many draws
const SPAWN_ATTEMPTS: usize = 64;

impl EnemyKind {
    /// Arena kinds in spawn rotation order
    pub const ARENA: [EnemyKind; 7] = [
        EnemyKind::Dumbo,
        EnemyKind::Zoner,
        EnemyKind::Tracker,
        EnemyKind::Borg,
        EnemyKind::Dodger,
        EnemyKind::Splitter,
        EnemyKind::Bomber,
    ];

    pub fn stats(self) -> &'static EnemyStats {
        &STATS[self as usize]
    }

    pub fn is_asteroid(self) -> bool {
        self == EnemyKind::Asteroid
    }

    pub fn is_saucer(self) -> bool {
        matches!(self, EnemyKind::Saucer | EnemyKind::SmallSaucer)
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Dumbo => "dumbo",
            EnemyKind::Zoner => "zoner",
            EnemyKind::Tracker => "tracker",
            EnemyKind::Borg => "borg",
            EnemyKind::Dodger => "dodger",
            EnemyKind::Splitter => "splitter",
            EnemyKind::Bomber => "bomber",
            EnemyKind::SplitterMini => "splitter-mini",
            EnemyKind::Asteroid => "asteroid",
            EnemyKind::Saucer => "saucer",
            EnemyKind::SmallSaucer => "small-saucer",
        }
    }
}

/// A hostile actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    body: Body,
    kind: EnemyKind,
    /// Asteroid size class (1-4); 1 for everything else
    size: u8,
    health: i32,
    alive_time: u32,
    gate: RechargeGate,
    /// Set when damaged; renderers flash the ship and clear it
    pub hit_flash: bool,
}

impl Enemy {
    pub fn new(kind: EnemyKind, position: Vec2, vector: Vec2) -> Self {
        Self::sized(kind, 1, position, vector)
    }

    /// Asteroid of size class `size` (clamped to 1..=4)
    pub fn asteroid(size: u8, position: Vec2, vector: Vec2) -> Self {
        Self::sized(EnemyKind::Asteroid, size.clamp(1, 4), position, vector)
    }

    fn sized(kind: EnemyKind, size: u8, position: Vec2, vector: Vec2) -> Self {
        let stats = kind.stats();
        let scale = size as f32;
        Self {
            body: Body::new(position, vector, stats.radius * scale),
            kind,
            size,
            health: stats.health * size as i32,
            alive_time: 0,
            gate: RechargeGate::new(stats.fire_recharge),
            hit_flash: false,
        }
    }

    /// Arena ship at a random point at least 220 units from the player
    pub fn spawn_arena(kind: EnemyKind, world_size: f32, player: Vec2, rng: &mut impl Rng) -> Self {
        let position = clear_point(world_size, player, ARENA_SPAWN_CLEARANCE, rng);
        Self::new(kind, position, Vec2::ZERO)
    }

    /// Asteroid at a random point at least 125 units from the player, drifting
    /// up to `speed_factor` per axis
    pub fn spawn_asteroid(
        size: u8,
        speed_factor: f32,
        world_size: f32,
        player: Vec2,
        rng: &mut impl Rng,
    ) -> Self {
        let position = clear_point(world_size, player, ASTEROID_SPAWN_CLEARANCE, rng);
        let vector = Vec2::new(
            (rng.random::<f32>() * 2.0 - 1.0) * speed_factor,
            (rng.random::<f32>() * 2.0 - 1.0) * speed_factor,
        );
        Self::asteroid(size, position, vector)
    }

    /// Saucer entering from the side of the field away from the player
    pub fn spawn_saucer(small: bool, world_size: f32, player: Vec2, rng: &mut impl Rng) -> Self {
        let (kind, boost) = if small {
            (EnemyKind::SmallSaucer, 1.0)
        } else {
            (EnemyKind::Saucer, 0.0)
        };
        let half = world_size / 2.0;
        let y = if player.y < half { world_size - 48.0 } else { 48.0 };
        let vy = rng.random::<f32>() + 0.5 + boost;
        let (position, vector) = if player.x < half {
            let vx = -(rng.random::<f32>() + 1.0 + boost);
            (Vec2::new(world_size - 48.0, y), Vec2::new(vx, vy))
        } else {
            let vx = rng.random::<f32>() + 1.0 + boost;
            (Vec2::new(0.0, y), Vec2::new(vx, vy))
        };
        Self::new(kind, position, vector)
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn size(&self) -> u8 {
        self.size
    }

    pub fn health(&self) -> i32 {
        self.health
    }

    pub fn stats(&self) -> &'static EnemyStats {
        self.kind.stats()
    }

    /// Whether the ship is still materialising
    pub fn spawning(&self) -> bool {
        self.alive_time < self.stats().spawn_frames
    }

    /// Children released on destruction: two minis for a splitter, smaller
    /// rocks for an asteroid above size 1. `impact` is the velocity of
    /// whatever destroyed it.
    pub fn on_destroyed(&self, impact: Vec2, rng: &mut impl Rng) -> Vec<Enemy> {
        match self.kind {
            EnemyKind::Splitter => [FRAC_PI_2, -FRAC_PI_2]
                .into_iter()
                .map(|angle| {
                    let vector = self.body.vector.rotated(angle);
                    Enemy::new(EnemyKind::SplitterMini, self.body.position + vector, vector)
                })
                .collect(),
            EnemyKind::Asteroid if self.size > 1 => (0..self.size / 2)
                .map(|_| {
                    let nudge = Vec2::new(0.0, -(rng.random::<f32>() * 3.0))
                        .rotated(self.body.vector.theta() * (rng.random::<f32>() * PI));
                    let vector = self.body.vector + nudge + impact * 0.2;
                    let offset = Vec2::new(
                        rng.random::<f32>() * 5.0 - 2.5,
                        rng.random::<f32>() * 5.0 - 2.5,
                    );
                    Enemy::asteroid(self.size - 1, self.body.position + offset, vector)
                })
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Head toward the player at `speed` with probability `chance`
    fn chase(&mut self, ctx: &mut TickContext<'_>, chance: f32, speed: f32) {
        if ctx.rng.random::<f32>() < chance {
            self.body.vector = (ctx.player.position - self.body.position).scale_to(speed);
        }
    }
}

fn clear_point(world_size: f32, player: Vec2, clearance: f32, rng: &mut impl Rng) -> Vec2 {
    let mut point = Vec2::ZERO;
    for _ in 0..SPAWN_ATTEMPTS {
        point = Vec2::new(
            rng.random::<f32>() * world_size,
            rng.random::<f32>() * world_size,
        );
        if player.distance(point) > clearance {
            break;
        }
    }
    point
}

fn random_sign(rng: &mut impl Rng) -> f32 {
    if rng.random::<bool>() { 1.0 } else { -1.0 }
}

fn inert(_enemy: &mut Enemy, _ctx: &mut TickContext<'_>) {}

fn dumbo(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    if ctx.rng.random::<f32>() < 0.01 {
        let vy = enemy.body.vector.y;
        enemy.body.vector.y = -(vy + (0.5 - ctx.rng.random::<f32>()));
    }
}

fn zoner(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    enemy.chase(ctx, 0.04, 4.0);
}

fn tracker(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    enemy.chase(ctx, 0.2, 8.0);
}

fn borg(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    if ctx.rng.random::<f32>() < 0.03 {
        enemy.body.vector = (ctx.player.position - enemy.body.position).scale_to(12.0);
    } else {
        enemy.body.vector *= 0.95;
    }
}

fn dodger(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    let position = enemy.body.position;
    let mut dodged = false;
    if ctx.player.position.distance(position) > 150.0 {
        // bullets are noticed 50 units before they would touch
        let perception = enemy.body.radius + 50.0;
        if let Some(threat) = ctx
            .threats
            .iter()
            .find(|threat| threat.center.distance(position) <= threat.radius + perception)
        {
            let mut away = (threat.center - position).scale_to(12.0);
            let n = ctx.rng.random::<f32>();
            away.rotate_by(if n < 0.5 { n * FRAC_PI_4 } else { -n * FRAC_PI_4 });
            away.invert();
            enemy.body.vector = away;
            dodged = true;
        }
    }
    if !dodged {
        enemy.chase(ctx, 0.04, 8.0);
    }
}

fn splitter(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    enemy.chase(ctx, 0.04, 5.0);
}

fn splitter_mini(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    enemy.chase(ctx, 0.04, 8.0);
}

fn bomber(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    let to_player = ctx.player.position - enemy.body.position;
    let distance = to_player.length();
    if distance > 400.0 {
        if ctx.rng.random::<f32>() < 0.08 {
            enemy.body.vector = to_player.scale_to(8.0);
        }
    } else if distance < 350.0 {
        if ctx.rng.random::<f32>() < 0.08 {
            enemy.body.vector = (-to_player).scale_to(8.0);
        }
    } else {
        enemy.body.vector *= 0.8;
        if ctx.player.alive && enemy.gate.try_fire(ctx.frame) {
            let mut shot = to_player.scale_to(10.0);
            shot.x += ctx.rng.random::<f32>() * 2.0 - 1.0;
            shot.y += ctx.rng.random::<f32>() * 2.0 - 1.0;
            ctx.spawns.enemy_bullets.push(Bullet::new(
                BulletKind::ArenaEnemyShot,
                enemy.body.position,
                shot,
                0.0,
            ));
        }
    }
}

fn saucer(enemy: &mut Enemy, ctx: &mut TickContext<'_>) {
    let small = enemy.kind == EnemyKind::SmallSaucer;
    let (chance, drift) = if small { (0.02, 0.5) } else { (0.01, 0.25) };
    if ctx.rng.random::<f32>() < chance {
        let vy = enemy.body.vector.y;
        let wobble = drift - ctx.rng.random::<f32>() * drift * 2.0;
        enemy.body.vector.y = -(vy + wobble);
    }

    if ctx.player.alive && enemy.gate.try_fire(ctx.frame) {
        let speed = if small { 6.0 } else { 5.0 };
        let mut shot = (ctx.player.position - enemy.body.position).scale_to(speed);
        if small {
            shot.x += ctx.rng.random::<f32>() - 0.5;
            shot.y += ctx.rng.random::<f32>() - 0.5;
        } else {
            shot.x += ctx.rng.random::<f32>() * 2.0 - 1.0;
            shot.y += ctx.rng.random::<f32>() * 2.0 - 1.0;
        }
        ctx.spawns.enemy_bullets.push(Bullet::new(
            BulletKind::EnemyShot,
            enemy.body.position,
            shot,
            0.0,
        ));
    }
}

impl Actor for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn role(&self) -> ActorRole {
        ActorRole::Enemy
    }

    fn on_update(&mut self, ctx: &mut TickContext<'_>) {
        let stats = self.stats();
        if stats.spawn_frames > 0 && self.alive_time <= stats.spawn_frames {
            self.alive_time += 1;
            if self.alive_time < stats.spawn_frames {
                return;
            }
            if self.alive_time == stats.spawn_frames {
                self.body.vector =
                    Vec2::new(4.0 * random_sign(ctx.rng), 4.0 * random_sign(ctx.rng));
            }
        }
        (stats.behavior)(self, ctx);
    }

    fn hit(&mut self, force: i32) -> bool {
        self.hit_flash = true;
        apply_damage(&mut self.health, &mut self.body.alive, force)
    }
}
