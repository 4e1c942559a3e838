//! Scene state
//!
//! A scene owns the world, one list per actor family, the player, the seeded
//! RNG and the scoring state. Everything a tick spawns is parked in
//! `pending` and appended once collisions are resolved.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use super::actor::{Actor, PlayerView, Spawns};
use super::bullet::Bullet;
use super::collectable::{Collectable, CollectableKind, PowerUpKind};
use super::collision::{detect_bullet_hits, within_blast};
use super::effects::{BurstKind, Effect};
use super::enemy::{Enemy, EnemyKind};
use super::player::Player;
use super::vector::Kinematics;
use super::weapon::{GunKind, Mount};
use super::world::{BoundaryPolicy, BoundedReflect, ToroidalWrap, World};
use crate::consts::{INSTANT_KILL, START_LIVES, START_MULTIPLIER};
use crate::{Settings, Variant};

/// Fade length of pickup and multiplier announcements
const INDICATOR_FADE: u32 = 32;
/// Reach of the smart bomb power-up
const SMART_BOMB_RADIUS: f32 = 96.0;
/// Energy restored by an arena energy pickup
const ENERGY_BOOST: f32 = 25.0;
/// Chance a destroyed enemy leaves an energy pickup or power-up
const DROP_CHANCE: f32 = 0.1;

/// Notifications for the host (HUD, audio, stats)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    EnemyDestroyed {
        kind: EnemyKind,
        position: Vec2,
        /// Zero when the player did not cause it
        score_delta: u64,
    },
    PlayerKilled {
        frame: u64,
        lives_left: u32,
    },
    Collected {
        kind: CollectableKind,
        power_up: Option<PowerUpKind>,
    },
}

/// Scoring state shared with the HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GameStats {
    pub score: u64,
    pub score_multiplier: u32,
    pub lives: u32,
    pub enemies_destroyed: u64,
    pub player_deaths: u32,
}

impl Default for GameStats {
    fn default() -> Self {
        Self {
            score: 0,
            score_multiplier: START_MULTIPLIER,
            lives: START_LIVES,
            enemies_destroyed: 0,
            player_deaths: 0,
        }
    }
}

/// Actor list sizes, for reports and benchmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ActorCounts {
    pub enemies: usize,
    pub player_bullets: usize,
    pub enemy_bullets: usize,
    pub effects: usize,
    pub collectables: usize,
}

/// A self-contained simulation instance
#[derive(Debug)]
pub struct Scene {
    pub variant: Variant,
    pub world: World,
    pub(crate) boundary: Box<dyn BoundaryPolicy>,
    pub enemies: Vec<Enemy>,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub effects: Vec<Effect>,
    pub collectables: Vec<Collectable>,
    pub player: Player,
    pub game: GameStats,
    /// Spawn particle bursts (off leaves emitters empty)
    pub particles: bool,
    pub(crate) rng: Pcg32,
    pub(crate) pending: Spawns,
    events: Vec<SimEvent>,
}

impl Scene {
    /// Fresh scene for the configured variant with its initial enemies
    pub fn new(settings: &Settings) -> Self {
        let world = World::new(settings.world_size, settings.view_size, settings.screen_width);
        let boundary: Box<dyn BoundaryPolicy> = match settings.variant {
            Variant::Asteroids => Box::new(ToroidalWrap),
            Variant::Arena => Box::new(BoundedReflect),
        };
        let mut scene = Self {
            variant: settings.variant,
            player: Player::new(settings.variant, world.center()),
            world,
            boundary,
            enemies: Vec::new(),
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            effects: Vec::new(),
            collectables: Vec::new(),
            game: GameStats::default(),
            particles: settings.particles,
            rng: Pcg32::seed_from_u64(settings.seed),
            pending: Spawns::default(),
            events: Vec::new(),
        };

        for i in 0..settings.initial_enemies {
            match scene.variant {
                Variant::Arena => {
                    scene.spawn_enemy(EnemyKind::ARENA[i % EnemyKind::ARENA.len()]);
                }
                Variant::Asteroids => {
                    let size = scene.rng.random_range(1..=4);
                    let speed = scene.rng.random::<f32>() + 1.0;
                    scene.spawn_asteroid(size, speed);
                }
            }
        }

        log::info!(
            "Scene created: {} (seed {}, world {}, {} enemies, boundary {})",
            scene.variant.as_str(),
            settings.seed,
            scene.world.size,
            scene.enemies.len(),
            scene.boundary.name()
        );
        scene
    }

    /// Replace the boundary policy
    pub fn with_boundary(mut self, boundary: Box<dyn BoundaryPolicy>) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn boundary(&self) -> &dyn BoundaryPolicy {
        self.boundary.as_ref()
    }

    /// What enemies may see of the player this tick
    pub fn player_view(&self) -> PlayerView {
        let body = self.player.body();
        PlayerView {
            position: body.position,
            vector: body.vector,
            alive: body.alive,
        }
    }

    pub fn counts(&self) -> ActorCounts {
        ActorCounts {
            enemies: self.enemies.len(),
            player_bullets: self.player_bullets.len(),
            enemy_bullets: self.enemy_bullets.len(),
            effects: self.effects.len(),
            collectables: self.collectables.len(),
        }
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add an arena ship clear of the player. Takes effect immediately, so
    /// call it between ticks.
    pub fn spawn_enemy(&mut self, kind: EnemyKind) {
        let player = self.player.body().position;
        let enemy = Enemy::spawn_arena(kind, self.world.size, player, &mut self.rng);
        self.enemies.push(enemy);
    }

    /// Add an asteroid clear of the player
    pub fn spawn_asteroid(&mut self, size: u8, speed_factor: f32) {
        let player = self.player.body().position;
        let enemy =
            Enemy::spawn_asteroid(size, speed_factor, self.world.size, player, &mut self.rng);
        self.enemies.push(enemy);
    }

    /// Add a saucer on the far side of the field
    pub fn spawn_saucer(&mut self, small: bool) {
        let player = self.player.body().position;
        let enemy = Enemy::spawn_saucer(small, self.world.size, player, &mut self.rng);
        self.enemies.push(enemy);
    }

    /// Bring the player back at the world centre after a death
    pub fn reset_player(&mut self, persist_power_ups: bool) {
        let centre = self.world.center();
        self.player.reset(centre, persist_power_ups);
        log::debug!("Player reset ({} lives)", self.game.lives);
    }

    /// Append everything spawned during the tick
    pub(crate) fn apply_spawns(&mut self) {
        let spawns = std::mem::take(&mut self.pending);
        if spawns.is_empty() {
            return;
        }
        self.enemies.extend(spawns.enemies);
        self.player_bullets.extend(spawns.player_bullets);
        self.enemy_bullets.extend(spawns.enemy_bullets);
        self.effects.extend(spawns.effects);
        self.collectables.extend(spawns.collectables);
    }

    /// Collision stage of the tick: player bullets against enemies, then
    /// everything that can touch the player. Destroyed actors leave their
    /// lists before spawns are appended.
    pub(crate) fn resolve_collisions(&mut self) {
        let was_alive = self.player.alive();

        for hit in detect_bullet_hits(&mut self.player_bullets, &mut self.enemies) {
            let bullet = hit.bullet.body();
            if hit.destroyed {
                self.destroy_enemy(hit.enemy, bullet.vector, true);
            } else {
                let drift = self.enemies[hit.enemy].body().vector;
                self.impact(bullet.position, bullet.vector, drift);
            }
            let radius = hit.bullet.effect_radius();
            if radius > 0.0 {
                self.detonate(bullet.position, radius, bullet.vector);
            }
        }

        if self.player.alive() {
            self.enemy_bullets_vs_player();
        }
        if self.player.alive() {
            self.enemies_vs_player();
        }
        if self.player.alive() {
            self.collectables_vs_player();
        }
        if was_alive && !self.player.alive() {
            self.player_killed();
        }

        self.enemies.retain(|enemy| enemy.body().alive);
        self.enemy_bullets.retain(|bullet| bullet.body().alive);
        self.collectables.retain(|collectable| collectable.body().alive);
    }

    /// Non-destructive hit feedback at `position`; `drift` is the struck
    /// enemy's velocity
    fn impact(&mut self, position: Vec2, vector: Vec2, drift: Vec2) {
        let effect = match self.variant {
            Variant::Arena => {
                let vector = vector * (0.5 + self.rng.random::<f32>() * 0.5);
                Effect::burst(BurstKind::EnemyImpact, position, vector, &mut self.rng, self.particles)
            }
            Variant::Asteroids => Effect::impact(position, drift),
        };
        self.pending.effects.push(effect);
    }

    /// Blow up the enemy at `index`: explosion, score, children and drops.
    /// `impact` is the velocity of whatever destroyed it. Returns the score
    /// awarded.
    pub fn destroy_enemy(&mut self, index: usize, impact: Vec2, by_player: bool) -> u64 {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return 0;
        };
        enemy.body_mut().alive = false;
        let enemy = enemy.clone();
        let position = enemy.body().position;
        let vector = enemy.body().vector;
        let kind = enemy.kind();

        let mut score_delta = 0;
        match self.variant {
            Variant::Arena => {
                let large = kind == EnemyKind::Borg;
                let burst = Effect::burst(
                    BurstKind::EnemyExplosion { large },
                    position,
                    vector + impact * 0.2,
                    &mut self.rng,
                    self.particles,
                );
                self.pending.effects.push(burst);

                if by_player {
                    score_delta = (enemy.stats().score_type as u64 + 1)
                        * 5
                        * self.game.score_multiplier as u64;
                    self.pending.effects.push(Effect::score(
                        Vec2::new(position.x, position.y - 16.0),
                        Vec2::new(0.0, -5.0) + vector * 0.5,
                        score_delta,
                    ));
                    self.release_children(&enemy, impact);
                    self.generate_multiplier(&enemy);
                    self.generate_power_up(&enemy);
                }
            }
            Variant::Asteroids => {
                let size = if kind.is_asteroid() {
                    enemy.size() as f32
                } else {
                    4.0
                };
                self.pending.effects.push(Effect::explosion(position, vector, size));
                self.release_children(&enemy, impact);

                if by_player {
                    score_delta = self.rng.random_range(100..=199);
                    let drift = Vec2::new(0.0, -(self.rng.random::<f32>() * 2.0 + 0.5));
                    self.pending.effects.push(Effect::score(position, drift, score_delta));
                    self.generate_power_up(&enemy);
                }
            }
        }

        self.game.score += score_delta;
        self.game.enemies_destroyed += 1;
        self.events.push(SimEvent::EnemyDestroyed {
            kind,
            position,
            score_delta,
        });
        score_delta
    }

    fn release_children(&mut self, enemy: &Enemy, impact: Vec2) {
        let children = enemy.on_destroyed(impact, &mut self.rng);
        if !children.is_empty() {
            log::debug!("{} split into {} pieces", enemy.kind().name(), children.len());
        }
        self.pending.enemies.extend(children);
    }

    /// Drop score multipliers from a destroyed arena ship
    pub fn generate_multiplier(&mut self, enemy: &Enemy) {
        let stats = enemy.stats();
        if !stats.drops_multiplier {
            return;
        }
        let count = self.rng.random_range(1..=stats.score_type.clamp(1, 4));
        for _ in 0..count {
            let vector = (enemy.body().vector * 0.2).rotated(self.rng.random::<f32>() * TAU);
            self.pending.collectables.push(Collectable::new(
                CollectableKind::Multiplier,
                enemy.body().position,
                vector,
            ));
        }
    }

    /// Roll for a pickup from a destroyed enemy: an energy boost in the arena
    /// (only when the player is short of energy), a power-up in the asteroid
    /// field
    pub fn generate_power_up(&mut self, enemy: &Enemy) {
        let kind = match self.variant {
            Variant::Arena if self.player.energy < self.player.energy_max() => {
                CollectableKind::EnergyBoost
            }
            Variant::Arena => return,
            Variant::Asteroids => CollectableKind::PowerUp,
        };
        if self.rng.random::<f32>() >= DROP_CHANCE {
            return;
        }
        let vector = (enemy.body().vector * 0.5).rotated(self.rng.random::<f32>() * TAU);
        self.pending
            .collectables
            .push(Collectable::new(kind, enemy.body().position, vector));
    }

    /// Destroy every live enemy whose circle reaches within `radius` of
    /// `center`, with score
    pub fn detonate(&mut self, center: Vec2, radius: f32, impact: Vec2) {
        if self.variant == Variant::Asteroids {
            self.pending
                .effects
                .push(Effect::explosion(center, impact * 0.5, radius / 8.0));
        }
        for index in within_blast(center, radius, &self.enemies) {
            if self.enemies[index].hit(INSTANT_KILL) {
                self.destroy_enemy(index, impact, true);
            }
        }
    }

    /// Reward the player for a pickup
    pub fn apply_collectable(&mut self, collectable: &Collectable) -> Option<PowerUpKind> {
        let position = collectable.body().position;
        let vector = collectable.body().vector;
        match collectable.kind() {
            CollectableKind::Multiplier => {
                self.game.score_multiplier += 1;
                if self.game.score_multiplier % 10 == 0 {
                    let message = format!("x{}", self.game.score_multiplier);
                    self.pending.effects.push(Effect::text(
                        position,
                        Vec2::new(0.0, -5.0) + vector,
                        message,
                        INDICATOR_FADE,
                    ));
                }
                None
            }
            CollectableKind::EnergyBoost => {
                self.player.add_energy(ENERGY_BOOST);
                self.pending.effects.push(Effect::text(
                    position,
                    Vec2::new(0.0, -5.0) + vector,
                    "Energy Boost!",
                    INDICATOR_FADE,
                ));
                None
            }
            CollectableKind::PowerUp => {
                let power_up = PowerUpKind::roll(&mut self.rng);
                self.apply_power_up(power_up, position, vector);
                self.pending.effects.push(Effect::text(
                    Vec2::new(position.x, position.y - collectable.body().radius),
                    Vec2::new(0.0, -3.0),
                    power_up.message(),
                    INDICATOR_FADE,
                ));
                Some(power_up)
            }
        }
    }

    fn apply_power_up(&mut self, power_up: PowerUpKind, position: Vec2, vector: Vec2) {
        log::debug!("Power-up: {:?}", power_up);
        let player = &mut self.player;
        match power_up {
            PowerUpKind::EnergyBoost => player.add_energy(player.energy_max() / 2.0),
            PowerUpKind::FireWhenShielded => player.fire_when_shielded = true,
            PowerUpKind::ExtraLife => self.game.lives += 1,
            PowerUpKind::SlowAsteroids => {
                for enemy in self.enemies.iter_mut().filter(|e| e.kind().is_asteroid()) {
                    enemy.body_mut().vector *= 0.75;
                }
            }
            PowerUpKind::SmartBomb => self.detonate(position, SMART_BOMB_RADIUS, vector),
            PowerUpKind::TwinCannons => player.loadout.mount(Mount::Main, GunKind::TwinCannons),
            PowerUpKind::SprayCannons => player.loadout.mount(Mount::Main, GunKind::VSpray),
            PowerUpKind::RearGun => player.loadout.mount(Mount::Rear, GunKind::RearGun),
            PowerUpKind::SideGuns => player.loadout.mount(Mount::Side, GunKind::SideGuns),
        }
    }

    fn enemy_bullets_vs_player(&mut self) {
        let circle = self.player.body().circle();
        for index in 0..self.enemy_bullets.len() {
            let bullet = &mut self.enemy_bullets[index];
            if !bullet.body().alive || !circle.collides(&bullet.body().circle()) {
                continue;
            }
            bullet.body_mut().alive = false;
            let (position, vector, power) = (bullet.body().position, bullet.body().vector, bullet.power());

            match self.variant {
                Variant::Arena => {
                    self.player.damage_by(power as f32);
                    let effect = Effect::burst(
                        BurstKind::BulletImpact,
                        position,
                        vector * 0.5,
                        &mut self.rng,
                        self.particles,
                    );
                    self.pending.effects.push(effect);
                }
                Variant::Asteroids => {
                    if self.player.shield_active() {
                        self.pending.effects.push(Effect::impact(position, self.player.body().vector));
                    } else {
                        self.player.kill();
                    }
                }
            }
            if !self.player.alive() {
                return;
            }
        }
    }

    fn enemies_vs_player(&mut self) {
        for index in 0..self.enemies.len() {
            let circle = self.player.body().circle();
            let enemy = &self.enemies[index];
            if !enemy.body().alive || enemy.spawning() || !circle.collides(&enemy.body().circle()) {
                continue;
            }
            let player_vector = self.player.body().vector;

            match self.variant {
                Variant::Arena => {
                    let damage = enemy.stats().player_damage;
                    self.player.damage_by(damage as f32);
                    self.enemies[index].hit(INSTANT_KILL);
                    self.destroy_enemy(index, player_vector, false);
                }
                Variant::Asteroids => {
                    if self.player.shield_active() {
                        self.enemies[index].hit(INSTANT_KILL);
                        self.destroy_enemy(index, player_vector, true);
                    } else {
                        self.player.kill();
                    }
                }
            }
            if !self.player.alive() {
                return;
            }
        }
    }

    fn collectables_vs_player(&mut self) {
        let circle = self.player.body().circle();
        for index in 0..self.collectables.len() {
            let collectable = &mut self.collectables[index];
            if !collectable.body().alive || !circle.collides(&collectable.body().circle()) {
                continue;
            }
            collectable.body_mut().alive = false;
            let collectable = collectable.clone();
            let power_up = self.apply_collectable(&collectable);
            self.events.push(SimEvent::Collected {
                kind: collectable.kind(),
                power_up,
            });
        }
    }

    fn player_killed(&mut self) {
        let body = *self.player.body();
        let effect = match self.variant {
            Variant::Arena => Effect::burst(
                BurstKind::PlayerExplosion,
                body.position,
                body.vector,
                &mut self.rng,
                self.particles,
            ),
            Variant::Asteroids => Effect::ship_explosion(body.position, body.vector),
        };
        self.pending.effects.push(effect);

        self.game.lives = self.game.lives.saturating_sub(1);
        self.game.player_deaths += 1;
        let frame = self.player.killed_on_frame().unwrap_or_default();
        log::debug!("Player destroyed on frame {} ({} lives left)", frame, self.game.lives);
        self.events.push(SimEvent::PlayerKilled {
            frame,
            lives_left: self.game.lives,
        });
    }
}
