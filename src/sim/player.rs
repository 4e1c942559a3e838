//! Player ship
//!
//! One ship type per variant:
//! - Arena: eight-way thrust, heading eases toward the stick, fires along an aim
//! - Asteroids: rotate and thrust, energy shield, bombs, upgradable guns

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, Body, TickContext};
use super::bullet::{Bullet, BulletKind};
use super::tick::TickInput;
use super::vector::Kinematics;
use super::weapon::{GunKind, Loadout, Muzzle, RechargeGate};
use crate::consts::INSTANT_KILL;
use crate::{Variant, deg_to_rad};

/// Arena ship tuning
pub mod arena {
    pub const RADIUS: f32 = 20.0;
    pub const ENERGY_INIT: f32 = 100.0;
    pub const MAX_VELOCITY: f32 = 15.0;
    pub const THRUST: f32 = 2.0;
    /// Speed of a primary shot before inheriting ship velocity
    pub const SHOT_SPEED: f32 = 25.0;
    /// Idle velocity damping per tick
    pub const DRAG: f32 = 0.9;
    /// Fraction of the remaining turn applied per tick
    pub const TURN_EASE: f32 = 0.2;
}

/// Asteroid field ship tuning
pub mod asteroids {
    pub const RADIUS: f32 = 10.0;
    pub const SHIELD_RADIUS: f32 = 14.0;
    pub const ENERGY_INIT: f32 = 200.0;
    pub const MAX_VELOCITY: f32 = 10.0;
    pub const THRUST: f32 = 0.55;
    /// Degrees per tick while rotating
    pub const TURN_RATE: f32 = 4.0;
    /// Minimum shield duration in ticks
    pub const SHIELD_PULSE: u32 = 20;
    pub const ENERGY_RECHARGE: f32 = 0.1;
    pub const BOMB_RECHARGE: u64 = 20;
    pub const BOMB_ENERGY: f32 = 40.0;
    pub const BOMB_SPEED: f32 = 6.0;
}

const THRUST_DELAY: u64 = 1;

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    body: Body,
    variant: Variant,
    /// Facing in degrees, 0 is up the screen
    pub heading: f32,
    pub energy: f32,
    pub loadout: Loadout,
    thrust_gate: RechargeGate,
    bomb_gate: RechargeGate,
    shield_counter: u32,
    /// Asteroids: guns keep firing while the shield is up
    pub fire_when_shielded: bool,
    /// Arena: player bullets reflect off walls instead of dissipating
    pub bounce_weapons: bool,
    /// Thrusters fired this tick
    pub engine_thrust: bool,
    frame: u64,
    killed_on_frame: Option<u64>,
}

impl Player {
    pub fn new(variant: Variant, position: Vec2) -> Self {
        let (radius, energy) = match variant {
            Variant::Arena => (arena::RADIUS, arena::ENERGY_INIT),
            Variant::Asteroids => (asteroids::RADIUS, asteroids::ENERGY_INIT),
        };
        Self {
            body: Body::new(position, Vec2::ZERO, radius),
            variant,
            heading: 0.0,
            energy,
            loadout: Self::default_loadout(variant),
            thrust_gate: RechargeGate::new(THRUST_DELAY),
            bomb_gate: RechargeGate::new(asteroids::BOMB_RECHARGE),
            shield_counter: 0,
            fire_when_shielded: false,
            bounce_weapons: false,
            engine_thrust: false,
            frame: 0,
            killed_on_frame: None,
        }
    }

    fn default_loadout(variant: Variant) -> Loadout {
        match variant {
            Variant::Arena => Loadout::with_main(GunKind::ArenaPrimary { bullet_count: 1 }),
            Variant::Asteroids => Loadout::with_main(GunKind::Primary),
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Full energy for this ship
    pub fn energy_max(&self) -> f32 {
        match self.variant {
            Variant::Arena => arena::ENERGY_INIT,
            Variant::Asteroids => asteroids::ENERGY_INIT,
        }
    }

    pub fn alive(&self) -> bool {
        self.body.alive
    }

    pub fn killed_on_frame(&self) -> Option<u64> {
        self.killed_on_frame
    }

    /// Restore energy up to the maximum
    pub fn add_energy(&mut self, amount: f32) {
        self.energy = (self.energy + amount).min(self.energy_max());
    }

    pub fn shield_active(&self) -> bool {
        self.shield_counter > 0 && self.energy > 0.0
    }

    /// Raise the shield for at least one pulse if there is energy for it
    pub fn activate_shield(&mut self) {
        if self.energy > 0.0 {
            self.shield_counter = asteroids::SHIELD_PULSE;
        }
    }

    /// Drain energy; the ship is destroyed when it runs out.
    /// Returns whether this killed the player.
    pub fn damage_by(&mut self, amount: f32) -> bool {
        if !self.body.alive {
            return false;
        }
        self.energy -= amount;
        if self.energy <= 0.0 {
            self.energy = 0.0;
            self.kill();
            return true;
        }
        false
    }

    pub fn kill(&mut self) {
        self.body.alive = false;
        self.killed_on_frame = Some(self.frame);
    }

    /// Bring the ship back at `position`, optionally keeping collected upgrades
    pub fn reset(&mut self, position: Vec2, persist_power_ups: bool) {
        self.body.alive = true;
        self.body.position = position;
        self.body.vector = Vec2::ZERO;
        self.heading = 0.0;
        self.killed_on_frame = None;
        if !persist_power_ups {
            self.loadout = Self::default_loadout(self.variant);
            self.fire_when_shielded = false;
            self.bounce_weapons = false;
        }
        match self.variant {
            Variant::Arena => self.energy = arena::ENERGY_INIT,
            Variant::Asteroids => {
                // respawn under a free shield pulse
                self.energy = asteroids::ENERGY_INIT + asteroids::SHIELD_PULSE as f32;
                self.activate_shield();
                self.body.radius = asteroids::SHIELD_RADIUS;
            }
        }
    }

    fn muzzle(&self, aim_heading: f32, shot_speed: f32) -> Muzzle {
        Muzzle {
            position: self.body.position,
            velocity: self.body.vector,
            heading: aim_heading,
            aim: Vec2::new(0.0, -shot_speed).rotated(deg_to_rad(aim_heading)),
        }
    }

    /// Fire every recharged gun. Asteroid ships cannot fire through their
    /// own shield unless upgraded.
    pub fn fire_primary(&mut self, frame: u64, aim: Option<f32>, rng: &mut impl Rng) -> Vec<Bullet> {
        if !self.body.alive {
            return Vec::new();
        }
        let muzzle = match self.variant {
            Variant::Arena => self.muzzle(aim.unwrap_or(self.heading), arena::SHOT_SPEED),
            Variant::Asteroids => {
                if self.shield_active() && !self.fire_when_shielded {
                    return Vec::new();
                }
                self.muzzle(self.heading, 0.0)
            }
        };
        self.loadout.fire(frame, &muzzle, rng)
    }

    /// Launch a bomb if there is energy to spare and the launcher is recharged
    pub fn fire_secondary(&mut self, frame: u64) -> Option<Bullet> {
        if self.variant != Variant::Asteroids
            || !self.body.alive
            || (self.shield_active() && !self.fire_when_shielded)
            || self.energy <= asteroids::BOMB_ENERGY
        {
            return None;
        }
        if !self.bomb_gate.try_fire(frame) {
            return None;
        }
        self.energy -= asteroids::BOMB_ENERGY;
        let vector = Vec2::new(0.0, -asteroids::BOMB_SPEED).rotated(deg_to_rad(self.heading))
            + self.body.vector;
        Some(Bullet::new(BulletKind::Bomb, self.body.position, vector, self.heading))
    }

    /// Arena thrust toward `angle` degrees, capped at the maximum speed
    pub fn thrust_toward(&mut self, angle: f32, frame: u64) {
        if self.thrust_gate.try_fire(frame) {
            self.body.vector += Vec2::new(0.0, -arena::THRUST).rotated(deg_to_rad(angle));
            let speed = self.body.vector.length();
            if speed > arena::MAX_VELOCITY {
                self.body.vector *= arena::MAX_VELOCITY / speed;
            }
        }
        self.engine_thrust = true;
    }

    /// Asteroids thrust along the heading; ignored if it would exceed the
    /// maximum speed
    pub fn thrust(&mut self, frame: u64) {
        if self.thrust_gate.try_fire(frame) {
            let t = Vec2::new(0.0, -asteroids::THRUST).rotated(deg_to_rad(self.heading));
            if (self.body.vector + t).length() < asteroids::MAX_VELOCITY {
                self.body.vector += t;
            }
        }
        self.engine_thrust = true;
    }

    /// Ease the heading toward the pressed directions and pick a thrust angle
    fn steer_arena(&mut self, input: &TickInput) -> Option<f32> {
        let h = self.heading.rem_euclid(360.0);
        let ease = arena::TURN_EASE;
        if input.left {
            if h > 270.0 || h < 90.0 {
                if h > 270.0 {
                    self.heading -= (h - 270.0) * ease;
                } else {
                    self.heading -= (h + 90.0) * ease;
                }
            } else {
                self.heading += (270.0 - h) * ease;
            }
        }
        if input.right {
            if h < 90.0 || h > 270.0 {
                if h < 90.0 {
                    self.heading += (90.0 - h) * ease;
                } else {
                    self.heading += (h - 90.0) * ease;
                }
            } else {
                self.heading -= (h - 90.0) * ease;
            }
        }
        if input.up {
            if h < 180.0 {
                self.heading -= h * ease;
            } else {
                self.heading += (360.0 - h) * ease;
            }
        }
        if input.down {
            if h < 180.0 {
                self.heading += (180.0 - h) * ease;
            } else {
                self.heading -= (h - 180.0) * ease;
            }
        }

        match (input.left, input.right, input.up, input.down) {
            (true, _, true, _) => Some(315.0),
            (true, _, _, true) => Some(225.0),
            (true, _, _, _) => Some(270.0),
            (_, true, true, _) => Some(45.0),
            (_, true, _, true) => Some(135.0),
            (_, true, _, _) => Some(90.0),
            (_, _, true, _) => Some(0.0),
            (_, _, _, true) => Some(180.0),
            _ => None,
        }
    }

    fn update_arena(&mut self, ctx: &mut TickContext<'_>) {
        match self.steer_arena(ctx.input) {
            Some(angle) => self.thrust_toward(angle, ctx.frame),
            None => self.body.vector *= arena::DRAG,
        }
        if ctx.input.fire {
            let bullets = self.fire_primary(ctx.frame, ctx.input.aim, ctx.rng);
            ctx.spawns.player_bullets.extend(bullets);
        }
    }

    fn update_asteroids(&mut self, ctx: &mut TickContext<'_>) {
        if !self.shield_active() && self.energy < asteroids::ENERGY_INIT {
            self.energy = (self.energy + asteroids::ENERGY_RECHARGE).min(asteroids::ENERGY_INIT);
        }

        let input = ctx.input;
        if input.left {
            self.heading -= asteroids::TURN_RATE;
        }
        if input.right {
            self.heading += asteroids::TURN_RATE;
        }
        if input.up {
            self.thrust(ctx.frame);
        }
        if input.shield {
            self.activate_shield();
        }
        if input.fire {
            let bullets = self.fire_primary(ctx.frame, None, ctx.rng);
            ctx.spawns.player_bullets.extend(bullets);
        }
        if input.bomb
            && let Some(bomb) = self.fire_secondary(ctx.frame)
        {
            ctx.spawns.player_bullets.push(bomb);
        }

        // the shield burns a unit of energy for every tick it is up
        if self.shield_active() {
            self.shield_counter -= 1;
            self.energy -= 1.0;
        }
        self.body.radius = if self.shield_active() {
            asteroids::SHIELD_RADIUS
        } else {
            asteroids::RADIUS
        };
    }
}

impl Actor for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn role(&self) -> ActorRole {
        ActorRole::Player
    }

    fn on_update(&mut self, ctx: &mut TickContext<'_>) {
        self.frame = ctx.frame;
        self.engine_thrust = false;
        if !self.body.alive {
            return;
        }
        match self.variant {
            Variant::Arena => self.update_arena(ctx),
            Variant::Asteroids => self.update_asteroids(ctx),
        }
    }

    fn hit(&mut self, force: i32) -> bool {
        if force == INSTANT_KILL {
            if self.body.alive {
                self.kill();
            }
            return true;
        }
        self.damage_by(force as f32);
        !self.body.alive
    }

    fn heading_mut(&mut self) -> Option<&mut f32> {
        Some(&mut self.heading)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::actor::PlayerView;
    use crate::sim::tick::test_support::run_input;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn view(player: &Player) -> PlayerView {
        PlayerView {
            position: player.body().position,
            vector: player.body().vector,
            alive: player.alive(),
        }
    }

    #[test]
    fn test_arena_thrust_caps_speed() {
        let mut player = Player::new(Variant::Arena, Vec2::new(750.0, 750.0));
        for frame in (2..200).step_by(2) {
            player.thrust_toward(90.0, frame);
        }
        assert!((player.body().vector.length() - arena::MAX_VELOCITY).abs() < 0.001);
        assert!(player.body().vector.x > 14.9);
    }

    #[test]
    fn test_arena_thrust_gated_each_other_frame() {
        let mut player = Player::new(Variant::Arena, Vec2::ZERO);
        player.thrust_toward(0.0, 10);
        player.thrust_toward(0.0, 11);
        assert!((player.body().vector.y + 2.0).abs() < 0.001);
    }

    #[test]
    fn test_arena_idle_drag() {
        let mut player = Player::new(Variant::Arena, Vec2::new(750.0, 750.0));
        player.body_mut().vector = Vec2::new(10.0, 0.0);
        let snapshot = view(&player);
        run_input(10, snapshot, &TickInput::default(), |ctx| player.on_update(ctx));
        assert!((player.body().vector.x - 9.0).abs() < 0.001);
    }

    #[test]
    fn test_arena_heading_eases_right() {
        let mut player = Player::new(Variant::Arena, Vec2::new(750.0, 750.0));
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        let snapshot = view(&player);
        run_input(10, snapshot, &input, |ctx| player.on_update(ctx));
        assert!((player.heading - 18.0).abs() < 0.001);
        assert!(player.engine_thrust);
    }

    #[test]
    fn test_arena_fire_spawns_bullet_along_aim() {
        let mut player = Player::new(Variant::Arena, Vec2::new(750.0, 750.0));
        let input = TickInput {
            fire: true,
            aim: Some(90.0),
            ..Default::default()
        };
        let snapshot = view(&player);
        let ((), spawns) = run_input(10, snapshot, &input, |ctx| player.on_update(ctx));
        assert_eq!(spawns.player_bullets.len(), 1);
        assert!(spawns.player_bullets[0].body().vector.x > 20.0);
    }

    #[test]
    fn test_damage_kills_at_zero_energy() {
        let mut player = Player::new(Variant::Arena, Vec2::ZERO);
        assert!(!player.damage_by(60.0));
        assert!(player.damage_by(60.0));
        assert_eq!(player.energy, 0.0);
        assert!(player.expired());
        assert!(!player.damage_by(10.0));
    }

    #[test]
    fn test_asteroids_shield_blocks_fire_until_upgraded() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = Player::new(Variant::Asteroids, Vec2::new(400.0, 400.0));
        player.activate_shield();
        assert!(player.fire_primary(10, None, &mut rng).is_empty());
        player.fire_when_shielded = true;
        assert_eq!(player.fire_primary(10, None, &mut rng).len(), 1);
    }

    #[test]
    fn test_shield_drains_energy_and_grows_radius() {
        let mut player = Player::new(Variant::Asteroids, Vec2::new(400.0, 400.0));
        let input = TickInput {
            shield: true,
            ..Default::default()
        };
        let snapshot = view(&player);
        run_input(10, snapshot, &input, |ctx| player.on_update(ctx));
        assert!(player.shield_active());
        assert_eq!(player.body().radius, asteroids::SHIELD_RADIUS);
        assert!((player.energy - 199.0).abs() < 0.001);
    }

    #[test]
    fn test_bomb_costs_energy_and_recharges() {
        let mut player = Player::new(Variant::Asteroids, Vec2::ZERO);
        let bomb = player.fire_secondary(30);
        assert!(bomb.is_some_and(|b| b.effect_radius() > 0.0));
        assert!((player.energy - 160.0).abs() < 0.001);
        assert!(player.fire_secondary(40).is_none());
        assert!(player.fire_secondary(51).is_some());
    }

    #[test]
    fn test_asteroids_thrust_respects_speed_limit() {
        let mut player = Player::new(Variant::Asteroids, Vec2::ZERO);
        for frame in (2..400).step_by(2) {
            player.thrust(frame);
        }
        assert!(player.body().vector.length() < asteroids::MAX_VELOCITY);
        assert!(player.body().vector.length() > asteroids::MAX_VELOCITY - asteroids::THRUST);
    }

    #[test]
    fn test_reset_restores_and_optionally_drops_upgrades() {
        let mut player = Player::new(Variant::Asteroids, Vec2::ZERO);
        player.loadout.mount(crate::sim::weapon::Mount::Rear, GunKind::RearGun);
        player.kill();
        player.reset(Vec2::new(400.0, 400.0), true);
        assert!(player.alive());
        assert_eq!(player.loadout.len(), 2);
        assert!(player.shield_active());
        player.reset(Vec2::new(400.0, 400.0), false);
        assert_eq!(player.loadout.len(), 1);
    }
}
