//! Weapons and fire-rate gating
//!
//! A [`RechargeGate`] is the READY/COOLING state machine shared by player
//! guns, the bomb launcher, thrusters and enemy cannons. It reads only the
//! simulation frame counter.

use std::collections::BTreeMap;
use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bullet::{Bullet, BulletKind};
use super::vector::Kinematics;
use crate::{deg_to_rad, rad_to_deg};

/// Fire-rate gate state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RechargeState {
    Ready,
    Cooling,
}

/// Frame-gated trigger.
///
/// READY when `frame - last_fired > recharge_time`. Firing while COOLING is
/// a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RechargeGate {
    recharge_time: u64,
    last_fired: u64,
}

impl RechargeGate {
    pub fn new(recharge_time: u64) -> Self {
        Self {
            recharge_time,
            last_fired: 0,
        }
    }

    pub fn state(&self, frame: u64) -> RechargeState {
        if frame.saturating_sub(self.last_fired) > self.recharge_time {
            RechargeState::Ready
        } else {
            RechargeState::Cooling
        }
    }

    pub fn is_ready(&self, frame: u64) -> bool {
        self.state(frame) == RechargeState::Ready
    }

    /// Fire if ready, recording `frame`. Returns whether it fired.
    pub fn try_fire(&mut self, frame: u64) -> bool {
        if self.is_ready(frame) {
            self.last_fired = frame;
            true
        } else {
            false
        }
    }

    pub fn recharge_time(&self) -> u64 {
        self.recharge_time
    }

    pub fn last_fired(&self) -> u64 {
        self.last_fired
    }
}

/// Where a gun is mounted on the player ship. Guns fire in mount order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Mount {
    Main,
    Rear,
    Side,
}

/// Gun patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GunKind {
    /// Arena gun firing along an aim vector; more than one bullet fans out
    ArenaPrimary { bullet_count: u32 },
    /// Single forward shot
    Primary,
    /// Single forward double-power shot
    TwinCannons,
    /// Three shots at -15, 0 and +15 degrees
    VSpray,
    /// One short-lived shot backwards
    RearGun,
    /// Two short-lived shots at -90 and +90 degrees
    SideGuns,
}

impl GunKind {
    pub fn recharge_time(self) -> u64 {
        match self {
            GunKind::ArenaPrimary { .. } => 5,
            GunKind::Primary | GunKind::TwinCannons => 3,
            GunKind::VSpray | GunKind::RearGun | GunKind::SideGuns => 5,
        }
    }
}

/// Firing origin taken from the ship
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Muzzle {
    pub position: Vec2,
    /// Ship velocity, inherited by every bullet
    pub velocity: Vec2,
    /// Ship heading in degrees
    pub heading: f32,
    /// Arena shot velocity before inheritance
    pub aim: Vec2,
}

/// A mounted gun with its own recharge gate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: GunKind,
    gate: RechargeGate,
}

impl Weapon {
    pub fn new(kind: GunKind) -> Self {
        Self {
            kind,
            gate: RechargeGate::new(kind.recharge_time()),
        }
    }

    pub fn gate(&self) -> &RechargeGate {
        &self.gate
    }

    /// Fire if recharged. Returns the bullets produced (empty while cooling).
    pub fn fire(&mut self, frame: u64, muzzle: &Muzzle, rng: &mut impl Rng) -> Vec<Bullet> {
        if !self.gate.try_fire(frame) {
            return Vec::new();
        }
        match self.kind {
            GunKind::ArenaPrimary { bullet_count } => arena_spread(bullet_count, muzzle, rng),
            GunKind::Primary => vec![forward_shot(BulletKind::Shot, muzzle, 0.0, 8.0)],
            GunKind::TwinCannons => vec![forward_shot(BulletKind::HeavyShot, muzzle, 0.0, 8.0)],
            GunKind::VSpray => [-15.0, 0.0, 15.0]
                .into_iter()
                .map(|offset| forward_shot(BulletKind::Shot, muzzle, offset, 7.0))
                .collect(),
            GunKind::RearGun => {
                vec![forward_shot(BulletKind::Shot, muzzle, 180.0, 8.0).with_lifespan(25)]
            }
            GunKind::SideGuns => [-90.0, 90.0]
                .into_iter()
                .map(|offset| forward_shot(BulletKind::Shot, muzzle, offset, 8.0).with_lifespan(25))
                .collect(),
        }
    }
}

/// Shot at `heading + offset` degrees with the given speed plus ship velocity
fn forward_shot(kind: BulletKind, muzzle: &Muzzle, offset: f32, speed: f32) -> Bullet {
    let heading = muzzle.heading + offset;
    let vector = Vec2::new(0.0, -speed).rotated(deg_to_rad(heading)) + muzzle.velocity;
    Bullet::new(kind, muzzle.position, vector, heading)
}

/// Arena fan: `count` bullets randomly spread across `(count - 1) * π/16`,
/// centred on the aim vector, each with a ±5% speed jitter.
fn arena_spread(count: u32, muzzle: &Muzzle, rng: &mut impl Rng) -> Vec<Bullet> {
    let count = count.max(1);
    let total = if count > 2 {
        rng.random_range(count - 1..=count)
    } else {
        count
    };
    let spread = (count - 1) as f32;

    (0..total)
        .map(|_| {
            let offset = if count > 1 {
                rng.random::<f32>() * (PI / 16.0) * spread
            } else {
                0.0
            };
            let angle = offset - (PI / 32.0) * spread;
            let jitter = 1.0 + rng.random::<f32>() * 0.1 - 0.05;
            let vector = muzzle.aim.rotated(angle) * jitter + muzzle.velocity;
            Bullet::new(
                BulletKind::ArenaShot,
                muzzle.position,
                vector,
                muzzle.heading + rad_to_deg(angle),
            )
        })
        .collect()
}

/// Guns carried by a ship, keyed by mount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loadout {
    guns: BTreeMap<Mount, Weapon>,
}

impl Loadout {
    /// A loadout holding only `kind` on the main mount
    pub fn with_main(kind: GunKind) -> Self {
        let mut guns = BTreeMap::new();
        guns.insert(Mount::Main, Weapon::new(kind));
        Self { guns }
    }

    /// Install a gun, replacing whatever occupied the mount
    pub fn mount(&mut self, mount: Mount, kind: GunKind) {
        self.guns.insert(mount, Weapon::new(kind));
    }

    pub fn get(&self, mount: Mount) -> Option<&Weapon> {
        self.guns.get(&mount)
    }

    pub fn len(&self) -> usize {
        self.guns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guns.is_empty()
    }

    /// Fire every recharged gun in mount order
    pub fn fire(&mut self, frame: u64, muzzle: &Muzzle, rng: &mut impl Rng) -> Vec<Bullet> {
        let mut bullets = Vec::new();
        for weapon in self.guns.values_mut() {
            bullets.extend(weapon.fire(frame, muzzle, rng));
        }
        bullets
    }
}
