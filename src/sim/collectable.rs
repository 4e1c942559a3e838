//! Collectables
//!
//! Pickups dropped by destroyed enemies. The player collects one by touching
//! it; the scene applies the reward.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, Body, TickContext};

/// Pickup families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectableKind {
    /// Arena: bumps the score multiplier
    Multiplier,
    /// Arena: restores player energy
    EnergyBoost,
    /// Asteroid field: random upgrade rolled on pickup
    PowerUp,
}

impl CollectableKind {
    fn radius(self) -> f32 {
        match self {
            CollectableKind::Multiplier => 10.0,
            CollectableKind::EnergyBoost => 12.0,
            CollectableKind::PowerUp => 8.0,
        }
    }

    /// Ticks before the pickup vanishes; power-ups stay until collected
    fn lifespan(self) -> Option<u32> {
        match self {
            CollectableKind::Multiplier => Some(250),
            CollectableKind::EnergyBoost => Some(350),
            CollectableKind::PowerUp => None,
        }
    }
}

/// Upgrades a power-up can grant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    EnergyBoost,
    FireWhenShielded,
    ExtraLife,
    SlowAsteroids,
    SmartBomb,
    TwinCannons,
    SprayCannons,
    RearGun,
    SideGuns,
}

impl PowerUpKind {
    /// Uniform roll over ten slots; energy boost takes two of them
    pub fn roll(rng: &mut impl Rng) -> Self {
        match rng.random_range(0..=9) {
            0 | 1 => PowerUpKind::EnergyBoost,
            2 => PowerUpKind::FireWhenShielded,
            3 => PowerUpKind::ExtraLife,
            4 => PowerUpKind::SlowAsteroids,
            5 => PowerUpKind::SmartBomb,
            6 => PowerUpKind::TwinCannons,
            7 => PowerUpKind::SprayCannons,
            8 => PowerUpKind::RearGun,
            _ => PowerUpKind::SideGuns,
        }
    }

    /// Announcement text
    pub fn message(self) -> &'static str {
        match self {
            PowerUpKind::EnergyBoost => "Energy Boost!",
            PowerUpKind::FireWhenShielded => "Fire When Shielded!",
            PowerUpKind::ExtraLife => "Extra Life!",
            PowerUpKind::SlowAsteroids => "Slow Down Asteroids!",
            PowerUpKind::SmartBomb => "Smart Bomb!",
            PowerUpKind::TwinCannons => "Twin Cannons!",
            PowerUpKind::SprayCannons => "Spray Cannons!",
            PowerUpKind::RearGun => "Rear Gun!",
            PowerUpKind::SideGuns => "Side Guns!",
        }
    }
}

/// A pickup drifting through the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectable {
    body: Body,
    kind: CollectableKind,
    lifespan: Option<u32>,
}

impl Collectable {
    pub fn new(kind: CollectableKind, position: Vec2, vector: Vec2) -> Self {
        Self {
            body: Body::new(position, vector, kind.radius()),
            kind,
            lifespan: kind.lifespan(),
        }
    }

    pub fn kind(&self) -> CollectableKind {
        self.kind
    }

    pub fn lifespan(&self) -> Option<u32> {
        self.lifespan
    }
}

impl Actor for Collectable {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn role(&self) -> ActorRole {
        ActorRole::Collectable
    }

    fn on_update(&mut self, _ctx: &mut TickContext<'_>) {
        if let Some(remaining) = &mut self.lifespan {
            *remaining = remaining.saturating_sub(1);
        }
    }

    fn expired(&self) -> bool {
        !self.body.alive || self.lifespan == Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::test_support::with_context;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_multiplier_times_out() {
        let mut pickup = Collectable::new(CollectableKind::Multiplier, Vec2::ZERO, Vec2::ZERO);
        with_context(|ctx| {
            for _ in 0..249 {
                pickup.on_update(ctx);
            }
        });
        assert!(!pickup.expired());
        with_context(|ctx| pickup.on_update(ctx));
        assert!(pickup.expired());
    }

    #[test]
    fn test_power_up_never_times_out() {
        let mut pickup = Collectable::new(CollectableKind::PowerUp, Vec2::ZERO, Vec2::ZERO);
        with_context(|ctx| {
            for _ in 0..1000 {
                pickup.on_update(ctx);
            }
        });
        assert!(!pickup.expired());
        assert_eq!(pickup.body().radius, 8.0);
    }

    #[test]
    fn test_power_up_roll_covers_every_kind() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut seen = Vec::new();
        for _ in 0..500 {
            let kind = PowerUpKind::roll(&mut rng);
            if !seen.contains(&kind) {
                seen.push(kind);
            }
        }
        assert_eq!(seen.len(), 9);
    }
}
