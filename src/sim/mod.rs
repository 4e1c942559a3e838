//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Frame-counted timing only (no wall clock)
//! - Seeded RNG only
//! - Stable iteration order within each actor list
//! - No rendering or platform dependencies

pub mod actor;
pub mod bullet;
pub mod clock;
pub mod collectable;
pub mod collision;
pub mod effects;
pub mod enemy;
pub mod player;
pub mod scene;
pub mod tick;
pub mod vector;
pub mod weapon;
pub mod world;

pub use actor::{Actor, ActorRole, Body, PlayerView, Spawns, TickContext};
pub use bullet::{Bullet, BulletKind, BulletOwner};
pub use clock::SimClock;
pub use collectable::{Collectable, CollectableKind, PowerUpKind};
pub use collision::{BulletHit, Circle, circles_collide, detect_bullet_hits};
pub use effects::{BurstKind, Effect, FadeKind, Particle, ParticleEmitter};
pub use enemy::{Enemy, EnemyKind, EnemyStats};
pub use player::Player;
pub use scene::{ActorCounts, GameStats, Scene, SimEvent};
pub use tick::{TickInput, advance};
pub use vector::Kinematics;
pub use weapon::{GunKind, Loadout, Mount, RechargeGate, RechargeState, Weapon};
pub use world::{BoundaryOutcome, BoundaryPolicy, BoundedReflect, ToroidalWrap, World};
