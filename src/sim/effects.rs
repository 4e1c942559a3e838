//! Transient visual effects
//!
//! Effects never collide. Each one counts down an integer lifespan and is
//! removed on the tick the counter reaches zero:
//! - [`ParticleEmitter`]: a burst of particles, expired once every particle has
//! - [`FadeEffect`]: a single timed effect (explosion ring, text indicator)

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::actor::{Actor, ActorRole, Body, TickContext};
use super::vector::Kinematics;

/// Particle shapes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ParticleShape {
    Dot,
    /// A spinning line segment
    Line { rotation: f32, spin: f32 },
    Smudge,
}

/// One particle inside an emitter
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub vector: Vec2,
    pub size: f32,
    pub shape: ParticleShape,
    lifespan: u32,
    fade_length: u32,
}

impl Particle {
    pub fn new(
        position: Vec2,
        vector: Vec2,
        size: f32,
        shape: ParticleShape,
        lifespan: u32,
        fade_length: u32,
    ) -> Self {
        Self {
            position,
            vector,
            size,
            shape,
            lifespan: lifespan.max(1),
            fade_length,
        }
    }

    fn line(position: Vec2, vector: Vec2, size: f32, lifespan: u32, rng: &mut impl Rng) -> Self {
        let shape = ParticleShape::Line {
            rotation: rng.random::<f32>() * TAU,
            spin: rng.random::<f32>() - 0.5,
        };
        Self::new(position, vector, size, shape, lifespan, 15)
    }

    /// Advance one tick. Returns false on the tick the lifespan reaches zero.
    pub fn update(&mut self) -> bool {
        debug_assert!(self.lifespan > 0, "particle updated after expiry");
        self.position += self.vector;
        if let ParticleShape::Line { rotation, spin } = &mut self.shape {
            *rotation += *spin;
        }
        self.lifespan = self.lifespan.saturating_sub(1);
        self.lifespan != 0
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    /// Opacity for renderers: fades linearly over the last `fade_length` ticks
    pub fn alpha(&self) -> f32 {
        if self.lifespan < self.fade_length {
            self.lifespan as f32 / self.fade_length as f32
        } else {
            1.0
        }
    }
}

/// Particle burst patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BurstKind {
    /// Enemy destroyed; `large` enemies throw longer debris lines
    EnemyExplosion { large: bool },
    /// Enemy damaged but not destroyed
    EnemyImpact,
    /// Bullet dissipating against an arena wall
    BulletImpact,
    PlayerExplosion,
}

/// An effect actor owning a burst of particles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticleEmitter {
    body: Body,
    kind: BurstKind,
    particles: Vec<Particle>,
}

impl ParticleEmitter {
    pub fn new(kind: BurstKind, position: Vec2, vector: Vec2, rng: &mut impl Rng) -> Self {
        let particles = match kind {
            BurstKind::EnemyExplosion { large } => (0..16)
                .map(|_| explosion_particle(position, vector, large, rng))
                .collect(),
            BurstKind::EnemyImpact => (0..5)
                .map(|_| {
                    let speed = rng.random_range(5..=9) as f32;
                    let speed = if rng.random::<f32>() < 0.5 { -speed } else { speed };
                    let t = Vec2::new(0.0, speed).rotated(rng.random::<f32>() * PI / 2.0 - PI / 4.0)
                        + vector;
                    let size = rng.random_range(0..=3) as f32;
                    Particle::new(position, t, size, ParticleShape::Dot, 15, 10)
                })
                .collect(),
            BurstKind::BulletImpact => (0..3)
                .map(|_| {
                    let t = vector.rotated(rng.random::<f32>() * PI / 8.0);
                    let size = rng.random_range(0..=3) as f32;
                    Particle::new(position, t, size, ParticleShape::Dot, 15, 10)
                })
                .collect(),
            BurstKind::PlayerExplosion => (0..20)
                .map(|_| {
                    let pos = jitter(position, rng);
                    if rng.random::<bool>() {
                        let t = radial(rng.random_range(5..=8) as f32, rng) + vector;
                        let size = rng.random::<f32>() * 5.0 + 5.0;
                        Particle::line(pos, t, size, 25, rng)
                    } else {
                        let t = radial(rng.random_range(5..=10) as f32, rng) + vector;
                        let size = rng.random_range(4..=7) as f32;
                        Particle::new(pos, t, size, ParticleShape::Smudge, 25, 15)
                    }
                })
                .collect(),
        };
        Self {
            body: Body::new(position, vector, 0.0),
            kind,
            particles,
        }
    }

    /// An emitter with no particles (particle effects disabled)
    pub fn silent(kind: BurstKind, position: Vec2, vector: Vec2) -> Self {
        Self {
            body: Body::new(position, vector, 0.0),
            kind,
            particles: Vec::new(),
        }
    }

    pub fn kind(&self) -> BurstKind {
        self.kind
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }
}

fn jitter(position: Vec2, rng: &mut impl Rng) -> Vec2 {
    position
        + Vec2::new(
            rng.random_range(-5..=5) as f32,
            rng.random_range(-5..=5) as f32,
        )
}

fn radial(speed: f32, rng: &mut impl Rng) -> Vec2 {
    Vec2::new(0.0, speed).rotated(rng.random::<f32>() * TAU)
}

fn explosion_particle(position: Vec2, vector: Vec2, large: bool, rng: &mut impl Rng) -> Particle {
    let pos = jitter(position, rng);
    match rng.random_range(0..=2) {
        0 => {
            let t = radial(rng.random_range(20..=25) as f32, rng) + vector;
            let size = rng.random_range(0..=3) as f32;
            Particle::new(pos, t, size, ParticleShape::Dot, 20, 15)
        }
        1 => {
            let t = radial(rng.random_range(5..=10) as f32, rng) + vector;
            let size = if large {
                rng.random::<f32>() * 10.0 + 10.0
            } else {
                rng.random::<f32>() * 5.0 + 5.0
            };
            Particle::line(pos, t, size, 20, rng)
        }
        _ => {
            let t = radial(rng.random_range(2..=4) as f32, rng) + vector;
            let size = rng.random_range(4..=7) as f32;
            Particle::new(pos, t, size, ParticleShape::Smudge, 20, 15)
        }
    }
}

impl Actor for ParticleEmitter {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn role(&self) -> ActorRole {
        ActorRole::Effect
    }

    fn on_update(&mut self, _ctx: &mut TickContext<'_>) {
        self.particles.retain_mut(Particle::update);
    }

    fn expired(&self) -> bool {
        self.particles.is_empty()
    }
}

/// Single timed effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FadeKind {
    /// Expanding ring sized from an asteroid size class
    Explosion { size: f32 },
    ShipExplosion,
    Impact,
    /// Floating text such as a score or power-up name
    Text { message: String },
}

/// A timed effect that disappears when its lifespan runs out
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeEffect {
    body: Body,
    pub kind: FadeKind,
    lifespan: u32,
    fade_length: u32,
}

/// Default lifetime of floating text
pub const TEXT_FADE_LENGTH: u32 = 16;

impl FadeEffect {
    pub fn new(kind: FadeKind, position: Vec2, vector: Vec2, lifespan: u32) -> Self {
        let lifespan = lifespan.max(1);
        Self {
            body: Body::new(position, vector, 0.0),
            kind,
            lifespan,
            fade_length: lifespan,
        }
    }

    pub fn lifespan(&self) -> u32 {
        self.lifespan
    }

    pub fn alpha(&self) -> f32 {
        self.lifespan as f32 / self.fade_length as f32
    }
}

impl Actor for FadeEffect {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn role(&self) -> ActorRole {
        ActorRole::Effect
    }

    fn on_update(&mut self, _ctx: &mut TickContext<'_>) {
        debug_assert!(self.lifespan > 0, "effect updated after expiry");
        self.lifespan = self.lifespan.saturating_sub(1);
    }

    fn expired(&self) -> bool {
        self.lifespan == 0
    }
}

/// Any effect actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Effect {
    Burst(ParticleEmitter),
    Fade(FadeEffect),
}

impl Effect {
    /// Particle burst, or an empty emitter when particles are disabled
    pub fn burst(
        kind: BurstKind,
        position: Vec2,
        vector: Vec2,
        rng: &mut impl Rng,
        particles: bool,
    ) -> Self {
        if particles {
            Effect::Burst(ParticleEmitter::new(kind, position, vector, rng))
        } else {
            Effect::Burst(ParticleEmitter::silent(kind, position, vector))
        }
    }

    /// Asteroid explosion ring
    pub fn explosion(position: Vec2, vector: Vec2, size: f32) -> Self {
        Effect::Fade(FadeEffect::new(FadeKind::Explosion { size }, position, vector, 10))
    }

    pub fn ship_explosion(position: Vec2, vector: Vec2) -> Self {
        Effect::Fade(FadeEffect::new(FadeKind::ShipExplosion, position, vector, 15))
    }

    pub fn impact(position: Vec2, vector: Vec2) -> Self {
        Effect::Fade(FadeEffect::new(FadeKind::Impact, position, vector, 12))
    }

    pub fn text(position: Vec2, vector: Vec2, message: impl Into<String>, fade_length: u32) -> Self {
        let kind = FadeKind::Text {
            message: message.into(),
        };
        Effect::Fade(FadeEffect::new(kind, position, vector, fade_length))
    }

    pub fn score(position: Vec2, vector: Vec2, score: u64) -> Self {
        Self::text(position, vector, score.to_string(), TEXT_FADE_LENGTH)
    }

    fn inner(&self) -> &dyn Actor {
        match self {
            Effect::Burst(emitter) => emitter,
            Effect::Fade(fade) => fade,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Actor {
        match self {
            Effect::Burst(emitter) => emitter,
            Effect::Fade(fade) => fade,
        }
    }
}

impl Actor for Effect {
    fn body(&self) -> &Body {
        self.inner().body()
    }

    fn body_mut(&mut self) -> &mut Body {
        self.inner_mut().body_mut()
    }

    fn role(&self) -> ActorRole {
        ActorRole::Effect
    }

    fn on_update(&mut self, ctx: &mut TickContext<'_>) {
        self.inner_mut().on_update(ctx);
    }

    fn expired(&self) -> bool {
        self.inner().expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::test_support::with_context;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_particle_lives_exactly_lifespan_updates() {
        let mut particle = Particle::new(Vec2::ZERO, Vec2::new(1.0, 0.0), 2.0, ParticleShape::Dot, 3, 2);
        assert!(particle.update());
        assert!(particle.update());
        assert!(!particle.update());
        assert_eq!(particle.position, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_particle_alpha_fades_in_tail() {
        let mut particle = Particle::new(Vec2::ZERO, Vec2::ZERO, 1.0, ParticleShape::Dot, 20, 10);
        assert_eq!(particle.alpha(), 1.0);
        for _ in 0..15 {
            particle.update();
        }
        assert!((particle.alpha() - 0.5).abs() < 0.001);
    }

    #[test]
    fn test_emitter_expires_when_all_particles_gone() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut emitter =
            ParticleEmitter::new(BurstKind::BulletImpact, Vec2::ZERO, Vec2::new(2.0, 0.0), &mut rng);
        assert_eq!(emitter.particles().len(), 3);
        with_context(|ctx| {
            for _ in 0..14 {
                emitter.on_update(ctx);
                assert!(!emitter.expired());
            }
            emitter.on_update(ctx);
        });
        assert!(emitter.expired());
    }

    #[test]
    fn test_burst_sizes() {
        let mut rng = Pcg32::seed_from_u64(5);
        let explosion = ParticleEmitter::new(
            BurstKind::EnemyExplosion { large: true },
            Vec2::ZERO,
            Vec2::ZERO,
            &mut rng,
        );
        assert_eq!(explosion.particles().len(), 16);
        let player = ParticleEmitter::new(BurstKind::PlayerExplosion, Vec2::ZERO, Vec2::ZERO, &mut rng);
        assert_eq!(player.particles().len(), 20);
    }

    #[test]
    fn test_silent_burst_expires_immediately() {
        let mut rng = Pcg32::seed_from_u64(5);
        let effect = Effect::burst(BurstKind::EnemyImpact, Vec2::ZERO, Vec2::ZERO, &mut rng, false);
        assert!(effect.expired());
    }

    #[test]
    fn test_text_fade_counts_down() {
        let mut effect = Effect::score(Vec2::ZERO, Vec2::new(0.0, -5.0), 150);
        with_context(|ctx| {
            for _ in 0..TEXT_FADE_LENGTH - 1 {
                effect.on_update(ctx);
            }
        });
        assert!(!effect.expired());
        with_context(|ctx| effect.on_update(ctx));
        assert!(effect.expired());
        if let Effect::Fade(fade) = &effect {
            assert_eq!(fade.kind, FadeKind::Text { message: "150".into() });
        }
    }
}
