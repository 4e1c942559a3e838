//! Fixed timestep simulation tick
//!
//! One call to [`advance`] runs a complete frame:
//! 1. `on_update` for every actor, list by list (background to foreground)
//! 2. expired actors are dropped, survivors integrate `position += vector`
//! 3. the scene's boundary policy corrects the new position
//! 4. collisions are resolved
//! 5. actors spawned during the tick are appended to their lists
//!
//! Removal is stable filtering, so no actor is ever skipped.

use serde::{Deserialize, Serialize};

use super::actor::{Actor, TickContext};
use super::clock::SimClock;
use super::collision::Circle;
use super::effects::{BurstKind, Effect};
use super::scene::Scene;
use super::world::{BoundaryOutcome, BoundaryPolicy, World};
use crate::Variant;

/// Input intents for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Fire the primary weapons
    pub fire: bool,
    /// Asteroids: launch a bomb
    pub bomb: bool,
    /// Asteroids: raise the shield
    pub shield: bool,
    /// Arena: firing direction in degrees (mouse/stick), defaults to heading
    pub aim: Option<f32>,
}

/// Advance the scene by one tick and step the clock
pub fn advance(scene: &mut Scene, clock: &mut SimClock, input: &TickInput) {
    if scene.variant == Variant::Arena {
        scene.world.follow(scene.player.body().position);
    }

    let threats: Vec<Circle> = scene
        .player_bullets
        .iter()
        .map(|bullet| bullet.body().circle())
        .collect();
    let player_view = scene.player_view();
    let bounce = scene.player.bounce_weapons;

    {
        let Scene {
            world,
            boundary,
            enemies,
            player_bullets,
            enemy_bullets,
            effects,
            collectables,
            player,
            rng,
            pending,
            particles,
            ..
        } = scene;
        let boundary: &dyn BoundaryPolicy = &**boundary;

        let mut ctx = TickContext {
            frame: clock.frame(),
            rng,
            input,
            player: player_view,
            threats: &threats,
            spawns: pending,
            particles: *particles,
        };

        update_list(enemies, &mut ctx, world, boundary, bounce);
        update_list(player_bullets, &mut ctx, world, boundary, bounce);
        update_list(enemy_bullets, &mut ctx, world, boundary, bounce);
        update_list(effects, &mut ctx, world, boundary, bounce);
        update_list(collectables, &mut ctx, world, boundary, bounce);

        // the player is never removed; a dead ship simply stops moving
        player.on_update(&mut ctx);
        if !player.expired() {
            integrate(player);
            boundary.apply(world, player, bounce);
        }
    }

    scene.resolve_collisions();
    scene.apply_spawns();
    clock.tick();
}

#[inline]
fn integrate(actor: &mut dyn Actor) {
    let body = actor.body_mut();
    body.position += body.vector;
}

fn update_list<A: Actor + 'static>(
    actors: &mut Vec<A>,
    ctx: &mut TickContext<'_>,
    world: &World,
    boundary: &dyn BoundaryPolicy,
    bounce: bool,
) {
    actors.retain_mut(|actor| {
        actor.on_update(ctx);
        if actor.expired() {
            return false;
        }
        integrate(actor);
        match boundary.apply(world, actor, bounce) {
            BoundaryOutcome::Keep => true,
            BoundaryOutcome::Dissipate { position, vector } => {
                let impact =
                    Effect::burst(BurstKind::BulletImpact, position, vector, ctx.rng, ctx.particles);
                ctx.spawns.effects.push(impact);
                false
            }
        }
    });
}

/// Hand-built tick contexts for unit tests of individual actors
#[cfg(test)]
pub(crate) mod test_support {
    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use super::TickInput;
    use crate::sim::actor::{PlayerView, Spawns, TickContext};
    use crate::sim::collision::Circle;

    const TEST_SEED: u64 = 0x5eed;

    fn run_full<R>(
        frame: u64,
        player: PlayerView,
        input: &TickInput,
        threats: &[Circle],
        f: impl FnOnce(&mut TickContext<'_>) -> R,
    ) -> (R, Spawns) {
        let mut rng = Pcg32::seed_from_u64(TEST_SEED);
        let mut spawns = Spawns::default();
        let result = {
            let mut ctx = TickContext {
                frame,
                rng: &mut rng,
                input,
                player,
                threats,
                spawns: &mut spawns,
                particles: true,
            };
            f(&mut ctx)
        };
        (result, spawns)
    }

    /// Run `f` with player intents; returns what `f` returns and whatever
    /// it spawned
    pub fn run_input<R>(
        frame: u64,
        player: PlayerView,
        input: &TickInput,
        f: impl FnOnce(&mut TickContext<'_>) -> R,
    ) -> (R, Spawns) {
        run_full(frame, player, input, &[], f)
    }

    /// Idle input at `frame` with the player at `player` and the given
    /// player bullet circles
    pub fn run_with<R>(
        frame: u64,
        player: PlayerView,
        threats: &[Circle],
        f: impl FnOnce(&mut TickContext<'_>) -> R,
    ) -> (R, Spawns) {
        run_full(frame, player, &TickInput::default(), threats, f)
    }

    /// Idle context at frame 1 with the player parked at the origin
    pub fn with_context<R>(f: impl FnOnce(&mut TickContext<'_>) -> R) -> R {
        let player = PlayerView {
            position: Vec2::ZERO,
            vector: Vec2::ZERO,
            alive: true,
        };
        run_with(1, player, &[], f).0
    }
}
