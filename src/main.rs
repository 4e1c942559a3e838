//! Arcade Sim headless driver
//!
//! Runs a scripted scene for a number of ticks and prints a JSON run report.
//!
//! Usage: `arcade-sim [asteroids|arena] [ticks] [--config path]`

#[cfg(not(target_arch = "wasm32"))]
mod driver {
    use arcade_sim::sim::{
        ActorCounts, EnemyKind, Scene, SimClock, SimEvent, TickInput, advance,
    };
    use arcade_sim::{Settings, SettingsError, Variant};
    use serde::Serialize;

    const DEFAULT_TICKS: u64 = 1000;
    /// Frames a destroyed player waits before respawning
    const RESPAWN_DELAY: u64 = 30;

    /// Summary printed at the end of a run
    #[derive(Debug, Serialize)]
    pub struct RunReport {
        pub variant: Variant,
        pub seed: u64,
        pub ticks: u64,
        pub score: u64,
        pub enemies_destroyed: u64,
        pub player_deaths: u32,
        pub lives: u32,
        pub counts: ActorCounts,
    }

    struct Args {
        variant: Option<Variant>,
        ticks: u64,
        config: Option<String>,
    }

    fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, SettingsError> {
        let mut parsed = Args {
            variant: None,
            ticks: DEFAULT_TICKS,
            config: None,
        };
        while let Some(arg) = args.next() {
            if arg == "--config" {
                parsed.config = Some(args.next().ok_or(SettingsError::Invalid {
                    field: "config",
                    reason: "--config needs a path".to_string(),
                })?);
            } else if let Some(variant) = Variant::from_str(&arg) {
                parsed.variant = Some(variant);
            } else if let Ok(ticks) = arg.parse() {
                parsed.ticks = ticks;
            } else {
                return Err(SettingsError::Invalid {
                    field: "args",
                    reason: format!("unrecognised argument `{arg}`"),
                });
            }
        }
        Ok(parsed)
    }

    /// Scripted intents: sweep the guns around while firing
    fn script_input(variant: Variant, frame: u64) -> TickInput {
        match variant {
            Variant::Asteroids => TickInput {
                right: true,
                up: frame % 90 < 20,
                fire: true,
                bomb: frame % 150 == 0,
                shield: frame % 200 < 10,
                ..Default::default()
            },
            Variant::Arena => {
                let leg = (frame / 60) % 4;
                TickInput {
                    up: leg == 0,
                    right: leg == 1,
                    down: leg == 2,
                    left: leg == 3,
                    fire: true,
                    aim: Some((frame * 8 % 360) as f32),
                    ..Default::default()
                }
            }
        }
    }

    fn spawn_wave(scene: &mut Scene, wave: u64, batch: usize) {
        for i in 0..batch {
            match scene.variant {
                Variant::Arena => {
                    let kind = EnemyKind::ARENA[(wave as usize + i) % EnemyKind::ARENA.len()];
                    scene.spawn_enemy(kind);
                }
                Variant::Asteroids => {
                    let size = ((wave as usize + i) % 4 + 1) as u8;
                    scene.spawn_asteroid(size, 1.5);
                }
            }
        }
        if scene.variant == Variant::Asteroids && wave % 4 == 3 {
            scene.spawn_saucer(wave % 8 == 7);
        }
    }

    pub fn run(args: impl Iterator<Item = String>) -> Result<RunReport, SettingsError> {
        let args = parse_args(args)?;
        let settings = match (&args.config, args.variant) {
            (Some(path), variant) => {
                let settings = Settings::load(path)?;
                if let Some(variant) = variant.filter(|v| *v != settings.variant) {
                    log::warn!(
                        "Config is for {}, command line asks for {}; using the config's world",
                        settings.variant.as_str(),
                        variant.as_str()
                    );
                }
                settings
            }
            (None, variant) => Settings::from_variant(variant.unwrap_or_default()),
        };
        settings.validate()?;

        let mut scene = Scene::new(&settings);
        let mut clock = SimClock::new();
        let mut wave = 0;

        for _ in 0..args.ticks {
            let frame = clock.frame();
            if settings.spawn_interval > 0 && frame > 0 && frame % settings.spawn_interval == 0 {
                spawn_wave(&mut scene, wave, settings.spawn_batch);
                wave += 1;
            }

            if let Some(killed) = scene.player.killed_on_frame()
                && frame >= killed + RESPAWN_DELAY
                && scene.game.lives > 0
            {
                scene.reset_player(true);
            }

            advance(&mut scene, &mut clock, &script_input(settings.variant, frame));

            for event in scene.drain_events() {
                if let SimEvent::PlayerKilled { frame, lives_left } = event {
                    log::info!("Player destroyed on frame {frame}, {lives_left} lives left");
                }
            }
            if frame > 0 && frame % 500 == 0 {
                log::info!(
                    "Frame {}: score {}, {} enemies",
                    frame,
                    scene.game.score,
                    scene.enemies.len()
                );
            }
            if scene.game.lives == 0 {
                log::info!("Game over on frame {}", frame);
                break;
            }
        }

        Ok(RunReport {
            variant: settings.variant,
            seed: settings.seed,
            ticks: clock.frame(),
            score: scene.game.score,
            enemies_destroyed: scene.game.enemies_destroyed,
            player_deaths: scene.game.player_deaths,
            lives: scene.game.lives,
            counts: scene.counts(),
        })
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Arcade Sim starting...");

    match driver::run(std::env::args().skip(1)) {
        Ok(report) => match serde_json::to_string_pretty(&report) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no headless driver there
}
