//! Cozy Protect headless runner
//!
//! Loads a level (or a level pack) from JSON, draws one scripted shield in
//! front of the mascot and runs the session at a fixed timestep until the
//! level is cleared.
//!
//! Usage: `cozy-protect [level-or-pack.json] [level-id] [settings.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    env_logger::init();
    log::info!("Cozy Protect (headless) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = match args.get(2) {
        Some(path) => cozy_protect::Settings::load(Path::new(path)),
        None => cozy_protect::Settings::default(),
    };

    let level = match args.first() {
        Some(path) => {
            let id = args.get(1).map(String::as_str);
            match cozy_protect::load_level(Path::new(path), id) {
                Ok(level) => level,
                Err(e) => {
                    log::error!("Cannot load {path}: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => runner::sample_level(),
    };

    if let Err(e) = runner::run(level, settings) {
        log::error!("Session failed: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web host drives GameplaySession directly
}

#[cfg(not(target_arch = "wasm32"))]
mod runner {
    use cozy_protect::consts::*;
    use cozy_protect::sim::{GameplaySession, HazardKind, InputEvent, MaterialType};
    use cozy_protect::{HazardDefinition, LevelDefinition, SessionError, Settings};

    /// Seconds of simulated time past the survival target before giving up
    const OVERTIME_SECONDS: f32 = 5.0;

    /// Built-in demo: a rock, a bee and a pot of soup
    pub fn sample_level() -> LevelDefinition {
        LevelDefinition {
            hazards: vec![
                HazardDefinition {
                    kind: HazardKind::Rock,
                    position_x: 5.0,
                    position_y: 12.0,
                },
                HazardDefinition {
                    kind: HazardKind::Bee,
                    position_x: 0.5,
                    position_y: 5.0,
                },
                HazardDefinition {
                    kind: HazardKind::HotSoup,
                    position_x: 8.0,
                    position_y: 1.4,
                },
            ],
            ..LevelDefinition::new("sample", 12, 2)
        }
    }

    fn to_screen(world: glam::Vec2, settings: &Settings) -> (f32, f32) {
        (
            world.x / WORLD_WIDTH * settings.screen_width,
            (1.0 - world.y / WORLD_HEIGHT) * settings.screen_height,
        )
    }

    /// Queue a roof-shaped stroke over the mascot's spawn point
    fn draw_roof(session: &mut GameplaySession) {
        let spawn = glam::Vec2::new(session.level().character_x, session.level().character_y);
        let spawn = if spawn.is_finite() {
            spawn
        } else {
            glam::Vec2::new(DEFAULT_MASCOT_X, DEFAULT_MASCOT_Y)
        };
        let settings = session.settings().clone();
        let stroke = [
            spawn + glam::Vec2::new(-1.5, 1.5),
            spawn + glam::Vec2::new(0.0, 2.5),
            spawn + glam::Vec2::new(1.5, 1.5),
        ];

        let (x, y) = to_screen(stroke[0], &settings);
        session.push_input(InputEvent::down(x, y));
        for point in &stroke[1..] {
            let (x, y) = to_screen(*point, &settings);
            session.push_input(InputEvent::drag(x, y));
        }
        let (x, y) = to_screen(stroke[stroke.len() - 1], &settings);
        session.push_input(InputEvent::up(x, y));
    }

    pub fn run(level: LevelDefinition, settings: Settings) -> Result<(), SessionError> {
        let limit = level.time_to_survive as f32 + OVERTIME_SECONDS;
        let mut session = GameplaySession::new(level, settings)?;

        if session.drawing().allowed().contains(&MaterialType::Stone) {
            session.select_material(MaterialType::Stone);
        }
        draw_roof(&mut session);

        let mut last_second = 0;
        let mut was_in_danger = false;
        while session.elapsed() < limit {
            session.tick(SIM_DT);
            let snap = session.snapshot();

            if snap.in_danger != was_in_danger {
                was_in_danger = snap.in_danger;
                if was_in_danger {
                    log::info!("Mascot is worried at {:.2}s", session.elapsed());
                } else {
                    log::info!("Mascot relaxed at {:.2}s", session.elapsed());
                }
            }

            if snap.elapsed_seconds != last_second {
                last_second = snap.elapsed_seconds;
                log::debug!(
                    "t={}s left={}s shields={} mascot=({:.2}, {:.2})",
                    snap.elapsed_seconds,
                    snap.seconds_left,
                    snap.shields.len(),
                    snap.mascot.x,
                    snap.mascot.y
                );
            }

            if snap.safe && snap.celebrate_seconds >= 1.0 {
                break;
            }
        }

        let snap = session.snapshot();
        log::info!(
            "Level {}: {} after {:.2}s, {} of {} draws used, {} shields standing",
            session.level().id,
            if snap.safe { "cleared" } else { "not cleared" },
            session.elapsed(),
            session.drawing().committed(),
            session.drawing().initial_budget(),
            snap.shields.len()
        );
        if let Ok(json) = serde_json::to_string(&snap) {
            log::debug!("Final snapshot: {json}");
        }
        Ok(())
    }
}
