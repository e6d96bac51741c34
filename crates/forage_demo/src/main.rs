//! Headless foraging demo
//!
//! Usage: `forage_demo [config.toml|config.ron]`

mod calories;
mod config;
mod error;
mod player;
mod scene;

use collision_engine::config::Config;

use crate::config::DemoConfig;
use crate::scene::Scene;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    collision_engine::foundation::logging::init();

    log::info!("Starting forage demo");

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading configuration from {}", path);
            DemoConfig::load_from_file(&path)?
        }
        None => DemoConfig::default(),
    };

    let mut scene = Scene::new(config)?;
    let summary = scene.run();

    log::info!(
        "Finished {} frames: {} pickup(s), {} jump(s), {} walk event(s), {} correction(s)",
        summary.frames,
        summary.pickups,
        summary.jumps,
        summary.walks,
        summary.corrections
    );
    log::info!("Calories: {:.2} kcal", summary.calories);

    log::info!("{} entities in world", scene.world().len());
    for (name, entity) in [("Player", scene.player()), ("NPC", scene.npc()), ("Food", scene.food())] {
        log::info!(
            "{} at {:?}, {} broad-phase candidate(s)",
            name,
            scene.position(entity),
            scene.collisions().candidate_count(entity).unwrap_or(0)
        );
    }

    Ok(())
}
