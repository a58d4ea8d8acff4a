#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots Jumpy.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use jumpy_assets::{sprite_masks, AssetManifest};
use jumpy_core::WINDOW_TITLE;
use jumpy_highscore::FileHighscoreStore;
use jumpy_rendering::{
    Color, EnemyPresentation, PlayerPresentation, Presentation, RenderingBackend, Scene,
};
use jumpy_rendering_macroquad::MacroquadBackend;
use jumpy_system_session::{Session, SessionConfig};
use jumpy_system_spawning::Config as SpawningConfig;
use jumpy_world::{query, World};
use tracing::info;
use tracing_subscriber::filter::EnvFilter;

/// Endless vertical platformer: bounce upward, dodge the birds, beat your best.
#[derive(Debug, Parser)]
#[command(name = "jumpy", version, about)]
struct Args {
    /// Asset manifest listing every sprite and sound.
    #[arg(long, value_name = "PATH", default_value_os_t = AssetManifest::default_path())]
    assets: PathBuf,
    /// File holding the best score.
    #[arg(long, value_name = "PATH", default_value = "score.txt")]
    highscore: PathBuf,
    /// Seed for platform and enemy generation; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Synchronise presentation with the display refresh rate.
    #[arg(long)]
    vsync: bool,
}

/// Entry point for the Jumpy command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let manifest = AssetManifest::load(&args.assets)?;
    let masks = sprite_masks(&manifest).context("failed to extract collision masks")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, assets = %args.assets.display(), "starting jumpy");

    let config = SessionConfig::new(SpawningConfig::new(seed)).with_masks(masks);
    let mut session = Session::new(
        config,
        Vec::new(),
        FileHighscoreStore::new(args.highscore),
    );

    let mut scene = Scene::default();
    populate_scene(session.world(), &mut scene);
    let presentation = Presentation::new(WINDOW_TITLE, Color::from_rgb_u8(0, 0, 0), scene);

    MacroquadBackend::new(manifest)
        .with_vsync(args.vsync)
        .run(presentation, move |input, scene| {
            let flow = session.frame(&input);
            populate_scene(session.world(), scene);
            scene.sounds.append(session.sounds_mut());
            flow
        })
}

fn populate_scene(world: &World, scene: &mut Scene) {
    scene.state = query::game_state(world);
    scene.backdrop = query::backdrop(world);
    scene.background_offset = query::background_offset(world);
    scene.score = query::score(world);
    scene.highscore = query::highscore(world);

    scene.platforms.clear();
    scene.platforms.extend(query::platforms(world));

    scene.enemies.clear();
    scene
        .enemies
        .extend(query::enemy_view(world).iter().map(|enemy| EnemyPresentation {
            rect: enemy.rect,
            frame: enemy.frame,
            direction: enemy.direction,
        }));

    scene.player = query::player(world).map(|player| PlayerPresentation {
        rect: player.rect,
        facing: player.facing,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use jumpy_core::{Command, GameState, HorizontalDirection};
    use jumpy_world as world;

    #[test]
    fn defaults_match_documented_paths() {
        let args = Args::try_parse_from(["jumpy"]).expect("defaults parse");

        assert_eq!(args.assets, PathBuf::from("assets/manifest.toml"));
        assert_eq!(args.assets, AssetManifest::default_path());
        assert_eq!(args.highscore, PathBuf::from("score.txt"));
        assert_eq!(args.seed, None);
        assert!(!args.vsync);
    }

    #[test]
    fn flags_override_defaults() {
        let args = Args::try_parse_from([
            "jumpy",
            "--assets",
            "custom/manifest.toml",
            "--highscore",
            "best.txt",
            "--seed",
            "42",
            "--vsync",
        ])
        .expect("flags parse");

        assert_eq!(args.assets, PathBuf::from("custom/manifest.toml"));
        assert_eq!(args.highscore, PathBuf::from("best.txt"));
        assert_eq!(args.seed, Some(42));
        assert!(args.vsync);
    }

    #[test]
    fn scene_mirrors_world_state() {
        let mut world = World::new();
        let mut events = Vec::new();
        world::apply(&mut world, Command::StartRun, &mut events);
        world::apply(
            &mut world,
            Command::SpawnPlatform {
                x: 40.0,
                y: 100.0,
                width: 70.0,
            },
            &mut events,
        );
        world::apply(
            &mut world,
            Command::SpawnEnemy {
                center_x: 100.0,
                center_y: 50.0,
                direction: HorizontalDirection::Left,
            },
            &mut events,
        );

        let mut scene = Scene {
            platforms: vec![jumpy_core::Rect::new(0.0, 0.0, 1.0, 1.0); 3],
            ..Scene::default()
        };
        populate_scene(&world, &mut scene);

        assert_eq!(scene.state, GameState::Playing);
        assert_eq!(scene.platforms, query::platforms(&world));
        assert_eq!(scene.enemies.len(), 1);
        assert_eq!(scene.enemies[0].direction, HorizontalDirection::Left);
        assert!(scene.player.is_some());
    }
}
