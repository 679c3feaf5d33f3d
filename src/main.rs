//! Collision Playground entry point
//!
//! Runs the scene headless at 60 frames per second and logs what happens.

use std::path::PathBuf;

use clap::Parser;
use collision_playground::renderer::{Vertex, Viewport, frame_vertices};
use collision_playground::{Scene, SceneConfig, SceneEvent, SceneResult};

/// Frame delta fed to the scene
const FRAME_DT: f32 = 1.0 / 60.0;

#[derive(Parser, Debug)]
#[command(
    name = "collision-playground",
    about = "Bounce a ball through a block grid and log the contacts",
    version
)]
struct Args {
    /// Scene config JSON; defaults are used when omitted
    config: Option<PathBuf>,

    /// Simulated run length in seconds
    #[arg(long, default_value_t = 30.0, value_parser = parse_seconds)]
    seconds: f32,
}

fn parse_seconds(s: &str) -> Result<f32, String> {
    let seconds: f32 = s.parse().map_err(|e| format!("{e}"))?;
    if seconds.is_finite() && seconds > 0.0 {
        Ok(seconds)
    } else {
        Err(format!("seconds must be positive, got {seconds}"))
    }
}

fn run(args: Args) -> SceneResult<()> {
    let config = match &args.config {
        Some(path) => SceneConfig::load(path)?,
        None => {
            log::info!("Using default scene config");
            SceneConfig::default()
        }
    };

    let viewport = Viewport::from(&config.view);
    let mut scene = Scene::new(config)?;
    let frames = (args.seconds / FRAME_DT).round() as u32;
    let frames_per_second = (1.0 / FRAME_DT).round() as u32;

    for frame in 1..=frames {
        scene.advance(FRAME_DT)?;

        for event in scene.drain_events() {
            match event {
                SceneEvent::BlockDamaged { cell, .. } => {
                    log::info!("Block ({}, {}) damaged", cell.column, cell.row);
                }
                SceneEvent::BlockRemoved { cell, remaining, .. } => {
                    log::info!(
                        "Block ({}, {}) removed, {} remaining",
                        cell.column,
                        cell.row,
                        remaining
                    );
                }
                SceneEvent::ArenaCleared => {
                    log::info!("Arena cleared after {} frames", frame);
                }
            }
        }

        if frame % frames_per_second == 0 {
            let vertices = frame_vertices(&scene, &viewport);
            log::debug!(
                "Frame {}: {} vertices ({} bytes)",
                frame,
                vertices.len(),
                Vertex::as_bytes(&vertices).len()
            );
        }

        if scene.block_count() == 0 {
            break;
        }
    }

    let snapshot = scene.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Could not serialize snapshot: {}", e),
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::info!("Collision Playground starting...");

    if let Err(e) = run(args) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["collision-playground"]).unwrap_or_else(|e| panic!("{e}"));
        assert!(args.config.is_none());
        assert_eq!(args.seconds, 30.0);
    }

    #[test]
    fn test_numeric_positional_is_a_config_path() {
        let args =
            Args::try_parse_from(["collision-playground", "60"]).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(args.config, Some(PathBuf::from("60")));
        assert_eq!(args.seconds, 30.0);
    }

    #[test]
    fn test_seconds_flag() {
        let args = Args::try_parse_from(["collision-playground", "scene.json", "--seconds", "2.5"])
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(args.config, Some(PathBuf::from("scene.json")));
        assert_eq!(args.seconds, 2.5);
    }

    #[test]
    fn test_rejects_non_positive_seconds() {
        assert!(Args::try_parse_from(["collision-playground", "--seconds", "0"]).is_err());
        assert!(Args::try_parse_from(["collision-playground", "--seconds=-5"]).is_err());
        assert!(Args::try_parse_from(["collision-playground", "--seconds", "NaN"]).is_err());
        assert!(Args::try_parse_from(["collision-playground", "--seconds", "inf"]).is_err());
    }
}
