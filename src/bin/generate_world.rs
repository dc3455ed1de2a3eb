//! World generator binary: builds every cell of a hex world and writes a manifest.
//!
//! Usage: cargo run --release --bin generate_world -- [OPTIONS]
//!
//! Options:
//!   --world <PATH>    World definition JSON (default: built-in demo world)
//!   --output <PATH>   Manifest path (default: "world_manifest.json")
//!   --seed <SEED>     Override the world seed
//!   --size <N>        Override the flat edge length
//!   --jobs <N>        Max parallel cell builds (default: all cores)
//!
//! The manifest lists every generated cell with its mount point and Flat
//! statistics (level range, mean level, material histogram, extra blocks).

use std::path::PathBuf;
use std::time::Instant;

use serde_json::json;

use hexgen::generation::{GenerationPipeline, WorldDefinition};
use hexgen::grid::{Direction, HexGridConfig, HexPosition};

fn main() {
    hexgen::core::logging::builder()
        .format_timestamp_millis()
        .init();

    let args: Vec<String> = std::env::args().collect();
    let world_path = parse_str_arg(&args, "--world").map(PathBuf::from);
    let output = parse_str_arg(&args, "--output").unwrap_or_else(|| "world_manifest.json".to_string());

    if let Some(jobs) = parse_usize_arg(&args, "--jobs") {
        if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
            log::warn!("Failed to configure thread pool: {}", e);
        }
    }

    let mut world = match &world_path {
        Some(path) => match WorldDefinition::load(path) {
            Ok(world) => world,
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => demo_world(),
    };
    if let Some(seed) = parse_u32_arg(&args, "--seed") {
        world.config.seed = seed;
    }
    if let Some(size) = parse_usize_arg(&args, "--size") {
        world.config.flat_size = size.max(8);
    }

    println!("=== Hex World Generator ===");
    println!("World:  {}", world_path.as_ref().map_or("demo".to_string(), |p| p.display().to_string()));
    println!("Cells:  {}", world.cells.len());
    println!("Seed:   {}", world.config.seed);
    println!("Flat:   {} x {}", world.config.flat_size, world.config.flat_size);
    println!("Output: {}", output);
    println!();

    let pipeline = GenerationPipeline::new(&world.config);
    let index = world.index();
    let start = Instant::now();
    let store = pipeline.generate(&index);
    let elapsed = start.elapsed();

    let cells: Vec<_> = store
        .positions()
        .into_iter()
        .filter_map(|position| {
            let flat = store.get(position)?;
            let kind = index.get(position).map(|c| c.kind.clone()).unwrap_or_default();
            Some(json!({
                "id": position.id(),
                "q": position.q,
                "r": position.r,
                "type": kind,
                "mount": [flat.mount_x(), flat.mount_z()],
                "stats": flat.stats(),
            }))
        })
        .collect();

    let manifest = json!({
        "seed": world.config.seed,
        "flat_size": world.config.flat_size,
        "sea_level": world.config.world.sea_level,
        "ground_level": world.config.world.ground_level,
        "generation_ms": elapsed.as_millis() as u64,
        "cells": cells,
    });

    let text = match serde_json::to_string_pretty(&manifest) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Failed to serialize manifest: {}", e);
            std::process::exit(1);
        }
    };
    if let Err(e) = std::fs::write(&output, text) {
        eprintln!("Failed to write {}: {}", output, e);
        std::process::exit(1);
    }

    println!("Generated {} cells in {:.2}s", store.len(), elapsed.as_secs_f64());
    println!("Manifest written to {}", output);
}

/// Small world touching every scenario family and most manipulators
fn demo_world() -> WorldDefinition {
    let center = HexPosition::new(0, 0);
    let at = |dir: Direction| center.neighbor(dir);
    WorldDefinition {
        config: Default::default(),
        cells: vec![
            HexGridConfig::new(center, "plains")
                .with_parameter("g_sideBlend", "true")
                .with_parameter("g_randomness", "0.5")
                .with_parameter("g_blurRadius", "1")
                .with_parameter("g_road", r#"[{"side": "E", "level": 56}, {"side": "NW", "type": "track"}]"#)
                .with_parameter(
                    "g_village",
                    r#"{"level": 56, "plots": [{"lx": 90, "lz": 150, "sizeX": 20, "sizeZ": 14}], "roads": [{"from": {"side": "SW"}, "to": {"lx": 128, "lz": 128}}]}"#,
                ),
            HexGridConfig::new(at(Direction::East), "hills")
                .with_parameter("g_river", r#"{"from": [{"side": "NE"}], "to": [{"side": "SW", "width": 8}], "groupId": "east-river"}"#),
            HexGridConfig::new(at(Direction::West), "coast"),
            HexGridConfig::new(at(Direction::NorthWest), "ocean"),
            HexGridConfig::new(at(Direction::SouthWest), "island"),
            HexGridConfig::new(at(Direction::NorthEast), "mountain")
                .with_parameter("g_ridge", r#"[{"side": "SW", "level": 110}]"#)
                .with_parameter("g_sideWall", r#"{"side": "NE", "height": 5, "level": 90}"#),
            HexGridConfig::new(at(Direction::SouthEast), "forest")
                .with_parameter("g_edgeBlend", "true")
                .with_parameter("g_wall", r#"{"route": [{"side": "E"}, {"side": "SE", "respectRoad": true}]}"#),
        ],
    }
}

fn parse_u32_arg(args: &[String], flag: &str) -> Option<u32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
