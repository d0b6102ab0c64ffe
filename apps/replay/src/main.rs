// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: replay a recorded two-hand gesture against a scene and print the
//! objects it selects.
//!
//! The first gesture frame starts the selection, intermediate frames are
//! ticks and the last frame stops it. Only objects carrying the configured
//! tag are candidates; with no tag, objects of the configured kinds are.
//!
//! Usage:
//!   sweep-replay <scene.json> <gesture.json> [options]
//!
//! Environment:
//!   SWEEP_SELECT_TAG, SWEEP_SELECT_KINDS, SWEEP_SELECT_STRATEGY,
//!   SWEEP_SELECT_PARALLEL_THRESHOLD, RUST_LOG

use std::env;
use std::fs;

use anyhow::{bail, Context};
use serde::Serialize;
use sweep_select_session::{SelectionConfig, SelectionSession};
use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod scene;

use config::{non_empty, parse_strategy, Config};
use error::ReplayError;
use scene::{Gesture, Scene, SceneObject};

/// Command line arguments layered over [`Config`]
#[derive(Debug, Clone, PartialEq)]
struct Args {
    scene_path: String,
    gesture_path: String,
    tag: Option<String>,
    kinds: Vec<String>,
    strategy: Option<String>,
    output_path: Option<String>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    tag: Option<&'a str>,
    kinds: &'a [String],
    strategy: &'static str,
    frames: usize,
    selected: Vec<&'a str>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let raw: Vec<String> = env::args().skip(1).collect();
    let Some(args) = parse_args(&raw)? else {
        print_usage();
        return Ok(());
    };

    let mut config = Config::from_env();
    if let Some(tag) = args.tag.as_deref() {
        config.tag = non_empty(tag);
    }
    if !args.kinds.is_empty() {
        config.kinds = args.kinds.clone();
    }
    if let Some(name) = args.strategy.as_deref() {
        config.strategy = parse_strategy(name)?;
    }

    let scene_json = fs::read_to_string(&args.scene_path)
        .with_context(|| format!("Cannot read scene '{}'", args.scene_path))?;
    let gesture_json = fs::read_to_string(&args.gesture_path)
        .with_context(|| format!("Cannot read gesture '{}'", args.gesture_path))?;
    let scene = Scene::from_json(&scene_json).context("Invalid scene")?;
    let gesture = Gesture::from_json(&gesture_json).context("Invalid gesture")?;

    tracing::info!(
        objects = scene.objects.len(),
        frames = gesture.frames.len(),
        tag = config.tag.as_deref().unwrap_or(""),
        kinds = %config.kinds.join(","),
        strategy = %config.strategy,
        parallel_threshold = config.parallel_threshold,
        "Replaying gesture"
    );

    let selected = replay(&scene, &gesture, &config)?;
    let report = Report {
        tag: config.tag.as_deref(),
        kinds: &config.kinds,
        strategy: config.strategy.name(),
        frames: gesture.frames.len(),
        selected: selected.iter().map(|object| object.name.as_str()).collect(),
    };
    let json = serde_json::to_string_pretty(&report)?;

    match args.output_path {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Cannot write '{}'", path))?;
            tracing::info!(path = %path, selected = selected.len(), "Wrote selection");
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Run one selection session over the recording
fn replay(scene: &Scene, gesture: &Gesture, config: &Config) -> Result<Vec<SceneObject>, ReplayError> {
    let candidates = match scene.candidates(config.tag.as_deref(), &config.kinds) {
        Some(candidates) => {
            if candidates.is_empty() {
                tracing::warn!(
                    tag = config.tag.as_deref().unwrap_or(""),
                    kinds = %config.kinds.join(","),
                    "No scene objects match the selection filter"
                );
            }
            candidates
        }
        None => {
            tracing::warn!("No tag or kind configured; no objects will be selected");
            Vec::new()
        }
    };

    let playback = gesture.playback()?;
    let ticks = playback.frame_count().saturating_sub(2);

    let selection = SelectionConfig::new()
        .with_strategy(config.strategy)
        .with_parallel_threshold(config.parallel_threshold)
        .with_candidates(move || candidates.clone());
    let mut session = SelectionSession::new(selection, playback);

    session.start()?;
    for _ in 0..ticks {
        session.tick()?;
    }
    Ok(session.stop()?)
}

/// `Ok(None)` when help was requested
fn parse_args(args: &[String]) -> anyhow::Result<Option<Args>> {
    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        return Ok(None);
    }

    let mut positional = Vec::new();
    let mut tag = None;
    let mut kinds = Vec::new();
    let mut strategy = None;
    let mut output_path = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .cloned()
                .with_context(|| format!("Missing value for {}", flag))
        };
        match arg.as_str() {
            "--tag" => tag = Some(value("--tag")?),
            "--kind" => kinds.push(value("--kind")?),
            "--strategy" => strategy = Some(value("--strategy")?),
            "--output" => output_path = Some(value("--output")?),
            other if other.starts_with("--") => bail!("Unknown option: {}", other),
            _ => positional.push(arg.clone()),
        }
    }

    let [scene_path, gesture_path]: [String; 2] = match positional.try_into() {
        Ok(paths) => paths,
        Err(_) => bail!("Expected exactly two paths: <scene.json> <gesture.json>"),
    };

    Ok(Some(Args {
        scene_path,
        gesture_path,
        tag,
        kinds,
        strategy,
        output_path,
    }))
}

fn print_usage() {
    eprintln!("Usage: sweep-replay <scene.json> <gesture.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --tag <TAG>          Only objects with this tag are candidates (default: Selectable)");
    eprintln!("                       An empty TAG turns the tag filter off");
    eprintln!("  --kind <KIND>        Object kind to select when no tag is set (repeatable)");
    eprintln!("  --strategy <NAME>    convex-polygon | convex-mesh | concave-volume");
    eprintln!("  --output <PATH>      Write the JSON report to a file instead of stdout");
    eprintln!("  -h, --help           Show this message");
}
