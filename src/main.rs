//! spritequeue entry point.
//!
//! Builds a small demo scene out of solid rectangle textures, applies the
//! sprite and queue directives given on the command line and renders it.
//!
//! Without the `raylib` feature frames are drawn into a headless
//! [`RecordingBackend`]; with it a window is opened and frames are drawn
//! until it is closed (or `--frames` is reached).
//!
//! # Running
//!
//! ```sh
//! cargo run -- --apply "marker=setOptions flip-h colormod" --dump-frame
//! cargo run --features raylib -- --config ./config.ini
//! ```

// Do not create console on Windows
#![cfg_attr(
    all(target_os = "windows", feature = "raylib"),
    windows_subsystem = "windows"
)]

use bevy_ecs::prelude::*;
use clap::Parser;
use log::{info, warn};
use std::error::Error;
use std::path::PathBuf;

#[cfg(feature = "raylib")]
use spritequeue::backend::raylib::RaylibBackend;
#[cfg(not(feature = "raylib"))]
use spritequeue::backend::recording::RecordingBackend;
use spritequeue::backend::TextureLoader;
use spritequeue::components::color::Color;
use spritequeue::resources::displayconfig::DisplayConfig;
use spritequeue::resources::manager::Manager;
#[cfg(feature = "raylib")]
use spritequeue::resources::screensize::ScreenSize;
use spritequeue::systems::render::render_pass;
use spritequeue::systems::screensize::sync_screen_size;

/// Render queue and sprite directive playground
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// INI file with a [display] section.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Frames to render. 0 renders until the window is closed; headless
    /// builds always render at least one frame.
    #[arg(long, default_value_t = 0)]
    frames: u64,

    /// Apply a sprite directive before rendering, e.g.
    /// `--apply "panel=centerIn 0 0 100%w 100%h"`. Repeatable.
    #[arg(long, value_name = "NAME=DIRECTIVE", value_parser = parse_assignment)]
    apply: Vec<(String, String)>,

    /// Apply a render queue directive before rendering, e.g.
    /// `--queue "marker=moveBefore panel"`. Repeatable.
    #[arg(long, value_name = "NAME=DIRECTIVE", value_parser = parse_assignment)]
    queue: Vec<(String, String)>,

    /// Print the draw calls of the last frame as JSON.
    #[arg(long)]
    dump_frame: bool,
}

fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    let (name, directive) = arg
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=DIRECTIVE, got '{}'", arg))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing sprite name in '{}'", arg));
    }
    Ok((name.to_string(), directive.to_string()))
}

/// Background, a centered panel and a marker drawn twice.
fn build_scene(
    manager: &mut Manager,
    loader: &mut dyn TextureLoader,
) -> spritequeue::error::Result<()> {
    let screen = manager.screen_size();
    manager.create_texture_from_rectangle(
        "background",
        screen.w,
        screen.h,
        Color::new(0x20, 0x20, 0x30, 0xFF),
        loader,
    )?;
    manager.create_texture_from_rectangle(
        "panel",
        240,
        160,
        Color::new(0x40, 0x60, 0x90, 0xFF),
        loader,
    )?;
    manager.create_texture_from_rectangle(
        "marker",
        16,
        16,
        Color::new(0xF0, 0xC0, 0x20, 0xFF),
        loader,
    )?;

    let m = manager.manipulation();
    m.apply("panel", "centerIn 0 0 100%w 100%h")?;
    m.apply("marker", "centerInSprite panel")?;
    m.apply("marker", "addDestination 0 0")?;
    m.apply_at("marker", 1, "setOrigin screenWidth-24 screenHeight-24")?;

    for (name, destination) in [("background", 0), ("panel", 0), ("marker", 0), ("marker", 1)] {
        manager.append_to_render_queue(name, destination)?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = DisplayConfig::with_path(&cli.config);
    if let Err(e) = config.load_from_file() {
        warn!("{}, using defaults", e);
    }

    #[cfg(feature = "raylib")]
    let (mut backend, frames) = (RaylibBackend::new(&config), cli.frames);
    #[cfg(not(feature = "raylib"))]
    let (mut backend, frames) = (RecordingBackend::new(), cli.frames.max(1));

    let screen = config.screen_size();
    let mut manager = Manager::new(config.title.clone(), screen.w, screen.h);
    build_scene(&mut manager, &mut backend)?;
    for (name, directive) in &cli.apply {
        manager.manipulation().apply(name, directive)?;
    }
    for (name, directive) in &cli.queue {
        manager.queue_manipulation().apply(name, directive)?;
    }

    // --------------- ECS world + resources ---------------
    let mut world = World::new();
    world.insert_resource(screen);
    world.insert_resource(config);
    world.insert_non_send_resource(manager);

    let mut schedule = Schedule::default();
    schedule.add_systems(sync_screen_size);

    // --------------- Main loop ---------------
    let mut frame: u64 = 0;
    loop {
        #[cfg(feature = "raylib")]
        {
            if backend.should_close() {
                break;
            }
            let size = backend.screen_size();
            if *world.resource::<ScreenSize>() != size {
                *world.resource_mut::<ScreenSize>() = size;
            }
        }
        schedule.run(&mut world);
        render_pass(&mut world, &mut backend)?;
        frame += 1;
        if frames > 0 && frame >= frames {
            break;
        }
    }
    info!("rendered {} frames", frame);

    if cli.dump_frame {
        let calls = world.non_send_resource::<Manager>().draw_calls()?;
        println!("{}", serde_json::to_string_pretty(&calls)?);
    }

    world
        .non_send_resource_mut::<Manager>()
        .clear(&mut backend);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
