mod game;
mod settings;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use olimu_common::{Button, FrameSize};
use olimu_input::{ButtonState, KeyMap};
use olimu_kernel::{GameLoop, LoopMetrics, MetricsSnapshot, ShutdownFlag};
use olimu_render::{FrontBuffer, TileRenderer};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

use crate::game::ScrollGame;
use crate::settings::Overrides;

#[derive(Parser)]
#[command(name = "olimu", about = "Fixed-rate update, variable-rate render loop demo")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Run the scroll demo until Ctrl+C or the time limit
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// YAML file with loop rates
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Fixed updates per second
    #[arg(long)]
    update_rate: Option<u32>,
    /// Target frames per second
    #[arg(long)]
    render_rate: Option<u32>,
    /// Catch-up updates allowed between two renders
    #[arg(long)]
    max_updates: Option<u32>,
    /// Stop after this many seconds
    #[arg(short, long)]
    seconds: Option<f64>,
    /// Hold a button for the whole run (up, down, left, right)
    #[arg(long, value_name = "BUTTON")]
    hold: Vec<Button>,
    /// Hold a key for the whole run, by key name (ArrowUp, KeyW, ...)
    #[arg(long, value_name = "KEY")]
    key: Vec<String>,
    /// Print the final summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct Summary {
    metrics: MetricsSnapshot,
    offset: Option<[f32; 2]>,
    presented_frame_bytes: usize,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("olimu v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", olimu_kernel::crate_info());
            println!("input: {}", olimu_input::crate_info());
            println!("render: {}", olimu_render::crate_info());
            Ok(())
        }
        Commands::Run(args) => run(args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let overrides = Overrides {
        update_rate: args.update_rate,
        render_rate: args.render_rate,
        max_updates: args.max_updates,
    };
    let config = settings::apply(settings::load(args.config.as_deref())?, &overrides);

    let deadline = match args.seconds {
        Some(s) if s.is_finite() && s > 0.0 => Some(Instant::now() + Duration::from_secs_f64(s)),
        Some(s) => anyhow::bail!("--seconds must be a positive number, got {s}"),
        None => None,
    };

    let input = Arc::new(ButtonState::new());
    hold_inputs(&input, &KeyMap::default(), &args.hold, &args.key)?;

    let front = FrontBuffer::new(FrameSize::default())?;
    let renderer = TileRenderer::new(front.clone())?;
    let game = ScrollGame::new(input.clone(), renderer);
    let game_loop = GameLoop::new(config, game)?.with_name("olimu");
    let metrics = game_loop.metrics();

    let exit = ShutdownFlag::new();
    let handler = exit.clone();
    ctrlc::set_handler(move || handler.set()).context("installing Ctrl+C handler")?;

    println!("Starting olimu...");
    game_loop.start()?;
    wait_for_exit(&exit, &metrics, deadline);
    input.release_all();

    let outcome = game_loop.stop();
    let snapshot = metrics.snapshot();
    let offset = game_loop
        .into_simulation()
        .map(|g| g.offset().to_array());

    if args.json {
        let summary = Summary {
            metrics: snapshot,
            offset,
            presented_frame_bytes: front.snapshot().as_bytes().len(),
        };
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "TPS: {}    FPS: {}    ticks: {}    frames: {}",
            snapshot.tps, snapshot.fps, snapshot.ticks, snapshot.frames
        );
        if let Some([x, y]) = offset {
            println!("scroll offset: ({x}, {y})");
        }
    }

    outcome.context("game loop terminated abnormally")
}

/// Press the buttons and mapped keys held for the whole run.
fn hold_inputs(
    input: &ButtonState,
    keymap: &KeyMap,
    buttons: &[Button],
    keys: &[String],
) -> anyhow::Result<()> {
    for button in buttons {
        input.press(*button);
    }
    for key in keys {
        if !keymap.handle_key(key, true, input) {
            anyhow::bail!("unbound key: {key}");
        }
    }
    Ok(())
}

/// Block until Ctrl+C, the deadline, or the loop dying on its own.
fn wait_for_exit(exit: &ShutdownFlag, metrics: &LoopMetrics, deadline: Option<Instant>) {
    const POLL: Duration = Duration::from_millis(100);
    loop {
        let slice = match deadline {
            Some(d) => match d.checked_duration_since(Instant::now()) {
                Some(left) => left.min(POLL),
                None => return,
            },
            None => POLL,
        };
        if exit.wait_timeout(slice) {
            tracing::info!("interrupt received");
            return;
        }
        if !metrics.is_running() {
            tracing::warn!("game loop exited on its own");
            return;
        }
    }
}
