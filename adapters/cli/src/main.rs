#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Tiny Steps puzzle.

mod config;
mod game;
mod input;
mod terminal;

use std::{
    io::{self, BufReader, Cursor, IsTerminal},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tiny_steps_core::{CommandColor, GridSize};
use tiny_steps_rendering::{Color, Presentation, RenderingBackend};
use tiny_steps_world::{query, Session, SessionConfig};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{
    config::{Overrides, Settings},
    game::Game,
    terminal::TerminalBackend,
};

const HELP: &str =
    "Type directions (u d l r), 'c <color>', 'k <color>', 'go', 'reset', 'next' or 'quit'.";

/// Queue colored direction commands and replay them towards the goal.
#[derive(Parser, Debug)]
#[command(name = "tiny-steps", version)]
struct Cli {
    /// Configuration file; defaults to `tiny-steps.toml` when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Side length of the square grid.
    #[arg(long, global = true)]
    grid_size: Option<u32>,
    /// Number of paths in the rotation.
    #[arg(long = "paths", global = true)]
    path_count: Option<usize>,
    /// Seed for path generation; omitted means OS entropy.
    #[arg(long, global = true)]
    seed: Option<u64>,
    /// Milliseconds between playback steps.
    #[arg(long, global = true)]
    step_ms: Option<u64>,
    /// Milliseconds simulated per frame.
    #[arg(long, global = true)]
    frame_ms: Option<u64>,
    /// Draw without ANSI colors even when stdout is a terminal.
    #[arg(long, global = true)]
    plain: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Play interactively, one line of input per frame.
    Play,
    /// Queue a program, replay it once and print every step.
    Run {
        /// Directions to queue, e.g. `RRDD` or `r,r,d,d`.
        #[arg(long)]
        program: String,
        /// Palette color for every queued command.
        #[arg(long, default_value = "blue")]
        color: String,
    },
}

/// Entry point for the Tiny Steps command-line interface.
fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let overrides = Overrides {
        grid_size: cli.grid_size,
        path_count: cli.path_count,
        seed: cli.seed,
        step_ms: cli.step_ms,
        frame_ms: cli.frame_ms,
    };
    let settings = Settings::load(cli.config.as_deref(), &overrides)?;
    tracing::debug!(?settings, "settings resolved");

    let session = build_session(&settings)?;
    let banner = query::welcome_banner(&session);
    let ansi = !cli.plain && io::stdout().is_terminal();

    match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => {
            let game = Game::new(session, settings.step_interval);
            let backend = TerminalBackend::new(
                BufReader::new(io::stdin()),
                io::stdout(),
                settings.frame_interval,
            )
            .interactive(true)
            .ansi(ansi);
            println!("{banner}");
            println!("{HELP}");
            run_game(backend, game)
        }
        Commands::Run { program, color } => {
            let color = input::parse_color(&color)?;
            let directions = input::parse_program(&program)?;
            let steps: String = directions.into_iter().map(input::letter).collect();
            let script = script(color, &steps);
            let game = Game::new(session, settings.step_interval);
            let backend =
                TerminalBackend::new(Cursor::new(script), io::stdout(), settings.frame_interval)
                    .ansi(ansi);
            run_game(backend, game)
        }
    }
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn build_session(settings: &Settings) -> Result<Session> {
    let grid = GridSize::new(settings.grid_size)?;
    let config = SessionConfig::new(grid, settings.path_count);
    let mut rng = match settings.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    Session::new(config, &mut rng).context("failed to create session")
}

fn run_game<B>(backend: B, mut game: Game) -> Result<()>
where
    B: RenderingBackend,
{
    let presentation = Presentation::new(
        "Tiny Steps",
        Color::from_rgb_u8(255, 255, 255),
        game.scene(),
    );
    backend.run(presentation, move |dt, input, scene| {
        game.update(dt, input, scene);
    })
}

/// Input lines that queue `steps` in `color` and replay them.
///
/// The backend quits at end of input once playback has finished.
fn script(color: CommandColor, steps: &str) -> String {
    let name = color.name().unwrap_or("blue");
    format!("c {name}\n{steps}\ngo\n")
}
