mod gameplay;
mod logger;
mod renderer;

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use liquid_sort::config::{DEFAULT_CAPACITY, DEFAULT_EXTRA_EMPTY_CONTAINERS, DEFAULT_PALETTE_SIZE};
use liquid_sort::{PuzzleConfig, PuzzleEngine, PuzzleState};
use macroquad::prelude::*;
use macroquad::window::Conf;

use crate::gameplay::{GameHost, TransitionTimings};
use crate::renderer::ControlAction;

#[derive(Parser, Debug)]
#[command(name = "liquid_sort", version, about = "Pour colors between containers until each holds a single one")]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Number of distinct colors
    #[arg(long, default_value_t = DEFAULT_PALETTE_SIZE)]
    colors: usize,

    /// Units per container
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,

    /// Containers that start empty
    #[arg(long, default_value_t = DEFAULT_EXTRA_EMPTY_CONTAINERS)]
    extra: usize,

    /// Seed for reproducible puzzles
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a fixed layout such as "AB|BA|" (bottom to top, one segment per container)
    #[arg(long)]
    layout: Option<String>,
}

impl Args {
    fn build_engine(&self) -> anyhow::Result<PuzzleEngine> {
        let config = PuzzleConfig::new(self.colors, self.capacity, self.extra)?;
        let engine = match (&self.layout, self.seed) {
            (Some(layout), _) => PuzzleState::from_repr(layout, config.capacity)
                .and_then(|state| PuzzleEngine::from_layout(config, state))
                .with_context(|| format!("cannot start from layout '{}'", layout))?,
            (None, Some(seed)) => PuzzleEngine::seeded(config, seed)?,
            (None, None) => PuzzleEngine::new(config)?,
        };
        Ok(engine)
    }
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Liquid Sort".to_owned(),
        window_width: 800,
        window_height: 600,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    if let Err(err) = run().await {
        error!("{:#}", err);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    match args.verbose.log_level() {
        Some(level) => logger::init_with_level(level).context("cannot install logger")?,
        None => logger::disable(),
    }
    let engine = args.build_engine()?;
    info!("Starting puzzle {}", engine.state());
    let mut host = GameHost::new(engine, TransitionTimings::default());
    loop {
        let now = get_time();
        host.update(now)?;
        host.render(now);
        if is_mouse_button_pressed(MouseButton::Left) {
            let (x, y) = mouse_position();
            host.handle_click(x, y)?;
        }
        if is_key_pressed(KeyCode::N) {
            host.handle_action(ControlAction::NewPuzzle)?;
        }
        if is_key_pressed(KeyCode::C) {
            host.handle_action(ControlAction::CopyLayout)?;
        }
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        next_frame().await;
    }
    Ok(())
}
