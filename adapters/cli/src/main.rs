#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the snake arcade experience.

mod config;
mod headless;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use config::GameConfig;
use simplelog::{ColorChoice, Config as LogConfig, TermLogger, TerminalMode};
use snake_arcade_core::{Canvas, GameStatus};
use snake_arcade_rendering::{
    BoardPresentation, Color, FrameInput, HeadlessCanvas, Hud, Presentation, RenderingBackend,
};
use snake_arcade_rendering_macroquad::MacroquadBackend;
use snake_arcade_session::{Session, SessionConfig, TimerQueue};

/// Settings file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG_PATH: &str = "snake-arcade.toml";

/// Command-line arguments for the snake arcade.
#[derive(Debug, Parser)]
#[command(name = "snake-arcade", about = "Classic grid snake with smooth animation.")]
struct CliArgs {
    /// TOML file with board, snake and schedule settings.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Overrides the number of board columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Overrides the number of board rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Starts with relaxed rules enabled.
    #[arg(long)]
    relaxed: bool,
    /// Seed for food placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Plays without a window until the game ends or the tick budget runs out.
    #[arg(long)]
    headless: bool,
    /// Tick budget for headless runs.
    #[arg(long, default_value_t = 100)]
    max_ticks: u32,
    /// Synchronises presentation with the display refresh rate.
    #[arg(long, action = clap::ArgAction::Set, default_value_t = true)]
    vsync: bool,
    /// Maximum level of log messages written to the terminal.
    #[arg(long, default_value_t = log::LevelFilter::Info)]
    log_level: log::LevelFilter,
    /// Draws placeholder shapes instead of loading sprite artwork.
    #[arg(long)]
    no_sprites: bool,
    /// Logs the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();
    TermLogger::init(
        args.log_level,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("failed to initialise terminal logger")?;

    let config_path = config_path(&args);
    let mut config = GameConfig::load(config_path.as_deref())?;
    apply_overrides(&mut config, &args);
    let seed = config.seed.unwrap_or_else(rand::random);
    log::info!("food seed {seed}");

    let session_config = SessionConfig {
        layout: config.layout(),
        schedule: config.schedule(),
        rng_seed: seed,
    };

    let mut staging = HeadlessCanvas::new();
    let session = Session::new(session_config, &mut staging)?;
    println!("{}", session.welcome_banner());
    for line in session.controls() {
        println!("  {line}");
    }

    if args.headless {
        run_headless(session, staging, args.max_ticks);
        return Ok(());
    }

    run_windowed(session, &config, &args)
}

fn config_path(args: &CliArgs) -> Option<PathBuf> {
    args.config.clone().or_else(|| {
        let fallback = PathBuf::from(DEFAULT_CONFIG_PATH);
        fallback.is_file().then_some(fallback)
    })
}

fn apply_overrides(config: &mut GameConfig, args: &CliArgs) {
    if let Some(columns) = args.columns {
        config.board.columns = columns;
    }
    if let Some(rows) = args.rows {
        config.board.rows = rows;
    }
    if args.relaxed {
        config.relaxed = true;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
}

fn run_headless(mut session: Session, mut canvas: HeadlessCanvas, max_ticks: u32) {
    let outcome = headless::run(&mut session, &mut canvas, max_ticks);
    let hud = Hud {
        score: outcome.score,
        status: outcome.status,
        ..hud_for(&session)
    };
    if outcome.status == GameStatus::GameOver {
        println!("{}", hud.game_over_text());
    } else {
        println!("{} after {} ticks", hud.score_text(), outcome.ticks);
    }
}

fn run_windowed(mut session: Session, config: &GameConfig, args: &CliArgs) -> Result<()> {
    let board = BoardPresentation::new(
        config.board.columns,
        config.board.rows,
        config.board.width,
        config.board.height,
    )
    .map_err(|error| anyhow::anyhow!(error))?;
    let presentation = Presentation::new(
        "Snake Arcade",
        Color::from_rgb_u8(0x1f, 0x2b, 0x14),
        board,
    );

    let backend = MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .with_sprite_loading(!args.no_sprites)
        .with_sprite_manifest(config.sprite_manifest.clone());

    let mut timers = TimerQueue::new();
    let mut attached = false;
    backend.run(
        presentation,
        move |dt, input: FrameInput, canvas: &mut dyn Canvas| {
            if !attached {
                session.redraw(canvas);
                session.launch(&mut timers);
                attached = true;
            }

            if let Some(heading) = input.heading {
                let _ = session.on_direction(heading);
            }
            if input.toggle_relaxed {
                let _ = session.on_toggle_relaxed();
            }
            if input.restart && session.status() == GameStatus::GameOver {
                session.reset(&mut timers, canvas);
            }

            session.drive(&mut timers, dt, canvas);
            hud_for(&session)
        },
    )
}

fn hud_for(session: &Session) -> Hud {
    Hud {
        score: session.score(),
        status: session.status(),
        relaxed: session.relaxed_mode(),
        tick_interval: session.tick_interval(),
    }
}
