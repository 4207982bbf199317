use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use arcade_snake::config::{
    ConfigError, DEFAULT_CANVAS_PX, DEFAULT_CELL_PX, Difficulty, EngineSettings, Grid,
    THEME_CLASSIC,
};
use arcade_snake::feedback::TerminalBell;
use arcade_snake::game::{Collaborators, Engine};
use arcade_snake::input::{GameInput, InputHandler};
use arcade_snake::logging;
use arcade_snake::renderer::RedrawLatch;
use arcade_snake::scheduler::LoopScheduler;
use arcade_snake::score::{HighScoreStore, JsonFileStore, MemoryStore, StoreError};
use arcade_snake::terminal_runtime::TerminalSession;
use clap::Parser;
use thiserror::Error;

/// Longest wait for input while no tick is scheduled.
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Board edge length in pixels; the board has canvas / cell tiles per side.
    #[arg(long, default_value_t = DEFAULT_CANVAS_PX)]
    canvas: u32,

    /// Cell edge length in pixels.
    #[arg(long, default_value_t = DEFAULT_CELL_PX)]
    cell: u32,

    /// Starting speed: easy, normal or hard.
    #[arg(long, default_value_t = Difficulty::Normal)]
    difficulty: Difficulty,

    /// Fixed seed for food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (defaults to the platform data directory).
    #[arg(long = "scores-file")]
    scores_file: Option<PathBuf>,

    /// Keep the high score in memory only.
    #[arg(long = "no-persist", conflicts_with = "scores_file")]
    no_persist: bool,

    /// Silence the terminal bell.
    #[arg(long)]
    mute: bool,

    /// Append log records to this file.
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] io::Error),
}

/// Either durable or process-local high score storage, chosen on the command line.
enum ScoreStore {
    File(JsonFileStore),
    Memory(MemoryStore),
}

impl HighScoreStore for ScoreStore {
    fn read_high_score(&mut self) -> Result<u32, StoreError> {
        match self {
            Self::File(store) => store.read_high_score(),
            Self::Memory(store) => store.read_high_score(),
        }
    }

    fn write_high_score(&mut self, score: u32) -> Result<(), StoreError> {
        match self {
            Self::File(store) => store.write_high_score(score),
            Self::Memory(store) => store.write_high_score(score),
        }
    }
}

type TerminalEngine = Engine<RedrawLatch, TerminalBell, ScoreStore, LoopScheduler>;

fn main() -> Result<(), AppError> {
    let cli = Cli::parse();
    logging::init(cli.log_file.as_deref())?;

    let settings = EngineSettings {
        grid: Grid::from_canvas(cli.canvas, cli.cell)?,
        difficulty: cli.difficulty,
        seed: cli.seed,
    };
    let store = match (cli.no_persist, cli.scores_file) {
        (true, _) => ScoreStore::Memory(MemoryStore::default()),
        (false, Some(path)) => ScoreStore::File(JsonFileStore::new(path)),
        (false, None) => ScoreStore::File(JsonFileStore::at_default_location()),
    };

    if let ScoreStore::File(file) = &store {
        log::info!("high score file: {}", file.path().display());
    }

    let mut engine = Engine::new(
        settings,
        Collaborators {
            renderer: RedrawLatch::new(),
            feedback: TerminalBell::new(cli.mute),
            store,
            scheduler: LoopScheduler::new(),
        },
    );

    log::info!("arcade-snake starting");
    let mut session = TerminalSession::enter(&THEME_CLASSIC)?;
    run(&mut session, &mut engine)?;
    log::info!("arcade-snake exiting with high score {}", engine.high_score());

    Ok(())
}

fn run(session: &mut TerminalSession, engine: &mut TerminalEngine) -> io::Result<()> {
    let mut input = InputHandler::new();
    let mut last_status = engine.status();

    loop {
        let status = engine.status();
        if engine.renderer_mut().take() || status != last_status {
            session.draw(&engine.frame_view(), &status)?;
            last_status = status;
        }

        let timeout = engine
            .scheduler()
            .time_until_next(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL)
            .min(IDLE_POLL_INTERVAL);

        if let Some(game_input) = input.poll_input(timeout)? {
            if matches!(game_input, GameInput::Quit) {
                break;
            }

            engine.scheduler_mut().advance_to(Instant::now());
            engine.apply_input(game_input);
            engine.renderer_mut().request();
        }

        if let Some(handle) = engine.scheduler_mut().poll(Instant::now()) {
            engine.fire(handle);
        }
    }

    Ok(())
}
