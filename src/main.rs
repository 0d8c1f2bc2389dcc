//! BLOCKFALL - a falling-block puzzle game for the terminal

mod board;
mod effects;
mod factory;
mod game;
mod input;
mod piece;
mod scheduler;
mod score;
mod settings;
mod tetromino;
mod ui;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use effects::Effects;
use game::{Game, GameEvent, Phase};
use input::{Action, KeyBindings};
use ratatui::{backend::CrosstermBackend, Terminal};
use settings::Settings;
use std::{
    io::{self, stdout},
    path::PathBuf,
    time::{Duration, Instant},
};

/// Target frame rate
const TARGET_FPS: u64 = 60;
const FRAME_DURATION: Duration = Duration::from_micros(1_000_000 / TARGET_FPS);

/// Get the blockfall temp directory, creating it if needed
fn blockfall_temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join("blockfall");
    let _ = std::fs::create_dir_all(&dir);
    dir
}

/// Log to a per-session file; the terminal itself belongs to the UI
fn init_logging(session_id: u32) -> tracing_appender::non_blocking::WorkerGuard {
    let log_dir = blockfall_temp_dir();
    let log_file = format!("{:08x}.log", session_id);

    let file_appender = tracing_appender::rolling::never(&log_dir, &log_file);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "blockfall=debug".parse() {
        filter = filter.add_directive(directive);
    }

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(filter)
        .with_ansi(false)
        .init();

    tracing::info!(
        "BLOCKFALL starting up, session={:08x}, log={}",
        session_id,
        log_dir.join(&log_file).display()
    );
    guard
}

fn main() -> io::Result<()> {
    let session_id: u32 = rand::random();
    let _guard = init_logging(session_id);

    let mut settings = Settings::load();

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Run app and capture result
    let result = run_app(&mut terminal, &mut settings);

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout(), LeaveAlternateScreen)?;

    if let Err(e) = settings.save() {
        tracing::warn!("Could not save settings: {}", e);
        eprintln!("Warning: Could not save settings: {}", e);
    }

    match &result {
        Ok(snap) if snap.phase != Phase::Idle => {
            println!("\nThanks for playing BLOCKFALL!");
            if !snap.over {
                println!("(quit mid-game)");
            }
            println!("Final Score: {}", snap.score);
            println!("Level: {} | Lines: {}", snap.level, snap.lines);
        }
        Ok(_) => {}
        Err(e) => tracing::error!("Exited with error: {}", e),
    }

    tracing::info!("BLOCKFALL shutting down");
    result.map(|_| ())
}

/// Frame loop: input, gravity, events, draw. Returns the final game state.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    settings: &mut Settings,
) -> io::Result<game::Snapshot> {
    let keys = KeyBindings::from_settings(settings);
    let mut game = match settings.gameplay.seed {
        Some(seed) => Game::with_seed(seed),
        None => Game::new(),
    }
    .lock_controls_while_paused(settings.gameplay.lock_controls_while_paused);
    let mut effects = Effects::new();

    loop {
        let now = Instant::now();
        let snap = game.snapshot();
        terminal.draw(|frame| ui::render_game(frame, &snap, &effects, settings, now))?;

        // Wake up for the next gravity tick if it comes before the next frame
        let timeout = game
            .scheduler()
            .time_until_fire(now)
            .map_or(FRAME_DURATION, |wait| wait.min(FRAME_DURATION));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match keys.action_for(key) {
                        Some(Action::Quit) => return Ok(game.snapshot()),
                        Some(action) => apply_action(&mut game, &mut effects, action),
                        None => {}
                    }
                }
            }
        }

        let now = Instant::now();
        game.update(now);

        for event in game.drain_events() {
            match event {
                GameEvent::RowCleared(row) => {
                    if settings.visual.effects {
                        effects.burst(&row, now);
                    }
                }
                GameEvent::LevelUp { level } => {
                    tracing::debug!("Level up to {}", level);
                }
                GameEvent::GameOver { score } => {
                    let snap = game.snapshot();
                    settings.add_high_score(score, snap.level, snap.lines);
                }
            }
        }

        effects.update(now);
    }
}

/// Turn a decoded key action into engine commands
fn apply_action(game: &mut Game, effects: &mut Effects, action: Action) {
    match action {
        Action::Start => {
            effects.clear();
            game.start();
        }
        Action::Pause => match game.phase() {
            Phase::Running => game.set_paused(true),
            Phase::Paused => game.set_paused(false),
            Phase::Idle | Phase::GameOver => {}
        },
        Action::MoveLeft => game.move_piece(-1),
        Action::MoveRight => game.move_piece(1),
        Action::SoftDrop => game.soft_drop(),
        Action::HardDrop => game.hard_drop(),
        Action::Rotate => {
            game.rotate();
        }
        Action::Quit => {}
    }
}
