//! Core game state and logic

use crate::board::{Board, ClearedRow};
use crate::factory::PieceFactory;
use crate::piece::Piece;
use crate::scheduler::Scheduler;
use crate::score::{Score, START_INTERVAL};
use std::time::{Duration, Instant};

/// Where the game is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started yet
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Things the front-end may want to react to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// One per cleared line, in clearing order
    RowCleared(ClearedRow),
    LevelUp { level: u32 },
    GameOver { score: u64 },
}

/// Which rotation attempt took effect
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateOutcome {
    InPlace,
    KickedLeft,
    KickedRight,
    /// Every attempt collided; the piece is unchanged
    Blocked,
}

/// Read-only copy of everything a renderer needs
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub board: Board,
    pub current: Option<Piece>,
    pub next: Option<Piece>,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub drop_interval: Duration,
    pub over: bool,
    pub paused: bool,
    pub phase: Phase,
}

/// The main game struct
pub struct Game {
    /// Locked cells
    board: Board,
    /// Current falling piece
    current_piece: Option<Piece>,
    /// Piece that spawns after the current one locks
    next_piece: Option<Piece>,
    factory: PieceFactory,
    score: Score,
    drop_interval: Duration,
    over: bool,
    paused: bool,
    /// Drives gravity; live only while running
    scheduler: Scheduler,
    /// Events not yet picked up by `drain_events`
    events: Vec<GameEvent>,
    /// Ignore move/rotate/drop commands while paused
    lock_controls_while_paused: bool,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create an idle game with a randomly seeded piece sequence
    pub fn new() -> Self {
        Self::with_factory(PieceFactory::new())
    }

    /// Create an idle game with a reproducible piece sequence
    pub fn with_seed(seed: u64) -> Self {
        Self::with_factory(PieceFactory::with_seed(seed))
    }

    fn with_factory(factory: PieceFactory) -> Self {
        Self {
            board: Board::new(),
            current_piece: None,
            next_piece: None,
            factory,
            score: Score::new(),
            drop_interval: START_INTERVAL,
            over: false,
            paused: false,
            scheduler: Scheduler::new(),
            events: Vec::new(),
            lock_controls_while_paused: false,
        }
    }

    /// Choose whether player commands are ignored while paused
    pub fn lock_controls_while_paused(mut self, lock: bool) -> Self {
        self.lock_controls_while_paused = lock;
        self
    }

    pub fn phase(&self) -> Phase {
        if self.over {
            Phase::GameOver
        } else if self.current_piece.is_none() {
            Phase::Idle
        } else if self.paused {
            Phase::Paused
        } else {
            Phase::Running
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            board: self.board.clone(),
            current: self.current_piece,
            next: self.next_piece,
            score: self.score.points,
            level: self.score.level,
            lines: self.score.lines,
            drop_interval: self.drop_interval,
            over: self.over,
            paused: self.paused,
            phase: self.phase(),
        }
    }

    /// Hand over all events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Start a fresh game, from any phase
    pub fn start(&mut self) {
        self.board = Board::new();
        self.score = Score::new();
        self.drop_interval = START_INTERVAL;
        self.over = false;
        self.paused = false;
        self.current_piece = None;
        self.next_piece = None;
        self.events.clear();

        tracing::info!("Game started");
        self.scheduler.rearm(self.drop_interval);
        self.spawn();
    }

    /// Apply every gravity tick that fell due by `now`. Ticks still owed to a
    /// timer that was replaced or cancelled along the way are dropped.
    pub fn update(&mut self, now: Instant) {
        let due = self.scheduler.poll(now);
        let timer = self.scheduler.generation();
        for _ in 0..due {
            if self.over || self.paused || self.scheduler.generation() != timer {
                break;
            }
            self.tick();
        }
    }

    /// Gravity: fall one row, or settle the piece if it is resting
    pub fn tick(&mut self) {
        if self.paused || self.over {
            return;
        }
        self.step_down();
    }

    /// Shift the piece by `dx` columns if it fits
    pub fn move_piece(&mut self, dx: i32) {
        if self.controls_locked() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if !self.board.collides(piece, 0, dx) {
            piece.col += dx;
        }
    }

    /// Rotate clockwise, kicking one column left or right if needed
    pub fn rotate(&mut self) -> RotateOutcome {
        if self.controls_locked() {
            return RotateOutcome::Blocked;
        }
        let Some(piece) = &mut self.current_piece else {
            return RotateOutcome::Blocked;
        };

        let mut rotated = piece.rotated();
        let outcome = if !self.board.collides(&rotated, 0, 0) {
            RotateOutcome::InPlace
        } else if !self.board.collides(&rotated, 0, -1) {
            rotated.col -= 1;
            RotateOutcome::KickedLeft
        } else if !self.board.collides(&rotated, 0, 1) {
            rotated.col += 1;
            RotateOutcome::KickedRight
        } else {
            return RotateOutcome::Blocked;
        };

        *piece = rotated;
        outcome
    }

    /// One row down on request, settling the piece if it cannot fall
    pub fn soft_drop(&mut self) {
        if self.controls_locked() {
            return;
        }
        self.step_down();
    }

    /// Drop straight to the lowest free row and settle there
    pub fn hard_drop(&mut self) {
        if self.controls_locked() {
            return;
        }
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        while !self.board.collides(piece, 1, 0) {
            piece.row += 1;
        }
        self.settle();
    }

    /// Suspend or resume gravity
    pub fn set_paused(&mut self, paused: bool) {
        if self.over || self.current_piece.is_none() || self.paused == paused {
            return;
        }
        self.paused = paused;
        if paused {
            self.scheduler.cancel();
            tracing::info!("Paused");
        } else {
            self.scheduler.rearm(self.drop_interval);
            tracing::info!("Resumed");
        }
    }

    fn controls_locked(&self) -> bool {
        self.over || (self.paused && self.lock_controls_while_paused)
    }

    fn step_down(&mut self) {
        let Some(piece) = &mut self.current_piece else {
            return;
        };
        if self.board.collides(piece, 1, 0) {
            self.settle();
        } else {
            piece.row += 1;
        }
    }

    /// Lock the current piece, clear lines, score them and spawn the next piece
    fn settle(&mut self) {
        let Some(piece) = self.current_piece.take() else {
            return;
        };

        let lost = self.board.lock(&piece);
        if lost > 0 {
            tracing::warn!("{} cells of {} locked above the top", lost, piece.kind.name());
        }

        let events = &mut self.events;
        let cleared = self
            .board
            .clear_full_rows(|row| events.push(GameEvent::RowCleared(row)));

        if cleared > 0 {
            let level_changed = self.score.add_clear(cleared as u32);
            self.drop_interval = self.score.drop_interval();
            tracing::debug!(
                "Cleared {} lines, score={} level={}",
                cleared,
                self.score.points,
                self.score.level
            );
            if level_changed {
                tracing::info!(
                    "Level {} reached, gravity every {}ms",
                    self.score.level,
                    self.drop_interval.as_millis()
                );
                self.events.push(GameEvent::LevelUp {
                    level: self.score.level,
                });
            }
            if !self.paused {
                self.scheduler.rearm(self.drop_interval);
            }
        }

        self.spawn();
    }

    /// Promote the next piece and draw a new one. A spawn that collides ends
    /// the game.
    fn spawn(&mut self) {
        let current = match self.next_piece.take() {
            Some(piece) => piece,
            None => self.factory.create(),
        };
        self.next_piece = Some(self.factory.create());
        self.current_piece = Some(current);
        tracing::debug!("Spawned {}", current.kind.name());

        if self.board.collides(&current, 0, 0) {
            self.over = true;
            self.scheduler.cancel();
            tracing::info!("Game over, final score {}", self.score.points);
            self.events.push(GameEvent::GameOver {
                score: self.score.points,
            });
        }
    }
}
