//! Game state module - the board engine
//!
//! This module ties together all core components: board, pieces, piece
//! source, and scoring. It owns the lifecycle state machine, applies
//! commands atomically, and buffers notifications for the score ledger.
//!
//! Every command is a no-op unless its precondition holds; nothing here
//! panics or returns an error for an expected gameplay condition. A blocked
//! move or rotation simply reports `false` and leaves the state untouched.

use log::{debug, info};

use crate::board::Board;
use crate::events::ScoreListener;
use crate::pieces::{try_rotate, Shape, SPAWN_POSITION};
use crate::rng::{PieceSource, RandomPieces};
use crate::scoring::{drop_interval_ms, hard_drop_bonus, level_for_lines, line_clear_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, NextSnapshot};
use crate::types::*;

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub x: i8,
    pub y: i8,
}

impl Piece {
    /// Create a new piece with its template shape at the spawn anchor
    pub fn new(kind: PieceKind) -> Self {
        let (x, y) = SPAWN_POSITION;
        Self {
            kind,
            shape: Shape::template(kind),
            x,
            y,
        }
    }

    /// Check if all minos are at valid positions on the board
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_shape(&self.shape, self.x, self.y)
    }

    /// Anchor shifted by (dx, dy), or `None` if it leaves the `i8` range
    pub fn offset(&self, dx: i8, dy: i8) -> Option<(i8, i8)> {
        Some((self.x.checked_add(dx)?, self.y.checked_add(dy)?))
    }

    /// Absolute grid cells covered by the piece
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape
            .cells()
            .iter()
            .map(move |&(dx, dy)| (self.x + dx, self.y + dy))
    }
}

/// Result of a gravity step, soft drop, or hard drop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// Precondition not met (not running, no piece, stale timer)
    Ignored,
    /// Piece descended one row
    Moved,
    /// Piece locked; line clear and respawn already happened
    Locked(LockEvent),
}

impl DropOutcome {
    pub fn is_applied(&self) -> bool {
        !matches!(self, DropOutcome::Ignored)
    }

    pub fn lock_event(&self) -> Option<LockEvent> {
        match self {
            DropOutcome::Locked(ev) => Some(*ev),
            _ => None,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState<P: PieceSource = RandomPieces> {
    board: Board,
    active: Option<Piece>,
    next: Option<PieceKind>,
    source: P,
    status: EngineStatus,
    /// Bumped on every transition that must invalidate pending gravity timers.
    generation: u32,
    /// Notifications not yet delivered.
    events: Vec<GameEvent>,
    score: u32,
    level: u32,
    lines: u32,
    drop_interval_ms: u32,
    /// Host-clock accumulator for [`GameState::advance`].
    drop_timer_ms: u32,
}

impl GameState<RandomPieces> {
    /// Create a new game with uniformly random pieces from the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_source(RandomPieces::new(seed))
    }
}

impl<P: PieceSource> GameState<P> {
    /// Create a new idle game drawing pieces from `source`
    pub fn with_source(source: P) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            source,
            status: EngineStatus::Idle,
            generation: 0,
            events: Vec::new(),
            score: 0,
            level: 1,
            lines: 0,
            drop_interval_ms: BASE_DROP_MS,
            drop_timer_ms: 0,
        }
    }

    pub fn status(&self) -> EngineStatus {
        self.status
    }

    pub fn is_running(&self) -> bool {
        self.status.is_running()
    }

    pub fn is_over(&self) -> bool {
        self.status.is_over()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Current gravity interval; always reflects the live level
    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn active(&self) -> Option<Piece> {
        self.active
    }

    pub fn next_kind(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Replace the grid before a game starts.
    ///
    /// Only accepted while idle, so the no-overlap invariant cannot be broken
    /// under a live piece. Returns false otherwise.
    pub fn load_board(&mut self, board: Board) -> bool {
        if self.status != EngineStatus::Idle {
            return false;
        }
        self.board = board;
        true
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next.map(NextSnapshot::from);
        out.status = self.status;
        out.running = self.status.is_running();
        out.over = self.status.is_over();
        out.generation = self.generation;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.drop_interval_ms = self.drop_interval_ms;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Drain buffered notifications, oldest first.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Forward buffered notifications to a listener and clear the buffer.
    pub fn dispatch_events<L: ScoreListener + ?Sized>(&mut self, listener: &mut L) {
        for event in self.events.drain(..) {
            listener.handle(&event);
        }
    }

    fn invalidate_timers(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        self.drop_timer_ms = 0;
    }

    /// Start the game (or resume it when paused).
    ///
    /// From idle, spawns the first piece; a blocked spawn ends the game
    /// immediately.
    pub fn start(&mut self) -> bool {
        match self.status {
            EngineStatus::Idle => {
                self.status = EngineStatus::Running;
                self.invalidate_timers();
                info!("game started (generation {})", self.generation);
                if self.active.is_none() {
                    self.spawn_piece();
                }
                true
            }
            EngineStatus::Paused => self.resume(),
            EngineStatus::Running | EngineStatus::GameOver => false,
        }
    }

    pub fn pause(&mut self) -> bool {
        if self.status != EngineStatus::Running {
            return false;
        }
        self.status = EngineStatus::Paused;
        self.invalidate_timers();
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.status != EngineStatus::Paused {
            return false;
        }
        self.status = EngineStatus::Running;
        self.invalidate_timers();
        true
    }

    /// Return to idle with an empty board and a fresh session.
    ///
    /// The piece source keeps its position in the stream. A non-zero score
    /// is reported as dropping back to 0.
    pub fn reset(&mut self) {
        let had_score = self.score != 0;

        self.board.clear();
        self.active = None;
        self.next = None;
        self.status = EngineStatus::Idle;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.drop_interval_ms = drop_interval_ms(1);
        self.invalidate_timers();

        if had_score {
            self.events.push(GameEvent::ScoreChanged { score: 0 });
        }
        debug!("game reset (generation {})", self.generation);
    }

    /// Spawn the next piece at the spawn anchor and refill the preview.
    ///
    /// If the spawn anchor is blocked the game ends and the piece is not
    /// placed. Returns whether a piece was spawned.
    fn spawn_piece(&mut self) -> bool {
        let kind = match self.next.take() {
            Some(kind) => kind,
            None => self.source.next_kind(),
        };
        let piece = Piece::new(kind);

        if !piece.is_valid(&self.board) {
            self.next = Some(kind);
            self.enter_game_over();
            return false;
        }

        self.active = Some(piece);
        self.next = Some(self.source.next_kind());
        true
    }

    fn enter_game_over(&mut self) {
        self.status = EngineStatus::GameOver;
        self.active = None;
        self.invalidate_timers();
        self.events.push(GameEvent::GameEnded {
            final_score: self.score,
        });
        info!(
            "game over: score {}, lines {}, level {}",
            self.score, self.lines, self.level
        );
    }

    /// Try to move the active piece; commits only if the target is valid.
    ///
    /// An offset that leaves the coordinate range is an invalid move.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let Some((x, y)) = active.offset(dx, dy) else {
            return false;
        };
        if !self.board.is_valid_shape(&active.shape, x, y) {
            return false;
        }

        self.active = Some(Piece { x, y, ..active });
        true
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// Rotate the active piece clockwise in place; no wall kicks
    pub fn rotate(&mut self) -> bool {
        if !self.is_running() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match try_rotate(&active.shape, active.x, active.y, |x, y| {
            self.board.is_valid(x, y)
        }) {
            Some(shape) => {
                self.active = Some(Piece { shape, ..active });
                true
            }
            None => false,
        }
    }

    /// One gravity step: descend a row, or lock when blocked
    pub fn tick(&mut self) -> DropOutcome {
        if !self.is_running() || self.active.is_none() {
            return DropOutcome::Ignored;
        }
        if self.try_move(0, 1) {
            return DropOutcome::Moved;
        }
        DropOutcome::Locked(self.lock_piece(0))
    }

    /// Player-initiated gravity step (no extra points)
    pub fn soft_drop(&mut self) -> DropOutcome {
        self.tick()
    }

    /// Gravity step from a timer armed at `generation`.
    ///
    /// Firings from a timer armed before the last pause/reset/restart are
    /// discarded.
    pub fn tick_for(&mut self, generation: u32) -> DropOutcome {
        if generation != self.generation {
            debug!(
                "discarding stale tick (armed {}, current {})",
                generation, self.generation
            );
            return DropOutcome::Ignored;
        }
        self.tick()
    }

    /// Drop to the resting row, award 2 points per row, then lock
    pub fn hard_drop(&mut self) -> DropOutcome {
        if !self.is_running() || self.active.is_none() {
            return DropOutcome::Ignored;
        }

        let mut distance: u32 = 0;
        while self.try_move(0, 1) {
            distance += 1;
        }

        let bonus = hard_drop_bonus(distance);
        if bonus > 0 {
            self.score = self.score.saturating_add(bonus);
            self.events.push(GameEvent::ScoreChanged { score: self.score });
        }

        DropOutcome::Locked(self.lock_piece(bonus))
    }

    /// Lock the active piece, clear lines, update progression, respawn.
    fn lock_piece(&mut self, drop_bonus: u32) -> LockEvent {
        let level_before = self.level;
        let mut event = LockEvent {
            drop_bonus,
            level_before,
            level_after: level_before,
            ..LockEvent::default()
        };

        let Some(active) = self.active.take() else {
            return event;
        };

        self.board
            .lock_shape(&active.shape, active.x, active.y, active.kind);

        let cleared = self.board.clear_full_rows();
        let lines_cleared = cleared.len() as u32;
        debug!(
            "locked {:?} at ({}, {}), cleared rows {:?}",
            active.kind,
            active.x,
            active.y,
            cleared.as_slice()
        );

        if lines_cleared > 0 {
            // Points use the level in effect before this clear is counted.
            let points = line_clear_points(lines_cleared, level_before);
            self.lines = self.lines.saturating_add(lines_cleared);
            self.score = self.score.saturating_add(points);
            self.level = level_for_lines(self.lines);
            self.drop_interval_ms = drop_interval_ms(self.level);

            event.lines_cleared = lines_cleared;
            event.line_clear_score = points;
            event.level_after = self.level;

            self.events.push(GameEvent::LinesCleared {
                count: lines_cleared,
                total: self.lines,
            });
            if points > 0 {
                self.events.push(GameEvent::ScoreChanged { score: self.score });
            }
            if self.level != level_before {
                info!(
                    "level up: {} -> {} (interval {}ms)",
                    level_before, self.level, self.drop_interval_ms
                );
                self.events.push(GameEvent::LevelUp { level: self.level });
            }
        }

        event.game_over = !self.spawn_piece();
        event
    }

    /// Feed host-clock time; issues one gravity tick per elapsed interval.
    ///
    /// The interval is re-read after every tick, so a level-up shortens the
    /// very next wait. Returns the number of ticks issued.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.is_running() {
            return 0;
        }
        self.drop_timer_ms = self.drop_timer_ms.saturating_add(elapsed_ms);

        let mut ticks = 0;
        while self.is_running() && self.drop_timer_ms >= self.drop_interval_ms {
            self.drop_timer_ms -= self.drop_interval_ms;
            self.tick();
            ticks += 1;
        }
        ticks
    }

    /// Apply a command; returns whether it changed anything
    pub fn apply_command(&mut self, command: Command) -> bool {
        match command {
            Command::Start => self.start(),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::Reset => {
                self.reset();
                true
            }
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop().is_applied(),
            Command::Rotate => self.rotate(),
            Command::HardDrop => self.hard_drop().is_applied(),
            Command::Tick => self.tick().is_applied(),
        }
    }

    /// Row the active piece would come to rest at
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;

        let mut y = active.y;
        while let Some(below) = y.checked_add(1) {
            if !self.board.is_valid_shape(&active.shape, active.x, below) {
                break;
            }
            y = below;
        }
        Some(y)
    }

    /// Check if the active piece could move by (dx, dy)
    pub fn can_move(&self, dx: i8, dy: i8) -> bool {
        self.active.is_some_and(|active| {
            active
                .offset(dx, dy)
                .is_some_and(|(x, y)| self.board.is_valid_shape(&active.shape, x, y))
        })
    }
}

impl Default for GameState<RandomPieces> {
    fn default() -> Self {
        Self::new(1)
    }
}
