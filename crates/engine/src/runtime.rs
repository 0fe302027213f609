//! Game loop task.
//!
//! One tokio task owns the [`GameState`]. Player commands arrive over a
//! bounded channel and gravity comes from a deadline inside the same
//! `select!`, so no two mutations ever overlap.
//!
//! The gravity deadline is armed only while the game is running. Each
//! deadline remembers the engine generation it was armed under; pausing,
//! resuming, resetting and game over all bump the generation, so a deadline
//! from before such a transition is dropped instead of firing into the new
//! phase.

use std::fmt;
use std::time::Duration;

use log::{debug, info};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use blockfall_core::{GameSnapshot, GameState, PieceSource, RandomPieces, ScoreListener};
use blockfall_types::Command;

use crate::config::LoopConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopError {
    /// The game loop has stopped
    Closed,
    /// The command queue is at capacity
    Full,
}

impl LoopError {
    pub fn code(self) -> &'static str {
        match self {
            LoopError::Closed => "loop_closed",
            LoopError::Full => "backpressure",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            LoopError::Closed => "game loop is not running",
            LoopError::Full => "too many pending commands",
        }
    }
}

impl fmt::Display for LoopError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for LoopError {}

impl<T> From<mpsc::error::TrySendError<T>> for LoopError {
    fn from(value: mpsc::error::TrySendError<T>) -> Self {
        match value {
            mpsc::error::TrySendError::Full(_) => LoopError::Full,
            mpsc::error::TrySendError::Closed(_) => LoopError::Closed,
        }
    }
}

/// Message delivered to the game loop.
#[derive(Debug)]
enum Request {
    Command(Command),
    Snapshot(oneshot::Sender<GameSnapshot>),
    Shutdown,
}

/// Cloneable sender side of a running game loop
#[derive(Debug, Clone)]
pub struct GameHandle {
    tx: mpsc::Sender<Request>,
}

impl GameHandle {
    /// Queue a command without waiting; fails with [`LoopError::Full`] when
    /// the queue is at capacity.
    pub fn send(&self, command: Command) -> Result<(), LoopError> {
        self.tx.try_send(Request::Command(command))?;
        Ok(())
    }

    /// Queue a command, waiting for queue capacity
    pub async fn submit(&self, command: Command) -> Result<(), LoopError> {
        self.tx
            .send(Request::Command(command))
            .await
            .map_err(|_| LoopError::Closed)
    }

    pub fn start(&self) -> Result<(), LoopError> {
        self.send(Command::Start)
    }

    pub fn pause(&self) -> Result<(), LoopError> {
        self.send(Command::Pause)
    }

    pub fn resume(&self) -> Result<(), LoopError> {
        self.send(Command::Resume)
    }

    pub fn reset(&self) -> Result<(), LoopError> {
        self.send(Command::Reset)
    }

    pub fn move_left(&self) -> Result<(), LoopError> {
        self.send(Command::MoveLeft)
    }

    pub fn move_right(&self) -> Result<(), LoopError> {
        self.send(Command::MoveRight)
    }

    pub fn soft_drop(&self) -> Result<(), LoopError> {
        self.send(Command::SoftDrop)
    }

    pub fn rotate(&self) -> Result<(), LoopError> {
        self.send(Command::Rotate)
    }

    pub fn hard_drop(&self) -> Result<(), LoopError> {
        self.send(Command::HardDrop)
    }

    pub fn tick(&self) -> Result<(), LoopError> {
        self.send(Command::Tick)
    }

    /// Current state, taken after every command queued before this call
    pub async fn snapshot(&self) -> Result<GameSnapshot, LoopError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(Request::Snapshot(reply_tx))
            .await
            .map_err(|_| LoopError::Closed)?;
        reply_rx.await.map_err(|_| LoopError::Closed)
    }

    /// Ask the loop to stop after the commands already queued
    pub async fn shutdown(&self) -> Result<(), LoopError> {
        self.tx
            .send(Request::Shutdown)
            .await
            .map_err(|_| LoopError::Closed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// A spawned game loop task and its handle
#[derive(Debug)]
pub struct GameLoop<L> {
    handle: GameHandle,
    task: JoinHandle<L>,
}

impl<L: ScoreListener + Send + 'static> GameLoop<L> {
    /// Spawn a loop over a fresh game with a random piece stream.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(config: LoopConfig, listener: L) -> Self {
        let source = match config.seed {
            Some(seed) => RandomPieces::new(seed),
            None => RandomPieces::from_entropy(),
        };
        info!("spawning game loop (seed {})", source.seed());
        Self::spawn_with(GameState::with_source(source), &config, listener)
    }

    /// Spawn a loop over an existing game state
    pub fn spawn_with<P>(state: GameState<P>, config: &LoopConfig, listener: L) -> Self
    where
        P: PieceSource + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(config.max_pending_commands.max(1));
        let task = tokio::spawn(run_loop(state, rx, listener, config.gravity));
        Self {
            handle: GameHandle { tx },
            task,
        }
    }

    pub fn handle(&self) -> GameHandle {
        self.handle.clone()
    }

    /// Stop the loop and get the listener back
    pub async fn join(self) -> Result<L, LoopError> {
        // Already stopped is fine; the task result below is what matters.
        let _ = self.handle.shutdown().await;
        self.task.await.map_err(|_| LoopError::Closed)
    }
}

/// Gravity deadline tagged with the generation and interval it was armed under
#[derive(Debug, Clone, Copy)]
struct Deadline {
    at: Instant,
    generation: u32,
    interval_ms: u32,
}

async fn run_loop<P, L>(
    mut state: GameState<P>,
    mut rx: mpsc::Receiver<Request>,
    mut listener: L,
    gravity: bool,
) -> L
where
    P: PieceSource,
    L: ScoreListener,
{
    let mut deadline: Option<Deadline> = None;

    loop {
        deadline = rearm(&state, deadline, gravity);
        let wake_at = deadline.map_or_else(Instant::now, |d| d.at);

        tokio::select! {
            request = rx.recv() => match request {
                Some(Request::Command(command)) => {
                    let applied = state.apply_command(command);
                    debug!("command {} applied={}", command.as_str(), applied);
                }
                Some(Request::Snapshot(reply)) => {
                    let _ = reply.send(state.snapshot());
                }
                Some(Request::Shutdown) | None => break,
            },
            _ = sleep_until(wake_at), if deadline.is_some() => {
                if let Some(fired) = deadline.take() {
                    state.tick_for(fired.generation);
                }
            }
        }

        state.dispatch_events(&mut listener);
    }

    state.dispatch_events(&mut listener);
    info!(
        "game loop stopped: status {}, score {}",
        state.status().as_str(),
        state.score()
    );
    listener
}

/// Keep the pending deadline if it is still current, otherwise arm a new one
/// with the live interval. A level change re-arms from now with the new
/// interval. No deadline exists outside the running phase.
fn rearm<P: PieceSource>(
    state: &GameState<P>,
    pending: Option<Deadline>,
    gravity: bool,
) -> Option<Deadline> {
    if !gravity || !state.is_running() {
        return None;
    }
    match pending {
        Some(d)
            if d.generation == state.generation()
                && d.interval_ms == state.drop_interval_ms() =>
        {
            Some(d)
        }
        stale => {
            if let Some(d) = stale {
                debug!(
                    "dropping gravity deadline from generation {} ({}ms)",
                    d.generation, d.interval_ms
                );
            }
            let interval_ms = state.drop_interval_ms();
            Some(Deadline {
                at: Instant::now() + Duration::from_millis(u64::from(interval_ms)),
                generation: state.generation(),
                interval_ms,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_core::ScriptedPieces;
    use blockfall_types::{EngineStatus, GameEvent, PieceKind};

    fn scripted_loop(gravity: bool) -> GameLoop<Vec<GameEvent>> {
        let state = GameState::with_source(ScriptedPieces::repeat(PieceKind::O));
        let config = LoopConfig {
            seed: None,
            max_pending_commands: 8,
            gravity,
        };
        GameLoop::spawn_with(state, &config, Vec::new())
    }

    #[test]
    fn test_loop_error_codes() {
        assert_eq!(LoopError::Full.code(), "backpressure");
        assert_eq!(LoopError::Closed.code(), "loop_closed");
        assert_eq!(
            LoopError::Full.to_string(),
            "backpressure: too many pending commands"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_gravity_ticks_on_interval() {
        let game = scripted_loop(true);
        let handle = game.handle();
        handle.start().unwrap();

        tokio::time::sleep(Duration::from_millis(2500)).await;
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.active.unwrap().y, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_gravity_while_paused() {
        let game = scripted_loop(true);
        let handle = game.handle();
        handle.start().unwrap();
        handle.pause().unwrap();

        tokio::time::sleep(Duration::from_millis(5000)).await;
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.status, EngineStatus::Paused);
        assert_eq!(snap.active.unwrap().y, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_restarts_full_interval() {
        let game = scripted_loop(true);
        let handle = game.handle();
        handle.start().unwrap();

        tokio::time::sleep(Duration::from_millis(900)).await;
        handle.pause().unwrap();
        handle.resume().unwrap();
        // The pre-pause deadline (due at 1000ms) must not fire.
        tokio::time::sleep(Duration::from_millis(500)).await;
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.active.unwrap().y, 0);

        tokio::time::sleep(Duration::from_millis(600)).await;
        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.active.unwrap().y, 1);
    }

    #[tokio::test]
    async fn test_commands_and_join_returns_listener() {
        let game = scripted_loop(false);
        let handle = game.handle();
        handle.start().unwrap();
        handle.hard_drop().unwrap();

        let snap = handle.snapshot().await.unwrap();
        assert_eq!(snap.score, 36);

        let events = game.join().await.unwrap();
        assert_eq!(events, vec![GameEvent::ScoreChanged { score: 36 }]);
        assert!(handle.is_closed());
        assert_eq!(handle.start(), Err(LoopError::Closed));
        assert_eq!(handle.snapshot().await, Err(LoopError::Closed));
    }
}
