//! Notifications for the score ledger.
//!
//! The engine buffers [`GameEvent`]s as they happen; a host drains them with
//! [`GameState::take_events`](crate::GameState::take_events) or forwards them
//! to a [`ScoreListener`] with
//! [`GameState::dispatch_events`](crate::GameState::dispatch_events).

use serde::{Deserialize, Serialize};

use crate::types::GameEvent;

/// Receiver for engine notifications. All methods default to no-ops.
pub trait ScoreListener {
    /// Score changed (increases during play, drops to 0 on reset)
    fn on_score_changed(&mut self, _score: u32) {}

    /// Fired exactly once per game, on the transition into game over
    fn on_game_end(&mut self, _final_score: u32) {}

    fn on_lines_cleared(&mut self, _count: u32, _total: u32) {}

    fn on_level_up(&mut self, _level: u32) {}

    /// Route one event to the matching callback
    fn handle(&mut self, event: &GameEvent) {
        match *event {
            GameEvent::ScoreChanged { score } => self.on_score_changed(score),
            GameEvent::LinesCleared { count, total } => self.on_lines_cleared(count, total),
            GameEvent::LevelUp { level } => self.on_level_up(level),
            GameEvent::GameEnded { final_score } => self.on_game_end(final_score),
        }
    }
}

/// Listener that ignores everything
impl ScoreListener for () {}

impl<L: ScoreListener + ?Sized> ScoreListener for Box<L> {
    fn on_score_changed(&mut self, score: u32) {
        (**self).on_score_changed(score)
    }

    fn on_game_end(&mut self, final_score: u32) {
        (**self).on_game_end(final_score)
    }

    fn on_lines_cleared(&mut self, count: u32, total: u32) {
        (**self).on_lines_cleared(count, total)
    }

    fn on_level_up(&mut self, level: u32) {
        (**self).on_level_up(level)
    }
}

/// Records every event in order
impl ScoreListener for Vec<GameEvent> {
    fn on_score_changed(&mut self, score: u32) {
        self.push(GameEvent::ScoreChanged { score });
    }

    fn on_game_end(&mut self, final_score: u32) {
        self.push(GameEvent::GameEnded { final_score });
    }

    fn on_lines_cleared(&mut self, count: u32, total: u32) {
        self.push(GameEvent::LinesCleared { count, total });
    }

    fn on_level_up(&mut self, level: u32) {
        self.push(GameEvent::LevelUp { level });
    }
}

/// In-memory score ledger: current score, best score and per-game statistics.
///
/// Nothing here is persisted; a host that wants durable high scores
/// serializes the tracker itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub current_score: u32,
    pub high_score: u32,
    pub games_played: u32,
    pub total_score: u64,
}

impl ScoreTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean final score over finished games, rounded to nearest
    pub fn average_score(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        let games = u64::from(self.games_played);
        ((self.total_score + games / 2) / games) as u32
    }
}

impl ScoreListener for ScoreTracker {
    fn on_score_changed(&mut self, score: u32) {
        self.current_score = score;
        self.high_score = self.high_score.max(score);
    }

    fn on_game_end(&mut self, final_score: u32) {
        self.games_played += 1;
        self.total_score += u64::from(final_score);
        self.high_score = self.high_score.max(final_score);
    }
}
