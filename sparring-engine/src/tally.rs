//! Win, loss and draw counts for the human player.

use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use shakmaty::{Color, Outcome};

/// Result of a concluded game, from the human player's point of view.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameResult {
    Win,
    Loss,
    Draw,
}

impl GameResult {
    /// Result for the human playing `human_side`, given how the game ended.
    pub fn for_side(outcome: Outcome, human_side: Color) -> Self {
        match outcome {
            Outcome::Draw => GameResult::Draw,
            Outcome::Decisive { winner } if winner == human_side => GameResult::Win,
            Outcome::Decisive { .. } => GameResult::Loss,
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
pub struct Tally {
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Tally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, result: GameResult) {
        match result {
            GameResult::Win => self.wins += 1,
            GameResult::Loss => self.losses += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    /// Number of concluded games.
    pub fn total(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    /// Percentage of concluded games won, 0.0 when no game has concluded.
    pub fn win_rate(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => f64::from(self.wins) * 100.0 / f64::from(total),
        }
    }
}

impl Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "wins {} losses {} draws {} ({:.0}%)",
            self.wins,
            self.losses,
            self.draws,
            self.win_rate()
        )
    }
}
