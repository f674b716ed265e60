//! Session acts as the controller for a human playing against the engine.
//!
//! A Session owns the game being played or replayed, decides whose turn it is,
//! runs engine searches on a background thread, and keeps the clock, the
//! win/loss/draw tally and the saved game list.
//!
//! All methods are called from one thread of control. Searches run on their
//! own thread against a copy of the position, and their results are only
//! applied from `poll_ai_move` or `await_ai_move` after checking that the
//! position they were started from is still current.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;

use shakmaty::san::SanPlus;
use shakmaty::{Color, Move, Position, Square};
use tracing::{debug, info, warn};

use crate::board::ChessBoard;
use crate::clock::{Clock, Tick, TimeoutPolicy};
use crate::config::SessionConfig;
use crate::coretypes::{side_name, Difficulty};
use crate::error::{self, ErrorKind};
use crate::game::{Game, Navigation};
use crate::saved::SavedGames;
use crate::search::{self, SearchResult};
use crate::tally::{GameResult, Tally};

/// Lifecycle of the game held by a Session.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Phase {
    /// No game against the engine is running. Moves may still be played freely.
    Idle,
    /// A game against the engine is running.
    InProgress,
    /// The last game against the engine has ended.
    Concluded,
}

/// A search running on its own thread.
struct PendingSearch {
    /// Session epoch the search was started in.
    epoch: u64,
    stopper: Arc<AtomicBool>,
    receiver: Receiver<SearchResult<Move>>,
    handle: JoinHandle<()>,
}

impl PendingSearch {
    /// Blocks until the search thread has exited.
    fn join(self) {
        if self.handle.join().is_err() {
            warn!("search thread panicked");
        }
    }

    /// Signals the search to stop and waits for it.
    fn cancel(self) {
        self.stopper.store(true, Ordering::Relaxed);
        self.join();
    }
}

pub struct Session {
    config: SessionConfig,
    game: Game,
    phase: Phase,
    ai_enabled: bool,
    human_side: Color,
    difficulty: Difficulty,
    clock: Clock,
    tally: Tally,
    saved_games: SavedGames,

    // Incremented on every change to the game or to AI mode.
    // A search result is only applied in the epoch it was started in.
    epoch: u64,
    pending: Option<PendingSearch>,
}

impl Session {
    /// Create an idle session at the start position, with AI mode off
    /// and the human playing White.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            game: Game::start_position(),
            phase: Phase::Idle,
            ai_enabled: false,
            human_side: Color::White,
            difficulty: config.difficulty,
            clock: Clock::new(config.time_budget_secs),
            tally: Tally::new(),
            saved_games: SavedGames::new(),
            epoch: 0,
            pending: None,
        }
    }

    /// Start a new game against the engine from the start position.
    pub fn start_game(&mut self, human_side: Color) {
        self.cancel_search();
        self.game = Game::start_position();
        self.human_side = human_side;
        self.ai_enabled = true;
        self.phase = Phase::InProgress;
        self.clock = Clock::new(self.config.time_budget_secs);
        self.clock.start();
        self.epoch += 1;
        info!(
            human = side_name(human_side),
            difficulty = %self.difficulty,
            "game started"
        );
    }

    /// Apply the human's move from one square to another at the current cursor.
    /// Promotions are always to a queen.
    ///
    /// Rejected without any change while a search is pending,
    /// when it is the engine's turn, when the game is over, or when the move is illegal.
    pub fn apply_human_move(&mut self, from: Square, to: Square) -> error::Result<SanPlus> {
        if self.pending.is_some() {
            return Err(ErrorKind::SearchInFlight.into());
        }
        if self.game.board().is_game_over() {
            return Err(ErrorKind::GameOver.into());
        }
        if !self.is_human_turn() {
            return Err(ErrorKind::NotHumanTurn.into());
        }
        let move_ = self
            .game
            .board()
            .find_move(from, to)
            .ok_or_else(|| error::Error::from((ErrorKind::IllegalMove, format!("{from}{to}"))))?;

        Ok(self.commit_move(&move_))
    }

    /// Start an engine search if it is the engine's turn and none is pending.
    /// Returns true if a search was started.
    pub fn trigger_ai_move_if_due(&mut self) -> bool {
        if self.pending.is_some() || !self.is_ai_turn() {
            return false;
        }

        let depth = self.config.depth(self.difficulty);
        let stopper = Arc::new(AtomicBool::new(false));
        let (sender, receiver) = mpsc::channel();
        let handle = search::search_nonblocking(
            self.game.board().clone(),
            depth,
            self.config.search,
            Arc::clone(&stopper),
            sender,
        );
        self.pending = Some(PendingSearch {
            epoch: self.epoch,
            stopper,
            receiver,
            handle,
        });
        debug!(depth, cursor = self.game.cursor(), "search dispatched");
        true
    }

    /// Apply the pending search's move if it has finished. Never blocks.
    /// Returns the applied move, or None if no move was applied.
    pub fn poll_ai_move(&mut self) -> Option<SanPlus> {
        let pending = self.pending.as_ref()?;
        let received = match pending.receiver.try_recv() {
            Ok(search_result) => Some(search_result),
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Disconnected) => None,
        };
        self.finish_search(received)
    }

    /// Block until the pending search finishes, then apply its move.
    /// Returns the applied move, or None if no search was pending or its result was discarded.
    pub fn await_ai_move(&mut self) -> Option<SanPlus> {
        let pending = self.pending.as_ref()?;
        let received = pending.receiver.recv().ok();
        self.finish_search(received)
    }

    /// Consume the pending search, applying its move only if the position it
    /// was searched from is still current and it is still the engine's turn.
    fn finish_search(&mut self, received: Option<SearchResult<Move>>) -> Option<SanPlus> {
        let pending = self.pending.take()?;
        let epoch = pending.epoch;
        pending.join();

        let search_result = match received {
            Some(search_result) => search_result,
            None => {
                warn!("search ended without a result");
                return None;
            }
        };
        debug!(
            nodes = search_result.nodes,
            cut_nodes = search_result.cut_nodes,
            score = %search_result.score,
            elapsed_ms = search_result.elapsed.as_millis() as u64,
            "search finished"
        );

        if epoch != self.epoch || search_result.stopped || !self.is_ai_turn() {
            warn!("discarding stale search result");
            return None;
        }
        let best_move = search_result.best_move?;
        if !self.game.board().position().is_legal(&best_move) {
            warn!(?best_move, "discarding illegal search result");
            return None;
        }

        Some(self.commit_move(&best_move))
    }

    /// Stop any pending search and discard its result.
    pub fn cancel_search(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!("cancelling pending search");
            pending.cancel();
        }
    }

    /// Take one second off the clock while AI mode is on.
    /// Reaching zero concludes the game only under `TimeoutPolicy::HumanForfeits`.
    pub fn tick(&mut self) -> Tick {
        if !self.ai_enabled {
            return Tick::Idle;
        }
        let tick = self.clock.tick();
        if tick == Tick::Expired {
            info!(policy = ?self.config.timeout_policy, "clock expired");
            if self.config.timeout_policy == TimeoutPolicy::HumanForfeits {
                self.cancel_search();
                self.conclude(GameResult::Loss);
            }
        }
        tick
    }

    /// Move the cursor to `index`, `-1` being the start position, and rebuild
    /// the current position by replay. A pending search is cancelled.
    /// Out of range indices are rejected without any change.
    pub fn go_to_move(&mut self, index: isize) -> error::Result<()> {
        self.game.check_index(index)?;
        self.cancel_search();
        self.game.go_to(index)?;
        self.epoch += 1;
        debug!(cursor = index, "navigated");
        Ok(())
    }

    pub fn go_to_start(&mut self) -> error::Result<()> {
        self.go_to_move(-1)
    }

    pub fn go_to_previous(&mut self) -> error::Result<()> {
        self.go_to_move(self.game.cursor() - 1)
    }

    pub fn go_to_next(&mut self) -> error::Result<()> {
        self.go_to_move(self.game.cursor() + 1)
    }

    pub fn go_to_end(&mut self) -> error::Result<()> {
        self.go_to_move(self.game.last_index())
    }

    /// Save the full move history under `name`. Returns the new entry's list position.
    pub fn save_current_game(&mut self, name: &str) -> error::Result<usize> {
        let record = self.game.record()?;
        let index = self.saved_games.push(name, record)?;
        info!(name = name.trim(), index, "game saved");
        Ok(index)
    }

    /// Replace the game with one parsed from `record`, with the cursor at its last move.
    /// AI mode is turned off. On error the session is left unchanged.
    pub fn load_record(&mut self, record: &str) -> error::Result<()> {
        let game = Game::from_record(record).map_err(|err| {
            warn!(%err, "record rejected");
            err
        })?;

        self.cancel_search();
        self.game = game;
        self.ai_enabled = false;
        self.phase = Phase::Idle;
        self.clock = Clock::new(self.config.time_budget_secs);
        self.epoch += 1;
        info!(moves = self.game.len(), "game loaded");
        Ok(())
    }

    /// Load the saved game at list position `index`. The saved list is not changed.
    pub fn load_saved_game(&mut self, index: usize) -> error::Result<()> {
        let record = self.saved_games.get(index)?.record().to_string();
        self.load_record(&record)
    }

    /// Turn AI mode on or off. Turning it on continues the game at the current
    /// cursor against the engine and runs the clock. Turning it off cancels any
    /// pending search and stops the clock.
    pub fn set_ai_enabled(&mut self, enabled: bool) -> error::Result<()> {
        if enabled == self.ai_enabled {
            return Ok(());
        }
        if enabled {
            if self.game.board().is_game_over() {
                return Err(ErrorKind::GameOver.into());
            }
            self.ai_enabled = true;
            self.phase = Phase::InProgress;
            self.clock.start();
        } else {
            self.cancel_search();
            self.ai_enabled = false;
            self.phase = Phase::Idle;
            self.clock.stop();
        }
        self.epoch += 1;
        info!(ai_enabled = enabled, "ai mode changed");
        Ok(())
    }

    /// Set the difficulty tier used for the next search.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        debug!(%difficulty, "difficulty changed");
    }

    /// Apply a legal move at the cursor and check whether it ends the game.
    fn commit_move(&mut self, move_: &Move) -> SanPlus {
        let san_plus = self.game.push(move_);
        self.epoch += 1;
        debug!(san = %san_plus, cursor = self.game.cursor(), "move applied");

        if let Some(outcome) = self.game.board().outcome() {
            self.conclude(GameResult::for_side(outcome, self.human_side));
        }
        san_plus
    }

    /// End the current game. The tally only counts games played against the engine.
    fn conclude(&mut self, result: GameResult) {
        if self.ai_enabled {
            self.tally.record(result);
        }
        self.ai_enabled = false;
        self.clock.stop();
        self.phase = Phase::Concluded;
        self.epoch += 1;
        info!(?result, tally = %self.tally, "game concluded");
    }

    /// True when the human may move: AI mode is off, or the human's side is to move.
    pub fn is_human_turn(&self) -> bool {
        !self.ai_enabled || self.game.board().turn() == self.human_side
    }

    /// True when the engine should move at the current position.
    pub fn is_ai_turn(&self) -> bool {
        self.ai_enabled
            && self.phase == Phase::InProgress
            && self.game.board().turn() != self.human_side
            && !self.game.board().is_game_over()
    }

    /// Returns true if a search is running or its result has not been consumed.
    pub fn is_search_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Const getters.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
    pub fn game(&self) -> &Game {
        &self.game
    }
    pub fn board(&self) -> &ChessBoard {
        self.game.board()
    }
    pub fn history(&self) -> &[SanPlus] {
        self.game.moves()
    }
    pub fn cursor(&self) -> isize {
        self.game.cursor()
    }
    pub fn phase(&self) -> Phase {
        self.phase
    }
    pub fn ai_enabled(&self) -> bool {
        self.ai_enabled
    }
    pub fn human_side(&self) -> Color {
        self.human_side
    }
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }
    pub fn clock(&self) -> &Clock {
        &self.clock
    }
    pub fn tally(&self) -> &Tally {
        &self.tally
    }
    pub fn saved_games(&self) -> &SavedGames {
        &self.saved_games
    }

    /// Remaining time as `M:SS`.
    pub fn formatted_time(&self) -> String {
        self.clock.formatted()
    }

    pub fn saved_game_names(&self) -> Vec<&str> {
        self.saved_games.names()
    }

    /// Squares the piece on `from` may move to, for highlighting.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        self.game.board().legal_destinations(from)
    }

    /// Enabled state of the first/previous/next/last controls.
    pub fn navigation(&self) -> Navigation {
        self.game.navigation()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.cancel_search();
    }
}
