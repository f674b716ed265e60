//! Search functions.

mod negamax;

pub use negamax::*;

use std::fmt::{self, Debug, Display};
use std::sync::atomic::AtomicBool;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use shakmaty::Color;
use tracing::debug;

use crate::coretypes::{sign, Cp, PlyKind};
use crate::position::SearchPosition;

/// Switches for the search heuristics. Both are on by default.
/// Turning them off never changes the score a search returns,
/// only the number of nodes it visits.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchOptions {
    /// Alpha-beta cutoffs. When false, search is plain minimax.
    pub pruning: bool,
    /// Sort promotions and captures first at every node.
    pub ordering: bool,
}

impl SearchOptions {
    /// Plain minimax over generation order. Used as a reference for the pruned search.
    pub const fn exhaustive() -> Self {
        Self {
            pruning: false,
            ordering: false,
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            pruning: true,
            ordering: true,
        }
    }
}

/// The results found from running a search on some root position.
#[derive(Debug, Clone)]
pub struct SearchResult<M> {
    /// The best move to make for a position discovered from search.
    /// None only if the root position had no legal moves.
    pub best_move: Option<M>,
    /// The centipawn score of making the best move, with absolute Cp (+White, -Black).
    pub score: Cp,
    /// The player to move for the root position that was searched.
    pub player: Color,
    /// Depth in plies that was searched. Only fully searched if `stopped` is false.
    pub depth: PlyKind,
    /// Total number of nodes visited in a search.
    pub nodes: u64,
    /// Number of nodes where a beta-cutoff was performed.
    pub cut_nodes: u64,
    /// Total time elapsed from the start to the end of a search.
    pub elapsed: Duration,
    /// Flag that indicates this search was aborted.
    pub stopped: bool,
}

impl<M> SearchResult<M> {
    /// Get average nodes per second of search.
    pub fn nps(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs > 0.0 {
            (self.nodes as f64 / secs).round()
        } else {
            0.0
        }
    }

    /// Converts the score of the search into one that is relative to search's root player.
    pub fn relative_score(&self) -> Cp {
        self.score * sign(self.player)
    }

    /// Converts the score of the search into one that is absolute, with White as + and Black as -.
    pub fn absolute_score(&self) -> Cp {
        self.score
    }

    /// Returns the color who is leading in the search of the root position, or None if even.
    pub fn leading(&self) -> Option<Color> {
        self.absolute_score().leading()
    }
}

impl<M: Debug> Display for SearchResult<M> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "SearchResult {{")?;
        writeln!(f, "    best_move: {:?}", self.best_move)?;
        writeln!(f, "    abs_score: {}", self.absolute_score())?;
        writeln!(f, "    player   : {:?}", self.player)?;
        writeln!(f, "    depth    : {}", self.depth)?;
        writeln!(f, "    nodes    : {}", self.nodes)?;
        writeln!(f, "    nps      : {}", self.nps())?;
        writeln!(
            f,
            "    elapsed  : {}.{:03}s",
            self.elapsed.as_secs(),
            self.elapsed.subsec_millis()
        )?;
        writeln!(f, "    cut_nodes: {}", self.cut_nodes)?;
        writeln!(f, "    stopped  : {}", self.stopped)?;
        writeln!(f, "}}")
    }
}

/// Returns the best move for the player to move, searching `depth` plies
/// with alpha-beta pruning and move ordering.
///
/// The position is restored before returning. Returns None only when the
/// position has no legal moves, which callers avoid by checking for game over first.
pub fn find_best_move<P: SearchPosition>(position: &mut P, depth: PlyKind) -> Option<P::Move> {
    search(position, depth, SearchOptions::default(), &AtomicBool::new(false)).best_move
}

/// Sparring Engine primary position search function.
pub fn search<P: SearchPosition>(
    position: &mut P,
    depth: PlyKind,
    options: SearchOptions,
    stopper: &AtomicBool,
) -> SearchResult<P::Move> {
    negamax(position, depth, options, stopper)
}

/// Sparring Engine non-blocking search function. This runs the search on a separate thread.
/// When the search has been completed, it returns the value by sending it over the given Sender.
///
/// # Arguments
///
/// * `position`: Root position, owned by the search thread
/// * `depth`: Number of plies to search
/// * `options`: Pruning and ordering switches
/// * `stopper`: Tell search to stop early from an external source
/// * `sender`: Channel to send search result over
pub fn search_nonblocking<P, T>(
    mut position: P,
    depth: PlyKind,
    options: SearchOptions,
    stopper: Arc<AtomicBool>,
    sender: mpsc::Sender<T>,
) -> thread::JoinHandle<()>
where
    P: SearchPosition + Send + 'static,
    T: From<SearchResult<P::Move>> + Send + 'static,
{
    thread::spawn(move || {
        let search_result = search(&mut position, depth, options, &stopper);
        if sender.send(search_result.into()).is_err() {
            debug!("search receiver closed, result dropped");
        }
    })
}
