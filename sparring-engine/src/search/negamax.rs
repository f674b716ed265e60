//! Negamax implementation of Minimax with Alpha-Beta pruning.

use std::cmp;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use tracing::{trace, warn};

use crate::coretypes::{sign, Cp, PlyKind, MAX_DEPTH};
use crate::movelist::MoveList;
use crate::moveorder::order_all_moves;
use crate::position::SearchPosition;
use crate::search::{SearchOptions, SearchResult};

/// Negamax implementation of Minimax with alpha-beta pruning.
/// Negamax searches to a given depth and returns the best move found.
/// Internally, Negamax treats the active player as the maxing player,
/// however the final centipawn score of the position returned is
/// absolute with White as maxing and Black as minning.
///
/// Every move tried is undone before returning, so `position` is unchanged
/// afterward, including when a cutoff or the stopper ends a loop early.
pub fn negamax<P: SearchPosition>(
    position: &mut P,
    depth: PlyKind,
    options: SearchOptions,
    stopper: &AtomicBool,
) -> SearchResult<P::Move> {
    let ply = match depth {
        0 => {
            warn!("search requested with depth 0, searching 1 ply");
            1
        }
        depth => cmp::min(depth, MAX_DEPTH),
    };

    let active_player = position.side_to_move();
    let instant = Instant::now();

    let mut searcher = Negamax {
        options,
        stopper,
        nodes: 0,
        cut_nodes: 0,
    };
    let (best_move, best_score) = searcher.root(position, ply);

    let result = SearchResult {
        best_move,
        score: best_score * sign(active_player),
        player: active_player,
        depth: ply,
        nodes: searcher.nodes,
        cut_nodes: searcher.cut_nodes,
        elapsed: instant.elapsed(),
        stopped: stopper.load(Ordering::Relaxed),
    };
    trace!(
        depth = result.depth,
        nodes = result.nodes,
        cut_nodes = result.cut_nodes,
        elapsed_ms = result.elapsed.as_millis() as u64,
        stopped = result.stopped,
        "negamax finished"
    );
    result
}

/// Search state shared by every node of one search.
struct Negamax<'a> {
    options: SearchOptions,
    stopper: &'a AtomicBool,
    nodes: u64,
    cut_nodes: u64,
}

impl Negamax<'_> {
    fn is_stopped(&self) -> bool {
        self.stopper.load(Ordering::Relaxed)
    }

    /// Legal moves, sorted best-first when ordering is enabled.
    fn moves<P: SearchPosition>(&self, position: &P) -> MoveList<P::Move> {
        let legal_moves = position.legal_moves();
        if self.options.ordering {
            order_all_moves(position, legal_moves)
        } else {
            legal_moves
        }
    }

    /// Static evaluation relative to the player to move.
    fn evaluate<P: SearchPosition>(position: &P) -> Cp {
        position.evaluate() * sign(position.side_to_move())
    }

    /// Root node links a score to its move.
    /// The first move in order is kept unless a later move scores strictly better.
    fn root<P: SearchPosition>(
        &mut self,
        position: &mut P,
        ply: PlyKind,
    ) -> (Option<P::Move>, Cp) {
        self.nodes += 1;
        let legal_moves = self.moves(position);

        if legal_moves.is_empty() {
            return (None, Self::evaluate(position));
        }

        let mut alpha = Cp::MIN;
        let beta = Cp::MAX;
        let mut best_move = None;
        let mut best_score = Cp::MIN;

        for legal_move in legal_moves {
            let move_score = {
                let mut child = position.play(&legal_move);
                -self.negamax_impl(&mut *child, ply - 1, -beta, -alpha)
            };

            if best_move.is_none() || move_score > best_score {
                best_score = move_score;
                best_move = Some(legal_move);
            }
            if self.options.pruning {
                alpha = cmp::max(alpha, best_score);
            }
            if self.is_stopped() {
                break;
            }
        }

        (best_move, best_score)
    }

    /// The player whose turn it is to move for a position is always treated as the maxing player.
    /// negamax_impl returns the max possible score of the current maxing player.
    /// Therefore, when interpreting the score of a child node, the score needs to be negated.
    ///
    /// alpha: Best (greatest) guaranteed value for current player.
    /// beta: Best (lowest) guaranteed value for opposite player.
    fn negamax_impl<P: SearchPosition>(
        &mut self,
        position: &mut P,
        ply: PlyKind,
        mut alpha: Cp,
        beta: Cp,
    ) -> Cp {
        self.nodes += 1;

        // Stop search at terminal nodes, game over or last depth.
        if ply == 0 || position.is_game_over() || self.is_stopped() {
            return Self::evaluate(position);
        }

        let legal_moves = self.moves(position);
        if legal_moves.is_empty() {
            return Self::evaluate(position);
        }

        let mut best_score = Cp::MIN;

        for legal_move in legal_moves {
            let move_score = {
                let mut child = position.play(&legal_move);
                -self.negamax_impl(&mut *child, ply - 1, -beta, -alpha)
            };
            best_score = cmp::max(best_score, move_score);

            if self.options.pruning {
                alpha = cmp::max(alpha, best_score);
                // Cut-off has occurred, no further children of this position need to be searched.
                // This branch will not be taken further up the tree as there is a better move.
                if alpha >= beta {
                    self.cut_nodes += 1;
                    break;
                }
            }
        }

        best_score
    }
}
