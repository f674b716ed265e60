//! Move Ordering
//!
//! Functions used for ordering a list of moves from best to worst.
//!
//! Move ordering is important for alpha-beta pruning performance.
//! If the best or good moves are searched early on in an alpha-beta search,
//! pruning occurs more frequently. Ordering never changes the score a
//! search returns, only how many nodes it visits to get there.

use std::cmp::Reverse;

use arrayvec::ArrayVec;

use crate::coretypes::MAX_MOVES;
use crate::movelist::MoveList;
use crate::position::{MoveFeatures, SearchPosition};

/// Simple move ordering strategy. The following information is extracted from a move,
/// and used for sorting. The values go from most-to-least important based on
/// top-to-bottom declaration of fields.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Default)]
pub(crate) struct OrderStrategy {
    is_legal: bool,  // Moves that cannot be reconstructed in the position go last.
    promotion: bool, // Promoting moves.
    capture: bool,   // Capturing moves.
                     // All other moves remain with lowest but equal priority.
}

impl From<Option<MoveFeatures>> for OrderStrategy {
    fn from(maybe_features: Option<MoveFeatures>) -> Self {
        match maybe_features {
            Some(features) => Self {
                is_legal: true,
                promotion: features.promotion,
                capture: features.capture,
            },
            None => Self::default(),
        }
    }
}

/// Order all moves in a container completely, in order of best move to worst move.
/// The sort is stable, so moves of equal priority keep the order they were generated in.
///
/// # Arguments
///
/// * `position`: Position the moves are played from.
/// * `moves`: Moves to order, usually all legal moves of `position`.
pub fn order_all_moves<P: SearchPosition>(
    position: &P,
    moves: MoveList<P::Move>,
) -> MoveList<P::Move> {
    let mut ordering_vec: ArrayVec<(P::Move, OrderStrategy), MAX_MOVES> = moves
        .into_iter()
        .map(|move_| {
            let strategy = OrderStrategy::from(position.move_features(&move_));
            (move_, strategy)
        })
        .collect();

    // Sort all moves using their OrderStrategy as a key, greatest first.
    ordering_vec.sort_by_key(|pair| Reverse(pair.1));

    ordering_vec.into_iter().map(|pair| pair.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::ChessBoard;
    use shakmaty::{Position, Role, Square};

    #[test]
    fn order_all_moves_one_capture() {
        let board =
            ChessBoard::from_fen("rnb1k1nr/pppp1ppp/8/4p3/3P4/8/PPP1PPPP/RN2KBNR b - - 3 11")
                .unwrap();
        let legal_moves = board.legal_moves();
        let num_moves = legal_moves.len();
        let ordered = order_all_moves(&board, legal_moves);

        assert_eq!(ordered.len(), num_moves);
        assert!(ordered[0].is_capture());
        assert_eq!(ordered[0].from(), Some(Square::E5));
        assert_eq!(ordered[0].to(), Square::D4);
        assert!(ordered[1..].iter().all(|move_| !move_.is_capture()));
    }

    #[test]
    fn promotions_then_captures_then_quiet() {
        // White pawn on b7 may push or capture on a8/c8 while promoting, king and rook quiet moves.
        let board = ChessBoard::from_fen("n1n4k/1P6/8/8/8/8/8/K5R1 w - - 0 1").unwrap();
        let ordered = order_all_moves(&board, board.legal_moves());

        let first_quiet = ordered
            .iter()
            .position(|move_| !move_.is_promotion() && !move_.is_capture())
            .unwrap();
        assert!(ordered[..first_quiet].iter().all(|move_| move_.is_promotion()));
        // Capturing promotions sort before plain promotions.
        let first = &ordered[0];
        assert!(first.is_promotion() && first.is_capture());
        assert!(ordered
            .iter()
            .filter(|move_| move_.is_promotion())
            .all(|move_| move_.promotion().is_some()));
        assert!(ordered.iter().any(|move_| move_.promotion() == Some(Role::Knight)));
    }

    #[test]
    fn unreconstructable_move_sorts_last() {
        let board = ChessBoard::start_position();
        let other = ChessBoard::from_fen("4k3/8/8/8/8/8/4q3/4K3 w - - 0 1").unwrap();

        // Capturing the queen is legal in `other`, but not from the start position.
        let foreign = other
            .position()
            .legal_moves()
            .into_iter()
            .find(|move_| move_.is_capture())
            .unwrap();

        let mut moves = MoveList::new();
        moves.push(foreign.clone());
        moves.extend(board.legal_moves());
        let ordered = order_all_moves(&board, moves);

        assert_eq!(ordered.last(), Some(&foreign));
    }

    #[test]
    fn order_strategy_cmp() {
        let quiet = OrderStrategy::from(Some(MoveFeatures::default()));
        let capture = OrderStrategy::from(Some(MoveFeatures {
            capture: true,
            promotion: false,
        }));
        let promotion = OrderStrategy::from(Some(MoveFeatures {
            capture: false,
            promotion: true,
        }));
        let illegal = OrderStrategy::from(None);

        assert!(promotion > capture);
        assert!(capture > quiet);
        assert!(quiet > illegal);
    }
}
