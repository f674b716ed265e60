//! ChessBoard, the reversible chess position used by search and sessions.
//!
//! Rules (legal moves, check, mate, stalemate, SAN) come from `shakmaty`.
//! ChessBoard adds what search and replay need on top:
//! an undo stack so moves can be applied and reverted in place,
//! and position keys for repetition and fifty-move draw detection.

use std::fmt::{self, Display};

use shakmaty::fen::Fen;
use shakmaty::san::{San, SanPlus, Suffix};
use shakmaty::uci::UciMove;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{Board, CastlingMode, Chess, Color, EnPassantMode, Move, Outcome, Position};
use shakmaty::{Role, Square};

use crate::coretypes::Cp;
use crate::error::{self, ErrorKind};
use crate::evaluation;
use crate::movelist::MoveList;
use crate::position::{MoveFeatures, SearchPosition};

/// Halfmove clock value at which the fifty-move rule draws a game.
const FIFTY_MOVE_HALFMOVES: u32 = 100;

/// Number of occurrences of a position that draws a game.
const REPETITION_DRAW_COUNT: usize = 3;

/// A chess position plus the stack of positions it was reached from.
///
/// `keys` always holds one Zobrist key per position on the path:
/// `keys.len() == undo_stack.len() + 1`, and the last key is the current position.
#[derive(Debug, Clone)]
pub struct ChessBoard {
    position: Chess,
    undo_stack: Vec<Chess>,
    keys: Vec<Zobrist64>,
}

impl ChessBoard {
    /// Standard chess start position.
    pub fn start_position() -> Self {
        Self::from(Chess::default())
    }

    /// Create a board from a FEN string. Standard castling only.
    pub fn from_fen(fen_str: &str) -> error::Result<Self> {
        let fen: Fen = fen_str
            .trim()
            .parse()
            .map_err(|err| (ErrorKind::Fen, format!("{fen_str}: {err}")))?;
        let position: Chess = fen
            .into_position(CastlingMode::Standard)
            .map_err(|err| (ErrorKind::Fen, format!("{fen_str}: {err}")))?;
        Ok(Self::from(position))
    }

    /// Const getters.
    pub fn position(&self) -> &Chess {
        &self.position
    }
    pub fn pieces(&self) -> &Board {
        self.position.board()
    }
    pub fn turn(&self) -> Color {
        self.position.turn()
    }

    /// Zobrist key of the current position.
    pub fn key(&self) -> Zobrist64 {
        Self::key_of(&self.position)
    }

    fn key_of(position: &Chess) -> Zobrist64 {
        position.zobrist_hash(EnPassantMode::Legal)
    }

    /// Number of moves applied since this board was created.
    pub fn plies(&self) -> usize {
        self.undo_stack.len()
    }

    /// Returns true if the current position and side to move match `other`.
    /// Move paths are not compared.
    pub fn same_position(&self, other: &Self) -> bool {
        self.key() == other.key() && self.pieces() == other.pieces() && self.turn() == other.turn()
    }

    pub fn is_check(&self) -> bool {
        self.position.is_check()
    }

    pub fn is_checkmate(&self) -> bool {
        self.position.is_checkmate()
    }

    /// True if the current position has occurred at least three times on this board's path.
    pub fn is_threefold_repetition(&self) -> bool {
        let key = self.key();
        self.keys.iter().filter(|&&old_key| old_key == key).count() >= REPETITION_DRAW_COUNT
    }

    pub fn is_fifty_moves(&self) -> bool {
        self.position.halfmoves() >= FIFTY_MOVE_HALFMOVES
    }

    /// Final result of the game at this position, if it is over.
    /// Checkmate, stalemate and insufficient material come from the rules engine,
    /// the fifty-move rule and threefold repetition from this board's history.
    pub fn outcome(&self) -> Option<Outcome> {
        self.position.outcome().or_else(|| {
            (self.is_fifty_moves() || self.is_threefold_repetition()).then_some(Outcome::Draw)
        })
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn is_draw(&self) -> bool {
        matches!(self.outcome(), Some(Outcome::Draw))
    }

    /// Find the legal move going from one square to another.
    /// Castling is given as the king's two-square move (e1g1).
    /// If the move promotes, it always promotes to a queen.
    pub fn find_move(&self, from: Square, to: Square) -> Option<Move> {
        self.position
            .legal_moves()
            .into_iter()
            .filter(|move_| match move_.to_uci(CastlingMode::Standard) {
                UciMove::Normal {
                    from: uci_from,
                    to: uci_to,
                    ..
                } => uci_from == from && uci_to == to,
                _ => false,
            })
            .find(|move_| matches!(move_.promotion(), None | Some(Role::Queen)))
    }

    /// All squares the piece on `from` may legally move to.
    pub fn legal_destinations(&self, from: Square) -> Vec<Square> {
        let mut destinations: Vec<Square> = self
            .position
            .legal_moves()
            .into_iter()
            .filter_map(|move_| match move_.to_uci(CastlingMode::Standard) {
                UciMove::Normal {
                    from: uci_from,
                    to,
                    ..
                } if uci_from == from => Some(to),
                _ => None,
            })
            .collect();
        destinations.sort();
        destinations.dedup();
        destinations
    }

    /// Apply a legal move and return its SAN with check or mate suffix.
    pub fn play_recorded(&mut self, move_: &Move) -> SanPlus {
        let san = San::from_move(&self.position, move_);
        self.do_move(move_);
        let suffix = Suffix::from_position(&self.position);
        SanPlus { san, suffix }
    }

    /// Resolve a SAN move against the current position and apply it.
    pub fn play_san(&mut self, san: &San) -> error::Result<SanPlus> {
        let move_ = san
            .to_move(&self.position)
            .map_err(|err| (ErrorKind::RecordIllegalMove, format!("{san}: {err}")))?;
        Ok(self.play_recorded(&move_))
    }
}

impl SearchPosition for ChessBoard {
    type Move = Move;

    fn legal_moves(&self) -> MoveList<Move> {
        self.position.legal_moves().into_iter().collect()
    }

    fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    fn is_game_over(&self) -> bool {
        ChessBoard::is_game_over(self)
    }

    fn evaluate(&self) -> Cp {
        evaluation::material(self.position.board())
    }

    fn move_features(&self, move_: &Move) -> Option<MoveFeatures> {
        self.position.is_legal(move_).then(|| MoveFeatures {
            capture: move_.is_capture(),
            promotion: move_.is_promotion(),
        })
    }

    fn do_move(&mut self, move_: &Move) {
        self.undo_stack.push(self.position.clone());
        self.position.play_unchecked(move_);
        self.keys.push(Self::key_of(&self.position));
    }

    fn undo_move(&mut self) {
        if let Some(previous) = self.undo_stack.pop() {
            self.position = previous;
            self.keys.pop();
        }
    }
}

impl From<Chess> for ChessBoard {
    fn from(position: Chess) -> Self {
        let key = Self::key_of(&position);
        Self {
            position,
            undo_stack: Vec::new(),
            keys: vec![key],
        }
    }
}

/// Defaults to standard chess start position.
impl Default for ChessBoard {
    fn default() -> Self {
        Self::start_position()
    }
}

/// Displays pretty-printed chess board, rank 8 at the top.
impl Display for ChessBoard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in (0..8u32).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u32 {
                let square = Square::new(rank * 8 + file);
                let c = self.pieces().piece_at(square).map_or('.', |piece| piece.char());
                write!(f, " {c}")?;
            }
            writeln!(f)?;
        }
        writeln!(f, "\n   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().unwrap()
    }

    #[test]
    fn do_then_undo_restores_position() {
        let mut board = ChessBoard::start_position();
        let before = board.clone();
        let move_ = board.find_move(sq("e2"), sq("e4")).unwrap();

        board.do_move(&move_);
        assert_eq!(board.turn(), Color::Black);
        assert_eq!(board.plies(), 1);

        board.undo_move();
        assert!(board.same_position(&before));
        assert_eq!(board.plies(), 0);
        assert_eq!(board.keys.len(), 1);
    }

    #[test]
    fn undo_on_fresh_board_is_noop() {
        let mut board = ChessBoard::start_position();
        board.undo_move();
        assert!(board.same_position(&ChessBoard::start_position()));
    }

    #[test]
    fn promotion_defaults_to_queen() {
        let board = ChessBoard::from_fen("8/4P3/8/8/8/k7/8/K7 w - - 0 1").unwrap();
        let move_ = board.find_move(sq("e7"), sq("e8")).unwrap();
        assert_eq!(move_.promotion(), Some(Role::Queen));
    }

    #[test]
    fn castling_by_king_squares() {
        let board =
            ChessBoard::from_fen("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1").unwrap();
        let castle = board.find_move(sq("e1"), sq("g1")).unwrap();
        assert!(castle.is_castle());
        assert!(board.legal_destinations(sq("e1")).contains(&sq("c1")));
    }

    #[test]
    fn illegal_from_to_not_found() {
        let board = ChessBoard::start_position();
        assert!(board.find_move(sq("e2"), sq("e5")).is_none());
        assert!(board.find_move(sq("e4"), sq("e5")).is_none());
        assert_eq!(
            board.legal_destinations(sq("g1")),
            vec![sq("f3"), sq("h3")]
        );
    }

    #[test]
    fn threefold_repetition_by_knight_shuffle() {
        let mut board = ChessBoard::start_position();
        let shuffle = ["Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8"];

        for (ply, san) in shuffle.iter().enumerate() {
            assert!(!board.is_game_over(), "game over before ply {ply}");
            board.play_san(&san.parse().unwrap()).unwrap();
        }

        assert!(board.is_threefold_repetition());
        assert!(board.is_draw());
    }

    #[test]
    fn fifty_move_rule_draws() {
        let board = ChessBoard::from_fen("8/8/8/8/8/k7/8/K6R w - - 100 80").unwrap();
        assert!(board.is_fifty_moves());
        assert_eq!(board.outcome(), Some(Outcome::Draw));
    }

    #[test]
    fn checkmate_outcome() {
        let mut board = ChessBoard::start_position();
        for san in ["f3", "e5", "g4", "Qh4"] {
            board.play_san(&san.parse().unwrap()).unwrap();
        }
        assert!(board.is_checkmate());
        assert!(!board.is_draw());
        assert_eq!(
            board.outcome(),
            Some(Outcome::Decisive {
                winner: Color::Black
            })
        );
    }

    #[test]
    fn recorded_san_has_suffix() {
        let mut board = ChessBoard::start_position();
        for san in ["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6"] {
            board.play_san(&san.parse().unwrap()).unwrap();
        }
        let mate = board.find_move(sq("h5"), sq("f7")).unwrap();
        assert_eq!(board.play_recorded(&mate).to_string(), "Qxf7#");
    }

    #[test]
    fn bad_fen_is_error() {
        let err = ChessBoard::from_fen("not a fen").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Fen);
    }
}
