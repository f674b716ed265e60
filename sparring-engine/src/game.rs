//! Game structure.

use shakmaty::san::SanPlus;
use shakmaty::Move;

use crate::board::ChessBoard;
use crate::error::{self, ErrorKind};
use crate::movelist::MoveHistory;
use crate::record;

/// Game contains the moves played from the standard start position,
/// a replay cursor into those moves, and the position at the cursor.
///
/// The cursor is `-1` for the start position, otherwise the index of the last
/// applied move. `board` is always the position reached by replaying
/// `moves[0..=cursor]` from the start position.
#[derive(Debug, Clone)]
pub struct Game {
    board: ChessBoard,
    moves: MoveHistory,
    cursor: isize,
}

/// Which navigation controls can currently do anything.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Navigation {
    pub first: bool,
    pub previous: bool,
    pub next: bool,
    pub last: bool,
}

impl Game {
    /// Create a new game in the standard chess start position.
    pub fn start_position() -> Self {
        Self {
            board: ChessBoard::start_position(),
            moves: MoveHistory::new(),
            cursor: -1,
        }
    }

    /// Create a new Game from a sequence of moves, with the cursor at the last move.
    /// If a move in the move history is illegal, Err is returned.
    pub fn new(moves: MoveHistory) -> error::Result<Self> {
        let cursor = moves.len() as isize - 1;
        let (board, moves) = Self::replay(&moves, cursor)?;
        Ok(Self {
            board,
            moves,
            cursor,
        })
    }

    /// Create a Game from a record, with the cursor at the last move.
    pub fn from_record(record: &str) -> error::Result<Self> {
        Self::new(record::parse(record)?)
    }

    /// Replays `moves[0..=index]` from the start position.
    /// Returns the reached board and the replayed moves with suffixes recomputed.
    fn replay(moves: &[SanPlus], index: isize) -> error::Result<(ChessBoard, MoveHistory)> {
        let mut board = ChessBoard::start_position();
        let played = moves[..(index + 1) as usize]
            .iter()
            .map(|san_plus| board.play_san(&san_plus.san))
            .collect::<error::Result<MoveHistory>>()?;
        Ok((board, played))
    }

    /// Const getters.
    pub fn board(&self) -> &ChessBoard {
        &self.board
    }
    pub fn moves(&self) -> &[SanPlus] {
        &self.moves
    }
    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Index of the final move, or -1 for an empty game.
    pub fn last_index(&self) -> isize {
        self.moves.len() as isize - 1
    }

    /// Returns true if the cursor is on the final move.
    pub fn is_at_end(&self) -> bool {
        self.cursor == self.last_index()
    }

    /// Ok if `index` is a valid cursor position, `-1..=len-1`.
    pub fn check_index(&self, index: isize) -> error::Result<()> {
        if index < -1 || index > self.last_index() {
            return Err((
                ErrorKind::NavigationOutOfRange,
                format!("{index} not in -1..={}", self.last_index()),
            )
                .into());
        }
        Ok(())
    }

    /// Rebuild the current position by replaying moves up to and including `index`.
    /// `-1` goes to the start position. Indices outside `-1..=len-1` are
    /// rejected and leave the game unchanged.
    pub fn go_to(&mut self, index: isize) -> error::Result<()> {
        self.check_index(index)?;
        let (board, _) = Self::replay(&self.moves, index)?;
        self.board = board;
        self.cursor = index;
        Ok(())
    }

    /// Apply a legal move at the cursor. Moves after the cursor are dropped,
    /// then the move is appended and the cursor moves to it.
    pub fn push(&mut self, move_: &Move) -> SanPlus {
        self.moves.truncate((self.cursor + 1) as usize);
        let san_plus = self.board.play_recorded(move_);
        self.moves.push(san_plus.clone());
        self.cursor = self.last_index();
        san_plus
    }

    /// Record of every move in the game, with a result token if the final position is over.
    pub fn record(&self) -> error::Result<String> {
        let outcome = if self.is_at_end() {
            self.board.outcome()
        } else {
            Self::replay(&self.moves, self.last_index())?.0.outcome()
        };
        Ok(record::serialize(&self.moves, outcome))
    }

    /// Enabled state of first/previous/next/last navigation.
    pub fn navigation(&self) -> Navigation {
        Navigation {
            first: !self.is_empty(),
            previous: self.cursor > -1,
            next: self.cursor < self.last_index(),
            last: !self.is_empty(),
        }
    }
}

/// Defaults to a game at the standard start position with no moves.
impl Default for Game {
    fn default() -> Self {
        Self::start_position()
    }
}
