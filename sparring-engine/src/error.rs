//! Sparring Engine error type.

use std::error;
use std::result;

use thiserror::Error as ThisError;

/// Sparring Engine generic result type.
pub type Result<T> = result::Result<T, Error>;

/// A list specifying general errors for the Sparring engine.
///
/// Most of these describe rejected requests rather than failures: an illegal
/// move or an out-of-range navigation leaves all state untouched.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, ThisError)]
#[non_exhaustive]
pub enum ErrorKind {
    /// A move was requested while it is the engine's turn.
    #[error("not the human player's turn")]
    NotHumanTurn,
    /// The rules engine rejected a move.
    #[error("illegal move")]
    IllegalMove,
    /// The game at the current position is already over.
    #[error("game is over")]
    GameOver,
    /// A search is running for this session, so another cannot be started
    /// and no move may be applied until it is consumed or discarded.
    #[error("search already in flight")]
    SearchInFlight,

    /// Navigation index is outside of `-1..=len-1`.
    #[error("navigation index out of range")]
    NavigationOutOfRange,

    /// A game cannot be saved under a blank name.
    #[error("saved game name is empty")]
    SaveNameEmpty,
    /// No saved game exists at the requested list position.
    #[error("saved game not found")]
    SavedGameNotFound,

    /// Game record text could not be tokenized.
    #[error("record malformed")]
    RecordMalformed,
    /// Game record contained a move that cannot be played from its position.
    #[error("record illegal move")]
    RecordIllegalMove,
    /// Fen string could not be parsed or describes an impossible position.
    #[error("fen")]
    Fen,

    /// Session configuration could not be read or deserialized.
    #[error("config malformed")]
    ConfigMalformed,

    /// Side parse string malformed.
    #[error("parse side malformed")]
    ParseSideMalformed,
    /// Difficulty parse string malformed.
    #[error("parse difficulty malformed")]
    ParseDifficultyMalformed,
}

/// The primary and general error type for the Sparring Engine.
#[derive(Debug, ThisError)]
pub enum Error {
    #[error("{0}")]
    Simple(ErrorKind),
    #[error("{0}: {1}")]
    Message(ErrorKind, String),
    #[error("{0}, error: {1}")]
    Custom(ErrorKind, #[source] Box<dyn error::Error + Send + Sync>),
}

impl Error {
    pub fn new<E>(error_kind: ErrorKind, inner_error: E) -> Self
    where
        E: Into<Box<dyn error::Error + Send + Sync>>,
    {
        Self::Custom(error_kind, inner_error.into())
    }

    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Simple(kind) | Error::Message(kind, _) | Error::Custom(kind, _) => *kind,
        }
    }
}

impl From<ErrorKind> for Error {
    fn from(error_kind: ErrorKind) -> Self {
        Self::Simple(error_kind)
    }
}

impl<S: ToString> From<(ErrorKind, S)> for Error {
    fn from((error_kind, stringable): (ErrorKind, S)) -> Self {
        Self::Message(error_kind, stringable.to_string())
    }
}
