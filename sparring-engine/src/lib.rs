pub mod board;
pub mod clock;
pub mod config;
pub mod coretypes;
pub mod error;
pub mod evaluation;
pub mod game;
pub mod movelist;
pub(crate) mod moveorder;
pub mod position;
pub mod record;
pub mod saved;
pub mod search;
pub mod session;
pub mod tally;

pub use board::ChessBoard;
pub use clock::{Clock, Tick, TimeoutPolicy};
pub use config::{Depths, SessionConfig};
pub use coretypes::{Cp, Difficulty};
pub use error::{Error, ErrorKind};
pub use game::{Game, Navigation};
pub use position::SearchPosition;
pub use search::{SearchOptions, SearchResult};
pub use session::{Phase, Session};
pub use tally::{GameResult, Tally};
