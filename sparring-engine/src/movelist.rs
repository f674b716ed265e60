//! MoveList types used in Sparring engine.
//!
//! The underlying type of MoveList may change at any time during
//! pre-1.0 development, so a MoveList type alias makes changes easy.

use arrayvec::ArrayVec;
use shakmaty::san::SanPlus;

use crate::coretypes::MAX_MOVES;

/// MoveList is a container that can hold at most `MAX_MOVES`, the most number of moves per any chess position.
pub type MoveList<M> = ArrayVec<M, MAX_MOVES>;

/// Sequence of moves played in a game from the standard start position, in play order.
/// Moves are kept in the recorded form, with check and mate suffixes.
pub type MoveHistory = Vec<SanPlus>;
