//! Position contract consumed by search.
//!
//! Search never looks inside a position. It only needs to list legal moves,
//! ask whose turn it is and whether the game is over, evaluate statically,
//! and apply then undo moves in place. Anything implementing
//! `SearchPosition` can be searched, `ChessBoard` being the main implementor.

use std::fmt::Debug;
use std::ops::{Deref, DerefMut};

use shakmaty::Color;

use crate::coretypes::Cp;
use crate::movelist::MoveList;

/// Properties of a move in context of the position it is played from.
/// Only used for ordering moves, never for enforcing rules.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct MoveFeatures {
    pub capture: bool,
    pub promotion: bool,
}

/// A position that search may mutate and restore.
///
/// `do_move` and `undo_move` must be exact inverses: after
/// `do_move(m); undo_move();` the position is observably unchanged.
pub trait SearchPosition {
    type Move: Clone + PartialEq + Debug;

    /// All legal moves for the player to move.
    fn legal_moves(&self) -> MoveList<Self::Move>;

    /// Player whose turn it is.
    fn side_to_move(&self) -> Color;

    /// True if no further moves should be searched from this position.
    fn is_game_over(&self) -> bool;

    /// Absolute static score, White as maxing and Black as minning player.
    fn evaluate(&self) -> Cp;

    /// Returns features of a move if it can be played from this position,
    /// or None if the move cannot be reconstructed here.
    fn move_features(&self, move_: &Self::Move) -> Option<MoveFeatures>;

    /// Apply a legal move in place.
    fn do_move(&mut self, move_: &Self::Move);

    /// Revert the most recent `do_move`.
    fn undo_move(&mut self);

    /// Apply a move and return a guard that undoes it when dropped.
    fn play(&mut self, move_: &Self::Move) -> Played<'_, Self>
    where
        Self: Sized,
    {
        Played::new(self, move_)
    }
}

/// Scoped application of a move. The move is undone when the guard drops,
/// including on early return out of a search loop.
pub struct Played<'a, P: SearchPosition> {
    position: &'a mut P,
}

impl<'a, P: SearchPosition> Played<'a, P> {
    pub fn new(position: &'a mut P, move_: &P::Move) -> Self {
        position.do_move(move_);
        Self { position }
    }
}

impl<P: SearchPosition> Deref for Played<'_, P> {
    type Target = P;
    fn deref(&self) -> &P {
        self.position
    }
}

impl<P: SearchPosition> DerefMut for Played<'_, P> {
    fn deref_mut(&mut self) -> &mut P {
        self.position
    }
}

impl<P: SearchPosition> Drop for Played<'_, P> {
    fn drop(&mut self) {
        self.position.undo_move();
    }
}
