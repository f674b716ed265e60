//! Static Evaluation Functions.
//!
//! Scores are absolute: White is the maxing player and Black the minning
//! player, so +10 favors White and -10 favors Black. Search converts them to
//! the perspective of the player to move.

use shakmaty::{Board, Color, Role};

use crate::coretypes::{Cp, CpKind};

/// Default, independent value per piece.
///
/// The king value only exists to make king loss dominate any degenerate
/// evaluation. Both kings are always on the board, so it cancels out.
pub const fn centipawns(role: Role) -> Cp {
    Cp(match role {
        Role::Pawn => 100, // 100 Centipawn == 1 Pawn
        Role::Knight => 320,
        Role::Bishop => 330,
        Role::Rook => 500,
        Role::Queen => 900,
        Role::King => 20_000,
    })
}

/// Returns relative strength difference of pieces on a board.
/// Is equivalent of side_material(White) - side_material(Black).
pub fn material(board: &Board) -> Cp {
    side_material(board, Color::White) - side_material(board, Color::Black)
}

/// Sum of piece values for one side.
pub fn side_material(board: &Board, color: Color) -> Cp {
    Role::ALL
        .iter()
        .map(|&role| {
            let count = (board.by_color(color) & board.by_role(role)).count();
            centipawns(role) * count as CpKind
        })
        .fold(Cp::default(), |acc, value| acc + value)
}
