//! Game records.
//!
//! A record is PGN-style movetext played from the standard start position:
//! `1. e4 e5 2. Nf3 Nc6 3. Bb5 a6`.
//! Parsing is tolerant of what other tools put around the moves. Tag pairs,
//! brace and semicolon comments, move numbers, NAGs, annotation glyphs and
//! result tokens are all dropped. Recursive variations are not supported.

use shakmaty::san::SanPlus;
use shakmaty::{Color, Outcome};

use crate::board::ChessBoard;
use crate::error::{self, ErrorKind};
use crate::movelist::MoveHistory;

const RESULT_TOKENS: [&str; 4] = ["1-0", "0-1", "1/2-1/2", "*"];

/// Result token for a finished game.
pub fn result_token(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Decisive {
            winner: Color::White,
        } => "1-0",
        Outcome::Decisive {
            winner: Color::Black,
        } => "0-1",
        Outcome::Draw => "1/2-1/2",
    }
}

/// Write numbered movetext for `moves`, followed by a result token if the game is over.
pub fn serialize(moves: &[SanPlus], outcome: Option<Outcome>) -> String {
    let mut record = moves
        .iter()
        .enumerate()
        .map(|(ply, san_plus)| match ply % 2 {
            0 => format!("{}. {san_plus}", ply / 2 + 1),
            _ => san_plus.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(outcome) = outcome {
        if !record.is_empty() {
            record.push(' ');
        }
        record.push_str(result_token(outcome));
    }

    record
}

/// Remove tag pairs and comments, and collapse whitespace.
pub fn clean(record: &str) -> error::Result<String> {
    let mut cleaned = String::with_capacity(record.len());
    let mut chars = record.chars();

    while let Some(c) = chars.next() {
        match c {
            '{' => skip_past(&mut chars, '}')
                .ok_or((ErrorKind::RecordMalformed, "unterminated comment"))?,
            '[' => skip_past(&mut chars, ']')
                .ok_or((ErrorKind::RecordMalformed, "unterminated tag pair"))?,
            ';' => {
                // Line comments may end with the record.
                let _ = skip_past(&mut chars, '\n');
                cleaned.push(' ');
            }
            '(' | ')' => {
                return Err((ErrorKind::RecordMalformed, "variations are not supported").into())
            }
            c if c.is_whitespace() => cleaned.push(' '),
            c => cleaned.push(c),
        }
    }

    Ok(cleaned.split_whitespace().collect::<Vec<_>>().join(" "))
}

fn skip_past(chars: &mut impl Iterator<Item = char>, end: char) -> Option<()> {
    chars.find(|&c| c == end).map(|_| ())
}

/// Strip move numbers, NAGs, results and annotation glyphs from a cleaned token.
/// Returns None if nothing of a move remains.
fn move_token(token: &str) -> Option<String> {
    if RESULT_TOKENS.contains(&token) || token.starts_with('$') {
        return None;
    }

    // Move numbers: "12." and "12..." standalone, or glued as "12.e4".
    let token = match token.find('.') {
        Some(index) if token[..index].chars().all(|c| c.is_ascii_digit()) => {
            token[index..].trim_start_matches('.')
        }
        _ => token,
    };
    let token = token.trim_end_matches(|c| c == '!' || c == '?');

    if token.is_empty() {
        return None;
    }

    Some(match token {
        "0-0" | "0-0+" | "0-0#" => token.replacen("0-0", "O-O", 1),
        "0-0-0" | "0-0-0+" | "0-0-0#" => token.replacen("0-0-0", "O-O-O", 1),
        _ => token.to_string(),
    })
}

/// Parse a record into its sequence of moves.
///
/// Every move is replayed from the start position, so the returned history
/// only holds legal moves, with suffixes recomputed. Malformed text and
/// illegal moves are errors, and nothing is returned in part.
pub fn parse(record: &str) -> error::Result<MoveHistory> {
    let cleaned = clean(record)?;
    let mut board = ChessBoard::start_position();
    let mut moves = MoveHistory::new();

    for token in cleaned.split(' ').filter_map(move_token) {
        let san_plus: SanPlus = token
            .parse()
            .map_err(|_| (ErrorKind::RecordMalformed, format!("not a move: {token}")))?;
        let recorded = board.play_san(&san_plus.san).map_err(|err| {
            (
                ErrorKind::RecordIllegalMove,
                format!("ply {}: {err}", moves.len() + 1),
            )
        })?;
        moves.push(recorded);
    }

    Ok(moves)
}
