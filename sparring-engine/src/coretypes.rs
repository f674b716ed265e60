//! The fundamental and simple types of `sparring_engine`.

use std::fmt::{self, Display};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shakmaty::Color;

use crate::error::{self, ErrorKind};

///////////////
// Constants //
///////////////

// The max possible measured number of moves for any chess position.
pub const MAX_MOVES: usize = 218;

// The greatest depth accepted for a search.
pub const MAX_DEPTH: PlyKind = 16;

/////////////////////////
// Data and Structures //
/////////////////////////

/// Type alias for max ply/depth.
pub type PlyKind = u8;

// Type alias to make changing Cp inner type easy if needed.
pub type CpKind = i32;

/// Centipawn, a common unit of measurement in chess, where 100 Centipawn == 1 Pawn.
///
/// All arithmetic saturates between `Cp::MIN` and `Cp::MAX`, which are exact
/// negations of each other, so negating a bound never overflows.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct Cp(pub CpKind);

/// Difficulty tier of the engine opponent. Each tier maps to a search depth
/// through `config::Depths`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Low,
    #[default]
    Medium,
    High,
}

//////////////////////
/// Implementations //
//////////////////////

impl Cp {
    pub const MIN: Cp = Self(-CpKind::MAX);
    pub const MAX: Cp = Self(CpKind::MAX);

    /// Returns the sign of Centipawn value, either 1, -1, or 0.
    pub const fn signum(&self) -> CpKind {
        self.0.signum()
    }

    /// Returns the color leading for an absolute score, or None if even.
    pub fn leading(&self) -> Option<Color> {
        match self.signum() {
            1 => Some(Color::White),
            -1 => Some(Color::Black),
            _ => None,
        }
    }

    fn clamped(value: i64) -> Self {
        Self(value.clamp(Self::MIN.0 as i64, Self::MAX.0 as i64) as CpKind)
    }
}

impl Add for Cp {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::clamped(self.0 as i64 + rhs.0 as i64)
    }
}
impl AddAssign for Cp {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl Sub for Cp {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::clamped(self.0 as i64 - rhs.0 as i64)
    }
}
impl Mul<CpKind> for Cp {
    type Output = Self;
    fn mul(self, rhs: CpKind) -> Self::Output {
        Self::clamped(self.0 as i64 * rhs as i64)
    }
}
impl Neg for Cp {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self::clamped(-(self.0 as i64))
    }
}
impl Display for Cp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:+}", self.0)
    }
}

/// Multiplier that converts an absolute score (White +) into one relative to `color`.
pub const fn sign(color: Color) -> CpKind {
    match color {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Parses a side from "white"/"w" or "black"/"b".
pub fn parse_side(s: &str) -> error::Result<Color> {
    match s.trim().to_ascii_lowercase().as_str() {
        "white" | "w" => Ok(Color::White),
        "black" | "b" => Ok(Color::Black),
        _ => Err((ErrorKind::ParseSideMalformed, s).into()),
    }
}

/// Human readable side name.
pub const fn side_name(color: Color) -> &'static str {
    match color {
        Color::White => "white",
        Color::Black => "black",
    }
}

impl Difficulty {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Low => "low",
            Difficulty::Medium => "medium",
            Difficulty::High => "high",
        }
    }
}

impl FromStr for Difficulty {
    type Err = error::Error;
    fn from_str(s: &str) -> error::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" | "easy" => Ok(Difficulty::Low),
            "medium" => Ok(Difficulty::Medium),
            "high" | "hard" => Ok(Difficulty::High),
            _ => Err((ErrorKind::ParseDifficultyMalformed, s).into()),
        }
    }
}

impl Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
