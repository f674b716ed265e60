//! Saved game list.
//!
//! Entries are kept in insertion order and addressed by their position in the
//! list. Names are labels for display and may repeat.

use serde::{Deserialize, Serialize};

use crate::error::{self, ErrorKind};

/// A named game record. Immutable once stored.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct SavedGame {
    name: String,
    record: String,
}

impl SavedGame {
    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn record(&self) -> &str {
        &self.record
    }
}

/// Insertion-ordered list of saved games.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedGames {
    games: Vec<SavedGame>,
}

impl SavedGames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a game. Names that are empty or only whitespace are rejected.
    /// Returns the position of the new entry.
    pub fn push(&mut self, name: &str, record: String) -> error::Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ErrorKind::SaveNameEmpty.into());
        }
        self.games.push(SavedGame {
            name: name.to_string(),
            record,
        });
        Ok(self.games.len() - 1)
    }

    pub fn get(&self, index: usize) -> error::Result<&SavedGame> {
        self.games.get(index).ok_or_else(|| {
            (
                ErrorKind::SavedGameNotFound,
                format!("{index} of {}", self.games.len()),
            )
                .into()
        })
    }

    /// Names in list order, for selection.
    pub fn names(&self) -> Vec<&str> {
        self.games.iter().map(SavedGame::name).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SavedGame> {
        self.games.iter()
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// JSON array of `{ "name", "record" }` objects.
    pub fn to_json(&self) -> error::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|err| error::Error::new(ErrorKind::RecordMalformed, err))
    }

    pub fn from_json(json: &str) -> error::Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| error::Error::new(ErrorKind::RecordMalformed, err))
    }
}
