use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Mutex;
use sweeper_core::{BoardBlob, Outcome};

use crate::*;

/// Persisted lifecycle of a saved game.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    Completed,
    Failed,
}

impl From<Outcome> for GameStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::InProgress => Self::InProgress,
            Outcome::Won => Self::Completed,
            Outcome::Lost => Self::Failed,
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        })
    }
}

/// A saved game as the store keeps it. `board` is opaque to everything but
/// the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub owner: UserId,
    pub status: GameStatus,
    pub board: BoardBlob,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

/// What a caller supplies to create a record; the store assigns id and timestamps.
#[derive(Clone, Debug, PartialEq)]
pub struct NewGame {
    pub owner: UserId,
    pub status: GameStatus,
    pub board: BoardBlob,
    pub display_name: String,
}

/// Persistence collaborator for saved games.
pub trait GameStore: Send + Sync {
    fn create(&self, game: NewGame) -> Result<GameId>;

    fn get(&self, id: GameId) -> Result<Option<GameRecord>>;

    /// Overwrites status and board, bumping `modified_at`.
    fn update(&self, id: GameId, status: GameStatus, board: BoardBlob) -> Result<()>;

    /// Returns whether a record was removed.
    fn delete(&self, id: GameId) -> Result<bool>;

    /// Every record, ordered by id.
    fn list(&self) -> Result<Vec<GameRecord>>;
}

#[derive(Debug, Default)]
struct Tables {
    next_id: u64,
    games: BTreeMap<GameId, GameRecord>,
}

/// Process-local store, handy for tests and the terminal front end.
#[derive(Debug, Default)]
pub struct MemoryGameStore {
    tables: Mutex<Tables>,
}

impl MemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<std::sync::MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|err| SessionError::StoreUnavailable(err.to_string()))
    }
}

impl GameStore for MemoryGameStore {
    fn create(&self, game: NewGame) -> Result<GameId> {
        let mut tables = self.tables()?;
        tables.next_id += 1;
        let id = GameId(tables.next_id);
        let now = Utc::now();
        tables.games.insert(
            id,
            GameRecord {
                id,
                owner: game.owner,
                status: game.status,
                board: game.board,
                display_name: game.display_name,
                created_at: now,
                modified_at: now,
            },
        );
        log::debug!("Created game {}", id);
        Ok(id)
    }

    fn get(&self, id: GameId) -> Result<Option<GameRecord>> {
        Ok(self.tables()?.games.get(&id).cloned())
    }

    fn update(&self, id: GameId, status: GameStatus, board: BoardBlob) -> Result<()> {
        let mut tables = self.tables()?;
        let record = tables
            .games
            .get_mut(&id)
            .ok_or(SessionError::GameNotFound(id))?;
        record.status = status;
        record.board = board;
        record.modified_at = Utc::now();
        log::debug!("Updated game {}, status: {}", id, status);
        Ok(())
    }

    fn delete(&self, id: GameId) -> Result<bool> {
        Ok(self.tables()?.games.remove(&id).is_some())
    }

    fn list(&self) -> Result<Vec<GameRecord>> {
        Ok(self.tables()?.games.values().cloned().collect())
    }
}
