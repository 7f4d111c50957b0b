use serde::{Deserialize, Serialize};

use crate::*;

/// Serialized board handed to the persistence layer. Callers should treat the
/// contents as opaque; only [`Board::from_blob`] reads them back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardBlob(String);

impl BoardBlob {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for BoardBlob {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}

impl Board {
    /// Captures the whole board, neighbor counts included.
    pub fn to_blob(&self) -> Result<BoardBlob> {
        Ok(BoardBlob(serde_json::to_string(self)?))
    }

    /// Rebuilds a board exactly as it was saved. Counts are taken from the blob,
    /// and a blob that no sequence of moves could have produced is rejected.
    pub fn from_blob(blob: &BoardBlob) -> Result<Self> {
        let board: Board = serde_json::from_str(blob.as_str())?;
        board.validate()?;
        Ok(board)
    }
}
