use thiserror::Error;

use crate::Coord;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Coordinates ({row}, {col}) are outside the board")]
    OutOfBounds { row: Coord, col: Coord },
    #[error("Invalid operation: {0}")]
    InvalidOperation(&'static str),
    #[error("Board state could not be (de)serialized: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
