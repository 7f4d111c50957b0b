use sweeper_core::GameError;
use thiserror::Error;

use crate::{GameId, UserId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Game {0} not found")]
    GameNotFound(GameId),
    #[error("Unknown user {0:?}")]
    UnknownUser(String),
    #[error("No user with id {0}")]
    UnknownOwner(UserId),
    #[error("No saved game is open in this session")]
    NoActiveGame,
    #[error("You cannot save a completed game")]
    GameFinished,
    #[error("Game store is unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Session {0:?} is unusable after a panic")]
    SessionPoisoned(String),
}

pub type Result<T> = core::result::Result<T, SessionError>;
