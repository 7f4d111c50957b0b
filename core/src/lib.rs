use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

pub use blob::*;
pub use board::*;
pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use types::*;

mod blob;
mod board;
mod cell;
mod engine;
mod error;
mod generator;
mod types;

/// Play state of a board once it has been initialized.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    InProgress,
    Won,
    Lost,
}

impl Outcome {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }

    /// User-facing message shown alongside this outcome.
    pub const fn message(self) -> &'static str {
        match self {
            Self::InProgress => "",
            Self::Won => "Congratulations! You won!!!",
            Self::Lost => "You hit a Bomb! You failed!",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Named mine densities, in percent of the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Easy,
    Moderate,
    Difficult,
}

impl DifficultyLevel {
    pub const fn percent(self) -> i32 {
        match self {
            Self::Easy => 4,
            Self::Moderate => 8,
            Self::Difficult => 16,
        }
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::Moderate
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Moderate => "moderate",
            Self::Difficult => "difficult",
        })
    }
}

impl FromStr for DifficultyLevel {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "moderate" => Ok(Self::Moderate),
            "difficult" => Ok(Self::Difficult),
            other => Err(GameError::InvalidArgument(format!(
                "unknown difficulty level {other:?}"
            ))),
        }
    }
}

/// Knobs for a [`GameEngine`]; deserializable so front ends can read it from a file.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub size: Coord,
    pub difficulty_percent: i32,
    /// Show the remaining mines after a win, like after a loss.
    pub reveal_mines_on_win: bool,
    /// Fixed seed for mine placement; fresh entropy on every reset when unset.
    pub seed: Option<u64>,
}

impl EngineConfig {
    pub const DEFAULT_SIZE: Coord = 5;

    pub fn with_level(mut self, level: DifficultyLevel) -> Self {
        self.difficulty_percent = level.percent();
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_SIZE,
            difficulty_percent: DifficultyLevel::default().percent(),
            reveal_mines_on_win: true,
            seed: None,
        }
    }
}
