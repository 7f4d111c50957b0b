use anyhow::{Context, bail};
use std::path::PathBuf;
use std::str::FromStr;
use sweeper_core::{Coord, DifficultyLevel};
use sweeper_session::GameId;

pub const HELP: &str = "\
commands:
  reveal|r ROW COL     open a cell
  flag|f ROW COL       toggle a flag
  mark|m ROW COL       cycle none -> flag -> question mark
  new [SIZE] [LEVEL]   start over; LEVEL is easy, moderate, difficult or a percent
  save NAME            save the current game
  update               write the current game back to its saved record
  open ID              continue a saved game
  games                list saved games
  delete ID            remove a saved game
  export PATH          write the board to a file
  import PATH          load a board from a file
  show                 redraw the board
  help                 this text
  quit";

/// Mine density given on the `new` command line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Density {
    Level(DifficultyLevel),
    Percent(i32),
}

impl Density {
    pub const fn percent(self) -> i32 {
        match self {
            Self::Level(level) => level.percent(),
            Self::Percent(percent) => percent,
        }
    }
}

impl FromStr for Density {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        if let Ok(percent) = s.trim_end_matches('%').parse() {
            return Ok(Self::Percent(percent));
        }
        Ok(Self::Level(s.parse()?))
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Reveal(Coord, Coord),
    Flag(Coord, Coord),
    Mark(Coord, Coord),
    New {
        size: Option<Coord>,
        density: Option<Density>,
    },
    Save(String),
    Update,
    Open(GameId),
    Games,
    Delete(GameId),
    Export(PathBuf),
    Import(PathBuf),
    Show,
    Help,
    Quit,
}

fn coords<'a>(mut args: impl Iterator<Item = &'a str>) -> anyhow::Result<(Coord, Coord)> {
    let (Some(row), Some(col), None) = (args.next(), args.next(), args.next()) else {
        bail!("expected ROW COL");
    };
    Ok((
        row.parse().with_context(|| format!("bad row {row:?}"))?,
        col.parse().with_context(|| format!("bad column {col:?}"))?,
    ))
}

fn game_id(arg: Option<&str>) -> anyhow::Result<GameId> {
    let arg = arg.context("expected a game id")?;
    Ok(GameId(
        arg.parse().with_context(|| format!("bad game id {arg:?}"))?,
    ))
}

fn path(rest: &str) -> anyhow::Result<PathBuf> {
    if rest.is_empty() {
        bail!("expected a path");
    }
    Ok(PathBuf::from(rest))
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let mut args = rest.split_whitespace();

        let command = match word.to_ascii_lowercase().as_str() {
            "reveal" | "r" => {
                let (row, col) = coords(args)?;
                Self::Reveal(row, col)
            }
            "flag" | "f" => {
                let (row, col) = coords(args)?;
                Self::Flag(row, col)
            }
            "mark" | "m" => {
                let (row, col) = coords(args)?;
                Self::Mark(row, col)
            }
            "new" | "n" => {
                let size = args
                    .next()
                    .map(|size| size.parse().with_context(|| format!("bad size {size:?}")))
                    .transpose()?;
                let density = args.next().map(str::parse).transpose()?;
                Self::New { size, density }
            }
            "save" => {
                if rest.is_empty() {
                    bail!("expected a name for the game");
                }
                Self::Save(rest.to_owned())
            }
            "update" => Self::Update,
            "open" => Self::Open(game_id(args.next())?),
            "games" | "ls" => Self::Games,
            "delete" | "rm" => Self::Delete(game_id(args.next())?),
            "export" => Self::Export(path(rest)?),
            "import" => Self::Import(path(rest)?),
            "show" | "" => Self::Show,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => bail!("unknown command {other:?}, try `help`"),
        };
        Ok(command)
    }
}
