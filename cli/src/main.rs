use anyhow::Context;
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use sweeper_core::{BoardBlob, Coord, DifficultyLevel, EngineConfig};
use sweeper_session::{GameService, MemoryGameStore, StaticAuthenticator};

use crate::command::{Command, HELP};
use crate::config::FileConfig;
use crate::render::{BoardView, GameList};

mod command;
mod config;
mod render;

#[derive(Parser, Debug)]
#[command(version, about = "Minesweeper in the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// TOML file with defaults for the options below
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Board side length
    #[arg(short = 'n', long)]
    size: Option<Coord>,

    /// Named difficulty: easy, moderate or difficult
    #[arg(short, long, conflicts_with = "percent")]
    level: Option<DifficultyLevel>,

    /// Mine density in percent of the board
    #[arg(short, long)]
    percent: Option<i32>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Keep the remaining mines hidden after a win
    #[arg(long)]
    hide_mines_on_win: bool,

    /// Who saved games belong to
    #[arg(short, long)]
    user: Option<String>,
}

struct Settings {
    engine: EngineConfig,
    user: String,
    full_name: String,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };

        let mut engine = file.engine;
        if let Some(size) = self.size {
            engine.size = size;
        }
        if let Some(level) = self.level {
            engine = engine.with_level(level);
        }
        if let Some(percent) = self.percent {
            engine.difficulty_percent = percent;
        }
        if self.seed.is_some() {
            engine.seed = self.seed;
        }
        if self.hide_mines_on_win {
            engine.reveal_mines_on_win = false;
        }

        let user = self
            .user
            .clone()
            .or(file.user)
            .unwrap_or_else(|| "player".into());
        let full_name = file.full_name.unwrap_or_else(|| user.clone());
        Ok(Settings {
            engine,
            user,
            full_name,
        })
    }
}

struct Repl {
    service: GameService,
    user: String,
}

impl Repl {
    fn show(&self) -> anyhow::Result<()> {
        println!("{}", BoardView(&self.service.snapshot()?));
        Ok(())
    }

    /// Returns false once the player asks to leave.
    fn run(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Reveal(row, col) => {
                let report = self.service.reveal(row, col)?;
                if !report.change.has_update() {
                    println!("nothing to reveal at ({row}, {col})");
                }
                self.show()?;
            }
            Command::Flag(row, col) => {
                self.service.toggle_flag(row, col)?;
                self.show()?;
            }
            Command::Mark(row, col) => {
                self.service.cycle_mark(row, col)?;
                self.show()?;
            }
            Command::New { size, density } => {
                let config = self.service.engine().config();
                let size = size.unwrap_or(config.size);
                let percent = density.map_or(config.difficulty_percent, |density| density.percent());
                self.service.reset_to(size, percent)?;
                self.show()?;
            }
            Command::Save(name) => {
                let id = self.service.save(&self.user, &name)?;
                println!("saved as game {id}");
            }
            Command::Update => {
                let status = self.service.update()?;
                println!("updated, status: {status}");
            }
            Command::Open(id) => {
                self.service.open(id)?;
                self.show()?;
            }
            Command::Games => println!("{}", GameList(&self.service.games()?)),
            Command::Delete(id) => {
                self.service.delete(id)?;
                println!("deleted game {id}");
            }
            Command::Export(path) => {
                let blob = self.service.export()?;
                std::fs::write(&path, blob.as_str())
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("board written to {}", path.display());
            }
            Command::Import(path) => {
                let text = std::fs::read_to_string(&path)
                    .with_context(|| format!("reading {}", path.display()))?;
                self.service.import(&BoardBlob::from(text))?;
                self.show()?;
            }
            Command::Show => self.show()?,
            Command::Help => println!("{HELP}"),
            Command::Quit => return Ok(false),
        }
        Ok(true)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let settings = args.settings()?;
    log::debug!("engine config: {:?}", settings.engine);

    let auth = StaticAuthenticator::new().with_user(&settings.user, &settings.full_name);
    let mut repl = Repl {
        service: GameService::new(
            settings.engine,
            Arc::new(MemoryGameStore::new()),
            Arc::new(auth),
        ),
        user: settings.user,
    };

    repl.service.reset().context("starting the first game")?;
    repl.show()?;
    println!("type `help` for commands");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        stdout.flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let result = line.parse::<Command>().and_then(|command| repl.run(command));
        match result {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                log::debug!("{err:?}");
                println!("error: {err:#}");
            }
        }
    }
    Ok(())
}
