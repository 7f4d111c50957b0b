use serde::{Deserialize, Serialize};

use crate::*;

/// Copy of a board taken for rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub size: Coord,
    pub difficulty_percent: u8,
    pub mine_count: usize,
    pub outcome: Outcome,
    pub message: String,
    pub triggered_mine: Option<Coord2>,
    /// Row-major.
    pub cells: Vec<Cell>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        Self {
            size: board.size(),
            difficulty_percent: board.difficulty_percent(),
            mine_count: board.mine_count(),
            outcome: board.outcome(),
            message: board.status_message().into(),
            triggered_mine: board.triggered_mine(),
            cells: board.cells(),
        }
    }

    pub fn cell(&self, row: Coord, col: Coord) -> Option<&Cell> {
        if in_bounds((row, col), (self.size, self.size)) {
            self.cells.get(row as usize * self.size as usize + col as usize)
        } else {
            None
        }
    }

    pub fn view_at(&self, row: Coord, col: Coord) -> Option<CellView> {
        self.cell(row, col)
            .map(|cell| cell.view(self.outcome, self.triggered_mine))
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.size.max(1) as usize)
    }

    /// Flags currently on the board, wrong ones included.
    pub fn flag_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_flagged()).count()
    }
}

/// Everything a front end needs to redraw after a reveal.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealReport {
    pub change: RevealOutcome,
    pub cell: Cell,
    pub outcome: Outcome,
    pub message: String,
}

/// One game session's view of minesweeper: owns at most one board and runs
/// every move against it.
#[derive(Clone, Debug, Default)]
pub struct GameEngine {
    config: EngineConfig,
    board: Option<Board>,
}

impl GameEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            board: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    pub fn is_initialized(&self) -> bool {
        self.board.as_ref().is_some_and(Board::is_initialized)
    }

    /// Starts a new game with the configured size and difficulty.
    pub fn new_game(&mut self) -> Result<BoardSnapshot> {
        self.reset(self.config.size, self.config.difficulty_percent)
    }

    /// Throws away the current board, if any, and deals a fresh one.
    pub fn reset(&mut self, size: Coord, difficulty_percent: i32) -> Result<BoardSnapshot> {
        let placer = match self.config.seed {
            Some(seed) => RandomMinePlacer::new(seed),
            None => RandomMinePlacer::from_entropy(),
        };
        self.reset_with(size, difficulty_percent, placer)
    }

    /// Like [`GameEngine::reset`] with a caller-chosen placement strategy. The
    /// current board survives if the new one cannot be built.
    pub fn reset_with(
        &mut self,
        size: Coord,
        difficulty_percent: i32,
        placer: impl MinePlacer,
    ) -> Result<BoardSnapshot> {
        let board = Board::generate(size, difficulty_percent, placer)?;
        log::info!(
            "New {}x{} game with {} mines",
            size,
            size,
            board.mine_count()
        );
        Ok(BoardSnapshot::from_board(self.board.insert(board)))
    }

    pub fn reveal(&mut self, row: Coord, col: Coord) -> Result<RevealReport> {
        let reveal_mines_on_win = self.config.reveal_mines_on_win;
        let board = self.board_mut()?;

        let change = board.reveal(row, col)?;
        match change {
            RevealOutcome::Won => {
                if reveal_mines_on_win {
                    board.expose_mines();
                }
                log::info!("Game won");
            }
            RevealOutcome::HitMine => log::info!("Game lost at ({}, {})", row, col),
            RevealOutcome::NoChange | RevealOutcome::Revealed => {}
        }

        Ok(RevealReport {
            change,
            cell: board.cell(row, col)?,
            outcome: board.outcome(),
            message: board.status_message().into(),
        })
    }

    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> Result<Cell> {
        let board = self.board_mut()?;
        if !board.toggle_flag(row, col)?.has_update() {
            log::debug!("Flag at ({}, {}) left as is", row, col);
        }
        board.cell(row, col)
    }

    pub fn cycle_mark(&mut self, row: Coord, col: Coord) -> Result<Cell> {
        let board = self.board_mut()?;
        if !board.cycle_mark(row, col)?.has_update() {
            log::debug!("Mark at ({}, {}) left as is", row, col);
        }
        board.cell(row, col)
    }

    pub fn cell(&self, row: Coord, col: Coord) -> Result<Cell> {
        self.board_ref()?.cell(row, col)
    }

    /// All cells, row-major.
    pub fn cells(&self) -> Result<Vec<Cell>> {
        Ok(self.board_ref()?.cells())
    }

    pub fn snapshot(&self) -> Result<BoardSnapshot> {
        Ok(BoardSnapshot::from_board(self.board_ref()?))
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.board.as_ref().map(Board::outcome)
    }

    pub fn message(&self) -> &str {
        self.board.as_ref().map_or("", Board::status_message)
    }

    pub fn is_game_over(&self) -> bool {
        self.outcome().is_some_and(Outcome::is_finished)
    }

    pub fn is_won(&self) -> bool {
        self.outcome() == Some(Outcome::Won)
    }

    pub fn export_state(&self) -> Result<BoardBlob> {
        self.board_ref()?.to_blob()
    }

    /// Replaces the current board with a saved one; on error nothing changes.
    pub fn import_state(&mut self, blob: &BoardBlob) -> Result<BoardSnapshot> {
        let board = Board::from_blob(blob)?;
        log::debug!(
            "Restored {}x{} board, outcome: {:?}",
            board.size(),
            board.size(),
            board.outcome()
        );
        Ok(BoardSnapshot::from_board(self.board.insert(board)))
    }

    fn board_ref(&self) -> Result<&Board> {
        self.board
            .as_ref()
            .ok_or(GameError::InvalidOperation("no game has been started"))
    }

    fn board_mut(&mut self) -> Result<&mut Board> {
        self.board
            .as_mut()
            .ok_or(GameError::InvalidOperation("no game has been started"))
    }
}
