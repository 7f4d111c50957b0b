use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::*;

/// Lifecycle of a board.
///
/// Valid transitions:
/// - NotInitialized -> InProgress (mines placed and counted)
/// - InProgress -> Won
/// - InProgress -> Lost
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardState {
    NotInitialized,
    InProgress,
    Won,
    Lost,
}

/// Outcome together with the message shown for it; only [`Board::transition`]
/// writes either half.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Status {
    outcome: Outcome,
    message: String,
}

impl Status {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            message: outcome.message().into(),
        }
    }
}

/// A square minefield and everything that happens on it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Board {
    size: Coord,
    difficulty_percent: u8,
    cells: Array2<Cell>,
    mines_placed: bool,
    initialized: bool,
    status: Status,
    triggered_mine: Option<Coord2>,
}

impl Board {
    /// Allocates `size × size` cleared cells. No mines yet, see [`Board::place_mines`].
    pub fn new(size: Coord, difficulty_percent: i32) -> Result<Self> {
        if size <= 0 || size > MAX_BOARD_SIZE {
            return Err(GameError::InvalidArgument(format!(
                "board size must be in 1..={MAX_BOARD_SIZE}, got {size}"
            )));
        }
        let difficulty_percent = u8::try_from(difficulty_percent)
            .ok()
            .filter(|&pct| pct <= 100)
            .ok_or_else(|| {
                GameError::InvalidArgument(format!(
                    "difficulty must be a percentage in 0..=100, got {difficulty_percent}"
                ))
            })?;

        let cells = Array2::from_shape_fn((size as usize, size as usize), |(row, col)| {
            Cell::new((row as Coord, col as Coord))
        });

        Ok(Self {
            size,
            difficulty_percent,
            cells,
            mines_placed: false,
            initialized: false,
            status: Status::new(Outcome::InProgress),
            triggered_mine: None,
        })
    }

    /// Board with random mines and computed counts, ready to play.
    pub fn generate(
        size: Coord,
        difficulty_percent: i32,
        placer: impl MinePlacer,
    ) -> Result<Self> {
        let mut board = Self::new(size, difficulty_percent)?;
        board.place_mines_with(placer)?;
        board.compute_neighbor_counts()?;
        Ok(board)
    }

    pub fn size(&self) -> Coord {
        self.size
    }

    pub fn dims(&self) -> Coord2 {
        (self.size, self.size)
    }

    pub fn difficulty_percent(&self) -> u8 {
        self.difficulty_percent
    }

    pub fn total_cells(&self) -> usize {
        self.cells.len()
    }

    /// `ceil(size² × difficulty / 100)`, never above the number of cells.
    pub fn target_mine_count(&self) -> usize {
        (self.total_cells() * usize::from(self.difficulty_percent)).div_ceil(100)
    }

    pub fn mine_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_mine()).count()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn outcome(&self) -> Outcome {
        self.status.outcome
    }

    pub fn status_message(&self) -> &str {
        &self.status.message
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn state(&self) -> BoardState {
        match (self.initialized, self.status.outcome) {
            (false, _) => BoardState::NotInitialized,
            (true, Outcome::InProgress) => BoardState::InProgress,
            (true, Outcome::Won) => BoardState::Won,
            (true, Outcome::Lost) => BoardState::Lost,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status.outcome.is_finished()
    }

    /// Every non-mine cell is revealed. Mines never need revealing.
    pub fn is_won(&self) -> bool {
        self.initialized
            && self
                .cells
                .iter()
                .all(|cell| cell.is_mine() || cell.is_revealed())
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords, self.dims()) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    pub fn cell(&self, row: Coord, col: Coord) -> Result<Cell> {
        let coords = self.validate_coords((row, col))?;
        Ok(self.cells[coords.to_nd_index()])
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> Vec<Cell> {
        self.cells.iter().copied().collect()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.dims())
    }

    /// Mines `target_mine_count()` distinct cells chosen uniformly at random.
    pub fn place_mines(&mut self) -> Result<usize> {
        self.place_mines_with(RandomMinePlacer::from_entropy())
    }

    pub fn place_mines_with(&mut self, placer: impl MinePlacer) -> Result<usize> {
        if self.mines_placed {
            return Err(GameError::InvalidOperation("mines were already placed"));
        }

        let mine_count = self.target_mine_count();
        let selected = placer.select(self.dims(), mine_count)?;
        if selected.len() != mine_count {
            return Err(GameError::InvalidArgument(format!(
                "expected {} mine positions, placer returned {}",
                mine_count,
                selected.len()
            )));
        }

        let mut taken = vec![false; self.total_cells()];
        for &index in &selected {
            match taken.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                Some(_) => {
                    return Err(GameError::InvalidArgument(format!(
                        "cell {index} selected twice for a mine"
                    )));
                }
                None => {
                    return Err(GameError::InvalidArgument(format!(
                        "cell {index} is outside the board"
                    )));
                }
            }
        }

        let cells = self
            .cells
            .as_slice_mut()
            .ok_or(GameError::InvalidOperation("grid is not in standard layout"))?;
        for index in selected {
            cells[index].set_mine();
        }
        self.mines_placed = true;

        log::debug!(
            "Placed {} mines on a {}x{} board ({}%)",
            mine_count,
            self.size,
            self.size,
            self.difficulty_percent
        );
        Ok(mine_count)
    }

    /// Counts mined neighbors for every cell; the cell itself never counts.
    pub fn compute_neighbor_counts(&mut self) -> Result<()> {
        if !self.mines_placed {
            return Err(GameError::InvalidOperation(
                "mines must be placed before counting neighbors",
            ));
        }
        if self.initialized {
            return Err(GameError::InvalidOperation(
                "neighbor counts were already computed",
            ));
        }

        let counts = Array2::from_shape_fn(self.cells.dim(), |(row, col)| {
            self.count_adjacent_mines((row as Coord, col as Coord))
        });
        for (cell, &count) in self.cells.iter_mut().zip(counts.iter()) {
            cell.set_adjacent_mine_count(count);
        }
        self.initialized = true;
        Ok(())
    }

    fn count_adjacent_mines(&self, coords: Coord2) -> u8 {
        // at most 8 neighbors, always fits
        self.iter_neighbors(coords)
            .filter(|&pos| self.cells[pos.to_nd_index()].is_mine())
            .count() as u8
    }

    /// Reveals a cell, flooding outwards from cells with no adjacent mines.
    ///
    /// Already revealed and flagged cells are left alone, and so is every cell
    /// once the game is over.
    pub fn reveal(&mut self, row: Coord, col: Coord) -> Result<RevealOutcome> {
        let coords = self.validate_coords((row, col))?;
        self.check_initialized()?;

        if self.is_game_over() {
            return Ok(RevealOutcome::NoChange);
        }

        let cell = self.cells[coords.to_nd_index()];
        if cell.is_revealed() || cell.is_flagged() {
            return Ok(RevealOutcome::NoChange);
        }

        if cell.is_mine() {
            self.cells[coords.to_nd_index()].reveal();
            self.triggered_mine = Some(coords);
            self.expose_mines();
            self.transition(Outcome::Lost);
            log::debug!("Mine hit at {:?}", coords);
            return Ok(RevealOutcome::HitMine);
        }

        let opened = self.flood_reveal(coords);
        log::debug!("Revealed {} cells starting at {:?}", opened, coords);

        if self.is_won() {
            self.transition(Outcome::Won);
            Ok(RevealOutcome::Won)
        } else {
            Ok(RevealOutcome::Revealed)
        }
    }

    /// Iterative flood fill. `is_revealed` doubles as the visited set, which is
    /// what terminates the walk.
    fn flood_reveal(&mut self, start: Coord2) -> usize {
        let mut opened = 0;
        let mut to_visit = VecDeque::from([start]);

        while let Some(coords) = to_visit.pop_front() {
            let cell = &mut self.cells[coords.to_nd_index()];
            if cell.is_revealed() || cell.is_flagged() || cell.is_mine() {
                continue;
            }

            cell.reveal();
            opened += 1;
            let count = cell.adjacent_mine_count();
            log::trace!("Opened cell at {:?}, mine count: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    self.iter_neighbors(coords)
                        .filter(|&pos| !self.cells[pos.to_nd_index()].is_revealed()),
                );
            }
        }

        opened
    }

    /// Reveals every mine the player has not flagged, for the end-of-game display.
    pub(crate) fn expose_mines(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.is_mine() && !cell.is_revealed() && !cell.is_flagged() {
                cell.reveal();
            }
        }
    }

    /// Puts a flag on the cell or takes it off again.
    pub fn toggle_flag(&mut self, row: Coord, col: Coord) -> Result<MarkOutcome> {
        self.mark_with(row, col, Cell::toggle_flag)
    }

    /// Steps the cell through none, flagged and questioned.
    pub fn cycle_mark(&mut self, row: Coord, col: Coord) -> Result<MarkOutcome> {
        self.mark_with(row, col, Cell::cycle_mark)
    }

    fn mark_with(&mut self, row: Coord, col: Coord, mark: fn(&mut Cell)) -> Result<MarkOutcome> {
        let coords = self.validate_coords((row, col))?;
        self.check_initialized()?;

        let cell = &mut self.cells[coords.to_nd_index()];
        if self.status.outcome.is_finished() || cell.is_revealed() {
            return Ok(MarkOutcome::NoChange);
        }

        mark(cell);
        log::trace!("Cell at {:?} now {:?}", coords, cell.flag_state());
        Ok(MarkOutcome::Changed)
    }

    /// The only place outcome and message change, always together.
    fn transition(&mut self, outcome: Outcome) {
        self.status = Status::new(outcome);
    }

    fn check_initialized(&self) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            Err(GameError::InvalidOperation("board is not initialized"))
        }
    }

    /// Checks a board that did not come from play, e.g. one read back from a blob.
    pub(crate) fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(GameError::InvalidArgument(reason));

        if self.size <= 0 || self.size > MAX_BOARD_SIZE {
            return invalid(format!("board size {} out of range", self.size));
        }
        if self.difficulty_percent > 100 {
            return invalid(format!("difficulty {} out of range", self.difficulty_percent));
        }
        let side = self.size as usize;
        if self.cells.dim() != (side, side) {
            return invalid(format!(
                "grid shape {:?} does not match board size {}",
                self.cells.dim(),
                self.size
            ));
        }
        if !self.mines_placed || !self.initialized {
            return invalid("board was saved before it was initialized".into());
        }
        if self.status.message != self.status.outcome.message() {
            return invalid("status message does not match outcome".into());
        }
        if self.mine_count() != self.target_mine_count() {
            return invalid(format!(
                "board holds {} mines, difficulty implies {}",
                self.mine_count(),
                self.target_mine_count()
            ));
        }

        for ((row, col), cell) in self.cells.indexed_iter() {
            let coords = (row as Coord, col as Coord);
            if cell.coords() != coords {
                return invalid(format!(
                    "cell at {:?} claims to be at {:?}",
                    coords,
                    cell.coords()
                ));
            }
            if !cell.is_consistent() {
                return invalid(format!("cell at {:?} is in an impossible state", coords));
            }
            if cell.adjacent_mine_count() != self.count_adjacent_mines(coords) {
                return invalid(format!(
                    "cell at {:?} has neighbor count {} that does not match the mines around it",
                    coords,
                    cell.adjacent_mine_count()
                ));
            }
        }

        let revealed_mine = self
            .cells
            .iter()
            .any(|cell| cell.is_mine() && cell.is_revealed());
        // a board without safe cells is trivially cleared but still playable
        let cleared = self.is_won() && self.mine_count() < self.total_cells();
        let consistent = match self.status.outcome {
            Outcome::InProgress => self.triggered_mine.is_none() && !revealed_mine && !cleared,
            Outcome::Won => self.triggered_mine.is_none() && self.is_won(),
            Outcome::Lost => {
                self.triggered_mine.is_some_and(|coords| {
                    in_bounds(coords, self.dims()) && {
                        let cell = self.cells[coords.to_nd_index()];
                        cell.is_mine() && cell.is_revealed()
                    }
                }) && self
                    .cells
                    .iter()
                    .filter(|cell| cell.is_mine())
                    .all(|cell| cell.is_revealed() || cell.is_flagged())
            }
        };
        if !consistent {
            return invalid(format!(
                "grid contents contradict outcome {:?}",
                self.status.outcome
            ));
        }

        Ok(())
    }
}
