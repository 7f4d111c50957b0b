use serde::{Deserialize, Serialize};

use crate::*;

/// Player-set marker on an unrevealed cell.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagState {
    #[default]
    None,
    /// Protects the cell from being revealed.
    Flagged,
    /// Purely visual, does not protect the cell.
    Questioned,
}

/// A single grid position.
///
/// Cells never leave the [`Board`] by reference; every accessor hands out a copy,
/// so a `Cell` doubles as the per-cell snapshot given to callers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    row: Coord,
    col: Coord,
    is_mine: bool,
    is_revealed: bool,
    flag_state: FlagState,
    /// Mark to restore when a flag placed by [`Cell::toggle_flag`] is removed.
    previous_flag: FlagState,
    adjacent_mine_count: u8,
}

impl Cell {
    pub const fn new((row, col): Coord2) -> Self {
        Self {
            row,
            col,
            is_mine: false,
            is_revealed: false,
            flag_state: FlagState::None,
            previous_flag: FlagState::None,
            adjacent_mine_count: 0,
        }
    }

    pub const fn row(&self) -> Coord {
        self.row
    }

    pub const fn col(&self) -> Coord {
        self.col
    }

    pub const fn coords(&self) -> Coord2 {
        (self.row, self.col)
    }

    pub const fn is_mine(&self) -> bool {
        self.is_mine
    }

    pub const fn is_revealed(&self) -> bool {
        self.is_revealed
    }

    pub const fn flag_state(&self) -> FlagState {
        self.flag_state
    }

    pub const fn previous_flag(&self) -> FlagState {
        self.previous_flag
    }

    pub const fn is_flagged(&self) -> bool {
        matches!(self.flag_state, FlagState::Flagged)
    }

    pub const fn adjacent_mine_count(&self) -> u8 {
        self.adjacent_mine_count
    }

    /// Classifies the cell for display, given the state of the game it belongs to.
    pub fn view(&self, outcome: Outcome, triggered_mine: Option<Coord2>) -> CellView {
        use CellView::*;

        if self.is_revealed {
            return match (self.is_mine, triggered_mine == Some(self.coords())) {
                (true, true) => Exploded,
                (true, false) => Mine,
                (false, _) => Revealed(self.adjacent_mine_count),
            };
        }

        match self.flag_state {
            FlagState::Flagged if outcome.is_finished() && !self.is_mine => WrongFlag,
            FlagState::Flagged => Flagged,
            FlagState::Questioned => Questioned,
            FlagState::None => Hidden,
        }
    }

    pub(crate) fn set_mine(&mut self) {
        self.is_mine = true;
    }

    pub(crate) fn set_adjacent_mine_count(&mut self, count: u8) {
        self.adjacent_mine_count = count;
    }

    /// Question marks do not survive being opened.
    pub(crate) fn reveal(&mut self) {
        self.is_revealed = true;
        self.flag_state = FlagState::None;
        self.previous_flag = FlagState::None;
    }

    /// Flag the cell, or drop the flag and bring back whatever mark it replaced.
    pub(crate) fn toggle_flag(&mut self) {
        if self.is_flagged() {
            self.flag_state = self.previous_flag;
            self.previous_flag = FlagState::None;
        } else {
            self.previous_flag = self.flag_state;
            self.flag_state = FlagState::Flagged;
        }
    }

    /// None -> Flagged -> Questioned -> None
    pub(crate) fn cycle_mark(&mut self) {
        self.flag_state = match self.flag_state {
            FlagState::None => FlagState::Flagged,
            FlagState::Flagged => FlagState::Questioned,
            FlagState::Questioned => FlagState::None,
        };
        self.previous_flag = FlagState::None;
    }

    /// Checks combinations that play can never produce.
    pub(crate) fn is_consistent(&self) -> bool {
        self.adjacent_mine_count <= 8
            && !(self.is_revealed && self.flag_state != FlagState::None)
            && self.previous_flag != FlagState::Flagged
            && (self.is_flagged() || self.previous_flag == FlagState::None)
    }
}

/// Display classification of a cell, the way an end user sees it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    Flagged,
    Questioned,
    Revealed(u8),
    /// Mine shown at the end of the game.
    Mine,
    /// The mine that lost the game.
    Exploded,
    /// Flag left on a safe cell once the game is over.
    WrongFlag,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flag_restores_previous_mark() {
        let mut cell = Cell::new((0, 0));
        cell.cycle_mark();
        cell.cycle_mark();
        assert_eq!(cell.flag_state(), FlagState::Questioned);

        cell.toggle_flag();
        assert_eq!(cell.flag_state(), FlagState::Flagged);
        assert_eq!(cell.previous_flag(), FlagState::Questioned);

        cell.toggle_flag();
        assert_eq!(cell.flag_state(), FlagState::Questioned);
        assert_eq!(cell.previous_flag(), FlagState::None);
    }

    #[test]
    fn cycle_mark_wraps_around() {
        let mut cell = Cell::new((2, 3));
        let seen: Vec<_> = (0..3)
            .map(|_| {
                cell.cycle_mark();
                cell.flag_state()
            })
            .collect();
        assert_eq!(
            seen,
            vec![FlagState::Flagged, FlagState::Questioned, FlagState::None]
        );
    }

    #[test]
    fn view_distinguishes_exploded_and_wrong_flags() {
        let mut mine = Cell::new((1, 1));
        mine.set_mine();
        mine.reveal();
        assert_eq!(mine.view(Outcome::Lost, Some((1, 1))), CellView::Exploded);
        assert_eq!(mine.view(Outcome::Lost, Some((0, 0))), CellView::Mine);

        let mut safe = Cell::new((0, 1));
        safe.toggle_flag();
        assert_eq!(safe.view(Outcome::InProgress, None), CellView::Flagged);
        assert_eq!(safe.view(Outcome::Lost, None), CellView::WrongFlag);
    }

    #[test]
    fn revealed_and_flagged_is_inconsistent() {
        let mut cell = Cell::new((0, 0));
        cell.reveal();
        assert!(cell.is_consistent());
        cell.toggle_flag();
        assert!(!cell.is_consistent());
    }
}
