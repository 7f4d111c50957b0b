use crate::*;
pub use fixed::*;
pub use random::*;

mod fixed;
mod random;

/// Strategy choosing which cells of a board receive a mine.
///
/// `select` returns row-major cell indices. The board checks the answer (exact
/// count, no duplicates, in range) before touching any cell.
pub trait MinePlacer {
    fn select(self, dims: Coord2, mine_count: usize) -> Result<Vec<usize>>;
}
