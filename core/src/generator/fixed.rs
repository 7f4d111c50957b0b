use super::*;

/// Places mines on explicit coordinates, for replays and hand-built puzzles.
#[derive(Clone, Debug, PartialEq)]
pub struct FixedMinePlacer {
    mines: Vec<Coord2>,
}

impl FixedMinePlacer {
    pub fn new(mines: impl Into<Vec<Coord2>>) -> Self {
        Self {
            mines: mines.into(),
        }
    }
}

impl MinePlacer for FixedMinePlacer {
    fn select(self, dims: Coord2, mine_count: usize) -> Result<Vec<usize>> {
        if self.mines.len() != mine_count {
            return Err(GameError::InvalidArgument(format!(
                "board expects {} mines but {} were given",
                mine_count,
                self.mines.len()
            )));
        }

        self.mines
            .into_iter()
            .map(|(row, col)| {
                if in_bounds((row, col), dims) {
                    Ok(row as usize * dims.1 as usize + col as usize)
                } else {
                    Err(GameError::OutOfBounds { row, col })
                }
            })
            .collect()
    }
}
