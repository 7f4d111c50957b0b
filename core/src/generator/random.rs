use super::*;

/// Uniform placement: every set of `mine_count` distinct cells is equally likely.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMinePlacer {
    seed: u64,
}

impl RandomMinePlacer {
    /// Reproducible placement, the same seed always yields the same board.
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl Default for RandomMinePlacer {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl MinePlacer for RandomMinePlacer {
    fn select(self, (rows, cols): Coord2, mine_count: usize) -> Result<Vec<usize>> {
        use rand::prelude::*;

        let total_cells = rows as usize * cols as usize;
        if mine_count > total_cells {
            return Err(GameError::InvalidArgument(format!(
                "cannot place {mine_count} mines on {total_cells} cells"
            )));
        }

        // partial Fisher-Yates, only the first `mine_count` slots get shuffled
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut cells: Vec<usize> = (0..total_cells).collect();
        for i in 0..mine_count {
            let pick = rng.random_range(i..total_cells);
            cells.swap(i, pick);
        }
        cells.truncate(mine_count);

        log::debug!(
            "Selected {} of {} cells for mines, seed: {}",
            mine_count,
            total_cells,
            self.seed
        );
        Ok(cells)
    }
}
