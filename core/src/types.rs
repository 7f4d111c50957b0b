/// Single coordinate axis used for board size and `(row, col)` positions.
///
/// Signed so that callers can hand in raw user input (`-1`, `size`) and get a
/// proper [`GameError::OutOfBounds`](crate::GameError::OutOfBounds) back.
pub type Coord = i32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

/// Largest accepted board edge.
pub const MAX_BOARD_SIZE: Coord = 256;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    /// Only meaningful for coordinates that were already bounds-checked.
    fn to_nd_index(self) -> Self::Output {
        [self.0 as usize, self.1 as usize]
    }
}

pub const fn in_bounds((row, col): Coord2, (rows, cols): Coord2) -> bool {
    row >= 0 && col >= 0 && row < rows && col < cols
}

const DISPLACEMENTS: [Coord2; 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the up to 8 in-bounds neighbors of a cell, never the cell itself.
#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(&(dr, dc)) = DISPLACEMENTS.get(usize::from(self.index)) {
            self.index += 1;
            let next = (self.center.0 + dr, self.center.1 + dc);
            if in_bounds(next, self.bounds) {
                return Some(next);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(iter: NeighborIter) -> Vec<Coord2> {
        let mut out: Vec<_> = iter.collect();
        out.sort();
        out
    }

    #[test]
    fn corner_has_three_neighbors() {
        assert_eq!(
            sorted(NeighborIter::new((0, 0), (3, 3))),
            vec![(0, 1), (1, 0), (1, 1)]
        );
    }

    #[test]
    fn center_has_eight_neighbors_excluding_self() {
        let neighbors = sorted(NeighborIter::new((1, 1), (3, 3)));
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&(1, 1)));
    }

    #[test]
    fn single_cell_board_has_no_neighbors() {
        assert_eq!(NeighborIter::new((0, 0), (1, 1)).count(), 0);
    }
}
