/// Single board axis, used for row/column positions and board dimensions.
pub type Dim = u16;

/// Cell-count type, used for mine counts, reveal counters and board areas.
pub type Area = u32;

/// Board position as `(row, col)`.
pub type Coords = (Dim, Dim);

pub trait ToGridIndex {
    type Output;
    fn to_grid_index(self) -> Self::Output;
}

impl ToGridIndex for Coords {
    type Output = [usize; 2];

    fn to_grid_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn area_of(width: Dim, height: Dim) -> Area {
    let width = width as Area;
    let height = height as Area;
    width.saturating_mul(height)
}

const OFFSETS: [(i16, i16); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Iterates the in-bounds cells of the 8-neighborhood of `center` on a
/// `bounds.0` x `bounds.1` (rows x cols) grid, clipping at the edges.
pub fn neighbors(center: Coords, bounds: Coords) -> impl Iterator<Item = Coords> {
    let (rows, cols) = bounds;
    OFFSETS.iter().filter_map(move |&(dr, dc)| {
        let row = center.0.checked_add_signed(dr)?;
        let col = center.1.checked_add_signed(dc)?;
        (row < rows && col < cols).then_some((row, col))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corner_cells_have_three_neighbors() {
        let found: Vec<Coords> = neighbors((0, 0), (5, 5)).collect();
        assert_eq!(found, vec![(0, 1), (1, 0), (1, 1)]);
    }

    #[test]
    fn interior_cells_have_eight_neighbors() {
        assert_eq!(neighbors((2, 2), (5, 5)).count(), 8);
    }

    #[test]
    fn far_edges_are_clipped() {
        let found: Vec<Coords> = neighbors((4, 4), (5, 5)).collect();
        assert_eq!(found, vec![(3, 3), (3, 4), (4, 3)]);
    }

    #[test]
    fn area_matches_the_grid() {
        assert_eq!(area_of(9, 9), 81);
        assert_eq!(area_of(30, 16), 480);
    }
}
