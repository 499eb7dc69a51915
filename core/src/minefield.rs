use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// An immutable mine layout plus its adjacency table.
///
/// The table is computed once, when the layout is built, so every later
/// lookup during reveals and cascades is a plain grid read.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mines: Array2<bool>,
    adjacency: Array2<u8>,
    mine_count: Area,
}

impl Minefield {
    pub fn from_mine_mask(mines: Array2<bool>) -> Self {
        let mine_count = mines.iter().filter(|&&is_mine| is_mine).count() as Area;
        let adjacency = compute_adjacency(&mines);
        Self {
            mines,
            adjacency,
            mine_count,
        }
    }

    /// Builds a layout with mines at exactly the given positions.
    pub fn from_mine_coords(size: Coords, mine_coords: &[Coords]) -> Result<Self> {
        let mut mines: Array2<bool> = Array2::default(size.to_grid_index());

        for &coords in mine_coords {
            if coords.0 >= size.0 || coords.1 >= size.1 {
                return Err(ConfigError::MineOutsideBoard(coords));
            }
            mines[coords.to_grid_index()] = true;
        }

        Ok(Self::from_mine_mask(mines))
    }

    /// Board dimensions as `(rows, cols)`.
    pub fn size(&self) -> Coords {
        let (rows, cols) = self.mines.dim();
        (rows as Dim, cols as Dim)
    }

    pub fn total_cells(&self) -> Area {
        self.mines.len() as Area
    }

    pub fn mine_count(&self) -> Area {
        self.mine_count
    }

    pub fn safe_cell_count(&self) -> Area {
        self.total_cells() - self.mine_count
    }

    pub fn contains_mine(&self, coords: Coords) -> bool {
        self.mines[coords.to_grid_index()]
    }

    pub fn adjacent_mines(&self, coords: Coords) -> u8 {
        self.adjacency[coords.to_grid_index()]
    }
}

fn compute_adjacency(mines: &Array2<bool>) -> Array2<u8> {
    let (rows, cols) = mines.dim();
    let bounds = (rows as Dim, cols as Dim);
    let mut adjacency: Array2<u8> = Array2::zeros(mines.raw_dim());

    for row in 0..bounds.0 {
        for col in 0..bounds.1 {
            let coords = (row, col);
            if mines[coords.to_grid_index()] {
                continue;
            }
            adjacency[coords.to_grid_index()] = neighbors(coords, bounds)
                .filter(|&pos| mines[pos.to_grid_index()])
                .count() as u8;
        }
    }

    adjacency
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_counts_every_non_mine_cell() {
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0), (2, 2)]).unwrap();

        assert_eq!(field.adjacent_mines((1, 1)), 2);
        assert_eq!(field.adjacent_mines((0, 1)), 1);
        assert_eq!(field.adjacent_mines((0, 2)), 0);
        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.safe_cell_count(), 7);
    }

    #[test]
    fn mines_outside_the_board_are_rejected() {
        let err = Minefield::from_mine_coords((3, 3), &[(3, 0)]).unwrap_err();
        assert_eq!(err, ConfigError::MineOutsideBoard((3, 0)));
    }

    #[test]
    fn edge_cells_only_count_in_bounds_neighbors() {
        let field = Minefield::from_mine_coords((2, 2), &[(0, 0)]).unwrap();

        assert_eq!(field.adjacent_mines((0, 1)), 1);
        assert_eq!(field.adjacent_mines((1, 0)), 1);
        assert_eq!(field.adjacent_mines((1, 1)), 1);
    }
}
