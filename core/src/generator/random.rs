use ndarray::Array2;
use serde::{Deserialize, Serialize};

use super::*;

/// Uniform mine placement fully determined by a fixed seed.
///
/// Sampling is reject-and-resample: draw a cell index, skip it when it is
/// the excluded cell or already mined, repeat until the requested count is
/// placed. The layout depends only on the seed, the board size and the
/// excluded cell, so a recorded seed reproduces the exact board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RandomMineGenerator {
    seed: u64,
}

impl RandomMineGenerator {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub const fn seed(&self) -> u64 {
        self.seed
    }
}

impl MineGenerator for RandomMineGenerator {
    fn generate(&self, size: Coords, mines: Area, exclude: Coords) -> Minefield {
        use rand::prelude::*;

        let (rows, cols) = size;
        let total = area_of(cols, rows);

        // degenerate request, nothing left to exclude
        if mines >= total {
            if mines > total {
                log::warn!(
                    "board already full, requested {} mines but only {} fit",
                    mines,
                    total
                );
            }
            return Minefield::from_mine_mask(Array2::from_elem(size.to_grid_index(), true));
        }

        let mut mask: Array2<bool> = Array2::default(size.to_grid_index());
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let mut placed: Area = 0;

        while placed < mines {
            let pick = rng.random_range(0..total);
            let coords = ((pick / cols as Area) as Dim, (pick % cols as Area) as Dim);
            if coords == exclude || mask[coords.to_grid_index()] {
                continue;
            }
            mask[coords.to_grid_index()] = true;
            placed += 1;
        }

        log::debug!(
            "placed {} mines with seed {}, excluding {:?}",
            placed,
            self.seed,
            exclude
        );
        Minefield::from_mine_mask(mask)
    }
}
