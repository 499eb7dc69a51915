use std::collections::{HashSet, VecDeque};

use chrono::prelude::*;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Session lifecycle. Transitions are monotonic:
/// NotStarted -> InProgress -> Won | Lost.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameStatus {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// A single minesweeper game from configuration to win or loss.
///
/// The session is a synchronous state machine: every mutation happens inside
/// a `reveal`, `chord_reveal` or `toggle_flag` call and settles before the
/// call returns. Mine placement is deferred to the first reveal so that the
/// first revealed cell can be excluded from it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSession {
    config: GameConfig,
    generator: RandomMineGenerator,
    minefield: Option<Minefield>,
    grid: Array2<CellState>,
    revealed_count: Area,
    flags_placed: Area,
    status: GameStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    triggered_mine: Option<Coords>,
}

impl GameSession {
    /// Creates a session with a clock-derived seed.
    pub fn new(config: GameConfig) -> Self {
        Self::with_seed(config, Utc::now().timestamp_millis() as u64)
    }

    /// Creates a session whose mine layout is fully determined by `seed`
    /// and the first revealed cell.
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            generator: RandomMineGenerator::new(seed),
            minefield: None,
            grid: Array2::default(config.grid_dim()),
            revealed_count: 0,
            flags_placed: 0,
            status: GameStatus::default(),
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        }
    }

    /// Wraps an already generated layout, skipping lazy placement entirely.
    /// The first reveal is not guaranteed safe; the caller chose the mines.
    pub fn from_minefield(minefield: Minefield) -> Self {
        let (rows, cols) = minefield.size();
        let config = GameConfig::new_unchecked(cols, rows, minefield.mine_count());
        Self {
            config,
            generator: RandomMineGenerator::new(0),
            minefield: Some(minefield),
            grid: Array2::default(config.grid_dim()),
            revealed_count: 0,
            flags_placed: 0,
            status: GameStatus::default(),
            started_at: None,
            ended_at: None,
            triggered_mine: None,
        }
    }

    /// Validates the dimensions and builds a fresh session in one step.
    pub fn configure(width: Dim, height: Dim, mines: Area) -> Result<Self> {
        GameConfig::new(width, height, mines).map(Self::new)
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn mine_count(&self) -> Area {
        self.config.mines
    }

    pub fn revealed_count(&self) -> Area {
        self.revealed_count
    }

    pub fn flags_placed(&self) -> Area {
        self.flags_placed
    }

    /// Mines not yet flagged; never negative because of the flag ceiling.
    pub fn mines_left(&self) -> Area {
        self.config.mines - self.flags_placed
    }

    /// The mine that ended the game; `None` unless the session was lost.
    pub fn triggered_mine(&self) -> Option<Coords> {
        self.triggered_mine
    }

    /// Whether `coords` holds a mine. Always `false` before mines are placed.
    pub fn has_mine_at(&self, coords: Coords) -> bool {
        self.minefield
            .as_ref()
            .is_some_and(|field| field.contains_mine(coords))
    }

    /// Player-facing view of one cell; `None` when out of bounds.
    pub fn cell_view(&self, coords: Coords) -> Option<CellView> {
        self.in_bounds(coords)
            .then(|| self.grid[coords.to_grid_index()].into())
    }

    /// Whole seconds since the first reveal; 0 before the game starts.
    /// After the game ends the value freezes at the ending time.
    pub fn elapsed_secs(&self) -> u32 {
        if let Some(started_at) = self.started_at {
            (self.ended_at.unwrap_or_else(Utc::now) - started_at)
                .num_seconds()
                .max(0) as u32
        } else {
            0
        }
    }

    pub fn reveal(&mut self, coords: Coords) -> RevealOutcome {
        use RevealOutcome::NoOp;

        if self.status.is_final() {
            return NoOp(RevealBlock::GameOver);
        }
        if !self.in_bounds(coords) {
            return NoOp(RevealBlock::OutOfBounds);
        }

        match self.grid[coords.to_grid_index()] {
            CellState::Flagged => NoOp(RevealBlock::AlreadyFlagged),
            CellState::Revealed(_) | CellState::Mine => NoOp(RevealBlock::AlreadyRevealed),
            CellState::Hidden => {
                self.ensure_minefield(coords);
                self.reveal_single(coords)
            }
        }
    }

    /// Reveals all non-flagged neighbors of a revealed cell whose number is
    /// matched by its flagged neighbors; on any other cell this degrades to
    /// a plain reveal. A wrong flag makes the chord hit the mine and lose.
    pub fn chord_reveal(&mut self, coords: Coords) -> RevealOutcome {
        use RevealOutcome::NoOp;

        if self.status.is_final() {
            return NoOp(RevealBlock::GameOver);
        }
        if !self.in_bounds(coords) {
            return NoOp(RevealBlock::OutOfBounds);
        }

        let cell = self.grid[coords.to_grid_index()];
        match cell {
            CellState::Revealed(count) if count == self.count_flagged_neighbors(coords) => {
                neighbors(coords, self.dims())
                    .map(|pos| match self.grid[pos.to_grid_index()] {
                        CellState::Hidden => self.reveal_single(pos),
                        _ => NoOp(RevealBlock::AlreadyRevealed),
                    })
                    .reduce(core::ops::BitOr::bitor)
                    .unwrap_or(NoOp(RevealBlock::AlreadyRevealed))
            }
            _ => self.reveal(coords),
        }
    }

    pub fn toggle_flag(&mut self, coords: Coords) -> FlagOutcome {
        use FlagOutcome::*;

        if self.status.is_final() {
            return Rejected(FlagBlock::GameOver);
        }
        if !self.in_bounds(coords) {
            return Rejected(FlagBlock::OutOfBounds);
        }

        match self.grid[coords.to_grid_index()] {
            CellState::Hidden if self.flags_placed < self.config.mines => {
                self.grid[coords.to_grid_index()] = CellState::Flagged;
                self.flags_placed += 1;
                Flagged
            }
            CellState::Hidden => Rejected(FlagBlock::MaxFlagsReached),
            CellState::Flagged => {
                self.grid[coords.to_grid_index()] = CellState::Hidden;
                self.flags_placed -= 1;
                Unflagged
            }
            CellState::Revealed(_) | CellState::Mine => Rejected(FlagBlock::AlreadyRevealed),
        }
    }

    /// Lazily places the mines on the first reveal, excluding the revealed
    /// cell, and computes the adjacency table along the way.
    fn ensure_minefield(&mut self, exclude: Coords) {
        if self.minefield.is_some() {
            return;
        }
        let field = self
            .generator
            .generate(self.dims(), self.config.mines, exclude);
        self.minefield = Some(field);
    }

    fn reveal_single(&mut self, coords: Coords) -> RevealOutcome {
        if !self.grid[coords.to_grid_index()].is_hidden() {
            return RevealOutcome::NoOp(RevealBlock::AlreadyRevealed);
        }

        self.mark_started();

        if self.has_mine_at(coords) {
            self.triggered_mine = Some(coords);
            self.finish(false);
            return RevealOutcome::Loss;
        }

        let count = self.adjacent_mines(coords);
        self.grid[coords.to_grid_index()] = CellState::Revealed(count);
        self.revealed_count += 1;
        log::debug!("revealed {:?}, adjacent mines: {}", coords, count);

        if count == 0 {
            self.flood_reveal(coords);
        }

        if self.revealed_count == self.safe_cell_count() {
            self.finish(true);
            RevealOutcome::Win
        } else {
            RevealOutcome::Continue
        }
    }

    /// Breadth-first cascade from a zero-adjacency cell, on an explicit
    /// worklist so depth is bounded by board area rather than the stack.
    /// Numbered cells are revealed but not expanded; flags stop the wave.
    fn flood_reveal(&mut self, origin: Coords) {
        let bounds = self.dims();
        let mut visited = HashSet::from([origin]);
        let mut to_visit: VecDeque<Coords> = neighbors(origin, bounds)
            .filter(|&pos| self.grid[pos.to_grid_index()].is_hidden())
            .collect();
        log::trace!("cascade from {:?}, frontier: {:?}", origin, to_visit);

        while let Some(coords) = to_visit.pop_front() {
            if !visited.insert(coords) {
                continue;
            }

            if !self.grid[coords.to_grid_index()].is_hidden() {
                continue;
            }

            let count = self.adjacent_mines(coords);
            self.grid[coords.to_grid_index()] = CellState::Revealed(count);
            self.revealed_count += 1;
            log::trace!("cascade revealed {:?}, adjacent mines: {}", coords, count);

            if count == 0 {
                to_visit.extend(
                    neighbors(coords, bounds)
                        .filter(|&pos| self.grid[pos.to_grid_index()].is_hidden())
                        .filter(|pos| !visited.contains(pos)),
                );
            }
        }
    }

    /// First successful reveal flips the session to InProgress and starts
    /// the clock.
    fn mark_started(&mut self) {
        if self.status.is_initial() {
            let now = Utc::now();
            log::debug!("session started at {}", now);
            self.started_at = Some(now);
            self.status = GameStatus::InProgress;
        }
    }

    fn finish(&mut self, won: bool) {
        if self.status.is_final() {
            return;
        }

        self.status = if won { GameStatus::Won } else { GameStatus::Lost };
        let now = Utc::now();
        self.ended_at = Some(now);
        log::debug!("session ended at {}, won: {}", now, won);
        self.show_mines();
    }

    /// Flips every mine cell to its shown state for the final board.
    /// Purely cosmetic: `revealed_count` is not touched.
    fn show_mines(&mut self) {
        let Some(field) = self.minefield.as_ref() else {
            return;
        };
        let (rows, cols) = field.size();
        for row in 0..rows {
            for col in 0..cols {
                let coords = (row, col);
                if field.contains_mine(coords) {
                    self.grid[coords.to_grid_index()] = CellState::Mine;
                }
            }
        }
    }

    fn adjacent_mines(&self, coords: Coords) -> u8 {
        self.minefield
            .as_ref()
            .map_or(0, |field| field.adjacent_mines(coords))
    }

    fn count_flagged_neighbors(&self, coords: Coords) -> u8 {
        neighbors(coords, self.dims())
            .filter(|&pos| matches!(self.grid[pos.to_grid_index()], CellState::Flagged))
            .count() as u8
    }

    fn safe_cell_count(&self) -> Area {
        self.config.total_cells() - self.config.mines
    }

    fn in_bounds(&self, coords: Coords) -> bool {
        coords.0 < self.config.height && coords.1 < self.config.width
    }

    fn dims(&self) -> Coords {
        (self.config.height, self.config.width)
    }
}
