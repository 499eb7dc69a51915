//! Minesweeper board engine: mine placement under a safe-first-click
//! constraint, cascading reveal, flag bookkeeping and win/loss evaluation.
//!
//! The crate is a pure state machine with no I/O and no global state.
//! Frontends drive a [`GameSession`] through discrete `reveal`/`toggle_flag`
//! calls and render from [`CellView`] projections.

use core::ops::BitOr;
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use minefield::*;
pub use types::*;

mod cell;
mod engine;
mod error;
mod generator;
mod minefield;
mod types;

/// Bounds applied when validating a [`GameConfig`].
///
/// The defaults match classic playable boards: sides between 5 and 30 cells
/// and at most a quarter of the board mined.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigLimits {
    pub min_side: Dim,
    pub max_side: Dim,
    /// Divisor of the board area giving the mine ceiling.
    pub mine_ceiling_divisor: Area,
}

impl ConfigLimits {
    pub const fn mine_limit(&self, width: Dim, height: Dim) -> Area {
        let divisor = if self.mine_ceiling_divisor == 0 {
            1
        } else {
            self.mine_ceiling_divisor
        };
        area_of(width, height) / divisor
    }

    pub fn check(&self, width: Dim, height: Dim, mines: Area) -> Result<()> {
        if width < self.min_side || width > self.max_side {
            return Err(ConfigError::WidthOutOfRange {
                width,
                min: self.min_side,
                max: self.max_side,
            });
        }
        if height < self.min_side || height > self.max_side {
            return Err(ConfigError::HeightOutOfRange {
                height,
                min: self.min_side,
                max: self.max_side,
            });
        }
        let max = self.mine_limit(width, height);
        if mines == 0 || mines > max {
            return Err(ConfigError::MineCountOutOfRange { mines, max });
        }
        Ok(())
    }
}

impl Default for ConfigLimits {
    fn default() -> Self {
        Self {
            min_side: 5,
            max_side: 30,
            mine_ceiling_divisor: 4,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Dim,
    pub height: Dim,
    pub mines: Area,
}

impl GameConfig {
    pub const fn new_unchecked(width: Dim, height: Dim, mines: Area) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    /// Validates against [`ConfigLimits::default`].
    pub fn new(width: Dim, height: Dim, mines: Area) -> Result<Self> {
        Self::with_limits(width, height, mines, &ConfigLimits::default())
    }

    pub fn with_limits(
        width: Dim,
        height: Dim,
        mines: Area,
        limits: &ConfigLimits,
    ) -> Result<Self> {
        limits.check(width, height, mines)?;
        Ok(Self::new_unchecked(width, height, mines))
    }

    pub const fn total_cells(&self) -> Area {
        area_of(self.width, self.height)
    }

    pub(crate) fn grid_dim(&self) -> [usize; 2] {
        [self.height as usize, self.width as usize]
    }
}

/// Classic difficulty tiers exposed to menu layers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Expert,
}

impl Difficulty {
    pub const fn config(self) -> GameConfig {
        match self {
            Self::Beginner => GameConfig::new_unchecked(9, 9, 10),
            Self::Intermediate => GameConfig::new_unchecked(16, 16, 40),
            Self::Expert => GameConfig::new_unchecked(30, 16, 99),
        }
    }

    /// Tier matching a configuration, used to key best-time records.
    pub fn matching(config: GameConfig) -> Option<Self> {
        [Self::Beginner, Self::Intermediate, Self::Expert]
            .into_iter()
            .find(|tier| tier.config() == config)
    }
}

/// Reasons a reveal call changed nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealBlock {
    OutOfBounds,
    AlreadyRevealed,
    AlreadyFlagged,
    GameOver,
}

/// Outcome of a reveal or chord-reveal call.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    Continue,
    Win,
    Loss,
    NoOp(RevealBlock),
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoOp(_))
    }
}

/// Used to merge per-cell outcomes when chord-revealing.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (Loss, _) | (_, Loss) => Loss,
            (Win, _) | (_, Win) => Win,
            (Continue, _) | (_, Continue) => Continue,
            (lhs @ NoOp(_), NoOp(_)) => lhs,
        }
    }
}

/// Reasons a flag toggle was rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagBlock {
    OutOfBounds,
    AlreadyRevealed,
    MaxFlagsReached,
    GameOver,
}

/// Outcome of a flag toggle.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlagOutcome {
    Flagged,
    Unflagged,
    Rejected(FlagBlock),
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn side_bounds_are_enforced() {
        assert_eq!(
            GameConfig::new(4, 9, 5),
            Err(ConfigError::WidthOutOfRange {
                width: 4,
                min: 5,
                max: 30
            })
        );
        assert_eq!(
            GameConfig::new(9, 31, 5),
            Err(ConfigError::HeightOutOfRange {
                height: 31,
                min: 5,
                max: 30
            })
        );
        assert!(GameConfig::new(5, 5, 1).is_ok());
        assert!(GameConfig::new(30, 30, 100).is_ok());
    }

    #[test]
    fn mine_ceiling_is_a_quarter_of_the_board() {
        assert!(GameConfig::new(9, 9, 20).is_ok());
        assert_eq!(
            GameConfig::new(9, 9, 21),
            Err(ConfigError::MineCountOutOfRange { mines: 21, max: 20 })
        );
        assert_eq!(
            GameConfig::new(9, 9, 0),
            Err(ConfigError::MineCountOutOfRange { mines: 0, max: 20 })
        );
    }

    #[test]
    fn custom_limits_override_the_defaults() {
        let limits = ConfigLimits {
            min_side: 2,
            max_side: 100,
            mine_ceiling_divisor: 2,
        };
        assert!(GameConfig::with_limits(50, 50, 1000, &limits).is_ok());
        assert!(GameConfig::with_limits(2, 2, 1, &limits).is_ok());
    }

    #[test]
    fn presets_pass_default_validation() {
        for tier in [
            Difficulty::Beginner,
            Difficulty::Intermediate,
            Difficulty::Expert,
        ] {
            let config = tier.config();
            assert!(GameConfig::new(config.width, config.height, config.mines).is_ok());
            assert_eq!(Difficulty::matching(config), Some(tier));
        }
        assert_eq!(Difficulty::matching(GameConfig::new_unchecked(7, 7, 5)), None);
    }

    #[test]
    fn outcome_merge_prefers_loss_then_win() {
        use RevealOutcome::*;
        assert_eq!(Loss | Win, Loss);
        assert_eq!(Win | Continue, Win);
        assert_eq!(Continue | NoOp(RevealBlock::AlreadyRevealed), Continue);
        assert_eq!(
            NoOp(RevealBlock::OutOfBounds) | NoOp(RevealBlock::AlreadyRevealed),
            NoOp(RevealBlock::OutOfBounds)
        );
    }
}
