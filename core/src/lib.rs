#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use codec::*;
pub use engine::*;
pub use error::*;
pub use observation::*;
pub use oracle::*;
pub use state::*;
pub use tile::*;
pub use types::*;

mod codec;
mod engine;
mod error;
mod observation;
mod oracle;
mod state;
mod tile;
mod types;

/// Rules shared by every save played with the same front end.
///
/// The seed is not part of the config: it belongs to the save.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Percent compared inclusively against a draw in `[0, 100)`.
    pub mine_chance: u8,
    pub sector_size: Coord,
    /// Most cells a single reveal may open; `None` lets the flood fill run to its boundary.
    pub flood_budget: Option<usize>,
}

impl GameConfig {
    pub const DEFAULT_MINE_CHANCE: u8 = 20;
    pub const DEFAULT_SECTOR_SIZE: Coord = 10;

    pub fn new(mine_chance: u8, sector_size: Coord) -> Result<Self> {
        let config = Self {
            mine_chance,
            sector_size,
            flood_budget: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_flood_budget(self, budget: usize) -> Self {
        Self {
            flood_budget: Some(budget),
            ..self
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.mine_chance > 100 {
            return Err(ConfigIssue::MineChanceOutOfRange(self.mine_chance).into());
        }
        if self.sector_size < 2 {
            return Err(ConfigIssue::SectorTooSmall(self.sector_size).into());
        }
        Ok(())
    }

    pub const fn oracle(&self, seed: i32) -> SeededOracle {
        SeededOracle::new(seed, self.mine_chance)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mine_chance: Self::DEFAULT_MINE_CHANCE,
            sector_size: Self::DEFAULT_SECTOR_SIZE,
            flood_budget: None,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum MarkOutcome {
    NoChange,
    Changed,
    /// The flag completed its sector.
    SectorCleared,
}

impl MarkOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Changed => true,
            Self::SectorCleared => true,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum RevealOutcome {
    /// The cell was already open, flagged, or inside a resolved sector.
    NoChange,
    Opened,
    /// A mine went off and failed its sector.
    Detonated,
    /// Cells were opened and at least one sector became Succeeded.
    SectorCleared,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Opened => true,
            Detonated => true,
            SectorCleared => true,
        }
    }

    pub const fn is_loss(self) -> bool {
        matches!(self, Self::Detonated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = GameConfig::default();
        assert_eq!(config.mine_chance, 20);
        assert_eq!(config.sector_size, 10);
        assert_eq!(config.flood_budget, None);
        assert_eq!(config.validate(), Ok(()));

        let oracle = config.oracle(-9);
        assert_eq!((oracle.seed(), oracle.mine_chance()), (-9, 20));
    }

    #[test]
    fn config_rejects_out_of_range_values() {
        assert_eq!(
            GameConfig::new(101, 10),
            Err(FieldError::InvalidConfiguration(ConfigIssue::MineChanceOutOfRange(101)))
        );
        assert_eq!(
            GameConfig::new(20, 1),
            Err(FieldError::InvalidConfiguration(ConfigIssue::SectorTooSmall(1)))
        );
        assert!(GameConfig::new(0, 2).is_ok());
        assert!(GameConfig::new(100, 2).is_ok());
    }

    #[test]
    fn config_reads_partial_json() {
        let config: GameConfig = serde_json::from_str(r#"{"mine_chance": 15}"#).unwrap();
        assert_eq!(
            config,
            GameConfig {
                mine_chance: 15,
                ..GameConfig::default()
            }
        );

        let budgeted = GameConfig::default().with_flood_budget(500);
        let json = serde_json::to_string(&budgeted).unwrap();
        assert_eq!(serde_json::from_str::<GameConfig>(&json).unwrap(), budgeted);
    }
}
