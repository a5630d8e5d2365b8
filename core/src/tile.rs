use serde::{Deserialize, Serialize};

/// Player-visible classification of one cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellView {
    Hidden,
    /// Open, with the number of neighboring mines.
    Revealed(u8),
    /// Flagged by the player, or a mine inside a cleared sector.
    Flagged,
    /// A mine exposed by its sector failing.
    Mine,
    /// The mine that failed its sector.
    Detonated,
}

impl CellView {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

impl Default for CellView {
    fn default() -> Self {
        Self::Hidden
    }
}
