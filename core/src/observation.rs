use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Snapshot of the cells inside a viewport rectangle, indexed `[x - min.x, y - min.y]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub bounds: Rect,
    pub cells: Array2<CellView>,
}

impl Observation {
    pub fn capture<O: MineOracle>(engine: &PlayEngine<O>, bounds: Rect) -> Self {
        let min = bounds.min;
        let cells = Array2::from_shape_fn((bounds.width(), bounds.height()), |(dx, dy)| {
            engine.cell_view(offset(min, dx, dy))
        });
        Self { bounds, cells }
    }

    pub fn get(&self, cell: Cell) -> Option<CellView> {
        if !self.bounds.contains(cell) {
            return None;
        }
        let dx = (i64::from(cell.x) - i64::from(self.bounds.min.x)) as usize;
        let dy = (i64::from(cell.y) - i64::from(self.bounds.min.y)) as usize;
        self.cells.get((dx, dy)).copied()
    }

    pub fn unrevealed_count(&self) -> usize {
        self.cells.iter().filter(|view| view.is_unrevealed()).count()
    }

    /// Iterates every cell in the snapshot with its position.
    pub fn iter(&self) -> impl Iterator<Item = (Cell, CellView)> + '_ {
        let min = self.bounds.min;
        self.cells
            .indexed_iter()
            .map(move |((dx, dy), &view)| (offset(min, dx, dy), view))
    }
}

fn offset(min: Cell, dx: usize, dy: usize) -> Cell {
    Cell::new(
        (i64::from(min.x) + dx as i64) as Coord,
        (i64::from(min.y) + dy as i64) as Coord,
    )
}
