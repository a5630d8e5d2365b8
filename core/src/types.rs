use serde::{Deserialize, Serialize};

/// Single coordinate axis of the lattice.
pub type Coord = i32;

/// One lattice position. Identity is value equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub x: Coord,
    pub y: Coord,
}

impl Cell {
    pub const ORIGIN: Cell = Cell { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// Sector this cell belongs to for a given sector edge length.
    #[inline]
    pub const fn sector(self, sector_size: Coord) -> Sector {
        Sector {
            x: self.x.div_euclid(sector_size),
            y: self.y.div_euclid(sector_size),
        }
    }

    pub fn iter_neighbors(self) -> NeighborIter {
        NeighborIter::new(self)
    }
}

impl From<(Coord, Coord)> for Cell {
    fn from((x, y): (Coord, Coord)) -> Self {
        Self::new(x, y)
    }
}

/// Square block of cells used for win/loss bookkeeping.
///
/// Sector `(sx, sy)` covers cells `sx * size .. (sx + 1) * size` horizontally and likewise
/// vertically. Blocks on the edge of the integer range are clipped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Sector {
    pub x: Coord,
    pub y: Coord,
}

impl Sector {
    #[inline]
    pub const fn new(x: Coord, y: Coord) -> Self {
        Self { x, y }
    }

    /// All member cells, row by row. Members outside the integer range are skipped.
    pub fn iter_cells(self, sector_size: Coord) -> impl Iterator<Item = Cell> {
        let span = move |s: Coord| {
            let start = i64::from(s) * i64::from(sector_size);
            (start..start + i64::from(sector_size)).filter_map(|v| Coord::try_from(v).ok())
        };
        span(self.y).flat_map(move |y| span(self.x).map(move |x| Cell::new(x, y)))
    }
}

/// Inclusive, axis-aligned rectangle of cells, as supplied by a viewport.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Cell,
    pub max: Cell,
}

impl Rect {
    /// Builds the rectangle spanned by two opposite corners in any order.
    pub fn new(a: Cell, b: Cell) -> Self {
        Self {
            min: Cell::new(a.x.min(b.x), a.y.min(b.y)),
            max: Cell::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub const fn contains(&self, cell: Cell) -> bool {
        self.min.x <= cell.x && cell.x <= self.max.x && self.min.y <= cell.y && cell.y <= self.max.y
    }

    /// Columns covered, saturating where `usize` is narrower than the span.
    pub fn width(&self) -> usize {
        span_len(self.min.x, self.max.x)
    }

    pub fn height(&self) -> usize {
        span_len(self.min.y, self.max.y)
    }

    /// Sectors overlapping this rectangle.
    pub fn sector_span(&self, sector_size: Coord) -> (Sector, Sector) {
        (self.min.sector(sector_size), self.max.sector(sector_size))
    }
}

fn span_len(min: Coord, max: Coord) -> usize {
    usize::try_from(i64::from(max) - i64::from(min) + 1).unwrap_or(usize::MAX)
}

const DISPLACEMENTS: [(Coord, Coord); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `cell`, returning a value only when it stays inside the integer range.
fn apply_delta(cell: Cell, (dx, dy): (Coord, Coord)) -> Option<Cell> {
    Some(Cell::new(cell.x.checked_add(dx)?, cell.y.checked_add(dy)?))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Cell,
    index: u8,
}

impl NeighborIter {
    fn new(center: Cell) -> Self {
        Self { center, index: 0 }
    }
}

impl Iterator for NeighborIter {
    type Item = Cell;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item = apply_delta(self.center, DISPLACEMENTS[self.index as usize]);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn sector_uses_floor_division() {
        assert_eq!(Cell::new(0, 0).sector(10), Sector::new(0, 0));
        assert_eq!(Cell::new(9, 9).sector(10), Sector::new(0, 0));
        assert_eq!(Cell::new(10, -1).sector(10), Sector::new(1, -1));
        assert_eq!(Cell::new(-10, -11).sector(10), Sector::new(-1, -2));
    }

    #[test]
    fn sector_members_map_back_to_their_sector() {
        for sector in [Sector::new(0, 0), Sector::new(-3, 7), Sector::new(12, -1)] {
            let cells: Vec<_> = sector.iter_cells(10).collect();
            assert_eq!(cells.len(), 100);
            assert!(cells.iter().all(|c| c.sector(10) == sector));
        }
    }

    #[test]
    fn sectors_tile_a_region_without_overlap() {
        let mut seen = hashbrown::HashSet::new();
        for sx in -2..2 {
            for sy in -2..2 {
                for cell in Sector::new(sx, sy).iter_cells(5) {
                    assert!(seen.insert(cell), "{cell:?} covered twice");
                }
            }
        }
        assert_eq!(seen.len(), 16 * 25);
    }

    #[test]
    fn sector_at_range_edge_is_clipped() {
        let sector = Cell::new(Coord::MAX, 0).sector(10);
        let cells: Vec<_> = sector.iter_cells(10).collect();
        assert_eq!(cells.len(), 8 * 10);
        assert!(cells.contains(&Cell::new(Coord::MAX, 9)));
    }

    #[test]
    fn sector_at_lower_range_edge_is_clipped() {
        let sector = Cell::new(Coord::MIN, 0).sector(10);
        let cells: Vec<_> = sector.iter_cells(10).collect();
        assert_eq!(cells.len(), 8 * 10);
        assert!(cells.contains(&Cell::new(Coord::MIN, 0)));
        assert!(cells.iter().all(|c| c.sector(10) == sector));

        let corner = Cell::new(Coord::MIN, Coord::MIN).sector(10);
        assert_eq!(corner.iter_cells(10).count(), 8 * 8);
    }

    #[test]
    fn sector_beyond_range_has_no_members() {
        assert_eq!(Sector::new(Coord::MAX, 0).iter_cells(10).count(), 0);
        assert_eq!(Sector::new(0, Coord::MIN).iter_cells(10).count(), 0);
    }

    #[test]
    fn neighbors_skip_overflowing_positions() {
        assert_eq!(Cell::new(5, 5).iter_neighbors().count(), 8);
        assert_eq!(Cell::new(Coord::MAX, 0).iter_neighbors().count(), 5);
        assert_eq!(Cell::new(Coord::MIN, Coord::MIN).iter_neighbors().count(), 3);
        assert!(!Cell::new(5, 5).iter_neighbors().any(|c| c == Cell::new(5, 5)));
    }

    #[test]
    fn rect_normalizes_corners() {
        let rect = Rect::new(Cell::new(3, -2), Cell::new(-1, 4));
        assert_eq!(rect.min, Cell::new(-1, -2));
        assert_eq!(rect.max, Cell::new(3, 4));
        assert_eq!((rect.width(), rect.height()), (5, 7));
        assert!(rect.contains(Cell::ORIGIN));
        assert!(!rect.contains(Cell::new(4, 0)));
    }

    #[test]
    fn full_range_rect_saturates_instead_of_wrapping() {
        let rect = Rect::new(Cell::new(Coord::MIN, 0), Cell::new(Coord::MAX, 0));
        assert_eq!(rect.width(), usize::try_from(1u64 << 32).unwrap_or(usize::MAX));
        assert_eq!(rect.height(), 1);
    }

    #[test]
    fn cell_converts_from_pair() {
        assert_eq!(Cell::from((-4, 9)), Cell::new(-4, 9));
        let cell: Cell = (0, 0).into();
        assert_eq!(cell, Cell::ORIGIN);
    }
}
