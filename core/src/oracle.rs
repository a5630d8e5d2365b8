use hashbrown::HashSet;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::*;

/// Multiplier spreading the x coordinate across the hash.
pub const HASH_MUL_X: i32 = 73_856_093;
/// Multiplier spreading the y coordinate across the hash.
pub const HASH_MUL_Y: i32 = 19_349_663;
/// Bound applied to the combined hash before it seeds the per-cell generator.
pub const HASH_MODULUS: u32 = 23_389_859;

/// Decides mine placement on the infinite lattice.
///
/// Implementations must be pure: the same cell always gets the same answer for the lifetime of
/// the oracle, regardless of query order.
pub trait MineOracle {
    fn is_mine(&self, cell: Cell) -> bool;

    /// Mines among the (up to) eight surrounding cells.
    fn neighbor_mine_count(&self, cell: Cell) -> u8 {
        cell.iter_neighbors().filter(|&pos| self.is_mine(pos)).count() as u8
    }
}

impl<O: MineOracle + ?Sized> MineOracle for &O {
    fn is_mine(&self, cell: Cell) -> bool {
        (**self).is_mine(cell)
    }
}

/// Combines seed and coordinates into the bounded value that seeds a cell's draw.
pub fn position_hash(seed: i32, cell: Cell) -> u32 {
    let hash = seed ^ cell.x.wrapping_mul(HASH_MUL_X) ^ cell.y.wrapping_mul(HASH_MUL_Y);
    hash.unsigned_abs() % HASH_MODULUS
}

/// Draws the cell's value in `[0, 100)` from a generator seeded only by the position hash.
pub fn cell_draw(seed: i32, cell: Cell) -> u8 {
    let mut rng = Pcg32::seed_from_u64(u64::from(position_hash(seed, cell)));
    rng.random_range(0..100)
}

/// Whether `cell` holds a mine.
///
/// The comparison is inclusive, so the effective density is `(mine_chance + 1) / 100`; existing
/// saves depend on this exact layout.
pub fn is_mine(seed: i32, mine_chance: u8, cell: Cell) -> bool {
    cell_draw(seed, cell) <= mine_chance
}

/// The lattice described by a save seed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeededOracle {
    seed: i32,
    mine_chance: u8,
}

impl SeededOracle {
    pub const fn new(seed: i32, mine_chance: u8) -> Self {
        Self { seed, mine_chance }
    }

    pub const fn seed(&self) -> i32 {
        self.seed
    }

    pub const fn mine_chance(&self) -> u8 {
        self.mine_chance
    }
}

impl MineOracle for SeededOracle {
    fn is_mine(&self, cell: Cell) -> bool {
        is_mine(self.seed, self.mine_chance, cell)
    }
}

/// Hand-placed mines; every cell not listed is safe.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MineLayout {
    mines: HashSet<Cell>,
}

impl MineLayout {
    pub fn from_mine_cells(mines: &[Cell]) -> Self {
        Self {
            mines: mines.iter().copied().collect(),
        }
    }

    pub fn mine_count(&self) -> usize {
        self.mines.len()
    }
}

impl MineOracle for MineLayout {
    fn is_mine(&self, cell: Cell) -> bool {
        self.mines.contains(&cell)
    }
}

/// Picks a seed for a brand new save.
pub fn fresh_seed<R: Rng + ?Sized>(rng: &mut R) -> i32 {
    rng.random_range(0..i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn density(oracle: &impl MineOracle) -> f64 {
        let mut mines = 0;
        for x in -50..50 {
            for y in -50..50 {
                if oracle.is_mine(Cell::new(x, y)) {
                    mines += 1;
                }
            }
        }
        f64::from(mines) / 10_000.0
    }

    #[test]
    fn same_query_always_agrees() {
        let oracle = SeededOracle::new(1_234_567, 20);
        for x in -20..20 {
            for y in -20..20 {
                let cell = Cell::new(x, y);
                let first = oracle.is_mine(cell);
                assert!((0..5).all(|_| oracle.is_mine(cell) == first));
                assert_eq!(SeededOracle::new(1_234_567, 20).is_mine(cell), first);
            }
        }
    }

    #[test]
    fn hash_is_bounded_and_handles_extremes() {
        for cell in [
            Cell::new(i32::MIN, i32::MIN),
            Cell::new(i32::MAX, i32::MIN),
            Cell::new(0, 0),
        ] {
            assert!(position_hash(i32::MIN, cell) < HASH_MODULUS);
            assert!(position_hash(i32::MAX, cell) < HASH_MODULUS);
        }
        assert_eq!(position_hash(0, Cell::ORIGIN), 0);
        assert_eq!(position_hash(42, Cell::ORIGIN), 42);
        assert_eq!(position_hash(-42, Cell::ORIGIN), 42);
    }

    #[test]
    fn density_tracks_inclusive_mine_chance() {
        let d = density(&SeededOracle::new(99, 20));
        assert!((0.17..0.25).contains(&d), "density {d}");

        assert!(density(&SeededOracle::new(99, 0)) < 0.03);
        assert_eq!(density(&SeededOracle::new(99, 99)), 1.0);
        assert_eq!(density(&SeededOracle::new(99, 100)), 1.0);
    }

    #[test]
    fn neighbor_count_matches_manual_sum() {
        let oracle = SeededOracle::new(-77, 20);
        for x in -10..10 {
            for y in -10..10 {
                let cell = Cell::new(x, y);
                let manual = cell.iter_neighbors().filter(|&n| oracle.is_mine(n)).count();
                let count = oracle.neighbor_mine_count(cell);
                assert_eq!(usize::from(count), manual);
                assert!(count <= 8);
            }
        }
    }

    #[test]
    fn layout_only_reports_listed_mines() {
        let layout = MineLayout::from_mine_cells(&[Cell::new(1, 1), Cell::new(-1, 0)]);
        assert_eq!(layout.mine_count(), 2);
        assert!(layout.is_mine(Cell::new(1, 1)));
        assert!(!layout.is_mine(Cell::new(0, 0)));
        assert_eq!(layout.neighbor_mine_count(Cell::ORIGIN), 2);
        assert_eq!(layout.neighbor_mine_count(Cell::new(5, 5)), 0);
    }

    #[test]
    fn fresh_seed_is_non_negative() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(fresh_seed(&mut rng) >= 0);
        }
    }
}
