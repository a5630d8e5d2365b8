use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SectorStatus {
    Active,
    Failed,
    Succeeded,
}

impl SectorStatus {
    /// Failed and Succeeded sectors are read-only.
    pub const fn is_resolved(self) -> bool {
        matches!(self, Self::Failed | Self::Succeeded)
    }
}

impl Default for SectorStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// Sparse record of everything the player has done to the lattice.
///
/// Cells of a Failed or Succeeded sector are described by the sector alone and never appear in
/// `open` or `flagged`. The one exception is the detonation that failed a sector, which is kept so
/// the failure can be persisted and shown.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldState {
    seed: i32,
    sector_size: Coord,
    open: HashSet<Cell>,
    flagged: HashSet<Cell>,
    detonated: HashSet<Cell>,
    failed_sectors: HashSet<Sector>,
    succeeded_sectors: HashSet<Sector>,
    wins: u32,
    losses: u32,
}

impl FieldState {
    pub fn new(seed: i32, sector_size: Coord) -> Result<Self> {
        if sector_size < 2 {
            return Err(ConfigIssue::SectorTooSmall(sector_size).into());
        }
        Ok(Self {
            seed,
            sector_size,
            open: HashSet::new(),
            flagged: HashSet::new(),
            detonated: HashSet::new(),
            failed_sectors: HashSet::new(),
            succeeded_sectors: HashSet::new(),
            wins: 0,
            losses: 0,
        })
    }

    pub fn seed(&self) -> i32 {
        self.seed
    }

    pub fn sector_size(&self) -> Coord {
        self.sector_size
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn losses(&self) -> u32 {
        self.losses
    }

    pub fn sector_of(&self, cell: Cell) -> Sector {
        cell.sector(self.sector_size)
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.open.contains(&cell)
    }

    pub fn is_flagged(&self, cell: Cell) -> bool {
        self.flagged.contains(&cell)
    }

    pub fn is_detonated(&self, cell: Cell) -> bool {
        self.detonated.contains(&cell)
    }

    pub fn sector_status(&self, sector: Sector) -> SectorStatus {
        if self.failed_sectors.contains(&sector) {
            SectorStatus::Failed
        } else if self.succeeded_sectors.contains(&sector) {
            SectorStatus::Succeeded
        } else {
            SectorStatus::Active
        }
    }

    pub fn cell_sector_status(&self, cell: Cell) -> SectorStatus {
        self.sector_status(self.sector_of(cell))
    }

    /// Whether a play action on `cell` has nothing left to do.
    pub fn is_resolved(&self, cell: Cell) -> bool {
        self.cell_sector_status(cell).is_resolved()
            || self.is_open(cell)
            || self.is_flagged(cell)
            || self.is_detonated(cell)
    }

    /// Records a safe reveal. A flag on the cell is replaced.
    pub fn mark_open(&mut self, cell: Cell) -> bool {
        if self.cell_sector_status(cell).is_resolved() || self.is_detonated(cell) {
            return false;
        }
        self.flagged.remove(&cell);
        self.open.insert(cell)
    }

    pub fn toggle_flag(&mut self, cell: Cell) -> MarkOutcome {
        if self.cell_sector_status(cell).is_resolved()
            || self.is_open(cell)
            || self.is_detonated(cell)
        {
            return MarkOutcome::NoChange;
        }
        if !self.flagged.remove(&cell) {
            self.flagged.insert(cell);
        }
        MarkOutcome::Changed
    }

    /// Records a revealed mine and fails its sector.
    pub fn mark_detonated(&mut self, cell: Cell) -> bool {
        let sector = self.sector_of(cell);
        if !self.mark_sector_failed(sector) {
            return false;
        }
        self.detonated.insert(cell);
        true
    }

    pub fn mark_sector_failed(&mut self, sector: Sector) -> bool {
        if !self.resolve_sector(sector, SectorStatus::Failed) {
            return false;
        }
        self.losses = self.losses.saturating_add(1);
        log::debug!("sector {:?} failed, losses: {}", sector, self.losses);
        true
    }

    /// Closes a fully cleared sector, evicting its open and flagged cells.
    pub fn mark_sector_succeeded(&mut self, sector: Sector) -> bool {
        if !self.resolve_sector(sector, SectorStatus::Succeeded) {
            return false;
        }
        self.wins = self.wins.saturating_add(1);
        log::debug!("sector {:?} succeeded, wins: {}", sector, self.wins);
        true
    }

    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.open.iter().copied()
    }

    pub fn flagged_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.flagged.iter().copied()
    }

    pub fn detonated_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.detonated.iter().copied()
    }

    pub fn failed_sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        self.failed_sectors.iter().copied()
    }

    pub fn succeeded_sectors(&self) -> impl Iterator<Item = Sector> + '_ {
        self.succeeded_sectors.iter().copied()
    }

    pub fn open_in(&self, rect: Rect) -> impl Iterator<Item = Cell> + '_ {
        self.open_cells().filter(move |&c| rect.contains(c))
    }

    pub fn flagged_in(&self, rect: Rect) -> impl Iterator<Item = Cell> + '_ {
        self.flagged_cells().filter(move |&c| rect.contains(c))
    }

    pub fn detonated_in(&self, rect: Rect) -> impl Iterator<Item = Cell> + '_ {
        self.detonated_cells().filter(move |&c| rect.contains(c))
    }

    pub fn failed_sectors_in(&self, rect: Rect) -> impl Iterator<Item = Sector> + '_ {
        let span = rect.sector_span(self.sector_size);
        self.failed_sectors().filter(move |&s| sector_in_span(s, span))
    }

    pub fn succeeded_sectors_in(&self, rect: Rect) -> impl Iterator<Item = Sector> + '_ {
        let span = rect.sector_span(self.sector_size);
        self.succeeded_sectors().filter(move |&s| sector_in_span(s, span))
    }

    pub(crate) fn restore_counters(&mut self, wins: u32, losses: u32) {
        self.wins = wins;
        self.losses = losses;
    }

    /// Re-applies a persisted detonation without touching the counters.
    pub(crate) fn restore_detonation(&mut self, cell: Cell) {
        let sector = self.sector_of(cell);
        if self.sector_status(sector) == SectorStatus::Succeeded {
            return;
        }
        self.resolve_sector(sector, SectorStatus::Failed);
        self.detonated.insert(cell);
    }

    pub(crate) fn restore_succeeded(&mut self, sector: Sector) {
        self.resolve_sector(sector, SectorStatus::Succeeded);
    }

    pub(crate) fn restore_flag(&mut self, cell: Cell) {
        if !self.is_resolved(cell) {
            self.flagged.insert(cell);
        }
    }

    fn resolve_sector(&mut self, sector: Sector, status: SectorStatus) -> bool {
        if self.sector_status(sector).is_resolved() {
            return false;
        }

        for cell in sector.iter_cells(self.sector_size) {
            self.open.remove(&cell);
            self.flagged.remove(&cell);
        }
        match status {
            SectorStatus::Failed => self.failed_sectors.insert(sector),
            SectorStatus::Succeeded => self.succeeded_sectors.insert(sector),
            SectorStatus::Active => false,
        }
    }
}

fn sector_in_span(sector: Sector, (min, max): (Sector, Sector)) -> bool {
    min.x <= sector.x && sector.x <= max.x && min.y <= sector.y && sector.y <= max.y
}
