use alloc::collections::VecDeque;
use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::*;

/// Drives play on one field: the only place reveals and flags are decided.
#[derive(Clone, Debug)]
pub struct PlayEngine<O = SeededOracle> {
    oracle: O,
    state: FieldState,
    flood_budget: Option<usize>,
}

impl PlayEngine<SeededOracle> {
    /// Starts an empty field for `seed`.
    pub fn new(seed: i32, config: GameConfig) -> Result<Self> {
        config.validate()?;
        let state = FieldState::new(seed, config.sector_size)?;
        Ok(Self::with_oracle(
            config.oracle(seed),
            state,
            config.flood_budget,
        ))
    }

    /// Resumes a field from save bytes; the seed comes from the save.
    pub fn load(bytes: &[u8], config: GameConfig) -> Result<Self> {
        config.validate()?;
        let state = decode(bytes, config.sector_size)?;
        Ok(Self::with_oracle(
            config.oracle(state.seed()),
            state,
            config.flood_budget,
        ))
    }

    pub fn save(&self) -> Vec<u8> {
        encode(&self.state)
    }

    pub fn seed(&self) -> i32 {
        self.oracle.seed()
    }
}

impl<O: MineOracle> PlayEngine<O> {
    pub fn with_oracle(oracle: O, state: FieldState, flood_budget: Option<usize>) -> Self {
        Self {
            oracle,
            state,
            flood_budget,
        }
    }

    pub fn state(&self) -> &FieldState {
        &self.state
    }

    pub fn into_state(self) -> FieldState {
        self.state
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        self.state.is_open(cell)
    }

    pub fn is_flagged(&self, cell: Cell) -> bool {
        self.state.is_flagged(cell)
    }

    pub fn sector_status(&self, sector: Sector) -> SectorStatus {
        self.state.sector_status(sector)
    }

    pub fn neighbor_mine_count(&self, cell: Cell) -> u8 {
        self.oracle.neighbor_mine_count(cell)
    }

    /// What a renderer should paint at `cell`.
    pub fn cell_view(&self, cell: Cell) -> CellView {
        use SectorStatus::*;

        if self.state.is_detonated(cell) {
            return CellView::Detonated;
        }

        match self.state.cell_sector_status(cell) {
            Failed if self.oracle.is_mine(cell) => CellView::Mine,
            Succeeded if self.oracle.is_mine(cell) => CellView::Flagged,
            Failed | Succeeded => CellView::Revealed(self.neighbor_mine_count(cell)),
            Active if self.state.is_open(cell) => {
                CellView::Revealed(self.neighbor_mine_count(cell))
            }
            Active if self.state.is_flagged(cell) => CellView::Flagged,
            Active => CellView::Hidden,
        }
    }

    /// Opens `cell`, flooding outward across zero-count cells.
    ///
    /// Always consult this for a reveal request: mine status is only decided here.
    pub fn reveal(&mut self, cell: Cell) -> RevealOutcome {
        if self.state.is_resolved(cell) {
            return RevealOutcome::NoChange;
        }

        if self.oracle.is_mine(cell) {
            log::debug!("detonated mine at {:?}", cell);
            self.state.mark_detonated(cell);
            return RevealOutcome::Detonated;
        }

        let touched = self.flood_fill(cell);
        if self.settle_sectors(touched) {
            RevealOutcome::SectorCleared
        } else {
            RevealOutcome::Opened
        }
    }

    pub fn toggle_flag(&mut self, cell: Cell) -> MarkOutcome {
        let outcome = self.state.toggle_flag(cell);
        if outcome.has_update()
            && self.state.is_flagged(cell)
            && self.settle_sectors([self.state.sector_of(cell)])
        {
            MarkOutcome::SectorCleared
        } else {
            outcome
        }
    }

    /// A sector is complete once every member is open or correctly flagged.
    pub fn is_sector_complete(&self, sector: Sector) -> bool {
        if self.state.sector_status(sector).is_resolved() {
            return false;
        }

        let mut members = sector.iter_cells(self.state.sector_size()).peekable();
        members.peek().is_some()
            && members.all(|cell| {
                self.state.is_open(cell)
                    || (self.state.is_flagged(cell) && self.oracle.is_mine(cell))
            })
    }

    /// Opens `start` and every cell reachable through zero-count cells, returning the sectors
    /// that received new cells.
    fn flood_fill(&mut self, start: Cell) -> HashSet<Sector> {
        let budget = self.flood_budget.unwrap_or(usize::MAX);
        let mut touched = HashSet::from([self.state.sector_of(start)]);

        self.state.mark_open(start);
        let mut opened = 1usize;
        let mut to_visit = VecDeque::from([start]);

        'fill: while let Some(visit) = to_visit.pop_front() {
            if self.oracle.neighbor_mine_count(visit) != 0 {
                continue;
            }

            for next in visit.iter_neighbors() {
                // open cells double as the visited set
                if self.state.is_resolved(next) {
                    continue;
                }
                if opened >= budget {
                    log::debug!(
                        "flood fill from {:?} stopped after {} cells, {} pending",
                        start,
                        opened,
                        to_visit.len()
                    );
                    break 'fill;
                }

                log::trace!("flood fill opened {:?}", next);
                self.state.mark_open(next);
                opened += 1;
                touched.insert(self.state.sector_of(next));
                to_visit.push_back(next);
            }
        }

        touched
    }

    fn settle_sectors(&mut self, sectors: impl IntoIterator<Item = Sector>) -> bool {
        let mut cleared = false;
        for sector in sectors {
            if self.is_sector_complete(sector) {
                cleared |= self.state.mark_sector_succeeded(sector);
            }
        }
        cleared
    }
}
