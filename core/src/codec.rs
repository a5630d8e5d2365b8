//! Save format: a 12 byte header (seed, wins, losses) followed by 9 byte records.
//!
//! Every multi-byte field is little-endian. A record is `x: i32, y: i32, kind: u8`; for
//! [`RecordKind::SucceededSector`] the coordinates are sector coordinates. Failed sectors are not
//! stored, they are derived from their detonation records.

use alloc::vec::Vec;
use hashbrown::HashSet;

use crate::*;

pub const HEADER_LEN: usize = 12;
pub const RECORD_LEN: usize = 9;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum RecordKind {
    Open = 0,
    Flagged = 1,
    Detonated = 2,
    SucceededSector = 3,
}

impl TryFrom<u8> for RecordKind {
    type Error = u8;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Open),
            1 => Ok(Self::Flagged),
            2 => Ok(Self::Detonated),
            3 => Ok(Self::SucceededSector),
            other => Err(other),
        }
    }
}

pub fn encode(state: &FieldState) -> Vec<u8> {
    let records = state
        .open_cells()
        .map(|c| (c.x, c.y, RecordKind::Open))
        .chain(state.flagged_cells().map(|c| (c.x, c.y, RecordKind::Flagged)))
        .chain(state.detonated_cells().map(|c| (c.x, c.y, RecordKind::Detonated)))
        .chain(state.succeeded_sectors().map(|s| (s.x, s.y, RecordKind::SucceededSector)));

    let mut out = Vec::with_capacity(HEADER_LEN + RECORD_LEN * 16);
    out.extend_from_slice(&state.seed().to_le_bytes());
    out.extend_from_slice(&state.wins().to_le_bytes());
    out.extend_from_slice(&state.losses().to_le_bytes());
    for (x, y, kind) in records {
        out.extend_from_slice(&x.to_le_bytes());
        out.extend_from_slice(&y.to_le_bytes());
        out.push(kind as u8);
    }

    let detonated_sectors: HashSet<Sector> =
        state.detonated_cells().map(|c| state.sector_of(c)).collect();
    for sector in state.failed_sectors() {
        if !detonated_sectors.contains(&sector) {
            log::warn!("failed sector {:?} has no detonation and will not be saved", sector);
        }
    }

    log::debug!(
        "encoded save: {} bytes, {} records",
        out.len(),
        (out.len() - HEADER_LEN) / RECORD_LEN
    );
    out
}

/// Rebuilds field state from save bytes.
///
/// Sector records are applied before cell records, so a cell inside a Failed or Succeeded sector
/// is dropped. A sector with both a detonation and a success record stays Failed. An Open record
/// wins over a Flagged record for the same cell.
pub fn decode(bytes: &[u8], sector_size: Coord) -> Result<FieldState> {
    if bytes.len() < HEADER_LEN || (bytes.len() - HEADER_LEN) % RECORD_LEN != 0 {
        return Err(CorruptSave::BadLength { len: bytes.len() }.into());
    }

    let (header, body) = bytes.split_at(HEADER_LEN);
    let records = body
        .chunks_exact(RECORD_LEN)
        .enumerate()
        .map(|(i, chunk)| -> Result<(Coord, Coord, RecordKind)> {
            let kind = RecordKind::try_from(chunk[8]).map_err(|kind| CorruptSave::UnknownRecord {
                offset: HEADER_LEN + i * RECORD_LEN,
                kind,
            })?;
            Ok((read_i32(&chunk[0..4]), read_i32(&chunk[4..8]), kind))
        })
        .collect::<Result<Vec<_>>>()?;

    let mut state = FieldState::new(read_i32(&header[0..4]), sector_size)?;
    state.restore_counters(read_u32(&header[4..8]), read_u32(&header[8..12]));

    let of_kind = |wanted: RecordKind| {
        records
            .iter()
            .filter(move |&&(_, _, kind)| kind == wanted)
            .map(|&(x, y, _)| (x, y))
    };
    for (x, y) in of_kind(RecordKind::Detonated) {
        state.restore_detonation(Cell::new(x, y));
    }
    for (x, y) in of_kind(RecordKind::SucceededSector) {
        state.restore_succeeded(Sector::new(x, y));
    }
    for (x, y) in of_kind(RecordKind::Open) {
        state.mark_open(Cell::new(x, y));
    }
    for (x, y) in of_kind(RecordKind::Flagged) {
        state.restore_flag(Cell::new(x, y));
    }

    log::debug!(
        "decoded save: seed {}, {} records, wins {}, losses {}",
        state.seed(),
        records.len(),
        state.wins(),
        state.losses()
    );
    Ok(state)
}

fn read_i32(bytes: &[u8]) -> i32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    i32::from_le_bytes(buf)
}

fn read_u32(bytes: &[u8]) -> u32 {
    let mut buf = [0u8; 4];
    buf.copy_from_slice(bytes);
    u32::from_le_bytes(buf)
}
