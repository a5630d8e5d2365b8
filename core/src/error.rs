use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum FieldError {
    #[error("Corrupt save: {0}")]
    CorruptSave(#[from] CorruptSave),
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(#[from] ConfigIssue),
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CorruptSave {
    #[error("length {len} is not a 12 byte header followed by whole 9 byte records")]
    BadLength { len: usize },
    #[error("record at offset {offset} has unknown type {kind}")]
    UnknownRecord { offset: usize, kind: u8 },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigIssue {
    #[error("mine chance {0} is outside 0..=100")]
    MineChanceOutOfRange(u8),
    #[error("sector size {0} is below 2")]
    SectorTooSmall(i32),
}

pub type Result<T> = core::result::Result<T, FieldError>;
