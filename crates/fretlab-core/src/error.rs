//! Error types for fretlab

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Unknown scale name: {0}")]
    UnknownScale(String),
    #[error("Unknown chord name: {0}")]
    UnknownChord(String),
    #[error("Unknown pitch name: {0}")]
    UnknownPitch(String),
    #[error("Invalid fret window {low}..={high}")]
    InvalidWindow { low: i8, high: i8 },
    #[error("Position {string}/{fret} outside the board")]
    InvalidPosition { string: u8, fret: i8 },
    #[error("Snapshot taken on {snapshot} does not fit instrument {instrument}")]
    SnapshotMismatch { snapshot: String, instrument: String },
}

pub type Result<T> = std::result::Result<T, CoreError>;
