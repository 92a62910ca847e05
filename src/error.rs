//! Library error type.

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum ScanError {
    Io(io::Error),
    Config(serde_json::Error),
    UnknownBlock { group: String, item: String, block: String },
    SpawnNotFound { x: i32, z: i32 },
    InvalidSettings(String),
    WorkerPanicked,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "i/o error: {err}"),
            Self::Config(err) => write!(f, "invalid configuration: {err}"),
            Self::UnknownBlock { group, item, block } => {
                write!(f, "unknown block {block:?} in target {group}/{item}")
            }
            Self::SpawnNotFound { x, z } => {
                write!(f, "no solid cell in spawn column ({x}, {z})")
            }
            Self::InvalidSettings(message) => write!(f, "invalid settings: {message}"),
            Self::WorkerPanicked => write!(f, "a worker thread panicked outside of a scan"),
        }
    }
}

impl std::error::Error for ScanError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ScanError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err)
    }
}
