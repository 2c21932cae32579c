//! Save/load failures.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("cannot open {} for reading", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("save data ends before the {field} field")]
    Truncated { field: &'static str },
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions { width: i64, height: i64 },
    #[error("cell ({x},{y}) has alive flag {value:#04x}, expected 0 or 1")]
    InvalidAliveFlag { x: usize, y: usize, value: u8 },
    #[error("cell ({x},{y}) has negative survival count {value}")]
    NegativeGenerations { x: usize, y: usize, value: i32 },
    #[error("I/O error on save data")]
    Io(#[from] io::Error),
}

pub type PersistResult<T> = Result<T, PersistError>;
