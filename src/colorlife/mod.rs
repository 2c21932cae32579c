//! Color-inheriting Game of Life on a finite grid, with binary persistence.

mod cell;
mod codec;
mod engine;
mod error;
mod grid;
mod patterns;
mod rules;
mod topology;

pub use cell::{Cell, DEFAULT_CELL_COLOR, MAX_GENERATIONS_ALIVE, Rgb};
pub use codec::{
    AUTOSAVE_FILE_NAME, LoadedUniverse, decode, decode_with_config, encode, load, load_if_exists,
    load_with_config, save,
};
pub use engine::{Universe, UniverseConfig};
pub use error::{PersistError, PersistResult};
pub use grid::Grid;
pub use patterns::{BUILTIN_PATTERNS, GLIDER, LIGHTWEIGHT_SPACESHIP, PULSAR, Pattern};
pub use rules::ColorTally;
pub use topology::{NEIGHBOR_OFFSETS, Topology};
