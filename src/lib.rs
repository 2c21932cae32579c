//! Conway's Game of Life (B3/S23) on a finite grid where births inherit the
//! majority color of their parents.

pub mod colorlife;
pub use colorlife::{
    Cell, LoadedUniverse, Pattern, PersistError, Rgb, Topology, Universe, UniverseConfig,
};
