//! Binary save format.
//!
//! Layout, little-endian, no padding and no version field:
//!
//! ```text
//! i32 width
//! i32 height
//! width * height records, x outer / y inner:
//!     u8 alive (0 or 1), i32 generations_alive, u8 red, u8 green, u8 blue
//! u8 x3 grid-line color
//! u8 x3 background color
//! ```
//!
//! `generations_alive` counts consecutive survivals. A cell that dies while
//! stepping, or whose alive flag is toggled by hand, is saved with 0. Counts
//! are capped at `i32::MAX` before they reach the grid, so every stored count
//! fits the field unchanged.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::Path;

use log::{info, warn};
use tempfile::NamedTempFile;

use super::cell::{Cell, MAX_GENERATIONS_ALIVE, Rgb};
use super::engine::{Universe, UniverseConfig};
use super::error::{PersistError, PersistResult};
use super::grid::Grid;

/// File the driver restores on start and writes on exit.
pub const AUTOSAVE_FILE_NAME: &str = "autosave.gol";

const CELL_RECORD_LEN: usize = 8;
// Upper bound on cells reserved up front; the rest grows as data arrives so
// a forged header cannot force a huge allocation.
const MAX_PREALLOCATED_CELLS: usize = 1 << 20;

/// A decoded save: the universe plus the two display colors stored with it.
#[derive(Clone, Debug)]
pub struct LoadedUniverse {
    pub universe: Universe,
    pub grid_line_color: Rgb,
    pub background_color: Rgb,
}

pub fn encode<W: Write>(
    universe: &Universe,
    grid_line_color: Rgb,
    background_color: Rgb,
    writer: &mut W,
) -> PersistResult<()> {
    let (width, height) = universe.grid().dimensions();
    let too_large = || PersistError::InvalidDimensions {
        width: width as i64,
        height: height as i64,
    };
    let w = i32::try_from(width).map_err(|_| too_large())?;
    let h = i32::try_from(height).map_err(|_| too_large())?;

    writer.write_all(&w.to_le_bytes())?;
    writer.write_all(&h.to_le_bytes())?;
    for cell in universe.grid().cells() {
        writer.write_all(&encode_cell(cell))?;
    }
    writer.write_all(&grid_line_color.to_bytes())?;
    writer.write_all(&background_color.to_bytes())?;
    Ok(())
}

#[inline]
fn encode_cell(cell: &Cell) -> [u8; CELL_RECORD_LEN] {
    let generations = cell.generations_alive.min(MAX_GENERATIONS_ALIVE) as i32;
    let g = generations.to_le_bytes();
    let [r, gr, b] = cell.color.to_bytes();
    [cell.alive as u8, g[0], g[1], g[2], g[3], r, gr, b]
}

/// Decode with default settings for everything the format does not carry.
pub fn decode<R: Read>(reader: &mut R) -> PersistResult<LoadedUniverse> {
    decode_with_config(reader, UniverseConfig::default())
}

/// Decode, taking topology, density, seed and parallelism from `config`.
/// The stored dimensions override `config`'s size.
pub fn decode_with_config<R: Read>(
    reader: &mut R,
    config: UniverseConfig,
) -> PersistResult<LoadedUniverse> {
    let width = i32::from_le_bytes(read_array(reader, "width")?);
    let height = i32::from_le_bytes(read_array(reader, "height")?);
    let invalid = || PersistError::InvalidDimensions {
        width: width as i64,
        height: height as i64,
    };
    if width <= 0 || height <= 0 {
        return Err(invalid());
    }
    let (width, height) = (width as usize, height as usize);
    let total = width.checked_mul(height).ok_or_else(invalid)?;

    let mut cells = Vec::with_capacity(total.min(MAX_PREALLOCATED_CELLS));
    for idx in 0..total {
        let record: [u8; CELL_RECORD_LEN] = read_array(reader, "cell")?;
        cells.push(decode_cell(record, idx / height, idx % height)?);
    }
    let grid_line_color = Rgb::from_bytes(read_array(reader, "grid-line color")?);
    let background_color = Rgb::from_bytes(read_array(reader, "background color")?);

    let mut trailing = [0u8; 1];
    if reader.read(&mut trailing)? != 0 {
        warn!("ignoring trailing bytes after save data");
    }

    let grid = Grid::from_cells(width, height, cells);
    Ok(LoadedUniverse {
        universe: Universe::from_grid(grid, config),
        grid_line_color,
        background_color,
    })
}

#[inline]
fn decode_cell(record: [u8; CELL_RECORD_LEN], x: usize, y: usize) -> PersistResult<Cell> {
    let alive = match record[0] {
        0 => false,
        1 => true,
        value => return Err(PersistError::InvalidAliveFlag { x, y, value }),
    };
    let generations = i32::from_le_bytes([record[1], record[2], record[3], record[4]]);
    if generations < 0 {
        return Err(PersistError::NegativeGenerations {
            x,
            y,
            value: generations,
        });
    }
    Ok(Cell {
        alive,
        generations_alive: generations as u32,
        color: Rgb::new(record[5], record[6], record[7]),
    })
}

fn read_array<const N: usize, R: Read>(
    reader: &mut R,
    field: &'static str,
) -> PersistResult<[u8; N]> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|err| match err.kind() {
        io::ErrorKind::UnexpectedEof => PersistError::Truncated { field },
        _ => PersistError::Io(err),
    })?;
    Ok(buf)
}

/// Write `universe` to `path` atomically: the data goes to a temporary file
/// in the same directory which is then renamed over `path`.
pub fn save(
    universe: &Universe,
    path: impl AsRef<Path>,
    grid_line_color: Rgb,
    background_color: Rgb,
) -> PersistResult<()> {
    let path = path.as_ref();
    let write_err = |source| PersistError::Write {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        match encode(universe, grid_line_color, background_color, &mut writer) {
            Ok(()) => {}
            Err(PersistError::Io(source)) => return Err(write_err(source)),
            Err(err) => return Err(err),
        }
        writer.flush().map_err(write_err)?;
    }
    tmp.as_file().sync_all().map_err(write_err)?;
    tmp.persist(path).map_err(|err| write_err(err.error))?;

    info!(
        "saved {}x{} universe to {}",
        universe.width(),
        universe.height(),
        path.display()
    );
    Ok(())
}

pub fn load(path: impl AsRef<Path>) -> PersistResult<LoadedUniverse> {
    load_with_config(path, UniverseConfig::default())
}

pub fn load_with_config(
    path: impl AsRef<Path>,
    config: UniverseConfig,
) -> PersistResult<LoadedUniverse> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PersistError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = decode_with_config(&mut BufReader::new(file), config)?;
    info!(
        "loaded {}x{} universe from {}",
        loaded.universe.width(),
        loaded.universe.height(),
        path.display()
    );
    Ok(loaded)
}

/// `Ok(None)` when `path` does not exist, otherwise [`load`].
pub fn load_if_exists(path: impl AsRef<Path>) -> PersistResult<Option<LoadedUniverse>> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(None);
    }
    load(path).map(Some)
}

impl Universe {
    /// See [`save`].
    pub fn save(
        &self,
        path: impl AsRef<Path>,
        grid_line_color: Rgb,
        background_color: Rgb,
    ) -> PersistResult<()> {
        save(self, path, grid_line_color, background_color)
    }

    /// See [`load`].
    pub fn load(path: impl AsRef<Path>) -> PersistResult<LoadedUniverse> {
        load(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode};
    use crate::colorlife::cell::{Cell, Rgb};
    use crate::colorlife::engine::Universe;
    use crate::colorlife::error::PersistError;

    fn bytes_of(universe: &Universe, grid: Rgb, background: Rgb) -> Vec<u8> {
        let mut out = Vec::new();
        encode(universe, grid, background, &mut out).unwrap();
        out
    }

    #[test]
    fn layout_is_little_endian_column_major() {
        let mut universe = Universe::new(2, 1);
        universe.set_cell(
            1,
            0,
            Cell {
                alive: true,
                generations_alive: 0x0102_0304,
                color: Rgb::new(9, 8, 7),
            },
        );
        let bytes = bytes_of(&universe, Rgb::new(1, 2, 3), Rgb::new(4, 5, 6));
        assert_eq!(
            bytes,
            vec![
                2, 0, 0, 0, // width
                1, 0, 0, 0, // height
                0, 0, 0, 0, 0, 0, 0, 0, // (0,0)
                1, 4, 3, 2, 1, 9, 8, 7, // (1,0)
                1, 2, 3, // grid-line
                4, 5, 6, // background
            ]
        );
    }

    #[test]
    fn every_truncation_point_fails() {
        let mut universe = Universe::new(3, 2);
        universe.set_cell_alive_with_color(1, 1, true, Rgb::new(50, 60, 70));
        let bytes = bytes_of(&universe, Rgb::WHITE, Rgb::BLACK);
        for len in 0..bytes.len() {
            let err = decode(&mut &bytes[..len]).unwrap_err();
            assert!(
                matches!(err, PersistError::Truncated { .. }),
                "prefix of {len} bytes gave {err:?}"
            );
        }
        assert!(decode(&mut &bytes[..]).is_ok());
    }

    #[test]
    fn rejects_bad_header_and_records() {
        let mut zero_width = Vec::new();
        zero_width.extend_from_slice(&0i32.to_le_bytes());
        zero_width.extend_from_slice(&4i32.to_le_bytes());
        assert!(matches!(
            decode(&mut &zero_width[..]),
            Err(PersistError::InvalidDimensions { width: 0, height: 4 })
        ));

        let universe = Universe::new(1, 1);
        let mut bytes = bytes_of(&universe, Rgb::WHITE, Rgb::BLACK);
        bytes[8] = 2;
        assert!(matches!(
            decode(&mut &bytes[..]),
            Err(PersistError::InvalidAliveFlag { x: 0, y: 0, value: 2 })
        ));

        let mut bytes = bytes_of(&universe, Rgb::WHITE, Rgb::BLACK);
        bytes[9..13].copy_from_slice(&(-5i32).to_le_bytes());
        assert!(matches!(
            decode(&mut &bytes[..]),
            Err(PersistError::NegativeGenerations { value: -5, .. })
        ));
    }

    #[test]
    fn forged_huge_header_fails_without_allocating_it() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&i32::MAX.to_le_bytes());
        bytes.extend_from_slice(&i32::MAX.to_le_bytes());
        assert!(matches!(
            decode(&mut &bytes[..]),
            Err(PersistError::Truncated { field: "cell" })
        ));
    }

    #[test]
    fn trailing_bytes_are_ignored() {
        let universe = Universe::new(2, 2);
        let mut bytes = bytes_of(&universe, Rgb::new(1, 1, 1), Rgb::new(2, 2, 2));
        bytes.extend_from_slice(b"junk");
        let loaded = decode(&mut &bytes[..]).unwrap();
        assert_eq!(loaded.background_color, Rgb::new(2, 2, 2));
    }
}
