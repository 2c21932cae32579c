//! B3/S23 transition with majority-vote birth colors.

use super::cell::{Cell, DEFAULT_CELL_COLOR, Rgb};
use super::grid::Grid;
use super::topology::Topology;

/// Per-birth color tally over at most eight neighbors.
///
/// Entries keep first-seen order. The leader only changes when a color's
/// count becomes strictly greater than the leader's, so the winner is the
/// color that first reached the final maximum during the scan.
#[derive(Clone, Copy, Debug)]
pub struct ColorTally {
    entries: [(Rgb, u8); 8],
    len: usize,
    leader: Option<usize>,
}

impl Default for ColorTally {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorTally {
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: [(DEFAULT_CELL_COLOR, 0); 8],
            len: 0,
            leader: None,
        }
    }

    #[inline]
    pub fn add(&mut self, color: Rgb) {
        let slot = match self.entries[..self.len].iter().position(|&(c, _)| c == color) {
            Some(slot) => slot,
            None => {
                debug_assert!(self.len < self.entries.len());
                self.entries[self.len] = (color, 0);
                self.len += 1;
                self.len - 1
            }
        };
        self.entries[slot].1 += 1;
        let count = self.entries[slot].1;
        match self.leader {
            Some(lead) if self.entries[lead].1 >= count => {}
            _ => self.leader = Some(slot),
        }
    }

    /// Winning color, or the default color when nothing was tallied.
    #[inline]
    pub fn winner(&self) -> Rgb {
        self.leader
            .map(|lead| self.entries[lead].0)
            .unwrap_or(DEFAULT_CELL_COLOR)
    }
}

#[inline]
pub fn count_live_neighbors(grid: &Grid, topology: Topology, x: usize, y: usize) -> u8 {
    let (width, height) = grid.dimensions();
    let mut count = 0u8;
    for (nx, ny) in topology.neighbors(x, y, width, height) {
        count += grid.at(nx * height + ny).alive as u8;
    }
    count
}

pub fn birth_color(grid: &Grid, topology: Topology, x: usize, y: usize) -> Rgb {
    let (width, height) = grid.dimensions();
    let mut tally = ColorTally::new();
    for (nx, ny) in topology.neighbors(x, y, width, height) {
        let cell = grid.at(nx * height + ny);
        if cell.alive {
            tally.add(cell.color);
        }
    }
    tally.winner()
}

/// Next-generation value of the cell at `(x, y)`, reading only `current`.
#[inline]
pub fn next_cell(current: &Grid, topology: Topology, x: usize, y: usize) -> Cell {
    let cell = current.at(x * current.height() + y);
    let neighbors = count_live_neighbors(current, topology, x, y);
    cell.next(neighbors, || birth_color(current, topology, x, y))
}

/// Fill one column of the next generation.
#[inline]
pub fn advance_column(current: &Grid, topology: Topology, x: usize, next: &mut [Cell]) {
    debug_assert_eq!(next.len(), current.height());
    for (y, out) in next.iter_mut().enumerate() {
        *out = next_cell(current, topology, x, y);
    }
}
