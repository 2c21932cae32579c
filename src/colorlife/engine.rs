//! Universe: double-buffered grid, topology switch and stepping.

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use super::cell::{Cell, DEFAULT_CELL_COLOR, Rgb};
use super::grid::Grid;
use super::patterns::Pattern;
use super::rules;
use super::topology::Topology;

const DEFAULT_WIDTH: usize = 100;
const DEFAULT_HEIGHT: usize = 100;
const DEFAULT_DENSITY: f64 = 0.5;
const PARALLEL_MIN_CELLS: usize = 65_536;

#[derive(Clone, Debug, PartialEq)]
pub struct UniverseConfig {
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    /// Probability that a randomized cell is alive.
    pub density: f64,
    /// RNG seed for randomization. `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Fill the scratch grid on the rayon pool.
    /// `None` means auto: `COLORLIFE_PARALLEL` if set, otherwise on for
    /// grids of at least 65 536 cells.
    pub parallel: Option<bool>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            topology: Topology::Bounded,
            density: DEFAULT_DENSITY,
            seed: None,
            parallel: None,
        }
    }
}

impl UniverseConfig {
    /// Set grid dimensions. Zero is raised to 1.
    pub fn size(mut self, width: usize, height: usize) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    pub fn topology(mut self, topology: Topology) -> Self {
        self.topology = topology;
        self
    }

    pub fn toroidal(self, toroidal: bool) -> Self {
        self.topology(Topology::from(toroidal))
    }

    /// Set the alive probability used by randomization, clamped to [0, 1].
    pub fn density(mut self, density: f64) -> Self {
        self.density = sanitize_density(density);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Force parallel stepping on or off.
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = Some(enabled);
        self
    }
}

#[derive(Clone)]
pub struct Universe {
    grid: Grid,
    scratch: Grid,
    topology: Topology,
    generation: u64,
    density: f64,
    rng: StdRng,
    parallel: bool,
    // `None` re-derives `parallel` from the grid size on resize.
    parallel_override: Option<bool>,
}

impl Default for Universe {
    fn default() -> Self {
        Self::with_config(UniverseConfig::default())
    }
}

impl std::fmt::Debug for Universe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Universe")
            .field("width", &self.width())
            .field("height", &self.height())
            .field("topology", &self.topology)
            .field("generation", &self.generation)
            .field("parallel", &self.parallel)
            .field("parallel_override", &self.parallel_override)
            .finish_non_exhaustive()
    }
}

impl Universe {
    /// An all-dead universe with default settings and the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_config(UniverseConfig::default().size(width, height))
    }

    pub fn with_config(config: UniverseConfig) -> Self {
        let grid = Grid::new(config.width, config.height);
        let scratch = Grid::new(config.width, config.height);
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let parallel = resolve_parallel(config.parallel, config.width, config.height);
        debug!(
            "universe {}x{} topology={:?} parallel={parallel}",
            grid.width(),
            grid.height(),
            config.topology
        );
        Self {
            grid,
            scratch,
            topology: config.topology,
            generation: 0,
            density: sanitize_density(config.density),
            rng,
            parallel,
            parallel_override: config.parallel,
        }
    }

    /// Replace the current grid wholesale, e.g. with freshly decoded cells.
    pub(crate) fn from_grid(grid: Grid, config: UniverseConfig) -> Self {
        let mut universe = Self::with_config(config.size(grid.width(), grid.height()));
        universe.grid = grid;
        universe
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    #[inline]
    pub fn is_toroidal(&self) -> bool {
        self.topology.is_toroidal()
    }

    pub fn set_topology(&mut self, topology: Topology) {
        if topology != self.topology {
            debug!("topology {:?} -> {:?}", self.topology, topology);
            self.topology = topology;
        }
    }

    pub fn set_toroidal(&mut self, toroidal: bool) {
        self.set_topology(Topology::from(toroidal));
    }

    /// Flip between bounded and toroidal, returning the new topology.
    pub fn toggle_topology(&mut self) -> Topology {
        self.set_topology(self.topology.toggled());
        self.topology
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Force parallel stepping on or off; this sticks across resizes.
    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
        self.parallel_override = Some(enabled);
    }

    // Coordinates outside the grid are not errors: reads report a dead
    // default cell and writes are dropped.

    #[inline]
    pub fn cell(&self, x: i64, y: i64) -> Option<Cell> {
        self.grid.get(x, y)
    }

    #[inline]
    pub fn get_cell_state(&self, x: i64, y: i64) -> bool {
        self.grid.get(x, y).is_some_and(|cell| cell.alive)
    }

    #[inline]
    pub fn get_cell_color(&self, x: i64, y: i64) -> Rgb {
        self.grid
            .get(x, y)
            .map_or(DEFAULT_CELL_COLOR, |cell| cell.color)
    }

    /// Set the alive flag, keeping the cell's color. Flipping the flag
    /// restarts the survival counter.
    pub fn set_cell_alive(&mut self, x: i64, y: i64, alive: bool) {
        if let Some(cell) = self.grid.get_mut(x, y) {
            set_alive(cell, alive);
        }
    }

    pub fn set_cell_alive_with_color(&mut self, x: i64, y: i64, alive: bool, color: Rgb) {
        if let Some(cell) = self.grid.get_mut(x, y) {
            set_alive(cell, alive);
            cell.color = color;
        }
    }

    pub fn set_cell_color(&mut self, x: i64, y: i64, color: Rgb) {
        if let Some(cell) = self.grid.get_mut(x, y) {
            cell.color = color;
        }
    }

    /// Overwrite a whole cell. A survival counter above
    /// [`MAX_GENERATIONS_ALIVE`](super::MAX_GENERATIONS_ALIVE) is stored as that maximum.
    pub fn set_cell(&mut self, x: i64, y: i64, cell: Cell) {
        if let Some(slot) = self.grid.get_mut(x, y) {
            *slot = cell.clamped();
        }
    }

    /// Live neighbors of `(x, y)` under the active topology; 0 off-grid.
    pub fn count_neighbors(&self, x: i64, y: i64) -> u8 {
        match self.in_grid(x, y) {
            Some((x, y)) => rules::count_live_neighbors(&self.grid, self.topology, x, y),
            None => 0,
        }
    }

    /// Color a birth at `(x, y)` would take; the default color off-grid or
    /// with no live neighbor.
    pub fn determine_birth_color(&self, x: i64, y: i64) -> Rgb {
        match self.in_grid(x, y) {
            Some((x, y)) => rules::birth_color(&self.grid, self.topology, x, y),
            None => DEFAULT_CELL_COLOR,
        }
    }

    #[inline]
    fn in_grid(&self, x: i64, y: i64) -> Option<(usize, usize)> {
        self.grid
            .index_of(x, y)
            .map(|_| (x as usize, y as usize))
    }

    /// Advance one generation.
    pub fn step(&mut self) {
        debug_assert_eq!(self.grid.dimensions(), self.scratch.dimensions());
        let height = self.grid.height();
        let current = &self.grid;
        let topology = self.topology;

        if self.parallel {
            self.scratch
                .cells_mut()
                .par_chunks_mut(height)
                .enumerate()
                .for_each(|(x, column)| rules::advance_column(current, topology, x, column));
        } else {
            for (x, column) in self.scratch.cells_mut().chunks_mut(height).enumerate() {
                rules::advance_column(current, topology, x, column);
            }
        }

        std::mem::swap(&mut self.grid, &mut self.scratch);
        self.generation += 1;
    }

    pub fn step_n(&mut self, generations: u64) {
        for _ in 0..generations {
            self.step();
        }
    }

    /// Grow or shrink both grids; see [`Grid::resize`].
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        if (new_width.max(1), new_height.max(1)) == self.grid.dimensions() {
            return;
        }
        debug!(
            "resize {}x{} -> {new_width}x{new_height}",
            self.width(),
            self.height()
        );
        self.grid.resize(new_width, new_height);
        self.scratch.resize(new_width, new_height);
        debug_assert_eq!(self.grid.dimensions(), self.scratch.dimensions());
        self.parallel = resolve_parallel(self.parallel_override, self.width(), self.height());
    }

    /// Every cell dead with `color`. Resets the generation counter.
    pub fn clear_all(&mut self, color: Rgb) {
        self.grid.fill(Cell::dead_with_color(color));
        self.generation = 0;
    }

    /// Every cell back to the default dead cell.
    pub fn clear(&mut self) {
        self.clear_all(DEFAULT_CELL_COLOR);
    }

    /// Randomize with the universe's own seeded RNG and configured density.
    pub fn initialize_random_universe(&mut self) {
        debug!(
            "randomize {}x{} density={}",
            self.width(),
            self.height(),
            self.density
        );
        randomize_cells(self.grid.cells_mut(), self.density, &mut self.rng);
        self.generation = 0;
    }

    /// Like [`Universe::initialize_random_universe`] but drawing from a
    /// caller-supplied RNG.
    pub fn randomize_with<R: Rng>(&mut self, rng: &mut R) {
        randomize_cells(self.grid.cells_mut(), self.density, rng);
        self.generation = 0;
    }

    #[inline]
    pub fn density(&self) -> f64 {
        self.density
    }

    pub fn population(&self) -> usize {
        self.grid.cells().iter().filter(|cell| cell.alive).count()
    }

    pub fn dead_count(&self) -> usize {
        self.grid.len() - self.population()
    }

    pub fn is_empty(&self) -> bool {
        !self.grid.cells().iter().any(|cell| cell.alive)
    }

    pub fn for_each_live<F>(&self, mut f: F)
    where
        F: FnMut(usize, usize, Cell),
    {
        for (x, y, cell) in self.grid.iter() {
            if cell.alive {
                f(x, y, cell);
            }
        }
    }

    /// Write the pattern's bounding box with its top-left at `(x, y)`.
    /// Every box cell takes `color`; parts outside the grid are clipped.
    pub fn stamp_pattern(&mut self, pattern: &Pattern, x: i64, y: i64, color: Rgb) {
        for (dx, dy, alive) in pattern.cells() {
            let (Some(cx), Some(cy)) = (x.checked_add(dx as i64), y.checked_add(dy as i64))
            else {
                continue;
            };
            self.set_cell_alive_with_color(cx, cy, alive, color);
        }
    }

    /// Stamp at a uniformly chosen origin where the pattern fits, or at the
    /// origin when it cannot fit. Returns the origin used.
    pub fn stamp_pattern_randomly<R: Rng>(
        &mut self,
        pattern: &Pattern,
        color: Rgb,
        rng: &mut R,
    ) -> (i64, i64) {
        let max_x = self.width().saturating_sub(pattern.width());
        let max_y = self.height().saturating_sub(pattern.height());
        let x = rng.random_range(0..=max_x) as i64;
        let y = rng.random_range(0..=max_y) as i64;
        self.stamp_pattern(pattern, x, y, color);
        (x, y)
    }
}

#[inline]
fn set_alive(cell: &mut Cell, alive: bool) {
    if cell.alive != alive {
        cell.alive = alive;
        cell.generations_alive = 0;
    }
}

/// Each cell becomes alive with probability `density` and takes a uniformly
/// random color. Survival counters restart at zero.
fn randomize_cells<R: Rng>(cells: &mut [Cell], density: f64, rng: &mut R) {
    for cell in cells {
        let alive = rng.random_bool(density);
        let color = Rgb::new(rng.random(), rng.random(), rng.random());
        *cell = Cell {
            alive,
            generations_alive: 0,
            color,
        };
    }
}

fn resolve_parallel(forced: Option<bool>, width: usize, height: usize) -> bool {
    if let Some(enabled) = forced {
        return enabled;
    }
    std::env::var("COLORLIFE_PARALLEL")
        .ok()
        .and_then(|v| {
            let v = v.trim();
            if v == "1" || v.eq_ignore_ascii_case("true") {
                Some(true)
            } else if v == "0" || v.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                None
            }
        })
        .unwrap_or_else(|| width.saturating_mul(height) >= PARALLEL_MIN_CELLS)
}

#[inline]
fn sanitize_density(density: f64) -> f64 {
    if density.is_nan() {
        DEFAULT_DENSITY
    } else {
        density.clamp(0.0, 1.0)
    }
}
