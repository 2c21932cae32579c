//! Flat column-major cell storage.
//!
//! Cells live in one `Vec<Cell>` indexed by `x * height + y`, the same order
//! the save format walks them in. A column is a contiguous slice of `height`
//! cells, which is the unit the parallel step hands to each worker.

use super::cell::Cell;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid of default cells. Zero dimensions are raised to 1.
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            cells: vec![Cell::default(); width * height],
        }
    }

    /// Wrap already column-major cells.
    pub(crate) fn from_cells(width: usize, height: usize, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), width * height, "cell count does not match {width}x{height}");
        assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Storage index for signed coordinates, `None` outside the grid.
    #[inline]
    pub fn index_of(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (x < self.width && y < self.height).then(|| x * self.height + y)
    }

    /// Cell at an in-range index. Callers resolve coordinates first.
    #[inline(always)]
    pub fn at(&self, idx: usize) -> Cell {
        self.cells[idx]
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Option<Cell> {
        self.index_of(x, y).map(|idx| self.cells[idx])
    }

    #[inline]
    pub fn get_mut(&mut self, x: i64, y: i64) -> Option<&mut Cell> {
        self.index_of(x, y).map(move |idx| &mut self.cells[idx])
    }

    pub fn fill(&mut self, cell: Cell) {
        self.cells.fill(cell);
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [Cell] {
        &mut self.cells
    }

    /// Column `x` as a contiguous slice.
    #[inline]
    pub fn column(&self, x: usize) -> &[Cell] {
        let start = x * self.height;
        &self.cells[start..start + self.height]
    }

    /// Visit every cell with its coordinates, x outer and y inner.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let height = self.height;
        self.cells
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| (idx / height, idx % height, cell))
    }

    /// Change dimensions, keeping every cell inside both the old and the new
    /// shape. Newly exposed cells are default. Same dimensions is a no-op.
    pub fn resize(&mut self, new_width: usize, new_height: usize) {
        let new_width = new_width.max(1);
        let new_height = new_height.max(1);
        if (new_width, new_height) == (self.width, self.height) {
            return;
        }

        if new_height == self.height {
            // Columns are contiguous, so only the tail moves.
            self.cells.resize(new_width * new_height, Cell::default());
        } else {
            let mut cells = vec![Cell::default(); new_width * new_height];
            let keep_w = self.width.min(new_width);
            let keep_h = self.height.min(new_height);
            for x in 0..keep_w {
                let dst = x * new_height;
                cells[dst..dst + keep_h].copy_from_slice(&self.column(x)[..keep_h]);
            }
            self.cells = cells;
        }

        self.width = new_width;
        self.height = new_height;
    }
}
