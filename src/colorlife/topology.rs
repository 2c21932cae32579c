//! Neighbor resolution for bounded and toroidal grids.

/// Neighbor offsets in scan order: dx outer, dy inner.
///
/// The birth-color tie-break depends on this order.
pub const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Topology {
    /// Neighbors past an edge do not exist.
    #[default]
    Bounded,
    /// Edges wrap: column `width - 1` borders column 0, likewise for rows.
    Toroidal,
}

impl Topology {
    #[inline]
    pub fn is_toroidal(self) -> bool {
        self == Topology::Toroidal
    }

    #[inline]
    pub fn toggled(self) -> Self {
        match self {
            Topology::Bounded => Topology::Toroidal,
            Topology::Toroidal => Topology::Bounded,
        }
    }

    /// Resolve the neighbor of in-grid `(x, y)` at offset `(dx, dy)`.
    #[inline(always)]
    pub fn resolve(
        self,
        x: usize,
        y: usize,
        (dx, dy): (i8, i8),
        width: usize,
        height: usize,
    ) -> Option<(usize, usize)> {
        debug_assert!(x < width && y < height);
        match self {
            Topology::Toroidal => Some((wrap(x, dx, width), wrap(y, dy, height))),
            Topology::Bounded => {
                let nx = x.checked_add_signed(dx as isize)?;
                let ny = y.checked_add_signed(dy as isize)?;
                (nx < width && ny < height).then_some((nx, ny))
            }
        }
    }

    /// All existing neighbors of `(x, y)` in [`NEIGHBOR_OFFSETS`] order.
    #[inline]
    pub fn neighbors(
        self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |offset| self.resolve(x, y, offset, width, height))
    }
}

impl From<bool> for Topology {
    fn from(toroidal: bool) -> Self {
        if toroidal {
            Topology::Toroidal
        } else {
            Topology::Bounded
        }
    }
}

#[inline(always)]
fn wrap(v: usize, d: i8, len: usize) -> usize {
    // (v + d + len) mod len with v < len and |d| <= 1.
    (v + len).wrapping_add_signed(d as isize) % len
}
