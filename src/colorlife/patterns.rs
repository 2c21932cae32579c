//! Built-in patterns in plaintext notation (`O` alive, `.` dead).

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pattern {
    pub name: &'static str,
    /// One string per row, top row first.
    pub rows: &'static [&'static str],
}

pub const GLIDER: Pattern = Pattern {
    name: "Glider",
    rows: &[".O.", "..O", "OOO"],
};

pub const LIGHTWEIGHT_SPACESHIP: Pattern = Pattern {
    name: "Lightweight spaceship",
    rows: &[".OOOO", "O...O", "....O", "O..O."],
};

pub const PULSAR: Pattern = Pattern {
    name: "Pulsar",
    rows: &[
        "..OOO...OOO..",
        ".............",
        "O....O.O....O",
        "O....O.O....O",
        "O....O.O....O",
        "..OOO...OOO..",
        ".............",
        "..OOO...OOO..",
        "O....O.O....O",
        "O....O.O....O",
        "O....O.O....O",
        ".............",
        "..OOO...OOO..",
    ],
};

pub const BUILTIN_PATTERNS: &[Pattern] = &[GLIDER, LIGHTWEIGHT_SPACESHIP, PULSAR];

impl Pattern {
    /// Case-insensitive lookup. Accepts the full name or its short aliases
    /// `lwss`/`spaceship`.
    pub fn by_name(name: &str) -> Option<Pattern> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("lwss") || name.eq_ignore_ascii_case("spaceship") {
            return Some(LIGHTWEIGHT_SPACESHIP);
        }
        BUILTIN_PATTERNS
            .iter()
            .copied()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows.iter().map(|row| row.len()).max().unwrap_or(0)
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Every cell of the bounding box as `(dx, dy, alive)`. Short rows are
    /// padded with dead cells.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, bool)> + '_ {
        let width = self.width();
        self.rows.iter().enumerate().flat_map(move |(dy, row)| {
            let bytes = row.as_bytes();
            (0..width).map(move |dx| (dx, dy, bytes.get(dx) == Some(&b'O')))
        })
    }

    pub fn population(&self) -> usize {
        self.cells().filter(|&(_, _, alive)| alive).count()
    }
}
