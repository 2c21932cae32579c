//! Cell record and RGB color value.

/// 24-bit color, one byte per channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    #[inline]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.red, self.green, self.blue]
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Color of a default cell and the fallback for out-of-range color queries.
pub const DEFAULT_CELL_COLOR: Rgb = Rgb::BLACK;

/// Largest survival count that still fits the persisted `i32` field.
pub const MAX_GENERATIONS_ALIVE: u32 = i32::MAX as u32;

/// One grid cell. Handed out by value; the grids are never borrowed out.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Cell {
    pub alive: bool,
    /// Consecutive generations survived since birth.
    pub generations_alive: u32,
    pub color: Rgb,
}

impl Default for Cell {
    fn default() -> Self {
        Self::DEAD
    }
}

impl Cell {
    pub const DEAD: Cell = Cell {
        alive: false,
        generations_alive: 0,
        color: DEFAULT_CELL_COLOR,
    };

    #[inline]
    pub const fn alive_with_color(color: Rgb) -> Self {
        Self {
            alive: true,
            generations_alive: 0,
            color,
        }
    }

    #[inline]
    pub const fn dead_with_color(color: Rgb) -> Self {
        Self {
            alive: false,
            generations_alive: 0,
            color,
        }
    }

    /// Clamp the survival counter into the range the save format can hold.
    #[inline]
    pub const fn clamped(self) -> Self {
        let generations_alive = if self.generations_alive > MAX_GENERATIONS_ALIVE {
            MAX_GENERATIONS_ALIVE
        } else {
            self.generations_alive
        };
        Self {
            generations_alive,
            ..self
        }
    }

    /// The cell one generation later, given its live neighbor count and the
    /// color a birth would take.
    #[inline]
    pub(crate) fn next(self, neighbors: u8, birth_color: impl FnOnce() -> Rgb) -> Self {
        match (self.alive, neighbors) {
            (true, 2 | 3) => Self {
                generations_alive: self
                    .generations_alive
                    .saturating_add(1)
                    .min(MAX_GENERATIONS_ALIVE),
                ..self
            },
            (true, _) => Self::dead_with_color(self.color),
            (false, 3) => Self::alive_with_color(birth_color()),
            (false, _) => self,
        }
    }
}
