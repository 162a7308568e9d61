use crate::settings::PALETTE;

/// Board position a shape's (0,0) offset is mapped to for a placement.
/// Signed so that drag math can produce out-of-range candidates that
/// validity checks then reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub row: i32,
    pub col: i32,
}

impl Anchor {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    pub fn manhattan_distance(&self, other: Anchor) -> i32 {
        (self.row - other.row).abs() + (self.col - other.col).abs()
    }
}

/// Opaque cell tag: an index into the display palette. Game logic only
/// ever tests occupancy; the value exists for renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(u8);

impl Color {
    pub fn new(palette_index: u8) -> Self {
        Self(palette_index % PALETTE.len() as u8)
    }

    pub fn hex(&self) -> &'static str {
        PALETTE[self.0 as usize]
    }

    pub fn palette_index(&self) -> u8 {
        self.0
    }
}
