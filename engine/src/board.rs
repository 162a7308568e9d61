use crate::settings::BOARD_SIZE;
use crate::shapes::Shape;
use crate::types::{Anchor, Color};

/// A cell that was part of a cleared line, with its pre-clear color so
/// renderers can flash it. A cell at the intersection of a cleared row
/// and a cleared column appears once per line it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedCell {
    pub row: usize,
    pub col: usize,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    pub cleared_lines: u32,
    pub cleared_cells: Vec<ClearedCell>,
}

/// The 8×8 grid. Dimensions are fixed for the lifetime of a round; the
/// only mutators are `place` and `clear_lines`, and only the round
/// controller calls them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<Color>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Color> {
        if row >= BOARD_SIZE || col >= BOARD_SIZE {
            return None;
        }
        self.cells[row][col]
    }

    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| cell.is_some())
            .count()
    }

    pub fn fill_ratio(&self) -> f32 {
        self.occupied_count() as f32 / (BOARD_SIZE * BOARD_SIZE) as f32
    }

    /// True iff every cell of `shape` anchored at `anchor` is in bounds
    /// and empty. Pure; the single validity gate for every placement.
    pub fn can_place(&self, shape: &Shape, anchor: Anchor) -> bool {
        shape.cells.iter().all(|&(dr, dc)| {
            let row = anchor.row + dr;
            let col = anchor.col + dc;
            (0..BOARD_SIZE as i32).contains(&row)
                && (0..BOARD_SIZE as i32).contains(&col)
                && self.cells[row as usize][col as usize].is_none()
        })
    }

    /// Writes every shape cell. Caller contract: `can_place` must have
    /// returned true for the same arguments; this does not re-validate.
    pub fn place(&mut self, shape: &Shape, anchor: Anchor, color: Color) {
        for &(dr, dc) in shape.cells {
            let row = (anchor.row + dr) as usize;
            let col = (anchor.col + dc) as usize;
            self.cells[row][col] = Some(color);
        }
    }

    /// Clears every full row and every full column. Detection is a
    /// single pass over the current snapshot: lines are collected
    /// first, then zeroed, so a clear never cascades into further
    /// detections within the same call.
    pub fn clear_lines(&mut self) -> ClearOutcome {
        let full_rows: Vec<usize> = (0..BOARD_SIZE)
            .filter(|&row| self.cells[row].iter().all(|cell| cell.is_some()))
            .collect();
        let full_cols: Vec<usize> = (0..BOARD_SIZE)
            .filter(|&col| (0..BOARD_SIZE).all(|row| self.cells[row][col].is_some()))
            .collect();

        let mut cleared_cells = Vec::new();
        for &row in &full_rows {
            for col in 0..BOARD_SIZE {
                if let Some(color) = self.cells[row][col] {
                    cleared_cells.push(ClearedCell { row, col, color });
                }
            }
        }
        for &col in &full_cols {
            for row in 0..BOARD_SIZE {
                if let Some(color) = self.cells[row][col] {
                    cleared_cells.push(ClearedCell { row, col, color });
                }
            }
        }

        for &row in &full_rows {
            self.cells[row] = [None; BOARD_SIZE];
        }
        for &col in &full_cols {
            for row in 0..BOARD_SIZE {
                self.cells[row][col] = None;
            }
        }

        ClearOutcome {
            cleared_lines: (full_rows.len() + full_cols.len()) as u32,
            cleared_cells,
        }
    }

    #[cfg(test)]
    pub fn from_occupancy(rows: &[[u8; BOARD_SIZE]; BOARD_SIZE]) -> Self {
        let mut board = Self::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, &filled) in row.iter().enumerate() {
                if filled != 0 {
                    board.cells[r][c] = Some(Color::new(0));
                }
            }
        }
        board
    }

    #[cfg(test)]
    pub fn set_cell(&mut self, row: usize, col: usize, color: Option<Color>) {
        self.cells[row][col] = color;
    }
}
