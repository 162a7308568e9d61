use crate::board::Board;
use crate::shapes::Shape;
use crate::types::Anchor;

/// Continuous pointer coordinates in the host's pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPos {
    pub x: f32,
    pub y: f32,
}

impl PointerPos {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Where the board lives in pixel space. Any UI toolkit that can
/// report pointer coordinates and a cell size can drive the drag model
/// through this.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardGeometry {
    pub origin_x: f32,
    pub origin_y: f32,
    pub cell_size: f32,
}

impl BoardGeometry {
    pub fn new(origin_x: f32, origin_y: f32, cell_size: f32) -> Self {
        Self {
            origin_x,
            origin_y,
            cell_size,
        }
    }

    /// The anchor a pointer implies for `shape`: board-relative offset
    /// divided by cell size, shifted by half the bounding box so the
    /// piece sits centered under the pointer, rounded to the nearest
    /// cell. May land out of range; validity is the board's call.
    pub fn target_anchor(&self, shape: &Shape, pos: PointerPos) -> Anchor {
        let col = (pos.x - self.origin_x) / self.cell_size - shape.width() as f32 / 2.0;
        let row = (pos.y - self.origin_y) / self.cell_size - shape.height() as f32 / 2.0;
        Anchor::new(row.round() as i32, col.round() as i32)
    }
}

/// Nearest valid anchor to `target` within a `radius`-cell box, scored
/// by Manhattan distance; ties go to the first candidate in row-major
/// scan order. `None` when nothing in range fits.
pub fn find_nearest_valid(
    board: &Board,
    shape: &Shape,
    target: Anchor,
    radius: i32,
) -> Option<Anchor> {
    if board.can_place(shape, target) {
        return Some(target);
    }

    let mut best: Option<Anchor> = None;
    let mut best_dist = i32::MAX;
    for dr in -radius..=radius {
        for dc in -radius..=radius {
            let candidate = Anchor::new(target.row + dr, target.col + dc);
            if !board.can_place(shape, candidate) {
                continue;
            }
            let dist = dr.abs() + dc.abs();
            if dist < best_dist {
                best_dist = dist;
                best = Some(candidate);
            }
        }
    }
    best
}

/// Outcome of a finished gesture: which piece was held and, if the
/// last hover resolved to a valid anchor, where to drop it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragDrop {
    pub piece_id: u32,
    pub target: Option<Anchor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DragState {
    Idle,
    Dragging { piece_id: u32 },
}

/// Per-gesture state machine: Idle → Dragging → (Placed | Cancelled).
/// At most one gesture is active at a time; `begin` rejects a second.
#[derive(Debug)]
pub struct DragModel {
    geometry: BoardGeometry,
    snap_radius: i32,
    state: DragState,
    hover: Option<Anchor>,
}

impl DragModel {
    pub fn new(geometry: BoardGeometry, snap_radius: i32) -> Self {
        Self {
            geometry,
            snap_radius,
            state: DragState::Idle,
            hover: None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn held_piece(&self) -> Option<u32> {
        match self.state {
            DragState::Dragging { piece_id } => Some(piece_id),
            DragState::Idle => None,
        }
    }

    /// Current snap target, valid at the time of the last `update`.
    pub fn hover(&self) -> Option<Anchor> {
        self.hover
    }

    pub fn set_geometry(&mut self, geometry: BoardGeometry) {
        self.geometry = geometry;
    }

    /// Starts a gesture. False when one is already active.
    pub fn begin(&mut self, piece_id: u32) -> bool {
        if self.is_dragging() {
            return false;
        }
        self.state = DragState::Dragging { piece_id };
        self.hover = None;
        true
    }

    /// Pointer-move: recompute the snap target for the held piece.
    pub fn update(&mut self, board: &Board, shape: &Shape, pos: PointerPos) -> Option<Anchor> {
        if !self.is_dragging() {
            return None;
        }
        let target = self.geometry.target_anchor(shape, pos);
        self.hover = find_nearest_valid(board, shape, target, self.snap_radius);
        self.hover
    }

    /// Pointer-up: ends the gesture. `target: None` means cancelled.
    pub fn finish(&mut self) -> Option<DragDrop> {
        let piece_id = self.held_piece()?;
        let target = self.hover.take();
        self.state = DragState::Idle;
        Some(DragDrop { piece_id, target })
    }

    pub fn reset(&mut self) {
        self.state = DragState::Idle;
        self.hover = None;
    }
}
