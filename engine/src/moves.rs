use crate::bag::Piece;
use crate::board::Board;
use crate::settings::BOARD_SIZE;
use crate::shapes::Shape;
use crate::types::Anchor;

/// True iff `shape` fits somewhere on `board`. Exhaustive scan over
/// all 64 anchors; the board is tiny, so brute force beats any
/// incremental bookkeeping here.
pub fn shape_has_any_move(board: &Board, shape: &Shape) -> bool {
    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            if board.can_place(shape, Anchor::new(row, col)) {
                return true;
            }
        }
    }
    false
}

/// True iff at least one piece has at least one legal placement.
pub fn has_any_move(board: &Board, pieces: &[Piece]) -> bool {
    pieces
        .iter()
        .any(|piece| shape_has_any_move(board, piece.shape))
}
