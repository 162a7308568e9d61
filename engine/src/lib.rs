pub mod bag;
pub mod board;
pub mod drag;
pub mod logger;
pub mod moves;
pub mod round;
pub mod session_rng;
pub mod settings;
pub mod shapes;
pub mod types;

pub use bag::{BagGenerator, Piece};
pub use board::{Board, ClearOutcome, ClearedCell};
pub use drag::{BoardGeometry, DragDrop, DragModel, PointerPos, find_nearest_valid};
pub use moves::{has_any_move, shape_has_any_move};
pub use round::{ClearFlash, GameEvent, GameRound, RoundStatus};
pub use session_rng::SessionRng;
pub use settings::{BOARD_SIZE, GameSettings, ScoreRule};
pub use shapes::{CATALOG, Difficulty, Shape, shape_by_id};
pub use types::{Anchor, Color};
