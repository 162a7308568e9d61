use crate::board::Board;
use crate::moves::shape_has_any_move;
use crate::session_rng::SessionRng;
use crate::settings::{
    BAG_SIZE, HIGH_FILL_THRESHOLD, HIGH_FILL_WEIGHTS, LOW_FILL_WEIGHTS, MEDIUM_FILL_THRESHOLD,
    MEDIUM_FILL_WEIGHTS, PALETTE,
};
use crate::shapes::{CATALOG, Difficulty, Shape};
use crate::types::Color;

/// Runtime instance of a shape: unique id, catalog reference, display
/// color. Created when a bag is drawn, removed from the bag on
/// placement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Piece {
    pub id: u32,
    pub shape: &'static Shape,
    pub color: Color,
}

/// Difficulty weights (easy, medium, hard) as a step function of how
/// full the board is. Hard shapes drop out entirely near a full board.
pub fn weights_for_fill(fill_ratio: f32) -> [u32; 3] {
    if fill_ratio >= HIGH_FILL_THRESHOLD {
        HIGH_FILL_WEIGHTS
    } else if fill_ratio >= MEDIUM_FILL_THRESHOLD {
        MEDIUM_FILL_WEIGHTS
    } else {
        LOW_FILL_WEIGHTS
    }
}

fn weight_of(difficulty: Difficulty, weights: [u32; 3]) -> u32 {
    match difficulty {
        Difficulty::Easy => weights[0],
        Difficulty::Medium => weights[1],
        Difficulty::Hard => weights[2],
    }
}

/// Each shape repeated per its difficulty weight. `floor` of 1 keeps
/// every shape represented (the guaranteed draw must be able to reach
/// any still-placeable shape); `floor` of 0 lets a zero weight truly
/// exclude a class.
fn weighted_pool(shapes: &[&'static Shape], weights: [u32; 3], floor: u32) -> Vec<&'static Shape> {
    let mut pool = Vec::new();
    for &shape in shapes {
        let repetitions = weight_of(shape.difficulty, weights).max(floor);
        for _ in 0..repetitions {
            pool.push(shape);
        }
    }
    pool
}

/// Draws bags of exactly 3 pieces. Owns the piece id counter so ids
/// stay unique across rounds.
pub struct BagGenerator {
    next_piece_id: u32,
}

impl Default for BagGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl BagGenerator {
    pub fn new() -> Self {
        Self { next_piece_id: 1 }
    }

    /// Contract: if any catalog shape fits anywhere on `board`, at
    /// least one returned piece fits at draw time. An empty result
    /// means nothing in the catalog is placeable at all.
    pub fn draw(&mut self, board: &Board, rng: &mut SessionRng) -> Vec<Piece> {
        let weights = weights_for_fill(board.fill_ratio());

        let available: Vec<&'static Shape> = CATALOG
            .iter()
            .filter(|shape| shape_has_any_move(board, shape))
            .collect();
        if available.is_empty() {
            return Vec::new();
        }

        // Piece #1: the guaranteed-placeable shape, drawn uniformly
        // from the weighted pool of currently placeable shapes.
        let guaranteed_pool = weighted_pool(&available, weights, 1);
        let Some(&guaranteed) = rng.pick(&guaranteed_pool) else {
            return Vec::new();
        };
        let mut chosen: Vec<&'static Shape> = vec![guaranteed];

        // The other two come from the whole catalog, placeable or not:
        // unplaceable pieces raise difficulty honestly instead of only
        // ever offering easy guaranteed triples.
        let all: Vec<&'static Shape> = CATALOG.iter().collect();
        let mut full_pool = weighted_pool(&all, weights, 0);
        rng.shuffle(&mut full_pool);
        for shape in full_pool {
            if chosen.len() == BAG_SIZE {
                break;
            }
            if chosen.iter().all(|s| s.id != shape.id) {
                chosen.push(shape);
            }
        }

        // Catalog too small for the pool to yield distinct shapes:
        // scan it raw for any unused id.
        if chosen.len() < BAG_SIZE {
            for shape in CATALOG {
                if chosen.len() == BAG_SIZE {
                    break;
                }
                if chosen.iter().all(|s| s.id != shape.id) {
                    chosen.push(shape);
                }
            }
        }

        // Degenerate catalog (< 3 distinct shapes): duplicates are the
        // documented best-effort fallback.
        while chosen.len() < BAG_SIZE {
            match rng.pick(&all) {
                Some(&shape) => chosen.push(shape),
                None => break,
            }
        }

        chosen
            .into_iter()
            .map(|shape| {
                let id = self.next_piece_id;
                self.next_piece_id += 1;
                let color = Color::new(rng.random_range(0..PALETTE.len()) as u8);
                Piece { id, shape, color }
            })
            .collect()
    }
}
