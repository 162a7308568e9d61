use crate::bag::{BagGenerator, Piece};
use crate::board::{Board, ClearedCell};
use crate::drag::{BoardGeometry, DragModel, PointerPos};
use crate::moves::has_any_move;
use crate::session_rng::SessionRng;
use crate::settings::{CLEAR_FLASH_TICKS, GameSettings};
use crate::types::{Anchor, Color};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    AwaitingBag,
    Active,
    RoundComplete,
    GameOver,
}

/// Outbound notifications. Every controller operation returns the
/// events it produced; the host translates them into whatever callback
/// surface it has (quiz flow, progress store, renderer).
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    BagDrawn {
        piece_count: usize,
    },
    PiecePlaced {
        piece_id: u32,
        anchor: Anchor,
        cleared_lines: u32,
        points: u32,
    },
    LinesCleared {
        cells: Vec<ClearedCell>,
    },
    BestScoreChanged {
        best: u32,
    },
    UnlockReached {
        score: u32,
    },
    /// Bag exhausted with moves still available; the quiz should
    /// present the next question.
    RoundFinished,
    /// Deadlock detected; game over follows after the display delay.
    NoMovesLeft,
    GameOver {
        score: u32,
    },
    RestartRequested,
}

/// Transient visual record of a cleared cell; expires after a fixed
/// number of ticks. Not part of game logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearFlash {
    pub row: usize,
    pub col: usize,
    pub color: Color,
    expires_at: u64,
}

/// Owns all round state: board, bag, score, drag gesture, and the
/// tick-driven delayed game-over transition. One instance per game;
/// no process-wide state.
pub struct GameRound {
    board: Board,
    bag: Vec<Piece>,
    generator: BagGenerator,
    drag: DragModel,
    settings: GameSettings,
    rng: SessionRng,
    score: u32,
    best_score: u32,
    status: RoundStatus,
    unlock_reported: bool,
    tick: u64,
    game_over_at: Option<u64>,
    flashes: Vec<ClearFlash>,
}

impl GameRound {
    pub fn new(
        settings: GameSettings,
        geometry: BoardGeometry,
        initial_best_score: u32,
        rng: SessionRng,
    ) -> Self {
        let snap_radius = settings.snap_radius;
        Self {
            board: Board::new(),
            bag: Vec::new(),
            generator: BagGenerator::new(),
            drag: DragModel::new(geometry, snap_radius),
            settings,
            rng,
            score: 0,
            best_score: initial_best_score,
            status: RoundStatus::AwaitingBag,
            unlock_reported: false,
            tick: 0,
            game_over_at: None,
            flashes: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn bag(&self) -> &[Piece] {
        &self.bag
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.best_score
    }

    pub fn status(&self) -> RoundStatus {
        self.status
    }

    pub fn hover(&self) -> Option<Anchor> {
        self.drag.hover()
    }

    pub fn clear_flashes(&self) -> &[ClearFlash] {
        &self.flashes
    }

    pub fn set_geometry(&mut self, geometry: BoardGeometry) {
        self.drag.set_geometry(geometry);
    }

    /// External round trigger (a correctly answered question). Draws a
    /// bag against the current board; an empty bag or one with no
    /// legal move goes to game over after the display delay.
    pub fn start_round(&mut self) -> Vec<GameEvent> {
        if !matches!(
            self.status,
            RoundStatus::AwaitingBag | RoundStatus::RoundComplete
        ) {
            return Vec::new();
        }

        let bag = self.generator.draw(&self.board, &mut self.rng);
        if bag.is_empty() || !has_any_move(&self.board, &bag) {
            self.bag = bag;
            self.status = RoundStatus::Active;
            self.schedule_game_over();
            return vec![GameEvent::NoMovesLeft];
        }

        let piece_count = bag.len();
        self.bag = bag;
        self.status = RoundStatus::Active;
        vec![GameEvent::BagDrawn { piece_count }]
    }

    /// Advances one tick: expires clear flashes and fires a pending
    /// game-over transition once its deadline is reached. The delay is
    /// presentation pacing only.
    pub fn update(&mut self) -> Vec<GameEvent> {
        self.tick += 1;
        self.flashes.retain(|flash| flash.expires_at > self.tick);

        let mut events = Vec::new();
        if let Some(deadline) = self.game_over_at
            && self.tick >= deadline
        {
            self.game_over_at = None;
            self.status = RoundStatus::GameOver;
            self.drag.reset();
            events.push(GameEvent::GameOver { score: self.score });
        }
        events
    }

    /// Pointer-down on a piece. Ignored unless the round is active,
    /// the piece is in the bag, and no other gesture is running.
    pub fn drag_start(&mut self, piece_id: u32, pos: PointerPos) {
        if self.status != RoundStatus::Active || self.game_over_at.is_some() {
            return;
        }
        if !self.bag.iter().any(|piece| piece.id == piece_id) {
            return;
        }
        if self.drag.begin(piece_id) {
            self.drag_move(pos);
        }
    }

    /// Pointer-move. Returns the current snap target for preview.
    pub fn drag_move(&mut self, pos: PointerPos) -> Option<Anchor> {
        let piece_id = self.drag.held_piece()?;
        let shape = self
            .bag
            .iter()
            .find(|piece| piece.id == piece_id)?
            .shape;
        self.drag.update(&self.board, shape, pos)
    }

    /// Pointer-up. A valid snap target places the piece; anything else
    /// cancels the gesture with no state change.
    pub fn drag_end(&mut self) -> Vec<GameEvent> {
        let Some(drop) = self.drag.finish() else {
            return Vec::new();
        };
        let Some(target) = drop.target else {
            return Vec::new();
        };
        if self.status != RoundStatus::Active {
            return Vec::new();
        }
        let Some(index) = self.bag.iter().position(|piece| piece.id == drop.piece_id) else {
            return Vec::new();
        };
        self.commit_placement(index, target)
    }

    /// Clears everything except the best score and returns to
    /// AwaitingBag. Cancels a pending game-over deadline so a stale
    /// delayed transition can never fire into the new game.
    pub fn restart(&mut self) -> Vec<GameEvent> {
        self.board = Board::new();
        self.bag.clear();
        self.score = 0;
        self.status = RoundStatus::AwaitingBag;
        self.unlock_reported = false;
        self.game_over_at = None;
        self.flashes.clear();
        self.drag.reset();
        vec![GameEvent::RestartRequested]
    }

    fn commit_placement(&mut self, index: usize, anchor: Anchor) -> Vec<GameEvent> {
        if !self.board.can_place(self.bag[index].shape, anchor) {
            return Vec::new();
        }
        let piece = self.bag.remove(index);
        self.board.place(piece.shape, anchor, piece.color);
        let outcome = self.board.clear_lines();

        let points = self
            .settings
            .score
            .points(piece.shape.cell_count(), outcome.cleared_lines);
        self.score += points;

        let mut events = vec![GameEvent::PiecePlaced {
            piece_id: piece.id,
            anchor,
            cleared_lines: outcome.cleared_lines,
            points,
        }];

        if !outcome.cleared_cells.is_empty() {
            let expires_at = self.tick + CLEAR_FLASH_TICKS;
            for cell in &outcome.cleared_cells {
                self.flashes.push(ClearFlash {
                    row: cell.row,
                    col: cell.col,
                    color: cell.color,
                    expires_at,
                });
            }
            events.push(GameEvent::LinesCleared {
                cells: outcome.cleared_cells,
            });
        }

        if self.score > self.best_score {
            self.best_score = self.score;
            events.push(GameEvent::BestScoreChanged {
                best: self.best_score,
            });
        }

        if !self.unlock_reported && self.score >= self.settings.unlock_score {
            self.unlock_reported = true;
            events.push(GameEvent::UnlockReached { score: self.score });
        }

        if self.bag.is_empty() {
            self.status = RoundStatus::RoundComplete;
            events.push(GameEvent::RoundFinished);
        } else if !has_any_move(&self.board, &self.bag) {
            self.schedule_game_over();
            events.push(GameEvent::NoMovesLeft);
        }

        events
    }

    fn schedule_game_over(&mut self) {
        if self.game_over_at.is_none() {
            self.game_over_at = Some(self.tick + self.settings.game_over_delay_ticks);
        }
    }

    #[cfg(test)]
    pub fn set_board(&mut self, board: Board) {
        self.board = board;
    }

    #[cfg(test)]
    pub fn set_bag(&mut self, bag: Vec<Piece>) {
        self.bag = bag;
        self.status = RoundStatus::Active;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BOARD_SIZE;
    use crate::shapes::{Shape, shape_by_id};

    const CELL: f32 = 48.0;

    fn make_round(seed: u64) -> GameRound {
        GameRound::new(
            GameSettings::default(),
            BoardGeometry::new(0.0, 0.0, CELL),
            0,
            SessionRng::new(seed),
        )
    }

    fn piece(id: u32, shape_id: &str) -> Piece {
        Piece {
            id,
            shape: shape_by_id(shape_id).unwrap(),
            color: Color::new(1),
        }
    }

    /// Pointer position a player would use to drop `shape` at `anchor`:
    /// the center of its bounding box.
    fn pointer_for(shape: &Shape, anchor: Anchor) -> PointerPos {
        PointerPos::new(
            (anchor.col as f32 + shape.width() as f32 / 2.0) * CELL,
            (anchor.row as f32 + shape.height() as f32 / 2.0) * CELL,
        )
    }

    fn drag_place(round: &mut GameRound, piece_id: u32, anchor: Anchor) -> Vec<GameEvent> {
        let shape = round
            .bag()
            .iter()
            .find(|p| p.id == piece_id)
            .expect("piece in bag")
            .shape;
        round.drag_start(piece_id, pointer_for(shape, anchor));
        round.drag_end()
    }

    fn first_valid_anchor(round: &GameRound, shape: &Shape) -> Option<Anchor> {
        for row in 0..BOARD_SIZE as i32 {
            for col in 0..BOARD_SIZE as i32 {
                let anchor = Anchor::new(row, col);
                if round.board().can_place(shape, anchor) {
                    return Some(anchor);
                }
            }
        }
        None
    }

    fn full_board_except(gaps: &[(usize, usize)]) -> Board {
        let mut board = Board::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                if !gaps.contains(&(row, col)) {
                    board.set_cell(row, col, Some(Color::new(0)));
                }
            }
        }
        board
    }

    #[test]
    fn test_start_round_draws_full_bag() {
        let mut round = make_round(1);
        assert_eq!(round.status(), RoundStatus::AwaitingBag);
        let events = round.start_round();
        assert_eq!(events, vec![GameEvent::BagDrawn { piece_count: 3 }]);
        assert_eq!(round.status(), RoundStatus::Active);
        assert_eq!(round.bag().len(), 3);
    }

    #[test]
    fn test_start_round_ignored_while_active() {
        let mut round = make_round(1);
        round.start_round();
        let bag_ids: Vec<u32> = round.bag().iter().map(|p| p.id).collect();
        assert!(round.start_round().is_empty());
        let same_ids: Vec<u32> = round.bag().iter().map(|p| p.id).collect();
        assert_eq!(bag_ids, same_ids);
    }

    // Scenario C: all three pieces placed; RoundFinished fires exactly
    // once, after the third placement.
    #[test]
    fn test_round_finished_after_third_placement() {
        let mut round = make_round(42);
        round.start_round();

        let mut finished_count = 0;
        for turn in 0..3 {
            let piece = round.bag()[0];
            let anchor = first_valid_anchor(&round, piece.shape)
                .expect("empty enough board always has a move");
            let events = drag_place(&mut round, piece.id, anchor);
            assert!(
                events
                    .iter()
                    .any(|e| matches!(e, GameEvent::PiecePlaced { .. }))
            );
            finished_count += events
                .iter()
                .filter(|e| matches!(e, GameEvent::RoundFinished))
                .count();
            if turn < 2 {
                assert_eq!(finished_count, 0, "RoundFinished fired early");
            }
        }
        assert_eq!(finished_count, 1);
        assert_eq!(round.status(), RoundStatus::RoundComplete);
    }

    #[test]
    fn test_placement_updates_score_and_board() {
        let mut round = make_round(3);
        round.set_bag(vec![piece(1, "square2")]);
        let events = drag_place(&mut round, 1, Anchor::new(0, 0));
        // Default rule: 10 per placement, no lines cleared.
        assert!(events.contains(&GameEvent::PiecePlaced {
            piece_id: 1,
            anchor: Anchor::new(0, 0),
            cleared_lines: 0,
            points: 10,
        }));
        assert_eq!(round.score(), 10);
        assert_eq!(round.board().occupied_count(), 4);
    }

    #[test]
    fn test_line_clear_scores_and_flashes() {
        let mut round = make_round(3);
        let mut board = Board::new();
        for col in 0..BOARD_SIZE - 4 {
            board.set_cell(0, col, Some(Color::new(0)));
        }
        round.set_board(board);
        round.set_bag(vec![piece(1, "line4h"), piece(2, "one")]);

        let events = drag_place(&mut round, 1, Anchor::new(0, 4));
        assert!(events.contains(&GameEvent::PiecePlaced {
            piece_id: 1,
            anchor: Anchor::new(0, 4),
            cleared_lines: 1,
            points: 60,
        }));
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::LinesCleared { cells } if cells.len() == BOARD_SIZE))
        );
        assert_eq!(round.score(), 60);
        assert_eq!(round.board().occupied_count(), 0);
        assert_eq!(round.clear_flashes().len(), BOARD_SIZE);

        // Flashes expire after their display ticks.
        for _ in 0..=crate::settings::CLEAR_FLASH_TICKS {
            round.update();
        }
        assert!(round.clear_flashes().is_empty());
    }

    #[test]
    fn test_invalid_drop_is_silent_noop() {
        let mut round = make_round(4);
        round.set_board(full_board_except(&[(7, 7)]));
        round.set_bag(vec![piece(1, "square3")]);

        // No valid anchor anywhere within snap range of the pointer.
        round.drag_start(1, pointer_for(shape_by_id("square3").unwrap(), Anchor::new(2, 2)));
        let events = round.drag_end();
        assert!(events.is_empty());
        assert_eq!(round.bag().len(), 1);
        assert_eq!(round.score(), 0);
    }

    #[test]
    fn test_drag_start_on_unknown_piece_ignored() {
        let mut round = make_round(5);
        round.start_round();
        round.drag_start(999, PointerPos::new(0.0, 0.0));
        assert!(round.drag_end().is_empty());
    }

    #[test]
    fn test_drag_rejected_when_game_over() {
        let mut round = make_round(6);
        round.set_board(full_board_except(&[]));
        round.start_round();
        for _ in 0..GameSettings::default().game_over_delay_ticks {
            round.update();
        }
        assert_eq!(round.status(), RoundStatus::GameOver);
        round.drag_start(1, PointerPos::new(24.0, 24.0));
        assert!(round.drag_end().is_empty());
    }

    // Scenario B: plenty of empty cells remain, but the remaining
    // piece is the 3×3 square and no 3×3 empty region exists.
    #[test]
    fn test_deadlock_with_remaining_piece_triggers_delayed_game_over() {
        let mut round = make_round(7);
        // Pillars in columns 2 and 5, rows 0..=6: no row or column is
        // ever completed, and every 3×3 window hits a pillar.
        let mut board = Board::new();
        for row in 0..=6 {
            for col in [2, 5] {
                board.set_cell(row, col, Some(Color::new(0)));
            }
        }
        round.set_board(board);
        round.set_bag(vec![piece(1, "one"), piece(2, "square3")]);

        let events = drag_place(&mut round, 1, Anchor::new(0, 0));
        assert!(events.contains(&GameEvent::NoMovesLeft));
        // Still Active during the display delay.
        assert_eq!(round.status(), RoundStatus::Active);

        let delay = GameSettings::default().game_over_delay_ticks;
        let mut game_over_seen = false;
        for _ in 0..delay {
            for event in round.update() {
                if let GameEvent::GameOver { score } = event {
                    assert_eq!(score, round.score());
                    game_over_seen = true;
                }
            }
        }
        assert!(game_over_seen);
        assert_eq!(round.status(), RoundStatus::GameOver);
    }

    #[test]
    fn test_unplaceable_bag_at_draw_goes_to_game_over() {
        let mut round = make_round(8);
        round.set_board(full_board_except(&[]));
        let events = round.start_round();
        assert_eq!(events, vec![GameEvent::NoMovesLeft]);
        assert!(round.bag().is_empty());

        for _ in 0..GameSettings::default().game_over_delay_ticks {
            round.update();
        }
        assert_eq!(round.status(), RoundStatus::GameOver);
    }

    // Restart before the deadline cancels the pending transition; a
    // stale timer must never fire into the new game.
    #[test]
    fn test_restart_cancels_pending_game_over() {
        let mut round = make_round(9);
        round.set_board(full_board_except(&[]));
        round.start_round();

        let events = round.restart();
        assert_eq!(events, vec![GameEvent::RestartRequested]);
        assert_eq!(round.status(), RoundStatus::AwaitingBag);

        for _ in 0..2 * GameSettings::default().game_over_delay_ticks {
            assert!(round.update().is_empty());
        }
        assert_eq!(round.status(), RoundStatus::AwaitingBag);
        assert_eq!(round.board().occupied_count(), 0);
    }

    // Scenario D: restart resets the score but the best score is
    // retained; BestScoreChanged only fires past the retained maximum.
    #[test]
    fn test_best_score_survives_restart() {
        let mut round = GameRound::new(
            GameSettings::default(),
            BoardGeometry::new(0.0, 0.0, CELL),
            15,
            SessionRng::new(10),
        );

        round.set_bag(vec![piece(1, "one"), piece(2, "one")]);
        let events = drag_place(&mut round, 1, Anchor::new(0, 0));
        // Score 10, below the initial best of 15.
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::BestScoreChanged { .. }))
        );

        let events = drag_place(&mut round, 2, Anchor::new(2, 2));
        assert!(events.contains(&GameEvent::BestScoreChanged { best: 20 }));
        assert_eq!(round.best_score(), 20);

        round.restart();
        assert_eq!(round.score(), 0);
        assert_eq!(round.best_score(), 20);

        round.set_bag(vec![piece(3, "one")]);
        let events = drag_place(&mut round, 3, Anchor::new(0, 0));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::BestScoreChanged { .. })),
            "10 points must not beat the retained best of 20"
        );
    }

    #[test]
    fn test_unlock_reached_fires_once() {
        let settings = GameSettings {
            unlock_score: 20,
            ..GameSettings::default()
        };
        let mut round = GameRound::new(
            settings,
            BoardGeometry::new(0.0, 0.0, CELL),
            0,
            SessionRng::new(11),
        );
        round.set_bag(vec![piece(1, "one"), piece(2, "one"), piece(3, "one")]);

        let events = drag_place(&mut round, 1, Anchor::new(0, 0));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::UnlockReached { .. }))
        );
        let events = drag_place(&mut round, 2, Anchor::new(2, 2));
        assert!(events.contains(&GameEvent::UnlockReached { score: 20 }));
        let events = drag_place(&mut round, 3, Anchor::new(4, 4));
        assert!(
            !events
                .iter()
                .any(|e| matches!(e, GameEvent::UnlockReached { .. }))
        );
    }

    #[test]
    fn test_second_drag_rejected_while_active() {
        let mut round = make_round(12);
        round.set_bag(vec![piece(1, "one"), piece(2, "one")]);

        round.drag_start(1, pointer_for(shape_by_id("one").unwrap(), Anchor::new(0, 0)));
        round.drag_start(2, pointer_for(shape_by_id("one").unwrap(), Anchor::new(5, 5)));

        let events = round.drag_end();
        // The first gesture wins; piece 1 is placed at its target.
        assert!(events.iter().any(|e| matches!(
            e,
            GameEvent::PiecePlaced { piece_id: 1, .. }
        )));
        assert_eq!(round.bag().len(), 1);
        assert_eq!(round.bag()[0].id, 2);
    }

    #[test]
    fn test_round_complete_allows_next_round() {
        let mut round = make_round(13);
        round.set_bag(vec![piece(1, "one")]);
        let events = drag_place(&mut round, 1, Anchor::new(0, 0));
        assert!(events.contains(&GameEvent::RoundFinished));
        assert_eq!(round.status(), RoundStatus::RoundComplete);

        let events = round.start_round();
        assert_eq!(events, vec![GameEvent::BagDrawn { piece_count: 3 }]);
        assert_eq!(round.status(), RoundStatus::Active);
    }
}
