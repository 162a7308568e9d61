use clap::Parser;
use word_blocks::{
    Anchor, BOARD_SIZE, Board, BoardGeometry, GameEvent, GameRound, GameSettings, PointerPos,
    RoundStatus, SessionRng, Shape, log, logger,
};

const CELL_SIZE: f32 = 48.0;

/// Headless autoplay driver: plays the block puzzle through the same
/// drag surface a GUI would use. Each finished round stands in for a
/// correctly answered vocabulary question and triggers the next bag.
#[derive(Parser)]
#[command(name = "word_blocks_cli")]
struct Args {
    /// RNG seed; a random seed is drawn (and logged) when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many rounds even if the game is still alive.
    #[arg(long, default_value_t = 100)]
    max_rounds: u32,

    /// Optional YAML settings file (score rule, snap radius, delays).
    #[arg(long)]
    config: Option<String>,

    #[arg(long)]
    use_log_prefix: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("WordBlocks".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let settings = match &args.config {
        Some(path) => GameSettings::from_yaml_file(path)?,
        None => GameSettings::default(),
    };
    let rng = match args.seed {
        Some(seed) => SessionRng::new(seed),
        None => SessionRng::from_random(),
    };
    log!("Starting autoplay, seed {}", rng.seed());

    let geometry = BoardGeometry::new(0.0, 0.0, CELL_SIZE);
    let delay_ticks = settings.game_over_delay_ticks;
    let mut round = GameRound::new(settings, geometry, 0, rng);

    let mut rounds_played = 0;
    while rounds_played < args.max_rounds {
        rounds_played += 1;
        log!("Round {}", rounds_played);

        let events = round.start_round();
        log_events(&events);

        while round.status() == RoundStatus::Active {
            let Some((piece_id, shape, anchor)) = pick_placement(&round) else {
                break;
            };

            // Pick the piece up away from the board, then drag it to
            // the pointer position a player would use for the anchor.
            round.drag_start(piece_id, PointerPos::new(-200.0, -200.0));
            round.drag_move(pointer_for(shape, anchor));
            let events = round.drag_end();
            if events.is_empty() {
                log!("Placement of piece {} at {:?} was rejected", piece_id, anchor);
                break;
            }
            log_events(&events);
        }

        // Pump the tick loop through any pending delayed game over.
        let mut ticks = 0;
        while round.status() == RoundStatus::Active && ticks <= delay_ticks {
            log_events(&round.update());
            ticks += 1;
        }

        match round.status() {
            RoundStatus::RoundComplete => continue,
            RoundStatus::GameOver => {
                log!(
                    "Game over after {} round(s), score {}, best {}",
                    rounds_played,
                    round.score(),
                    round.best_score()
                );
                return Ok(());
            }
            status => {
                log!("Unexpected status {:?}, stopping", status);
                return Ok(());
            }
        }
    }

    log!(
        "Stopped after {} rounds, score {}, best {}",
        rounds_played,
        round.score(),
        round.best_score()
    );
    Ok(())
}

/// First piece in the bag with a legal placement, and its first valid
/// anchor in row-major order.
fn pick_placement(round: &GameRound) -> Option<(u32, &'static Shape, Anchor)> {
    round.bag().iter().find_map(|piece| {
        first_valid_anchor(round.board(), piece.shape).map(|anchor| (piece.id, piece.shape, anchor))
    })
}

fn first_valid_anchor(board: &Board, shape: &Shape) -> Option<Anchor> {
    for row in 0..BOARD_SIZE as i32 {
        for col in 0..BOARD_SIZE as i32 {
            let anchor = Anchor::new(row, col);
            if board.can_place(shape, anchor) {
                return Some(anchor);
            }
        }
    }
    None
}

/// Pointer position over the center of the shape's bounding box when
/// anchored at `anchor`.
fn pointer_for(shape: &Shape, anchor: Anchor) -> PointerPos {
    PointerPos::new(
        (anchor.col as f32 + shape.width() as f32 / 2.0) * CELL_SIZE,
        (anchor.row as f32 + shape.height() as f32 / 2.0) * CELL_SIZE,
    )
}

fn log_events(events: &[GameEvent]) {
    for event in events {
        match event {
            GameEvent::BagDrawn { piece_count } => {
                log!("Bag drawn: {} pieces", piece_count);
            }
            GameEvent::PiecePlaced {
                piece_id,
                anchor,
                cleared_lines,
                points,
            } => {
                log!(
                    "Placed piece {} at ({}, {}): {} line(s) cleared, +{} points",
                    piece_id,
                    anchor.row,
                    anchor.col,
                    cleared_lines,
                    points
                );
            }
            GameEvent::LinesCleared { cells } => {
                log!("Cleared {} cell(s)", cells.len());
            }
            GameEvent::BestScoreChanged { best } => {
                log!("New best score: {}", best);
            }
            GameEvent::UnlockReached { score } => {
                log!("Unlock threshold reached at {} points", score);
            }
            GameEvent::RoundFinished => {
                log!("Round finished, all pieces placed");
            }
            GameEvent::NoMovesLeft => {
                log!("No moves left");
            }
            GameEvent::GameOver { score } => {
                log!("Game over at {} points", score);
            }
            GameEvent::RestartRequested => {
                log!("Restart requested");
            }
        }
    }
}
