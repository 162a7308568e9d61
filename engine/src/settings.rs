use serde::{Deserialize, Serialize};
use std::io::ErrorKind;

pub const BOARD_SIZE: usize = 8;
pub const BAG_SIZE: usize = 3;
pub const TICK_INTERVAL_MS: u32 = 200;

/// Ticks between deadlock detection and the game-over transition,
/// so clear animations can finish (~2 seconds).
pub const GAME_OVER_DELAY_TICKS: u64 = 10;

/// How long a cleared cell keeps its flash record visible.
pub const CLEAR_FLASH_TICKS: u64 = 3;

pub const SNAP_RADIUS: i32 = 2;

pub const PALETTE: &[&str] = &[
    "#6ea8fe", "#a78bfa", "#60d6b7", "#f7b267", "#f59eb6", "#ffd166",
];

/// Fill-ratio thresholds for the difficulty weight step function.
pub const MEDIUM_FILL_THRESHOLD: f32 = 0.25;
pub const HIGH_FILL_THRESHOLD: f32 = 0.6;

/// easy : medium : hard weights per fill band.
pub const LOW_FILL_WEIGHTS: [u32; 3] = [6, 3, 1];
pub const MEDIUM_FILL_WEIGHTS: [u32; 3] = [4, 3, 2];
pub const HIGH_FILL_WEIGHTS: [u32; 3] = [8, 1, 0];

pub const DEFAULT_UNLOCK_SCORE: u32 = 300;

/// Scoring policy. The three observed variants of the game differ only
/// in these weights, so the formula is configuration, not code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRule {
    pub points_per_placement: u32,
    pub points_per_cell: u32,
    pub points_per_line: u32,
}

impl ScoreRule {
    pub fn points(&self, piece_cells: u32, cleared_lines: u32) -> u32 {
        self.points_per_placement
            + self.points_per_cell * piece_cells
            + self.points_per_line * cleared_lines
    }
}

impl Default for ScoreRule {
    fn default() -> Self {
        Self {
            points_per_placement: 10,
            points_per_cell: 0,
            points_per_line: 50,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub score: ScoreRule,
    pub snap_radius: i32,
    pub game_over_delay_ticks: u64,
    pub unlock_score: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            score: ScoreRule::default(),
            snap_radius: SNAP_RADIUS,
            game_over_delay_ticks: GAME_OVER_DELAY_TICKS,
            unlock_score: DEFAULT_UNLOCK_SCORE,
        }
    }
}

impl GameSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.snap_radius < 0 {
            return Err("snap_radius must be non-negative".to_string());
        }
        if self.snap_radius > BOARD_SIZE as i32 {
            return Err(format!(
                "snap_radius must be at most the board size ({})",
                BOARD_SIZE
            ));
        }
        Ok(())
    }

    /// Loads settings from a YAML file. A missing file yields defaults;
    /// a present but malformed or invalid file is an error.
    pub fn from_yaml_file(path: &str) -> Result<Self, String> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(format!("Failed to read settings file: {}", err)),
        };

        let settings: Self = serde_yaml_ng::from_str(&content)
            .map_err(|e| format!("Failed to deserialize settings: {}", e))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_yaml(&self) -> Result<String, String> {
        serde_yaml_ng::to_string(self).map_err(|e| format!("Failed to serialize settings: {}", e))
    }
}
