//! Gem Crossing - A lane-crossing grid arcade game
//!
//! Core modules:
//! - `sim`: Simulation (entities, collisions, levels, player state machine)
//! - `engine`: Frame loop driving the simulation and its collaborators
//! - `render`: Draw-list composition and a text renderer
//! - `audio`: Sound cue mixer
//! - `assets`: Sprite catalog and preloading
//! - `input`: Direction tokens and the demo autopilot
//! - `settings`: JSON configuration

pub mod assets;
pub mod audio;
pub mod engine;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use engine::{Engine, EngineError, FrameOutcome};
pub use settings::{Settings, VictoryPolicy};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Cell dimensions (pixels)
    pub const CELL_WIDTH: f32 = 101.0;
    pub const CELL_HEIGHT: f32 = 83.0;
    /// Upward shift that centers sprites on tile boundaries
    pub const ROW_OFFSET: f32 = 41.5;

    /// Board dimensions (cells)
    pub const COLUMNS: i32 = 5;
    pub const ROWS: i32 = 6;

    /// Collision bounds, narrower than the sprite so contacts don't fire early
    pub const BOUNDS_WIDTH: f32 = 80.0;
    pub const BOUNDS_HEIGHT: f32 = 83.0;

    /// Right edge of the board; hazards past this wrap around
    pub const BOARD_RIGHT: f32 = CELL_WIDTH * COLUMNS as f32;
    /// Hazard x after wrapping: one full cell left of column 0
    pub const WRAP_X: f32 = -CELL_WIDTH;
    /// Sprites drawn past this x get clipped to the board
    pub const CLIP_X: f32 = BOARD_RIGHT - CELL_WIDTH;
    /// Full sprite height used for clipped draws
    pub const SPRITE_HEIGHT: f32 = 171.0;

    /// Global hazard speed multiplier (pixels/s per speed unit)
    pub const SPEED_FACTOR: f32 = 100.0;

    /// Player defaults
    pub const START_LIVES: u32 = 5;
    pub const SPAWN_ROW: i32 = 5;
    pub const SPAWN_COL: i32 = 2;
}

/// Convert a (row, col) cell to its world-space top-left corner
#[inline]
pub fn cell_to_world(row: i32, col: i32) -> Vec2 {
    use consts::*;
    Vec2::new(
        col as f32 * CELL_WIDTH,
        row as f32 * CELL_HEIGHT - ROW_OFFSET,
    )
}

/// Convert a world-space position back to the (row, col) cell it starts in
#[inline]
pub fn world_to_cell(pos: Vec2) -> (i32, i32) {
    use consts::*;
    (
        ((pos.y + ROW_OFFSET) / CELL_HEIGHT).floor() as i32,
        (pos.x / CELL_WIDTH).floor() as i32,
    )
}
