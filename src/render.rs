//! Render pass
//!
//! `render_world` turns the world into an ordered list of draw calls for a
//! `Renderer` backend. Moving sprites that cross the right edge are clipped
//! to the visible width so the wrapped coordinate space never shows.

use std::collections::HashMap;

use glam::Vec2;

use crate::assets::{AssetError, AssetLoader, SpriteId};
use crate::consts::*;
use crate::sim::{GemCounts, Player, World};
use crate::world_to_cell;

/// Terrain sprite for each board row, top to bottom
pub const ROW_TERRAIN: [SpriteId; ROWS as usize] = [
    SpriteId::Water,
    SpriteId::Stone,
    SpriteId::Stone,
    SpriteId::Stone,
    SpriteId::Grass,
    SpriteId::Grass,
];

/// Visible portion of a sprite, measured from its left edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clip {
    pub width: f32,
    pub height: f32,
}

/// Values shown on the heads-up display
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HudStats {
    pub level: u32,
    pub lives: u32,
    /// Rolled-up points (see `HudState`)
    pub points: u32,
    pub stars: u32,
    pub keys: u32,
    pub gems: GemCounts,
}

/// Drawing backend
pub trait Renderer {
    fn begin_frame(&mut self) {}
    fn draw(&mut self, sprite: SpriteId, pos: Vec2, clip: Option<Clip>);
    fn draw_hud(&mut self, _hud: &HudStats) {}
    fn end_frame(&mut self) {}
}

/// Score roll-up: the displayed points climb one per frame toward the real score
#[derive(Debug, Clone, Default)]
pub struct HudState {
    displayed_points: u32,
}

impl HudState {
    pub fn update(&mut self, player: &Player) -> HudStats {
        if player.points > self.displayed_points {
            self.displayed_points += 1;
        } else if player.points < self.displayed_points {
            // Score went down, which only happens on a full reset
            self.displayed_points = player.points;
        }

        HudStats {
            level: player.level,
            lives: player.lives,
            points: self.displayed_points,
            stars: player.stars,
            keys: player.keys,
            gems: player.gems,
        }
    }

    pub fn displayed_points(&self) -> u32 {
        self.displayed_points
    }
}

/// Clip for a moving sprite at `x`. `None` means nothing is visible.
pub fn dynamic_clip(x: f32) -> Option<Option<Clip>> {
    if x < CLIP_X {
        return Some(None);
    }
    let width = BOARD_RIGHT - x;
    if width > 0.0 {
        Some(Some(Clip {
            width,
            height: SPRITE_HEIGHT,
        }))
    } else {
        None
    }
}

/// Draw the world: terrain, safe tiles, obstacles, available items, hazards,
/// the player, then the HUD
pub fn render_world<R: Renderer + ?Sized>(world: &World, hud: &HudStats, renderer: &mut R) {
    renderer.begin_frame();

    for (row, terrain) in ROW_TERRAIN.iter().enumerate() {
        for col in 0..COLUMNS {
            let pos = Vec2::new(col as f32 * CELL_WIDTH, row as f32 * CELL_HEIGHT);
            renderer.draw(*terrain, pos, None);
        }
    }

    for tile in &world.safe_tiles {
        renderer.draw(tile.sprite, tile.pos(), None);
    }
    for obstacle in &world.obstacles {
        renderer.draw(obstacle.sprite, obstacle.pos(), None);
    }
    for item in world.items.iter().filter(|i| i.is_collectible()) {
        renderer.draw(item.sprite, item.pos(), None);
    }

    let movers = world
        .hazards
        .iter()
        .chain(std::iter::once(&world.player.entity));
    for entity in movers {
        if let Some(clip) = dynamic_clip(entity.pos().x) {
            renderer.draw(entity.sprite, entity.pos(), clip);
        }
    }

    renderer.draw_hud(hud);
    renderer.end_frame();
}

fn glyph(sprite: SpriteId) -> char {
    match sprite {
        SpriteId::Boy
        | SpriteId::CatGirl
        | SpriteId::HornGirl
        | SpriteId::PinkGirl
        | SpriteId::PrincessGirl => '@',
        SpriteId::Bug => 'B',
        SpriteId::GemBlue => 'b',
        SpriteId::GemGreen => 'g',
        SpriteId::GemOrange => 'o',
        SpriteId::Key => 'K',
        SpriteId::Star => '*',
        SpriteId::Selector => '_',
        SpriteId::Rock => '#',
        SpriteId::Heart => 'h',
        SpriteId::Grass => ',',
        SpriteId::Stone => '.',
        SpriteId::Water => '~',
    }
}

/// Text backend: one character per board cell plus a HUD line
#[derive(Debug, Default)]
pub struct AsciiRenderer {
    glyphs: HashMap<SpriteId, char>,
    cells: Vec<Vec<char>>,
    hud: String,
    frame: String,
}

impl AsciiRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently completed frame
    pub fn frame(&self) -> &str {
        &self.frame
    }

    /// Character at a board cell in the frame being drawn
    pub fn cell(&self, row: i32, col: i32) -> Option<char> {
        self.cells
            .get(usize::try_from(row).ok()?)?
            .get(usize::try_from(col).ok()?)
            .copied()
    }
}

impl AssetLoader for AsciiRenderer {
    fn load(&mut self, sprites: &[SpriteId]) -> Result<(), AssetError> {
        for &sprite in sprites {
            self.glyphs.insert(sprite, glyph(sprite));
        }
        log::debug!("Resolved {} sprites", self.glyphs.len());
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn begin_frame(&mut self) {
        self.cells = vec![vec![' '; COLUMNS as usize]; ROWS as usize];
        self.hud.clear();
    }

    fn draw(&mut self, sprite: SpriteId, pos: Vec2, _clip: Option<Clip>) {
        // Terrain is drawn unshifted; nudge it onto the entity grid
        let pos = if matches!(sprite, SpriteId::Water | SpriteId::Stone | SpriteId::Grass) {
            pos - Vec2::new(0.0, ROW_OFFSET)
        } else {
            pos
        };
        let (row, col) = world_to_cell(pos);
        let ch = self.glyphs.get(&sprite).copied().unwrap_or('?');
        if let (Ok(r), Ok(c)) = (usize::try_from(row), usize::try_from(col)) {
            if let Some(cell) = self.cells.get_mut(r).and_then(|line| line.get_mut(c)) {
                *cell = ch;
            }
        }
    }

    fn draw_hud(&mut self, hud: &HudStats) {
        self.hud = format!(
            "L{} {} pts:{} *x{} Kx{} b{} g{} o{}",
            hud.level,
            "h".repeat(hud.lives as usize),
            hud.points,
            hud.stars,
            hud.keys,
            hud.gems.blue,
            hud.gems.green,
            hud.gems.orange,
        );
    }

    fn end_frame(&mut self) {
        let mut frame: String = self
            .cells
            .iter()
            .map(|line| line.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n");
        frame.push('\n');
        frame.push_str(&self.hud);
        self.frame = frame;
    }
}
