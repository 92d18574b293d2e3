//! Entity records
//!
//! One record type for every object on the board. The kind tag carries the
//! per-kind data; behaviour is chosen by matching on it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use crate::assets::SpriteId;
use crate::audio::SoundCue;
use crate::cell_to_world;
use crate::consts::*;

/// Gem colors and their point values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GemColor {
    #[default]
    Blue,
    Green,
    Orange,
}

impl GemColor {
    /// Parse a color token. Anything unrecognised is a blue gem.
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_lowercase().as_str() {
            "orange" => GemColor::Orange,
            "green" => GemColor::Green,
            _ => GemColor::Blue,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GemColor::Blue => "blue",
            GemColor::Green => "green",
            GemColor::Orange => "orange",
        }
    }

    pub fn points(&self) -> u32 {
        match self {
            GemColor::Blue => 5,
            GemColor::Green => 10,
            GemColor::Orange => 15,
        }
    }

    pub fn sprite(&self) -> SpriteId {
        match self {
            GemColor::Blue => SpriteId::GemBlue,
            GemColor::Green => SpriteId::GemGreen,
            GemColor::Orange => SpriteId::GemOrange,
        }
    }
}

/// Item category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemKind {
    Gem(GemColor),
    /// Grants a life and counts toward the key quota
    Star,
    /// Advances to the next level
    Key,
}

pub const STAR_POINTS: u32 = 25;
pub const KEY_POINTS: u32 = 25;

/// Collectible state carried by item entities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub kind: ItemKind,
    /// Visible and collectible. Cleared on pickup, items are never removed.
    pub available: bool,
    pub points: u32,
    pub sound: SoundCue,
}

/// What an entity is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    /// Moves horizontally at `speed * SPEED_FACTOR` px/s, kills on contact
    Hazard { speed: f32 },
    Item(Item),
    /// Blocks player movement
    Obstacle,
    /// Makes the top row survivable
    SafeTile,
    Player,
}

/// A board object: kind, collision box and sprite
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    pub bounds: Aabb,
    pub sprite: SpriteId,
}

impl Entity {
    fn at_cell(row: i32, col: i32, kind: EntityKind, sprite: SpriteId) -> Self {
        Self {
            kind,
            bounds: Aabb::with_default_bounds(cell_to_world(row, col)),
            sprite,
        }
    }

    pub fn hazard(row: i32, col: i32, speed: f32) -> Self {
        Self::at_cell(row, col, EntityKind::Hazard { speed }, SpriteId::Bug)
    }

    pub fn gem(row: i32, col: i32, color: GemColor) -> Self {
        let item = Item {
            kind: ItemKind::Gem(color),
            available: true,
            points: color.points(),
            sound: SoundCue::CollectGem,
        };
        Self::at_cell(row, col, EntityKind::Item(item), color.sprite())
    }

    pub fn star(row: i32, col: i32) -> Self {
        let item = Item {
            kind: ItemKind::Star,
            available: true,
            points: STAR_POINTS,
            sound: SoundCue::Star,
        };
        Self::at_cell(row, col, EntityKind::Item(item), SpriteId::Star)
    }

    /// Keys start hidden until the star quota is met
    pub fn key(row: i32, col: i32) -> Self {
        let item = Item {
            kind: ItemKind::Key,
            available: false,
            points: KEY_POINTS,
            sound: SoundCue::ClearLevel,
        };
        Self::at_cell(row, col, EntityKind::Item(item), SpriteId::Key)
    }

    pub fn rock(row: i32, col: i32) -> Self {
        Self::at_cell(row, col, EntityKind::Obstacle, SpriteId::Rock)
    }

    pub fn selector(row: i32, col: i32) -> Self {
        Self::at_cell(row, col, EntityKind::SafeTile, SpriteId::Selector)
    }

    pub fn player(row: i32, col: i32, sprite: SpriteId) -> Self {
        Self::at_cell(row, col, EntityKind::Player, sprite)
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.bounds.pos
    }

    #[inline]
    pub fn intersects(&self, other: &Entity) -> bool {
        self.bounds.intersects(&other.bounds)
    }

    /// Position changes after creation
    pub fn is_movable(&self) -> bool {
        matches!(self.kind, EntityKind::Hazard { .. } | EntityKind::Player)
    }

    /// Stops the player from entering its cell
    pub fn is_blocking(&self) -> bool {
        matches!(self.kind, EntityKind::Obstacle)
    }

    /// Can be picked up right now
    pub fn is_collectible(&self) -> bool {
        matches!(self.kind, EntityKind::Item(Item { available: true, .. }))
    }

    pub fn is_lethal(&self) -> bool {
        matches!(self.kind, EntityKind::Hazard { .. })
    }

    /// Drawn but never collides with anything
    pub fn is_render_only(&self) -> bool {
        matches!(
            self.kind,
            EntityKind::Item(Item {
                available: false,
                ..
            })
        )
    }

    pub fn item(&self) -> Option<&Item> {
        match &self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn item_mut(&mut self) -> Option<&mut Item> {
        match &mut self.kind {
            EntityKind::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn is_key(&self) -> bool {
        matches!(self.item(), Some(Item { kind: ItemKind::Key, .. }))
    }

    pub fn is_star(&self) -> bool {
        matches!(self.item(), Some(Item { kind: ItemKind::Star, .. }))
    }

    /// Advance a hazard by `dt` seconds, wrapping past the right edge.
    /// Non-hazards are left untouched.
    pub fn advance(&mut self, dt: f32) {
        if let EntityKind::Hazard { speed } = self.kind {
            self.bounds.pos.x += dt * speed * SPEED_FACTOR;
            if self.bounds.pos.x > BOARD_RIGHT {
                self.bounds.pos.x = WRAP_X;
            }
        }
    }
}
