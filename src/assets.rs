//! Sprite identifiers and asset preloading
//!
//! The game draws from a small fixed catalog of images. Whatever backend
//! renders them must resolve the whole catalog before the first tick.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Every image the game can draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteId {
    // Playable characters
    Boy,
    CatGirl,
    HornGirl,
    PinkGirl,
    PrincessGirl,
    // Hazards
    Bug,
    // Items
    GemBlue,
    GemGreen,
    GemOrange,
    Key,
    Star,
    // Scenery
    Selector,
    Rock,
    Heart,
    // Terrain
    Grass,
    Stone,
    Water,
}

impl SpriteId {
    /// Sprites resolved before the loop starts (the selected character is added on top)
    pub const PRELOAD: &'static [SpriteId] = &[
        SpriteId::Stone,
        SpriteId::Water,
        SpriteId::Grass,
        SpriteId::Bug,
        SpriteId::Heart,
        SpriteId::GemBlue,
        SpriteId::GemGreen,
        SpriteId::GemOrange,
        SpriteId::Key,
        SpriteId::Selector,
        SpriteId::Star,
        SpriteId::Rock,
    ];

    /// Relative image path
    pub fn path(&self) -> &'static str {
        match self {
            SpriteId::Boy => "images/char-boy.png",
            SpriteId::CatGirl => "images/char-cat-girl.png",
            SpriteId::HornGirl => "images/char-horn-girl.png",
            SpriteId::PinkGirl => "images/char-pink-girl.png",
            SpriteId::PrincessGirl => "images/char-princess-girl.png",
            SpriteId::Bug => "images/enemy-bug.png",
            SpriteId::GemBlue => "images/gem-blue.png",
            SpriteId::GemGreen => "images/gem-green.png",
            SpriteId::GemOrange => "images/gem-orange.png",
            SpriteId::Key => "images/Key.png",
            SpriteId::Star => "images/Star.png",
            SpriteId::Selector => "images/Selector.png",
            SpriteId::Rock => "images/Rock.png",
            SpriteId::Heart => "images/Heart.png",
            SpriteId::Grass => "images/grass-block.png",
            SpriteId::Stone => "images/stone-block.png",
            SpriteId::Water => "images/water-block.png",
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(
            self,
            SpriteId::Boy
                | SpriteId::CatGirl
                | SpriteId::HornGirl
                | SpriteId::PinkGirl
                | SpriteId::PrincessGirl
        )
    }

    /// Full preload list for a given player character
    pub fn preload_for(character: SpriteId) -> Vec<SpriteId> {
        let mut sprites = Self::PRELOAD.to_vec();
        if !sprites.contains(&character) {
            sprites.push(character);
        }
        sprites
    }
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to resolve sprite {sprite:?} ({path})")]
    Missing { sprite: SpriteId, path: &'static str },
    #[error("asset backend failed: {0}")]
    Backend(String),
}

/// Resolves sprite identifiers to drawable resources
pub trait AssetLoader {
    fn load(&mut self, sprites: &[SpriteId]) -> Result<(), AssetError>;
}
