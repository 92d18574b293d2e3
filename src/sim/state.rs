//! World state and core simulation types
//!
//! Everything a tick reads or writes lives in `World`. Restarting the game
//! rebuilds it in place from the level catalog.

use serde::{Deserialize, Serialize};

use super::entity::{Entity, ItemKind};
use super::level::{LevelCatalog, LevelLayout};
use super::player::Player;
use crate::assets::SpriteId;
use crate::audio::SoundCue;

/// What happens once the last level's key is collected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryPolicy {
    /// Congratulate and start over at level 1
    #[default]
    Restart,
    /// Stop ticking; the host exits
    Halt,
}

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Normal play
    Playing,
    /// Lives exhausted
    GameOver,
    /// Every level cleared
    GameWon,
}

/// Things that happened during a tick, drained by the loop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Sound(SoundCue),
    Died { lives_left: u32 },
    Collected { kind: ItemKind, points: u32 },
    /// The star quota was met and the key is now visible
    KeyRevealed,
    LevelStarted { level: u32 },
    GameOver,
    GameWon,
}

/// The single mutable game world
#[derive(Debug, Clone)]
pub struct World {
    pub hazards: Vec<Entity>,
    pub items: Vec<Entity>,
    pub safe_tiles: Vec<Entity>,
    pub obstacles: Vec<Entity>,
    pub player: Player,
    pub victory: VictoryPolicy,
    /// Playing ticks since the last full reset
    pub ticks: u64,
    pub events: Vec<GameEvent>,
}

impl World {
    /// Fresh game at level 1
    pub fn new(catalog: &LevelCatalog, character: SpriteId) -> Self {
        let mut world = Self {
            hazards: Vec::new(),
            items: Vec::new(),
            safe_tiles: Vec::new(),
            obstacles: Vec::new(),
            player: Player::with_sprite(character),
            victory: VictoryPolicy::default(),
            ticks: 0,
            events: Vec::new(),
        };
        world.apply_layout(catalog.build_first());
        world
    }

    pub fn with_victory(mut self, victory: VictoryPolicy) -> Self {
        self.victory = victory;
        self
    }

    /// Swap in a level's entities and add its stars to the running quota
    fn apply_layout(&mut self, layout: LevelLayout) {
        self.hazards = layout.hazards;
        self.items = layout.items;
        self.safe_tiles = layout.safe_tiles;
        self.obstacles = layout.obstacles;
        self.player.star_quota += layout.star_quota;
        self.events.push(GameEvent::LevelStarted {
            level: self.player.level,
        });
    }

    /// Build the player's current level. Returns false when the catalog has
    /// no such level, leaving the world as it was.
    pub fn load_level(&mut self, catalog: &LevelCatalog) -> bool {
        match catalog.build_level(self.player.level) {
            Some(layout) => {
                log::info!(
                    "Level {}: {} hazards, {} items, quota {} (+{})",
                    self.player.level,
                    layout.hazards.len(),
                    layout.items.len(),
                    self.player.star_quota + layout.star_quota,
                    layout.star_quota
                );
                self.apply_layout(layout);
                true
            }
            None => {
                log::info!(
                    "No level {} in catalog of {}",
                    self.player.level,
                    catalog.last_level()
                );
                false
            }
        }
    }

    /// Full reinitialisation: stats reset and level 1 rebuilt
    pub fn restart(&mut self, catalog: &LevelCatalog) {
        self.player.reset();
        self.ticks = 0;
        self.apply_layout(catalog.build_first());
    }

    pub fn phase(&self, catalog: &LevelCatalog) -> GamePhase {
        if self.player.level > catalog.last_level() {
            GamePhase::GameWon
        } else if self.player.out_of_lives() {
            GamePhase::GameOver
        } else {
            GamePhase::Playing
        }
    }

    /// Make the level's key collectible. Returns false if the level has none.
    pub fn reveal_key(&mut self) -> bool {
        match self
            .items
            .iter_mut()
            .find(|e| e.is_key())
            .and_then(Entity::item_mut)
        {
            Some(key) => {
                key.available = true;
                self.events.push(GameEvent::KeyRevealed);
                true
            }
            None => false,
        }
    }

    pub fn key(&self) -> Option<&Entity> {
        self.items.iter().find(|e| e.is_key())
    }

    pub fn key_available(&self) -> bool {
        self.key().is_some_and(Entity::is_collectible)
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
