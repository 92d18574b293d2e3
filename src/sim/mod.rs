//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time comes in as `dt`, never read from a clock
//! - No randomness; levels are hand-authored data
//! - Collaborators (audio, render) are reached only through drained events

pub mod collision;
pub mod entity;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;

pub use collision::{Aabb, intersects};
pub use entity::{Entity, EntityKind, GemColor, Item, ItemKind};
pub use level::{CatalogError, LevelCatalog, LevelDef, LevelLayout};
pub use player::{GemCounts, Player};
pub use state::{GameEvent, GamePhase, VictoryPolicy, World};
pub use tick::{TickInput, TickOutcome, handle_item, tick, update_hazards, update_player};
