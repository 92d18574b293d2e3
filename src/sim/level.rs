//! Level catalog
//!
//! Levels are authored in cell coordinates as plain data and turned into
//! world-space entities on demand. Building is deterministic: the same index
//! always produces the same layout. An index past the end of the catalog
//! yields `None`, which is how the game learns it has been won.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{Entity, GemColor};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read level pack {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed level pack: {0}")]
    Json(#[from] serde_json::Error),
    #[error("level pack contains no levels")]
    Empty,
    #[error("level {level} has {keys} keys (at most one allowed)")]
    MultipleKeys { level: u32, keys: usize },
}

/// A board cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellDef {
    pub row: i32,
    pub col: i32,
}

/// A hazard lane entry. Negative columns start the hazard off-board.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardDef {
    pub row: i32,
    pub col: i32,
    pub speed: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemDef {
    Gem {
        row: i32,
        col: i32,
        /// Color token; unknown tokens become blue
        #[serde(default)]
        color: String,
    },
    Star {
        row: i32,
        col: i32,
    },
    Key {
        row: i32,
        col: i32,
    },
}

impl ItemDef {
    fn build(&self) -> Entity {
        match self {
            ItemDef::Gem { row, col, color } => {
                Entity::gem(*row, *col, GemColor::from_token(color))
            }
            ItemDef::Star { row, col } => Entity::star(*row, *col),
            ItemDef::Key { row, col } => Entity::key(*row, *col),
        }
    }
}

/// One hand-authored level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub hazards: Vec<HazardDef>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub safe_tiles: Vec<CellDef>,
    #[serde(default)]
    pub obstacles: Vec<CellDef>,
}

impl LevelDef {
    pub fn star_count(&self) -> u32 {
        self.items
            .iter()
            .filter(|i| matches!(i, ItemDef::Star { .. }))
            .count() as u32
    }

    pub fn key_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i, ItemDef::Key { .. }))
            .count()
    }

    /// Instantiate this level's entities
    pub fn build(&self) -> LevelLayout {
        LevelLayout {
            hazards: self
                .hazards
                .iter()
                .map(|h| Entity::hazard(h.row, h.col, h.speed))
                .collect(),
            items: self.items.iter().map(ItemDef::build).collect(),
            safe_tiles: self
                .safe_tiles
                .iter()
                .map(|c| Entity::selector(c.row, c.col))
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|c| Entity::rock(c.row, c.col))
                .collect(),
            star_quota: self.star_count(),
        }
    }
}

/// Entities of a built level plus the stars it adds to the key quota
#[derive(Debug, Clone, PartialEq)]
pub struct LevelLayout {
    pub hazards: Vec<Entity>,
    pub items: Vec<Entity>,
    pub safe_tiles: Vec<Entity>,
    pub obstacles: Vec<Entity>,
    pub star_quota: u32,
}

/// Ordered, non-empty list of levels (level 1 is the first entry)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<LevelDef>", into = "Vec<LevelDef>")]
pub struct LevelCatalog {
    levels: Vec<LevelDef>,
}

impl TryFrom<Vec<LevelDef>> for LevelCatalog {
    type Error = CatalogError;

    fn try_from(levels: Vec<LevelDef>) -> Result<Self, Self::Error> {
        Self::new(levels)
    }
}

impl From<LevelCatalog> for Vec<LevelDef> {
    fn from(catalog: LevelCatalog) -> Self {
        catalog.levels
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    pub fn new(levels: Vec<LevelDef>) -> Result<Self, CatalogError> {
        if levels.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, level) in levels.iter().enumerate() {
            let keys = level.key_count();
            if keys > 1 {
                return Err(CatalogError::MultipleKeys {
                    level: i as u32 + 1,
                    keys,
                });
            }
        }
        Ok(Self { levels })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<LevelDef> = serde_json::from_str(json)?;
        Self::new(levels)
    }

    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json(&json)?;
        log::info!(
            "Loaded {} levels from {}",
            catalog.last_level(),
            path.display()
        );
        Ok(catalog)
    }

    /// Index of the final level
    pub fn last_level(&self) -> u32 {
        self.levels.len() as u32
    }

    pub fn level(&self, index: u32) -> Option<&LevelDef> {
        index
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
    }

    /// Build level `index` (1-based). `None` means there are no more levels.
    pub fn build_level(&self, index: u32) -> Option<LevelLayout> {
        self.level(index).map(LevelDef::build)
    }

    /// Build level 1, which every catalog has
    pub fn build_first(&self) -> LevelLayout {
        self.levels[0].build()
    }

    /// The four levels that ship with the game
    pub fn builtin() -> Self {
        Self {
            levels: builtin_levels(),
        }
    }
}

fn bug(row: i32, col: i32, speed: f32) -> HazardDef {
    HazardDef { row, col, speed }
}

fn gem(row: i32, col: i32, color: &str) -> ItemDef {
    ItemDef::Gem {
        row,
        col,
        color: color.to_string(),
    }
}

fn star(row: i32, col: i32) -> ItemDef {
    ItemDef::Star { row, col }
}

fn key(row: i32, col: i32) -> ItemDef {
    ItemDef::Key { row, col }
}

fn cell(row: i32, col: i32) -> CellDef {
    CellDef { row, col }
}

fn builtin_levels() -> Vec<LevelDef> {
    vec![
        LevelDef {
            name: Some("First Crossing".to_string()),
            hazards: vec![bug(1, -1, 2.0), bug(2, -3, 2.0), bug(3, -1, 1.0)],
            items: vec![
                gem(1, 0, "blue"),
                gem(2, 2, "green"),
                gem(1, 4, "blue"),
                star(0, 2),
                key(5, 0),
            ],
            safe_tiles: vec![cell(0, 2)],
            obstacles: vec![cell(4, 2)],
        },
        LevelDef {
            name: Some("The Wall".to_string()),
            hazards: vec![
                bug(1, -1, 1.0),
                bug(1, -3, 1.0),
                bug(3, -1, 1.0),
                bug(3, -3, 1.0),
            ],
            items: vec![
                gem(1, 0, "green"),
                gem(2, 2, "orange"),
                gem(1, 4, "green"),
                gem(3, 0, "blue"),
                gem(3, 4, "blue"),
                star(0, 1),
                star(0, 3),
                key(5, 4),
            ],
            safe_tiles: vec![cell(0, 1), cell(0, 3)],
            obstacles: vec![cell(2, 0), cell(2, 1), cell(2, 3), cell(2, 4)],
        },
        LevelDef {
            name: Some("Starfall".to_string()),
            hazards: vec![
                bug(1, -1, 2.0),
                bug(2, -3, 3.0),
                bug(3, -1, 1.0),
                bug(3, -3, 1.0),
            ],
            items: vec![
                gem(1, 0, "green"),
                gem(1, 4, "green"),
                gem(3, 0, "green"),
                gem(3, 4, "green"),
                star(0, 0),
                star(0, 2),
                star(0, 4),
                star(2, 2),
                key(5, 0),
            ],
            safe_tiles: vec![cell(0, 0), cell(0, 2), cell(0, 4)],
            obstacles: vec![cell(4, 0), cell(4, 4), cell(2, 1), cell(2, 3)],
        },
        LevelDef {
            name: Some("The Maze".to_string()),
            hazards: vec![bug(1, -4, 2.0), bug(2, -3, 2.0), bug(3, -2, 2.0)],
            items: vec![
                gem(1, 0, "green"),
                gem(1, 4, "green"),
                gem(3, 0, "green"),
                gem(3, 4, "green"),
                star(2, 2),
                key(4, 2),
            ],
            safe_tiles: vec![cell(2, 2)],
            obstacles: vec![
                cell(3, 1),
                cell(3, 2),
                cell(3, 3),
                cell(4, 3),
                cell(4, 1),
                cell(2, 1),
                cell(2, 3),
            ],
        },
    ]
}
