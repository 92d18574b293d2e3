//! Axis-aligned bounding box collision
//!
//! One overlap predicate serves every check in the game: hazard kills, item
//! pickups, safe tiles and obstacle blocking. Callers differ only in what they
//! do with a hit.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::{BOUNDS_HEIGHT, BOUNDS_WIDTH};

/// Collision box anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Aabb {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    /// Box with the default entity bounds at `pos`
    pub fn with_default_bounds(pos: Vec2) -> Self {
        Self::new(pos, Vec2::new(BOUNDS_WIDTH, BOUNDS_HEIGHT))
    }

    /// Copy of this box translated by `delta` (used to probe a move destination)
    #[inline]
    pub fn offset(&self, delta: Vec2) -> Self {
        Self::new(self.pos + delta, self.size)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    #[inline]
    pub fn intersects(&self, other: &Aabb) -> bool {
        intersects(self, other)
    }
}

/// Strict overlap on both axes. Boxes that only share an edge do not collide.
#[inline]
pub fn intersects(a: &Aabb, b: &Aabb) -> bool {
    a.pos.y < b.bottom() && a.bottom() > b.pos.y && a.pos.x < b.right() && a.right() > b.pos.x
}
