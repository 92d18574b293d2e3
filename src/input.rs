//! Directional input
//!
//! The host delivers string tokens (key names); only the four directions mean
//! anything to the game. `Autopilot` stands in for a keyboard in demo mode.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{CELL_HEIGHT, CELL_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Parse an input token. Unknown tokens are ignored.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "left" | "ArrowLeft" => Some(Direction::Left),
            "right" | "ArrowRight" => Some(Direction::Right),
            "up" | "ArrowUp" => Some(Direction::Up),
            "down" | "ArrowDown" => Some(Direction::Down),
            _ => None,
        }
    }

    /// Parse a legacy DOM key code (37-40)
    pub fn from_key_code(code: u32) -> Option<Self> {
        match code {
            37 => Some(Direction::Left),
            38 => Some(Direction::Up),
            39 => Some(Direction::Right),
            40 => Some(Direction::Down),
            _ => None,
        }
    }

    /// World-space offset of a one-cell step
    pub fn delta(&self) -> Vec2 {
        match self {
            Direction::Left => Vec2::new(-CELL_WIDTH, 0.0),
            Direction::Right => Vec2::new(CELL_WIDTH, 0.0),
            Direction::Up => Vec2::new(0.0, -CELL_HEIGHT),
            Direction::Down => Vec2::new(0.0, CELL_HEIGHT),
        }
    }
}

/// Seeded random key presser for demo runs
#[derive(Debug, Clone)]
pub struct Autopilot {
    rng: Pcg32,
    /// Seconds between presses
    interval: f32,
    timer: f32,
}

impl Autopilot {
    pub fn new(seed: u64, interval: f32) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            interval: interval.max(0.01),
            timer: 0.0,
        }
    }

    /// Advance by `dt` seconds; returns a direction when a press is due.
    /// Upward moves are favoured so the demo actually crosses the board.
    pub fn poll(&mut self, dt: f32) -> Option<Direction> {
        self.timer += dt;
        if self.timer < self.interval {
            return None;
        }
        self.timer -= self.interval;

        let roll = self.rng.random_range(0..10u32);
        Some(match roll {
            0..=3 => Direction::Up,
            4..=5 => Direction::Left,
            6..=7 => Direction::Right,
            _ => Direction::Down,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokens() {
        assert_eq!(Direction::from_token("left"), Some(Direction::Left));
        assert_eq!(Direction::from_token("ArrowDown"), Some(Direction::Down));
        assert_eq!(Direction::from_token("space"), None);
        assert_eq!(Direction::from_key_code(38), Some(Direction::Up));
        assert_eq!(Direction::from_key_code(32), None);
    }

    #[test]
    fn test_opposite_deltas_cancel() {
        assert_eq!(Direction::Left.delta() + Direction::Right.delta(), Vec2::ZERO);
        assert_eq!(Direction::Up.delta() + Direction::Down.delta(), Vec2::ZERO);
    }

    #[test]
    fn test_autopilot_is_deterministic() {
        let mut a = Autopilot::new(42, 0.25);
        let mut b = Autopilot::new(42, 0.25);
        for _ in 0..200 {
            assert_eq!(a.poll(0.1), b.poll(0.1));
        }
    }

    #[test]
    fn test_autopilot_respects_interval() {
        let mut pilot = Autopilot::new(7, 0.5);
        assert!(pilot.poll(0.2).is_none());
        assert!(pilot.poll(0.2).is_none());
        assert!(pilot.poll(0.2).is_some());
    }
}
