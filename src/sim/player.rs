//! The player token and its stats

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::entity::{Entity, GemColor};
use super::state::GameEvent;
use crate::assets::SpriteId;
use crate::audio::SoundCue;
use crate::consts::*;
use crate::input::Direction;
use crate::world_to_cell;

/// Gems collected, by color
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemCounts {
    pub blue: u32,
    pub green: u32,
    pub orange: u32,
}

impl GemCounts {
    pub fn add(&mut self, color: GemColor) {
        match color {
            GemColor::Blue => self.blue += 1,
            GemColor::Green => self.green += 1,
            GemColor::Orange => self.orange += 1,
        }
    }

    pub fn get(&self, color: GemColor) -> u32 {
        match color {
            GemColor::Blue => self.blue,
            GemColor::Green => self.green,
            GemColor::Orange => self.orange,
        }
    }

    pub fn total(&self) -> u32 {
        self.blue + self.green + self.orange
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub entity: Entity,
    /// Respawn point, fixed at creation
    pub spawn: Vec2,
    pub lives: u32,
    pub points: u32,
    pub gems: GemCounts,
    pub stars: u32,
    pub keys: u32,
    /// Current level (1-based)
    pub level: u32,
    /// Stars required to reveal the current key, summed over all levels reached
    pub star_quota: u32,
}

impl Player {
    pub fn new(row: i32, col: i32, sprite: SpriteId) -> Self {
        let entity = Entity::player(row, col, sprite);
        let mut player = Self {
            spawn: entity.pos(),
            entity,
            lives: 0,
            points: 0,
            gems: GemCounts::default(),
            stars: 0,
            keys: 0,
            level: 1,
            star_quota: 0,
        };
        player.reset();
        player
    }

    /// Player at the standard spawn cell
    pub fn with_sprite(sprite: SpriteId) -> Self {
        Self::new(SPAWN_ROW, SPAWN_COL, sprite)
    }

    /// Reset every stat and return to the spawn point
    pub fn reset(&mut self) {
        self.points = 0;
        self.lives = START_LIVES;
        self.keys = 0;
        self.stars = 0;
        self.gems = GemCounts::default();
        self.star_quota = 0;
        self.level = 1;
        self.respawn();
    }

    pub fn respawn(&mut self) {
        self.entity.bounds.pos = self.spawn;
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.entity.pos()
    }

    #[inline]
    pub fn bounds(&self) -> &Aabb {
        &self.entity.bounds
    }

    pub fn cell(&self) -> (i32, i32) {
        world_to_cell(self.pos())
    }

    pub fn out_of_lives(&self) -> bool {
        self.lives == 0
    }

    /// On the lethal top row
    pub fn in_dead_zone(&self) -> bool {
        self.pos().y < 0.0
    }

    /// Lose a life and go back to the spawn point
    pub fn die(&mut self, events: &mut Vec<GameEvent>) {
        self.respawn();
        self.lives = self.lives.saturating_sub(1);

        if self.out_of_lives() {
            events.push(GameEvent::Sound(SoundCue::GameOver));
        } else {
            events.push(GameEvent::Sound(SoundCue::Die));
        }
        events.push(GameEvent::Died {
            lives_left: self.lives,
        });
        log::debug!("Player died, {} lives left", self.lives);
    }

    /// Try to step one cell. Moves off the board or into an obstacle are ignored.
    /// Returns whether the player moved.
    pub fn handle_input(&mut self, direction: Direction, obstacles: &[Entity]) -> bool {
        let destination = self.entity.bounds.offset(direction.delta());

        let (row, col) = world_to_cell(destination.pos);
        if !(0..ROWS).contains(&row) || !(0..COLUMNS).contains(&col) {
            return false;
        }

        if obstacles
            .iter()
            .any(|o| o.is_blocking() && destination.intersects(&o.bounds))
        {
            return false;
        }

        self.entity.bounds = destination;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_to_world;

    #[test]
    fn test_new_player_defaults() {
        let player = Player::with_sprite(SpriteId::Boy);
        assert_eq!(player.lives, 5);
        assert_eq!(player.level, 1);
        assert_eq!(player.points, 0);
        assert_eq!(player.pos(), cell_to_world(5, 2));
        assert_eq!(player.spawn, player.pos());
    }

    #[test]
    fn test_moves_one_cell() {
        let mut player = Player::with_sprite(SpriteId::Boy);
        assert!(player.handle_input(Direction::Up, &[]));
        assert_eq!(player.cell(), (4, 2));
        assert!(player.handle_input(Direction::Left, &[]));
        assert_eq!(player.cell(), (4, 1));
    }

    #[test]
    fn test_board_edges_block() {
        let mut player = Player::new(5, 0, SpriteId::Boy);
        assert!(!player.handle_input(Direction::Down, &[]));
        assert!(!player.handle_input(Direction::Left, &[]));
        assert_eq!(player.cell(), (5, 0));

        let mut player = Player::new(0, 4, SpriteId::Boy);
        assert!(!player.handle_input(Direction::Up, &[]));
        assert!(!player.handle_input(Direction::Right, &[]));
        assert_eq!(player.cell(), (0, 4));
    }

    #[test]
    fn test_can_step_onto_top_row() {
        let mut player = Player::new(1, 3, SpriteId::Boy);
        assert!(player.handle_input(Direction::Up, &[]));
        assert!(player.in_dead_zone());
    }

    #[test]
    fn test_rock_blocks_without_cost() {
        let mut player = Player::with_sprite(SpriteId::Boy);
        let rocks = [Entity::rock(4, 2)];
        assert!(!player.handle_input(Direction::Up, &rocks));
        assert_eq!(player.cell(), (5, 2));
        assert_eq!(player.lives, 5);
        // Sideways is clear
        assert!(player.handle_input(Direction::Right, &rocks));
    }

    #[test]
    fn test_die_respawns_and_picks_cue() {
        let mut player = Player::with_sprite(SpriteId::Boy);
        player.handle_input(Direction::Up, &[]);
        let mut events = Vec::new();

        player.die(&mut events);
        assert_eq!(player.lives, 4);
        assert_eq!(player.pos(), player.spawn);
        assert!(events.contains(&GameEvent::Sound(SoundCue::Die)));

        player.lives = 1;
        events.clear();
        player.die(&mut events);
        assert!(player.out_of_lives());
        assert!(events.contains(&GameEvent::Sound(SoundCue::GameOver)));

        // Never below zero
        player.die(&mut events);
        assert_eq!(player.lives, 0);
    }

    #[test]
    fn test_gem_counts() {
        let mut gems = GemCounts::default();
        gems.add(GemColor::Orange);
        gems.add(GemColor::Orange);
        gems.add(GemColor::Blue);
        assert_eq!(gems.get(GemColor::Orange), 2);
        assert_eq!(gems.get(GemColor::Green), 0);
        assert_eq!(gems.total(), 3);
    }
}
