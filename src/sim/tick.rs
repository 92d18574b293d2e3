//! Simulation tick
//!
//! One tick: terminal checks, queued moves, hazards, then the player.
//! The player resolves against the hazards' post-update positions.

use super::entity::{EntityKind, Item, ItemKind};
use super::level::LevelCatalog;
use super::state::{GameEvent, GamePhase, VictoryPolicy, World};
use crate::input::Direction;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Moves received since the previous tick, oldest first
    pub moves: Vec<Direction>,
}

impl TickInput {
    pub fn single(direction: Direction) -> Self {
        Self {
            moves: vec![direction],
        }
    }
}

/// How a tick ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Normal update ran
    Updated,
    /// Lives were exhausted; the game restarted at level 1
    GameOver,
    /// The catalog ran out. Whether the world restarted depends on the victory policy.
    Won,
}

/// Advance the world by `dt` seconds
pub fn tick(world: &mut World, catalog: &LevelCatalog, input: &TickInput, dt: f32) -> TickOutcome {
    match world.phase(catalog) {
        GamePhase::GameWon => {
            if world.victory == VictoryPolicy::Restart {
                log::info!(
                    "All {} levels cleared with {} points, restarting",
                    catalog.last_level(),
                    world.player.points
                );
                world.events.push(GameEvent::GameWon);
                world.restart(catalog);
            }
            return TickOutcome::Won;
        }
        GamePhase::GameOver => {
            log::info!(
                "Out of lives on level {} with {} points, restarting",
                world.player.level,
                world.player.points
            );
            world.events.push(GameEvent::GameOver);
            world.restart(catalog);
            return TickOutcome::GameOver;
        }
        GamePhase::Playing => {}
    }

    world.ticks += 1;

    for &direction in &input.moves {
        world.player.handle_input(direction, &world.obstacles);
    }

    update_hazards(world, dt);
    update_player(world, catalog);

    TickOutcome::Updated
}

/// Move every hazard. Hazards don't interact, so order is irrelevant.
pub fn update_hazards(world: &mut World, dt: f32) {
    for hazard in &mut world.hazards {
        hazard.advance(dt);
    }
}

/// Resolve the player against the world: hazards, then items, then the top row
pub fn update_player(world: &mut World, catalog: &LevelCatalog) {
    if world
        .hazards
        .iter()
        .any(|h| h.is_lethal() && h.intersects(&world.player.entity))
    {
        world.player.die(&mut world.events);
        return;
    }

    let mut index = 0;
    while index < world.items.len() {
        let item = &world.items[index];
        if item.is_collectible() && item.intersects(&world.player.entity) {
            let level = world.player.level;
            handle_item(world, index, catalog);
            if world.player.level != level {
                // The item list now belongs to another level
                break;
            }
        }
        index += 1;
    }

    if world.player.in_dead_zone()
        && !world
            .safe_tiles
            .iter()
            .any(|t| t.intersects(&world.player.entity))
    {
        world.player.die(&mut world.events);
    }
}

/// Collect the item at `index`
pub fn handle_item(world: &mut World, index: usize, catalog: &LevelCatalog) {
    let Some(Item {
        kind,
        points,
        sound,
        ..
    }) = world.items[index].item().copied()
    else {
        return;
    };

    if let EntityKind::Item(item) = &mut world.items[index].kind {
        item.available = false;
    }
    world.events.push(GameEvent::Sound(sound));
    world.events.push(GameEvent::Collected { kind, points });
    world.player.points += points;
    log::debug!("Collected {:?} for {} points", kind, points);

    match kind {
        ItemKind::Gem(color) => world.player.gems.add(color),
        ItemKind::Star => {
            world.player.lives += 1;
            world.player.stars += 1;
            if world.player.stars == world.player.star_quota && !world.reveal_key() {
                log::warn!("Star quota met on level {} without a key", world.player.level);
            }
        }
        ItemKind::Key => {
            world.player.keys += 1;
            world.player.level += 1;
            world.load_level(catalog);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::SpriteId;
    use crate::audio::SoundCue;
    use crate::cell_to_world;
    use crate::sim::entity::{Entity, GemColor};

    fn new_world() -> (World, LevelCatalog) {
        let catalog = LevelCatalog::builtin();
        let mut world = World::new(&catalog, SpriteId::Boy);
        world.drain_events();
        (world, catalog)
    }

    fn place_player(world: &mut World, row: i32, col: i32) {
        world.player.entity.bounds.pos = cell_to_world(row, col);
    }

    #[test]
    fn test_hazard_kills_and_skips_items() {
        let (mut world, catalog) = new_world();
        place_player(&mut world, 1, 0);
        world.hazards = vec![Entity::hazard(1, 0, 0.0)];

        update_player(&mut world, &catalog);
        assert_eq!(world.player.lives, 4);
        assert_eq!(world.player.pos(), world.player.spawn);
        // The blue gem on (1, 0) was not picked up
        assert!(world.items[0].is_collectible());
        assert_eq!(world.player.points, 0);
    }

    #[test]
    fn test_gem_pickup() {
        let (mut world, catalog) = new_world();
        place_player(&mut world, 2, 2);
        world.hazards.clear();

        update_player(&mut world, &catalog);
        assert_eq!(world.player.points, GemColor::Green.points());
        assert_eq!(world.player.gems.green, 1);
        assert!(!world.items[1].is_collectible());
        assert!(world.events.contains(&GameEvent::Sound(SoundCue::CollectGem)));

        // Standing still doesn't collect twice
        update_player(&mut world, &catalog);
        assert_eq!(world.player.points, GemColor::Green.points());
    }

    #[test]
    fn test_star_reveals_key_and_grants_life() {
        let (mut world, catalog) = new_world();
        place_player(&mut world, 0, 2); // star on a safe tile
        world.hazards.clear();

        update_player(&mut world, &catalog);
        assert_eq!(world.player.stars, 1);
        assert_eq!(world.player.lives, 6);
        assert!(world.key_available());
        assert!(world.events.contains(&GameEvent::KeyRevealed));
        // Safe tile kept the player alive on the top row
        assert_eq!(world.player.pos(), cell_to_world(0, 2));
    }

    #[test]
    fn test_top_row_without_tile_is_lethal() {
        let (mut world, catalog) = new_world();
        place_player(&mut world, 0, 0);
        world.hazards.clear();

        update_player(&mut world, &catalog);
        assert_eq!(world.player.lives, 4);
        assert_eq!(world.player.pos(), world.player.spawn);
    }

    #[test]
    fn test_key_advances_level() {
        let (mut world, catalog) = new_world();
        world.hazards.clear();
        world.reveal_key();
        place_player(&mut world, 5, 0);

        update_player(&mut world, &catalog);
        assert_eq!(world.player.level, 2);
        assert_eq!(world.player.keys, 1);
        assert_eq!(world.player.star_quota, 3);
        assert_eq!(world.obstacles.len(), 4);
        assert!(world.events.contains(&GameEvent::Sound(SoundCue::ClearLevel)));
        assert!(world.events.contains(&GameEvent::LevelStarted { level: 2 }));
    }

    #[test]
    fn test_hazards_update_before_player() {
        let (mut world, catalog) = new_world();
        // Bug one cell left of the player, moving 100 px/s
        world.hazards = vec![Entity::hazard(5, 1, 1.0)];
        world.items.clear();

        // A stationary check at the old position would miss
        assert!(!world.hazards[0].intersects(&world.player.entity));
        let outcome = tick(&mut world, &catalog, &TickInput::default(), 0.5);
        assert_eq!(outcome, TickOutcome::Updated);
        assert_eq!(world.player.lives, 4);
    }

    #[test]
    fn test_move_into_hazard_same_tick() {
        let (mut world, catalog) = new_world();
        world.hazards = vec![Entity::hazard(4, 3, 0.0)];
        world.obstacles = vec![Entity::rock(4, 2)];

        // Blocked by the rock: no move, no death
        tick(&mut world, &catalog, &TickInput::single(Direction::Up), 0.016);
        assert_eq!(world.player.cell(), (5, 2));
        assert_eq!(world.player.lives, 5);

        // Sidestep, then step up into the bug
        tick(&mut world, &catalog, &TickInput::single(Direction::Right), 0.016);
        tick(&mut world, &catalog, &TickInput::single(Direction::Up), 0.016);
        assert_eq!(world.player.lives, 4);
        assert_eq!(world.player.pos(), world.player.spawn);
    }

    #[test]
    fn test_game_over_restarts_next_tick() {
        let (mut world, catalog) = new_world();
        world.player.lives = 0;
        world.player.points = 55;
        world.player.level = 3;

        let outcome = tick(&mut world, &catalog, &TickInput::default(), 0.016);
        assert_eq!(outcome, TickOutcome::GameOver);
        assert_eq!(world.player.lives, 5);
        assert_eq!(world.player.level, 1);
        assert_eq!(world.player.points, 0);
        assert!(world.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_victory_policies() {
        let (mut world, catalog) = new_world();
        world.player.level = catalog.last_level() + 1;
        assert_eq!(
            tick(&mut world, &catalog, &TickInput::default(), 0.016),
            TickOutcome::Won
        );
        assert_eq!(world.player.level, 1);

        let (world, catalog) = new_world();
        let mut world = world.with_victory(VictoryPolicy::Halt);
        world.player.level = catalog.last_level() + 1;
        for _ in 0..3 {
            assert_eq!(
                tick(&mut world, &catalog, &TickInput::default(), 0.016),
                TickOutcome::Won
            );
        }
        assert_eq!(world.player.level, catalog.last_level() + 1);
        assert_eq!(world.ticks, 0);
    }

    #[test]
    fn test_determinism() {
        let (mut a, catalog) = new_world();
        let (mut b, _) = new_world();
        let inputs = [
            TickInput::single(Direction::Up),
            TickInput::default(),
            TickInput::single(Direction::Left),
            TickInput::single(Direction::Up),
            TickInput::default(),
        ];
        for input in inputs.iter().cycle().take(300) {
            tick(&mut a, &catalog, input, 1.0 / 60.0);
            tick(&mut b, &catalog, input, 1.0 / 60.0);
        }
        assert_eq!(a.player.pos(), b.player.pos());
        assert_eq!(a.player.lives, b.player.lives);
        assert_eq!(a.hazards, b.hazards);
    }
}
