//! Exit resolution, item placement and name lookup over the room table.

use super::model::{
    Direction, ExitCode, Fixture, Item, Monster, Puzzle, Room, RoomId, World, name_key,
};

/// What stands in the way of a blocked exit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Obstacle {
    Puzzle(String),
    Monster(String),
    /// Blocked, but nothing active in the room explains why.
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitOutcome {
    Open(RoomId),
    Wall,
    Blocked(Obstacle),
}

/// Something in a room (or carried) that answers to a name.
pub enum Found<'a> {
    Carried(&'a Item),
    RoomItem(&'a Item),
    Fixture(&'a Fixture),
    Monster(&'a Monster),
    Puzzle(&'a Puzzle),
}

impl World {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(&id)
    }

    pub fn current_room(&self) -> Option<&Room> {
        self.rooms.get(&self.player.room)
    }

    pub fn resolve_exit(&self, room_id: RoomId, dir: Direction) -> ExitOutcome {
        let Some(room) = self.room(room_id) else {
            return ExitOutcome::Wall;
        };

        match room.exits.get(dir) {
            ExitCode::Wall => ExitOutcome::Wall,
            ExitCode::Open(target) => ExitOutcome::Open(target),
            ExitCode::Blocked(_) => {
                let obstacle = if let Some(p) = self.active_puzzle(room_id) {
                    Obstacle::Puzzle(p.name.clone())
                } else if let Some(m) = self.active_monster(room_id) {
                    Obstacle::Monster(m.name.clone())
                } else {
                    Obstacle::Unknown
                };
                ExitOutcome::Blocked(obstacle)
            }
        }
    }

    pub fn active_puzzle(&self, room_id: RoomId) -> Option<&Puzzle> {
        let key = self.room(room_id)?.puzzle.as_ref()?;
        self.puzzles.get(key).filter(|p| p.active)
    }

    pub fn active_monster(&self, room_id: RoomId) -> Option<&Monster> {
        let key = self.room(room_id)?.monster.as_ref()?;
        self.monsters.get(key).filter(|m| m.active)
    }

    pub fn active_puzzle_mut(&mut self, room_id: RoomId) -> Option<&mut Puzzle> {
        let key = self.rooms.get(&room_id)?.puzzle.as_ref()?;
        self.puzzles.get_mut(key).filter(|p| p.active)
    }

    pub fn active_monster_mut(&mut self, room_id: RoomId) -> Option<&mut Monster> {
        let key = self.rooms.get(&room_id)?.monster.as_ref()?;
        self.monsters.get_mut(key).filter(|m| m.active)
    }

    /// Puts the item on the floor. A same-named item already there bounces it back.
    pub fn place_item(&mut self, room_id: RoomId, item: Item) -> Result<(), Item> {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Err(item);
        };
        if room.items.iter().any(|i| i.is_named(&item.name)) {
            return Err(item);
        }
        room.items.push(item);
        Ok(())
    }

    pub fn remove_item(&mut self, room_id: RoomId, name: &str) -> Option<Item> {
        let room = self.rooms.get_mut(&room_id)?;
        let idx = room.items.iter().position(|i| i.is_named(name))?;
        Some(room.items.remove(idx))
    }

    /// Examine order: carried item, room item, fixture, active monster, active puzzle.
    pub fn find(&self, room_id: RoomId, name: &str) -> Option<Found<'_>> {
        if let Some(item) = self.player.carried(name) {
            return Some(Found::Carried(item));
        }

        let room = self.room(room_id)?;
        let key = name_key(name);

        if let Some(item) = room.items.iter().find(|i| i.is_named(name)) {
            return Some(Found::RoomItem(item));
        }

        if let Some(fixture) = room
            .fixtures
            .iter()
            .filter_map(|f| self.fixtures.get(f))
            .find(|f| name_key(&f.name) == key)
        {
            return Some(Found::Fixture(fixture));
        }

        if let Some(m) = self.active_monster(room_id).filter(|m| name_key(&m.name) == key) {
            return Some(Found::Monster(m));
        }

        self.active_puzzle(room_id)
            .filter(|p| name_key(&p.name) == key)
            .map(Found::Puzzle)
    }

    /// Opens the room's blocked exits once its obstacle is gone.
    /// With a target only exits blocked toward that room open.
    /// Returns the directions that opened.
    pub fn unlock_exits(&mut self, room_id: RoomId, target: Option<RoomId>) -> Vec<Direction> {
        let Some(room) = self.rooms.get_mut(&room_id) else {
            return Vec::new();
        };

        let mut opened = Vec::new();
        for (dir, code) in room.exits.iter().collect::<Vec<_>>() {
            if let ExitCode::Blocked(to) = code {
                if target.is_none_or(|t| t == to) {
                    room.exits.set(dir, ExitCode::Open(to));
                    opened.push(dir);
                }
            }
        }
        opened
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::load_world_from_str;

    const WORLD: &str = r#"
        [world]
        id = "graph"
        name = "Graph"
        start_room = 1

        [[room]]
        id = 1
        name = "Start"
        north = 2
        south = -2
        east = "-3"
        items = ["key"]
        fixtures = ["Statue"]
        puzzle = "Lock"
        monster = "Bat"

        [[room]]
        id = 2
        name = "Next"
        south = 1

        [[room]]
        id = 3
        name = "Side"

        [[item]]
        name = "key"
        weight = 1

        [[fixture]]
        name = "Statue"
        desc = "A stone statue."

        [[puzzle]]
        name = "Lock"
        desc = "A locked door"
        solution = "key"
        target = 2

        [[monster]]
        name = "Bat"
        desc = "A bat."
        solution = "net"
        health = 5
    "#;

    fn world() -> World {
        load_world_from_str(WORLD).unwrap()
    }

    #[test]
    fn exit_kinds() {
        let w = world();
        assert_eq!(w.resolve_exit(1, Direction::North), ExitOutcome::Open(2));
        assert_eq!(w.resolve_exit(1, Direction::West), ExitOutcome::Wall);
        assert_eq!(
            w.resolve_exit(1, Direction::South),
            ExitOutcome::Blocked(Obstacle::Puzzle("Lock".into()))
        );
    }

    #[test]
    fn monster_blocks_after_puzzle_solved() {
        let mut w = world();
        w.active_puzzle_mut(1).unwrap().solve();
        assert_eq!(
            w.resolve_exit(1, Direction::East),
            ExitOutcome::Blocked(Obstacle::Monster("Bat".into()))
        );
        w.active_monster_mut(1).unwrap().defeat();
        assert_eq!(
            w.resolve_exit(1, Direction::East),
            ExitOutcome::Blocked(Obstacle::Unknown)
        );
    }

    #[test]
    fn unlock_respects_target() {
        let mut w = world();
        assert_eq!(w.unlock_exits(1, Some(2)), vec![Direction::South]);
        assert_eq!(w.resolve_exit(1, Direction::South), ExitOutcome::Open(2));
        assert_eq!(
            w.room(1).unwrap().exits.get(Direction::East),
            ExitCode::Blocked(3)
        );
        assert_eq!(w.unlock_exits(1, None), vec![Direction::East]);
    }

    #[test]
    fn place_and_remove_items() {
        let mut w = world();
        assert!(w.remove_item(1, "nothing").is_none());
        let key = w.remove_item(1, "KEY").unwrap();
        assert!(w.room(1).unwrap().items.is_empty());
        w.place_item(2, key).unwrap();
        assert_eq!(w.room(2).unwrap().items[0].name, "key");
    }

    #[test]
    fn find_follows_examine_order() {
        let w = world();
        assert!(matches!(w.find(1, "statue"), Some(Found::Fixture(_))));
        assert!(matches!(w.find(1, "KEY"), Some(Found::RoomItem(_))));
        assert!(matches!(w.find(1, "bat"), Some(Found::Monster(_))));
        assert!(matches!(w.find(1, "lock"), Some(Found::Puzzle(_))));
        assert!(w.find(1, "dragon").is_none());
    }
}
