use std::collections::HashSet;

use super::model::{ExitCode, World, name_key};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub message: String,
}

impl ValidationError {
    fn new(msg: impl Into<String>) -> Self {
        ValidationError {
            message: msg.into(),
        }
    }
}

pub fn validate_world(world: &World) -> Vec<ValidationError> {
    let mut errors: Vec<ValidationError> = Vec::new();

    if world.rooms.is_empty() {
        errors.push(ValidationError::new("world has no rooms"));
    }

    if !world.rooms.contains_key(&world.start_room) {
        errors.push(ValidationError::new(format!(
            "start_room {} not found among rooms",
            world.start_room
        )));
    }

    if !world.rooms.contains_key(&world.player.room) {
        errors.push(ValidationError::new(format!(
            "player is in missing room {}",
            world.player.room
        )));
    }

    let mut seen_items: HashSet<String> = HashSet::new();

    for (room_id, room) in &world.rooms {
        for (dir, code) in room.exits.iter() {
            match code {
                ExitCode::Wall => {}
                ExitCode::Open(target) if !world.rooms.contains_key(&target) => {
                    errors.push(ValidationError::new(format!(
                        "room {} exit {} targets missing room {}",
                        room_id, dir, target
                    )));
                }
                ExitCode::Blocked(target) if !world.rooms.contains_key(&target) => {
                    errors.push(ValidationError::new(format!(
                        "room {} blocked exit {} would open onto missing room {}",
                        room_id, dir, target
                    )));
                }
                _ => {}
            }
        }

        for fixture in &room.fixtures {
            if !world.fixtures.contains_key(fixture) {
                errors.push(ValidationError::new(format!(
                    "room {} references missing fixture '{}'",
                    room_id, fixture
                )));
            }
        }

        if let Some(p) = &room.puzzle {
            if !world.puzzles.contains_key(p) {
                errors.push(ValidationError::new(format!(
                    "room {} references missing puzzle '{}'",
                    room_id, p
                )));
            }
        }

        if let Some(m) = &room.monster {
            if !world.monsters.contains_key(m) {
                errors.push(ValidationError::new(format!(
                    "room {} references missing monster '{}'",
                    room_id, m
                )));
            }
        }

        for item in &room.items {
            if !seen_items.insert(name_key(&item.name)) {
                errors.push(ValidationError::new(format!(
                    "item '{}' appears in more than one place",
                    item.name
                )));
            }
        }
    }

    for item in world.rooms.values().flat_map(|r| &r.items).chain(&world.player.inventory) {
        if item.uses_remaining > item.max_uses {
            errors.push(ValidationError::new(format!(
                "item '{}' has {} uses remaining but only {} max",
                item.name, item.uses_remaining, item.max_uses
            )));
        }
    }

    for item in &world.player.inventory {
        if !seen_items.insert(name_key(&item.name)) {
            errors.push(ValidationError::new(format!(
                "item '{}' appears in more than one place",
                item.name
            )));
        }
    }

    if world.player.inventory_weight() > world.player.max_weight {
        errors.push(ValidationError::new(format!(
            "starting inventory weighs {} but the limit is {}",
            world.player.inventory_weight(),
            world.player.max_weight
        )));
    }

    if world.player.health > world.player.max_health {
        errors.push(ValidationError::new(format!(
            "player health {} exceeds max {}",
            world.player.health, world.player.max_health
        )));
    }

    for fixture in world.fixtures.values() {
        if let Some(p) = &fixture.puzzle {
            if !world.puzzles.contains_key(p) {
                errors.push(ValidationError::new(format!(
                    "fixture '{}' references missing puzzle '{}'",
                    fixture.name, p
                )));
            }
        }
    }

    for monster in world.monsters.values() {
        if monster.health > monster.max_health {
            errors.push(ValidationError::new(format!(
                "monster '{}' health {} exceeds max {}",
                monster.name, monster.health, monster.max_health
            )));
        }
        if monster.active && monster.health == 0 {
            errors.push(ValidationError::new(format!(
                "monster '{}' is active with no health",
                monster.name
            )));
        }
    }

    for (label, target) in world
        .puzzles
        .values()
        .map(|p| (&p.name, p.target))
        .chain(world.monsters.values().map(|m| (&m.name, m.target)))
    {
        if let Some(t) = target {
            if !world.rooms.contains_key(&t) {
                errors.push(ValidationError::new(format!(
                    "'{}' targets missing room {}",
                    label, t
                )));
            }
        }
    }

    errors
}
