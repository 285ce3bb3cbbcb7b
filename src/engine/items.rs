use tracing::debug;

use crate::engine::helpers::{award, text_or};
use crate::engine::output::{Outcome, OutcomeKind};
use crate::world::{Found, World, name_key};

pub fn handle_inventory(world: &World) -> Outcome {
    let player = &world.player;
    let mut outcome = Outcome::success(OutcomeKind::Inventory, player.room);

    if player.inventory.is_empty() {
        outcome.say(format!(
            "You are carrying nothing. (0/{} weight)",
            player.max_weight
        ));
        return outcome;
    }

    outcome.say(format!(
        "You are carrying ({}/{} weight):",
        player.inventory_weight(),
        player.max_weight
    ));
    for item in &player.inventory {
        outcome.say(format!(
            "  {} (weight {}, uses left {})",
            item.name, item.weight, item.uses_remaining
        ));
    }
    outcome
}

pub fn handle_take(world: &mut World, target_name: &str) -> Outcome {
    let room_id = world.player.room;

    let Some(item) = world
        .room(room_id)
        .and_then(|r| r.items.iter().find(|i| i.is_named(target_name)))
    else {
        let is_fixture = world.room(room_id).is_some_and(|r| {
            r.fixtures
                .iter()
                .filter_map(|f| world.fixtures.get(f))
                .any(|f| name_key(&f.name) == name_key(target_name))
        });
        let text = if is_fixture {
            format!("The {} can't be carried.", target_name.trim())
        } else {
            "You don't see that here.".to_string()
        };
        return Outcome::failure(OutcomeKind::NotHere, room_id).with_text(text);
    };

    if !world.player.can_carry(item) {
        return Outcome::failure(OutcomeKind::TooHeavy, room_id).with_text(format!(
            "The {} is too heavy. You are carrying {}/{} weight.",
            item.name,
            world.player.inventory_weight(),
            world.player.max_weight
        ));
    }

    if world.player.carried(&item.name).is_some() {
        return Outcome::failure(OutcomeKind::NotHere, room_id)
            .with_text("You are already carrying something by that name.");
    }

    let name = item.name.clone();
    let Some(item) = world.remove_item(room_id, &name) else {
        return Outcome::failure(OutcomeKind::NotHere, room_id)
            .with_text("You don't see that here.");
    };
    let points = if item.scored { 0 } else { item.points };

    if let Err(item) = world.player.add_to_inventory(item) {
        let _ = world.place_item(room_id, item);
        return Outcome::failure(OutcomeKind::TooHeavy, room_id)
            .with_text(format!("You can't carry the {}.", name));
    }
    if let Some(carried) = world.player.carried_mut(&name) {
        carried.scored = true;
    }

    let mut outcome = Outcome::success(OutcomeKind::Taken, room_id);
    debug!(item = %name, room = room_id, "item taken");
    outcome.say(format!("You take the {}.", name));
    award(world, &mut outcome, points);
    outcome
}

pub fn handle_drop(world: &mut World, target_name: &str) -> Outcome {
    let room_id = world.player.room;

    let Some(item) = world.player.remove_from_inventory(target_name) else {
        return Outcome::failure(OutcomeKind::NotCarried, room_id)
            .with_text("You aren't carrying that.");
    };

    let name = item.name.clone();
    if let Err(item) = world.place_item(room_id, item) {
        world.player.inventory.push(item);
        return Outcome::failure(OutcomeKind::NotCarried, room_id)
            .with_text(format!("There is no room to drop the {} here.", name));
    }

    debug!(item = %name, room = room_id, "item dropped");
    Outcome::success(OutcomeKind::Dropped, room_id).with_text(format!("You drop the {}.", name))
}

/// Describes the first thing answering to the name: carried item, room item,
/// fixture, active monster, then active puzzle.
pub fn handle_examine(world: &World, target_name: &str) -> Outcome {
    let room_id = world.player.room;

    let Some(found) = world.find(room_id, target_name) else {
        return Outcome::failure(OutcomeKind::NotFound, room_id)
            .with_text("You see nothing like that here.");
    };

    let mut outcome = Outcome::success(OutcomeKind::Examined, room_id);
    match found {
        Found::Carried(item) | Found::RoomItem(item) => {
            let fallback = format!("You see nothing special about the {}.", item.name);
            outcome.say(text_or(&item.desc, &fallback).to_string());
            outcome.say(format!(
                "Weight {}, uses left {}/{}.",
                item.weight, item.uses_remaining, item.max_uses
            ));
        }
        Found::Fixture(fixture) => {
            let fallback = format!("You see nothing special about the {}.", fixture.name);
            outcome.say(text_or(&fixture.desc, &fallback).to_string());
            if let Some(p) = fixture
                .puzzle
                .as_ref()
                .and_then(|k| world.puzzles.get(k))
                .filter(|p| p.active)
            {
                outcome.say(p.desc.trim());
            }
        }
        Found::Monster(monster) => {
            outcome.say(monster.desc.trim());
            outcome.say(format!(
                "It has {}/{} health.",
                monster.health, monster.max_health
            ));
        }
        Found::Puzzle(puzzle) => {
            outcome.say(puzzle.desc.trim());
        }
    }
    outcome
}
