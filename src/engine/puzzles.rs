use tracing::info;

use crate::engine::helpers::{award, open_exits, text_or};
use crate::engine::output::{Outcome, OutcomeKind};
use crate::world::{RoomId, Solution, World, solution_matches};

/// Uses a carried item on whatever obstacle the room holds.
///
/// A use is spent whether or not it solves anything. While the room's puzzle is
/// active it is the only thing the item can resolve; the monster is tried only once
/// the puzzle is out of the way.
pub fn handle_use(world: &mut World, item_name: &str) -> Outcome {
    let room = world.player.room;

    let Some(item) = world.player.carried_mut(item_name) else {
        return Outcome::failure(OutcomeKind::NotCarried, room)
            .with_text("You aren't carrying that.");
    };
    if !item.use_once() {
        return Outcome::failure(OutcomeKind::NoUsesLeft, room)
            .with_text(format!("The {} has no uses left.", item.name));
    }
    let (name, use_text) = (item.name.clone(), item.use_text.clone());

    let fits_puzzle = world.active_puzzle(room).is_some_and(|p| match &p.solution {
        Solution::Item(s) => solution_matches(s, &name),
        Solution::Answer(_) => false,
    });
    if fits_puzzle {
        let mut outcome = Outcome::success(OutcomeKind::Solved, room)
            .with_text(format!("You use the {}.", name));
        resolve_puzzle(world, room, &mut outcome);
        return outcome;
    }

    let fits_monster = world.active_puzzle(room).is_none()
        && world
            .active_monster(room)
            .is_some_and(|m| solution_matches(&m.solution, &name));
    if fits_monster {
        let mut outcome = Outcome::success(OutcomeKind::Solved, room)
            .with_text(format!("You use the {}.", name));
        resolve_monster(world, room, &name, &mut outcome);
        return outcome;
    }

    let fallback = format!("You use the {}, but nothing happens.", name);
    let text = text_or(&use_text, &fallback).to_string();

    if world.active_puzzle(room).is_none() && world.active_monster(room).is_none() {
        return Outcome::failure(OutcomeKind::NoActivePuzzle, room)
            .with_text(text)
            .with_text("There is no active puzzle here.");
    }
    Outcome::failure(OutcomeKind::Used, room).with_text(text)
}

/// Typed answer to the room's puzzle.
pub fn handle_answer(world: &mut World, answer: &str) -> Outcome {
    let room = world.player.room;

    let Some(puzzle) = world.active_puzzle(room) else {
        return Outcome::failure(OutcomeKind::NoActivePuzzle, room)
            .with_text("There is no active puzzle here to answer.");
    };

    if !puzzle.solution.is_answer() {
        return Outcome::failure(OutcomeKind::RequiresItem, room).with_text(format!(
            "The {} requires using an item, not an answer.",
            puzzle.name
        ));
    }

    if !puzzle.solution.matches(answer) {
        return Outcome::failure(OutcomeKind::WrongAnswer, room).with_text(format!(
            "That is incorrect. The {} remains unsolved.",
            puzzle.name
        ));
    }

    let mut outcome = Outcome::success(OutcomeKind::Solved, room);
    resolve_puzzle(world, room, &mut outcome);
    outcome
}

fn resolve_puzzle(world: &mut World, room: RoomId, outcome: &mut Outcome) {
    let Some(puzzle) = world.active_puzzle_mut(room) else {
        return;
    };
    if !puzzle.solve() {
        return;
    }

    let fallback = format!("You solved the {}!", puzzle.name);
    outcome.say(text_or(&puzzle.effect, &fallback).to_string());
    let (name, points) = (puzzle.name.clone(), puzzle.points);

    info!(puzzle = %name, room, "puzzle solved");
    award(world, outcome, points);
    open_exits(world, room, outcome);
}

fn resolve_monster(world: &mut World, room: RoomId, item: &str, outcome: &mut Outcome) {
    let Some(monster) = world.active_monster_mut(room) else {
        return;
    };
    monster.defeat();

    outcome.defeated = true;
    outcome.say(format!("The {} is defeated by the {}!", monster.name, item));
    let (name, points) = (monster.name.clone(), monster.points);

    info!(monster = %name, room, "monster defeated by item");
    award(world, outcome, points);
    open_exits(world, room, outcome);
}
