use tracing::info;

use crate::engine::output::Outcome;
use crate::world::{Direction, RoomId, World};

/// The trimmed preferred text, or the fallback when it is blank.
pub fn text_or<'a>(preferred: &'a str, fallback: &'a str) -> &'a str {
    if preferred.trim().is_empty() {
        fallback.trim()
    } else {
        preferred.trim()
    }
}

pub fn award(world: &mut World, outcome: &mut Outcome, points: u32) {
    if points == 0 {
        return;
    }
    world.player.add_score(points);
    outcome.points_awarded += points;
    outcome.event(format!(
        "You gain {} points. Score: {}.",
        points, world.player.score
    ));
}

/// Opens the room's blocked exits once no active obstacle is left in it.
///
/// Obstacles with a target only release the exit leading there; an obstacle
/// without one releases every blocked exit.
pub fn open_exits(world: &mut World, room: RoomId, outcome: &mut Outcome) {
    if world.active_puzzle(room).is_some() || world.active_monster(room).is_some() {
        return;
    }
    let Some(r) = world.room(room) else {
        return;
    };

    let targets: Vec<Option<RoomId>> = r
        .puzzle
        .iter()
        .filter_map(|k| world.puzzles.get(k))
        .map(|p| p.target)
        .chain(
            r.monster
                .iter()
                .filter_map(|k| world.monsters.get(k))
                .map(|m| m.target),
        )
        .collect();

    let opened: Vec<Direction> = if targets.is_empty() || targets.contains(&None) {
        world.unlock_exits(room, None)
    } else {
        targets
            .into_iter()
            .flatten()
            .flat_map(|t| world.unlock_exits(room, Some(t)))
            .collect()
    };
    if opened.is_empty() {
        return;
    }

    let dirs = opened
        .iter()
        .map(|d| d.name())
        .collect::<Vec<_>>()
        .join(", ");
    info!(room, %dirs, "exits unlocked");
    outcome.event(format!("The way {} is now open.", dirs));
}
