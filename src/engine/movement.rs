use tracing::{error, info};

use crate::engine::combat::monster_strikes;
use crate::engine::helpers::text_or;
use crate::engine::output::{Outcome, OutcomeKind};
use crate::engine::render::render_room;
use crate::world::{Direction, ExitOutcome, Obstacle, World};

/// Walks through an exit. Bumping a wall changes nothing. A blocked exit leaves the
/// player in place, where any active monster gets a free swing; entering a monster's
/// room does the same.
pub fn handle_move(world: &mut World, dir: Direction) -> Outcome {
    let from = world.player.room;

    let mut outcome = match world.resolve_exit(from, dir) {
        ExitOutcome::Wall => {
            return Outcome::failure(OutcomeKind::Wall, from)
                .with_text(format!("You can't go {}; there is a wall in the way.", dir));
        }
        ExitOutcome::Blocked(obstacle) => Outcome::failure(OutcomeKind::Blocked, from)
            .with_text(blocked_text(world, dir, &obstacle)),
        ExitOutcome::Open(target) if world.room(target).is_none() => {
            // The validator rejects worlds like this; only a hand-edited World gets here.
            error!(from, target, %dir, "exit leads to a missing room");
            return Outcome::failure(OutcomeKind::Blocked, from).with_text(format!(
                "You try to go {}, but something feels wrong (room not found).",
                dir
            ));
        }
        ExitOutcome::Open(target) => {
            world.player.room = target;
            info!(from, to = target, %dir, "player moved");

            let mut outcome = Outcome::success(OutcomeKind::Moved, target)
                .with_text(format!("You go {}.", dir));
            render_room(&mut outcome.output, world);

            if let Some(p) = world.active_puzzle(target).filter(|p| p.affects_player) {
                outcome.event(text_or(&p.effect, &p.desc).to_string());
            }
            outcome
        }
    };

    monster_strikes(world, &mut outcome);
    outcome.room = world.player.room;
    outcome
}

fn blocked_text(world: &World, dir: Direction, obstacle: &Obstacle) -> String {
    let room = world.player.room;
    let text = match obstacle {
        Obstacle::Puzzle(name) => {
            let desc = world
                .active_puzzle(room)
                .map(|p| p.desc.trim().to_string())
                .unwrap_or_default();
            format!("The way {} is blocked by {}. {}", dir, name, desc)
        }
        Obstacle::Monster(name) => {
            let desc = world
                .active_monster(room)
                .map(|m| m.desc.trim().to_string())
                .unwrap_or_default();
            format!("The way {} is blocked by the {}. {}", dir, name, desc)
        }
        Obstacle::Unknown => format!("The path {} is blocked.", dir),
    };
    text.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::load_world_from_str;

    const HALL: &str = r#"
        [world]
        id = "hall"
        name = "Hall"
        start_room = 1

        [[room]]
        id = 1
        name = "Start"
        desc = "A bare hall."
        north = 2
        south = "-2"
        puzzle = "Lock"

        [[room]]
        id = 2
        name = "Next"
        desc = "A side room."
        south = 1
        west = -3
        monster = "Wolf"

        [[room]]
        id = 3
        name = "Den"

        [[puzzle]]
        name = "Lock"
        desc = "A locked door"
        solution = "key"

        [[monster]]
        name = "Wolf"
        desc = "A grey wolf bares its teeth."
        damage = 12
        health = 30
    "#;

    #[test]
    fn wall_and_blocked_keep_player_in_place() {
        let mut w = load_world_from_str(HALL).unwrap();
        let o = handle_move(&mut w, Direction::East);
        assert_eq!(o.kind, OutcomeKind::Wall);
        assert!(o.message().contains("wall"));
        assert_eq!(w.player.room, 1);

        let o = handle_move(&mut w, Direction::South);
        assert_eq!(o.kind, OutcomeKind::Blocked);
        assert!(o.message().contains("Lock"));
        assert!(o.message().contains("blocked"));
        assert_eq!(w.player.room, 1);
    }

    #[test]
    fn entering_monster_room_draws_an_attack() {
        let mut w = load_world_from_str(HALL).unwrap();
        let o = handle_move(&mut w, Direction::North);
        assert!(o.success);
        assert_eq!(o.room, 2);
        assert_eq!(o.damage_taken, 12);
        assert_eq!(w.player.health, 88);
        assert!(o.message().contains("grey wolf"));
    }

    #[test]
    fn blocked_by_monster_strikes_again() {
        let mut w = load_world_from_str(HALL).unwrap();
        handle_move(&mut w, Direction::North);
        let o = handle_move(&mut w, Direction::West);
        assert_eq!(o.kind, OutcomeKind::Blocked);
        assert!(o.message().contains("Wolf"));
        assert_eq!(o.damage_taken, 12);
        assert_eq!(w.player.health, 76);
        assert_eq!(w.player.room, 2);
    }

    #[test]
    fn wall_bump_in_monster_room_changes_nothing() {
        let mut w = load_world_from_str(HALL).unwrap();
        handle_move(&mut w, Direction::North);
        assert_eq!(w.player.health, 88);

        let o = handle_move(&mut w, Direction::East);
        assert_eq!(o.kind, OutcomeKind::Wall);
        assert!(!o.success);
        assert_eq!(o.damage_taken, 0);
        assert_eq!(w.player.health, 88);
        assert_eq!(w.player.room, 2);
        assert!(!o.message().contains("grey wolf"));
    }
}
