use tracing::info;

use crate::engine::helpers::{award, open_exits};
use crate::engine::output::{Outcome, OutcomeKind};
use crate::rng::GameRng;
use crate::world::World;

/// The active monster in the player's room strikes once, if it can.
pub fn monster_strikes(world: &mut World, outcome: &mut Outcome) {
    let room = world.player.room;
    let Some(monster) = world.active_monster(room).filter(|m| m.will_attack()) else {
        return;
    };

    let text = if monster.attack_text.trim().is_empty() {
        format!("The {} attacks you!", monster.name)
    } else {
        monster.attack_text.trim().to_string()
    };
    let name = monster.name.clone();
    let damage = monster.damage;

    let taken = world.player.suffer(damage);
    outcome.damage_taken += taken;
    outcome.event(text);
    outcome.event(format!(
        "You take {} damage. Health: {} ({}).",
        taken,
        world.player.health,
        world.player.health_status()
    ));
    info!(monster = %name, taken, health = world.player.health, "monster attacked player");
}

/// Exchange of blows: the player strikes first, then a surviving monster retaliates.
pub fn handle_attack(world: &mut World, rng: &mut GameRng) -> Outcome {
    let room = world.player.room;

    let Some(key) = world
        .active_monster(room)
        .and_then(|_| world.room(room))
        .and_then(|r| r.monster.clone())
    else {
        return Outcome::failure(OutcomeKind::NothingToAttack, room)
            .with_text("There is nothing here to attack.");
    };

    let mut outcome = Outcome::success(OutcomeKind::Attacked, room);

    let World {
        player, monsters, ..
    } = &mut *world;
    let Some(monster) = monsters.get_mut(&key) else {
        return Outcome::failure(OutcomeKind::NothingToAttack, room)
            .with_text("There is nothing here to attack.");
    };
    let result = player.attack(monster, rng);
    let (name, points) = (monster.name.clone(), monster.points);

    outcome.damage_dealt = result.damage;
    outcome.critical = result.critical;
    outcome.defeated = result.defeated;

    if result.critical {
        outcome.say("A critical hit!");
    }
    outcome.say(format!(
        "You strike the {} for {} damage.",
        name, result.damage
    ));

    if result.defeated {
        info!(monster = %name, "monster defeated in combat");
        outcome.say(format!("The {} is defeated!", name));
        award(world, &mut outcome, points);
        open_exits(world, room, &mut outcome);
    } else {
        outcome.say(format!(
            "The {} has {} health left.",
            name, result.health_remaining
        ));
        monster_strikes(world, &mut outcome);
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Direction, ExitOutcome, load_world_from_str};

    const ARENA: &str = r#"
        [world]
        id = "arena"
        name = "Arena"
        start_room = 1

        [rules]
        critical_chance_percent = 0

        [[room]]
        id = 1
        name = "Pit"
        east = -2
        monster = "Ogre"

        [[room]]
        id = 2
        name = "Gate"

        [[monster]]
        name = "Ogre"
        damage = 7
        attack_text = "The ogre swings its club."
        points = 50
        health = 20
    "#;

    fn arena() -> World {
        load_world_from_str(ARENA).unwrap()
    }

    #[test]
    fn exchange_until_defeat() {
        let mut w = arena();
        let mut rng = GameRng::new(9);

        let first = handle_attack(&mut w, &mut rng);
        assert_eq!(first.kind, OutcomeKind::Attacked);
        assert_eq!(first.damage_dealt, 10);
        assert_eq!(first.damage_taken, 7);
        assert!(!first.defeated);
        assert_eq!(w.player.health, 93);

        let second = handle_attack(&mut w, &mut rng);
        assert!(second.defeated);
        assert_eq!(second.damage_taken, 0);
        assert_eq!(second.points_awarded, 50);
        assert_eq!(w.player.score, 50);
        assert_eq!(w.resolve_exit(1, Direction::East), ExitOutcome::Open(2));

        let third = handle_attack(&mut w, &mut rng);
        assert_eq!(third.kind, OutcomeKind::NothingToAttack);
        assert!(!third.success);
        assert_eq!(w.player.score, 50);
    }

    #[test]
    fn passive_monster_never_strikes() {
        let mut w = arena();
        w.monsters.get_mut("ogre").unwrap().can_attack = false;
        let mut out = Outcome::success(OutcomeKind::Looked, 1);
        monster_strikes(&mut w, &mut out);
        assert_eq!(out.damage_taken, 0);
        assert_eq!(w.player.health, 100);
    }
}
