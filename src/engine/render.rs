use crate::engine::helpers::text_or;
use crate::engine::output::Output;
use crate::world::{ExitCode, World};

/// Writes what the player sees in their current room.
///
/// An active puzzle that affects its target hides the room description behind its
/// effect text. Otherwise an active monster does the same with its own effect.
pub fn render_room(out: &mut Output, world: &World) {
    let Some(room) = world.current_room() else {
        out.say(format!(
            "Error: you are in an unknown room '{}'",
            world.player.room
        ));
        return;
    };

    out.title(room.name.clone());

    let puzzle = world
        .active_puzzle(room.id)
        .filter(|p| p.affects_target);
    let monster = world.active_monster(room.id);

    match (puzzle, monster) {
        (Some(p), _) => out.say(text_or(&p.effect, &p.desc)),
        (None, Some(m)) => out.say(text_or(&m.effect, &m.desc)),
        (None, None) => out.say(room.desc.trim()),
    }

    if !room.items.is_empty() {
        let names = room
            .items
            .iter()
            .map(|i| i.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        out.say(format!("You see: {}.", names));
    }

    let fixtures = room
        .fixtures
        .iter()
        .filter_map(|f| world.fixtures.get(f))
        .map(|f| f.name.as_str())
        .collect::<Vec<_>>();
    if !fixtures.is_empty() {
        out.say(format!("You notice: {}.", fixtures.join(", ")));
    }

    let dirs = room
        .exits
        .iter()
        .filter(|(_, code)| *code != ExitCode::Wall)
        .map(|(d, _)| d.name())
        .collect::<Vec<_>>();

    if dirs.is_empty() {
        out.set_exits("Exits: (none)");
    } else {
        out.set_exits(format!("Exits: {}", dirs.join(", ")));
    }
}
