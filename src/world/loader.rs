use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use super::model::{
    Exits, ExitCode, Fixture, Item, Monster, Puzzle, Room, RoomId, Solution, World, name_key,
};
use super::validator::validate_world;
use crate::error::ConfigError;
use crate::player::Player;
use crate::rules::Rules;

////////////////////
/// TOML STRUCTS ///
////////////////////

#[derive(Deserialize)]
struct WorldFile {
    world: WorldHeader,
    #[serde(default)]
    player: PlayerConfig,
    #[serde(default)]
    rules: Rules,
    #[serde(default)]
    room: Vec<RoomConfig>, // [[room]] blocks
    #[serde(default)]
    item: Vec<ItemConfig>, // [[item]] blocks
    #[serde(default)]
    fixture: Vec<FixtureConfig>,
    #[serde(default)]
    puzzle: Vec<PuzzleConfig>,
    #[serde(default)]
    monster: Vec<MonsterConfig>,
}

#[derive(Deserialize)]
struct WorldHeader {
    id: String,
    name: String,
    start_room: RoomId,
    #[serde(default)]
    desc: String,
}

#[derive(Deserialize, Default)]
struct PlayerConfig {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    health: Option<u32>,
    /// Item names carried from the start.
    #[serde(default)]
    inventory: Vec<String>,
}

/// Exit codes appear both as integers and as numeric strings in world files.
#[derive(Deserialize, Clone)]
#[serde(untagged)]
enum RawExit {
    Code(i64),
    Text(String),
}

#[derive(Deserialize)]
struct RoomConfig {
    id: RoomId,
    name: String,
    #[serde(default)]
    desc: String,

    #[serde(default)]
    north: Option<RawExit>,
    #[serde(default)]
    south: Option<RawExit>,
    #[serde(default)]
    east: Option<RawExit>,
    #[serde(default)]
    west: Option<RawExit>,

    #[serde(default)]
    items: Vec<String>,
    #[serde(default)]
    fixtures: Vec<String>,
    #[serde(default)]
    puzzle: Option<String>,
    #[serde(default)]
    monster: Option<String>,
}

#[derive(Deserialize)]
struct ItemConfig {
    name: String,
    #[serde(default)]
    weight: u32,
    #[serde(default = "default_uses")]
    uses: u32,
    /// Defaults to `uses`.
    #[serde(default)]
    uses_remaining: Option<u32>,
    #[serde(default)]
    points: u32,
    #[serde(default)]
    use_text: String,
    #[serde(default)]
    desc: String,
}

#[derive(Deserialize)]
struct FixtureConfig {
    name: String,
    #[serde(default)]
    weight: u32,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    puzzle: Option<String>,
}

#[derive(Deserialize)]
struct PuzzleConfig {
    name: String,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default)]
    affects_target: bool,
    #[serde(default)]
    affects_player: bool,
    solution: String,
    #[serde(default)]
    points: u32,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    effect: String,
    #[serde(default)]
    target: Option<RoomId>,
}

#[derive(Deserialize)]
struct MonsterConfig {
    name: String,
    #[serde(default = "default_true")]
    active: bool,
    #[serde(default = "default_true")]
    can_attack: bool,
    #[serde(default)]
    damage: u32,
    #[serde(default)]
    attack_text: String,
    #[serde(default)]
    desc: String,
    #[serde(default)]
    effect: String,
    #[serde(default)]
    points: u32,
    #[serde(default)]
    solution: String,
    #[serde(default)]
    target: Option<RoomId>,
    health: u32,
    /// Defaults to `health`.
    #[serde(default)]
    max_health: Option<u32>,
}

// Helpers for serde defaults
fn default_true() -> bool {
    true
}

fn default_uses() -> u32 {
    1
}

/////////////////////////////
/// TOML PARSER FUNCTIONS ///
/////////////////////////////

/// Load a world from a .toml file on disk.
pub fn load_world_from_file(path: &Path) -> Result<World, ConfigError> {
    let contents = fs::read_to_string(path)?;
    load_world_from_str(&contents)
}

/// Parse and validate a world definition. Any inconsistency is fatal.
pub fn load_world_from_str(contents: &str) -> Result<World, ConfigError> {
    let world_file: WorldFile = toml::from_str(contents)?;
    let world = build_world(world_file)?;

    let errors = validate_world(&world);
    if !errors.is_empty() {
        return Err(ConfigError::Invalid(errors));
    }

    debug!(
        world = %world.id,
        rooms = world.rooms.len(),
        puzzles = world.puzzles.len(),
        monsters = world.monsters.len(),
        "world loaded"
    );
    Ok(world)
}

fn build_world(wf: WorldFile) -> Result<World, ConfigError> {
    // Entity tables first so rooms can resolve their references.
    let mut items: HashMap<String, Item> = HashMap::new();
    for ic in wf.item {
        let key = unique_key(&items, &ic.name, "item")?;
        items.insert(
            key,
            Item {
                uses_remaining: ic.uses_remaining.unwrap_or(ic.uses),
                max_uses: ic.uses,
                name: ic.name.trim().to_string(),
                weight: ic.weight,
                points: ic.points,
                use_text: normalize_multiline_desc(&ic.use_text),
                desc: normalize_multiline_desc(&ic.desc),
                scored: false,
            },
        );
    }

    let mut fixtures: HashMap<String, Fixture> = HashMap::new();
    for fc in wf.fixture {
        let key = unique_key(&fixtures, &fc.name, "fixture")?;
        fixtures.insert(
            key,
            Fixture {
                name: fc.name.trim().to_string(),
                weight: fc.weight,
                desc: normalize_multiline_desc(&fc.desc),
                puzzle: fc.puzzle.as_deref().map(name_key),
            },
        );
    }

    let mut puzzles: HashMap<String, Puzzle> = HashMap::new();
    for pc in wf.puzzle {
        let key = unique_key(&puzzles, &pc.name, "puzzle")?;
        puzzles.insert(
            key,
            Puzzle {
                name: pc.name.trim().to_string(),
                active: pc.active,
                affects_target: pc.affects_target,
                affects_player: pc.affects_player,
                solution: Solution::parse(&pc.solution),
                points: pc.points,
                desc: normalize_multiline_desc(&pc.desc),
                effect: normalize_multiline_desc(&pc.effect),
                target: pc.target,
            },
        );
    }

    let mut monsters: HashMap<String, Monster> = HashMap::new();
    for mc in wf.monster {
        let key = unique_key(&monsters, &mc.name, "monster")?;
        let active = mc.active && mc.health > 0;
        if mc.active && !active {
            warn!(monster = %mc.name, "monster starts with no health; marking inactive");
        }
        monsters.insert(
            key,
            Monster {
                name: mc.name.trim().to_string(),
                active,
                can_attack: mc.can_attack,
                damage: mc.damage,
                attack_text: normalize_multiline_desc(&mc.attack_text),
                desc: normalize_multiline_desc(&mc.desc),
                effect: normalize_multiline_desc(&mc.effect),
                points: mc.points,
                solution: mc.solution.trim().to_string(),
                target: mc.target,
                max_health: mc.max_health.unwrap_or(mc.health),
                health: mc.health,
            },
        );
    }

    // Rooms take ownership of the items placed in them. Anything left over
    // in `items` afterwards is either carried from the start or unplaced.
    let mut rooms: BTreeMap<RoomId, Room> = BTreeMap::new();
    for rc in wf.room {
        if rooms.contains_key(&rc.id) {
            return Err(ConfigError::Duplicate {
                kind: "room",
                name: rc.id.to_string(),
            });
        }

        let exits = Exits::new(
            parse_exit(rc.id, "north", rc.north.as_ref())?,
            parse_exit(rc.id, "south", rc.south.as_ref())?,
            parse_exit(rc.id, "east", rc.east.as_ref())?,
            parse_exit(rc.id, "west", rc.west.as_ref())?,
        );

        let mut room_items = Vec::new();
        for name in &rc.items {
            let item = items
                .remove(&name_key(name))
                .ok_or_else(|| ConfigError::ItemPlacement {
                    place: format!("room {}", rc.id),
                    name: name.clone(),
                })?;
            room_items.push(item);
        }

        rooms.insert(
            rc.id,
            Room {
                id: rc.id,
                name: rc.name,
                desc: normalize_multiline_desc(&rc.desc),
                exits,
                items: room_items,
                fixtures: rc.fixtures.iter().map(|f| name_key(f)).collect(),
                puzzle: rc.puzzle.as_deref().map(name_key),
                monster: rc.monster.as_deref().map(name_key),
            },
        );
    }

    let rules = wf.rules;
    let mut player = Player::new(
        wf.player.name.unwrap_or_else(|| "Adventurer".to_string()),
        wf.world.start_room,
        &rules,
    );
    if let Some(health) = wf.player.health {
        player.health = health.min(player.max_health);
    }
    for name in &wf.player.inventory {
        let item = items
            .remove(&name_key(name))
            .ok_or_else(|| ConfigError::ItemPlacement {
                place: "player inventory".to_string(),
                name: name.clone(),
            })?;
        // Over-weight starting kits are caught by the validator.
        player.inventory.push(item);
    }

    for item in items.values() {
        warn!(item = %item.name, "item is not placed in any room; it will never be seen");
    }

    Ok(World {
        id: wf.world.id,
        name: wf.world.name,
        desc: normalize_multiline_desc(&wf.world.desc),
        start_room: wf.world.start_room,
        rooms,
        fixtures,
        puzzles,
        monsters,
        player,
        rules,
    })
}

fn unique_key<T>(
    table: &HashMap<String, T>,
    name: &str,
    kind: &'static str,
) -> Result<String, ConfigError> {
    let key = name_key(name);
    if key.is_empty() {
        return Err(ConfigError::Duplicate {
            kind,
            name: "<empty name>".to_string(),
        });
    }
    if table.contains_key(&key) {
        return Err(ConfigError::Duplicate {
            kind,
            name: name.to_string(),
        });
    }
    Ok(key)
}

fn parse_exit(
    room: RoomId,
    direction: &'static str,
    raw: Option<&RawExit>,
) -> Result<ExitCode, ConfigError> {
    let bad = |code: String| ConfigError::BadExit {
        room,
        direction,
        code,
    };

    let code = match raw {
        None => return Ok(ExitCode::Wall),
        Some(RawExit::Code(c)) => *c,
        Some(RawExit::Text(s)) => s.trim().parse::<i64>().map_err(|_| bad(s.clone()))?,
    };

    ExitCode::from_code(code).ok_or_else(|| bad(code.to_string()))
}

fn normalize_multiline_desc(raw: &str) -> String {
    let mut result = String::new();
    let mut pending_blank_lines = 0usize;

    for line in raw.lines() {
        // Indentation in the TOML source never reaches the player.
        let trimmed = line.trim();

        if trimmed.is_empty() {
            pending_blank_lines += 1;
            continue;
        }

        if !result.is_empty() {
            match pending_blank_lines {
                0 => result.push(' '),
                1 => result.push('\n'),
                _ => result.push_str("\n\n"),
            }
        }
        result.push_str(trimmed);
        pending_blank_lines = 0;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Direction;

    const MINIMAL: &str = r#"
        [world]
        id = "mini"
        name = "Mini"
        start_room = 1

        [[room]]
        id = 1
        name = "Start"
        north = "2"

        [[room]]
        id = 2
        name = "Next"
    "#;

    #[test]
    fn string_and_integer_exit_codes() {
        let w = load_world_from_str(MINIMAL).unwrap();
        let start = w.room(1).unwrap();
        assert_eq!(start.exits.get(Direction::North), ExitCode::Open(2));
        assert_eq!(start.exits.get(Direction::South), ExitCode::Wall);
        assert_eq!(w.player.room, 1);
        assert_eq!(w.player.max_weight, 13);
    }

    #[test]
    fn non_numeric_exit_is_config_error() {
        let src = MINIMAL.replace("north = \"2\"", "north = \"upstairs\"");
        match load_world_from_str(&src) {
            Err(ConfigError::BadExit { room, direction, code }) => {
                assert_eq!(room, 1);
                assert_eq!(direction, "north");
                assert_eq!(code, "upstairs");
            }
            other => panic!("expected BadExit, got {other:?}"),
        }
    }

    #[test]
    fn dangling_exit_is_fatal() {
        let src = MINIMAL.replace("north = \"2\"", "north = 9");
        assert!(matches!(
            load_world_from_str(&src),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn missing_start_room_is_fatal() {
        let src = MINIMAL.replace("start_room = 1", "start_room = 5");
        let err = load_world_from_str(&src).unwrap_err();
        assert!(err.to_string().contains("start_room 5"), "{err}");
    }

    #[test]
    fn duplicate_names_differ_only_in_case() {
        let src = format!(
            "{MINIMAL}\n[[item]]\nname = \"Lamp\"\n[[item]]\nname = \"lamp\"\n"
        );
        assert!(matches!(
            load_world_from_str(&src),
            Err(ConfigError::Duplicate { kind: "item", .. })
        ));
    }

    #[test]
    fn rules_override_defaults() {
        let src = format!("{MINIMAL}\n[rules]\nmax_carry_weight = 20\nattack_power = 4\n");
        let w = load_world_from_str(&src).unwrap();
        assert_eq!(w.player.max_weight, 20);
        assert_eq!(w.player.attack_power, 4);
        assert_eq!(w.rules.critical_chance_percent, 15);
    }

    #[test]
    fn multiline_desc_normalized() {
        let raw = "  first line\n  continues here\n\n  new line\n\n\n  paragraph\n";
        assert_eq!(
            normalize_multiline_desc(raw),
            "first line continues here\nnew line\n\nparagraph"
        );
    }
}
