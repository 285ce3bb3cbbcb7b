use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::player::Player;
use crate::rules::Rules;

//////////////////////////////
/// GAME STRUCTS AND ENUMS ///
//////////////////////////////

pub type RoomId = u32;

/// Lookup key for every named entity. Names are matched case-insensitively.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }

    fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::South => 1,
            Direction::East => 2,
            Direction::West => 3,
        }
    }

    /// Accepts full names and single-letter abbreviations.
    pub fn parse(s: &str) -> Option<Direction> {
        match s.trim().to_lowercase().as_str() {
            "n" | "north" => Some(Direction::North),
            "s" | "south" => Some(Direction::South),
            "e" | "east" => Some(Direction::East),
            "w" | "west" => Some(Direction::West),
            _ => None,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One direction of a room's connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitCode {
    Wall,
    Open(RoomId),
    /// Held shut by the room's obstacle; leads to the given room once it is resolved.
    Blocked(RoomId),
}

impl ExitCode {
    /// 0 is a wall, positive is a room id, negative is blocked toward the room `-code`.
    pub fn from_code(code: i64) -> Option<ExitCode> {
        match code {
            0 => Some(ExitCode::Wall),
            c if c > 0 => RoomId::try_from(c).ok().map(ExitCode::Open),
            c => c
                .checked_neg()
                .and_then(|n| RoomId::try_from(n).ok())
                .map(ExitCode::Blocked),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exits([ExitCode; 4]);

impl Exits {
    pub fn new(north: ExitCode, south: ExitCode, east: ExitCode, west: ExitCode) -> Self {
        Exits([north, south, east, west])
    }

    pub fn get(&self, dir: Direction) -> ExitCode {
        self.0[dir.index()]
    }

    pub fn set(&mut self, dir: Direction, code: ExitCode) {
        self.0[dir.index()] = code;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Direction, ExitCode)> + '_ {
        Direction::ALL.into_iter().map(|d| (d, self.get(d)))
    }
}

impl Default for Exits {
    fn default() -> Self {
        Exits([ExitCode::Wall; 4])
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub desc: String,
    pub exits: Exits,
    /// Items currently lying here, in placement order.
    pub items: Vec<Item>,
    /// Keys into `World::fixtures`.
    pub fixtures: Vec<String>,
    /// Key into `World::puzzles`. Kept after the puzzle is solved.
    pub puzzle: Option<String>,
    /// Key into `World::monsters`. Kept after the monster is defeated.
    pub monster: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub weight: u32,
    pub max_uses: u32,
    pub uses_remaining: u32,
    pub points: u32,
    pub use_text: String,
    pub desc: String,
    /// Set once the item's points have been awarded.
    #[serde(default)]
    pub scored: bool,
}

impl Item {
    pub fn is_named(&self, name: &str) -> bool {
        name_key(&self.name) == name_key(name)
    }

    /// Spends one use. Returns false (and changes nothing) when none are left.
    pub fn use_once(&mut self) -> bool {
        if self.uses_remaining == 0 {
            return false;
        }
        self.uses_remaining -= 1;
        true
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub weight: u32,
    pub desc: String,
    pub puzzle: Option<String>,
}

/// How an obstacle is overcome.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Solution {
    /// Use the named item.
    Item(String),
    /// Type the answer. Written `'text'` in world files.
    Answer(String),
}

impl Solution {
    pub fn parse(raw: &str) -> Solution {
        let raw = raw.trim();
        if raw.starts_with('\'') {
            Solution::Answer(strip_quotes(raw).to_string())
        } else {
            Solution::Item(raw.to_string())
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Solution::Item(s) | Solution::Answer(s) => s,
        }
    }

    pub fn is_answer(&self) -> bool {
        matches!(self, Solution::Answer(_))
    }

    /// Case-insensitive comparison with quote delimiters removed from both sides.
    pub fn matches(&self, supplied: &str) -> bool {
        solution_matches(self.text(), supplied)
    }
}

pub fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    let s = s.strip_prefix('\'').unwrap_or(s);
    s.strip_suffix('\'').unwrap_or(s).trim()
}

pub fn solution_matches(stored: &str, supplied: &str) -> bool {
    let stored = strip_quotes(stored);
    !stored.is_empty() && name_key(stored) == name_key(strip_quotes(supplied))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Puzzle {
    pub name: String,
    pub active: bool,
    /// While active, Look shows `effect` in place of the room description.
    pub affects_target: bool,
    /// While active, entering the room shows `effect` to the player.
    pub affects_player: bool,
    pub solution: Solution,
    pub points: u32,
    pub desc: String,
    pub effect: String,
    pub target: Option<RoomId>,
}

impl Puzzle {
    /// Deactivates the puzzle. Returns false if it was already solved.
    pub fn solve(&mut self) -> bool {
        std::mem::replace(&mut self.active, false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub name: String,
    pub active: bool,
    pub can_attack: bool,
    pub damage: u32,
    pub attack_text: String,
    pub desc: String,
    pub effect: String,
    pub points: u32,
    /// Name of the item that defeats it outright.
    pub solution: String,
    pub target: Option<RoomId>,
    pub health: u32,
    pub max_health: u32,
}

impl Monster {
    /// Applies damage; returns true when this blow brought health to zero.
    pub fn take_hit(&mut self, amount: u32) -> bool {
        if !self.active {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.active = false;
            return true;
        }
        false
    }

    pub fn defeat(&mut self) {
        self.health = 0;
        self.active = false;
    }

    pub fn will_attack(&self) -> bool {
        self.active && self.can_attack
    }
}

/// Runtime world: owns every entity table and the player.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub id: String,
    pub name: String,
    pub desc: String,
    pub start_room: RoomId,
    pub rooms: BTreeMap<RoomId, Room>,
    pub fixtures: HashMap<String, Fixture>,
    pub puzzles: HashMap<String, Puzzle>,
    pub monsters: HashMap<String, Monster>,
    pub player: Player,
    pub rules: Rules,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_parse() {
        assert_eq!(ExitCode::from_code(0), Some(ExitCode::Wall));
        assert_eq!(ExitCode::from_code(2), Some(ExitCode::Open(2)));
        assert_eq!(ExitCode::from_code(-2), Some(ExitCode::Blocked(2)));
        assert_eq!(ExitCode::from_code(i64::MAX), None);
    }

    #[test]
    fn quoted_solution_is_answer() {
        let s = Solution::parse("'Answer'");
        assert_eq!(s, Solution::Answer("Answer".to_string()));
        assert!(s.matches("answer"));
        assert!(s.matches("'ANSWER'"));
        assert!(!s.matches("wrong"));

        let k = Solution::parse("key");
        assert!(!k.is_answer());
        assert!(k.matches("KEY"));
    }

    #[test]
    fn empty_solution_never_matches() {
        assert!(!solution_matches("", ""));
        assert!(!solution_matches("''", "''"));
    }

    #[test]
    fn monster_hit_floors_and_deactivates() {
        let mut m = Monster {
            name: "Rat".into(),
            active: true,
            can_attack: true,
            damage: 3,
            attack_text: String::new(),
            desc: String::new(),
            effect: String::new(),
            points: 5,
            solution: String::new(),
            target: None,
            health: 15,
            max_health: 15,
        };
        assert!(!m.take_hit(10));
        assert!(m.take_hit(10));
        assert_eq!(m.health, 0);
        assert!(!m.active);
        assert!(!m.take_hit(10));
    }

    #[test]
    fn item_uses_run_out() {
        let mut item = Item {
            name: "Torch".into(),
            weight: 1,
            max_uses: 1,
            uses_remaining: 1,
            points: 0,
            use_text: String::new(),
            desc: String::new(),
            scored: false,
        };
        assert!(item.use_once());
        assert!(!item.use_once());
        assert_eq!(item.uses_remaining, 0);
        assert!(item.is_named("TORCH"));
    }

    #[test]
    fn puzzle_solve_is_idempotent() {
        let mut p = Puzzle {
            name: "Lock".into(),
            active: true,
            affects_target: false,
            affects_player: false,
            solution: Solution::parse("key"),
            points: 10,
            desc: String::new(),
            effect: String::new(),
            target: None,
        };
        assert!(p.solve());
        assert!(!p.solve());
    }
}
