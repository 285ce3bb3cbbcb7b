use serde::Serialize;

use crate::player::Rank;
use crate::world::RoomId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutputBlock {
    Title(String),
    Text(String),
    Event(String),
    Exits(String),
}

#[derive(Default, Debug, Clone, Serialize)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Title(s));
        }
    }

    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Text(s));
        }
    }

    pub fn event(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Event(s));
        }
    }

    pub fn set_exits(&mut self, s: impl Into<String>) {
        let s = s.into();
        if s.trim().is_empty() {
            return;
        }

        // ensure only one Exits block exists, always last
        self.blocks.retain(|b| !matches!(b, OutputBlock::Exits(_)));
        self.blocks.push(OutputBlock::Exits(s));
    }

    /// All blocks as plain text, one per line.
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| match b {
                OutputBlock::Title(s)
                | OutputBlock::Text(s)
                | OutputBlock::Event(s)
                | OutputBlock::Exits(s) => s.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OutcomeKind {
    Moved,
    Wall,
    Blocked,
    Looked,
    Inventory,
    Attacked,
    NothingToAttack,
    Taken,
    TooHeavy,
    NotHere,
    Dropped,
    NotCarried,
    Examined,
    NotFound,
    Used,
    Solved,
    NoUsesLeft,
    NoActivePuzzle,
    RequiresItem,
    WrongAnswer,
    Saved,
    Loaded,
    PersistFailed,
    Quit,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub score: u32,
    pub rank: Rank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Playing,
    /// The player's health ran out.
    Over(FinalScore),
    Quit(FinalScore),
}

impl GameStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::Playing)
    }
}

/// Result of applying one command: text for the front end plus the facts behind it.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub kind: OutcomeKind,
    pub success: bool,
    pub output: Output,
    pub points_awarded: u32,
    pub damage_dealt: u32,
    pub damage_taken: u32,
    pub critical: bool,
    pub defeated: bool,
    /// Player's room after the command.
    pub room: RoomId,
    pub status: GameStatus,
}

impl Outcome {
    fn new(kind: OutcomeKind, success: bool, room: RoomId) -> Self {
        Outcome {
            kind,
            success,
            output: Output::new(),
            points_awarded: 0,
            damage_dealt: 0,
            damage_taken: 0,
            critical: false,
            defeated: false,
            room,
            status: GameStatus::Playing,
        }
    }

    pub fn success(kind: OutcomeKind, room: RoomId) -> Self {
        Self::new(kind, true, room)
    }

    pub fn failure(kind: OutcomeKind, room: RoomId) -> Self {
        Self::new(kind, false, room)
    }

    pub fn say(&mut self, s: impl Into<String>) {
        self.output.say(s);
    }

    pub fn event(&mut self, s: impl Into<String>) {
        self.output.event(s);
    }

    pub fn with_text(mut self, s: impl Into<String>) -> Self {
        self.say(s);
        self
    }

    pub fn message(&self) -> String {
        self.output.text()
    }
}
