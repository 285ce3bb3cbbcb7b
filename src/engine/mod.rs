mod combat;
mod command;
mod helpers;
mod items;
mod movement;
mod output;
mod puzzles;
mod render;

pub use combat::{handle_attack, monster_strikes};
pub use command::{Command, ParseError};
pub use items::{handle_drop, handle_examine, handle_inventory, handle_take};
pub use movement::handle_move;
pub use output::{FinalScore, GameStatus, Outcome, OutcomeKind, Output, OutputBlock};
pub use puzzles::{handle_answer, handle_use};
pub use render::render_room;
