mod graph;
mod loader;
mod model;
mod validator;

pub use loader::{load_world_from_file, load_world_from_str};

pub use graph::{ExitOutcome, Found, Obstacle};
pub use model::{
    Direction, ExitCode, Exits, Fixture, Item, Monster, Puzzle, Room, RoomId, Solution, World,
    name_key, solution_matches, strip_quotes,
};
pub use validator::{ValidationError, validate_world};
