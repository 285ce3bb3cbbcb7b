use std::io;

use thiserror::Error;

use crate::world::ValidationError;

/// Problems with a world definition. Always fatal: the game never starts.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("could not read world file: {0}")]
    Io(#[from] io::Error),

    #[error("world file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("room {room} has a bad {direction} exit code '{code}'")]
    BadExit {
        room: u32,
        direction: &'static str,
        code: String,
    },

    #[error("duplicate {kind} '{name}'")]
    Duplicate { kind: &'static str, name: String },

    #[error("{place} lists item '{name}', which is unknown or already placed elsewhere")]
    ItemPlacement { place: String, name: String },

    #[error("{} problem(s) in world definition: {}", .0.len(), join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Contract violations by the caller. These are not gameplay results.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("damage may not be negative (got {0})")]
    NegativeDamage(i32),

    #[error("{0} may not be empty")]
    EmptyName(&'static str),
}

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("save file error: {0}")]
    Io(#[from] io::Error),

    #[error("save data is corrupt: {0}")]
    Json(#[from] serde_json::Error),

    #[error("saved world is inconsistent: {0}")]
    Invalid(String),

    #[error("nothing has been saved yet")]
    NothingSaved,

    #[error("no save location is configured")]
    NoStore,
}
