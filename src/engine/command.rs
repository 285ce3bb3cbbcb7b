use thiserror::Error;

use crate::world::Direction;

/// A player action, already separated from whatever text or UI event produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Move(Direction),
    Look,
    Inventory,
    Attack,
    Take(String),
    Drop(String),
    Examine(String),
    Use(String),
    Answer(String),
    Save,
    Load,
    Quit,
}

/// Why a line of text could not become a command. The message is shown as-is.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("{0}")]
    MissingObject(&'static str),

    #[error("Go where?")]
    UnknownDirection,

    #[error("I don't understand that command.")]
    Unknown,
}

impl Command {
    pub fn parse(input: &str) -> Result<Command, ParseError> {
        let input = input.trim();
        let lower = input.to_lowercase();

        if let Some(dir) = Direction::parse(&lower) {
            return Ok(Command::Move(dir));
        }

        match lower.as_str() {
            "look" | "l" => return Ok(Command::Look),
            "inventory" | "inv" | "i" => return Ok(Command::Inventory),
            "attack" | "fight" | "hit" => return Ok(Command::Attack),
            "save" => return Ok(Command::Save),
            "load" | "restore" => return Ok(Command::Load),
            "quit" | "exit" => return Ok(Command::Quit),
            _ => {}
        }

        let mut parts = input.splitn(2, char::is_whitespace);
        let verb = parts.next().unwrap_or("").to_lowercase();
        let rest = parts.next().unwrap_or("").trim();

        // "attack troll" works the same as "attack"
        if matches!(verb.as_str(), "attack" | "fight" | "hit") {
            return Ok(Command::Attack);
        }

        if verb == "go" || verb == "move" || verb == "walk" {
            return Direction::parse(rest)
                .map(Command::Move)
                .ok_or(ParseError::UnknownDirection);
        }

        if verb == "look" && rest.to_lowercase().starts_with("at ") {
            return object(&rest[3..], "Examine what?").map(Command::Examine);
        }

        match verb.as_str() {
            "take" | "get" | "grab" => object(rest, "Take what?").map(Command::Take),
            "drop" => object(rest, "Drop what?").map(Command::Drop),
            "examine" | "x" | "inspect" => object(rest, "Examine what?").map(Command::Examine),
            "use" => object(rest, "Use what?").map(Command::Use),
            "answer" | "say" | "solve" => object(rest, "Answer what?").map(Command::Answer),
            _ => Err(ParseError::Unknown),
        }
    }

    pub fn is_terminal_safe(&self) -> bool {
        matches!(self, Command::Load | Command::Quit)
    }
}

fn object(rest: &str, prompt: &'static str) -> Result<String, ParseError> {
    let rest = rest.trim();
    if rest.is_empty() {
        Err(ParseError::MissingObject(prompt))
    } else {
        Ok(rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directions_and_abbreviations() {
        assert_eq!(Command::parse("N"), Ok(Command::Move(Direction::North)));
        assert_eq!(Command::parse("west"), Ok(Command::Move(Direction::West)));
        assert_eq!(
            Command::parse("go south"),
            Ok(Command::Move(Direction::South))
        );
        assert_eq!(Command::parse("go up"), Err(ParseError::UnknownDirection));
    }

    #[test]
    fn verbs_with_objects() {
        assert_eq!(
            Command::parse("take Brass Key"),
            Ok(Command::Take("Brass Key".into()))
        );
        assert_eq!(
            Command::parse("look at statue"),
            Ok(Command::Examine("statue".into()))
        );
        assert_eq!(
            Command::parse("answer 'Echo'"),
            Ok(Command::Answer("'Echo'".into()))
        );
        assert_eq!(Command::parse("attack troll"), Ok(Command::Attack));
    }

    #[test]
    fn missing_object_prompts() {
        let err = Command::parse("take").unwrap_err();
        assert_eq!(err.to_string(), "Take what?");
        assert_eq!(Command::parse("dance"), Err(ParseError::Unknown));
    }
}
