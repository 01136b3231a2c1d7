//! # Camera bracket telecommands

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A command for the pan/tilt camera bracket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, StructOpt)]
pub enum BracketCmd {
    /// Return both axes to the centre position.
    #[structopt(name = "quit")]
    Centre,

    /// Pan the camera to the right.
    #[structopt(name = "rightbrac")]
    Right,

    /// Pan the camera to the left.
    #[structopt(name = "leftbrac")]
    Left,

    /// Tilt the camera up.
    #[structopt(name = "upbrac")]
    Up,

    /// Tilt the camera down.
    #[structopt(name = "downbrac")]
    Down,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BracketCmd {
    /// Parse a command from its token. Matching is exact and case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "quit" => Some(BracketCmd::Centre),
            "rightbrac" => Some(BracketCmd::Right),
            "leftbrac" => Some(BracketCmd::Left),
            "upbrac" => Some(BracketCmd::Up),
            "downbrac" => Some(BracketCmd::Down),
            _ => None,
        }
    }

    /// The token sent on the wire for this command.
    pub fn token(&self) -> &'static str {
        match self {
            BracketCmd::Centre => "quit",
            BracketCmd::Right => "rightbrac",
            BracketCmd::Left => "leftbrac",
            BracketCmd::Up => "upbrac",
            BracketCmd::Down => "downbrac",
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bracket_tokens() {
        for cmd in [
            BracketCmd::Centre,
            BracketCmd::Right,
            BracketCmd::Left,
            BracketCmd::Up,
            BracketCmd::Down,
        ]
        .iter()
        {
            assert_eq!(BracketCmd::from_token(cmd.token()), Some(*cmd));
        }

        assert_eq!(BracketCmd::from_token("Quit"), None);
        assert_eq!(BracketCmd::from_token("leftbrac "), None);
        assert_eq!(BracketCmd::from_token(""), None);
    }
}
