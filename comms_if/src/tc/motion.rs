//! # Locomotion telecommands
//!
//! Locomotion is not driven by this software directly. Each command is reduced to a single
//! character and handed to the motor control process through the [`crate::move_slot::MoveSlot`].

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use structopt::StructOpt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A locomotion command.
#[derive(Debug, Copy, Clone, PartialEq, Eq, StructOpt)]
pub enum MoveCmd {
    /// Drive forwards.
    #[structopt(name = "forward")]
    Forward,

    /// Drive backwards.
    #[structopt(name = "backward")]
    Backward,

    /// Turn left.
    #[structopt(name = "left")]
    Left,

    /// Turn right.
    #[structopt(name = "right")]
    Right,

    /// Take a picture.
    #[structopt(name = "picture")]
    Picture,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveCmd {
    /// Parse a command from its token. Matching is exact and case sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "forward" => Some(MoveCmd::Forward),
            "backward" => Some(MoveCmd::Backward),
            "left" => Some(MoveCmd::Left),
            "right" => Some(MoveCmd::Right),
            "picture" => Some(MoveCmd::Picture),
            _ => None,
        }
    }

    /// The token sent on the wire for this command.
    pub fn token(&self) -> &'static str {
        match self {
            MoveCmd::Forward => "forward",
            MoveCmd::Backward => "backward",
            MoveCmd::Left => "left",
            MoveCmd::Right => "right",
            MoveCmd::Picture => "picture",
        }
    }

    /// The character the motor control process understands for this command.
    pub fn as_char(&self) -> char {
        match self {
            MoveCmd::Forward => 'w',
            MoveCmd::Backward => 's',
            MoveCmd::Left => 'a',
            MoveCmd::Right => 'd',
            MoveCmd::Picture => 'c',
        }
    }

    /// Parse a command from the motor control character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'w' => Some(MoveCmd::Forward),
            's' => Some(MoveCmd::Backward),
            'a' => Some(MoveCmd::Left),
            'd' => Some(MoveCmd::Right),
            'c' => Some(MoveCmd::Picture),
            _ => None,
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
    fn test_move_chars() {
        assert_eq!(MoveCmd::from_token("forward").map(|c| c.as_char()), Some('w'));
        assert_eq!(MoveCmd::from_token("backward").map(|c| c.as_char()), Some('s'));
        assert_eq!(MoveCmd::from_token("left").map(|c| c.as_char()), Some('a'));
        assert_eq!(MoveCmd::from_token("right").map(|c| c.as_char()), Some('d'));
        assert_eq!(MoveCmd::from_token("picture").map(|c| c.as_char()), Some('c'));

        assert_eq!(MoveCmd::from_token("Forward"), None);
        assert_eq!(MoveCmd::from_token("stop"), None);
        assert_eq!(MoveCmd::from_char('x'), None);
    }
}
