//! # Motion Relay
//!
//! Hands locomotion commands over to the motor control process through the move slot.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::{
    move_slot::{MoveSlot, MoveSlotError},
    tc::MoveCmd,
};
use log::{info, warn};
use util::module::{Publication, Relay};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// [`Relay`] writing each recognised move command to the slot.
pub struct MoveRelay {
    slot: MoveSlot,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveRelay {
    pub fn new(slot: MoveSlot) -> Self {
        Self { slot }
    }
}

impl Relay for MoveRelay {
    type ProcError = MoveSlotError;

    fn proc(&mut self, token: &str) -> Result<Vec<Publication>, MoveSlotError> {
        match MoveCmd::from_token(token) {
            Some(cmd) => {
                self.slot.write(cmd)?;
                info!("Move {:?} ({:?}) written to the slot", cmd, cmd.as_char());
            },
            None => warn!("Unknown move command {:?}", token)
        }

        Ok(Vec::new())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_known_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passchar.txt");
        let mut relay = MoveRelay::new(MoveSlot::new(&path));

        let cases = [
            ("forward", "w"),
            ("picture", "c"),
            ("backward", "s"),
            ("left", "a"),
            ("right", "d"),
        ];

        for (token, expected) in cases.iter() {
            assert!(relay.proc(token).unwrap().is_empty());

            let content = fs::read_to_string(&path).unwrap();
            assert_eq!(content.len(), 1);
            assert_eq!(&content, expected);
        }
    }

    #[test]
    fn test_unknown_token_leaves_slot() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("passchar.txt");
        let mut relay = MoveRelay::new(MoveSlot::new(&path));

        relay.proc("jump").unwrap();
        assert!(!path.exists());

        relay.proc("left").unwrap();
        relay.proc("Left").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "a");
    }
}
