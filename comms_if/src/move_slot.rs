//! # Move command slot
//!
//! The motor control process reads the latest locomotion command from a text file holding a
//! single character. The slot holds at most one pending command: every write replaces the
//! previous one, there is no history and no acknowledgement.
//!
//! Writes go to a temporary file in the same directory which is then renamed over the slot, so a
//! reader never sees a partially written or truncated file. [`MoveSlot::take`] claims the file by
//! renaming it before reading, so a command is consumed at most once.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process,
};
use tempfile::NamedTempFile;

use crate::tc::MoveCmd;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Permissions of the slot file, readable by a motor control process running as another user.
#[cfg(unix)]
const SLOT_MODE: u32 = 0o644;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Handle on the move command slot file.
#[derive(Debug, Clone)]
pub struct MoveSlot {
    path: PathBuf,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum MoveSlotError {
    #[error("Could not access the slot file: {0}")]
    Io(#[from] io::Error),

    #[error("Could not replace the slot file: {0}")]
    Persist(#[from] tempfile::PersistError),

    #[error("The slot contains an unrecognised command: {0:?}")]
    InvalidContent(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MoveSlot {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the pending command with `cmd`.
    pub fn write(&self, cmd: MoveCmd) -> Result<(), MoveSlotError> {
        let mut tmp = NamedTempFile::new_in(self.dir())?;

        let mut buf = [0u8; 4];
        tmp.write_all(cmd.as_char().encode_utf8(&mut buf).as_bytes())?;
        tmp.as_file().sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file().set_permissions(fs::Permissions::from_mode(SLOT_MODE))?;
        }

        tmp.persist(&self.path)?;

        Ok(())
    }

    /// Read the pending command without consuming it.
    pub fn peek(&self) -> Result<Option<MoveCmd>, MoveSlotError> {
        match fs::read_to_string(&self.path) {
            Ok(s) => parse(&s),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into())
        }
    }

    /// Consume the pending command, leaving the slot empty.
    pub fn take(&self) -> Result<Option<MoveCmd>, MoveSlotError> {
        let mut claim_name = self.path.file_name().unwrap_or_default().to_os_string();
        claim_name.push(format!(".claim-{}", process::id()));
        let claim_path = self.path.with_file_name(claim_name);

        match fs::rename(&self.path, &claim_path) {
            Ok(_) => (),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into())
        }

        let content = fs::read_to_string(&claim_path);
        fs::remove_file(&claim_path)?;

        parse(&content?)
    }

    fn dir(&self) -> &Path {
        match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new(".")
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn parse(content: &str) -> Result<Option<MoveCmd>, MoveSlotError> {
    let mut chars = content.chars();

    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) => MoveCmd::from_char(c)
            .map(Some)
            .ok_or_else(|| MoveSlotError::InvalidContent(content.to_string())),
        _ => Err(MoveSlotError::InvalidContent(content.to_string()))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_write_replaces_previous() {
        let dir = tempfile::tempdir().unwrap();
        let slot = MoveSlot::new(dir.path().join("passchar.txt"));

        slot.write(MoveCmd::Forward).unwrap();
        assert_eq!(fs::read_to_string(slot.path()).unwrap(), "w");

        slot.write(MoveCmd::Picture).unwrap();
        let content = fs::read(slot.path()).unwrap();
        assert_eq!(content, b"c");

        // Only the slot itself is left in the directory
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_slot_readable_by_others() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let slot = MoveSlot::new(dir.path().join("passchar.txt"));

        slot.write(MoveCmd::Right).unwrap();

        let mode = fs::metadata(slot.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn test_take_clears_slot() {
        let dir = tempfile::tempdir().unwrap();
        let slot = MoveSlot::new(dir.path().join("passchar.txt"));

        assert_eq!(slot.take().unwrap(), None);

        slot.write(MoveCmd::Left).unwrap();
        assert_eq!(slot.peek().unwrap(), Some(MoveCmd::Left));
        assert_eq!(slot.peek().unwrap(), Some(MoveCmd::Left));

        assert_eq!(slot.take().unwrap(), Some(MoveCmd::Left));
        assert_eq!(slot.take().unwrap(), None);
        assert!(!slot.path().exists());
    }

    #[test]
    fn test_invalid_content() {
        let dir = tempfile::tempdir().unwrap();
        let slot = MoveSlot::new(dir.path().join("passchar.txt"));

        fs::write(slot.path(), "x").unwrap();
        assert!(matches!(slot.peek(), Err(MoveSlotError::InvalidContent(_))));

        fs::write(slot.path(), "ws").unwrap();
        assert!(matches!(slot.peek(), Err(MoveSlotError::InvalidContent(_))));

        fs::write(slot.path(), "").unwrap();
        assert_eq!(slot.peek().unwrap(), None);
    }
}
