//! # Move Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use util::logger::LevelFilter;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
pub struct MoveExecParams {

    /// Minimum level of log messages to record
    pub log_level: LevelFilter,

    /// Path of the move command slot file read by the motor control process. Relative paths are
    /// relative to the software root.
    pub slot_path: String,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_load() {
        let params: MoveExecParams = util::params::load_from_dir(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params"),
            "move_exec.toml"
        ).unwrap();

        assert_eq!(params.slot_path, "passchar.txt");
    }
}
