//! Generic parameters functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::de::DeserializeOwned;
use std::{fs::read_to_string, path::{Path, PathBuf}};
use thiserror::Error;
use toml;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// An error that occurs during loading of a parameter file.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("The software root environment variable (ROVER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot load the parmeter file {0:?}: {1}")]
    FileLoadError(PathBuf, std::io::Error),

    #[error("Cannot read the parameter file {0:?}: {1}")]
    DeserialiseError(PathBuf, toml::de::Error)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Load a parameter file
///
/// The file path is relative to the "$ROVER_SW_ROOT/params" directory
pub fn load<P>(param_file_path: &str) -> Result<P, LoadError>
where
    P: DeserializeOwned
{
    let mut dir = crate::host::get_sw_root()
        .map_err(|_| LoadError::SwRootNotSet)?;
    dir.push("params");

    load_from_dir(dir, param_file_path)
}

/// Load a parameter file from the given directory.
pub fn load_from_dir<D, P>(dir: D, param_file_path: &str) -> Result<P, LoadError>
where
    D: AsRef<Path>,
    P: DeserializeOwned
{
    let path = dir.as_ref().join(param_file_path);

    let params_str = match read_to_string(&path) {
        Ok(s) => s,
        Err(e) => return Err(LoadError::FileLoadError(path, e))
    };

    match toml::from_str(params_str.as_str()) {
        Ok(p) => Ok(p),
        Err(e) => Err(LoadError::DeserialiseError(path, e))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct TestParams {
        name: String,
        step_deg: f64
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("test.toml"),
            "name = \"bracket\"\nstep_deg = 15.0\n"
        ).unwrap();

        let params: TestParams = load_from_dir(dir.path(), "test.toml").unwrap();
        assert_eq!(params, TestParams { name: "bracket".into(), step_deg: 15.0 });

        let missing: Result<TestParams, _> = load_from_dir(dir.path(), "missing.toml");
        assert!(matches!(missing, Err(LoadError::FileLoadError(_, _))));

        std::fs::write(dir.path().join("bad.toml"), "name = 3\n").unwrap();
        let bad: Result<TestParams, _> = load_from_dir(dir.path(), "bad.toml");
        assert!(matches!(bad, Err(LoadError::DeserialiseError(_, _))));
    }

    #[test]
    fn test_net_params_load() {
        let params: comms_if::net::NetParams = load_from_dir(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params"),
            "net.toml"
        ).unwrap();

        assert_eq!(params.broker_frontend_endpoint, "tcp://localhost:5550");
        assert_eq!(params.broker_backend_endpoint, "tcp://localhost:5551");
    }
}
