//! # Bracket Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use util::logger::LevelFilter;

use crate::bracket::AdjustMode;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
pub struct BracketExecParams {

    /// Minimum level of log messages to record
    pub log_level: LevelFilter,

    /// Log the servo demands instead of driving the GPIO pins
    pub simulate: bool,

    /// BCM number of the pan servo's GPIO pin
    pub pan_pin: u8,

    /// BCM number of the tilt servo's GPIO pin
    pub tilt_pin: u8,

    /// Servo PWM frequency.
    ///
    /// Units: hertz
    pub pwm_frequency_hz: f64,

    /// Time the PWM signal is held for after each demand so the servo can reach its position. The
    /// executable does not process any other command during this time.
    ///
    /// Units: seconds
    pub settle_time_s: f64,

    /// Size of a single bracket adjustment.
    ///
    /// Units: degrees
    pub step_deg: f64,

    /// Whether adjustments are made from the centre or from the last commanded angle
    #[serde(default)]
    pub adjust_mode: AdjustMode,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_default_params_load() {
        let params: BracketExecParams = util::params::load_from_dir(
            concat!(env!("CARGO_MANIFEST_DIR"), "/../params"),
            "bracket_exec.toml"
        ).unwrap();

        assert_eq!(params.step_deg, 15.0);
        assert_eq!(params.adjust_mode, AdjustMode::FromCentre);
    }
}
