//! # Sensor Executable Parameters

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;
use util::logger::LevelFilter;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
pub struct SensorExecParams {

    /// Minimum level of log messages to record
    pub log_level: LevelFilter,

    /// Return fixed readings instead of reading the GPIO pin
    pub simulate: bool,

    /// BCM number of the DHT11's data pin
    pub sensor_pin: u8,

    /// Number of attempts made to read the sensor before giving up
    pub max_retries: u32,

    /// Time between read attempts.
    ///
    /// Units: seconds
    pub retry_delay_s: f64,

    /// Temperature returned when simulating.
    ///
    /// Units: degrees celsius
    pub sim_temperature_c: f64,

    /// Relative humidity returned when simulating.
    ///
    /// Units: percent
    pub sim_humidity_pct: f64,
}
