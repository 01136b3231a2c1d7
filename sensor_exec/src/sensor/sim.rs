//! [`HumTempSensor`] implementation returning fixed values

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use super::{HumTempSensor, Reading, SensorError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated sensor, used when no sensor hardware is available.
#[derive(Debug, Clone)]
pub struct SimHumTempSensor {
    reading: Reading,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimHumTempSensor {
    pub fn new(temperature_c: f64, humidity_pct: f64) -> Self {
        Self {
            reading: Reading {
                humidity_pct,
                temperature_c,
            }
        }
    }
}

impl HumTempSensor for SimHumTempSensor {
    fn read(&mut self) -> Result<Reading, SensorError> {
        info!("[sim] Sensor read {:?}", self.reading);
        Ok(self.reading)
    }
}
