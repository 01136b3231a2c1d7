//! # Sensor Relay
//!
//! Takes a humidity/temperature reading whenever a request arrives and publishes it back.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::Duration;
use comms_if::tc::{HUMIDITY_TOPIC, TEMPERATURE_TOPIC};
use log::info;
use util::module::{Publication, Relay};

use crate::sensor::{read_retry, HumTempSensor, SensorError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// [`Relay`] answering every request with a temperature and a humidity message.
pub struct SensorRelay<S: HumTempSensor> {
    sensor: S,

    max_attempts: u32,

    retry_delay: Duration,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SensorRelayError {
    #[error("Could not read the sensor: {0}")]
    Sensor(#[from] SensorError),

    #[error("Sensor value {0} cannot be published as an integer")]
    NotRepresentable(f64),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<S: HumTempSensor> SensorRelay<S> {
    pub fn new(sensor: S, max_attempts: u32, retry_delay: Duration) -> Self {
        Self {
            sensor,
            max_attempts,
            retry_delay,
        }
    }
}

impl<S: HumTempSensor> Relay for SensorRelay<S> {
    type ProcError = SensorRelayError;

    /// The request content is ignored.
    fn proc(&mut self, _token: &str) -> Result<Vec<Publication>, SensorRelayError> {
        let reading = read_retry(&mut self.sensor, self.max_attempts, self.retry_delay)?;

        let temperature = util::maths::trunc_to_i64(reading.temperature_c)
            .ok_or(SensorRelayError::NotRepresentable(reading.temperature_c))?;
        let humidity = util::maths::trunc_to_i64(reading.humidity_pct)
            .ok_or(SensorRelayError::NotRepresentable(reading.humidity_pct))?;

        info!("Temperature {} C, humidity {} %", temperature, humidity);

        Ok(vec![
            Publication::new(TEMPERATURE_TOPIC, temperature),
            Publication::new(HUMIDITY_TOPIC, humidity),
        ])
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sensor::{Reading, sim::SimHumTempSensor, test::QueuedSensor};

    #[test]
    fn test_publishes_temperature_then_humidity() {
        let mut relay = SensorRelay::new(
            SimHumTempSensor::new(23.8, 41.2),
            15,
            Duration::from_secs(0)
        );

        for request in ["", "read", "anything at all"].iter() {
            assert_eq!(relay.proc(request).unwrap(), vec![
                Publication::new(TEMPERATURE_TOPIC, "23"),
                Publication::new(HUMIDITY_TOPIC, "41"),
            ]);
        }

        let mut relay = SensorRelay::new(
            SimHumTempSensor::new(-2.3, 80.0),
            15,
            Duration::from_secs(0)
        );
        assert_eq!(relay.proc("").unwrap()[0].payload, "-2");
    }

    #[test]
    fn test_retries_then_fails() {
        let mut sensor = QueuedSensor::default();
        sensor.results.push_back(Err(SensorError::MissingBits(3)));
        sensor.results.push_back(Ok(Reading { humidity_pct: 55.0, temperature_c: 21.5 }));

        let mut relay = SensorRelay::new(sensor, 3, Duration::from_secs(0));

        let pubs = relay.proc("").unwrap();
        assert_eq!(pubs.len(), 2);
        assert_eq!(pubs[0].payload, "21");
        assert_eq!(pubs[1].payload, "55");

        // Queue is now empty so every attempt times out
        assert!(matches!(
            relay.proc(""),
            Err(SensorRelayError::Sensor(SensorError::Timeout(_)))
        ));
        assert_eq!(relay.sensor.num_reads, 2 + 3);
    }
}
