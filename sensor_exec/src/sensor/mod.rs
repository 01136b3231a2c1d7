//! # Humidity/Temperature Sensor Module
//!
//! The rover carries a DHT11 humidity and temperature sensor. The sensor answers a start signal
//! with 40 bits, each sent as a fixed low period followed by a high pulse whose length gives the
//! bit value. The bits form five bytes:
//!
//! | byte | content |
//! |---|---|
//! | 0 | relative humidity, integer part |
//! | 1 | relative humidity, decimal part |
//! | 2 | temperature, integer part |
//! | 3 | temperature, decimal part (bit 7 set for negative temperatures) |
//! | 4 | checksum, low byte of the sum of bytes 0 to 3 |
//!
//! Reads regularly fail on a non real-time OS, so [`read_retry`] is used to get a reading.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`HumTempSensor`] implementation bit-banging a DHT11 on a Raspberry Pi GPIO pin.
#[cfg(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64")))]
pub mod gpio;

/// [`HumTempSensor`] implementation returning fixed values.
pub mod sim;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::Duration};
use log::debug;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of data bits in one DHT11 transmission.
pub const NUM_BITS: usize = 40;

/// High pulses longer than this are a `1` bit.
///
/// Units: microseconds
pub const ONE_THRESHOLD_US: u32 = 40;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A sensor providing relative humidity and temperature.
pub trait HumTempSensor {
    /// Take a single reading.
    fn read(&mut self) -> Result<Reading, SensorError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single sensor reading.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    /// Units: percent
    pub humidity_pct: f64,

    /// Units: degrees celsius
    pub temperature_c: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum SensorError {
    #[cfg(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64")))]
    #[error("A GPIO error occured: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("Timed out waiting for the sensor {0}")]
    Timeout(&'static str),

    #[error("Expected {} bits from the sensor, recieved {0}", NUM_BITS)]
    MissingBits(usize),

    #[error("Checksum mismatch, computed {computed:#04x} but the sensor sent {sent:#04x}")]
    Checksum { computed: u8, sent: u8 },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Reading {
    /// Build a reading from the five bytes sent by the sensor, checking the checksum.
    pub fn from_bytes(bytes: [u8; 5]) -> Result<Self, SensorError> {
        let computed = bytes[..4].iter().fold(0u8, |acc, b| acc.wrapping_add(*b));
        if computed != bytes[4] {
            return Err(SensorError::Checksum { computed, sent: bytes[4] })
        }

        let humidity_pct = bytes[0] as f64 + bytes[1] as f64 / 10.0;

        let mut temperature_c = bytes[2] as f64 + (bytes[3] & 0x7f) as f64 / 10.0;
        if bytes[3] & 0x80 != 0 {
            temperature_c = -temperature_c;
        }

        Ok(Self {
            humidity_pct,
            temperature_c,
        })
    }
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Convert the length of each high pulse into the five data bytes, most significant bit first.
pub fn decode_pulses(high_pulses_us: &[u32]) -> Result<[u8; 5], SensorError> {
    if high_pulses_us.len() != NUM_BITS {
        return Err(SensorError::MissingBits(high_pulses_us.len()))
    }

    let mut bytes = [0u8; 5];

    for (i, pulse_us) in high_pulses_us.iter().enumerate() {
        bytes[i / 8] <<= 1;
        if *pulse_us > ONE_THRESHOLD_US {
            bytes[i / 8] |= 1;
        }
    }

    Ok(bytes)
}

/// Read the sensor, trying up to `max_attempts` times with `retry_delay` between attempts.
///
/// The error of the last attempt is returned if all attempts fail.
pub fn read_retry<S: HumTempSensor>(
    sensor: &mut S,
    max_attempts: u32,
    retry_delay: Duration
) -> Result<Reading, SensorError> {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match sensor.read() {
            Ok(r) => return Ok(r),
            Err(e) if attempt >= max_attempts => return Err(e),
            Err(e) => debug!("Sensor read {} of {} failed: {}", attempt, max_attempts, e)
        }

        attempt += 1;
        thread::sleep(retry_delay);
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use std::collections::VecDeque;

    /// Sensor returning queued results, then failing with a timeout.
    #[derive(Default)]
    pub struct QueuedSensor {
        pub results: VecDeque<Result<Reading, SensorError>>,
        pub num_reads: usize,
    }

    impl HumTempSensor for QueuedSensor {
        fn read(&mut self) -> Result<Reading, SensorError> {
            self.num_reads += 1;
            self.results.pop_front().unwrap_or(Err(SensorError::Timeout("response")))
        }
    }

    /// Pulse lengths a sensor would produce for the given bytes.
    fn pulses(bytes: [u8; 5]) -> Vec<u32> {
        bytes.iter()
            .flat_map(|b| (0..8).rev().map(move |i| if b >> i & 1 == 1 { 70 } else { 27 }))
            .collect()
    }

    #[test]
    fn test_decode_pulses() {
        let bytes = [0x37, 0x00, 0x17, 0x05, 0x53];
        assert_eq!(decode_pulses(&pulses(bytes)).unwrap(), bytes);

        assert!(matches!(decode_pulses(&[70; 39]), Err(SensorError::MissingBits(39))));
    }

    #[test]
    fn test_reading_from_bytes() {
        let r = Reading::from_bytes([55, 0, 23, 5, 83]).unwrap();
        assert_eq!(r.humidity_pct, 55.0);
        assert_eq!(r.temperature_c, 23.5);

        let r = Reading::from_bytes([40, 0, 2, 0x83, 0xad]).unwrap();
        assert_eq!(r.temperature_c, -2.3);

        // Checksum wraps
        assert!(Reading::from_bytes([200, 0, 100, 0, 44]).is_ok());

        assert!(matches!(
            Reading::from_bytes([55, 0, 23, 5, 84]),
            Err(SensorError::Checksum { computed: 83, sent: 84 })
        ));
    }

    #[test]
    fn test_read_retry() {
        let reading = Reading { humidity_pct: 40.0, temperature_c: 21.0 };

        let mut sensor = QueuedSensor::default();
        sensor.results.push_back(Err(SensorError::Timeout("response")));
        sensor.results.push_back(Err(SensorError::MissingBits(12)));
        sensor.results.push_back(Ok(reading));

        assert_eq!(read_retry(&mut sensor, 15, Duration::from_secs(0)).unwrap(), reading);
        assert_eq!(sensor.num_reads, 3);

        let mut sensor = QueuedSensor::default();
        assert!(matches!(
            read_retry(&mut sensor, 4, Duration::from_secs(0)),
            Err(SensorError::Timeout(_))
        ));
        assert_eq!(sensor.num_reads, 4);

        let mut sensor = QueuedSensor::default();
        assert!(read_retry(&mut sensor, 0, Duration::from_secs(0)).is_err());
        assert_eq!(sensor.num_reads, 1);
    }
}
