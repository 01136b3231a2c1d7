//! [`HumTempSensor`] implementation bit-banging a DHT11 on a Raspberry Pi GPIO pin

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::{Duration, Instant}};
use log::{debug, trace};
use rppal::gpio::{Gpio, IoPin, Level, Mode};

use super::{decode_pulses, HumTempSensor, Reading, SensorError, NUM_BITS};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// How long the line is held low to wake the sensor.
const START_SIGNAL: Duration = Duration::from_millis(20);

/// Longest any single level is expected to last once the sensor is transmitting.
const LEVEL_TIMEOUT: Duration = Duration::from_micros(200);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A DHT11 sensor on a single GPIO pin.
pub struct GpioDht11 {
    pin: IoPin,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GpioDht11 {
    /// Claim the given BCM pin for the sensor.
    pub fn new(pin: u8) -> Result<Self, SensorError> {
        let mut pin = Gpio::new()?.get(pin)?.into_io(Mode::Output);
        pin.set_high();

        debug!("Claimed GPIO {} for the DHT11", pin.pin());

        Ok(Self { pin })
    }

    /// Busy wait while the line is at `level`, returning how long it stayed there.
    fn wait_while(&self, level: Level, stage: &'static str) -> Result<Duration, SensorError> {
        let start = Instant::now();

        while self.pin.read() == level {
            if start.elapsed() > LEVEL_TIMEOUT {
                return Err(SensorError::Timeout(stage))
            }
        }

        Ok(start.elapsed())
    }
}

impl HumTempSensor for GpioDht11 {
    fn read(&mut self) -> Result<Reading, SensorError> {
        // Start signal
        self.pin.set_mode(Mode::Output);
        self.pin.set_low();
        thread::sleep(START_SIGNAL);
        self.pin.set_high();
        self.pin.set_mode(Mode::Input);

        // Response: the sensor pulls low then high for 80 us each
        self.wait_while(Level::High, "response")?;
        self.wait_while(Level::Low, "response")?;
        self.wait_while(Level::High, "response")?;

        let mut high_pulses_us = Vec::with_capacity(NUM_BITS);

        for _ in 0..NUM_BITS {
            match self.wait_while(Level::Low, "bit start")
                .and_then(|_| self.wait_while(Level::High, "bit end"))
            {
                Ok(d) => high_pulses_us.push(d.as_micros() as u32),
                Err(e) => {
                    trace!("Lost the sensor after {} bits: {}", high_pulses_us.len(), e);
                    break
                }
            }
        }

        let reading = Reading::from_bytes(decode_pulses(&high_pulses_us)?)?;

        trace!("DHT11 read {:?}", reading);

        Ok(reading)
    }
}
