//! [`ServoDriver`] implementation using software PWM on the Raspberry Pi GPIO header

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::debug;
use rppal::gpio::{Gpio, OutputPin};

use super::{check_duty_cycle, ServoChannel, ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Drives the bracket servos directly from two GPIO pins.
///
/// Pins are `None` once the driver has been released.
pub struct GpioServoDriver {
    pan: Option<OutputPin>,
    tilt: Option<OutputPin>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl GpioServoDriver {
    /// Claim the given BCM pins as outputs.
    pub fn new(pan_pin: u8, tilt_pin: u8) -> Result<Self, ServoError> {
        let gpio = Gpio::new()?;

        let mut pan = gpio.get(pan_pin)?.into_output();
        let mut tilt = gpio.get(tilt_pin)?.into_output();
        pan.set_low();
        tilt.set_low();

        debug!("Claimed GPIO {} (pan) and GPIO {} (tilt)", pan_pin, tilt_pin);

        Ok(Self {
            pan: Some(pan),
            tilt: Some(tilt),
        })
    }

    fn pin_mut(&mut self, channel: ServoChannel) -> Result<&mut OutputPin, ServoError> {
        match channel {
            ServoChannel::Pan => self.pan.as_mut(),
            ServoChannel::Tilt => self.tilt.as_mut(),
        }.ok_or(ServoError::Released)
    }
}

impl ServoDriver for GpioServoDriver {
    fn enable_pwm(
        &mut self,
        channel: ServoChannel,
        frequency_hz: f64,
        duty_cycle_pct: f64
    ) -> Result<(), ServoError> {
        check_duty_cycle(duty_cycle_pct)?;

        self.pin_mut(channel)?
            .set_pwm_frequency(frequency_hz, duty_cycle_pct / 100.0)?;

        Ok(())
    }

    fn disable_pwm(&mut self, channel: ServoChannel) -> Result<(), ServoError> {
        let pin = self.pin_mut(channel)?;
        pin.clear_pwm()?;
        pin.set_low();

        Ok(())
    }

    fn release(&mut self) -> Result<(), ServoError> {
        // Pins reset to their original mode when dropped
        for pin in [self.pan.take(), self.tilt.take()].iter_mut() {
            if let Some(p) = pin {
                p.clear_pwm()?;
            }
        }

        debug!("GPIO pins released");

        Ok(())
    }
}
