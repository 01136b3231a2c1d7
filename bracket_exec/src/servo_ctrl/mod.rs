//! # Servo Controller Module
//!
//! This module provides a unified servo control interface which can abstract over different ways
//! of generating the servo PWM signal.
//!
//! Servos are positioned open loop: a PWM signal is enabled with a duty cycle derived from the
//! demanded angle, held for the settle time while the servo moves, then disabled again.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// [`ServoDriver`] implementation using software PWM on the Raspberry Pi GPIO header.
#[cfg(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64")))]
pub mod gpio;

/// [`ServoDriver`] implementation which only logs the demands.
pub mod sim;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{thread, time::Duration};
use log::trace;
use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Lowest angle the servos can be demanded to.
pub const MIN_ANGLE_DEG: f64 = 0.0;

/// Highest angle the servos can be demanded to.
pub const MAX_ANGLE_DEG: f64 = 180.0;

/// Centre of the servo travel.
pub const CENTRE_ANGLE_DEG: f64 = 90.0;

/// Duty cycle at 0 degrees.
const DUTY_CYCLE_OFFSET_PCT: f64 = 3.0;

/// Degrees of travel per percent of duty cycle.
const DEG_PER_DUTY_CYCLE_PCT: f64 = 18.0;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Trait to provide a unified API for generating servo PWM signals.
pub trait ServoDriver {

    /// Start a PWM signal on a channel.
    ///
    /// ## Arguments
    /// - `channel` - The servo to drive
    /// - `frequency_hz` - The PWM frequency
    /// - `duty_cycle_pct` - The duty cycle to set. Must be between 0 and 100, values outside this
    ///   range will be rejected.
    fn enable_pwm(
        &mut self,
        channel: ServoChannel,
        frequency_hz: f64,
        duty_cycle_pct: f64
    ) -> Result<(), ServoError>;

    /// Stop the PWM signal on a channel, leaving the output low.
    fn disable_pwm(&mut self, channel: ServoChannel) -> Result<(), ServoError>;

    /// Release all hardware held by the driver. Any later call shall return
    /// [`ServoError::Released`].
    fn release(&mut self) -> Result<(), ServoError>;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A servo angle in degrees, always within `[MIN_ANGLE_DEG, MAX_ANGLE_DEG]`.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Angle(f64);

/// Positions servos through a [`ServoDriver`].
pub struct ServoCtrl<D: ServoDriver> {
    driver: D,

    frequency_hz: f64,

    settle_time: Duration,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// The servos on the camera bracket.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize)]
pub enum ServoChannel {
    Pan,
    Tilt,
}

#[derive(thiserror::Error, Debug)]
pub enum ServoError {
    #[cfg(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64")))]
    #[error("A GPIO error occured: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    #[error("Angle {0} deg is outside the servo range")]
    AngleOutOfRange(f64),

    #[error("Duty cycle must be between 0 and 100 %, found {0}")]
    InvalidDutyCycle(f64),

    #[error("The servo driver has been released")]
    Released,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Angle {
    /// The centre of the servo travel.
    pub const CENTRE: Angle = Angle(CENTRE_ANGLE_DEG);

    /// Create an angle, rejecting values outside the servo range.
    pub fn new(deg: f64) -> Result<Self, ServoError> {
        if (MIN_ANGLE_DEG..=MAX_ANGLE_DEG).contains(&deg) {
            Ok(Angle(deg))
        }
        else {
            Err(ServoError::AngleOutOfRange(deg))
        }
    }

    /// Create an angle, limiting the value to the servo range.
    ///
    /// `NaN` maps to the centre.
    pub fn clamped(deg: f64) -> Self {
        if deg.is_nan() {
            return Self::CENTRE
        }

        Angle(util::maths::clamp(&deg, &MIN_ANGLE_DEG, &MAX_ANGLE_DEG))
    }

    pub fn deg(self) -> f64 {
        self.0
    }

    /// The PWM duty cycle, in percent, which positions a servo at this angle.
    pub fn duty_cycle_pct(self) -> f64 {
        self.0 / DEG_PER_DUTY_CYCLE_PCT + DUTY_CYCLE_OFFSET_PCT
    }
}

impl<D: ServoDriver> ServoCtrl<D> {
    /// Create a new servo controller.
    ///
    /// ## Arguments
    /// - `driver` - An initialised [`ServoDriver`]
    /// - `frequency_hz` - The PWM frequency the servos expect
    /// - `settle_time` - How long the signal is held for the servo to reach its position
    pub fn new(driver: D, frequency_hz: f64, settle_time: Duration) -> Self {
        Self {
            driver,
            frequency_hz,
            settle_time,
        }
    }

    /// Move a servo to the given angle.
    ///
    /// Blocks the calling thread for the settle time.
    pub fn set_angle(&mut self, channel: ServoChannel, angle: Angle) -> Result<(), ServoError> {
        let duty_cycle_pct = angle.duty_cycle_pct();

        trace!(
            "{:?} servo to {:.1} deg ({:.3} % duty at {} Hz)",
            channel, angle.deg(), duty_cycle_pct, self.frequency_hz
        );

        self.driver.enable_pwm(channel, self.frequency_hz, duty_cycle_pct)?;

        if self.settle_time > Duration::from_secs(0) {
            thread::sleep(self.settle_time);
        }

        self.driver.disable_pwm(channel)
    }

    /// Release the underlying driver.
    pub fn release(&mut self) -> Result<(), ServoError> {
        self.driver.release()
    }

    #[cfg(test)]
    pub fn driver(&self) -> &D {
        &self.driver
    }
}

/// Check a duty cycle is a valid percentage.
pub(crate) fn check_duty_cycle(duty_cycle_pct: f64) -> Result<(), ServoError> {
    if (0.0..=100.0).contains(&duty_cycle_pct) {
        Ok(())
    }
    else {
        Err(ServoError::InvalidDutyCycle(duty_cycle_pct))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
