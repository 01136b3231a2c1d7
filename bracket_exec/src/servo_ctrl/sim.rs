//! [`ServoDriver`] implementation which logs demands instead of driving hardware

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::info;

use super::{check_duty_cycle, ServoChannel, ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulated servo driver, used when no servo hardware is available.
#[derive(Debug, Default)]
pub struct SimServoDriver {
    released: bool,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimServoDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_released(&self) -> Result<(), ServoError> {
        match self.released {
            true => Err(ServoError::Released),
            false => Ok(())
        }
    }
}

impl ServoDriver for SimServoDriver {
    fn enable_pwm(
        &mut self,
        channel: ServoChannel,
        frequency_hz: f64,
        duty_cycle_pct: f64
    ) -> Result<(), ServoError> {
        self.check_released()?;
        check_duty_cycle(duty_cycle_pct)?;

        info!("[sim] {:?} PWM on: {:.3} % at {} Hz", channel, duty_cycle_pct, frequency_hz);

        Ok(())
    }

    fn disable_pwm(&mut self, channel: ServoChannel) -> Result<(), ServoError> {
        self.check_released()?;

        info!("[sim] {:?} PWM off", channel);

        Ok(())
    }

    fn release(&mut self) -> Result<(), ServoError> {
        self.released = true;

        info!("[sim] Servos released");

        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_sim_release() {
        let mut driver = SimServoDriver::new();

        driver.enable_pwm(ServoChannel::Pan, 50.0, 8.0).unwrap();
        driver.disable_pwm(ServoChannel::Pan).unwrap();
        assert!(matches!(
            driver.enable_pwm(ServoChannel::Pan, 50.0, 101.0),
            Err(ServoError::InvalidDutyCycle(_))
        ));

        driver.release().unwrap();
        assert!(matches!(driver.disable_pwm(ServoChannel::Tilt), Err(ServoError::Released)));
    }
}
