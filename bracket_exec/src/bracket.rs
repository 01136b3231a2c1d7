//! # Camera Bracket State Machine
//!
//! Holds the pan/tilt position of the camera bracket and applies relative adjustments to it.
//!
//! The bracket starts centred. Adjustments are bounded to the servo range before being sent to
//! the servos. Once torn down the servos are released and every later command is ignored until
//! the executable is restarted.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, error, info, warn};
use serde::Deserialize;

use crate::servo_ctrl::{Angle, ServoChannel, ServoCtrl, ServoDriver, ServoError};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// The last commanded position of the bracket.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct BracketPosition {
    pub pan: Angle,
    pub tilt: Angle,
}

/// Camera bracket state machine.
pub struct Bracket<D: ServoDriver> {
    servos: ServoCtrl<D>,

    position: BracketPosition,

    mode: AdjustMode,

    status: BracketStatus,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// What a relative adjustment is applied to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustMode {
    /// Every adjustment is an offset from the centre, so repeated adjustments in the same
    /// direction do not compound.
    FromCentre,

    /// Every adjustment is an offset from the last commanded angle of that axis.
    Accumulate,
}

/// Whether the bracket still holds its servos.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BracketStatus {
    Active,
    Released,
}

#[derive(Debug, thiserror::Error)]
pub enum BracketError {
    #[error("Servo error: {0}")]
    ServoError(ServoError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for AdjustMode {
    fn default() -> Self {
        AdjustMode::FromCentre
    }
}

impl BracketPosition {
    pub fn centred() -> Self {
        Self {
            pan: Angle::CENTRE,
            tilt: Angle::CENTRE,
        }
    }

    pub fn get(&self, channel: ServoChannel) -> Angle {
        match channel {
            ServoChannel::Pan => self.pan,
            ServoChannel::Tilt => self.tilt,
        }
    }

    fn set(&mut self, channel: ServoChannel, angle: Angle) {
        match channel {
            ServoChannel::Pan => self.pan = angle,
            ServoChannel::Tilt => self.tilt = angle,
        }
    }
}

impl<D: ServoDriver> Bracket<D> {
    /// Create a new bracket. No servo is moved until a command is applied.
    pub fn new(servos: ServoCtrl<D>, mode: AdjustMode) -> Self {
        Self {
            servos,
            position: BracketPosition::centred(),
            mode,
            status: BracketStatus::Active,
        }
    }

    pub fn position(&self) -> BracketPosition {
        self.position
    }

    pub fn status(&self) -> BracketStatus {
        self.status
    }

    /// Move both axes to the centre, pan first.
    pub fn reset(&mut self) -> Result<(), BracketError> {
        if self.check_released("reset") {
            return Ok(())
        }

        for channel in [ServoChannel::Pan, ServoChannel::Tilt].iter() {
            self.servos.set_angle(*channel, Angle::CENTRE)?;
            self.position.set(*channel, Angle::CENTRE);
        }

        info!("Bracket centred");

        Ok(())
    }

    /// Move one axis by `delta_deg` relative to the baseline given by the [`AdjustMode`].
    ///
    /// The result is limited to the servo range.
    pub fn adjust(&mut self, channel: ServoChannel, delta_deg: f64) -> Result<(), BracketError> {
        if self.check_released("adjust") {
            return Ok(())
        }

        let baseline = match self.mode {
            AdjustMode::FromCentre => Angle::CENTRE,
            AdjustMode::Accumulate => self.position.get(channel),
        };

        let target_deg = baseline.deg() + delta_deg;
        let angle = Angle::clamped(target_deg);
        if angle.deg() != target_deg {
            warn!(
                "{:?} demand of {:.1} deg limited to {:.1} deg",
                channel, target_deg, angle.deg()
            );
        }

        self.servos.set_angle(channel, angle)?;
        self.position.set(channel, angle);

        info!("Bracket {:?} at {:.1} deg", channel, angle.deg());

        Ok(())
    }

    /// Release the servos. Later commands have no effect.
    ///
    /// A failure to release the hardware is logged rather than returned, the bracket is released
    /// either way.
    pub fn teardown(&mut self) -> Result<(), BracketError> {
        if self.status == BracketStatus::Released {
            debug!("Bracket already released");
            return Ok(())
        }

        self.status = BracketStatus::Released;

        match self.servos.release() {
            Ok(_) => warn!("Bracket servos released, further bracket commands will be ignored"),
            Err(e) => error!(
                "Could not release the bracket servos ({}), further bracket commands will be \
                 ignored",
                e
            )
        }

        Ok(())
    }

    /// Returns `true` and logs if the bracket has been released.
    fn check_released(&self, op: &str) -> bool {
        if self.status == BracketStatus::Released {
            warn!("Ignoring bracket {} as the servos have been released", op);
            true
        }
        else {
            false
        }
    }

    #[cfg(test)]
    pub fn servos(&self) -> &ServoCtrl<D> {
        &self.servos
    }
}

impl From<ServoError> for BracketError {
    fn from(e: ServoError) -> Self {
        BracketError::ServoError(e)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::servo_ctrl::test::{DriverCall, RecordingDriver};
    use std::time::Duration;

    fn bracket(mode: AdjustMode) -> Bracket<RecordingDriver> {
        Bracket::new(
            ServoCtrl::new(RecordingDriver::default(), 50.0, Duration::from_secs(0)),
            mode
        )
    }

    fn duty(deg: f64) -> f64 {
        Angle::new(deg).unwrap().duty_cycle_pct()
    }

    #[test]
    fn test_reset() {
        let mut b = bracket(AdjustMode::Accumulate);

        b.adjust(ServoChannel::Pan, 30.0).unwrap();
        b.adjust(ServoChannel::Tilt, -45.0).unwrap();
        b.reset().unwrap();

        assert_eq!(b.position(), BracketPosition::centred());
        assert_eq!(&b.servos().driver().calls[4..], &[
            DriverCall::Enable(ServoChannel::Pan, 50.0, 8.0),
            DriverCall::Disable(ServoChannel::Pan),
            DriverCall::Enable(ServoChannel::Tilt, 50.0, 8.0),
            DriverCall::Disable(ServoChannel::Tilt),
        ]);
    }

    #[test]
    fn test_adjust_from_centre() {
        let mut b = bracket(AdjustMode::FromCentre);

        b.adjust(ServoChannel::Pan, 15.0).unwrap();
        b.adjust(ServoChannel::Pan, 15.0).unwrap();
        b.adjust(ServoChannel::Pan, -15.0).unwrap();

        assert_eq!(b.servos().driver().duty_cycles(), vec![
            (ServoChannel::Pan, duty(105.0)),
            (ServoChannel::Pan, duty(105.0)),
            (ServoChannel::Pan, duty(75.0)),
        ]);
        assert_eq!(b.position().pan.deg(), 75.0);
        assert_eq!(b.position().tilt, Angle::CENTRE);
    }

    #[test]
    fn test_adjust_accumulate() {
        let mut b = bracket(AdjustMode::Accumulate);

        b.adjust(ServoChannel::Pan, 15.0).unwrap();
        b.adjust(ServoChannel::Pan, 15.0).unwrap();
        b.adjust(ServoChannel::Tilt, -15.0).unwrap();

        assert_eq!(b.position().pan.deg(), 120.0);
        assert_eq!(b.position().tilt.deg(), 75.0);
    }

    #[test]
    fn test_adjust_limited() {
        let mut b = bracket(AdjustMode::Accumulate);

        for _ in 0..8 {
            b.adjust(ServoChannel::Tilt, 15.0).unwrap();
        }
        assert_eq!(b.position().tilt.deg(), 180.0);

        let mut b = bracket(AdjustMode::FromCentre);
        b.adjust(ServoChannel::Pan, -120.0).unwrap();
        assert_eq!(b.position().pan.deg(), 0.0);
        assert_eq!(b.servos().driver().duty_cycles(), vec![(ServoChannel::Pan, 3.0)]);
    }

    #[test]
    fn test_teardown() {
        let mut b = bracket(AdjustMode::FromCentre);

        b.teardown().unwrap();
        assert_eq!(b.status(), BracketStatus::Released);
        assert_eq!(b.servos().driver().calls, vec![DriverCall::Release]);

        // Nothing reaches the driver once released
        b.adjust(ServoChannel::Pan, 15.0).unwrap();
        b.reset().unwrap();
        b.teardown().unwrap();
        assert_eq!(b.servos().driver().calls, vec![DriverCall::Release]);
    }

    #[test]
    fn test_teardown_release_failure() {
        let driver = RecordingDriver {
            fail_release: true,
            ..Default::default()
        };
        let mut b = Bracket::new(
            ServoCtrl::new(driver, 50.0, Duration::from_secs(0)),
            AdjustMode::FromCentre
        );

        assert!(b.teardown().is_ok());
        assert_eq!(b.status(), BracketStatus::Released);

        b.adjust(ServoChannel::Tilt, 15.0).unwrap();
        assert_eq!(b.servos().driver().calls, vec![DriverCall::Release]);
    }
}
