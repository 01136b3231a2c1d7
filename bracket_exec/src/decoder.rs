//! # Bracket Command Decoder
//!
//! Maps each token recieved on the bracket topic onto a bracket operation. Any token which isn't
//! a bracket command releases the servos.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::tc::BracketCmd;
use log::{debug, warn};
use util::module::{Publication, Relay};

use crate::{
    bracket::{Bracket, BracketError},
    servo_ctrl::{ServoChannel, ServoDriver},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// [`Relay`] owning the bracket and applying decoded tokens to it.
pub struct BracketRelay<D: ServoDriver> {
    bracket: Bracket<D>,

    /// Size of a single adjustment in degrees
    step_deg: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// An operation on the [`Bracket`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum BracketOp {
    Reset,
    Adjust(ServoChannel, f64),
    Teardown,
}

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Decode a token into a bracket operation.
pub fn decode(token: &str, step_deg: f64) -> BracketOp {
    match BracketCmd::from_token(token) {
        Some(BracketCmd::Centre) => BracketOp::Reset,
        Some(BracketCmd::Right) => BracketOp::Adjust(ServoChannel::Pan, -step_deg),
        Some(BracketCmd::Left) => BracketOp::Adjust(ServoChannel::Pan, step_deg),
        Some(BracketCmd::Up) => BracketOp::Adjust(ServoChannel::Tilt, -step_deg),
        Some(BracketCmd::Down) => BracketOp::Adjust(ServoChannel::Tilt, step_deg),
        None => BracketOp::Teardown,
    }
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<D: ServoDriver> BracketRelay<D> {
    pub fn new(bracket: Bracket<D>, step_deg: f64) -> Self {
        Self {
            bracket,
            step_deg,
        }
    }

    #[cfg(test)]
    pub fn bracket(&self) -> &Bracket<D> {
        &self.bracket
    }

    /// Apply a single operation to the bracket.
    pub fn apply(&mut self, op: BracketOp) -> Result<(), BracketError> {
        match op {
            BracketOp::Reset => self.bracket.reset(),
            BracketOp::Adjust(channel, delta_deg) => self.bracket.adjust(channel, delta_deg),
            BracketOp::Teardown => self.bracket.teardown(),
        }
    }
}

impl<D: ServoDriver> Relay for BracketRelay<D> {
    type ProcError = BracketError;

    fn proc(&mut self, token: &str) -> Result<Vec<Publication>, BracketError> {
        let op = decode(token, self.step_deg);

        if op == BracketOp::Teardown {
            warn!("Unrecognised bracket command {:?}", token);
        }

        self.apply(op)?;

        debug!(
            "Bracket {:?} at {:?}",
            self.bracket.status(), self.bracket.position()
        );

        Ok(Vec::new())
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        bracket::{AdjustMode, BracketPosition, BracketStatus},
        servo_ctrl::{
            Angle, ServoCtrl,
            test::{DriverCall, RecordingDriver},
        },
    };
    use std::time::Duration;

    fn relay(mode: AdjustMode) -> BracketRelay<RecordingDriver> {
        let servos = ServoCtrl::new(RecordingDriver::default(), 50.0, Duration::from_secs(0));
        BracketRelay::new(Bracket::new(servos, mode), 15.0)
    }

    fn calls(r: &BracketRelay<RecordingDriver>) -> &[DriverCall] {
        &r.bracket().servos().driver().calls
    }

    fn duty(deg: f64) -> f64 {
        Angle::new(deg).unwrap().duty_cycle_pct()
    }

    #[test]
    fn test_decode() {
        assert_eq!(decode("quit", 15.0), BracketOp::Reset);
        assert_eq!(decode("rightbrac", 15.0), BracketOp::Adjust(ServoChannel::Pan, -15.0));
        assert_eq!(decode("leftbrac", 15.0), BracketOp::Adjust(ServoChannel::Pan, 15.0));
        assert_eq!(decode("upbrac", 15.0), BracketOp::Adjust(ServoChannel::Tilt, -15.0));
        assert_eq!(decode("downbrac", 15.0), BracketOp::Adjust(ServoChannel::Tilt, 15.0));
        assert_eq!(decode("UPBRAC", 15.0), BracketOp::Teardown);
        assert_eq!(decode("forward", 15.0), BracketOp::Teardown);
        assert_eq!(decode("", 15.0), BracketOp::Teardown);
    }

    #[test]
    fn test_each_token_drives_one_servo() {
        let cases = [
            ("rightbrac", ServoChannel::Pan, 75.0),
            ("leftbrac", ServoChannel::Pan, 105.0),
            ("upbrac", ServoChannel::Tilt, 75.0),
            ("downbrac", ServoChannel::Tilt, 105.0),
        ];

        for (token, channel, deg) in cases.iter() {
            let mut r = relay(AdjustMode::FromCentre);

            let publications = r.proc(token).unwrap();

            assert!(publications.is_empty());
            assert_eq!(calls(&r), &[
                DriverCall::Enable(*channel, 50.0, duty(*deg)),
                DriverCall::Disable(*channel),
            ]);
        }
    }

    #[test]
    fn test_quit_centres() {
        let mut r = relay(AdjustMode::Accumulate);

        r.proc("leftbrac").unwrap();
        r.proc("downbrac").unwrap();
        r.proc("quit").unwrap();

        assert_eq!(r.bracket().position(), BracketPosition::centred());

        // Idempotent
        r.proc("quit").unwrap();
        assert_eq!(r.bracket().position(), BracketPosition::centred());
    }

    #[test]
    fn test_unknown_token_tears_down() {
        let mut r = relay(AdjustMode::FromCentre);

        r.proc("sideways").unwrap();

        assert_eq!(r.bracket().status(), BracketStatus::Released);
        assert_eq!(calls(&r), &[DriverCall::Release]);

        r.proc("leftbrac").unwrap();
        r.proc("quit").unwrap();
        assert_eq!(calls(&r), &[DriverCall::Release]);
    }

    #[test]
    fn test_left_then_right() {
        let mut r = relay(AdjustMode::FromCentre);
        r.proc("leftbrac").unwrap();
        r.proc("rightbrac").unwrap();
        assert_eq!(r.bracket().servos().driver().duty_cycles(), vec![
            (ServoChannel::Pan, duty(105.0)),
            (ServoChannel::Pan, duty(75.0)),
        ]);

        let mut r = relay(AdjustMode::Accumulate);
        r.proc("leftbrac").unwrap();
        r.proc("rightbrac").unwrap();
        assert_eq!(r.bracket().servos().driver().duty_cycles(), vec![
            (ServoChannel::Pan, duty(105.0)),
            (ServoChannel::Pan, duty(90.0)),
        ]);
    }
}
