//! # Telecommand module
//!
//! Telecommands are sent to the rover by the operator as plain text tokens, one token per message.
//! Each executable subscribes to a single topic and interprets the tokens arriving on it.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod bracket;
pub mod motion;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use bracket::BracketCmd;
pub use motion::MoveCmd;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Topic carrying camera bracket commands.
pub const BRACKET_TOPIC: &str = "rover/bracket";

/// Topic carrying locomotion commands.
pub const MOVE_TOPIC: &str = "rover/move";

/// Topic used to request a sensor reading. The payload is ignored.
pub const SENSOR_TOPIC: &str = "rover/sensor";

/// Topic the temperature (degrees C, integer) is published on.
pub const TEMPERATURE_TOPIC: &str = "rover/temperature";

/// Topic the relative humidity (percent, integer) is published on.
pub const HUMIDITY_TOPIC: &str = "rover/humidity";
