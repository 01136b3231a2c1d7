//! # Communications interface crate.
//!
//! Provides all common communications interfaces for the rover relay software.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Telecommand tokens and the topics they are sent on
pub mod tc;

/// Network module
pub mod net;

/// Single slot hand-over of move commands to the motor control process
pub mod move_slot;
