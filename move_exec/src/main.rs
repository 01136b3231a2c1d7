//! # Move Executable
//!
//! This executable relays locomotion commands from the `rover/move` topic to the motor control
//! process, which reads them as single characters from the move slot file.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Parameters for the move executable.
mod params;

/// Token to move slot relay.
mod relay;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{Result, eyre::WrapErr};
use comms_if::{
    move_slot::MoveSlot,
    net::{zmq, NetParams, ZmqGateway},
    tc::MOVE_TOPIC,
};
use log::info;

// Internal
use params::MoveExecParams;
use relay::MoveRelay;
use util::{
    host,
    logger::logger_init,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "move_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    let params: MoveExecParams = util::params::load("move_exec.toml")
        .wrap_err("Could not load move params")?;
    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load net params")?;

    logger_init(params.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Move Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- SLOT INITIALISATION ----

    let slot_path = host::get_sw_root()
        .wrap_err("Could not find the software root")?
        .join(&params.slot_path);
    let mut relay = MoveRelay::new(MoveSlot::new(slot_path.clone()));

    info!("Move commands will be written to {:?}", slot_path);

    // ---- NETWORK INITIALISATION ----

    let ctx = zmq::Context::new();
    let mut gateway = ZmqGateway::new(&ctx, &net_params, &[MOVE_TOPIC])
        .wrap_err("Failed to initialise the gateway")?;

    info!("Subscribed to {}", MOVE_TOPIC);

    // ---- MAIN LOOP ----

    info!("Initialisation complete, entering main loop");

    util::module::run(&mut gateway, &mut relay).wrap_err("Move relay stopped")
}
