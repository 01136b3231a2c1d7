//! # Broker Executable
//!
//! Every other executable connects to the broker rather than to each other. Publishers connect to
//! the frontend (XSUB) and subscribers to the backend (XPUB), the broker forwards messages and
//! subscriptions between the two.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use color_eyre::{Result, eyre::WrapErr};
use comms_if::net::{zmq, MonitoredSocket, SocketOptions};
use log::info;
use serde::Deserialize;
use util::{
    host,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Deserialize, Debug)]
struct BrokerExecParams {

    /// Minimum level of log messages to record
    log_level: LevelFilter,

    /// Endpoint publishers connect to, for example `tcp://*:5550`
    frontend_bind: String,

    /// Endpoint subscribers connect to, for example `tcp://*:5551`
    backend_bind: String,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {

    // ---- EARLY INITIALISATION ----

    let session = Session::new(
        "broker_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    let params: BrokerExecParams = util::params::load("broker_exec.toml")
        .wrap_err("Could not load broker params")?;

    logger_init(params.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Broker Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);

    // ---- NETWORK INITIALISATION ----

    let ctx = zmq::Context::new();

    let frontend = MonitoredSocket::new(
        &ctx,
        zmq::XSUB,
        SocketOptions {
            bind: true,
            linger: 0,
            ..Default::default()
        },
        &params.frontend_bind
    ).wrap_err("Failed to bind the frontend")?;

    let backend = MonitoredSocket::new(
        &ctx,
        zmq::XPUB,
        SocketOptions {
            bind: true,
            linger: 0,
            ..Default::default()
        },
        &params.backend_bind
    ).wrap_err("Failed to bind the backend")?;

    info!("Publishers connect to {}", params.frontend_bind);
    info!("Subscribers connect to {}", params.backend_bind);

    // ---- MAIN LOOP ----

    info!("Initialisation complete, forwarding messages");

    // Only returns if the context is terminated
    zmq::proxy(&frontend, &backend).wrap_err("Broker proxy stopped")
}
