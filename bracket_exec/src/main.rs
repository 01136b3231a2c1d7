//! # Camera Bracket Executable
//!
//! This executable positions the pan/tilt camera bracket in response to commands on the
//! `rover/bracket` topic:
//! - `quit` centres both servos
//! - `leftbrac`/`rightbrac` pan the camera
//! - `upbrac`/`downbrac` tilt the camera
//! - anything else releases the servos

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Bracket position state machine.
mod bracket;

/// Token to bracket operation decoding.
mod decoder;

/// Driver used to control servos.
mod servo_ctrl;

/// Parameters for the bracket executable.
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::time::Duration;
use color_eyre::{Result, eyre::WrapErr};
use comms_if::{net::{zmq, NetParams, ZmqGateway}, tc::BRACKET_TOPIC};
use log::info;

// Internal
use bracket::Bracket;
use decoder::BracketRelay;
use params::BracketExecParams;
use servo_ctrl::{ServoCtrl, ServoDriver, sim::SimServoDriver};
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
        "bracket_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    let params: BracketExecParams = util::params::load("bracket_exec.toml")
        .wrap_err("Could not load bracket params")?;
    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load net params")?;

    logger_init(params.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Camera Bracket Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    info!("Parameters loaded: {:#?}", params);

    // ---- NETWORK INITIALISATION ----

    let ctx = zmq::Context::new();
    let mut gateway = ZmqGateway::new(&ctx, &net_params, &[BRACKET_TOPIC])
        .wrap_err("Failed to initialise the gateway")?;

    info!("Subscribed to {}", BRACKET_TOPIC);

    // ---- SERVO INITIALISATION AND MAIN LOOP ----

    if params.simulate {
        info!("Using simulated servos");
        serve(SimServoDriver::new(), &params, &mut gateway)
    }
    else {
        serve_gpio(&params, &mut gateway)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Centre the bracket then relay commands to it forever.
fn serve<D: ServoDriver>(
    driver: D,
    params: &BracketExecParams,
    gateway: &mut ZmqGateway
) -> Result<()> {
    let settle_time = Duration::try_from_secs_f64(params.settle_time_s)
        .wrap_err("Invalid settle time")?;

    let servos = ServoCtrl::new(driver, params.pwm_frequency_hz, settle_time);
    let mut bracket = Bracket::new(servos, params.adjust_mode);

    bracket.reset().wrap_err("Failed to centre the bracket")?;

    let mut relay = BracketRelay::new(bracket, params.step_deg);

    info!("Initialisation complete, entering main loop");

    util::module::run(gateway, &mut relay).wrap_err("Bracket relay stopped")
}

#[cfg(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64")))]
fn serve_gpio(params: &BracketExecParams, gateway: &mut ZmqGateway) -> Result<()> {
    let driver = servo_ctrl::gpio::GpioServoDriver::new(params.pan_pin, params.tilt_pin)
        .wrap_err("Failed to initialise the GPIO servo driver")?;

    info!("Using GPIO servos");

    serve(driver, params, gateway)
}

#[cfg(not(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64"))))]
fn serve_gpio(_params: &BracketExecParams, _gateway: &mut ZmqGateway) -> Result<()> {
    Err(color_eyre::eyre::eyre!(
        "GPIO servos are only available on a Raspberry Pi, set `simulate = true` to run here"
    ))
}
