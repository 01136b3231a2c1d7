//! # Sensor Executable
//!
//! This executable reads the rover's DHT11 humidity and temperature sensor whenever a message
//! arrives on `rover/sensor`, publishing the temperature on `rover/temperature` and then the
//! humidity on `rover/humidity`, both as integers.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Parameters for the sensor executable.
mod params;

/// Request to reading relay.
mod relay;

/// Humidity and temperature sensor drivers.
mod sensor;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use std::time::Duration;
use color_eyre::{Result, eyre::WrapErr};
use comms_if::{net::{zmq, NetParams, ZmqGateway}, tc::SENSOR_TOPIC};
use log::info;

// Internal
use params::SensorExecParams;
use relay::SensorRelay;
use sensor::{HumTempSensor, sim::SimHumTempSensor};
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
        "sensor_exec",
        "sessions"
    ).wrap_err("Failed to create the session")?;

    let params: SensorExecParams = util::params::load("sensor_exec.toml")
        .wrap_err("Could not load sensor params")?;
    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load net params")?;

    logger_init(params.log_level, &session)
        .wrap_err("Failed to initialise logging")?;

    info!("Sensor Executable\n");
    info!(
        "Running on: {:#?}",
        host::get_uname().wrap_err("Failed to get host information")?
    );
    info!("Session directory: {:?}\n", session.session_root);
    info!("Parameters loaded: {:#?}", params);

    // ---- NETWORK INITIALISATION ----

    let ctx = zmq::Context::new();
    let mut gateway = ZmqGateway::new(&ctx, &net_params, &[SENSOR_TOPIC])
        .wrap_err("Failed to initialise the gateway")?;

    info!("Subscribed to {}", SENSOR_TOPIC);

    // ---- SENSOR INITIALISATION AND MAIN LOOP ----

    if params.simulate {
        info!("Using simulated sensor");
        serve(
            SimHumTempSensor::new(params.sim_temperature_c, params.sim_humidity_pct),
            &params,
            &mut gateway
        )
    }
    else {
        serve_gpio(&params, &mut gateway)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Answer sensor requests forever.
fn serve<S: HumTempSensor>(
    sensor: S,
    params: &SensorExecParams,
    gateway: &mut ZmqGateway
) -> Result<()> {
    let retry_delay = Duration::try_from_secs_f64(params.retry_delay_s)
        .wrap_err("Invalid retry delay")?;

    let mut relay = SensorRelay::new(sensor, params.max_retries, retry_delay);

    info!("Initialisation complete, entering main loop");

    util::module::run(gateway, &mut relay).wrap_err("Sensor relay stopped")
}

#[cfg(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64")))]
fn serve_gpio(params: &SensorExecParams, gateway: &mut ZmqGateway) -> Result<()> {
    let sensor = sensor::gpio::GpioDht11::new(params.sensor_pin)
        .wrap_err("Failed to initialise the DHT11")?;

    info!("Using DHT11 on GPIO {}", params.sensor_pin);

    serve(sensor, params, gateway)
}

#[cfg(not(all(target_os = "linux", any(target_arch = "arm", target_arch = "aarch64"))))]
fn serve_gpio(_params: &SensorExecParams, _gateway: &mut ZmqGateway) -> Result<()> {
    Err(color_eyre::eyre::eyre!(
        "The DHT11 can only be read on a Raspberry Pi, set `simulate = true` to run here"
    ))
}
