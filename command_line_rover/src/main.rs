//! # Command Line Rover
//!
//! Operator console for the rover. Each line typed is parsed into a command and published to the
//! broker, sensor replies are printed as they arrive.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::time::{Duration, Instant};
use color_eyre::{Result, eyre::WrapErr};
use colored::Colorize;
use comms_if::{
    net::{zmq, Gateway, NetParams, ZmqGateway},
    tc::{
        BracketCmd, MoveCmd, BRACKET_TOPIC, HUMIDITY_TOPIC, MOVE_TOPIC, SENSOR_TOPIC,
        TEMPERATURE_TOPIC
    },
};
use rustyline::{error::ReadlineError, DefaultEditor};
use structopt::{clap::AppSettings, StructOpt};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

const PROMPT: &str = "Rover $ ";
const HISTORY_FILE: &str = "cli_history.txt";

/// Time given to the sockets to connect to the broker before the first command is sent, otherwise
/// the broker drops it.
const CONNECT_GRACE: Duration = Duration::from_millis(500);

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// A line entered at the prompt.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "",
    setting = AppSettings::NoBinaryName,
    setting = AppSettings::DisableVersion,
    setting = AppSettings::VersionlessSubcommands
)]
enum ConsoleCmd {
    /// Position the camera bracket.
    Bracket(BracketCmd),

    /// Drive the rover.
    Move(MoveCmd),

    /// Request a temperature and humidity reading.
    Sensor {
        /// Time to wait for both readings.
        ///
        /// Units: seconds
        #[structopt(short, long, default_value = "35")]
        timeout_s: f64,
    },

    /// Publish an arbitrary payload on a topic.
    Raw {
        topic: String,
        payload: String,
    },

    /// Leave the console.
    Exit,
}

/// What the console does after a line.
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

// ------------------------------------------------------------------------------------------------
// MAIN
// ------------------------------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    println!("{}", "Rover Command Line".bold());

    let net_params: NetParams = util::params::load("net.toml")
        .wrap_err("Could not load net params")?;

    let ctx = zmq::Context::new();
    let mut gateway = ZmqGateway::new(
        &ctx,
        &net_params,
        &[TEMPERATURE_TOPIC, HUMIDITY_TOPIC]
    ).wrap_err("Failed to initialise the gateway")?;

    std::thread::sleep(CONNECT_GRACE);
    if !gateway.connected() {
        println!("{}", "Not connected to the broker yet, commands may be lost".yellow());
    }

    let mut rl = DefaultEditor::new().wrap_err("Failed to initialise the line editor")?;
    if rl.load_history(HISTORY_FILE).is_err() {
        println!("No history found");
    }

    println!("Type `help` for the list of commands");

    loop {
        let line = match rl.readline(PROMPT) {
            Ok(l) => l,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e).wrap_err("Could not read the command line")
        };

        if line.trim().is_empty() {
            continue
        }

        let _ = rl.add_history_entry(line.as_str());

        let cmd = match ConsoleCmd::from_iter_safe(line.split_whitespace()) {
            Ok(c) => c,
            Err(e) => {
                println!("{}", e.message);
                continue
            }
        };

        match exec(&mut gateway, cmd) {
            Ok(Flow::Continue) => (),
            Ok(Flow::Exit) => break,
            Err(e) => println!("{}", format!("{:#}", e).red())
        }
    }

    rl.save_history(HISTORY_FILE).wrap_err("Could not save the command history")?;

    println!("Exiting...");

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Execute a single console command.
fn exec<G: Gateway>(gateway: &mut G, cmd: ConsoleCmd) -> Result<Flow> {
    match cmd {
        ConsoleCmd::Bracket(c) => gateway.publish(BRACKET_TOPIC, c.token())?,
        ConsoleCmd::Move(c) => gateway.publish(MOVE_TOPIC, c.token())?,
        ConsoleCmd::Raw { topic, payload } => gateway.publish(&topic, &payload)?,
        ConsoleCmd::Sensor { timeout_s } => {
            let timeout = Duration::try_from_secs_f64(timeout_s)
                .wrap_err("Invalid timeout")?;

            gateway.publish(SENSOR_TOPIC, "read")?;

            match await_reading(gateway, timeout)? {
                (Some(t), Some(h)) => println!("Temperature: {} C, humidity: {} %", t, h),
                (t, h) => println!(
                    "{}",
                    format!(
                        "Timed out waiting for the sensor (temperature: {:?}, humidity: {:?})",
                        t, h
                    ).yellow()
                )
            }
        },
        ConsoleCmd::Exit => return Ok(Flow::Exit)
    }

    Ok(Flow::Continue)
}

/// Wait for both sensor replies, returning whatever arrived before the timeout.
fn await_reading<G: Gateway>(
    gateway: &mut G,
    timeout: Duration
) -> Result<(Option<String>, Option<String>)> {
    let start = Instant::now();
    let mut temperature = None;
    let mut humidity = None;

    while start.elapsed() < timeout && (temperature.is_none() || humidity.is_none()) {
        let msg = match gateway.recv()? {
            Some(m) => m,
            None => continue
        };

        let value = msg.payload_str().map(|s| s.to_string());

        match msg.topic.as_str() {
            TEMPERATURE_TOPIC => temperature = value,
            HUMIDITY_TOPIC => humidity = value,
            _ => ()
        }
    }

    Ok((temperature, humidity))
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::net::{GatewayError, Message};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeGateway {
        inbox: VecDeque<Message>,
        published: Vec<(String, String)>,
    }

    impl Gateway for FakeGateway {
        fn recv(&mut self) -> Result<Option<Message>, GatewayError> {
            Ok(self.inbox.pop_front())
        }

        fn publish(&mut self, topic: &str, payload: &str) -> Result<(), GatewayError> {
            self.published.push((topic.to_string(), payload.to_string()));
            Ok(())
        }
    }

    fn parse(line: &str) -> Option<ConsoleCmd> {
        ConsoleCmd::from_iter_safe(line.split_whitespace()).ok()
    }

    #[test]
    fn test_parse() {
        assert!(matches!(parse("bracket leftbrac"), Some(ConsoleCmd::Bracket(BracketCmd::Left))));
        assert!(matches!(parse("bracket quit"), Some(ConsoleCmd::Bracket(BracketCmd::Centre))));
        assert!(matches!(parse("move picture"), Some(ConsoleCmd::Move(MoveCmd::Picture))));
        assert!(matches!(parse("sensor -t 2"), Some(ConsoleCmd::Sensor { .. })));
        assert!(matches!(parse("exit"), Some(ConsoleCmd::Exit)));
        assert!(parse("bracket sideways").is_none());
        assert!(parse("fly").is_none());
    }

    #[test]
    fn test_exec_publishes_tokens() {
        let mut gateway = FakeGateway::default();

        for line in ["bracket upbrac", "move backward", "raw rover/bracket shake"].iter() {
            let cmd = parse(line).unwrap();
            assert_eq!(exec(&mut gateway, cmd).unwrap(), Flow::Continue);
        }

        assert_eq!(exec(&mut gateway, ConsoleCmd::Exit).unwrap(), Flow::Exit);

        assert_eq!(gateway.published, vec![
            (BRACKET_TOPIC.to_string(), "upbrac".to_string()),
            (MOVE_TOPIC.to_string(), "backward".to_string()),
            (BRACKET_TOPIC.to_string(), "shake".to_string()),
        ]);
    }

    #[test]
    fn test_await_reading() {
        let mut gateway = FakeGateway::default();
        gateway.inbox.push_back(Message::new(TEMPERATURE_TOPIC, b"21"));
        gateway.inbox.push_back(Message::new(HUMIDITY_TOPIC, b"48"));

        assert_eq!(
            await_reading(&mut gateway, Duration::from_secs(1)).unwrap(),
            (Some("21".to_string()), Some("48".to_string()))
        );

        gateway.inbox.push_back(Message::new(TEMPERATURE_TOPIC, b"22"));
        assert_eq!(
            await_reading(&mut gateway, Duration::from_millis(20)).unwrap(),
            (Some("22".to_string()), None)
        );
    }
}
