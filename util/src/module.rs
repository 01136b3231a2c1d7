//! Relay interfaces
//!
//! Each executable which reacts to telecommands shall provide a [`Relay`] and hand it to [`run`].
//! The loop is single threaded: one message is fully processed, including any actuator delays,
//! before the next one is received.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::{debug, info, trace, warn};

use comms_if::net::{Gateway, GatewayError};

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Translates telecommand tokens into actions.
pub trait Relay {
    /// An error which can occur while processing a token. Any such error stops the loop.
    type ProcError: std::error::Error + 'static;

    /// Process a single token.
    ///
    /// # Outputs
    /// - On success the messages to publish in response, in order.
    /// - On error a `ProcError` instance.
    fn proc(&mut self, token: &str) -> Result<Vec<Publication>, Self::ProcError>;
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A message a [`Relay`] wants published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    pub topic: String,
    pub payload: String,
}

/// Tracks what the loop has seen of the broker connection, so changes are logged once.
#[derive(Debug, Default)]
pub struct LoopState {
    connected: Option<bool>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RunError<E>
where
    E: std::error::Error + 'static
{
    #[error("Gateway error: {0}")]
    Gateway(#[source] GatewayError),

    #[error("Relay error: {0}")]
    Relay(#[source] E),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Publication {
    pub fn new<T: ToString>(topic: &str, payload: T) -> Self {
        Self {
            topic: topic.to_string(),
            payload: payload.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Run the relay forever, only returning if an error occurs.
pub fn run<G, R>(gateway: &mut G, relay: &mut R) -> Result<(), RunError<R::ProcError>>
where
    G: Gateway,
    R: Relay
{
    let mut state = LoopState::default();

    loop {
        step(gateway, relay, &mut state)?;
    }
}

/// Receive and process at most one message.
///
/// Returns `true` if a message was delivered to the relay.
pub fn step<G, R>(
    gateway: &mut G,
    relay: &mut R,
    state: &mut LoopState
) -> Result<bool, RunError<R::ProcError>>
where
    G: Gateway,
    R: Relay
{
    let connected = gateway.connected();
    if state.connected != Some(connected) {
        match connected {
            true => info!("Connected to the broker"),
            false => warn!("Not connected to the broker")
        }
        state.connected = Some(connected);
    }

    let msg = match gateway.recv().map_err(RunError::Gateway)? {
        Some(m) => m,
        None => return Ok(false)
    };

    let token = match msg.payload_str() {
        Some(t) => t,
        None => {
            warn!("Ignoring non UTF-8 message on {}", msg.topic);
            return Ok(false)
        }
    };

    debug!("Recieved {:?} on {}", token, msg.topic);

    let publications = relay.proc(token).map_err(RunError::Relay)?;

    for p in publications {
        trace!("Publishing {:?} on {}", p.payload, p.topic);
        gateway.publish(&p.topic, &p.payload).map_err(RunError::Gateway)?;
    }

    Ok(true)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use comms_if::net::Message;
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeGateway {
        inbox: VecDeque<Option<Message>>,
        published: Vec<(String, String)>,
    }

    impl Gateway for FakeGateway {
        fn recv(&mut self) -> Result<Option<Message>, GatewayError> {
            self.inbox.pop_front().ok_or(GatewayError::Closed)
        }

        fn publish(&mut self, topic: &str, payload: &str) -> Result<(), GatewayError> {
            self.published.push((topic.to_string(), payload.to_string()));
            Ok(())
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("echo failed")]
    struct EchoError;

    /// Echoes every token back on "echo", failing on "fail".
    #[derive(Default)]
    struct Echo {
        tokens: Vec<String>,
    }

    impl Relay for Echo {
        type ProcError = EchoError;

        fn proc(&mut self, token: &str) -> Result<Vec<Publication>, EchoError> {
            if token == "fail" {
                return Err(EchoError)
            }
            self.tokens.push(token.to_string());
            Ok(vec![Publication::new("echo", token)])
        }
    }

    #[test]
    fn test_step() {
        let mut gateway = FakeGateway::default();
        gateway.inbox.push_back(Some(Message::new("rover/test", b"one")));
        gateway.inbox.push_back(None);
        gateway.inbox.push_back(Some(Message::new("rover/test", &[0xc3, 0x28])));
        gateway.inbox.push_back(Some(Message::new("rover/test", b"two")));
        gateway.inbox.push_back(Some(Message::new("rover/test", b"fail")));

        let mut relay = Echo::default();
        let mut state = LoopState::default();

        assert!(step(&mut gateway, &mut relay, &mut state).unwrap());
        assert!(!step(&mut gateway, &mut relay, &mut state).unwrap());
        assert!(!step(&mut gateway, &mut relay, &mut state).unwrap());
        assert!(step(&mut gateway, &mut relay, &mut state).unwrap());

        assert_eq!(relay.tokens, vec!["one", "two"]);
        assert_eq!(gateway.published, vec![
            ("echo".to_string(), "one".to_string()),
            ("echo".to_string(), "two".to_string()),
        ]);

        assert!(matches!(
            step(&mut gateway, &mut relay, &mut state),
            Err(RunError::Relay(EchoError))
        ));
        assert!(matches!(
            run(&mut gateway, &mut relay),
            Err(RunError::Gateway(GatewayError::Closed))
        ));
    }
}
