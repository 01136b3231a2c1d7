//! # Messaging gateway
//!
//! The gateway is the only route in and out of an executable. Messages are two-frame zmq messages
//! of `[topic, payload]`, published to the broker frontend and received from the broker backend.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{trace, warn};

use super::{zmq, MonitoredSocket, MonitoredSocketError, NetParams, SocketOptions};

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A source of inbound messages and sink for outbound ones.
pub trait Gateway {
    /// Receive the next message on one of the subscribed topics.
    ///
    /// `Ok(None)` means no message arrived before the receive timeout.
    fn recv(&mut self) -> Result<Option<Message>, GatewayError>;

    /// Publish a payload on the given topic.
    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), GatewayError>;

    /// Whether the gateway currently has a connection to the broker.
    fn connected(&self) -> bool {
        true
    }
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single message received from the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String,
    pub payload: Vec<u8>,
}

/// [`Gateway`] implementation connected to the zmq broker.
pub struct ZmqGateway {
    /// SUB socket connected to the broker backend
    sub_socket: MonitoredSocket,

    /// PUB socket connected to the broker frontend
    pub_socket: MonitoredSocket,

    /// Topics this gateway delivers, matched exactly
    topics: Vec<String>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(thiserror::Error, Debug)]
pub enum GatewayError {
    #[error("Socket error: {0}")]
    SocketError(#[from] MonitoredSocketError),

    #[error("Could not subscribe to {0}: {1}")]
    SubscribeError(String, zmq::Error),

    #[error("Could not recieve a message from the broker: {0}")]
    RecvError(zmq::Error),

    #[error("Could not publish to {0}: {1}")]
    SendError(String, zmq::Error),

    #[error("The gateway has been closed")]
    Closed,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Message {
    pub fn new(topic: &str, payload: &[u8]) -> Self {
        Self {
            topic: topic.to_string(),
            payload: payload.to_vec(),
        }
    }

    /// The payload as text, or `None` if it is not valid UTF-8.
    pub fn payload_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.payload).ok()
    }
}

impl ZmqGateway {
    /// Connect to the broker and subscribe to the given topics.
    ///
    /// This function will not wait for the broker to be available before returning, zmq will keep
    /// trying to connect in the background.
    pub fn new(
        ctx: &zmq::Context,
        params: &NetParams,
        topics: &[&str]
    ) -> Result<Self, GatewayError> {
        let sub_options = SocketOptions {
            connect_timeout: params.connect_timeout_ms,
            recv_timeout: params.recv_timeout_ms,
            linger: 0,
            ..Default::default()
        };
        let pub_options = SocketOptions {
            connect_timeout: params.connect_timeout_ms,
            send_timeout: params.send_timeout_ms,
            linger: 1000,
            ..Default::default()
        };

        let sub_socket = MonitoredSocket::new(
            ctx,
            zmq::SUB,
            sub_options,
            &params.broker_backend_endpoint
        )?;
        let pub_socket = MonitoredSocket::new(
            ctx,
            zmq::PUB,
            pub_options,
            &params.broker_frontend_endpoint
        )?;

        for topic in topics {
            sub_socket.set_subscribe(topic.as_bytes())
                .map_err(|e| GatewayError::SubscribeError(topic.to_string(), e))?;
        }

        Ok(Self {
            sub_socket,
            pub_socket,
            topics: topics.iter().map(|t| t.to_string()).collect(),
        })
    }
}

impl Gateway for ZmqGateway {
    fn recv(&mut self) -> Result<Option<Message>, GatewayError> {
        let mut frames = match self.sub_socket.recv_multipart(0) {
            Ok(f) => f,
            Err(zmq::Error::EAGAIN) => return Ok(None),
            Err(e) => return Err(GatewayError::RecvError(e))
        };

        if frames.len() != 2 {
            warn!("Dropping message with {} frames, expected 2", frames.len());
            return Ok(None)
        }

        let payload = frames.pop().unwrap_or_default();
        let topic = match String::from_utf8(frames.pop().unwrap_or_default()) {
            Ok(t) => t,
            Err(_) => {
                warn!("Dropping message with a non UTF-8 topic");
                return Ok(None)
            }
        };

        // zmq subscriptions are prefix matches, only deliver exact topics
        if !self.topics.iter().any(|t| *t == topic) {
            trace!("Ignoring message on {}", topic);
            return Ok(None)
        }

        Ok(Some(Message { topic, payload }))
    }

    fn publish(&mut self, topic: &str, payload: &str) -> Result<(), GatewayError> {
        self.pub_socket.send_multipart(vec![topic.as_bytes(), payload.as_bytes()], 0)
            .map_err(|e| GatewayError::SendError(topic.to_string(), e))
    }

    fn connected(&self) -> bool {
        self.sub_socket.connected() && self.pub_socket.connected()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_message_payload_str() {
        let msg = Message::new("rover/move", b"forward");
        assert_eq!(msg.payload_str(), Some("forward"));

        let msg = Message::new("rover/move", &[0xff, 0xfe]);
        assert_eq!(msg.payload_str(), None);
    }

    #[test]
    fn test_recv_exact_topic_only() {
        let ctx = zmq::Context::new();

        // Stand in for the broker
        let backend = ctx.socket(zmq::PUB).unwrap();
        backend.bind("inproc://gateway-test-backend").unwrap();
        let frontend = ctx.socket(zmq::SUB).unwrap();
        frontend.bind("inproc://gateway-test-frontend").unwrap();

        let params = NetParams {
            broker_frontend_endpoint: "inproc://gateway-test-frontend".into(),
            broker_backend_endpoint: "inproc://gateway-test-backend".into(),
            recv_timeout_ms: 100,
            send_timeout_ms: 100,
            connect_timeout_ms: 1000,
        };
        let mut gateway = ZmqGateway::new(&ctx, &params, &["rover/bracket"]).unwrap();

        // Wait for the subscription to reach the publisher
        let mut subscribed = false;
        for _ in 0..50 {
            backend.send_multipart(vec![&b"rover/bracket"[..], &b"sync"[..]], 0).unwrap();
            if gateway.recv().unwrap().is_some() {
                subscribed = true;
                break
            }
        }
        assert!(subscribed);
        while gateway.recv().unwrap().is_some() {}

        let sent: Vec<Vec<&[u8]>> = vec![
            vec![&b"rover/bracketx"[..], &b"leftbrac"[..]],
            vec![&b"rover/bracket"[..], &b"left"[..], &b"brac"[..]],
            vec![&b"rover/bracket\xff"[..], &b"leftbrac"[..]],
            vec![&b"rover/bracket"[..]],
            vec![&b"rover/bracket"[..], &b"upbrac"[..]],
        ];
        for frames in sent {
            backend.send_multipart(frames, 0).unwrap();
        }

        for _ in 0..4 {
            assert_eq!(gateway.recv().unwrap(), None);
        }
        assert_eq!(
            gateway.recv().unwrap(),
            Some(Message::new("rover/bracket", b"upbrac"))
        );
        assert_eq!(gateway.recv().unwrap(), None);
    }
}
