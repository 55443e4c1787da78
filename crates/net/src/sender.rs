use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecError};
use crate::message::ClientMessage;

/// Delivery class requested for an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Best effort, may drop or reorder. Inputs use this: every step re-sends the
    /// whole unacknowledged window, so a lost datagram costs nothing.
    Unreliable,
    Reliable,
}

/// Errors a transport may report for one send.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("transport disconnected")]
    Disconnected,
    #[error("send queue full")]
    Full,
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Outgoing half of the transport.
pub trait Sender {
    fn send(&mut self, channel: Channel, message: &ClientMessage) -> Result<(), SendError>;
}

/// In-process sender that encodes messages and queues the bytes for a local peer.
#[derive(Debug, Default)]
pub struct LoopbackSender {
    outbox: VecDeque<(Channel, Vec<u8>)>,
    capacity: Option<usize>,
    disconnected: bool,
}

impl LoopbackSender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue at most `capacity` undrained messages; further sends report `Full`.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn set_connected(&mut self, connected: bool) {
        self.disconnected = !connected;
    }

    /// Number of queued, undrained messages.
    pub fn depth(&self) -> usize {
        self.outbox.len()
    }

    /// Take every queued message in send order.
    pub fn drain(&mut self) -> Vec<(Channel, Vec<u8>)> {
        self.outbox.drain(..).collect()
    }
}

impl Sender for LoopbackSender {
    fn send(&mut self, channel: Channel, message: &ClientMessage) -> Result<(), SendError> {
        if self.disconnected {
            return Err(SendError::Disconnected);
        }
        if self.capacity.is_some_and(|cap| self.outbox.len() >= cap) {
            return Err(SendError::Full);
        }
        let bytes = codec::encode(message)?;
        tracing::trace!(?channel, len = bytes.len(), "loopback send");
        self.outbox.push_back((channel, bytes));
        Ok(())
    }
}
