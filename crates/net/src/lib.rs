//! Network edge of the prediction core: wire messages, codec, outbound batching, acks.
//!
//! # Invariants
//! - An input batch names only its first tick id; the receiver infers the rest
//!   as `first_id + offset`, so a batch never contains a gap.
//! - The acknowledged id never moves backwards within a session.

pub mod ack;
pub mod batcher;
pub mod codec;
pub mod message;
pub mod sender;

pub use ack::AckTracker;
pub use batcher::OutboundBatcher;
pub use codec::{CodecError, decode, decode_delivery, encode, encode_delivery};
pub use message::{ClientMessage, InputBatch, ServerMessage, StateReport};
pub use sender::{Channel, LoopbackSender, SendError, Sender};

pub fn crate_info() -> &'static str {
    "rewind-net v0.1.0"
}
