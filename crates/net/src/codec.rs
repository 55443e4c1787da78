//! CBOR encoding for wire messages.
//!
//! The core does not depend on any particular transport framing; this codec is
//! what the bundled loopback sender and the CLI simulation use.

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::message::ServerMessage;

/// Errors from encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("CBOR serialization error: {0}")]
    Encode(String),
    #[error("CBOR deserialization error: {0}")]
    Decode(String),
}

pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    ciborium::into_writer(value, &mut buf).map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T, CodecError> {
    ciborium::from_reader(data).map_err(|e| CodecError::Decode(e.to_string()))
}

/// Encode one transport delivery, which may batch several server messages.
pub fn encode_delivery(messages: &[ServerMessage]) -> Result<Vec<u8>, CodecError> {
    encode(&messages)
}

pub fn decode_delivery(data: &[u8]) -> Result<Vec<ServerMessage>, CodecError> {
    decode(data)
}
