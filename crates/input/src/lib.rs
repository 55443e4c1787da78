//! Input intents: sampled device state reduced to one networked flags byte per tick.
//!
//! # Invariants
//! - A tick is networked only if it moves, rotates, or fires an eligible attack.
//! - The flags byte is the only input state that crosses the network.

pub mod attack;
pub mod frame;
pub mod intent;

pub use attack::AttackGate;
pub use frame::{Axis, InputFlags, InputFrame};
pub use intent::{InputSource, IntentSample, ScriptedInput, networked_flags};

pub fn crate_info() -> &'static str {
    "rewind-input v0.1.0"
}
