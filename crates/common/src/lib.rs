//! Shared types for the prediction core.
//!
//! # Invariants
//! - Tick ids only ever move forward; a ring slot is addressed by `id mod capacity`.
//! - Planar poses live on the x/z ground plane; height is never simulated here.

pub mod types;

pub use types::{AuthoritativeReport, Pose, RemoteEntityId, TickId};

pub fn crate_info() -> &'static str {
    "rewind-common v0.1.0"
}
