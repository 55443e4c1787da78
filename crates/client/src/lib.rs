//! Client-side prediction loop with authoritative reconciliation.
//!
//! Each simulation step the client samples input, predicts the local entity's
//! next pose, buffers both, re-sends the unacknowledged input window and then
//! reconciles any authoritative reports that arrived since the last step.
//!
//! # Invariants
//! - Network arrival only queues; reports are applied at one fixed point per step.
//! - Replay runs on a pose value; the live entity sees only the final result.
//! - No authoritative report can make a step fail.

pub mod client;
pub mod entity;
pub mod reconcile;

pub use client::{PredictionClient, SendStats, StepOutcome};
pub use entity::{EntityRegistry, LiveEntity, NullRegistry};
pub use reconcile::{ReconcileStats, Reconciler};

pub fn crate_info() -> &'static str {
    "rewind-client v0.1.0"
}
