//! Prediction kernel: fixed-rate tick clock, id-checked ring buffers, deterministic stepping.
//!
//! # Invariants
//! - `Stepper::step` is pure: replaying the same inputs from the same pose reproduces
//!   the same poses bit for bit.
//! - Ring buffers are allocated once and never resized; a read succeeds only when the
//!   slot still holds the requested tick id.
//! - The clock never runs more than `max_steps_per_advance` steps in one call.

pub mod clock;
pub mod config;
pub mod ring;
pub mod stepper;

pub use clock::{FrameClock, InstantClock, TickClock};
pub use config::{ClientConfig, ConfigError, ReportOrder};
pub use ring::{Lookup, TickRing};
pub use stepper::{PlanarStepper, Stepper, simulate};

pub fn crate_info() -> &'static str {
    "rewind-kernel v0.1.0"
}
