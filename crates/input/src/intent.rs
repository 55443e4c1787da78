use std::collections::VecDeque;

use crate::frame::{Axis, InputFlags};

/// Raw device state read once per simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IntentSample {
    /// Strafe reading, typically in `[-1, 1]`.
    pub horizontal: f32,
    /// Forward reading, typically in `[-1, 1]`.
    pub vertical: f32,
    /// Camera rotation key currently held, if any.
    pub rotate: Axis,
    /// Attack button held.
    pub attack_held: bool,
}

impl IntentSample {
    pub const IDLE: IntentSample = IntentSample {
        horizontal: 0.0,
        vertical: 0.0,
        rotate: Axis::Neutral,
        attack_held: false,
    };

    pub fn movement(horizontal: f32, vertical: f32) -> Self {
        Self {
            horizontal,
            vertical,
            ..Self::IDLE
        }
    }

    pub fn rotation(rotate: Axis) -> Self {
        Self {
            rotate,
            ..Self::IDLE
        }
    }

    pub fn attack() -> Self {
        Self {
            attack_held: true,
            ..Self::IDLE
        }
    }
}

/// Reduce a sample to its networked flags byte.
///
/// Returns `None` when the tick is not networked: no movement, no rotation
/// key, and no attack eligible to fire. `attack_eligible` is the caller's
/// verdict from the attack gate (weapon equipped and cooldown elapsed).
pub fn networked_flags(sample: &IntentSample, attack_eligible: bool) -> Option<InputFlags> {
    let flags = InputFlags::EMPTY
        .with_movement(
            Axis::from_raw(sample.horizontal),
            Axis::from_raw(sample.vertical),
        )
        .with_rotation(sample.rotate)
        .with_attack(attack_eligible);
    if flags.is_empty() { None } else { Some(flags) }
}

/// Source of per-step device samples. Raw device polling lives behind this.
pub trait InputSource {
    fn sample(&mut self) -> IntentSample;
}

impl<F> InputSource for F
where
    F: FnMut() -> IntentSample,
{
    fn sample(&mut self) -> IntentSample {
        self()
    }
}

/// Plays back a fixed list of samples, then idles.
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    samples: VecDeque<IntentSample>,
}

impl ScriptedInput {
    pub fn new(samples: impl IntoIterator<Item = IntentSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    pub fn push(&mut self, sample: IntentSample) {
        self.samples.push_back(sample);
    }

    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> IntentSample {
        self.samples.pop_front().unwrap_or(IntentSample::IDLE)
    }
}
