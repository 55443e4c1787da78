use glam::Vec2;
use rewind_common::Pose;
use rewind_input::InputFlags;

/// One deterministic simulation step of the locally controlled entity.
///
/// Implementations must be pure: no hidden state, no clocks, no randomness.
/// Reconciliation replays buffered inputs through the same stepper that
/// produced the first prediction and relies on identical results.
pub trait Stepper {
    fn step(&self, state: Pose, input: InputFlags) -> Pose;
}

impl<F> Stepper for F
where
    F: Fn(Pose, InputFlags) -> Pose,
{
    fn step(&self, state: Pose, input: InputFlags) -> Pose {
        self(state, input)
    }
}

/// Camera-relative planar locomotion with discrete yaw steps.
///
/// Rotation is applied first, then movement along the rotated axes:
/// `right = (cos θ, -sin θ)`, `forward = (sin θ, cos θ)`. Diagonal input is
/// normalized so every moving tick covers exactly `units_per_tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanarStepper {
    pub units_per_tick: f32,
    pub degrees_per_tick: f32,
}

impl PlanarStepper {
    pub fn new(units_per_tick: f32, degrees_per_tick: f32) -> Self {
        Self {
            units_per_tick,
            degrees_per_tick,
        }
    }

    pub fn from_config(config: &crate::ClientConfig) -> Self {
        Self::new(config.units_per_tick(), config.degrees_per_tick())
    }
}

impl Stepper for PlanarStepper {
    fn step(&self, state: Pose, input: InputFlags) -> Pose {
        let mut facing = state.facing;
        let rotation = input.rotation().value();
        if rotation != 0.0 {
            facing = (facing + rotation * self.degrees_per_tick).rem_euclid(360.0);
        }

        let mut position = state.position;
        if input.has_movement() {
            let (sin, cos) = facing.to_radians().sin_cos();
            let right = Vec2::new(cos, -sin);
            let forward = Vec2::new(sin, cos);
            let direction = (right * input.horizontal().value()
                + forward * input.vertical().value())
            .normalize_or_zero();
            position += direction * self.units_per_tick;
        }

        Pose { position, facing }
    }
}

/// Run `stepper` over `inputs` starting from `start`, returning every intermediate pose.
pub fn simulate<S>(stepper: &S, start: Pose, inputs: impl IntoIterator<Item = InputFlags>) -> Vec<Pose>
where
    S: Stepper + ?Sized,
{
    inputs
        .into_iter()
        .scan(start, |pose, input| {
            *pose = stepper.step(*pose, input);
            Some(*pose)
        })
        .collect()
}
