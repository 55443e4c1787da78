use glam::Vec2;
use rewind_common::{Pose, RemoteEntityId};
use rewind_input::InputFrame;

/// The host's live, locally controlled entity.
///
/// Only `set_pose` is required. The remaining hooks drive cosmetic side effects
/// (locomotion and orbit animation, idle animation, attack effects) and never
/// feed back into the simulation.
pub trait LiveEntity {
    /// Move the entity and camera to `pose`.
    fn set_pose(&mut self, pose: Pose);

    /// A fresh networked input was applied locally. Not called during replay.
    fn apply_input(&mut self, _input: &InputFrame) {}

    /// A step passed without networked input.
    fn idle(&mut self, _tick_delta: f32) {}

    /// An attack fired this step.
    fn fire(&mut self) {}

    /// Attacks are only networked while a weapon is equipped.
    fn weapon_equipped(&self) -> bool {
        true
    }
}

/// Registry of remotely controlled entities.
pub trait EntityRegistry {
    fn update_remote(&mut self, id: RemoteEntityId, position: Vec2);
}

/// Registry that discards remote updates.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRegistry;

impl EntityRegistry for NullRegistry {
    fn update_remote(&mut self, id: RemoteEntityId, position: Vec2) {
        tracing::trace!(?id, ?position, "remote state ignored");
    }
}
