use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of one networked simulation step.
///
/// Only ticks that carried networked input consume an id, so the sequence of
/// buffered ids is always contiguous.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TickId(pub u32);

impl TickId {
    pub const ZERO: TickId = TickId(0);

    pub fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// The id that follows this one.
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }

    /// The id `offset` steps after this one.
    pub fn offset(self, offset: u32) -> Self {
        Self(self.0.wrapping_add(offset))
    }

    /// Ring slot this id maps to for a buffer of the given capacity.
    pub fn slot(self, capacity: usize) -> usize {
        self.0 as usize % capacity
    }

    /// Number of ids between `earlier` and `self`, or `None` if `earlier` is newer.
    pub fn since(self, earlier: TickId) -> Option<u32> {
        self.0.checked_sub(earlier.0)
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Server-side identifier of a remotely controlled entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RemoteEntityId(pub i32);

/// Planar pose of the locally controlled entity.
///
/// `position.x` is world x, `position.y` is world z. `facing` is the camera yaw
/// in degrees, kept in `[0, 360)` by the stepper.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec2,
    pub facing: f32,
}

impl Default for Pose {
    fn default() -> Self {
        Self::ORIGIN
    }
}

impl Pose {
    pub const ORIGIN: Pose = Pose {
        position: Vec2::ZERO,
        facing: 0.0,
    };

    pub fn new(x: f32, z: f32, facing: f32) -> Self {
        Self {
            position: Vec2::new(x, z),
            facing,
        }
    }

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn z(&self) -> f32 {
        self.position.y
    }

    /// Squared planar distance between two poses.
    pub fn squared_distance(&self, other: &Pose) -> f32 {
        self.position.distance_squared(other.position)
    }

    /// True when `other` is within `epsilon` squared distance and faces exactly the same way.
    ///
    /// Facing is compared for exact equality: the stepper only ever produces
    /// facings from a fixed set of increments, so any difference is a real divergence.
    pub fn matches(&self, other: &Pose, epsilon: f32) -> bool {
        self.squared_distance(other) < epsilon && self.facing == other.facing
    }
}

/// Server-confirmed pose of the local entity after the input with `id` was applied.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AuthoritativeReport {
    pub id: TickId,
    pub pose: Pose,
}

impl AuthoritativeReport {
    pub fn new(id: TickId, pose: Pose) -> Self {
        Self { id, pose }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_ids_share_slots_across_wraparound() {
        assert_eq!(TickId(0).slot(128), TickId(128).slot(128));
        assert_ne!(TickId(0).slot(128), TickId(127).slot(128));
    }

    #[test]
    fn since_is_none_for_newer_ids() {
        assert_eq!(TickId(10).since(TickId(4)), Some(6));
        assert_eq!(TickId(4).since(TickId(10)), None);
    }

    #[test]
    fn pose_match_uses_squared_distance_and_exact_facing() {
        let a = Pose::new(1.0, 1.0, 90.0);
        assert!(a.matches(&Pose::new(1.05, 1.0, 90.0), 0.004));
        assert!(!a.matches(&Pose::new(1.1, 1.0, 90.0), 0.004));
        assert!(!a.matches(&Pose::new(1.0, 1.0, 90.001), 0.004));
    }

    #[test]
    fn pose_axes_map_to_ground_plane() {
        let p = Pose::new(3.0, -2.0, 0.0);
        assert_eq!(p.x(), 3.0);
        assert_eq!(p.z(), -2.0);
        assert_eq!(Pose::default(), Pose::ORIGIN);
    }
}
