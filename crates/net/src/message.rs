use rewind_common::{AuthoritativeReport, Pose, RemoteEntityId, TickId};
use rewind_input::{InputFlags, InputFrame};
use serde::{Deserialize, Serialize};

/// A contiguous run of inputs starting at `first_id`, one flags byte per tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputBatch {
    pub first_id: TickId,
    pub flags: Vec<InputFlags>,
}

impl InputBatch {
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Id of the last input in the batch.
    pub fn last_id(&self) -> Option<TickId> {
        let count = u32::try_from(self.flags.len()).ok()?;
        count.checked_sub(1).map(|n| self.first_id.offset(n))
    }

    /// The batch's inputs with their inferred tick ids.
    pub fn frames(&self) -> impl Iterator<Item = InputFrame> + '_ {
        (0u32..)
            .zip(&self.flags)
            .map(|(offset, flags)| InputFrame::new(self.first_id.offset(offset), *flags))
    }
}

/// Messages the client sends to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientMessage {
    Input(InputBatch),
}

/// Authoritative pose of the local entity after input `id`, as sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub id: TickId,
    pub x: f32,
    pub z: f32,
    pub facing: f32,
}

impl StateReport {
    pub fn from_pose(id: TickId, pose: Pose) -> Self {
        Self {
            id,
            x: pose.x(),
            z: pose.z(),
            facing: pose.facing,
        }
    }

    pub fn pose(&self) -> Pose {
        Pose::new(self.x, self.z, self.facing)
    }
}

impl From<StateReport> for AuthoritativeReport {
    fn from(report: StateReport) -> Self {
        AuthoritativeReport::new(report.id, report.pose())
    }
}

/// Messages the server sends to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ServerMessage {
    /// Highest input id the server has received.
    Ack { acked_id: TickId },
    /// Authoritative state of the local entity.
    State(StateReport),
    /// Position of another entity; passed through to the entity registry.
    RemoteState {
        entity_id: RemoteEntityId,
        x: f32,
        z: f32,
    },
}
