use std::collections::VecDeque;

use rewind_common::{Pose, RemoteEntityId, TickId};
use rewind_kernel::Stepper;
use rewind_net::{
    Channel, ClientMessage, CodecError, ServerMessage, StateReport, decode, encode_delivery,
};

/// In-process authoritative peer for the `simulate` command.
///
/// Applies each input id once, in order, and answers with a state report per
/// applied id plus an ack for the highest id seen. Replies land `latency` steps
/// later. Every `drop_every`-th inbound datagram is discarded.
pub struct SimServer<P> {
    stepper: P,
    pose: Pose,
    next_expected: TickId,
    latency: u32,
    drop_every: Option<u32>,
    received: u32,
    dropped: u32,
    now: u64,
    in_flight: VecDeque<(u64, Vec<u8>)>,
    orbit: f32,
}

impl<P: Stepper> SimServer<P> {
    pub fn new(stepper: P, latency: u32, drop_every: Option<u32>) -> Self {
        Self {
            stepper,
            pose: Pose::ORIGIN,
            next_expected: TickId::ZERO,
            latency,
            drop_every: drop_every.filter(|n| *n > 0),
            received: 0,
            dropped: 0,
            now: 0,
            in_flight: VecDeque::new(),
            orbit: 0.0,
        }
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn dropped(&self) -> u32 {
        self.dropped
    }

    pub fn receive(&mut self, datagrams: Vec<(Channel, Vec<u8>)>) -> Result<(), CodecError> {
        for (_, bytes) in datagrams {
            self.received += 1;
            if self.drop_every.is_some_and(|n| self.received % n == 0) {
                self.dropped += 1;
                tracing::debug!(datagram = self.received, "datagram dropped");
                continue;
            }

            let ClientMessage::Input(batch) = decode(&bytes)?;
            let mut replies = Vec::new();
            for frame in batch.frames() {
                if frame.id < self.next_expected {
                    continue;
                }
                self.pose = self.stepper.step(self.pose, frame.flags);
                self.next_expected = frame.id.next();
                replies.push(ServerMessage::State(StateReport::from_pose(
                    frame.id, self.pose,
                )));
            }
            if let Some(acked_id) = batch.last_id() {
                replies.push(ServerMessage::Ack { acked_id });
            }
            self.schedule(encode_delivery(&replies)?);
        }
        Ok(())
    }

    /// Advance one step and return the deliveries now due, including a
    /// position update for a single remote entity circling the origin.
    pub fn tick(&mut self) -> Result<Vec<Vec<u8>>, CodecError> {
        self.now += 1;
        self.orbit = (self.orbit + 0.05) % std::f32::consts::TAU;
        let remote = ServerMessage::RemoteState {
            entity_id: RemoteEntityId(1),
            x: 10.0 * self.orbit.cos(),
            z: 10.0 * self.orbit.sin(),
        };
        self.schedule(encode_delivery(&[remote])?);

        let mut due = Vec::new();
        while self.in_flight.front().is_some_and(|(at, _)| *at <= self.now) {
            if let Some((_, bytes)) = self.in_flight.pop_front() {
                due.push(bytes);
            }
        }
        Ok(due)
    }

    fn schedule(&mut self, bytes: Vec<u8>) {
        self.in_flight
            .push_back((self.now + u64::from(self.latency), bytes));
    }
}
