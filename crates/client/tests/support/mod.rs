#![allow(dead_code)]

use std::collections::VecDeque;

use glam::Vec2;
use rewind_client::{EntityRegistry, LiveEntity};
use rewind_common::{Pose, RemoteEntityId, TickId};
use rewind_input::InputFrame;
use rewind_kernel::{ClientConfig, PlanarStepper, Stepper};
use rewind_net::{
    Channel, ClientMessage, SendError, Sender, ServerMessage, StateReport, decode,
    encode_delivery,
};

/// One unit per tick and a quarter turn per rotating tick at 30 Hz.
pub fn unit_config() -> ClientConfig {
    ClientConfig {
        tick_rate: 30,
        move_speed: 30.0,
        rotation_speed: 2700.0,
        ..ClientConfig::default()
    }
}

pub fn unit_stepper() -> PlanarStepper {
    PlanarStepper::new(1.0, 90.0)
}

#[derive(Debug)]
pub struct RecordingEntity {
    pub poses: Vec<Pose>,
    pub inputs: Vec<InputFrame>,
    pub idles: u32,
    pub idle_delta: Option<f32>,
    pub fired: u32,
    pub weapon: bool,
}

impl Default for RecordingEntity {
    fn default() -> Self {
        Self {
            poses: Vec::new(),
            inputs: Vec::new(),
            idles: 0,
            idle_delta: None,
            fired: 0,
            weapon: true,
        }
    }
}

impl LiveEntity for RecordingEntity {
    fn set_pose(&mut self, pose: Pose) {
        self.poses.push(pose);
    }

    fn apply_input(&mut self, input: &InputFrame) {
        self.inputs.push(*input);
    }

    fn idle(&mut self, tick_delta: f32) {
        self.idles += 1;
        self.idle_delta = Some(tick_delta);
    }

    fn fire(&mut self) {
        self.fired += 1;
    }

    fn weapon_equipped(&self) -> bool {
        self.weapon
    }
}

#[derive(Debug, Default)]
pub struct RecordingSender {
    pub sent: Vec<(Channel, ClientMessage)>,
    pub fail: bool,
}

impl RecordingSender {
    pub fn last(&self) -> Option<&ClientMessage> {
        self.sent.last().map(|(_, m)| m)
    }
}

impl Sender for RecordingSender {
    fn send(&mut self, channel: Channel, message: &ClientMessage) -> Result<(), SendError> {
        if self.fail {
            return Err(SendError::Disconnected);
        }
        self.sent.push((channel, message.clone()));
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingRegistry {
    pub updates: Vec<(RemoteEntityId, Vec2)>,
}

impl EntityRegistry for RecordingRegistry {
    fn update_remote(&mut self, id: RemoteEntityId, position: Vec2) {
        self.updates.push((id, position));
    }
}

/// Authoritative peer that applies inputs in id order and answers after a fixed delay.
pub struct DelayedServer<P> {
    pub pose: Pose,
    stepper: P,
    next_expected: TickId,
    delay_steps: usize,
    in_flight: VecDeque<(usize, Vec<u8>)>,
    now: usize,
}

impl<P: Stepper> DelayedServer<P> {
    pub fn new(stepper: P, delay_steps: usize) -> Self {
        Self {
            pose: Pose::ORIGIN,
            stepper,
            next_expected: TickId::ZERO,
            delay_steps,
            in_flight: VecDeque::new(),
            now: 0,
        }
    }

    /// Consume encoded client messages and schedule the replies.
    pub fn receive(&mut self, datagrams: Vec<(Channel, Vec<u8>)>) {
        for (_, bytes) in datagrams {
            let ClientMessage::Input(batch) = decode(&bytes).expect("client message");
            let mut replies = Vec::new();
            for frame in batch.frames() {
                if frame.id < self.next_expected {
                    continue;
                }
                self.pose = self.stepper.step(self.pose, frame.flags);
                self.next_expected = frame.id.next();
                replies.push(ServerMessage::State(StateReport::from_pose(frame.id, self.pose)));
            }
            if let Some(last) = batch.last_id() {
                replies.push(ServerMessage::Ack { acked_id: last });
            }
            let bytes = encode_delivery(&replies).expect("server delivery");
            self.in_flight.push_back((self.now + self.delay_steps, bytes));
        }
    }

    /// Advance server time one step and return deliveries that are due.
    pub fn tick(&mut self) -> Vec<Vec<u8>> {
        self.now += 1;
        let mut due = Vec::new();
        while self.in_flight.front().is_some_and(|(at, _)| *at <= self.now) {
            if let Some((_, bytes)) = self.in_flight.pop_front() {
                due.push(bytes);
            }
        }
        due
    }

    pub fn idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}
