use glam::Vec2;
use rewind_common::{AuthoritativeReport, Pose, TickId};
use rewind_input::{AttackGate, InputFlags, InputFrame, InputSource, IntentSample, networked_flags};
use rewind_kernel::{ClientConfig, ConfigError, FrameClock, PlanarStepper, Stepper, TickClock, TickRing};
use rewind_net::{
    AckTracker, Channel, ClientMessage, CodecError, OutboundBatcher, Sender, ServerMessage,
    decode_delivery,
};

use crate::entity::{EntityRegistry, LiveEntity, NullRegistry};
use crate::reconcile::{ReconcileStats, Reconciler};

/// What happened during one `advance` call, for the host's cosmetic systems.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepOutcome {
    /// Simulation steps run.
    pub steps: u32,
    /// Steps that carried networked input and consumed a tick id.
    pub networked_ticks: u32,
    /// Some step carried movement input.
    pub moved: bool,
    /// Some step fired an attack.
    pub attacked: bool,
    /// Reconciliation moved the live entity.
    pub corrected: bool,
}

/// Outbound traffic counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SendStats {
    pub batches_sent: u64,
    pub inputs_sent: u64,
    pub send_failures: u64,
}

/// Predicts the locally controlled entity and reconciles it against the server.
///
/// Single-threaded and frame-driven: the host calls [`advance`](Self::advance)
/// once per frame and pushes server traffic through the `on_*` entry points
/// whenever it arrives. Arrival only queues; all buffer mutation happens inside
/// the step.
pub struct PredictionClient<E, S, P = PlanarStepper, R = NullRegistry> {
    config: ClientConfig,
    enabled: bool,
    clock: TickClock,
    current_id: TickId,
    inputs: TickRing<InputFlags>,
    states: TickRing<Pose>,
    acks: AckTracker,
    batcher: OutboundBatcher,
    reconciler: Reconciler,
    attack: AttackGate,
    pose: Pose,
    entity: E,
    sender: S,
    stepper: P,
    registry: R,
    send_stats: SendStats,
}

impl<E, S, P> PredictionClient<E, S, P, NullRegistry>
where
    E: LiveEntity,
    S: Sender,
    P: Stepper,
{
    /// Validate `config` and allocate every buffer the session will use.
    pub fn new(config: ClientConfig, entity: E, sender: S, stepper: P) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            tick_rate = config.tick_rate,
            buffer_capacity = config.buffer_capacity,
            epsilon = config.reconciliation_epsilon,
            predict_locally = config.predict_locally,
            "prediction client ready"
        );
        Ok(Self {
            clock: TickClock::new(config.tick_rate, config.max_steps_per_advance),
            inputs: TickRing::new(config.buffer_capacity),
            states: TickRing::new(config.buffer_capacity),
            reconciler: Reconciler::from_config(&config),
            attack: AttackGate::new(config.attack_cooldown),
            enabled: true,
            current_id: TickId::ZERO,
            acks: AckTracker::new(),
            batcher: OutboundBatcher::new(),
            pose: Pose::ORIGIN,
            entity,
            sender,
            stepper,
            registry: NullRegistry,
            send_stats: SendStats::default(),
            config,
        })
    }
}

impl<E, S, P, R> PredictionClient<E, S, P, R>
where
    E: LiveEntity,
    S: Sender,
    P: Stepper,
    R: EntityRegistry,
{
    /// Route remote entity updates to `registry`.
    pub fn with_registry<R2: EntityRegistry>(self, registry: R2) -> PredictionClient<E, S, P, R2> {
        PredictionClient {
            config: self.config,
            enabled: self.enabled,
            clock: self.clock,
            current_id: self.current_id,
            inputs: self.inputs,
            states: self.states,
            acks: self.acks,
            batcher: self.batcher,
            reconciler: self.reconciler,
            attack: self.attack,
            pose: self.pose,
            entity: self.entity,
            sender: self.sender,
            stepper: self.stepper,
            registry,
            send_stats: self.send_stats,
        }
    }

    /// Place the live entity without touching any history, e.g. at spawn.
    pub fn teleport(&mut self, pose: Pose) {
        self.pose = pose;
        self.entity.set_pose(pose);
    }

    /// Run as many fixed steps as `elapsed` seconds of frame time allow.
    pub fn advance(&mut self, elapsed: f64, input: &mut impl InputSource) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if !self.enabled {
            return outcome;
        }
        let _span = tracing::debug_span!("advance", current_id = %self.current_id).entered();
        let steps = self.clock.advance(elapsed);
        for _ in 0..steps {
            let sample = input.sample();
            self.run_step(sample, &mut outcome);
        }
        outcome
    }

    /// `advance` with the frame time taken from `clock`.
    pub fn advance_with(
        &mut self,
        clock: &mut impl FrameClock,
        input: &mut impl InputSource,
    ) -> StepOutcome {
        let elapsed = clock.elapsed_seconds();
        self.advance(elapsed, input)
    }

    /// Run exactly one simulation step with `sample`, bypassing the tick clock.
    pub fn step(&mut self, sample: IntentSample) -> StepOutcome {
        let mut outcome = StepOutcome::default();
        if self.enabled {
            self.run_step(sample, &mut outcome);
        }
        outcome
    }

    fn run_step(&mut self, sample: IntentSample, outcome: &mut StepOutcome) {
        outcome.steps += 1;
        let tick_delta = self.clock.tick_delta() as f32;
        let attack_eligible = self
            .attack
            .eligible(sample.attack_held, self.entity.weapon_equipped());

        match networked_flags(&sample, attack_eligible) {
            Some(flags) => self.predict(flags, outcome),
            None => self.entity.idle(tick_delta),
        }
        self.attack.tick(tick_delta);

        if self.config.send_inputs {
            self.send_unacked();
        }
        if self.config.reconcile {
            outcome.corrected |= self.reconcile();
        }
    }

    fn predict(&mut self, flags: InputFlags, outcome: &mut StepOutcome) {
        let id = self.current_id;
        self.inputs.write(id, flags);

        if self.config.predict_locally {
            self.pose = self.stepper.step(self.pose, flags);
            self.entity.apply_input(&InputFrame::new(id, flags));
            self.entity.set_pose(self.pose);
        }
        if flags.attack() {
            self.attack.fire();
            self.entity.fire();
            outcome.attacked = true;
        }
        outcome.moved |= flags.has_movement();

        self.states.write(id, self.pose);
        tracing::trace!(%id, flags = flags.to_byte(), pose = ?self.pose, "predicted");
        self.current_id = id.next();
        outcome.networked_ticks += 1;
    }

    fn send_unacked(&mut self) {
        let Some(batch) = self
            .batcher
            .collect(self.acks.acked(), self.current_id, &self.inputs)
        else {
            return;
        };
        let count = batch.len() as u64;
        match self.sender.send(Channel::Unreliable, &ClientMessage::Input(batch)) {
            Ok(()) => {
                self.send_stats.batches_sent += 1;
                self.send_stats.inputs_sent += count;
            }
            Err(e) => {
                self.send_stats.send_failures += 1;
                tracing::warn!(error = %e, "input send failed; window will be re-sent next step");
            }
        }
    }

    fn reconcile(&mut self) -> bool {
        let corrected = self.reconciler.reconcile(
            self.current_id,
            &self.inputs,
            &mut self.states,
            &self.stepper,
            self.config.predict_locally,
        );
        match corrected {
            Some(pose) => {
                if pose != self.pose {
                    tracing::debug!(from = ?self.pose, to = ?pose, "live pose corrected");
                }
                self.pose = pose;
                self.entity.set_pose(pose);
                true
            }
            None => false,
        }
    }

    /// The server confirmed receiving inputs up to `id`.
    pub fn on_ack(&mut self, id: TickId) {
        if !self.enabled {
            return;
        }
        if self.acks.acknowledge(id) {
            tracing::trace!(%id, "ack advanced");
        }
    }

    /// An authoritative report arrived. It also acknowledges its own id, unless
    /// that id has not been predicted yet.
    pub fn on_state(&mut self, report: AuthoritativeReport) {
        if !self.enabled {
            return;
        }
        if report.id < self.current_id {
            self.acks.acknowledge(report.id);
        }
        self.reconciler.ingest(report);
    }

    pub fn on_server_message(&mut self, message: ServerMessage) {
        if !self.enabled {
            return;
        }
        match message {
            ServerMessage::Ack { acked_id } => self.on_ack(acked_id),
            ServerMessage::State(report) => self.on_state(report.into()),
            ServerMessage::RemoteState { entity_id, x, z } => {
                self.registry.update_remote(entity_id, Vec2::new(x, z));
            }
        }
    }

    /// Decode one transport delivery and dispatch every message in it.
    ///
    /// Returns the number of messages dispatched.
    pub fn on_delivery(&mut self, bytes: &[u8]) -> Result<usize, CodecError> {
        let messages = decode_delivery(bytes)?;
        let count = messages.len();
        for message in messages {
            self.on_server_message(message);
        }
        Ok(count)
    }

    /// Stop or resume all processing. Disabling drops nothing; in-flight state is
    /// left as it is.
    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            tracing::info!(enabled, "prediction client toggled");
        }
        self.enabled = enabled;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Start a fresh session after reconnecting. The live pose is kept.
    pub fn reset(&mut self) {
        tracing::info!(last_id = %self.current_id, "prediction session reset");
        self.clock.reset();
        self.current_id = TickId::ZERO;
        self.inputs.clear();
        self.states.clear();
        self.acks.reset();
        self.reconciler.clear();
        self.attack.reset();
    }

    pub fn set_attack_cooldown(&mut self, cooldown: f32) {
        self.attack.set_cooldown(cooldown);
    }

    pub fn toggle_auto_attack(&mut self) -> bool {
        self.attack.toggle_auto_attack()
    }

    pub fn auto_attack(&self) -> bool {
        self.attack.auto_attack()
    }

    /// Id the next networked tick will get.
    pub fn current_id(&self) -> TickId {
        self.current_id
    }

    pub fn acked_id(&self) -> Option<TickId> {
        self.acks.acked()
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    /// Most recently received authoritative report, for debug overlays.
    pub fn ghost(&self) -> Option<AuthoritativeReport> {
        self.reconciler.latest()
    }

    pub fn input_at(&self, id: TickId) -> Option<InputFlags> {
        self.inputs.get(id).copied()
    }

    pub fn snapshot_at(&self, id: TickId) -> Option<Pose> {
        self.states.get(id).copied()
    }

    pub fn pending_reports(&self) -> usize {
        self.reconciler.pending().len()
    }

    pub fn reconcile_stats(&self) -> ReconcileStats {
        self.reconciler.stats()
    }

    pub fn send_stats(&self) -> SendStats {
        self.send_stats
    }

    /// Windows the batcher had to cut short because history was overwritten.
    pub fn truncated_sends(&self) -> u64 {
        self.batcher.truncated_windows()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn entity(&self) -> &E {
        &self.entity
    }

    pub fn entity_mut(&mut self) -> &mut E {
        &mut self.entity
    }

    pub fn sender(&self) -> &S {
        &self.sender
    }

    pub fn sender_mut(&mut self) -> &mut S {
        &mut self.sender
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }
}
