use rewind_common::{AuthoritativeReport, Pose, TickId};
use rewind_input::InputFlags;
use rewind_kernel::{ClientConfig, ReportOrder, Stepper, TickRing};

/// Counters describing reconciliation work since the session started.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Reports processed.
    pub reports: u64,
    /// Reports that matched the prediction and were skipped.
    pub skipped: u64,
    /// Reports that rewound the predicted history.
    pub rewinds: u64,
    /// Inputs re-simulated during replays.
    pub replayed_ticks: u64,
    /// Reports dropped because their id was overwritten, never recorded, or not
    /// yet predicted.
    pub missing_snapshots: u64,
    /// Replays cut short because a buffered input was overwritten.
    pub lost_inputs: u64,
}

/// Compares authoritative reports with predicted history and replays on divergence.
///
/// Reports are queued by [`ingest`](Self::ingest) as they arrive and applied
/// together by [`reconcile`](Self::reconcile) once per simulation step.
#[derive(Debug, Clone)]
pub struct Reconciler {
    pending: Vec<AuthoritativeReport>,
    epsilon: f32,
    order: ReportOrder,
    latest: Option<AuthoritativeReport>,
    stats: ReconcileStats,
}

impl Reconciler {
    pub fn new(epsilon: f32, order: ReportOrder) -> Self {
        Self {
            pending: Vec::new(),
            epsilon,
            order,
            latest: None,
            stats: ReconcileStats::default(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.reconciliation_epsilon, config.report_order)
    }

    /// Queue a report for the next reconciliation pass.
    pub fn ingest(&mut self, report: AuthoritativeReport) {
        tracing::trace!(id = %report.id, pose = ?report.pose, "authoritative report queued");
        self.latest = Some(report);
        self.pending.push(report);
    }

    pub fn pending(&self) -> &[AuthoritativeReport] {
        &self.pending
    }

    /// Most recently received report, for debug overlays.
    pub fn latest(&self) -> Option<AuthoritativeReport> {
        self.latest
    }

    pub fn stats(&self) -> ReconcileStats {
        self.stats
    }

    pub fn order(&self) -> ReportOrder {
        self.order
    }

    /// Drop queued reports and history-derived state.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.latest = None;
    }

    /// Apply every queued report against the predicted history.
    ///
    /// A report whose id is no longer (or not yet) in the predicted history is
    /// dropped without touching either ring. A report within tolerance of its
    /// predicted snapshot is skipped. Any other report overwrites that snapshot
    /// with the authoritative pose and, when `replay` is set, re-simulates the buffered inputs from `id + 1` up to
    /// `current`, rewriting each snapshot along the way.
    ///
    /// Returns the corrected pose for the live entity, or `None` when every
    /// report matched.
    pub fn reconcile<S>(
        &mut self,
        current: TickId,
        inputs: &TickRing<InputFlags>,
        states: &mut TickRing<Pose>,
        stepper: &S,
        replay: bool,
    ) -> Option<Pose>
    where
        S: Stepper + ?Sized,
    {
        if self.pending.is_empty() {
            return None;
        }
        let _span = tracing::debug_span!("reconcile", %current, pending = self.pending.len()).entered();

        let mut pending = std::mem::take(&mut self.pending);
        if self.order == ReportOrder::SortById {
            pending.sort_by_key(|report| report.id);
        }

        let mut corrected = None;
        for report in &pending {
            self.stats.reports += 1;
            let predicted = match states.get(report.id) {
                Some(predicted) if report.id < current => *predicted,
                _ => {
                    self.stats.missing_snapshots += 1;
                    tracing::warn!(
                        id = %report.id,
                        %current,
                        lookup = ?states.lookup(report.id),
                        "report outside predicted history, dropped"
                    );
                    continue;
                }
            };
            if predicted.matches(&report.pose, self.epsilon) {
                self.stats.skipped += 1;
                tracing::trace!(id = %report.id, "prediction confirmed");
                continue;
            }
            tracing::debug!(
                id = %report.id,
                error_sq = predicted.squared_distance(&report.pose),
                predicted_facing = predicted.facing,
                authoritative_facing = report.pose.facing,
                "prediction diverged, rewinding"
            );

            self.stats.rewinds += 1;
            corrected = Some(rewind(
                report,
                current,
                inputs,
                states,
                stepper,
                replay,
                &mut self.stats,
            ));
        }

        pending.clear();
        self.pending = pending;
        corrected
    }
}

fn rewind<S>(
    report: &AuthoritativeReport,
    current: TickId,
    inputs: &TickRing<InputFlags>,
    states: &mut TickRing<Pose>,
    stepper: &S,
    replay: bool,
    stats: &mut ReconcileStats,
) -> Pose
where
    S: Stepper + ?Sized,
{
    states.write(report.id, report.pose);
    let mut pose = report.pose;
    if !replay {
        return pose;
    }

    let mut cursor = report.id.next();
    while cursor < current {
        let Some(&flags) = inputs.get(cursor) else {
            stats.lost_inputs += 1;
            tracing::warn!(
                id = %report.id,
                %cursor,
                %current,
                "input history overwritten, replay stopped early"
            );
            break;
        };
        pose = stepper.step(pose, flags);
        states.write(cursor, pose);
        stats.replayed_ticks += 1;
        cursor = cursor.next();
    }
    pose
}
