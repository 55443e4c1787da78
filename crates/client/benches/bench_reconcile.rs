use std::hint::black_box;
use std::time::Instant;

use rewind_client::Reconciler;
use rewind_common::{AuthoritativeReport, Pose, TickId};
use rewind_input::{Axis, InputFlags};
use rewind_kernel::{PlanarStepper, ReportOrder, Stepper, TickRing};

struct History {
    inputs: TickRing<InputFlags>,
    states: TickRing<Pose>,
    current: TickId,
}

fn make_history(capacity: usize, ticks: u32, stepper: &PlanarStepper) -> History {
    let mut inputs = TickRing::new(capacity);
    let mut states = TickRing::new(capacity);
    let mut pose = Pose::ORIGIN;
    for id in 0..ticks {
        let flags = match id % 3 {
            0 => InputFlags::EMPTY.with_movement(Axis::Neutral, Axis::Positive),
            1 => InputFlags::EMPTY.with_movement(Axis::Positive, Axis::Positive),
            _ => InputFlags::EMPTY.with_rotation(Axis::Positive),
        };
        inputs.write(TickId(id), flags);
        pose = stepper.step(pose, flags);
        states.write(TickId(id), pose);
    }
    History {
        inputs,
        states,
        current: TickId(ticks),
    }
}

fn bench_replay(capacity: usize, depth: u32, iterations: usize) {
    let stepper = PlanarStepper::new(0.25, 6.0);
    let mut history = make_history(capacity, capacity as u32, &stepper);
    let mut reconciler = Reconciler::new(0.004, ReportOrder::Arrival);
    let report_id = TickId(history.current.get() - depth);

    let start = Instant::now();
    for i in 0..iterations {
        let nudge = if i % 2 == 0 { 1.0 } else { -1.0 };
        reconciler.ingest(AuthoritativeReport::new(report_id, Pose::new(nudge, 0.0, 0.0)));
        black_box(reconciler.reconcile(
            black_box(history.current),
            &history.inputs,
            &mut history.states,
            &stepper,
            true,
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  replay ({depth} ticks deep, capacity {capacity}, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn bench_confirmed(reports: u32, iterations: usize) {
    let stepper = PlanarStepper::new(0.25, 6.0);
    let mut history = make_history(128, 128, &stepper);
    let mut reconciler = Reconciler::new(0.004, ReportOrder::SortById);
    let confirmed: Vec<_> = (0..reports)
        .filter_map(|offset| {
            let id = TickId(127 - offset);
            history
                .states
                .get(id)
                .map(|pose| AuthoritativeReport::new(id, *pose))
        })
        .collect();

    let start = Instant::now();
    for _ in 0..iterations {
        for report in &confirmed {
            reconciler.ingest(*report);
        }
        black_box(reconciler.reconcile(
            history.current,
            &history.inputs,
            &mut history.states,
            &stepper,
            true,
        ));
    }
    let elapsed = start.elapsed();
    let per_iter = elapsed / iterations as u32;
    println!(
        "  confirmed batch ({reports} reports, {iterations} iters): {per_iter:?}/iter, total {elapsed:?}"
    );
}

fn main() {
    println!("=== Reconciliation Benchmarks ===\n");

    println!("Rewind and replay:");
    bench_replay(128, 8, 10000);
    bench_replay(128, 64, 10000);
    bench_replay(1024, 512, 1000);

    println!("\nMatching reports (no replay):");
    bench_confirmed(1, 100000);
    bench_confirmed(16, 10000);
    bench_confirmed(64, 10000);

    println!("\n=== Done ===");
}
