mod support;

use rewind_client::PredictionClient;
use rewind_input::{Axis, IntentSample};
use rewind_kernel::{PlanarStepper, Stepper};
use rewind_net::LoopbackSender;

use support::{DelayedServer, RecordingEntity, unit_config, unit_stepper};

type LoopClient = PredictionClient<RecordingEntity, LoopbackSender, PlanarStepper>;

fn session() -> LoopClient {
    PredictionClient::new(
        unit_config(),
        RecordingEntity::default(),
        LoopbackSender::new(),
        unit_stepper(),
    )
    .unwrap()
}

fn route(client: &mut LoopClient, server: &mut DelayedServer<impl Stepper>) {
    server.receive(client.sender_mut().drain());
    for delivery in server.tick() {
        client.on_delivery(&delivery).unwrap();
    }
}

fn script(ticks: usize) -> impl Iterator<Item = IntentSample> {
    (0..ticks).map(|i| match i % 5 {
        0 | 1 => IntentSample::movement(0.0, 1.0),
        2 => IntentSample::rotation(Axis::Positive),
        3 => IntentSample::movement(1.0, 1.0),
        _ => IntentSample::IDLE,
    })
}

fn drive(client: &mut LoopClient, server: &mut DelayedServer<impl Stepper>, ticks: usize) {
    for sample in script(ticks) {
        client.step(sample);
        route(client, server);
    }
    // Let every in-flight reply land and be reconciled.
    for _ in 0..64 {
        client.step(IntentSample::IDLE);
        route(client, server);
        if server.idle() && client.pending_reports() == 0 {
            break;
        }
    }
    client.step(IntentSample::IDLE);
}

#[test]
fn agreeing_server_never_forces_a_rewind() {
    let mut client = session();
    let mut server = DelayedServer::new(unit_stepper(), 3);
    drive(&mut client, &mut server, 40);

    let stats = client.reconcile_stats();
    assert!(stats.reports > 0);
    assert_eq!(stats.skipped, stats.reports);
    assert_eq!(stats.rewinds, 0);
    assert_eq!(client.pose(), server.pose);
    assert_eq!(client.acked_id().map(|id| id.next()), Some(client.current_id()));
}

#[test]
fn faster_server_is_converged_on() {
    let mut client = session();
    let mut server = DelayedServer::new(PlanarStepper::new(2.0, 90.0), 4);
    drive(&mut client, &mut server, 40);

    let stats = client.reconcile_stats();
    assert!(stats.rewinds > 0);
    assert!(stats.replayed_ticks > 0);
    assert_eq!(client.pose(), server.pose);
    assert_eq!(client.entity().poses.last().copied(), Some(server.pose));
}

#[test]
fn resent_windows_shrink_as_acks_arrive() {
    let mut client = session();
    let mut server = DelayedServer::new(unit_stepper(), 2);
    drive(&mut client, &mut server, 20);

    let sent = client.send_stats();
    // Latency of two steps keeps at most a handful of inputs in each window.
    assert!(sent.inputs_sent < sent.batches_sent * 5);
    assert_eq!(client.truncated_sends(), 0);
}
