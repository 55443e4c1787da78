mod server;

use std::collections::HashMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use glam::Vec2;
use tracing_subscriber::EnvFilter;

use rewind_client::{EntityRegistry, LiveEntity, PredictionClient};
use rewind_common::{Pose, RemoteEntityId};
use rewind_input::{Axis, IntentSample};
use rewind_kernel::{ClientConfig, PlanarStepper};
use rewind_net::LoopbackSender;

use server::SimServer;

#[derive(Parser)]
#[command(name = "rewind-cli", about = "CLI tool for the client prediction core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print crate versions
    Info,
    /// Print the effective client configuration as YAML
    Config {
        /// YAML or JSON config file; defaults are used when omitted
        path: Option<PathBuf>,
    },
    /// Run a client against an in-process server with latency and loss
    Simulate {
        /// Number of simulation ticks to script
        #[arg(short, long, default_value = "120")]
        ticks: u32,
        /// One-way server reply delay, in ticks
        #[arg(short, long, default_value = "6")]
        latency: u32,
        /// Server movement speed multiplier
        #[arg(short, long, default_value = "1.0")]
        buff: f32,
        /// Drop every Nth client datagram (0 disables)
        #[arg(short, long, default_value = "0")]
        drop_every: u32,
        /// YAML or JSON config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Stand-in for the rendered local character.
#[derive(Debug, Default)]
struct Avatar {
    pose: Pose,
    pose_writes: u64,
    idles: u64,
    attacks: u64,
}

impl LiveEntity for Avatar {
    fn set_pose(&mut self, pose: Pose) {
        self.pose = pose;
        self.pose_writes += 1;
    }

    fn idle(&mut self, _tick_delta: f32) {
        self.idles += 1;
    }

    fn fire(&mut self) {
        self.attacks += 1;
    }
}

#[derive(Debug, Default)]
struct RemoteTable {
    positions: HashMap<RemoteEntityId, Vec2>,
}

impl EntityRegistry for RemoteTable {
    fn update_remote(&mut self, id: RemoteEntityId, position: Vec2) {
        self.positions.insert(id, position);
    }
}

fn load_config(path: Option<PathBuf>) -> anyhow::Result<ClientConfig> {
    let config = match path {
        Some(path) => ClientConfig::load(&path)?,
        None => ClientConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Walk a square with a turn at each corner, swinging now and then.
fn scripted_intent(tick: u32) -> IntentSample {
    match tick % 40 {
        0..=23 => IntentSample::movement(0.0, 1.0),
        24 => IntentSample::rotation(Axis::Positive),
        25..=31 => IntentSample::movement(1.0, 1.0),
        32 | 36 => IntentSample::attack(),
        _ => IntentSample::IDLE,
    }
}

fn simulate(
    ticks: u32,
    latency: u32,
    buff: f32,
    drop_every: u32,
    config: ClientConfig,
) -> anyhow::Result<()> {
    let client_stepper = PlanarStepper::from_config(&config);
    let server_stepper = PlanarStepper::new(
        client_stepper.units_per_tick * buff,
        client_stepper.degrees_per_tick,
    );
    let frame_time = 1.0 / f64::from(config.tick_rate);
    let mut client = PredictionClient::new(
        config,
        Avatar::default(),
        LoopbackSender::new(),
        client_stepper,
    )?
    .with_registry(RemoteTable::default());
    let mut server = SimServer::new(server_stepper, latency, Some(drop_every));

    let mut scripted = 0u32;
    let mut input = || {
        let sample = if scripted < ticks {
            scripted_intent(scripted)
        } else {
            IntentSample::IDLE
        };
        scripted += 1;
        sample
    };

    let settle = ticks + (latency + 2) * 8;
    let mut corrections = 0u32;
    for frame in 0..settle {
        let outcome = client.advance(frame_time, &mut input);
        if outcome.corrected {
            corrections += 1;
        }
        server.receive(client.sender_mut().drain())?;
        for _ in 0..outcome.steps {
            for delivery in server.tick()? {
                client.on_delivery(&delivery)?;
            }
        }
        let caught_up = client.acked_id().map(|id| id.next()) == Some(client.current_id());
        if frame >= ticks && caught_up && client.pending_reports() == 0 {
            break;
        }
    }

    let reconcile = client.reconcile_stats();
    let sent = client.send_stats();
    println!("Simulation: ticks={ticks}, latency={latency}, buff={buff}, drop_every={drop_every}");
    println!(
        "Inputs: networked={}, acked={}, batches={}, resent_total={}, dropped={}",
        client.current_id().get(),
        client.acked_id().map_or("none".to_string(), |id| id.to_string()),
        sent.batches_sent,
        sent.inputs_sent,
        server.dropped()
    );
    println!(
        "Reconcile: reports={}, skipped={}, rewinds={}, replayed={}, missing={}, lost_inputs={}, corrected_frames={corrections}",
        reconcile.reports,
        reconcile.skipped,
        reconcile.rewinds,
        reconcile.replayed_ticks,
        reconcile.missing_snapshots,
        reconcile.lost_inputs
    );
    println!(
        "Avatar: pose_writes={}, idles={}, attacks={}, remotes={}",
        client.entity().pose_writes,
        client.entity().idles,
        client.entity().attacks,
        client.registry().positions.len()
    );

    let client_pose = client.pose();
    let server_pose = server.pose();
    println!(
        "Client pose: ({:.3}, {:.3}) facing {:.1}",
        client_pose.x(),
        client_pose.z(),
        client_pose.facing
    );
    println!(
        "Server pose: ({:.3}, {:.3}) facing {:.1}",
        server_pose.x(),
        server_pose.z(),
        server_pose.facing
    );
    let epsilon = client.config().reconciliation_epsilon;
    println!(
        "Converged: {}",
        if client_pose.matches(&server_pose, epsilon) {
            "OK"
        } else {
            "NO"
        }
    );
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Info => {
            println!("rewind-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", rewind_common::crate_info());
            println!("input: {}", rewind_input::crate_info());
            println!("kernel: {}", rewind_kernel::crate_info());
            println!("net: {}", rewind_net::crate_info());
            println!("client: {}", rewind_client::crate_info());
        }
        Commands::Config { path } => {
            let config = load_config(path)?;
            print!("{}", config.to_yaml()?);
        }
        Commands::Simulate {
            ticks,
            latency,
            buff,
            drop_every,
            config,
        } => {
            let config = load_config(config)?;
            simulate(ticks, latency, buff, drop_every, config)?;
        }
    }

    Ok(())
}
