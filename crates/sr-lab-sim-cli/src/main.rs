use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use sr_lab_abstract::{ChannelConfig, ProtocolConfig};
use sr_lab_core::{SrReceiver, SrSender};
use sr_lab_simulator::{SimulationReport, Simulator, scenario_runner};

#[derive(Parser, Debug)]
#[command(author, version, about = "Selective-repeat protocol lab simulator")]
struct Args {
    /// Run a TOML scenario from disk instead of the default simulation.
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Number of application messages in the default simulation.
    #[arg(long, default_value_t = 10)]
    messages: u32,

    /// Ticks between consecutive application submissions.
    #[arg(long, default_value_t = 50)]
    spacing: u64,

    /// Probability that the channel drops a packet.
    #[arg(long, default_value_t = 0.1)]
    loss: f64,

    /// Probability that the channel corrupts a packet.
    #[arg(long, default_value_t = 0.1)]
    corrupt: f64,

    /// Channel RNG seed.
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Write a JSON trace of the finished simulation.
    #[arg(long)]
    trace_out: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();
    info!("sr-lab-sim-cli starting…");

    let protocol = ProtocolConfig::default();
    let sender = Box::new(SrSender::new(protocol).context("Invalid protocol configuration")?);
    let receiver = Box::new(SrReceiver::new(protocol).context("Invalid protocol configuration")?);

    let report = if let Some(path) = &args.scenario {
        scenario_runner::run_scenario_file(path, sender, receiver)?
    } else {
        run_default_sim(&args, sender, receiver)
    };

    info!(
        "Simulation finished: {}/{} messages delivered, {} data packets sent, {} ticks",
        report.delivered_data.len(),
        report.submitted_data.len(),
        report.sender_packet_count,
        report.duration_ticks
    );

    if let Some(trace_path) = &args.trace_out {
        write_trace(trace_path, &report)?;
    }

    Ok(())
}

fn run_default_sim(
    args: &Args,
    sender: Box<SrSender>,
    receiver: Box<SrReceiver>,
) -> SimulationReport {
    let config = ChannelConfig {
        loss_rate: args.loss,
        corrupt_rate: args.corrupt,
        seed: args.seed,
        ..Default::default()
    };
    let mut sim = Simulator::new(config, sender, receiver);
    for i in 0..args.messages {
        sim.schedule_app_send(i as u64 * args.spacing, format!("message {i}").into_bytes());
    }
    info!("Starting headless simulation…");
    sim.run_until_complete();
    sim.export_report()
}

fn write_trace(path: &Path, report: &SimulationReport) -> Result<()> {
    let data = serde_json::to_vec_pretty(report).context("Failed to serialize simulation trace")?;
    fs::write(path, &data)
        .with_context(|| format!("Failed to write trace file {}", path.display()))?;
    Ok(())
}
