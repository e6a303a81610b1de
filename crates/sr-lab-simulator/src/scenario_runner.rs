use crate::engine::Simulator;
use crate::trace::SimulationReport;
use anyhow::{Context, Result};
use sr_lab_abstract::{ChannelConfig, TestAction, TestAssertion, TestScenario, TransportProtocol};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum AssertionError {
    #[error("expected data {expected:?} was not delivered")]
    DataNotDelivered { expected: String },
    #[error("delivery order/content mismatch at index {index}: expected {expected:?}, got {got:?}")]
    OutOfOrderDelivery {
        index: usize,
        expected: Vec<u8>,
        got: Vec<u8>,
    },
    #[error("delivered {got} messages, submitted {expected}")]
    DeliveryCountMismatch { expected: usize, got: usize },
    #[error("sender packet count {got} outside expected range [{min}, {max:?}]")]
    PacketCountOutOfRange { got: u32, min: u32, max: Option<u32> },
    #[error("simulation took {got} ticks, limit was {limit}")]
    TooSlow { got: u64, limit: u64 },
}

/// Load a TOML scenario from disk, run it, and check its assertions.
pub fn run_scenario_file(
    path: &Path,
    sender: Box<dyn TransportProtocol>,
    receiver: Box<dyn TransportProtocol>,
) -> Result<SimulationReport> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
    let scenario: TestScenario =
        toml::from_str(&content).context("Failed to parse scenario file")?;
    run_scenario(&scenario, sender, receiver)
}

pub fn run_scenario(
    scenario: &TestScenario,
    sender: Box<dyn TransportProtocol>,
    receiver: Box<dyn TransportProtocol>,
) -> Result<SimulationReport> {
    info!("Running scenario '{}': {}", scenario.name, scenario.description);

    let mut config = ChannelConfig::default();
    scenario.config.apply_to(&mut config);
    let mut sim = Simulator::new(config, sender, receiver);
    configure_actions(&mut sim, &scenario.actions);

    sim.run_until_complete();
    let report = sim.export_report();

    for assertion in &scenario.assertions {
        check_assertion(assertion, &report)
            .with_context(|| format!("Scenario '{}' failed", scenario.name))?;
    }
    info!("Scenario '{}' passed", scenario.name);
    Ok(report)
}

pub fn configure_actions(sim: &mut Simulator, actions: &[TestAction]) {
    for action in actions {
        match action {
            TestAction::AppSend { time, data } => {
                sim.schedule_app_send(*time, data.as_bytes().to_vec());
            }
            TestAction::DropNextFromSenderSeq { seq } => {
                sim.add_drop_sender_seq_once(*seq);
            }
            TestAction::DropNextFromReceiverAck { ack } => {
                sim.add_drop_receiver_ack_once(*ack);
            }
        }
    }
}

/// Delivered payloads are fixed-size and zero-padded; strip the padding
/// before comparing against scenario data.
fn trim_padding(data: &[u8]) -> &[u8] {
    let end = data
        .iter()
        .rposition(|&b| b != 0)
        .map_or(0, |pos| pos + 1);
    &data[..end]
}

fn check_assertion(assertion: &TestAssertion, report: &SimulationReport) -> Result<(), AssertionError> {
    match assertion {
        TestAssertion::DataDelivered { data } => {
            let wanted = data.as_bytes();
            let found = report
                .delivered_data
                .iter()
                .any(|d| trim_padding(d) == wanted);
            if !found {
                return Err(AssertionError::DataNotDelivered {
                    expected: data.clone(),
                });
            }
        }
        TestAssertion::DeliveredInOrder => {
            if report.delivered_data.len() != report.submitted_data.len() {
                return Err(AssertionError::DeliveryCountMismatch {
                    expected: report.submitted_data.len(),
                    got: report.delivered_data.len(),
                });
            }
            for (index, (submitted, delivered)) in report
                .submitted_data
                .iter()
                .zip(&report.delivered_data)
                .enumerate()
            {
                if trim_padding(submitted) != trim_padding(delivered) {
                    return Err(AssertionError::OutOfOrderDelivery {
                        index,
                        expected: submitted.clone(),
                        got: delivered.clone(),
                    });
                }
            }
        }
        TestAssertion::SenderPacketCount { min, max } => {
            let got = report.sender_packet_count;
            let over = max.map(|m| got > m).unwrap_or(false);
            if got < *min || over {
                return Err(AssertionError::PacketCountOutOfRange {
                    got,
                    min: *min,
                    max: *max,
                });
            }
        }
        TestAssertion::MaxDuration { ticks } => {
            if report.duration_ticks > *ticks {
                return Err(AssertionError::TooSlow {
                    got: report.duration_ticks,
                    limit: *ticks,
                });
            }
        }
    }
    Ok(())
}
