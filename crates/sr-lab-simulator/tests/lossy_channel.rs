//! End-to-end runs of the selective-repeat engines over the simulated
//! channel: perfect, deterministic-fault, and randomly lossy/corrupting
//! configurations must all deliver every message in order.

use sr_lab_abstract::{ChannelConfig, ProtocolConfig};
use sr_lab_core::{SrReceiver, SrSender};
use sr_lab_simulator::{Simulator, scenario_runner};
use std::path::Path;

fn build_sim(config: ChannelConfig) -> Simulator {
    let protocol = ProtocolConfig::default();
    let sender = Box::new(SrSender::new(protocol).expect("valid config"));
    let receiver = Box::new(SrReceiver::new(protocol).expect("valid config"));
    Simulator::new(config, sender, receiver)
}

fn trim(data: &[u8]) -> &[u8] {
    let end = data.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    &data[..end]
}

fn assert_delivered_in_order(sim: &Simulator) {
    assert_eq!(
        sim.delivered_data.len(),
        sim.submitted_data.len(),
        "every submitted message must be delivered exactly once"
    );
    for (i, (submitted, delivered)) in sim
        .submitted_data
        .iter()
        .zip(&sim.delivered_data)
        .enumerate()
    {
        assert_eq!(
            trim(submitted),
            trim(delivered),
            "delivery order diverged at message {i}"
        );
    }
}

#[test]
fn perfect_channel_delivers_everything_in_order() {
    let mut sim = build_sim(ChannelConfig::default());
    for i in 0..10u32 {
        sim.schedule_app_send(i as u64 * 50, format!("message {i}").into_bytes());
    }
    sim.run_until_complete();

    assert_delivered_in_order(&sim);
    // No faults, no retransmissions: one data packet per message.
    assert_eq!(sim.sender_packet_count, 10);
}

#[test]
fn burst_fills_the_window_without_exceeding_it() {
    let mut sim = build_sim(ChannelConfig::default());
    // Eight submissions in the same tick: two must be rejected by the
    // six-slot window and the rest delivered.
    for i in 0..8u32 {
        sim.schedule_app_send(0, format!("burst {i}").into_bytes());
    }
    sim.run_until_complete();

    assert_eq!(sim.delivered_data.len(), 6);
    let peak = sim
        .metric_series("outstanding")
        .and_then(|s| s.iter().map(|&(_, v)| v as u32).max())
        .unwrap_or(0);
    assert_eq!(peak, 6);
}

#[test]
fn dropped_data_packet_is_recovered_by_timeout() {
    let mut sim = build_sim(ChannelConfig::default());
    sim.add_drop_sender_seq_once(2);
    for i in 0..6u32 {
        sim.schedule_app_send(i as u64, format!("message {i}").into_bytes());
    }
    sim.run_until_complete();

    assert_delivered_in_order(&sim);
    // Timeout retransmits the lost packet (and any other unacked ones), so
    // the sender must have sent more than one packet per message overall.
    assert!(sim.sender_packet_count > 6);
}

#[test]
fn dropped_trailing_ack_is_recovered_by_reassertion() {
    let mut sim = build_sim(ChannelConfig::default());
    sim.add_drop_receiver_ack_once(3);
    for i in 0..4u32 {
        sim.schedule_app_send(i as u64, format!("message {i}").into_bytes());
    }
    sim.run_until_complete();

    // The lost ACK forces a retransmission of packet 3; the receiver has
    // already delivered it, so it re-asserts `expected - 1` (= 3), which
    // the sender accepts as the missing acknowledgment. No double delivery.
    assert_delivered_in_order(&sim);
    assert_eq!(sim.sender_packet_count, 5);
}

#[test]
fn lossy_corrupting_channel_still_delivers_in_order() {
    let config = ChannelConfig {
        loss_rate: 0.2,
        corrupt_rate: 0.1,
        min_latency: 2,
        max_latency: 8,
        seed: 42,
    };
    let mut sim = build_sim(config);
    // One message in flight at a time: with spaced submissions, any lost or
    // corrupted packet (data or ACK) is recovered by timeout plus the
    // receiver's re-assertion of its delivery cursor.
    for i in 0..30u32 {
        sim.schedule_app_send(i as u64 * 300, format!("message {i}").into_bytes());
    }

    // Bound the run so a regression shows up as a failed assertion rather
    // than a spin on retransmission events.
    sim.init();
    while sim.step() {
        if sim.current_time() > 100_000 {
            break;
        }
    }

    assert_delivered_in_order(&sim);
    assert!(
        sim.sender_packet_count > 30,
        "loss must have forced retransmissions"
    );
}

#[test]
fn bundled_scenario_passes_its_assertions() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/window_recovery.toml");
    let protocol = ProtocolConfig::default();
    let report = scenario_runner::run_scenario_file(
        &path,
        Box::new(SrSender::new(protocol).expect("valid config")),
        Box::new(SrReceiver::new(protocol).expect("valid config")),
    )
    .expect("scenario should pass");
    assert_eq!(report.delivered_data.len(), 4);
}
