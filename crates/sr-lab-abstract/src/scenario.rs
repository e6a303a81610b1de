use crate::config::ChannelConfig;
use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct TestScenario {
    pub name: String,
    pub description: String,
    pub config: ChannelConfigOverride,
    pub actions: Vec<TestAction>,
    pub assertions: Vec<TestAssertion>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct ChannelConfigOverride {
    pub loss_rate: Option<f64>,
    pub corrupt_rate: Option<f64>,
    pub min_latency: Option<u64>,
    pub max_latency: Option<u64>,
    pub seed: Option<u64>,
}

impl ChannelConfigOverride {
    pub fn apply_to(&self, config: &mut ChannelConfig) {
        if let Some(v) = self.loss_rate {
            config.loss_rate = v;
        }
        if let Some(v) = self.corrupt_rate {
            config.corrupt_rate = v;
        }
        if let Some(v) = self.min_latency {
            config.min_latency = v;
        }
        if let Some(v) = self.max_latency {
            config.max_latency = v;
        }
        if let Some(v) = self.seed {
            config.seed = v;
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestAction {
    /// Application submits a message at a specific time.
    AppSend { time: u64, data: String },
    /// Deterministically drop the first data packet with given seq number.
    DropNextFromSenderSeq { seq: u16 },
    /// Deterministically drop the first ACK with given ack number.
    DropNextFromReceiverAck { ack: u16 },
}

#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TestAssertion {
    /// Assert that specific data was delivered to the application layer.
    DataDelivered { data: String },
    /// Assert that every submitted message was delivered exactly once, in
    /// submission order.
    DeliveredInOrder,
    /// Assert that the total number of data packets sent is within range.
    SenderPacketCount { min: u32, max: Option<u32> },
    /// Assert that the simulation finishes within `ticks`.
    MaxDuration { ticks: u64 },
}
