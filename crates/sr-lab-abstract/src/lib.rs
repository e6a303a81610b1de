pub mod config;
pub mod interface;
pub mod packet;
pub mod scenario;

pub use interface::{SystemContext, TransportProtocol};
pub use packet::{PAYLOAD_LEN, Packet};

pub use config::{ChannelConfig, ConfigError, ProtocolConfig};
pub use scenario::{ChannelConfigOverride, TestAction, TestAssertion, TestScenario};
