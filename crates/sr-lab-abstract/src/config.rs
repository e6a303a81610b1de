use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sequence space {seq_space} is too small for window size {window_size} (need at least window_size + 1)")]
    SeqSpaceTooSmall { window_size: u16, seq_space: u16 },
    #[error("window size must be at least 1")]
    ZeroWindow,
}

/// Protocol constants shared by sender and receiver. Both sides must agree on
/// these for the window arithmetic to line up.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ProtocolConfig {
    /// Maximum number of simultaneously unacknowledged packets.
    pub window_size: u16,
    /// Sequence numbers live in `[0, seq_space)`.
    pub seq_space: u16,
    /// Retransmission timeout, in simulated ticks.
    pub timeout_ticks: u64,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            window_size: 6,
            seq_space: 13,
            timeout_ticks: 24,
        }
    }
}

impl ProtocolConfig {
    /// A window of `w` needs at least `w + 1` sequence numbers, otherwise a
    /// stale duplicate ACK is indistinguishable from a fresh one after
    /// wraparound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        if self.seq_space < self.window_size + 1 {
            return Err(ConfigError::SeqSpaceTooSmall {
                window_size: self.window_size,
                seq_space: self.seq_space,
            });
        }
        Ok(())
    }
}

/// Knobs for the simulated channel between the two entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub loss_rate: f64,
    pub corrupt_rate: f64,
    pub min_latency: u64,
    pub max_latency: u64,
    pub seed: u64,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            loss_rate: 0.0,
            corrupt_rate: 0.0,
            min_latency: 2,
            max_latency: 8,
            seed: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert_eq!(ProtocolConfig::default().validate(), Ok(()));
    }

    #[test]
    fn seq_space_must_exceed_window() {
        let cfg = ProtocolConfig {
            window_size: 6,
            seq_space: 6,
            timeout_ticks: 24,
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::SeqSpaceTooSmall { .. })
        ));

        let boundary = ProtocolConfig {
            window_size: 6,
            seq_space: 7,
            timeout_ticks: 24,
        };
        assert_eq!(boundary.validate(), Ok(()));
    }
}
