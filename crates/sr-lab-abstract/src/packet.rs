use serde::{Deserialize, Serialize};

/// Every packet carries exactly this many payload bytes; shorter application
/// messages are zero-padded by the sender.
pub const PAYLOAD_LEN: usize = 20;

/// The single frame exchanged over the simulated channel.
///
/// `acknum: None` marks a data packet; `Some(n)` marks an acknowledgment for
/// sequence number `n`. The checksum covers seqnum, acknum and payload and is
/// filled in by whoever constructs the packet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Packet {
    pub seqnum: u16,
    pub acknum: Option<u16>,
    pub checksum: u32,
    pub payload: [u8; PAYLOAD_LEN],
}

impl Packet {
    pub fn new(seqnum: u16, acknum: Option<u16>, payload: [u8; PAYLOAD_LEN]) -> Self {
        Self {
            seqnum,
            acknum,
            checksum: 0,
            payload,
        }
    }

    pub fn is_ack(&self) -> bool {
        self.acknum.is_some()
    }

    /// Copy an application message into a fixed-size payload block,
    /// zero-padding or truncating as needed.
    pub fn pad_payload(data: &[u8]) -> [u8; PAYLOAD_LEN] {
        let mut payload = [0u8; PAYLOAD_LEN];
        let n = data.len().min(PAYLOAD_LEN);
        payload[..n].copy_from_slice(&data[..n]);
        payload
    }
}
