//! Additive checksum over seqnum, acknum and payload. Good enough to catch
//! the simulated channel's bit errors with high probability; not a
//! cryptographic integrity check.

use sr_lab_abstract::Packet;

pub fn compute(packet: &Packet) -> u32 {
    let mut sum = packet.seqnum as u32;
    sum = sum.wrapping_add(packet.acknum.unwrap_or(0) as u32);
    for &byte in &packet.payload {
        sum = sum.wrapping_add(byte as u32);
    }
    sum
}

pub fn is_corrupted(packet: &Packet) -> bool {
    packet.checksum != compute(packet)
}

/// Build a packet with its checksum filled in.
pub fn seal(seqnum: u16, acknum: Option<u16>, payload: [u8; sr_lab_abstract::PAYLOAD_LEN]) -> Packet {
    let mut packet = Packet::new(seqnum, acknum, payload);
    packet.checksum = compute(&packet);
    packet
}

#[cfg(test)]
mod tests {
    use super::*;
    use sr_lab_abstract::{PAYLOAD_LEN, Packet};

    #[test]
    fn sealed_packet_verifies() {
        let packet = seal(3, None, Packet::pad_payload(b"hello world"));
        assert!(!is_corrupted(&packet));
    }

    #[test]
    fn payload_flip_is_detected() {
        let mut packet = seal(3, None, Packet::pad_payload(b"hello world"));
        packet.payload[4] ^= 0x20;
        assert!(is_corrupted(&packet));
    }

    #[test]
    fn header_flip_is_detected() {
        let mut packet = seal(7, Some(2), [b'0'; PAYLOAD_LEN]);
        packet.seqnum = 8;
        assert!(is_corrupted(&packet));

        let mut packet = seal(7, Some(2), [b'0'; PAYLOAD_LEN]);
        packet.acknum = Some(3);
        assert!(is_corrupted(&packet));
    }

    #[test]
    fn ack_and_data_checksums_cover_acknum() {
        let data = seal(0, None, [b'0'; PAYLOAD_LEN]);
        let ack = seal(0, Some(5), [b'0'; PAYLOAD_LEN]);
        assert_ne!(data.checksum, ack.checksum);
    }
}
