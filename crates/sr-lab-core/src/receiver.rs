use crate::checksum;
use crate::seqspace::SeqSpace;
use sr_lab_abstract::{ConfigError, PAYLOAD_LEN, Packet, ProtocolConfig, SystemContext, TransportProtocol};
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct RecvSlot {
    received: bool,
    packet: Option<Packet>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReceiverStats {
    /// Uncorrupted in-window packets received, duplicates included.
    pub packets_received: u64,
    /// In-window packets that were already buffered.
    pub duplicates: u64,
    /// Payloads handed up to the application.
    pub delivered: u64,
}

/// Selective-repeat receiver: buffers out-of-order packets inside the window,
/// acknowledges each correct arrival individually, and releases contiguous
/// runs to the application in sequence order.
pub struct SrReceiver {
    config: ProtocolConfig,
    space: SeqSpace,
    /// Cumulative delivery cursor: the next sequence number the application
    /// is owed.
    expected: u16,
    slots: Vec<RecvSlot>,
    stats: ReceiverStats,
}

impl SrReceiver {
    pub fn new(config: ProtocolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            space: SeqSpace::new(config.seq_space),
            expected: 0,
            slots: vec![RecvSlot::default(); config.seq_space as usize],
            stats: ReceiverStats::default(),
        })
    }

    pub fn expected(&self) -> u16 {
        self.expected
    }

    pub fn stats(&self) -> ReceiverStats {
        self.stats
    }

    /// Acknowledgments carry a placeholder seqnum and a neutral payload;
    /// only acknum and checksum are meaningful.
    fn send_ack(&self, ctx: &mut dyn SystemContext, acknum: u16) {
        ctx.send_packet(checksum::seal(0, Some(acknum), [b'0'; PAYLOAD_LEN]));
    }

    /// Re-assert the last in-order delivery. Answers both corrupted packets
    /// and retransmissions whose ACK the sender never saw.
    fn resend_last_ack(&self, ctx: &mut dyn SystemContext) {
        self.send_ack(ctx, self.space.retreat(self.expected));
    }

    fn drain_contiguous(&mut self, ctx: &mut dyn SystemContext) {
        while self.slots[self.expected as usize].received {
            let slot = &mut self.slots[self.expected as usize];
            slot.received = false;
            if let Some(packet) = slot.packet.take() {
                ctx.deliver_data(&packet.payload);
                self.stats.delivered += 1;
            }
            self.expected = self.space.advance(self.expected);
        }
    }
}

impl TransportProtocol for SrReceiver {
    fn init(&mut self, _ctx: &mut dyn SystemContext) {
        self.expected = 0;
        self.slots.fill(RecvSlot::default());
        self.stats = ReceiverStats::default();
    }

    fn on_packet(&mut self, ctx: &mut dyn SystemContext, packet: Packet) {
        if checksum::is_corrupted(&packet) {
            ctx.log("corrupted packet received, re-sending last ACK");
            self.resend_last_ack(ctx);
            return;
        }
        if packet.is_ack() {
            // Simplex link: nothing flows this way but data.
            return;
        }

        let seq = packet.seqnum;
        if !self
            .space
            .in_window(self.expected, self.config.window_size, seq)
        {
            ctx.log(&format!("packet {seq} outside receive window, re-sending last ACK"));
            self.resend_last_ack(ctx);
            return;
        }

        self.stats.packets_received += 1;
        let slot = &mut self.slots[seq as usize];
        if slot.received {
            self.stats.duplicates += 1;
            ctx.log(&format!("duplicate packet {seq}, already buffered"));
        } else {
            slot.received = true;
            slot.packet = Some(packet);
            ctx.log(&format!("packet {seq} received and buffered"));
        }

        self.send_ack(ctx, seq);
        self.drain_contiguous(ctx);
        debug!(expected = self.expected, "delivery cursor");
    }

    fn on_timer(&mut self, _ctx: &mut dyn SystemContext, _timer_id: u32) {
        // The receiver never arms a timer.
    }

    fn on_app_data(&mut self, ctx: &mut dyn SystemContext, _data: &[u8]) {
        // Simplex transfer: this entity only receives.
        ctx.log("receiver has no send path, dropping application message");
    }
}
