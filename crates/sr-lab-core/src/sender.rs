use crate::checksum;
use crate::seqspace::SeqSpace;
use crate::timer::{RETRANSMIT_TIMER, RetransmitTimer};
use sr_lab_abstract::{ConfigError, Packet, ProtocolConfig, SystemContext, TransportProtocol};
use tracing::debug;

#[derive(Debug, Clone, Default)]
struct SendSlot {
    packet: Option<Packet>,
    acked: bool,
    due_tick: u64,
}

/// Counters surfaced for grading and diagnostics. None of these affect
/// protocol behavior.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SenderStats {
    /// Application submissions rejected because the window was full.
    pub window_full: u64,
    /// Uncorrupted ACKs received, duplicates included.
    pub total_acks: u64,
    /// ACKs that newly acknowledged a slot.
    pub new_acks: u64,
    /// ACKs for slots already acknowledged or no longer outstanding.
    pub duplicate_acks: u64,
    /// Packets re-sent by timeout.
    pub retransmissions: u64,
}

/// Selective-repeat sender: a window of up to `window_size` independently
/// acknowledged packets, one shared retransmission timer, resend-all on
/// timeout.
pub struct SrSender {
    config: ProtocolConfig,
    space: SeqSpace,
    base: u16,
    next_seqnum: u16,
    count: u16,
    slots: Vec<SendSlot>,
    timer: RetransmitTimer,
    stats: SenderStats,
}

impl SrSender {
    pub fn new(config: ProtocolConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            space: SeqSpace::new(config.seq_space),
            base: 0,
            next_seqnum: 0,
            count: 0,
            slots: vec![SendSlot::default(); config.seq_space as usize],
            timer: RetransmitTimer::default(),
            stats: SenderStats::default(),
        })
    }

    pub fn base(&self) -> u16 {
        self.base
    }

    pub fn next_seqnum(&self) -> u16 {
        self.next_seqnum
    }

    /// Number of packets currently awaiting acknowledgment.
    pub fn outstanding(&self) -> u16 {
        self.count
    }

    pub fn stats(&self) -> SenderStats {
        self.stats
    }

    pub fn timer(&self) -> RetransmitTimer {
        self.timer
    }

    fn slide_window(&mut self) {
        while self.slots[self.base as usize].acked {
            let slot = &mut self.slots[self.base as usize];
            slot.acked = false;
            slot.packet = None;
            slot.due_tick = 0;
            self.base = self.space.advance(self.base);
            self.count -= 1;
        }
    }
}

impl TransportProtocol for SrSender {
    fn init(&mut self, _ctx: &mut dyn SystemContext) {
        self.base = 0;
        self.next_seqnum = 0;
        self.count = 0;
        self.slots.fill(SendSlot::default());
        self.timer = RetransmitTimer::default();
        self.stats = SenderStats::default();
    }

    fn on_app_data(&mut self, ctx: &mut dyn SystemContext, data: &[u8]) {
        if self.count == self.config.window_size {
            self.stats.window_full += 1;
            ctx.log("send window full, dropping application message");
            return;
        }

        let seq = self.next_seqnum;
        let packet = checksum::seal(seq, None, Packet::pad_payload(data));

        let slot = &mut self.slots[seq as usize];
        slot.packet = Some(packet.clone());
        slot.acked = false;
        slot.due_tick = ctx.now() + self.config.timeout_ticks;

        ctx.log(&format!("sending packet {seq}"));
        ctx.send_packet(packet);

        self.count += 1;
        self.next_seqnum = self.space.advance(seq);
        self.timer.ensure_armed(ctx, self.config.timeout_ticks);
        ctx.record_metric("outstanding", self.count as f64);
    }

    fn on_packet(&mut self, ctx: &mut dyn SystemContext, packet: Packet) {
        if checksum::is_corrupted(&packet) {
            ctx.log("corrupted ACK received, ignoring");
            return;
        }
        // This side of the link only ever sees acknowledgments.
        let Some(acknum) = packet.acknum else {
            return;
        };
        self.stats.total_acks += 1;

        let slot = &mut self.slots[acknum as usize];
        if slot.acked || slot.packet.is_none() {
            self.stats.duplicate_acks += 1;
            ctx.log(&format!("duplicate ACK {acknum}, ignoring"));
            return;
        }

        slot.acked = true;
        self.stats.new_acks += 1;
        ctx.log(&format!("new ACK {acknum}"));

        self.slide_window();
        debug!(base = self.base, outstanding = self.count, "window slid");

        // The earliest outstanding packet may have changed, so the running
        // timer's deadline is stale either way.
        if self.count > 0 {
            self.timer.rearm(ctx, self.config.timeout_ticks);
        } else {
            self.timer.disarm(ctx);
        }
        ctx.record_metric("outstanding", self.count as f64);
    }

    fn on_timer(&mut self, ctx: &mut dyn SystemContext, timer_id: u32) {
        if timer_id != RETRANSMIT_TIMER {
            return;
        }
        self.timer.fired();
        ctx.log("timeout, resending outstanding packets");

        let mut any_outstanding = false;
        for i in 0..self.count {
            let seq = self.space.offset(self.base, i);
            let slot = &mut self.slots[seq as usize];
            if slot.acked {
                continue;
            }
            if let Some(packet) = slot.packet.clone() {
                slot.due_tick = ctx.now() + self.config.timeout_ticks;
                ctx.log(&format!("resending packet {seq}"));
                ctx.send_packet(packet);
                self.stats.retransmissions += 1;
                any_outstanding = true;
            }
        }

        if any_outstanding {
            self.timer.ensure_armed(ctx, self.config.timeout_ticks);
        }
    }
}
