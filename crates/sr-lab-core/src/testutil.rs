use sr_lab_abstract::{Packet, SystemContext};

/// Records every upcall so engine tests can assert on the exact sequence of
/// effects a callback produced.
#[derive(Default)]
pub struct MockContext {
    pub sent: Vec<Packet>,
    pub timers_started: Vec<(u64, u32)>,
    pub timers_cancelled: Vec<u32>,
    pub delivered: Vec<Vec<u8>>,
    pub logs: Vec<String>,
    pub now: u64,
}

impl MockContext {
    pub fn clear(&mut self) {
        self.sent.clear();
        self.timers_started.clear();
        self.timers_cancelled.clear();
        self.delivered.clear();
        self.logs.clear();
    }
}

impl SystemContext for MockContext {
    fn send_packet(&mut self, packet: Packet) {
        self.sent.push(packet);
    }

    fn start_timer(&mut self, delay_ticks: u64, timer_id: u32) {
        self.timers_started.push((delay_ticks, timer_id));
    }

    fn cancel_timer(&mut self, timer_id: u32) {
        self.timers_cancelled.push(timer_id);
    }

    fn deliver_data(&mut self, data: &[u8]) {
        self.delivered.push(data.to_vec());
    }

    fn log(&mut self, message: &str) {
        self.logs.push(message.to_string());
    }

    fn now(&self) -> u64 {
        self.now
    }
}
