use crate::packet::Packet;

/// The capability the simulator hands to a protocol entity. All effects of a
/// callback (packets out, timer changes, deliveries) go through this trait.
pub trait SystemContext {
    /// Hand a packet to the unreliable channel. It may be lost or corrupted
    /// in transit; survivors arrive in the order they were sent.
    fn send_packet(&mut self, packet: Packet);

    /// Arm a timer that fires after `delay_ticks` unless cancelled first.
    /// `timer_id` is entity-local; an entity must not start an id it already
    /// has running.
    fn start_timer(&mut self, delay_ticks: u64, timer_id: u32);

    /// Cancel a running timer.
    fn cancel_timer(&mut self, timer_id: u32);

    /// Deliver a payload to the application layer above this entity.
    fn deliver_data(&mut self, data: &[u8]);

    /// Log a message through the simulator's trace output.
    fn log(&mut self, message: &str);

    /// Current simulation time in ticks.
    fn now(&self) -> u64;

    /// Record a numeric metric sample (e.g. outstanding window count) for
    /// later inspection. Default is a no-op.
    fn record_metric(&mut self, _name: &str, _value: f64) {}
}

/// A protocol entity driven by the simulator's event loop. Callbacks run to
/// completion one at a time; there is no re-entrancy.
pub trait TransportProtocol {
    /// Called once before any other callback.
    fn init(&mut self, _ctx: &mut dyn SystemContext) {}

    /// Called when a packet arrives from the channel.
    fn on_packet(&mut self, ctx: &mut dyn SystemContext, packet: Packet);

    /// Called when a previously started timer expires.
    fn on_timer(&mut self, ctx: &mut dyn SystemContext, timer_id: u32);

    /// Called when the application layer submits a message for reliable
    /// transfer.
    fn on_app_data(&mut self, ctx: &mut dyn SystemContext, data: &[u8]);
}
