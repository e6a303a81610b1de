use sr_lab_abstract::SystemContext;

/// Timer id used for the single retransmission timer each entity owns.
pub const RETRANSMIT_TIMER: u32 = 0;

/// One retransmission timer per entity, multiplexed across the whole
/// outstanding window. The state machine guarantees that every transition
/// resolves to at most one `start_timer`/`cancel_timer` call, so
/// start-while-running and stop-while-idle cannot happen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetransmitTimer {
    #[default]
    Idle,
    Armed {
        deadline: u64,
    },
}

impl RetransmitTimer {
    pub fn is_armed(&self) -> bool {
        matches!(self, RetransmitTimer::Armed { .. })
    }

    pub fn deadline(&self) -> Option<u64> {
        match self {
            RetransmitTimer::Armed { deadline } => Some(*deadline),
            RetransmitTimer::Idle => None,
        }
    }

    /// Arm the timer if it is idle; no-op when already armed.
    pub fn ensure_armed(&mut self, ctx: &mut dyn SystemContext, delay_ticks: u64) {
        if let RetransmitTimer::Idle = self {
            ctx.start_timer(delay_ticks, RETRANSMIT_TIMER);
            *self = RetransmitTimer::Armed {
                deadline: ctx.now() + delay_ticks,
            };
        }
    }

    /// Cancel a running timer and arm it afresh.
    pub fn rearm(&mut self, ctx: &mut dyn SystemContext, delay_ticks: u64) {
        self.disarm(ctx);
        self.ensure_armed(ctx, delay_ticks);
    }

    /// Cancel the timer if it is running; no-op when idle.
    pub fn disarm(&mut self, ctx: &mut dyn SystemContext) {
        if self.is_armed() {
            ctx.cancel_timer(RETRANSMIT_TIMER);
            *self = RetransmitTimer::Idle;
        }
    }

    /// Record that the armed duration elapsed. The underlying timer is gone,
    /// so this transitions to idle without a `cancel_timer` call.
    pub fn fired(&mut self) {
        *self = RetransmitTimer::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MockContext;

    #[test]
    fn arm_is_idempotent_while_armed() {
        let mut ctx = MockContext::default();
        let mut timer = RetransmitTimer::default();

        timer.ensure_armed(&mut ctx, 24);
        timer.ensure_armed(&mut ctx, 24);
        assert_eq!(ctx.timers_started.len(), 1);
        assert!(timer.is_armed());
        assert_eq!(timer.deadline(), Some(24));
    }

    #[test]
    fn rearm_cancels_then_starts() {
        let mut ctx = MockContext::default();
        let mut timer = RetransmitTimer::default();

        timer.ensure_armed(&mut ctx, 24);
        timer.rearm(&mut ctx, 24);
        assert_eq!(ctx.timers_started.len(), 2);
        assert_eq!(ctx.timers_cancelled.len(), 1);
    }

    #[test]
    fn disarm_when_idle_is_a_no_op() {
        let mut ctx = MockContext::default();
        let mut timer = RetransmitTimer::default();

        timer.disarm(&mut ctx);
        assert!(ctx.timers_cancelled.is_empty());
    }

    #[test]
    fn fired_returns_to_idle_without_cancel() {
        let mut ctx = MockContext::default();
        let mut timer = RetransmitTimer::default();

        timer.ensure_armed(&mut ctx, 24);
        timer.fired();
        assert!(!timer.is_armed());
        assert!(ctx.timers_cancelled.is_empty());
    }
}
