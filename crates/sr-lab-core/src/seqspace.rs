/// Modular sequence-number arithmetic over `[0, size)`.
///
/// The window-membership test is the primitive everything else leans on; the
/// wraparound branch is where selective-repeat implementations classically go
/// wrong, so it is kept in one place and tested exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeqSpace {
    size: u16,
}

impl SeqSpace {
    pub fn new(size: u16) -> Self {
        debug_assert!(size > 0);
        Self { size }
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn advance(&self, s: u16) -> u16 {
        (s + 1) % self.size
    }

    pub fn retreat(&self, s: u16) -> u16 {
        if s == 0 { self.size - 1 } else { s - 1 }
    }

    /// `(base + n) mod size` without intermediate overflow.
    pub fn offset(&self, base: u16, n: u16) -> u16 {
        ((base as u32 + n as u32) % self.size as u32) as u16
    }

    /// True iff `x` lies in the circular interval `[base, base + window)`.
    pub fn in_window(&self, base: u16, window: u16, x: u16) -> bool {
        let end = self.offset(base, window);
        if base < end {
            // interval does not wrap
            x >= base && x < end
        } else {
            x >= base || x < end
        }
    }
}
