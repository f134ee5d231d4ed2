//! Status LED blink logic.
//!
//! The blink interval is derived from the current [`LinkState`]; a
//! host-asserted caps-lock indicator overrides the cadence and holds
//! the output on. Toggles advance the deadline by exactly one interval
//! rather than by elapsed wall-clock time, so late polling never
//! accumulates drift.

use crate::link::LinkState;

/// Drift-free blinker over a logical output level.
///
/// Pure logic: callers feed it a millisecond clock and apply the
/// returned level changes to the actual pin.
#[derive(Debug)]
pub struct Blinker {
    link: LinkState,
    lock_active: bool,
    level_on: bool,
    next_toggle_ms: u64,
}

impl Blinker {
    pub fn new(now_ms: u64) -> Self {
        let link = LinkState::NotMounted;
        Self {
            link,
            lock_active: false,
            level_on: false,
            next_toggle_ms: now_ms + link.blink_interval_ms(),
        }
    }

    /// Track a link state change; re-arms the cadence when the blink
    /// interval changes. No-op while the interval is unchanged.
    pub fn set_link_state(&mut self, link: LinkState, now_ms: u64) {
        let interval_changed = self.link.blink_interval_ms() != link.blink_interval_ms();
        self.link = link;
        if interval_changed && !self.lock_active {
            self.next_toggle_ms = now_ms + link.blink_interval_ms();
        }
    }

    /// Apply the host's lock indicator. While active the blink is
    /// disabled and the output is held on; clearing it drives the
    /// output off and restarts the cadence for the current link state.
    ///
    /// Returns the level to drive immediately.
    pub fn set_lock_indicator(&mut self, active: bool, now_ms: u64) -> bool {
        self.lock_active = active;
        if active {
            self.level_on = true;
        } else {
            self.level_on = false;
            self.next_toggle_ms = now_ms + self.link.blink_interval_ms();
        }
        self.level_on
    }

    /// One poll. Returns the new level when the output should toggle.
    ///
    /// At most one toggle per call: after a long gap the deadline still
    /// advances one interval at a time, so cadence is preserved without
    /// a burst of pin writes.
    pub fn poll(&mut self, now_ms: u64) -> Option<bool> {
        if self.lock_active {
            return None;
        }
        if now_ms < self.next_toggle_ms {
            return None;
        }
        self.next_toggle_ms += self.link.blink_interval_ms();
        self.level_on = !self.level_on;
        Some(self.level_on)
    }

    /// Effective blink interval; `None` while the lock override holds
    /// the output on.
    pub fn interval_ms(&self) -> Option<u64> {
        if self.lock_active {
            None
        } else {
            Some(self.link.blink_interval_ms())
        }
    }
}
