// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::config::MAX_TIMERS;

/// Timer error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TimerError {
    /// Every timer slot is armed.
    #[error("timer table is full (capacity: {capacity})")]
    TableFull {
        /// Timer capacity per agent.
        capacity: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct TimerSlot {
    timer_id: u32,
    deadline: u32,
    period_ticks: u32,
    periodic: bool,
}

/// Fixed table of pending software timers for one agent.
///
/// The environment scans armed timers on [`tick`](crate::system::Environment::tick)
/// and delivers a `TimerFired` message per expiry. Periodic timers re-arm
/// from the scheduled deadline rather than from "now", so their cadence
/// does not drift with tick latency.
#[derive(Debug)]
pub struct TimerTable {
    slots: [Option<TimerSlot>; MAX_TIMERS],
}

impl TimerTable {
    /// Create a table with no armed timers.
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TIMERS],
        }
    }

    /// Arm timer `timer_id` to expire `period_ticks` after `now`.
    ///
    /// Re-arming an already armed `timer_id` replaces its schedule.
    pub fn arm(
        &mut self,
        timer_id: u32,
        period_ticks: u32,
        periodic: bool,
        now: u32,
    ) -> Result<(), TimerError> {
        let slot = TimerSlot {
            timer_id,
            deadline: now.wrapping_add(period_ticks),
            period_ticks,
            periodic,
        };

        if let Some(existing) = self
            .slots
            .iter_mut()
            .flatten()
            .find(|existing| existing.timer_id == timer_id)
        {
            *existing = slot;
            return Ok(());
        }

        match self.slots.iter_mut().find(|s| s.is_none()) {
            Some(free) => {
                *free = Some(slot);
                Ok(())
            }
            None => Err(TimerError::TableFull {
                capacity: MAX_TIMERS,
            }),
        }
    }

    /// Disarm timer `timer_id`. Returns `false` when it was not armed.
    pub fn cancel(&mut self, timer_id: u32) -> bool {
        for slot in self.slots.iter_mut() {
            if matches!(slot, Some(s) if s.timer_id == timer_id) {
                *slot = None;
                return true;
            }
        }
        false
    }

    /// Whether timer `timer_id` is armed.
    pub fn is_armed(&self, timer_id: u32) -> bool {
        self.slots
            .iter()
            .flatten()
            .any(|slot| slot.timer_id == timer_id)
    }

    /// Number of armed timers.
    pub fn armed_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    /// Collect timers due at tick `now` into `out`, returning how many
    /// fired. One-shot timers disarm; periodic timers re-arm.
    pub(crate) fn collect_expired(&mut self, now: u32, out: &mut [u32; MAX_TIMERS]) -> usize {
        let mut fired = 0;
        for slot in self.slots.iter_mut() {
            let Some(entry) = slot else { continue };
            // Wrap-aware: due when the deadline is not in the future.
            if now.wrapping_sub(entry.deadline) as i32 >= 0 {
                out[fired] = entry.timer_id;
                fired += 1;
                if entry.periodic {
                    entry.deadline = entry.deadline.wrapping_add(entry.period_ticks);
                } else {
                    *slot = None;
                }
            }
        }
        fired
    }
}

impl Default for TimerTable {
    fn default() -> Self {
        Self::new()
    }
}
