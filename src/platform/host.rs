// Layer 1: Standard library imports
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Instant;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::traits::Platform;

/// Host platform backed by `std::time::Instant`.
///
/// Ticks count milliseconds since construction. `emergency_stop` latches a
/// flag instead of halting the process, so host simulators and tests can
/// observe the emergency and keep running.
#[derive(Debug)]
pub struct HostPlatform {
    epoch: Instant,
    emergency: AtomicBool,
}

impl HostPlatform {
    /// Create a host platform with its tick epoch at "now".
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
            emergency: AtomicBool::new(false),
        }
    }

    /// Whether `emergency_stop` has been invoked.
    pub fn emergency_engaged(&self) -> bool {
        self.emergency.load(Ordering::Acquire)
    }
}

impl Default for HostPlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for HostPlatform {
    fn monotonic_ticks(&self) -> u32 {
        // Truncation is the wrap-around the tick contract tolerates.
        self.epoch.elapsed().as_millis() as u32
    }

    fn emergency_stop(&self) {
        self.emergency.store(true, Ordering::Release);
    }
}

/// Manually advanced tick source for deterministic tests.
///
/// # Example
/// ```rust
/// use agentsys_rt::platform::{ManualClock, Platform};
///
/// let clock = ManualClock::default();
/// assert_eq!(clock.monotonic_ticks(), 0);
/// clock.advance(1_500);
/// assert_eq!(clock.monotonic_ticks(), 1_500);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    ticks: AtomicU32,
    emergency: AtomicBool,
}

impl ManualClock {
    /// Advance the clock by `ticks`.
    pub fn advance(&self, ticks: u32) {
        self.ticks.fetch_add(ticks, Ordering::Release);
    }

    /// Set the clock to an absolute tick value.
    pub fn set(&self, ticks: u32) {
        self.ticks.store(ticks, Ordering::Release);
    }

    /// Whether `emergency_stop` has been invoked.
    pub fn emergency_engaged(&self) -> bool {
        self.emergency.load(Ordering::Acquire)
    }
}

impl Platform for ManualClock {
    fn monotonic_ticks(&self) -> u32 {
        self.ticks.load(Ordering::Acquire)
    }

    fn emergency_stop(&self) {
        self.emergency.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_platform_ticks_monotonic() {
        let platform = HostPlatform::new();
        let a = platform.monotonic_ticks();
        let b = platform.monotonic_ticks();
        assert!(b >= a);
    }

    #[test]
    fn test_host_platform_emergency_latch() {
        let platform = HostPlatform::new();
        assert!(!platform.emergency_engaged());
        platform.emergency_stop();
        assert!(platform.emergency_engaged());
    }

    #[test]
    fn test_manual_clock_advance_and_set() {
        let clock = ManualClock::default();
        clock.advance(100);
        clock.advance(23);
        assert_eq!(clock.monotonic_ticks(), 123);
        clock.set(5);
        assert_eq!(clock.monotonic_ticks(), 5);
    }

    #[test]
    fn test_tick_ms_conversion_is_identity_at_1khz() {
        let clock = ManualClock::default();
        assert_eq!(clock.ticks_to_ms(42), 42);
        assert_eq!(clock.ms_to_ticks(42), 42);
    }
}
