// Layer 1: Standard library imports
use std::fmt::Debug;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::host::{HostPlatform, ManualClock};

/// Platform interface consumed by the runtime.
///
/// Covers the pieces that genuinely differ per target: the monotonic tick
/// source, tick/millisecond conversion, and the emergency stop entry used
/// when a critical error is reported. Synchronization primitives are not
/// part of this trait; the runtime locks with `parking_lot` on every
/// target it supports.
///
/// # Tick semantics
///
/// Ticks are a `u32` counter at 1 kHz nominal rate. Wrap-around (~49 days)
/// is tolerated for short durations: all comparisons in the runtime use
/// wrapping arithmetic.
///
/// # Example
/// ```rust
/// use agentsys_rt::platform::{manual_clock, Platform};
///
/// let clock = manual_clock();
/// clock.advance(250);
/// assert_eq!(clock.monotonic_ticks(), 250);
/// ```
pub trait Platform: Send + Sync + Debug {
    /// Current monotonic tick count.
    fn monotonic_ticks(&self) -> u32;

    /// Convert a tick count to milliseconds (identity at 1 kHz).
    fn ticks_to_ms(&self, ticks: u32) -> u32 {
        ticks
    }

    /// Convert milliseconds to a tick count (identity at 1 kHz).
    fn ms_to_ticks(&self, ms: u32) -> u32 {
        ms
    }

    /// Emergency critical-section entry.
    ///
    /// Invoked when a critical error reaches the error hub. Embedded
    /// implementations are expected to disable interrupts and halt; the
    /// host implementation latches a flag so simulators stay debuggable.
    fn emergency_stop(&self);
}

/// Shared handle to an injected platform.
pub type SharedPlatform = Arc<dyn Platform>;

/// Create the host platform (std `Instant`-backed tick source).
pub fn host_platform() -> Arc<HostPlatform> {
    Arc::new(HostPlatform::new())
}

/// Create a manually advanced clock for tests and simulations.
pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::default())
}
