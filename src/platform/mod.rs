//! Platform abstraction: monotonic ticks and the emergency stop primitive.
//!
//! The runtime never reads wall-clock time on the hot path; everything is
//! expressed in platform ticks (1 kHz nominal). Implementations are injected
//! at environment construction, which keeps the core testable with a
//! manually advanced clock.

pub mod host;
pub mod traits;

pub use host::{HostPlatform, ManualClock};
pub use traits::{host_platform, manual_clock, Platform, SharedPlatform};
