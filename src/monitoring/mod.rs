//! Observability state behind the system services.
//!
//! The error hub, the watchdog table and the global runtime metrics are
//! the shared mutable state the system-service agents fold messages into,
//! and the surfaces drivers query for health and diagnostics.

pub mod error_hub;
pub mod metrics;
pub mod types;
pub mod watchdog;

pub use error_hub::{EmergencyHandler, ErrorHub};
pub use metrics::{MetricsSnapshot, RuntimeMetrics};
pub use types::{ErrorKind, ErrorRecord, Severity, SystemHealth};
pub use watchdog::WatchdogTable;
