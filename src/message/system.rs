//! Payloads of the system services themselves.
//!
//! The error channel, metrics digests, heartbeats and timer expiry all
//! travel through the same mailbox substrate as user messages.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// Layer 3: Internal module imports
use super::traits::Payload;
use crate::assert_unique_type_ids;
use crate::monitoring::{ErrorKind, Severity};
use crate::util::AgentId;

/// Error report consumed by the error reporter agent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct ErrorReport {
    /// Wire form of [`Severity`].
    pub level: u8,
    /// Wire form of [`ErrorKind`].
    pub kind: u8,
    /// Agent the failure is attributed to.
    pub source: AgentId,
}

impl ErrorReport {
    /// Build a report from typed severity and kind.
    pub fn new(level: Severity, kind: ErrorKind, source: AgentId) -> Self {
        Self {
            level: level.raw(),
            kind: kind.raw(),
            source,
        }
    }

    /// Decoded severity.
    pub fn severity(&self) -> Severity {
        Severity::from_raw(self.level)
    }

    /// Decoded kind, `None` for unknown wire values.
    pub fn error_kind(&self) -> Option<ErrorKind> {
        ErrorKind::from_raw(self.kind)
    }
}

impl Payload for ErrorReport {
    const NAME: &'static str = "agentsys_rt::message::system::ErrorReport";
}

/// Liveness signal consumed by the watchdog agent.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct Heartbeat {
    /// Platform tick count when the heartbeat was produced.
    pub timestamp: u32,
    /// The agent signalling liveness.
    pub source: AgentId,
    /// Reserved; always zero.
    pub reserved: u16,
}

impl Heartbeat {
    /// Build a heartbeat for `source` at tick `timestamp`.
    pub fn new(source: AgentId, timestamp: u32) -> Self {
        Self {
            timestamp,
            source,
            reserved: 0,
        }
    }
}

impl Payload for Heartbeat {
    const NAME: &'static str = "agentsys_rt::message::system::Heartbeat";
}

/// Per-batch processing measurement consumed by the metrics collector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct PerformanceMetric {
    /// Wall time spent in the batch, microseconds.
    pub elapsed_us: u32,
    /// Messages dispatched in the batch.
    pub processed: u32,
    /// The agent whose mailbox was drained.
    pub source: AgentId,
    /// Reserved; always zero.
    pub reserved: u16,
}

impl PerformanceMetric {
    /// Build a measurement record.
    pub fn new(source: AgentId, elapsed_us: u32, processed: u32) -> Self {
        Self {
            elapsed_us,
            processed,
            source,
            reserved: 0,
        }
    }
}

impl Payload for PerformanceMetric {
    const NAME: &'static str = "agentsys_rt::message::system::PerformanceMetric";
}

/// Periodic digest of the global counters, broadcast to all agents.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct MetricsDigest {
    /// Cumulative successful enqueues.
    pub messages_sent: u32,
    /// Cumulative dispatched messages.
    pub messages_processed: u32,
    /// High-water mark across all mailboxes.
    pub max_queue_depth: u32,
    /// Longest observed batch processing time, microseconds.
    pub max_processing_time_us: u32,
}

impl Payload for MetricsDigest {
    const NAME: &'static str = "agentsys_rt::message::system::MetricsDigest";
}

/// Delivered to an agent when one of its software timers expires.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
pub struct TimerFired {
    /// Caller-chosen timer identifier.
    pub timer_id: u32,
}

impl Payload for TimerFired {
    const NAME: &'static str = "agentsys_rt::message::system::TimerFired";
}

assert_unique_type_ids!(
    ErrorReport,
    Heartbeat,
    PerformanceMetric,
    MetricsDigest,
    TimerFired,
);
