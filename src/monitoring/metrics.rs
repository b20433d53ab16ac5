// Layer 1: Standard library imports
use std::sync::atomic::{AtomicU32, Ordering};

// Layer 2: Third-party crate imports
use chrono::{DateTime, Utc};
use serde::Serialize;

// Layer 3: Internal module imports
// (none)

/// Global runtime counters, updated directly by the mailbox and the
/// dispatcher rather than through the message bus.
///
/// All counters are lock-free atomics; the high-water marks use
/// `fetch_max`, so every counter is monotonically non-decreasing between
/// resets.
#[derive(Debug, Default)]
pub struct RuntimeMetrics {
    messages_sent: AtomicU32,
    messages_processed: AtomicU32,
    max_queue_depth: AtomicU32,
    max_processing_time_us: AtomicU32,
}

impl RuntimeMetrics {
    /// Create zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one successful enqueue.
    pub fn record_sent(&self) {
        self.messages_sent.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one dispatched message.
    pub fn record_processed(&self) {
        self.messages_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Raise the queue depth high-water mark to `depth` if higher.
    pub fn note_queue_depth(&self, depth: usize) {
        self.max_queue_depth
            .fetch_max(depth as u32, Ordering::Relaxed);
    }

    /// Raise the processing time high-water mark to `elapsed_us` if
    /// higher.
    pub fn note_processing_time(&self, elapsed_us: u32) {
        self.max_processing_time_us
            .fetch_max(elapsed_us, Ordering::Relaxed);
    }

    /// Cumulative successful enqueues.
    pub fn messages_sent(&self) -> u32 {
        self.messages_sent.load(Ordering::Relaxed)
    }

    /// Cumulative dispatched messages.
    pub fn messages_processed(&self) -> u32 {
        self.messages_processed.load(Ordering::Relaxed)
    }

    /// Highest observed mailbox depth.
    pub fn max_queue_depth(&self) -> u32 {
        self.max_queue_depth.load(Ordering::Relaxed)
    }

    /// Longest observed batch processing time in microseconds.
    pub fn max_processing_time_us(&self) -> u32 {
        self.max_processing_time_us.load(Ordering::Relaxed)
    }

    /// Total message traffic (cumulative successful enqueues).
    pub fn total_messages(&self) -> u32 {
        self.messages_sent()
    }

    /// Zero every counter.
    pub fn reset(&self) {
        self.messages_sent.store(0, Ordering::Relaxed);
        self.messages_processed.store(0, Ordering::Relaxed);
        self.max_queue_depth.store(0, Ordering::Relaxed);
        self.max_processing_time_us.store(0, Ordering::Relaxed);
    }

    /// Capture a point-in-time snapshot for host-side diagnostics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            captured_at: Utc::now(),
            messages_sent: self.messages_sent(),
            messages_processed: self.messages_processed(),
            max_queue_depth: self.max_queue_depth(),
            max_processing_time_us: self.max_processing_time_us(),
            total_messages: self.total_messages(),
        }
    }
}

/// Point-in-time copy of the runtime counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Wall-clock capture time (host diagnostics only).
    pub captured_at: DateTime<Utc>,
    /// Cumulative successful enqueues.
    pub messages_sent: u32,
    /// Cumulative dispatched messages.
    pub messages_processed: u32,
    /// Highest observed mailbox depth.
    pub max_queue_depth: u32,
    /// Longest observed batch processing time in microseconds.
    pub max_processing_time_us: u32,
    /// Total message traffic.
    pub total_messages: u32,
}

impl MetricsSnapshot {
    /// Serialize the snapshot as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
