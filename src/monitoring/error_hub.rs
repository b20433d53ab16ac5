// Layer 1: Standard library imports
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::{Mutex, RwLock};

// Layer 3: Internal module imports
use super::types::{ErrorKind, ErrorRecord, Severity, SystemHealth};

/// Callback invoked when a critical record reaches the hub.
pub type EmergencyHandler = Box<dyn Fn(&ErrorRecord) + Send + Sync>;

/// Bounded error record ring with health derivation.
///
/// The hub is the error channel every failure converges into: the error
/// reporter agent folds `ErrorReport` messages into it, and bus-level
/// failures (which cannot travel over the bus they just broke) are written
/// directly. Reporting never allocates after construction; the newest
/// record overwrites the oldest once the ring is full.
///
/// Cheap to clone (`Arc` inner); every clone observes the same state.
///
/// # Example
/// ```rust
/// use agentsys_rt::monitoring::{ErrorHub, ErrorKind, ErrorRecord, Severity, SystemHealth};
/// use agentsys_rt::util::AgentId;
///
/// let hub = ErrorHub::new(8);
/// assert_eq!(hub.health(), SystemHealth::Healthy);
///
/// hub.report(ErrorRecord {
///     level: Severity::Warning,
///     kind: ErrorKind::QueueOverflow,
///     source: AgentId::new(1),
///     timestamp: 0,
/// });
/// assert_eq!(hub.health(), SystemHealth::Warning);
/// assert_eq!(hub.error_count(), 1);
/// ```
pub struct ErrorHub {
    inner: Arc<ErrorHubInner>,
}

struct ErrorHubInner {
    capacity: usize,
    records: Mutex<VecDeque<ErrorRecord>>,
    last: Mutex<Option<ErrorRecord>>,
    error_count: AtomicU32,
    emergency: RwLock<Option<EmergencyHandler>>,
}

impl ErrorHub {
    /// Create a hub with a ring of `capacity` records.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Arc::new(ErrorHubInner {
                capacity,
                records: Mutex::new(VecDeque::with_capacity(capacity)),
                last: Mutex::new(None),
                error_count: AtomicU32::new(0),
                emergency: RwLock::new(None),
            }),
        }
    }

    /// Record a failure. Critical records additionally invoke the
    /// emergency handler.
    pub fn report(&self, record: ErrorRecord) {
        self.inner.error_count.fetch_add(1, Ordering::Relaxed);
        *self.inner.last.lock() = Some(record);

        {
            let mut records = self.inner.records.lock();
            if records.len() == self.inner.capacity {
                records.pop_front();
            }
            records.push_back(record);
        }

        if record.level == Severity::Critical {
            if let Some(handler) = self.inner.emergency.read().as_ref() {
                handler(&record);
            }
        }
    }

    /// Cumulative number of records since the last reset.
    pub fn error_count(&self) -> u32 {
        self.inner.error_count.load(Ordering::Relaxed)
    }

    /// The most recent record.
    pub fn last_error(&self) -> Option<ErrorRecord> {
        *self.inner.last.lock()
    }

    /// Kind of the most recent record.
    pub fn last_kind(&self) -> Option<ErrorKind> {
        self.last_error().map(|record| record.kind)
    }

    /// Copy of the retained record window, oldest first.
    pub fn recent(&self) -> Vec<ErrorRecord> {
        self.inner.records.lock().iter().copied().collect()
    }

    /// Health derived over the retained window: critical beats warning
    /// beats healthy; info records have no effect.
    pub fn health(&self) -> SystemHealth {
        let records = self.inner.records.lock();
        let mut health = SystemHealth::Healthy;
        for record in records.iter() {
            match record.level {
                Severity::Critical => return SystemHealth::Critical,
                Severity::Warning => health = SystemHealth::Warning,
                Severity::Info => {}
            }
        }
        health
    }

    /// Clear the window and counter; health returns to `Healthy`.
    pub fn reset(&self) {
        self.inner.records.lock().clear();
        *self.inner.last.lock() = None;
        self.inner.error_count.store(0, Ordering::Relaxed);
    }

    /// Install the handler invoked on critical records, replacing any
    /// previous one.
    pub fn set_emergency_handler<F>(&self, handler: F)
    where
        F: Fn(&ErrorRecord) + Send + Sync + 'static,
    {
        *self.inner.emergency.write() = Some(Box::new(handler));
    }
}

impl Clone for ErrorHub {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for ErrorHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorHub")
            .field("capacity", &self.inner.capacity)
            .field("error_count", &self.error_count())
            .field("last", &self.last_error())
            .finish()
    }
}
