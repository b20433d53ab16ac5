// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;

// Layer 3: Internal module imports
use crate::config::MAX_AGENTS;
use crate::util::AgentId;

#[derive(Debug, Clone, Copy)]
struct WatchEntry {
    agent: AgentId,
    timeout_ticks: u32,
    last_heartbeat: u32,
}

/// Liveness table mapping monitored agents to heartbeat deadlines.
///
/// Enrolled agents must produce a heartbeat within their timeout or the
/// expiry scan flags them. Detection only; nothing is stopped or
/// restarted. Cheap to clone (`Arc` inner).
///
/// # Example
/// ```rust
/// use agentsys_rt::monitoring::WatchdogTable;
/// use agentsys_rt::util::AgentId;
///
/// let table = WatchdogTable::new();
/// table.enroll(AgentId::new(3), 100, 0);
/// table.note_heartbeat(AgentId::new(3), 50);
///
/// assert!(table.expired(100).is_empty());
/// assert_eq!(table.expired(200), vec![AgentId::new(3)]);
/// ```
#[derive(Debug)]
pub struct WatchdogTable {
    inner: Arc<Mutex<[Option<WatchEntry>; MAX_AGENTS]>>,
}

impl WatchdogTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new([None; MAX_AGENTS])),
        }
    }

    /// Enroll `agent` with `timeout_ticks`; the deadline starts at `now`.
    ///
    /// Re-enrolling updates the timeout and restarts the deadline.
    /// Returns `false` when the table has no free slot.
    pub fn enroll(&self, agent: AgentId, timeout_ticks: u32, now: u32) -> bool {
        let mut entries = self.inner.lock();

        if let Some(slot) = entries
            .iter_mut()
            .flatten()
            .find(|entry| entry.agent == agent)
        {
            slot.timeout_ticks = timeout_ticks;
            slot.last_heartbeat = now;
            return true;
        }

        if let Some(slot) = entries.iter_mut().find(|slot| slot.is_none()) {
            *slot = Some(WatchEntry {
                agent,
                timeout_ticks,
                last_heartbeat: now,
            });
            return true;
        }
        false
    }

    /// Record a heartbeat from `agent` at tick `timestamp`.
    ///
    /// Returns `false` when the agent is not enrolled.
    pub fn note_heartbeat(&self, agent: AgentId, timestamp: u32) -> bool {
        let mut entries = self.inner.lock();
        match entries
            .iter_mut()
            .flatten()
            .find(|entry| entry.agent == agent)
        {
            Some(entry) => {
                entry.last_heartbeat = timestamp;
                true
            }
            None => false,
        }
    }

    /// Agents whose heartbeat deadline has passed at tick `now`
    /// (wrap-aware).
    pub fn expired(&self, now: u32) -> Vec<AgentId> {
        let entries = self.inner.lock();
        entries
            .iter()
            .flatten()
            .filter(|entry| now.wrapping_sub(entry.last_heartbeat) > entry.timeout_ticks)
            .map(|entry| entry.agent)
            .collect()
    }

    /// Whether `agent` is enrolled.
    pub fn is_monitored(&self, agent: AgentId) -> bool {
        self.inner
            .lock()
            .iter()
            .flatten()
            .any(|entry| entry.agent == agent)
    }

    /// Tick of the last heartbeat observed from `agent`.
    pub fn last_heartbeat(&self, agent: AgentId) -> Option<u32> {
        self.inner
            .lock()
            .iter()
            .flatten()
            .find(|entry| entry.agent == agent)
            .map(|entry| entry.last_heartbeat)
    }

    /// Number of enrolled agents.
    pub fn monitored_count(&self) -> usize {
        self.inner.lock().iter().flatten().count()
    }
}

impl Default for WatchdogTable {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for WatchdogTable {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}
