// Layer 1: Standard library imports
use std::fmt;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::RwLock;

// Layer 3: Internal module imports
use super::services::{ERROR_REPORTER_ID, SERVICE_AGENT_COUNT, WATCHDOG_ID};
use crate::config::MAX_AGENTS;
use crate::mailbox::Mailbox;
use crate::message::{ErrorReport, Frame, Heartbeat, Payload};
use crate::monitoring::{ErrorHub, ErrorKind, ErrorRecord, RuntimeMetrics, Severity, WatchdogTable};
use crate::platform::SharedPlatform;
use crate::util::AgentId;

/// Cloneable send capability over the routing table.
///
/// The router is the piece of the environment other tasks may hold: it
/// resolves agent ids to mailboxes and pushes encoded frames, updating
/// the global counters and the error channel as side effects. Cloning is
/// cheap (`Arc` inner); every clone routes through the same table.
///
/// Send paths acquire at most one lock at a time: the routing table read
/// lock is released before the target mailbox mutex is taken.
pub struct Router {
    inner: Arc<RouterInner>,
}

struct RouterInner {
    routes: RwLock<Vec<Option<Arc<Mailbox>>>>,
    metrics: Arc<RuntimeMetrics>,
    hub: ErrorHub,
    watchdog: WatchdogTable,
    platform: SharedPlatform,
}

impl Router {
    pub(crate) fn new(
        metrics: Arc<RuntimeMetrics>,
        hub: ErrorHub,
        watchdog: WatchdogTable,
        platform: SharedPlatform,
    ) -> Self {
        Self {
            inner: Arc::new(RouterInner {
                routes: RwLock::new(vec![None; MAX_AGENTS]),
                metrics,
                hub,
                watchdog,
                platform,
            }),
        }
    }

    /// Bind `id` to its mailbox. Called once per registration.
    pub(crate) fn bind(&self, id: AgentId, mailbox: Arc<Mailbox>) {
        let mut routes = self.inner.routes.write();
        if id.index() < routes.len() {
            routes[id.index()] = Some(mailbox);
        }
    }

    /// Drop every route. Called on shutdown.
    pub(crate) fn unbind_all(&self) {
        let mut routes = self.inner.routes.write();
        for slot in routes.iter_mut() {
            *slot = None;
        }
    }

    fn route(&self, id: AgentId) -> Option<Arc<Mailbox>> {
        let routes = self.inner.routes.read();
        routes.get(id.index())?.as_ref().map(Arc::clone)
    }

    /// Current platform tick count.
    pub fn now(&self) -> u32 {
        self.inner.platform.monotonic_ticks()
    }

    /// Convert milliseconds to platform ticks.
    pub fn ms_to_ticks(&self, ms: u32) -> u32 {
        self.inner.platform.ms_to_ticks(ms)
    }

    /// Send `payload` from `sender` to `target`.
    ///
    /// Returns `false` when the target is unknown, the encoded message is
    /// oversized, or the target mailbox rejects the push; each failure is
    /// reported into the error channel. Increments `messages_sent` on
    /// success.
    pub fn send<T: Payload>(&self, sender: AgentId, target: AgentId, payload: &T) -> bool {
        let Some(mailbox) = self.route(target) else {
            self.report_direct(Severity::Warning, ErrorKind::AgentRegistrationFailed, sender);
            return false;
        };

        let frame = match Frame::encode(sender, self.now(), payload) {
            Ok(frame) => frame,
            Err(_) => {
                self.report_direct(Severity::Warning, ErrorKind::MessageTooLarge, sender);
                return false;
            }
        };

        if mailbox.push(&frame).is_err() {
            // The mailbox already reported the specific failure.
            return false;
        }
        self.inner.metrics.record_sent();
        true
    }

    /// Send `payload` to every registered agent except `sender`.
    ///
    /// System-service agents are not broadcast recipients; they consume
    /// their dedicated unicast streams. Per-recipient failures are
    /// reported individually; there is no aggregate result.
    pub fn broadcast<T: Payload>(&self, sender: AgentId, payload: &T) {
        let frame = match Frame::encode(sender, self.now(), payload) {
            Ok(frame) => frame,
            Err(_) => {
                self.report_direct(Severity::Warning, ErrorKind::MessageTooLarge, sender);
                return;
            }
        };

        // Snapshot the routes so no lock is held across mailbox pushes.
        let recipients: [Option<Arc<Mailbox>>; MAX_AGENTS] = {
            let routes = self.inner.routes.read();
            std::array::from_fn(|idx| match routes.get(idx) {
                Some(Some(mailbox))
                    if idx >= SERVICE_AGENT_COUNT && mailbox.owner() != sender =>
                {
                    Some(Arc::clone(mailbox))
                }
                _ => None,
            })
        };

        for mailbox in recipients.iter().flatten() {
            if mailbox.push(&frame).is_ok() {
                self.inner.metrics.record_sent();
            }
        }
    }

    /// Produce a heartbeat from `source` for the watchdog agent.
    pub fn heartbeat(&self, source: AgentId) -> bool {
        let beat = Heartbeat::new(source, self.now());
        self.send(source, WATCHDOG_ID, &beat)
    }

    /// Report a failure attributed to `source` through the error channel.
    ///
    /// Travels as an `ErrorReport` message to the error reporter agent;
    /// when that send itself fails the record is written directly so it
    /// is never lost.
    pub fn report_from(&self, source: AgentId, level: Severity, kind: ErrorKind) {
        let report = ErrorReport::new(level, kind, source);
        if !self.send(source, ERROR_REPORTER_ID, &report) {
            self.report_direct(level, kind, source);
        }
    }

    /// Write a record straight into the error hub, bypassing the bus.
    ///
    /// For failures of the bus itself and for callers that must not
    /// recurse through it.
    pub(crate) fn report_direct(&self, level: Severity, kind: ErrorKind, source: AgentId) {
        self.inner.hub.report(ErrorRecord {
            level,
            kind,
            source,
            timestamp: self.now(),
        });
    }

    /// Enrol `agent` with the watchdog under `timeout_ms`.
    pub fn enroll_watchdog(&self, agent: AgentId, timeout_ms: u32) -> bool {
        let ticks = self.inner.platform.ms_to_ticks(timeout_ms);
        self.inner.watchdog.enroll(agent, ticks, self.now())
    }

    /// Messages currently queued across all mailboxes.
    pub fn total_pending(&self) -> usize {
        let routes = self.inner.routes.read();
        routes
            .iter()
            .flatten()
            .map(|mailbox| mailbox.len())
            .sum()
    }

    /// Pending messages in one agent's mailbox.
    pub fn pending_for(&self, id: AgentId) -> Option<usize> {
        self.route(id).map(|mailbox| mailbox.len())
    }
}

impl Clone for Router {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("pending", &self.total_pending())
            .finish()
    }
}
