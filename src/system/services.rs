//! System services, realized as ordinary agents.
//!
//! The error reporter, metrics collector and watchdog are registered
//! before any user agent and consume `ErrorReport`, `PerformanceMetric`
//! and `Heartbeat` messages flowing over the same substrate as user
//! traffic. Their shared state (the error hub, the runtime counters, the
//! watchdog table) stays queryable from outside the bus.

// Layer 1: Standard library imports
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::agent::{Agent, AgentContext};
use crate::message::{ErrorReport, Heartbeat, MessageView, PerformanceMetric};
use crate::monitoring::{ErrorHub, ErrorKind, ErrorRecord, RuntimeMetrics, WatchdogTable};
use crate::util::AgentId;

/// Id of the error reporter agent (first registered).
pub const ERROR_REPORTER_ID: AgentId = AgentId::new(0);

/// Id of the metrics collector agent.
pub const METRICS_COLLECTOR_ID: AgentId = AgentId::new(1);

/// Id of the watchdog agent.
pub const WATCHDOG_ID: AgentId = AgentId::new(2);

/// Number of agent slots taken by system services.
pub const SERVICE_AGENT_COUNT: usize = 3;

/// Folds `ErrorReport` messages into the error hub.
pub(crate) struct ErrorReporterAgent {
    hub: ErrorHub,
}

impl ErrorReporterAgent {
    pub(crate) fn new(hub: ErrorHub) -> Self {
        Self { hub }
    }
}

impl Agent for ErrorReporterAgent {
    fn handle_message(&mut self, _ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        let Some(report) = msg.payload::<ErrorReport>() else {
            return false;
        };
        // An undecodable kind is itself a malformed report.
        let kind = report.error_kind().unwrap_or(ErrorKind::InvalidMessage);
        self.hub.report(ErrorRecord {
            level: report.severity(),
            kind,
            source: report.source,
            timestamp: msg.header().timestamp,
        });
        true
    }
}

/// Folds `PerformanceMetric` messages into the runtime counters.
pub(crate) struct MetricsCollectorAgent {
    metrics: Arc<RuntimeMetrics>,
}

impl MetricsCollectorAgent {
    pub(crate) fn new(metrics: Arc<RuntimeMetrics>) -> Self {
        Self { metrics }
    }
}

impl Agent for MetricsCollectorAgent {
    fn handle_message(&mut self, _ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        let Some(metric) = msg.payload::<PerformanceMetric>() else {
            return false;
        };
        self.metrics.note_processing_time(metric.elapsed_us);
        true
    }
}

/// Maintains the liveness table from `Heartbeat` messages.
pub(crate) struct WatchdogAgent {
    table: WatchdogTable,
    default_timeout_ticks: u32,
}

impl WatchdogAgent {
    pub(crate) fn new(table: WatchdogTable, default_timeout_ticks: u32) -> Self {
        Self {
            table,
            default_timeout_ticks,
        }
    }
}

impl Agent for WatchdogAgent {
    fn handle_message(&mut self, _ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
        let Some(beat) = msg.payload::<Heartbeat>() else {
            return false;
        };
        // First heartbeat from an unenrolled agent enrols it under the
        // default timeout.
        if !self.table.is_monitored(beat.source) {
            self.table
                .enroll(beat.source, self.default_timeout_ticks, beat.timestamp);
        }
        self.table.note_heartbeat(beat.source, beat.timestamp);
        true
    }
}
