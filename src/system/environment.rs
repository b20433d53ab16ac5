// Layer 1: Standard library imports
use std::any::Any;
use std::sync::Arc;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::errors::SystemError;
use super::router::Router;
use super::services::{
    ErrorReporterAgent, MetricsCollectorAgent, WatchdogAgent, METRICS_COLLECTOR_ID,
    SERVICE_AGENT_COUNT,
};
use crate::agent::{Agent, AgentContext, StateMachine, TimerTable};
use crate::config::{RuntimeConfig, MAX_AGENTS, MAX_MESSAGE_SIZE, MAX_TIMERS};
use crate::mailbox::Mailbox;
use crate::message::{
    MessageView, MetricsDigest, Payload, PerformanceMetric, RegistryError, TimerFired,
    TypeIdRegistry,
};
use crate::monitoring::{
    ErrorHub, ErrorKind, RuntimeMetrics, Severity, SystemHealth, WatchdogTable,
};
use crate::platform::{host_platform, SharedPlatform};
use crate::util::{AgentId, StateId};

/// Default message batch for [`Environment::process_agent_messages`].
pub const DEFAULT_MESSAGE_BATCH: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Running,
    Stopped,
}

struct AgentSlot {
    id: AgentId,
    agent: Box<dyn Agent>,
    mailbox: Arc<Mailbox>,
    fsm: StateMachine,
    timers: TimerTable,
}

/// Registry and dispatcher of all agents.
///
/// One environment value owns every registered agent and its mailbox and
/// drives dispatch from the caller's loop; there is no internal task. The
/// cloneable [`Router`] is the capability other tasks hold to send into
/// the system concurrently with dispatch.
///
/// Construction registers the three system-service agents (error
/// reporter, metrics collector, watchdog) before any user agent, so the
/// error channel, metrics folding and liveness tracking are live from the
/// first user registration on.
///
/// # Example
/// ```rust
/// use agentsys_rt::agent::{Agent, AgentContext};
/// use agentsys_rt::message::{MessageView, Payload};
/// use agentsys_rt::system::Environment;
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct Ping { seq: u32 }
/// impl Payload for Ping { const NAME: &'static str = "demo::Ping"; }
///
/// struct Echo { received: u32 }
/// impl Agent for Echo {
///     fn handle_message(&mut self, _ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
///         if let Some(ping) = msg.payload::<Ping>() {
///             self.received = ping.seq;
///             return true;
///         }
///         false
///     }
/// }
///
/// let mut env = Environment::with_defaults().unwrap();
/// let echo = env.register_agent(Box::new(Echo { received: 0 })).unwrap();
///
/// assert!(env.send_message(echo, echo, &Ping { seq: 9 }));
/// env.process_all_messages();
///
/// assert_eq!(env.agent_as::<Echo>(echo).unwrap().received, 9);
/// ```
pub struct Environment {
    config: RuntimeConfig,
    platform: SharedPlatform,
    metrics: Arc<RuntimeMetrics>,
    hub: ErrorHub,
    watchdog: WatchdogTable,
    router: Router,
    types: TypeIdRegistry,
    slots: Vec<AgentSlot>,
    cursor: usize,
    state: LifecycleState,
}

impl Environment {
    /// Create an environment on `platform` and register the system
    /// services.
    pub fn new(config: RuntimeConfig, platform: SharedPlatform) -> Result<Self, SystemError> {
        config
            .validate()
            .map_err(|reason| SystemError::InvalidConfig { reason })?;

        let metrics = Arc::new(RuntimeMetrics::new());
        let hub = ErrorHub::new(config.error_log_capacity);
        let watchdog = WatchdogTable::new();

        // Default emergency path: hand critical records to the platform.
        let emergency_platform = Arc::clone(&platform);
        hub.set_emergency_handler(move |_| emergency_platform.emergency_stop());

        let router = Router::new(
            Arc::clone(&metrics),
            hub.clone(),
            watchdog.clone(),
            Arc::clone(&platform),
        );

        let default_watchdog_ticks = platform.ms_to_ticks(config.default_watchdog_timeout_ms);

        let mut env = Self {
            config,
            platform,
            metrics: Arc::clone(&metrics),
            hub: hub.clone(),
            watchdog: watchdog.clone(),
            router,
            types: TypeIdRegistry::new(),
            slots: Vec::with_capacity(MAX_AGENTS),
            cursor: 0,
            state: LifecycleState::Running,
        };

        env.register_agent(Box::new(ErrorReporterAgent::new(hub)))?;
        env.register_agent(Box::new(MetricsCollectorAgent::new(metrics)))?;
        env.register_agent(Box::new(WatchdogAgent::new(watchdog, default_watchdog_ticks)))?;
        debug_assert_eq!(env.slots.len(), SERVICE_AGENT_COUNT);

        Ok(env)
    }

    /// Create an environment with default configuration on the host
    /// platform.
    pub fn with_defaults() -> Result<Self, SystemError> {
        Self::new(RuntimeConfig::default(), host_platform())
    }

    // --- registration and lookup ----------------------------------------

    /// Register an agent, assigning the next free id.
    ///
    /// Runs the agent's `setup` hook and enters its initial state. At
    /// capacity the failure is reported as `AgentTableFull` and returned.
    pub fn register_agent(&mut self, mut agent: Box<dyn Agent>) -> Result<AgentId, SystemError> {
        if self.state == LifecycleState::Stopped {
            return Err(SystemError::Stopped);
        }
        if self.slots.len() == MAX_AGENTS {
            self.router.report_direct(
                Severity::Warning,
                ErrorKind::AgentTableFull,
                AgentId::INVALID,
            );
            return Err(SystemError::AgentTableFull {
                capacity: MAX_AGENTS,
            });
        }

        let id = AgentId::new(self.slots.len() as u16);
        let tolerance = self.platform.ms_to_ticks(self.config.stale_tolerance_ms);
        let mailbox = Arc::new(Mailbox::new(
            id,
            Arc::clone(&self.platform),
            Arc::clone(&self.metrics),
            self.hub.clone(),
            tolerance,
        ));
        self.router.bind(id, Arc::clone(&mailbox));

        let mut fsm = StateMachine::new();
        let mut timers = TimerTable::new();
        {
            let mut ctx = AgentContext::new(id, &mut fsm, &mut timers, &self.router);
            agent.setup(&mut ctx);
        }
        fsm.start();

        self.slots.push(AgentSlot {
            id,
            agent,
            mailbox,
            fsm,
            timers,
        });
        Ok(id)
    }

    /// Number of registered agents, system services included.
    pub fn agent_count(&self) -> usize {
        self.slots.len()
    }

    /// Look up a registered agent.
    pub fn agent(&self, id: AgentId) -> Option<&dyn Agent> {
        self.slots.get(id.index()).map(|slot| slot.agent.as_ref())
    }

    /// Look up a registered agent as its concrete type.
    pub fn agent_as<A: Agent>(&self, id: AgentId) -> Option<&A> {
        let agent: &dyn Any = self.agent(id)?;
        agent.downcast_ref::<A>()
    }

    /// Messages currently queued across all mailboxes.
    pub fn total_pending_messages(&self) -> usize {
        self.router.total_pending()
    }

    /// The state a registered agent is currently in.
    pub fn agent_state(&self, id: AgentId) -> Option<StateId> {
        self.slots
            .get(id.index())
            .map(|slot| slot.fsm.current_state())
    }

    /// The state a registered agent was in before its last transition.
    pub fn agent_previous_state(&self, id: AgentId) -> Option<StateId> {
        self.slots
            .get(id.index())
            .map(|slot| slot.fsm.previous_state())
    }

    /// Whether a registered agent is currently in `state`.
    pub fn agent_in_state(&self, id: AgentId, state: StateId) -> bool {
        self.agent_state(id) == Some(state)
    }

    // --- sending --------------------------------------------------------

    /// Send `payload` from `sender` to `target`; see [`Router::send`].
    pub fn send_message<T: Payload>(&self, sender: AgentId, target: AgentId, payload: &T) -> bool {
        if self.state == LifecycleState::Stopped {
            return false;
        }
        self.router.send(sender, target, payload)
    }

    /// Broadcast `payload` to every agent except `sender`; see
    /// [`Router::broadcast`].
    pub fn broadcast_message<T: Payload>(&self, sender: AgentId, payload: &T) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        self.router.broadcast(sender, payload);
    }

    /// Enrol `agent` with the watchdog under `timeout_ms`.
    pub fn register_for_monitoring(&self, agent: AgentId, timeout_ms: u32) -> bool {
        self.router.enroll_watchdog(agent, timeout_ms)
    }

    /// Register payload type `T` in the runtime collision registry.
    ///
    /// A fingerprint clash with a previously registered distinct type is
    /// reported as `TypeIdCollision` (not fatal; both types stay usable)
    /// and returned to the caller.
    pub fn register_message_type<T: Payload>(&self) -> Result<(), RegistryError> {
        match self.types.register::<T>() {
            Ok(()) => Ok(()),
            Err(err) => {
                if matches!(err, RegistryError::Collision { .. }) {
                    self.router.report_direct(
                        Severity::Warning,
                        ErrorKind::TypeIdCollision,
                        AgentId::INVALID,
                    );
                }
                Err(err)
            }
        }
    }

    /// The runtime type collision registry.
    pub fn type_registry(&self) -> &TypeIdRegistry {
        &self.types
    }

    // --- dispatch -------------------------------------------------------

    /// Dispatch one message from the next non-empty mailbox, scanning
    /// round-robin from the slot after the last dispatched.
    ///
    /// Returns `true` iff one message was dispatched. A corrupted entry
    /// is discarded (and reported by the mailbox) without stopping the
    /// scan.
    pub fn process_one_message(&mut self) -> bool {
        if self.state == LifecycleState::Stopped || self.slots.is_empty() {
            return false;
        }

        let slot_count = self.slots.len();
        let mut scratch = [0u8; MAX_MESSAGE_SIZE];
        for offset in 0..slot_count {
            let idx = (self.cursor + 1 + offset) % slot_count;
            let Some(len) = self.slots[idx].mailbox.pop(&mut scratch) else {
                continue;
            };
            self.cursor = idx;
            self.dispatch(idx, &scratch[..len]);
            self.metrics.record_processed();
            return true;
        }
        false
    }

    /// Dispatch until every mailbox is empty, bounded by the configured
    /// per-cycle quota.
    pub fn process_all_messages(&mut self) {
        let quota = self.config.dispatch_quota;
        let mut dispatched = 0;
        while dispatched < quota && self.process_one_message() {
            dispatched += 1;
        }
    }

    /// Drain up to `max_batch` messages from one agent's mailbox.
    ///
    /// Measures elapsed ticks and, when at least one message was
    /// dispatched, emits a `PerformanceMetric` for the batch. Emits one
    /// heartbeat from the agent per call.
    pub fn process_agent_messages(&mut self, id: AgentId, max_batch: usize) -> usize {
        if self.state == LifecycleState::Stopped || id.index() >= self.slots.len() {
            return 0;
        }

        let started = self.platform.monotonic_ticks();
        let mut scratch = [0u8; MAX_MESSAGE_SIZE];
        let mut processed = 0;
        while processed < max_batch {
            let Some(len) = self.slots[id.index()].mailbox.pop(&mut scratch) else {
                break;
            };
            self.dispatch(id.index(), &scratch[..len]);
            self.metrics.record_processed();
            processed += 1;
        }

        if processed > 0 {
            let elapsed_ticks = self.platform.monotonic_ticks().wrapping_sub(started);
            let elapsed_us = self
                .platform
                .ticks_to_ms(elapsed_ticks)
                .saturating_mul(1_000);
            self.router.send(
                id,
                METRICS_COLLECTOR_ID,
                &PerformanceMetric::new(id, elapsed_us, processed as u32),
            );
        }
        self.router.heartbeat(id);
        processed
    }

    fn dispatch(&mut self, idx: usize, bytes: &[u8]) {
        let router = &self.router;
        let slot = &mut self.slots[idx];

        let Some(view) = MessageView::parse(bytes) else {
            router.report_direct(Severity::Warning, ErrorKind::CorruptedMessage, slot.id);
            return;
        };

        let mut ctx = AgentContext::new(slot.id, &mut slot.fsm, &mut slot.timers, router);
        let _ = slot.agent.handle_message(&mut ctx, &view);
    }

    // --- periodic driving -----------------------------------------------

    /// Drive watchdog expiry and timer delivery. Call from the driver
    /// loop at roughly tick resolution.
    pub fn tick(&mut self) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        let now = self.platform.monotonic_ticks();

        for starved in self.watchdog.expired(now) {
            self.router
                .report_from(starved, Severity::Warning, ErrorKind::WatchdogExpired);
        }

        let router = &self.router;
        for slot in self.slots.iter_mut() {
            let mut fired = [0u32; MAX_TIMERS];
            let count = slot.timers.collect_expired(now, &mut fired);
            for &timer_id in &fired[..count] {
                router.send(slot.id, slot.id, &TimerFired { timer_id });
            }
        }
    }

    /// Broadcast a digest of the global counters to every agent.
    pub fn publish_metrics_digest(&self) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        let digest = MetricsDigest {
            messages_sent: self.metrics.messages_sent(),
            messages_processed: self.metrics.messages_processed(),
            max_queue_depth: self.metrics.max_queue_depth(),
            max_processing_time_us: self.metrics.max_processing_time_us(),
        };
        self.router.broadcast(METRICS_COLLECTOR_ID, &digest);
    }

    // --- lifecycle and observability ------------------------------------

    /// Clear every mailbox, drop every agent and stop the environment.
    /// Subsequent operations fail with [`SystemError::Stopped`] semantics.
    pub fn shutdown(&mut self) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        for slot in &self.slots {
            slot.mailbox.clear();
        }
        self.slots.clear();
        self.router.unbind_all();
        self.state = LifecycleState::Stopped;
    }

    /// Whether the environment accepts registrations and traffic.
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// A cloneable send capability into this environment.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// The global runtime counters.
    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    /// The error channel.
    pub fn error_log(&self) -> &ErrorHub {
        &self.hub
    }

    /// The watchdog liveness table.
    pub fn watchdog(&self) -> &WatchdogTable {
        &self.watchdog
    }

    /// Health derived from the recent error window.
    pub fn health(&self) -> SystemHealth {
        self.hub.health()
    }

    /// The active configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// The injected platform.
    pub fn platform(&self) -> &SharedPlatform {
        &self.platform
    }
}
