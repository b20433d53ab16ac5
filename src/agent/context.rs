// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::state::{StateAction, StateMachine};
use super::timers::{TimerError, TimerTable};
use crate::message::Payload;
use crate::monitoring::{ErrorKind, Severity};
use crate::system::Router;
use crate::util::{AgentId, StateId};

/// Per-dispatch capability handle passed to an agent's hooks.
///
/// Carries the agent's identity, its state machine and timer table, and
/// the routing capability for sends. Built fresh by the environment for
/// every `setup` and `handle_message` invocation; agents never hold one
/// across calls.
///
/// State and timer failures are reported into the error channel in
/// addition to their return values, so health reflects them even when the
/// caller ignores the result.
pub struct AgentContext<'a> {
    id: AgentId,
    fsm: &'a mut StateMachine,
    timers: &'a mut TimerTable,
    router: &'a Router,
}

impl<'a> AgentContext<'a> {
    pub(crate) fn new(
        id: AgentId,
        fsm: &'a mut StateMachine,
        timers: &'a mut TimerTable,
        router: &'a Router,
    ) -> Self {
        Self {
            id,
            fsm,
            timers,
            router,
        }
    }

    /// This agent's id.
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Current platform tick count.
    pub fn now(&self) -> u32 {
        self.router.now()
    }

    // --- messaging ------------------------------------------------------

    /// Send `payload` to `target`. Returns `false` on any failure; the
    /// failure is also reported into the error channel.
    pub fn send<T: Payload>(&self, target: AgentId, payload: &T) -> bool {
        self.router.send(self.id, target, payload)
    }

    /// Send `payload` to every registered agent except this one.
    /// Per-recipient failures are reported individually.
    pub fn broadcast<T: Payload>(&self, payload: &T) {
        self.router.broadcast(self.id, payload);
    }

    /// Signal liveness to the watchdog.
    pub fn heartbeat(&self) {
        self.router.heartbeat(self.id);
    }

    /// Report a failure attributed to this agent into the error channel.
    pub fn report(&self, level: Severity, kind: ErrorKind) {
        self.router.report_from(self.id, level, kind);
    }

    /// Enrol this agent with the watchdog under `timeout_ms`.
    pub fn enable_watchdog(&self, timeout_ms: u32) -> bool {
        self.router.enroll_watchdog(self.id, timeout_ms)
    }

    // --- state machine --------------------------------------------------

    /// Allocate the next free state. On overflow reports `StateOverflow`
    /// and returns [`StateId::INVALID`].
    pub fn define_state(&mut self, name: &'static str) -> StateId {
        match self.fsm.define_state(name) {
            Ok(state) => state,
            Err(_) => {
                self.report(Severity::Warning, ErrorKind::StateOverflow);
                StateId::INVALID
            }
        }
    }

    /// Register the entry action for `state`; re-registration overwrites.
    /// An undefined state reports `InvalidStateId` and returns `false`.
    pub fn on_state_enter<F>(&mut self, state: StateId, action: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        self.install(state, Box::new(action), true)
    }

    /// Register the exit action for `state`; re-registration overwrites.
    /// An undefined state reports `InvalidStateId` and returns `false`.
    pub fn on_state_exit<F>(&mut self, state: StateId, action: F) -> bool
    where
        F: FnMut() + Send + 'static,
    {
        self.install(state, Box::new(action), false)
    }

    /// Transition to `state` (exit-old, swap, enter-new; no-op when
    /// already there). An undefined target reports `InvalidStateId`,
    /// leaves the machine unchanged and returns `false`.
    pub fn transition_to(&mut self, state: StateId) -> bool {
        match self.fsm.transition_to(state) {
            Ok(()) => true,
            Err(_) => {
                self.report(Severity::Warning, ErrorKind::InvalidStateId);
                false
            }
        }
    }

    /// The state this agent is currently in.
    pub fn current_state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// The state before the last transition.
    pub fn previous_state(&self) -> StateId {
        self.fsm.previous_state()
    }

    /// Whether this agent is currently in `state`.
    pub fn in_state(&self, state: StateId) -> bool {
        self.fsm.in_state(state)
    }

    // --- timers ---------------------------------------------------------

    /// Arm timer `timer_id` to fire a `TimerFired` message after
    /// `period_ms`, repeatedly when `periodic`.
    pub fn start_timer(
        &mut self,
        timer_id: u32,
        period_ms: u32,
        periodic: bool,
    ) -> Result<(), TimerError> {
        let now = self.router.now();
        let ticks = self.router.ms_to_ticks(period_ms);
        self.timers.arm(timer_id, ticks, periodic, now)
    }

    /// Disarm timer `timer_id`. Returns `false` when it was not armed.
    pub fn cancel_timer(&mut self, timer_id: u32) -> bool {
        self.timers.cancel(timer_id)
    }

    fn install(&mut self, state: StateId, action: StateAction, enter: bool) -> bool {
        let result = if enter {
            self.fsm.set_on_enter(state, action)
        } else {
            self.fsm.set_on_exit(state, action)
        };
        match result {
            Ok(()) => true,
            Err(_) => {
                self.report(Severity::Warning, ErrorKind::InvalidStateId);
                false
            }
        }
    }
}
