// Layer 1: Standard library imports
use std::fmt;

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
use crate::config::MAX_STATES;
use crate::util::StateId;

/// Nullary action invoked on state entry or exit.
pub type StateAction = Box<dyn FnMut() + Send>;

/// State machine error types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StateError {
    /// Every state slot is taken.
    #[error("state table is full (capacity: {capacity})")]
    Overflow {
        /// State capacity per agent.
        capacity: usize,
    },

    /// The operation named a state that was never defined.
    #[error("undefined state: {0}")]
    InvalidState(StateId),
}

/// Fixed-capacity per-agent state machine.
///
/// States are allocated sequentially by [`StateMachine::define_state`];
/// the machine starts in state `0`. Transitions observe the order
/// exit-of-old, swap, enter-of-new. Actions are plain callbacks and may
/// enqueue messages, which stay queued for later dispatch iterations —
/// transitions never re-enter a handler.
pub struct StateMachine {
    names: [Option<&'static str>; MAX_STATES],
    on_enter: [Option<StateAction>; MAX_STATES],
    on_exit: [Option<StateAction>; MAX_STATES],
    defined: usize,
    current: StateId,
    previous: StateId,
    started: bool,
}

impl StateMachine {
    /// Create a machine with no defined states, positioned at state `0`.
    pub fn new() -> Self {
        Self {
            names: [None; MAX_STATES],
            on_enter: std::array::from_fn(|_| None),
            on_exit: std::array::from_fn(|_| None),
            defined: 0,
            current: StateId::INITIAL,
            previous: StateId::INVALID,
            started: false,
        }
    }

    /// Allocate the next free state slot.
    pub fn define_state(&mut self, name: &'static str) -> Result<StateId, StateError> {
        if self.defined == MAX_STATES {
            return Err(StateError::Overflow {
                capacity: MAX_STATES,
            });
        }
        let id = StateId::new(self.defined as u8);
        self.names[self.defined] = Some(name);
        self.defined += 1;
        Ok(id)
    }

    /// Register the entry action for `state`, replacing any previous one.
    pub fn set_on_enter(&mut self, state: StateId, action: StateAction) -> Result<(), StateError> {
        let idx = self.slot(state)?;
        self.on_enter[idx] = Some(action);
        Ok(())
    }

    /// Register the exit action for `state`, replacing any previous one.
    pub fn set_on_exit(&mut self, state: StateId, action: StateAction) -> Result<(), StateError> {
        let idx = self.slot(state)?;
        self.on_exit[idx] = Some(action);
        Ok(())
    }

    /// Fire the entry action of the initial state. Called once when the
    /// owning agent finishes registration; later calls are no-ops.
    pub(crate) fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if self.current.index() < self.defined {
            Self::run(&mut self.on_enter, self.current);
        }
    }

    /// Transition to `target`: exit action of the current state, swap,
    /// entry action of the new state. No-op when already in `target`.
    pub fn transition_to(&mut self, target: StateId) -> Result<(), StateError> {
        self.slot(target)?;
        if target == self.current {
            return Ok(());
        }

        if self.current.index() < self.defined {
            Self::run(&mut self.on_exit, self.current);
        }
        self.previous = self.current;
        self.current = target;
        Self::run(&mut self.on_enter, target);
        Ok(())
    }

    /// The state the machine is currently in.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// The state before the last transition, or `StateId::INVALID` before
    /// the first one.
    pub fn previous_state(&self) -> StateId {
        self.previous
    }

    /// Whether the machine is currently in `state`.
    pub fn in_state(&self, state: StateId) -> bool {
        self.current == state
    }

    /// Name a defined state was registered under.
    pub fn state_name(&self, state: StateId) -> Option<&'static str> {
        if state.index() < self.defined {
            self.names[state.index()]
        } else {
            None
        }
    }

    /// Number of defined states.
    pub fn state_count(&self) -> usize {
        self.defined
    }

    fn slot(&self, state: StateId) -> Result<usize, StateError> {
        let idx = state.index();
        if state.is_valid() && idx < self.defined {
            Ok(idx)
        } else {
            Err(StateError::InvalidState(state))
        }
    }

    fn run(actions: &mut [Option<StateAction>; MAX_STATES], state: StateId) {
        if let Some(action) = actions[state.index()].as_mut() {
            action();
        }
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for StateMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("defined", &self.defined)
            .field("current", &self.current)
            .field("previous", &self.previous)
            .finish()
    }
}
