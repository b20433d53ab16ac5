//! The agent contract and its per-agent facilities.

pub mod context;
pub mod state;
pub mod timers;
pub mod traits;

pub use context::AgentContext;
pub use state::{StateAction, StateError, StateMachine};
pub use timers::{TimerError, TimerTable};
pub use traits::Agent;
