//! # agentsys-rt - Fixed-Capacity Agent Runtime
//!
//! A minimal actor core for single-core microcontroller targets and host
//! simulators: agents exchange typed messages through bounded mailboxes,
//! dispatched by a caller-driven environment, with per-agent state
//! machines, watchdog liveness tracking, performance metrics and a
//! message-driven error channel.
//!
//! # Quick Start
//!
//! ```rust
//! use agentsys_rt::prelude::*;
//! use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
//!
//! // 1. Define a message payload (trivially copyable, byte-safe).
//! #[repr(C)]
//! #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
//! struct Increment {
//!     delta: u32,
//! }
//!
//! impl Payload for Increment {
//!     const NAME: &'static str = "quickstart::Increment";
//! }
//!
//! // 2. Define an agent.
//! struct CounterAgent {
//!     count: u32,
//! }
//!
//! impl Agent for CounterAgent {
//!     fn handle_message(&mut self, _ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
//!         if let Some(inc) = msg.payload::<Increment>() {
//!             self.count += inc.delta;
//!             return true;
//!         }
//!         false
//!     }
//! }
//!
//! // 3. Register it and drive the dispatch loop.
//! let mut env = Environment::with_defaults().unwrap();
//! let counter = env.register_agent(Box::new(CounterAgent { count: 0 })).unwrap();
//!
//! env.send_message(counter, counter, &Increment { delta: 5 });
//! env.process_all_messages();
//!
//! assert_eq!(env.agent_as::<CounterAgent>(counter).unwrap().count, 5);
//! ```
//!
//! # Core Properties
//!
//! - **Fixed capacity**: agents, mailbox depth, message size, states and
//!   timers are compile-time constants ([`config`]); nothing allocates on
//!   the hot path after registration.
//! - **Compile-time type identity**: every payload carries a 16-bit
//!   fingerprint derived in const context; a runtime registry is the
//!   collision safety net ([`message`]).
//! - **Cooperative dispatch**: a single driver task calls
//!   `process_all_messages` in a loop; handlers run to completion. Other
//!   tasks send concurrently through the cloneable [`system::Router`].
//! - **Message-driven services**: the error reporter, metrics collector
//!   and watchdog are themselves agents consuming `ErrorReport`,
//!   `PerformanceMetric` and `Heartbeat` messages ([`system::services`]).
//!
//! # Module Organization
//!
//! - [`message`] - type identity, frame encoding, payload contract
//! - [`mailbox`] - bounded byte-blob rings with integrity validation
//! - [`agent`] - the `Agent` trait, context, state machines, timers
//! - [`system`] - environment, router, configuration, system services
//! - [`monitoring`] - error hub, watchdog table, runtime metrics
//! - [`platform`] - injected tick source and emergency stop
//! - [`util`] - id newtypes
//!
//! # Concurrency Model
//!
//! The dispatcher is single-threaded and owned by the caller; mutual
//! exclusion is per mailbox, and send paths acquire at most one lock at a
//! time. Handlers must not block indefinitely, and the send paths must
//! not be called from interrupt context (mailbox mutex acquisition is an
//! unbounded wait).

pub mod agent;
pub mod config;
pub mod mailbox;
pub mod message;
pub mod monitoring;
pub mod platform;
pub mod prelude;
pub mod system;
pub mod util;

// Re-export commonly used types
pub use agent::{Agent, AgentContext, StateError, StateMachine, TimerError};
pub use config::RuntimeConfig;
pub use mailbox::{Mailbox, PushError};
pub use message::{
    derive_type_id, ErrorReport, Frame, FrameError, Heartbeat, MessageHeader, MessageView,
    MetricsDigest, Payload, PerformanceMetric, RegistryError, TimerFired, TypeIdRegistry,
    HEADER_SIZE,
};
pub use monitoring::{
    ErrorHub, ErrorKind, ErrorRecord, MetricsSnapshot, RuntimeMetrics, Severity, SystemHealth,
    WatchdogTable,
};
pub use platform::{host_platform, manual_clock, HostPlatform, ManualClock, Platform};
pub use system::{Environment, Router, SystemError, DEFAULT_MESSAGE_BATCH};
pub use util::{AgentId, MessageTypeId, StateId};
