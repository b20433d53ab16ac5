// Layer 1: Standard library imports
use std::any::Any;

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use super::context::AgentContext;
use crate::message::MessageView;

/// An actor with identity, a private mailbox and a message handler.
///
/// Implementations are registered by value with the environment, which
/// owns them until shutdown and drives them from its single-threaded
/// dispatch loop. Handlers run to completion; anything they send stays
/// queued until a later dispatch iteration.
///
/// The `Any` supertrait lets drivers and tests recover the concrete type
/// through [`Environment::agent_as`](crate::system::Environment::agent_as).
///
/// # Example
/// ```rust
/// use agentsys_rt::agent::{Agent, AgentContext};
/// use agentsys_rt::message::{MessageView, Payload};
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct Tick { seq: u32 }
/// impl Payload for Tick { const NAME: &'static str = "demo::Tick"; }
///
/// struct Counter { ticks: u32 }
///
/// impl Agent for Counter {
///     fn handle_message(&mut self, _ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool {
///         if msg.is::<Tick>() {
///             self.ticks += 1;
///             return true;
///         }
///         false
///     }
/// }
/// ```
pub trait Agent: Any + Send {
    /// Registration hook: define states, arm timers, enrol with the
    /// watchdog. Runs once, before the agent can receive messages.
    fn setup(&mut self, _ctx: &mut AgentContext<'_>) {}

    /// Handle one dequeued message.
    ///
    /// The return value is advisory: `true` means the message was
    /// recognized and consumed, `false` flags it as unhandled. Either
    /// way the message has already left the mailbox.
    fn handle_message(&mut self, ctx: &mut AgentContext<'_>, msg: &MessageView<'_>) -> bool;
}
