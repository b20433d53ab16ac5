//! Convenience re-exports for the common surface.
//!
//! ```rust
//! use agentsys_rt::prelude::*;
//! ```

pub use crate::agent::{Agent, AgentContext};
pub use crate::config::RuntimeConfig;
pub use crate::message::{MessageView, Payload, TimerFired};
pub use crate::monitoring::{ErrorKind, Severity, SystemHealth};
pub use crate::platform::{host_platform, manual_clock, Platform};
pub use crate::system::{Environment, Router, SystemError, DEFAULT_MESSAGE_BATCH};
pub use crate::util::{AgentId, MessageTypeId, StateId};
