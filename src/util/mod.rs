//! Small identifier types shared across the runtime.

pub mod ids;

pub use ids::{AgentId, MessageTypeId, StateId};
