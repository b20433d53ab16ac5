// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Environment-level error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SystemError {
    /// The agent table is at capacity.
    #[error("agent table is full (capacity: {capacity})")]
    AgentTableFull {
        /// Registration capacity.
        capacity: usize,
    },

    /// The environment has been shut down.
    #[error("environment is stopped")]
    Stopped,

    /// Configuration validation failed.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable validation failure.
        reason: String,
    },
}
