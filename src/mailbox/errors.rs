// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
use thiserror::Error;

// Layer 3: Internal module imports
// (none)

/// Mailbox push rejection.
///
/// Every rejection is also reported into the error channel, so system
/// health reflects the failure even when the caller discards the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PushError {
    /// The mailbox is at capacity.
    #[error("mailbox is full (capacity: {capacity})")]
    QueueFull {
        /// Mailbox capacity.
        capacity: usize,
    },

    /// The message exceeds the storable size.
    #[error("message is {size} bytes (max {max})")]
    MessageTooLarge {
        /// Offered size in bytes.
        size: usize,
        /// Storable maximum.
        max: usize,
    },

    /// The message failed size or integrity validation.
    #[error("message failed validation")]
    InvalidMessage,
}
