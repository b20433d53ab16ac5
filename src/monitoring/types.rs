// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
use crate::util::AgentId;

/// Severity of a reported error.
///
/// Ordered for filtering: `Info < Warning < Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum Severity {
    /// Informational; no health impact.
    Info = 0,
    /// Degraded but operational.
    Warning = 1,
    /// System-level failure; triggers the emergency handler.
    Critical = 2,
}

impl Severity {
    /// The wire value carried inside an `ErrorReport` payload.
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Decode a wire value, saturating unknown values to `Critical`.
    pub const fn from_raw(raw: u8) -> Self {
        match raw {
            0 => Self::Info,
            1 => Self::Warning,
            _ => Self::Critical,
        }
    }
}

/// Classification of a reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum ErrorKind {
    /// A mailbox rejected a push at capacity.
    QueueOverflow = 0,
    /// A message exceeded the storable size.
    MessageTooLarge = 1,
    /// A message failed size or integrity validation.
    InvalidMessage = 2,
    /// An agent could not be registered.
    AgentRegistrationFailed = 3,
    /// The agent table is at capacity.
    AgentTableFull = 4,
    /// A state machine ran out of state slots.
    StateOverflow = 5,
    /// A state operation named an undefined state.
    InvalidStateId = 6,
    /// Two distinct payload types derived the same type id.
    TypeIdCollision = 7,
    /// A stored mailbox entry failed validation on dequeue.
    CorruptedMessage = 8,
    /// A payload failed the byte-safety contract.
    UnsafeMessageType = 9,
    /// A monitored agent missed its heartbeat deadline.
    WatchdogExpired = 10,
}

impl ErrorKind {
    /// The wire value carried inside an `ErrorReport` payload.
    pub const fn raw(self) -> u8 {
        self as u8
    }

    /// Decode a wire value.
    pub const fn from_raw(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::QueueOverflow,
            1 => Self::MessageTooLarge,
            2 => Self::InvalidMessage,
            3 => Self::AgentRegistrationFailed,
            4 => Self::AgentTableFull,
            5 => Self::StateOverflow,
            6 => Self::InvalidStateId,
            7 => Self::TypeIdCollision,
            8 => Self::CorruptedMessage,
            9 => Self::UnsafeMessageType,
            10 => Self::WatchdogExpired,
            _ => return None,
        })
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::QueueOverflow => "queue overflow",
            Self::MessageTooLarge => "message too large",
            Self::InvalidMessage => "invalid message",
            Self::AgentRegistrationFailed => "agent registration failed",
            Self::AgentTableFull => "agent table full",
            Self::StateOverflow => "state overflow",
            Self::InvalidStateId => "invalid state id",
            Self::TypeIdCollision => "type id collision",
            Self::CorruptedMessage => "corrupted message",
            Self::UnsafeMessageType => "unsafe message type",
            Self::WatchdogExpired => "watchdog expired",
        };
        f.write_str(name)
    }
}

/// One recorded error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Severity of the failure.
    pub level: Severity,
    /// Classification.
    pub kind: ErrorKind,
    /// Agent the failure is attributed to.
    pub source: AgentId,
    /// Platform tick count at report time.
    pub timestamp: u32,
}

/// Observable health derived from the recent error window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SystemHealth {
    /// No warnings or criticals in the window.
    Healthy,
    /// At least one warning, no criticals.
    Warning,
    /// At least one critical in the window.
    Critical,
}
