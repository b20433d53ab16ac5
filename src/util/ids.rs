// Layer 1: Standard library imports
use std::fmt::{self, Display};

// Layer 2: Third-party crate imports
use serde::Serialize;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// Layer 3: Internal module imports
// (none)

/// Unique identifier for agents within one environment.
///
/// Ids are small sequential integers assigned at registration and stable
/// until environment shutdown. The value `0xFFFF` is reserved as
/// [`AgentId::INVALID`] and is never assigned.
///
/// # Example
/// ```rust
/// use agentsys_rt::util::AgentId;
///
/// let id = AgentId::new(3);
/// assert!(id.is_valid());
/// assert!(!AgentId::INVALID.is_valid());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    IntoBytes,
    FromBytes,
    Immutable,
    KnownLayout,
)]
#[repr(transparent)]
pub struct AgentId(u16);

impl AgentId {
    /// Reserved sentinel; never assigned to a registered agent.
    pub const INVALID: AgentId = AgentId(u16::MAX);

    /// Wrap a raw id value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw id value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether this id may refer to a registered agent.
    pub const fn is_valid(self) -> bool {
        self.0 != u16::MAX
    }

    /// Slot index into the agent table.
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "agent#{}", self.0)
        } else {
            write!(f, "agent#invalid")
        }
    }
}

/// Identifier of one state within an agent's state machine.
///
/// Local to the owning agent; `0xFF` is reserved as [`StateId::INVALID`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct StateId(u8);

impl StateId {
    /// Reserved sentinel returned when state definition fails.
    pub const INVALID: StateId = StateId(u8::MAX);

    /// The initial state every agent starts in.
    pub const INITIAL: StateId = StateId(0);

    /// Wrap a raw state value.
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    /// The raw state value.
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Whether this id may refer to a defined state.
    pub const fn is_valid(self) -> bool {
        self.0 != u8::MAX
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }
}

impl Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "state#{}", self.0)
        } else {
            write!(f, "state#invalid")
        }
    }
}

/// 16-bit message type fingerprint.
///
/// Derived at compile time from a payload type's name, size and alignment
/// (see [`derive_type_id`](crate::message::derive_type_id)). `0x0000` and
/// `0xFFFF` are reserved and never produced by derivation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    IntoBytes,
    FromBytes,
    Immutable,
    KnownLayout,
)]
#[repr(transparent)]
pub struct MessageTypeId(u16);

impl MessageTypeId {
    /// Wrap a raw type id value.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The raw fingerprint value.
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Whether the value is one of the reserved fingerprints.
    pub const fn is_reserved(self) -> bool {
        self.0 == 0 || self.0 == u16::MAX
    }
}

impl Display for MessageTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{:04x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_validity() {
        assert!(AgentId::new(0).is_valid());
        assert!(AgentId::new(15).is_valid());
        assert!(!AgentId::INVALID.is_valid());
        assert_eq!(AgentId::INVALID.raw(), 0xFFFF);
    }

    #[test]
    fn test_agent_id_display() {
        assert_eq!(format!("{}", AgentId::new(7)), "agent#7");
        assert_eq!(format!("{}", AgentId::INVALID), "agent#invalid");
    }

    #[test]
    fn test_state_id_validity() {
        assert!(StateId::INITIAL.is_valid());
        assert_eq!(StateId::INITIAL.raw(), 0);
        assert!(!StateId::INVALID.is_valid());
        assert_eq!(StateId::INVALID.raw(), 0xFF);
    }

    #[test]
    fn test_type_id_reserved_values() {
        assert!(MessageTypeId::new(0).is_reserved());
        assert!(MessageTypeId::new(0xFFFF).is_reserved());
        assert!(!MessageTypeId::new(1).is_reserved());
        assert!(!MessageTypeId::new(0xFFFE).is_reserved());
    }

    #[test]
    fn test_type_id_display() {
        assert_eq!(format!("{}", MessageTypeId::new(0x0ABC)), "type#0abc");
    }
}
