// Layer 1: Standard library imports
use std::mem::size_of;

// Layer 2: Third-party crate imports
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

// Layer 3: Internal module imports
use crate::config::MAX_MESSAGE_SIZE;
use crate::util::{AgentId, MessageTypeId};

/// Size of the fixed header prefixing every stored message.
pub const HEADER_SIZE: usize = size_of::<MessageHeader>();

/// Fixed-size record at the start of every stored message.
///
/// 12 bytes, `#[repr(C)]`, padding-free (the `flags` word keeps the `u32`
/// timestamp aligned; it is currently always zero). The layout is stable
/// within a single build; messages never leave process memory, so
/// cross-build stability is not a goal.
#[repr(C)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout,
)]
pub struct MessageHeader {
    /// Payload type fingerprint.
    pub type_id: MessageTypeId,
    /// Id of the sending agent.
    pub sender: AgentId,
    /// Total stored size in bytes, header included.
    pub size: u16,
    /// Reserved; always zero.
    pub flags: u16,
    /// Platform tick count at construction.
    pub timestamp: u32,
}

impl MessageHeader {
    /// Construct a header for a message of `total_size` bytes.
    pub fn new(type_id: MessageTypeId, sender: AgentId, total_size: u16, timestamp: u32) -> Self {
        Self {
            type_id,
            sender,
            size: total_size,
            flags: 0,
            timestamp,
        }
    }

    /// Integrity check applied by the mailbox before a message is stored.
    ///
    /// Rejects reserved type ids, sizes outside
    /// `HEADER_SIZE ..= MAX_MESSAGE_SIZE`, and timestamps more than
    /// `tolerance_ticks` in the future relative to `now` (wrap-aware).
    pub fn is_plausible(&self, now: u32, tolerance_ticks: u32) -> bool {
        if self.type_id.is_reserved() {
            return false;
        }
        let size = self.size as usize;
        if size < HEADER_SIZE || size > MAX_MESSAGE_SIZE {
            return false;
        }
        // Positive `ahead` means the stamp lies in the future.
        let ahead = self.timestamp.wrapping_sub(now) as i32;
        ahead <= tolerance_ticks as i32
    }
}
