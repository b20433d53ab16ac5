// Layer 1: Standard library imports
use std::mem::size_of;

// Layer 2: Third-party crate imports
use thiserror::Error;
use zerocopy::{FromBytes, IntoBytes};

// Layer 3: Internal module imports
use super::header::{MessageHeader, HEADER_SIZE};
use super::traits::Payload;
use crate::config::MAX_MESSAGE_SIZE;
use crate::util::{AgentId, MessageTypeId};

/// Frame encoding error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Header plus payload exceed the storable message size.
    #[error("encoded message is {size} bytes (max {max})")]
    PayloadTooLarge {
        /// Total encoded size.
        size: usize,
        /// Storable maximum.
        max: usize,
    },
}

/// One encoded message: header bytes followed by payload bytes, in a
/// fixed scratch buffer.
///
/// A frame is built on the sender's stack and copied into the recipient
/// mailbox; nothing is allocated.
///
/// # Example
/// ```rust
/// use agentsys_rt::message::{Frame, Payload, HEADER_SIZE};
/// use agentsys_rt::util::AgentId;
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct Counter { value: u32 }
/// impl Payload for Counter { const NAME: &'static str = "demo::Counter"; }
///
/// let frame = Frame::encode(AgentId::new(1), 0, &Counter { value: 7 }).unwrap();
/// assert_eq!(frame.len(), HEADER_SIZE + 4);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Frame {
    len: u16,
    bytes: [u8; MAX_MESSAGE_SIZE],
}

impl Frame {
    /// Encode a payload with a freshly stamped header.
    pub fn encode<T: Payload>(
        sender: AgentId,
        timestamp: u32,
        payload: &T,
    ) -> Result<Self, FrameError> {
        let total = HEADER_SIZE + size_of::<T>();
        if total > MAX_MESSAGE_SIZE {
            return Err(FrameError::PayloadTooLarge {
                size: total,
                max: MAX_MESSAGE_SIZE,
            });
        }

        let header = MessageHeader::new(T::TYPE_ID, sender, total as u16, timestamp);
        let mut bytes = [0u8; MAX_MESSAGE_SIZE];
        bytes[..HEADER_SIZE].copy_from_slice(header.as_bytes());
        bytes[HEADER_SIZE..total].copy_from_slice(payload.as_bytes());

        Ok(Self {
            len: total as u16,
            bytes,
        })
    }

    /// Encoded length in bytes, header included.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// Whether the frame holds no message (never true for encoded frames).
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

/// Borrowed view over one dequeued message.
///
/// Splits the stored bytes into the parsed header and the payload region;
/// [`MessageView::payload`] recovers the typed payload by fingerprint
/// comparison followed by a byte copy (never a reference
/// reinterpretation, so buffer alignment is irrelevant).
#[derive(Debug, Clone, Copy)]
pub struct MessageView<'a> {
    header: MessageHeader,
    payload: &'a [u8],
}

impl<'a> MessageView<'a> {
    /// Parse a stored message. Returns `None` when the bytes cannot hold
    /// a header or the header's size disagrees with the byte count.
    pub fn parse(bytes: &'a [u8]) -> Option<Self> {
        if bytes.len() < HEADER_SIZE {
            return None;
        }
        let header = MessageHeader::read_from_bytes(&bytes[..HEADER_SIZE]).ok()?;
        if header.size as usize != bytes.len() {
            return None;
        }
        Some(Self {
            header,
            payload: &bytes[HEADER_SIZE..],
        })
    }

    /// The parsed header.
    pub fn header(&self) -> &MessageHeader {
        &self.header
    }

    /// Payload type fingerprint.
    pub fn type_id(&self) -> MessageTypeId {
        self.header.type_id
    }

    /// Id of the sending agent.
    pub fn sender(&self) -> AgentId {
        self.header.sender
    }

    /// Whether the message carries a payload of type `T`.
    pub fn is<T: Payload>(&self) -> bool {
        self.header.type_id == T::TYPE_ID
    }

    /// Recover the typed payload, or `None` when the fingerprint does not
    /// match or the payload region has the wrong length.
    pub fn payload<T: Payload>(&self) -> Option<T> {
        if !self.is::<T>() {
            return None;
        }
        T::read_from_bytes(self.payload).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zerocopy::{Immutable, KnownLayout};

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct TestMessage {
        value: u32,
        id: u32,
    }

    impl Payload for TestMessage {
        const NAME: &'static str = "tests::TestMessage";
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct Other {
        value: u32,
    }

    impl Payload for Other {
        const NAME: &'static str = "tests::Other";
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct Oversized {
        blob: [u8; MAX_MESSAGE_SIZE],
    }

    impl Payload for Oversized {
        const NAME: &'static str = "tests::Oversized";
    }

    #[test]
    fn test_encode_stamps_header() {
        let frame = Frame::encode(AgentId::new(3), 777, &TestMessage { value: 42, id: 123 })
            .unwrap();

        let view = MessageView::parse(frame.as_bytes()).unwrap();
        assert_eq!(view.type_id(), TestMessage::TYPE_ID);
        assert_eq!(view.sender(), AgentId::new(3));
        assert_eq!(view.header().timestamp, 777);
        assert_eq!(view.header().size as usize, HEADER_SIZE + 8);
    }

    #[test]
    fn test_payload_round_trip() {
        let sent = TestMessage { value: 42, id: 123 };
        let frame = Frame::encode(AgentId::new(1), 0, &sent).unwrap();

        let view = MessageView::parse(frame.as_bytes()).unwrap();
        assert_eq!(view.payload::<TestMessage>(), Some(sent));
    }

    #[test]
    fn test_payload_type_mismatch_is_none() {
        let frame = Frame::encode(AgentId::new(1), 0, &TestMessage { value: 1, id: 2 })
            .unwrap();

        let view = MessageView::parse(frame.as_bytes()).unwrap();
        assert!(!view.is::<Other>());
        assert!(view.payload::<Other>().is_none());
    }

    #[test]
    fn test_encode_rejects_oversized_payload() {
        let result = Frame::encode(
            AgentId::new(1),
            0,
            &Oversized {
                blob: [0; MAX_MESSAGE_SIZE],
            },
        );
        assert!(matches!(result, Err(FrameError::PayloadTooLarge { .. })));
    }

    #[test]
    fn test_parse_rejects_truncated_bytes() {
        assert!(MessageView::parse(&[0u8; 4]).is_none());
    }

    #[test]
    fn test_parse_rejects_size_disagreement() {
        let frame = Frame::encode(AgentId::new(1), 0, &TestMessage { value: 1, id: 2 })
            .unwrap();
        let bytes = frame.as_bytes();
        // One byte short of what the header claims.
        assert!(MessageView::parse(&bytes[..bytes.len() - 1]).is_none());
    }
}
