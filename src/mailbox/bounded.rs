// Layer 1: Standard library imports
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use parking_lot::Mutex;
use zerocopy::FromBytes;

// Layer 3: Internal module imports
use super::errors::PushError;
use crate::config::{MAX_MESSAGE_SIZE, MAX_QUEUE_SIZE};
use crate::message::{Frame, MessageHeader, HEADER_SIZE};
use crate::monitoring::{ErrorHub, ErrorKind, ErrorRecord, RuntimeMetrics, Severity};
use crate::platform::SharedPlatform;
use crate::util::AgentId;

#[derive(Clone, Copy)]
struct MailboxEntry {
    valid: bool,
    size: u16,
    bytes: [u8; MAX_MESSAGE_SIZE],
}

impl MailboxEntry {
    const EMPTY: MailboxEntry = MailboxEntry {
        valid: false,
        size: 0,
        bytes: [0; MAX_MESSAGE_SIZE],
    };
}

struct Ring {
    entries: [MailboxEntry; MAX_QUEUE_SIZE],
    head: usize,
    tail: usize,
    count: usize,
}

impl Ring {
    const fn new() -> Self {
        Self {
            entries: [MailboxEntry::EMPTY; MAX_QUEUE_SIZE],
            head: 0,
            tail: 0,
            count: 0,
        }
    }
}

/// Bounded FIFO of serialized messages, owned by one agent.
///
/// Entries are fixed-size byte blobs in a ring guarded by a single mutex;
/// nothing allocates after construction. Multiple senders may push
/// concurrently with the dispatcher popping; ordering between senders is
/// the order of their successful pushes under the mutex.
///
/// Depth queries (`len`, `is_empty`, `is_full`) read an atomic mirror of
/// the count and are best-effort snapshots taken without the lock.
pub struct Mailbox {
    owner: AgentId,
    ring: Mutex<Ring>,
    depth: AtomicUsize,
    platform: SharedPlatform,
    metrics: Arc<RuntimeMetrics>,
    hub: ErrorHub,
    tolerance_ticks: u32,
}

impl Mailbox {
    /// Create a mailbox for `owner`.
    ///
    /// `tolerance_ticks` bounds how far in the future a message timestamp
    /// may lie before the push is rejected as invalid.
    pub fn new(
        owner: AgentId,
        platform: SharedPlatform,
        metrics: Arc<RuntimeMetrics>,
        hub: ErrorHub,
        tolerance_ticks: u32,
    ) -> Self {
        Self {
            owner,
            ring: Mutex::new(Ring::new()),
            depth: AtomicUsize::new(0),
            platform,
            metrics,
            hub,
            tolerance_ticks,
        }
    }

    /// The agent this mailbox belongs to.
    pub fn owner(&self) -> AgentId {
        self.owner
    }

    /// Enqueue an encoded frame.
    pub fn push(&self, frame: &Frame) -> Result<(), PushError> {
        self.push_bytes(frame.as_bytes())
    }

    /// Enqueue raw message bytes (header followed by payload).
    ///
    /// Validation order: size caps outside the lock, then capacity under
    /// the mutex, then header integrity (reserved type id, timestamp
    /// plausibility) before the copy.
    pub fn push_bytes(&self, bytes: &[u8]) -> Result<(), PushError> {
        if bytes.len() > MAX_MESSAGE_SIZE {
            self.report(ErrorKind::MessageTooLarge);
            return Err(PushError::MessageTooLarge {
                size: bytes.len(),
                max: MAX_MESSAGE_SIZE,
            });
        }
        if bytes.len() < HEADER_SIZE {
            self.report(ErrorKind::InvalidMessage);
            return Err(PushError::InvalidMessage);
        }

        let now = self.platform.monotonic_ticks();
        let stored = {
            let mut ring = self.ring.lock();
            if ring.count == MAX_QUEUE_SIZE {
                Err(PushError::QueueFull {
                    capacity: MAX_QUEUE_SIZE,
                })
            } else {
                let plausible = MessageHeader::read_from_bytes(&bytes[..HEADER_SIZE])
                    .is_ok_and(|header| header.is_plausible(now, self.tolerance_ticks));
                if plausible {
                    let tail = ring.tail;
                    let entry = &mut ring.entries[tail];
                    entry.bytes[..bytes.len()].copy_from_slice(bytes);
                    entry.size = bytes.len() as u16;
                    entry.valid = true;

                    ring.tail = (ring.tail + 1) % MAX_QUEUE_SIZE;
                    ring.count += 1;
                    self.depth.store(ring.count, Ordering::Release);
                    Ok(ring.count)
                } else {
                    Err(PushError::InvalidMessage)
                }
            }
        };

        match stored {
            Ok(depth) => {
                self.metrics.note_queue_depth(depth);
                Ok(())
            }
            Err(err) => {
                self.report(match err {
                    PushError::QueueFull { .. } => ErrorKind::QueueOverflow,
                    PushError::MessageTooLarge { .. } => ErrorKind::MessageTooLarge,
                    PushError::InvalidMessage => ErrorKind::InvalidMessage,
                });
                Err(err)
            }
        }
    }

    /// Dequeue the oldest message into `buf`, returning its length.
    ///
    /// A stored entry that fails validation is discarded, reported as
    /// `CorruptedMessage`, and `None` is returned for that call; the next
    /// call sees the following entry.
    pub fn pop(&self, buf: &mut [u8; MAX_MESSAGE_SIZE]) -> Option<usize> {
        let mut ring = self.ring.lock();
        if ring.count == 0 {
            return None;
        }

        let head = ring.head;
        let entry = ring.entries[head];
        let size = entry.size as usize;
        let intact = entry.valid && (HEADER_SIZE..=MAX_MESSAGE_SIZE).contains(&size);

        ring.entries[head].valid = false;
        ring.head = (ring.head + 1) % MAX_QUEUE_SIZE;
        ring.count -= 1;
        self.depth.store(ring.count, Ordering::Release);
        drop(ring);

        if !intact {
            self.report(ErrorKind::CorruptedMessage);
            return None;
        }

        buf[..size].copy_from_slice(&entry.bytes[..size]);
        Some(size)
    }

    /// Discard every stored message and reset the ring.
    pub fn clear(&self) {
        let mut ring = self.ring.lock();
        for entry in ring.entries.iter_mut() {
            entry.valid = false;
        }
        ring.head = 0;
        ring.tail = 0;
        ring.count = 0;
        self.depth.store(0, Ordering::Release);
    }

    /// Snapshot of the stored message count.
    pub fn len(&self) -> usize {
        self.depth.load(Ordering::Acquire)
    }

    /// Whether the mailbox holds no messages.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the mailbox is at capacity.
    pub fn is_full(&self) -> bool {
        self.len() >= MAX_QUEUE_SIZE
    }

    /// Mailbox capacity in messages.
    pub const fn capacity(&self) -> usize {
        MAX_QUEUE_SIZE
    }

    fn report(&self, kind: ErrorKind) {
        self.hub.report(ErrorRecord {
            level: Severity::Warning,
            kind,
            source: self.owner,
            timestamp: self.platform.monotonic_ticks(),
        });
    }
}

impl fmt::Debug for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mailbox")
            .field("owner", &self.owner)
            .field("len", &self.len())
            .field("capacity", &MAX_QUEUE_SIZE)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::message::{MessageView, Payload};
    use crate::platform::manual_clock;
    use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

    #[repr(C)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct TestMessage {
        value: u32,
        id: u32,
    }

    impl Payload for TestMessage {
        const NAME: &'static str = "mailbox_tests::TestMessage";
    }

    fn fixture() -> (Mailbox, ErrorHub) {
        let hub = ErrorHub::new(8);
        let mailbox = Mailbox::new(
            AgentId::new(1),
            manual_clock(),
            Arc::new(RuntimeMetrics::new()),
            hub.clone(),
            1_000,
        );
        (mailbox, hub)
    }

    fn frame(value: u32, id: u32) -> Frame {
        Frame::encode(AgentId::new(2), 0, &TestMessage { value, id }).unwrap()
    }

    #[test]
    fn test_new_mailbox_is_empty() {
        let (mailbox, _hub) = fixture();
        assert!(mailbox.is_empty());
        assert!(!mailbox.is_full());
        assert_eq!(mailbox.len(), 0);
    }

    #[test]
    fn test_push_pop_round_trip() {
        let (mailbox, _hub) = fixture();

        mailbox.push(&frame(42, 123)).unwrap();
        assert_eq!(mailbox.len(), 1);

        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        let len = mailbox.pop(&mut buf).unwrap();
        assert_eq!(len, HEADER_SIZE + 8);
        assert_eq!(mailbox.len(), 0);

        let view = MessageView::parse(&buf[..len]).unwrap();
        assert_eq!(
            view.payload::<TestMessage>(),
            Some(TestMessage { value: 42, id: 123 })
        );
    }

    #[test]
    fn test_fifo_order() {
        let (mailbox, _hub) = fixture();
        for i in 0..5 {
            mailbox.push(&frame(i, i)).unwrap();
        }

        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        for i in 0..5 {
            let len = mailbox.pop(&mut buf).unwrap();
            let view = MessageView::parse(&buf[..len]).unwrap();
            assert_eq!(view.payload::<TestMessage>().unwrap().value, i);
        }
    }

    #[test]
    fn test_oversized_push_rejected() {
        let (mailbox, hub) = fixture();
        let bytes = [0u8; MAX_MESSAGE_SIZE + 1];

        let err = mailbox.push_bytes(&bytes).unwrap_err();
        assert!(matches!(err, PushError::MessageTooLarge { size, .. } if size == 129));
        assert!(mailbox.is_empty());
        assert_eq!(hub.last_kind(), Some(ErrorKind::MessageTooLarge));
    }

    #[test]
    fn test_undersized_push_rejected() {
        let (mailbox, hub) = fixture();
        let bytes = [0u8; HEADER_SIZE - 1];

        assert_eq!(mailbox.push_bytes(&bytes), Err(PushError::InvalidMessage));
        assert!(mailbox.is_empty());
        assert_eq!(hub.last_kind(), Some(ErrorKind::InvalidMessage));
    }

    #[test]
    fn test_queue_full_condition() {
        let (mailbox, hub) = fixture();
        let msg = frame(42, 123);

        for _ in 0..MAX_QUEUE_SIZE {
            mailbox.push(&msg).unwrap();
        }
        assert!(mailbox.is_full());
        assert_eq!(mailbox.len(), MAX_QUEUE_SIZE);

        let err = mailbox.push(&msg).unwrap_err();
        assert!(matches!(err, PushError::QueueFull { .. }));
        assert_eq!(hub.last_kind(), Some(ErrorKind::QueueOverflow));
        assert_eq!(mailbox.len(), MAX_QUEUE_SIZE);
    }

    #[test]
    fn test_clear_resets_and_reaccepts() {
        let (mailbox, _hub) = fixture();
        for _ in 0..5 {
            mailbox.push(&frame(1, 1)).unwrap();
        }

        mailbox.clear();
        assert!(mailbox.is_empty());

        for _ in 0..MAX_QUEUE_SIZE {
            mailbox.push(&frame(2, 2)).unwrap();
        }
        assert!(mailbox.is_full());
    }

    #[test]
    fn test_future_timestamp_rejected() {
        let hub = ErrorHub::new(8);
        let clock = manual_clock();
        let mailbox = Mailbox::new(
            AgentId::new(1),
            Arc::clone(&clock) as SharedPlatform,
            Arc::new(RuntimeMetrics::new()),
            hub.clone(),
            1_000,
        );

        // Stamped 5 seconds ahead of the clock; tolerance is 1 second.
        let stale = Frame::encode(AgentId::new(2), 5_000, &TestMessage { value: 1, id: 1 })
            .unwrap();
        assert_eq!(mailbox.push(&stale), Err(PushError::InvalidMessage));

        clock.advance(4_500);
        assert!(mailbox.push(&stale).is_ok());
    }

    #[test]
    fn test_reserved_type_id_rejected() {
        let (mailbox, hub) = fixture();

        let msg = frame(1, 1);
        let mut bytes = [0u8; MAX_MESSAGE_SIZE];
        let len = msg.as_bytes().len();
        bytes[..len].copy_from_slice(msg.as_bytes());
        // Overwrite the type id with the reserved zero value.
        bytes[0] = 0;
        bytes[1] = 0;

        assert_eq!(
            mailbox.push_bytes(&bytes[..len]),
            Err(PushError::InvalidMessage)
        );
        assert_eq!(hub.last_kind(), Some(ErrorKind::InvalidMessage));
    }

    #[test]
    fn test_full_mailbox_rejects_bad_header_as_queue_full() {
        let (mailbox, hub) = fixture();
        let msg = frame(1, 1);
        for _ in 0..MAX_QUEUE_SIZE {
            mailbox.push(&msg).unwrap();
        }

        // Capacity is checked ahead of header integrity, so a reserved
        // type id on a full mailbox reports overflow, not invalidity.
        let mut bytes = [0u8; MAX_MESSAGE_SIZE];
        let len = msg.as_bytes().len();
        bytes[..len].copy_from_slice(msg.as_bytes());
        bytes[0] = 0;
        bytes[1] = 0;

        let err = mailbox.push_bytes(&bytes[..len]).unwrap_err();
        assert!(matches!(err, PushError::QueueFull { .. }));
        assert_eq!(hub.last_kind(), Some(ErrorKind::QueueOverflow));
        assert_eq!(mailbox.len(), MAX_QUEUE_SIZE);
    }

    #[test]
    fn test_max_queue_depth_metric() {
        let hub = ErrorHub::new(8);
        let metrics = Arc::new(RuntimeMetrics::new());
        let mailbox = Mailbox::new(
            AgentId::new(1),
            manual_clock(),
            Arc::clone(&metrics),
            hub,
            1_000,
        );

        mailbox.push(&frame(1, 1)).unwrap();
        assert_eq!(metrics.max_queue_depth(), 1);
        mailbox.push(&frame(2, 2)).unwrap();
        assert_eq!(metrics.max_queue_depth(), 2);

        // Draining does not lower the high-water mark.
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        mailbox.pop(&mut buf).unwrap();
        assert_eq!(metrics.max_queue_depth(), 2);
    }

    #[test]
    fn test_pop_empty_returns_none() {
        let (mailbox, _hub) = fixture();
        let mut buf = [0u8; MAX_MESSAGE_SIZE];
        assert!(mailbox.pop(&mut buf).is_none());
    }
}
