// Layer 1: Standard library imports
use std::mem::{align_of, size_of};

// Layer 2: Third-party crate imports
use zerocopy::{FromBytes, Immutable, IntoBytes};

// Layer 3: Internal module imports
use super::type_id::derive_type_id;
use crate::util::MessageTypeId;

/// A message payload that can travel through a mailbox.
///
/// Payloads are copied into the mailbox as raw bytes and copied back out
/// on the receiving side, so the trait requires the byte-safety bounds
/// that make that round-trip sound: `Copy` plus the `zerocopy` traits
/// (every bit pattern valid, no padding, no interior mutability). A type
/// holding references, heap resources or padding does not qualify, which
/// is exactly the "trivially copyable" rule enforced at compile time.
///
/// # Type identity
///
/// `NAME` is the per-type identity string (convention: the fully-qualified
/// type path). [`Payload::TYPE_ID`] is derived from it at compile time and
/// never needs to be written by hand.
///
/// # Example
/// ```rust
/// use agentsys_rt::message::Payload;
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct SensorReading {
///     raw: u32,
///     channel: u32,
/// }
///
/// impl Payload for SensorReading {
///     const NAME: &'static str = "demo::SensorReading";
/// }
///
/// assert!(!SensorReading::TYPE_ID.is_reserved());
/// ```
pub trait Payload: Copy + Send + IntoBytes + FromBytes + Immutable + 'static {
    /// Per-type identity string, unique within one build.
    const NAME: &'static str;

    /// Compile-time 16-bit fingerprint for this payload type.
    const TYPE_ID: MessageTypeId =
        derive_type_id(Self::NAME, size_of::<Self>(), align_of::<Self>());
}

/// Compile-time pairwise check that a fixed list of payload types has no
/// type id collisions.
///
/// Expands to `const` assertions over every pair, so a collision is a
/// build error naming the offending pair.
///
/// # Example
/// ```rust
/// use agentsys_rt::assert_unique_type_ids;
/// use agentsys_rt::message::Payload;
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct Start { pub run_id: u32 }
/// impl Payload for Start { const NAME: &'static str = "demo::Start"; }
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct Stop { pub run_id: u32 }
/// impl Payload for Stop { const NAME: &'static str = "demo::Stop"; }
///
/// assert_unique_type_ids!(Start, Stop);
/// ```
#[macro_export]
macro_rules! assert_unique_type_ids {
    ($last:ty $(,)?) => {};
    ($head:ty, $($tail:ty),+ $(,)?) => {
        $(
            const _: () = assert!(
                <$head as $crate::message::Payload>::TYPE_ID.raw()
                    != <$tail as $crate::message::Payload>::TYPE_ID.raw(),
                concat!(
                    "message type id collision between ",
                    stringify!($head),
                    " and ",
                    stringify!($tail)
                ),
            );
        )+
        $crate::assert_unique_type_ids!($($tail),+);
    };
}
