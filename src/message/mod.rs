//! Typed messages over a byte-blob substrate.
//!
//! Compile-time type fingerprints, the payload contract, header + frame
//! encoding, the runtime collision registry, and the payloads used by the
//! system services themselves.

pub mod envelope;
pub mod header;
pub mod registry;
pub mod system;
pub mod traits;
pub mod type_id;

pub use envelope::{Frame, FrameError, MessageView};
pub use header::{MessageHeader, HEADER_SIZE};
pub use registry::{RegistryError, TypeIdRegistry, MAX_REGISTERED_TYPES};
pub use system::{ErrorReport, Heartbeat, MetricsDigest, PerformanceMetric, TimerFired};
pub use traits::Payload;
pub use type_id::derive_type_id;
