//! Bounded byte-blob mailboxes.

pub mod bounded;
pub mod errors;

pub use bounded::Mailbox;
pub use errors::PushError;
