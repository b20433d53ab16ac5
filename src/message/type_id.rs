//! Compile-time derivation of 16-bit message type fingerprints.
//!
//! The fingerprint is a function of the payload's identity string, size
//! and alignment, all available in const context, so every
//! [`Payload`](super::Payload) carries its id as an associated constant
//! with no runtime table lookup.

// Layer 1: Standard library imports
// (none)

// Layer 2: Third-party crate imports
// (none)

// Layer 3: Internal module imports
use crate::util::MessageTypeId;

const FNV_OFFSET_BASIS: u32 = 2_166_136_261;
const FNV_PRIME: u32 = 16_777_619;

// Golden-ratio / Murmur-style mix constants.
const MIX_SIZE: u32 = 0x9E37_79B9;
const MIX_TRAIT: u32 = 0x85EB_CA6B;
const MIX_ALIGN: u32 = 0xC2B2_AE3D;

/// FNV-1a over the identity string.
const fn fnv1a(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut hash = FNV_OFFSET_BASIS;
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u32;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Derive the type fingerprint for a payload type.
///
/// Recipe: FNV-1a of the identity string, XOR-mixed with the type's size,
/// triviality (always 1 — the `Copy` bound on payloads guarantees it) and
/// alignment, then compressed to 16 bits by multiplying the halves with
/// distinct primes and XOR-folding. The reserved values `0x0000` and
/// `0xFFFF` are remapped so they are never produced.
///
/// Stable within one build; not stable across builds or compilers, which
/// is why the runtime [`TypeIdRegistry`](super::TypeIdRegistry) exists as
/// a collision safety net.
///
/// # Example
/// ```rust
/// use agentsys_rt::message::derive_type_id;
///
/// const A: agentsys_rt::util::MessageTypeId = derive_type_id("demo::Ping", 4, 4);
/// const B: agentsys_rt::util::MessageTypeId = derive_type_id("demo::Pong", 4, 4);
/// assert_ne!(A, B);
/// assert!(!A.is_reserved());
/// ```
pub const fn derive_type_id(name: &str, size: usize, align: usize) -> MessageTypeId {
    let hash = fnv1a(name);
    let h1 = hash ^ (size as u32).wrapping_mul(MIX_SIZE);
    let h2 = h1 ^ MIX_TRAIT;
    let mixed32 = h2 ^ (align as u32).wrapping_mul(MIX_ALIGN);

    let mixed = ((mixed32 >> 16).wrapping_mul(MIX_TRAIT))
        ^ ((mixed32 & 0xFFFF).wrapping_mul(MIX_SIZE));
    let folded = ((mixed >> 16) ^ (mixed & 0xFFFF)) as u16;

    MessageTypeId::new(match folded {
        0x0000 => 0x0001,
        0xFFFF => 0xFFFE,
        id => id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic() {
        let a = derive_type_id("test::Sample", 8, 4);
        let b = derive_type_id("test::Sample", 8, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_name_sensitivity() {
        let a = derive_type_id("test::SampleA", 8, 4);
        let b = derive_type_id("test::SampleB", 8, 4);
        assert_ne!(a, b);
    }

    #[test]
    fn test_size_and_align_sensitivity() {
        let base = derive_type_id("test::Sample", 8, 4);
        assert_ne!(base, derive_type_id("test::Sample", 12, 4));
        assert_ne!(base, derive_type_id("test::Sample", 8, 8));
    }

    #[test]
    fn test_never_reserved() {
        // A spread of inputs; the remap clause guarantees the property for
        // all of them, this just exercises it.
        let names = ["", "a", "abc", "x::y::Z", "long::path::to::SomeType"];
        for name in names {
            for size in [0usize, 1, 4, 64, 128] {
                for align in [1usize, 2, 4, 8] {
                    let id = derive_type_id(name, size, align);
                    assert!(!id.is_reserved(), "reserved id for {name}/{size}/{align}");
                }
            }
        }
    }

    #[test]
    fn test_const_evaluable() {
        const ID: MessageTypeId = derive_type_id("const::Check", 4, 4);
        assert!(!ID.is_reserved());
    }
}
