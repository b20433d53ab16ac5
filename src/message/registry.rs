// Layer 1: Standard library imports
use std::mem::size_of;

// Layer 2: Third-party crate imports
use dashmap::DashMap;
use thiserror::Error;

// Layer 3: Internal module imports
use super::traits::Payload;
use crate::util::MessageTypeId;

/// Maximum number of explicitly registered payload types.
pub const MAX_REGISTERED_TYPES: usize = 256;

/// Registry error types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// Two distinct payload types derived the same fingerprint.
    ///
    /// Both types remain usable; the colliding registration is recorded so
    /// [`TypeIdRegistry::collisions`] can enumerate it, but it does not
    /// displace the earlier one.
    #[error("type id {id} of `{second}` collides with `{first}`")]
    Collision {
        /// The shared fingerprint.
        id: MessageTypeId,
        /// Name of the earlier registration.
        first: &'static str,
        /// Name of the colliding registration.
        second: &'static str,
    },

    /// The registry is at capacity.
    #[error("type registry is full (capacity: {capacity})")]
    Exhausted {
        /// Registration capacity.
        capacity: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct TypeInfo {
    id: MessageTypeId,
    size: usize,
}

/// Runtime safety net for compile-time type ids.
///
/// Derived fingerprints depend on implementation-defined identity strings
/// and can collide; the registry detects that at startup. Registration is
/// concurrent-safe; the expected pattern is to register every payload type
/// an application uses during initialization and check
/// [`TypeIdRegistry::collisions`] before entering the dispatch loop.
///
/// # Example
/// ```rust
/// use agentsys_rt::message::{Payload, TypeIdRegistry};
/// use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};
///
/// #[repr(C)]
/// #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
/// struct Ping { seq: u32 }
/// impl Payload for Ping { const NAME: &'static str = "demo::Ping"; }
///
/// let registry = TypeIdRegistry::new();
/// registry.register::<Ping>().unwrap();
/// assert_eq!(registry.len(), 1);
/// assert!(registry.collisions().is_empty());
/// ```
#[derive(Debug, Default)]
pub struct TypeIdRegistry {
    entries: DashMap<&'static str, TypeInfo>,
}

impl TypeIdRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register payload type `T`.
    ///
    /// Re-registering the same type is a no-op. A fingerprint clash with a
    /// previously registered distinct type is recorded and returned as
    /// [`RegistryError::Collision`]; neither type is removed.
    pub fn register<T: Payload>(&self) -> Result<(), RegistryError> {
        if self.entries.contains_key(T::NAME) {
            return Ok(());
        }
        if self.entries.len() >= MAX_REGISTERED_TYPES {
            return Err(RegistryError::Exhausted {
                capacity: MAX_REGISTERED_TYPES,
            });
        }

        let clash = self
            .entries
            .iter()
            .find(|entry| entry.value().id == T::TYPE_ID)
            .map(|entry| *entry.key());

        self.entries.insert(
            T::NAME,
            TypeInfo {
                id: T::TYPE_ID,
                size: size_of::<T>(),
            },
        );

        match clash {
            Some(first) => Err(RegistryError::Collision {
                id: T::TYPE_ID,
                first,
                second: T::NAME,
            }),
            None => Ok(()),
        }
    }

    /// Enumerate every fingerprint shared by two or more registered types.
    pub fn collisions(&self) -> Vec<MessageTypeId> {
        let mut seen: Vec<MessageTypeId> = Vec::with_capacity(self.entries.len());
        let mut colliding: Vec<MessageTypeId> = Vec::new();

        for entry in self.entries.iter() {
            let id = entry.value().id;
            if seen.contains(&id) {
                if !colliding.contains(&id) {
                    colliding.push(id);
                }
            } else {
                seen.push(id);
            }
        }
        colliding
    }

    /// Size in bytes of a registered type, by name.
    pub fn size_of(&self, name: &str) -> Option<usize> {
        self.entries.get(name).map(|entry| entry.value().size)
    }

    /// Number of registered types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no types are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registration capacity.
    pub const fn capacity(&self) -> usize {
        MAX_REGISTERED_TYPES
    }

    /// Drop all registrations (test support).
    pub fn reset(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

    #[repr(C)]
    #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct Alpha {
        a: u32,
    }

    impl Payload for Alpha {
        const NAME: &'static str = "registry_tests::Alpha";
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct Beta {
        b: u32,
    }

    impl Payload for Beta {
        const NAME: &'static str = "registry_tests::Beta";
    }

    // Forces a collision with Alpha: same size, same alignment, and NAME
    // override pinning the identity string to Alpha's.
    #[repr(C)]
    #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct AlphaImpostor {
        a: u32,
    }

    impl Payload for AlphaImpostor {
        const NAME: &'static str = "registry_tests::Alpha";
        const TYPE_ID: MessageTypeId = Alpha::TYPE_ID;
    }

    #[repr(C)]
    #[derive(Debug, Clone, Copy, IntoBytes, FromBytes, Immutable, KnownLayout)]
    struct ForcedClash {
        c: u32,
    }

    impl Payload for ForcedClash {
        const NAME: &'static str = "registry_tests::ForcedClash";
        const TYPE_ID: MessageTypeId = Alpha::TYPE_ID;
    }

    #[test]
    fn test_register_distinct_types() {
        let registry = TypeIdRegistry::new();
        registry.register::<Alpha>().unwrap();
        registry.register::<Beta>().unwrap();

        assert_eq!(registry.len(), 2);
        assert!(registry.collisions().is_empty());
    }

    #[test]
    fn test_reregistration_is_idempotent() {
        let registry = TypeIdRegistry::new();
        registry.register::<Alpha>().unwrap();
        registry.register::<Alpha>().unwrap();
        registry.register::<AlphaImpostor>().unwrap();

        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_forced_collision_is_reported_and_recorded() {
        let registry = TypeIdRegistry::new();
        registry.register::<Alpha>().unwrap();

        let err = registry.register::<ForcedClash>().unwrap_err();
        assert!(matches!(err, RegistryError::Collision { id, .. } if id == Alpha::TYPE_ID));

        // Both registrations are kept and enumerable.
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.collisions(), vec![Alpha::TYPE_ID]);
    }

    #[test]
    fn test_size_lookup() {
        let registry = TypeIdRegistry::new();
        registry.register::<Alpha>().unwrap();

        assert_eq!(registry.size_of(Alpha::NAME), Some(4));
        assert_eq!(registry.size_of("registry_tests::Missing"), None);
    }

    #[test]
    fn test_reset_clears_everything() {
        let registry = TypeIdRegistry::new();
        registry.register::<Alpha>().unwrap();
        registry.reset();

        assert!(registry.is_empty());
        assert!(registry.collisions().is_empty());
    }
}
