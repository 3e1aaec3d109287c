//! A thin, validated newtype wrapping an entity reference string.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// An opaque, manager-defined string identifying an entity.
///
/// The only safe way to construct one is
/// [`crate::manager::Manager::create_entity_reference`] (or
/// [`crate::manager::Manager::create_entity_reference_if_valid`]), both of
/// which check the string against the manager's `isEntityReferenceString`
/// predicate first. [`EntityReference::new_unchecked`] exists for the rare
/// case where that check has already been performed by the caller through
/// some other path, and is documented as such rather than removed.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityReference(String);

impl EntityReference {
    /// Constructs an `EntityReference` without checking `s` against any
    /// manager's `isEntityReferenceString` predicate.
    ///
    /// # Safety (contractual, not memory-unsafety)
    ///
    /// Callers must independently guarantee that `s` has already been
    /// validated by the manager that will receive it. Prefer
    /// `Manager::create_entity_reference[_if_valid]`.
    pub fn new_unchecked(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Returns the wrapped string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the reference, returning the wrapped string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl Display for EntityReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for EntityReference {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_as_str() {
        let reference = EntityReference::new_unchecked("asset://foo");
        assert_eq!(reference.as_str(), "asset://foo");
        assert_eq!(reference.to_string(), "asset://foo");
    }
}
