//! The universal payload type: a typed property bag keyed by `(traitId, propertyKey)`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A value held by a trait property.
///
/// Closed over the set of primitives the wire contract supports; there is no
/// `List`/`Map` variant because nested structure belongs to a trait schema,
/// not to the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// A typed property bag describing an entity or a calling context's locale.
///
/// A trait identifier present with no properties is still *held*: it appears
/// in [`TraitsData::trait_set`] even if [`TraitsData::trait_property_keys`] is
/// empty for it. Equality is structural over both the trait set and every
/// property value. `Clone` is always a deep copy — mutating a clone never
/// affects the original, since every field is owned.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraitsData {
    traits: BTreeMap<String, BTreeMap<String, PropertyValue>>,
}

impl TraitsData {
    /// Creates an empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a bag already holding the given trait identifiers, each with
    /// no properties set.
    pub fn with_trait_set(trait_set: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut data = Self::new();
        for trait_id in trait_set {
            data.add_trait(trait_id);
        }
        data
    }

    /// Marks `trait_id` as held, without setting any properties.
    ///
    /// A no-op if the trait is already held.
    pub fn add_trait(&mut self, trait_id: impl Into<String>) {
        self.traits.entry(trait_id.into()).or_default();
    }

    /// Marks each of `trait_ids` as held.
    pub fn add_traits(&mut self, trait_ids: impl IntoIterator<Item = impl Into<String>>) {
        for trait_id in trait_ids {
            self.add_trait(trait_id);
        }
    }

    /// Returns whether `trait_id` is held.
    pub fn has_trait(&self, trait_id: &str) -> bool {
        self.traits.contains_key(trait_id)
    }

    /// Returns the set of currently held trait identifiers.
    pub fn trait_set(&self) -> BTreeSet<String> {
        self.traits.keys().cloned().collect()
    }

    /// Sets `property_key` under `trait_id` to `value`, implicitly holding
    /// the trait if it was not already.
    pub fn set_trait_property(
        &mut self,
        trait_id: impl Into<String>,
        property_key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) {
        self.traits
            .entry(trait_id.into())
            .or_default()
            .insert(property_key.into(), value.into());
    }

    /// Returns the value of `property_key` under `trait_id`, or `None` if
    /// either the trait is not held or the property is not set.
    pub fn trait_property(&self, trait_id: &str, property_key: &str) -> Option<&PropertyValue> {
        self.traits.get(trait_id)?.get(property_key)
    }

    /// Returns the property keys set under `trait_id`, or `None` if the
    /// trait is not held.
    pub fn trait_property_keys(&self, trait_id: &str) -> Option<BTreeSet<String>> {
        self.traits
            .get(trait_id)
            .map(|props| props.keys().cloned().collect())
    }
}
