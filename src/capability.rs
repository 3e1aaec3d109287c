//! The closed capability set mirrored one-for-one between [`crate::manager::Manager`]
//! and [`crate::manager_interface::ManagerInterface`].

use std::fmt::Display;

/// A declared feature of a manager implementation.
///
/// Ordered as listed in the data model: the three [`Capability::is_required`]
/// capabilities come last, queried in that exact order by
/// [`crate::manager::Manager::initialize`] — the enum's declaration order here
/// matches the full closed set, not the query order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    StatefulContexts,
    CustomTerminology,
    Resolution,
    Publishing,
    RelationshipQueries,
    ExistenceQueries,
    DefaultEntityReferences,
    EntityReferenceIdentification,
    ManagementPolicyQueries,
    EntityTraitIntrospection,
}

/// The capabilities a manager must declare for [`crate::manager::Manager::initialize`]
/// to succeed, in the fixed order they are queried.
pub const REQUIRED_CAPABILITIES: [Capability; 3] = [
    Capability::EntityReferenceIdentification,
    Capability::ManagementPolicyQueries,
    Capability::EntityTraitIntrospection,
];

impl Capability {
    /// The name used to identify this capability in configuration-error messages.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::StatefulContexts => "statefulContexts",
            Capability::CustomTerminology => "customTerminology",
            Capability::Resolution => "resolution",
            Capability::Publishing => "publishing",
            Capability::RelationshipQueries => "relationshipQueries",
            Capability::ExistenceQueries => "existenceQueries",
            Capability::DefaultEntityReferences => "defaultEntityReferences",
            Capability::EntityReferenceIdentification => "entityReferenceIdentification",
            Capability::ManagementPolicyQueries => "managementPolicyQueries",
            Capability::EntityTraitIntrospection => "entityTraitIntrospection",
        }
    }

    /// Whether `initialize` requires this capability to be present.
    pub fn is_required(&self) -> bool {
        REQUIRED_CAPABILITIES.contains(self)
    }
}

impl Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
