//! The plug-in contract consumed by the [`crate::manager::Manager`] façade.

use std::collections::BTreeSet;

use crate::access::{
    DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, RelationsAccess,
    ResolveAccess,
};
use crate::batch::BatchCallbacks;
use crate::capability::Capability;
use crate::context::{Context, HostSession};
use crate::entity_reference::EntityReference;
use crate::traits_data::{PropertyValue, TraitsData};
use crate::context::ManagerStateBase;
use crate::utils::error::ManagerInterfaceResult;
use std::sync::Arc;

/// For each Manager operation, the correspondingly-named interface method the
/// façade dispatches to.
///
/// Every method takes the same input containers as its façade counterpart,
/// the access-mode enum where applicable, the [`Context`], and the
/// [`HostSession`] appended; batched methods additionally take a
/// [`BatchCallbacks`] appended last, through which the implementation reports
/// `(index, value)` or `(index, error)` for each input, in any order, zero or
/// more times per call.
pub trait ManagerInterface: Send + Sync {
    /// A stable, reverse-DNS-style identifier for this manager implementation.
    fn identifier(&self) -> String;

    /// A human-readable name for this manager implementation.
    fn display_name(&self) -> String;

    /// Free-form implementation metadata. The key
    /// `openassetio.entityReferencesMatchPrefix` is recognised by the façade
    /// during `initialize` to enable the prefix fast path.
    fn info(&self) -> std::collections::BTreeMap<String, PropertyValue> {
        Default::default()
    }

    /// Manager-defined settings, round-tripped through `initialize`.
    fn settings(
        &self,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<std::collections::BTreeMap<String, PropertyValue>>;

    /// Called once before any other method (other than `identifier`/`display_name`)
    /// may be used. `settings` is the same shape `settings()` would later return.
    fn initialize(
        &self,
        settings: std::collections::BTreeMap<String, PropertyValue>,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<()>;

    /// Discards any internal caches. Never fails by contract; plug-ins should
    /// make a best effort.
    fn flush_caches(&self, host_session: &HostSession) -> ManagerInterfaceResult<()>;

    /// Rewrites a copy of `terms`' values according to the manager's own
    /// vocabulary. Must not observably mutate the caller's map.
    fn update_terminology(
        &self,
        terms: std::collections::BTreeMap<String, String>,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<std::collections::BTreeMap<String, String>>;

    /// Whether this implementation declares `capability`.
    fn has_capability(&self, capability: Capability) -> bool;

    /// Whether `s` is a string this manager could have produced as an entity
    /// reference. Consulted by the façade only when no prefix fast-path is
    /// cached.
    fn is_entity_reference_string(&self, s: &str, host_session: &HostSession) -> bool;

    /// Produces a fresh opaque manager state for a new root [`Context`].
    /// Only called when the manager declares `statefulContexts`.
    fn create_state(
        &self,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<Arc<dyn ManagerStateBase>>;

    /// Produces a manager state for a context derived from `parent`. Only
    /// called when the parent context already has state.
    fn create_child_state(
        &self,
        parent: &Arc<dyn ManagerStateBase>,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<Arc<dyn ManagerStateBase>>;

    /// Serialises `state` to an opaque token a later process can exchange
    /// back for an equivalent state via `state_from_persistence_token`.
    fn persistence_token_for_state(
        &self,
        state: &Arc<dyn ManagerStateBase>,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<String>;

    /// The inverse of `persistence_token_for_state`. Never called with an
    /// empty token; the façade treats an empty token as "no state" itself.
    fn state_from_persistence_token(
        &self,
        token: &str,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<Arc<dyn ManagerStateBase>>;

    /// The declared policy for each of `trait_sets`, describing what the
    /// manager supports for entities of that kind under `access`.
    fn management_policy(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: PolicyAccess,
        context: &Context,
        host_session: &HostSession,
    ) -> ManagerInterfaceResult<Vec<TraitsData>>;

    /// Resolves `references` to the properties named by `trait_set`.
    fn resolve(
        &self,
        references: &[EntityReference],
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, TraitsData>,
    ) -> ManagerInterfaceResult<()>;

    /// Checks whether each of `references` currently addresses an entity.
    fn entity_exists(
        &self,
        references: &[EntityReference],
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, bool>,
    ) -> ManagerInterfaceResult<()>;

    /// Prepares each of `references` for eventual `register`, returning a
    /// (possibly adjusted) working reference to publish under.
    fn preflight(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, EntityReference>,
    ) -> ManagerInterfaceResult<()>;

    /// Publishes `traits_datas` against `references`, returning the final
    /// entity reference for each.
    fn register(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, EntityReference>,
    ) -> ManagerInterfaceResult<()>;

    /// The default entity reference, if any, for each of `trait_sets`.
    fn default_entity_reference(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: DefaultEntityAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, Option<EntityReference>>,
    ) -> ManagerInterfaceResult<()>;

    /// The full trait set held by each of `references`.
    fn entity_traits(
        &self,
        references: &[EntityReference],
        access: EntityTraitsAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, BTreeSet<String>>,
    ) -> ManagerInterfaceResult<()>;

    /// A pager of entities related to each of `references` by
    /// `relationship_trait_set`.
    #[allow(clippy::too_many_arguments)]
    fn get_with_relationship(
        &self,
        references: &[EntityReference],
        relationship_trait_set: &TraitsData,
        page_size: usize,
        result_trait_set: &BTreeSet<String>,
        access: RelationsAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, Arc<dyn EntityReferencePagerInterface>>,
    ) -> ManagerInterfaceResult<()>;

    /// As [`ManagerInterface::get_with_relationship`], but with a distinct
    /// relationship trait set per input reference.
    #[allow(clippy::too_many_arguments)]
    fn get_with_relationships(
        &self,
        references: &[EntityReference],
        relationship_trait_sets: &[TraitsData],
        page_size: usize,
        result_trait_set: &BTreeSet<String>,
        access: RelationsAccess,
        context: &Context,
        host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, Arc<dyn EntityReferencePagerInterface>>,
    ) -> ManagerInterfaceResult<()>;
}

/// The plug-in side of a paged relationship-query cursor.
///
/// Wrapped by [`crate::pager::EntityReferencePager`], which is responsible
/// for keeping an `Arc` to this trait object alive for as long as any
/// wrapper handle remains reachable.
pub trait EntityReferencePagerInterface: Send + Sync {
    /// Whether `next` would advance to another page.
    fn has_next(&self, host_session: &HostSession) -> ManagerInterfaceResult<bool>;

    /// The entity references on the current page.
    fn get(&self, host_session: &HostSession) -> ManagerInterfaceResult<Vec<EntityReference>>;

    /// Advances to the next page.
    fn next(&self, host_session: &HostSession) -> ManagerInterfaceResult<()>;
}
