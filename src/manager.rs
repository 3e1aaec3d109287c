//! The host-facing middleware that wraps a [`ManagerInterface`] plug-in and
//! enforces the OpenAssetIO contract on its behalf.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, RwLock};

use crate::access::{DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, RelationsAccess, ResolveAccess};
use crate::batch::{
    project_singular_throwing, project_singular_variant, project_throwing, project_variant,
    run_batch, BatchCallbacks, BatchElement, BatchElementError, BatchOutcome,
};
use crate::capability::{Capability, REQUIRED_CAPABILITIES};
use crate::context::{Context, HostSession};
use crate::entity_reference::EntityReference;
use crate::log::Severity;
use crate::manager_interface::{EntityReferencePagerInterface, ManagerInterface};
use crate::pager::EntityReferencePager;
use crate::traits_data::{PropertyValue, TraitsData};
use crate::utils::error::{
    BatchDispatchError, BatchElementException, ConfigurationError, InitializeError,
    InputValidationError, ManagerInterfaceResult,
};

const PREFIX_INFO_KEY: &str = "openassetio.entityReferencesMatchPrefix";

/// Wraps a [`ManagerInterface`] plug-in, bound to a [`HostSession`], and
/// enforces capability gating, input validation, batch dispatch, and result
/// assembly on its behalf.
///
/// Construction takes owned `Arc`s rather than optional arguments: Rust's
/// type system rules out the "either argument is absent" failure mode the
/// source contract raises a type error for.
pub struct Manager {
    interface: Arc<dyn ManagerInterface>,
    host_session: Arc<HostSession>,
    prefix: RwLock<Option<String>>,
}

impl Manager {
    /// Wraps `interface`, bound to `host_session`. Not usable for entity
    /// operations until [`Manager::initialize`] succeeds.
    pub fn new(interface: Arc<dyn ManagerInterface>, host_session: Arc<HostSession>) -> Self {
        Self {
            interface,
            host_session,
            prefix: RwLock::new(None),
        }
    }

    /// A stable, reverse-DNS-style identifier for the wrapped manager.
    pub fn identifier(&self) -> String {
        self.interface.identifier()
    }

    /// A human-readable name for the wrapped manager.
    pub fn display_name(&self) -> String {
        self.interface.display_name()
    }

    /// Free-form implementation metadata, passed through unchanged.
    pub fn info(&self) -> BTreeMap<String, PropertyValue> {
        self.interface.info()
    }

    /// The manager's current settings.
    pub fn settings(&self) -> ManagerInterfaceResult<BTreeMap<String, PropertyValue>> {
        self.interface.settings(&self.host_session)
    }

    /// Calls `interface.initialize`, then queries the three required
    /// capabilities in the fixed order `entityReferenceIdentification`,
    /// `managementPolicyQueries`, `entityTraitIntrospection`. After success,
    /// re-reads `info()` for the prefix fast-path key.
    pub fn initialize(
        &self,
        settings: BTreeMap<String, PropertyValue>,
    ) -> Result<(), InitializeError> {
        self.interface
            .initialize(settings, &self.host_session)
            .map_err(InitializeError::Interface)?;

        let missing: Vec<&'static str> = REQUIRED_CAPABILITIES
            .into_iter()
            .filter(|capability| !self.interface.has_capability(*capability))
            .map(|capability| capability.name())
            .collect();

        if !missing.is_empty() {
            return Err(InitializeError::Configuration(ConfigurationError {
                identifier: self.identifier(),
                missing: missing.join(", "),
            }));
        }

        self.cache_prefix_from_info();

        Ok(())
    }

    fn cache_prefix_from_info(&self) {
        let Some(value) = self.interface.info().remove(PREFIX_INFO_KEY) else {
            return;
        };

        match value {
            PropertyValue::Str(prefix) => {
                self.host_session.logger().log(
                    Severity::DebugApi,
                    &format!(
                        "Entity reference prefix '{prefix}' provided by manager's info() dict. \
                         Subsequent calls to isEntityReferenceString will use this prefix rather \
                         than call the manager's implementation."
                    ),
                );
                *self.prefix.write().unwrap() = Some(prefix);
            }
            _ => {
                self.host_session.logger().log(
                    Severity::Warning,
                    "Entity reference prefix given but is an invalid type: should be a string.",
                );
            }
        }
    }

    /// Whether the wrapped manager declares `capability`.
    pub fn has_capability(&self, capability: Capability) -> bool {
        self.interface.has_capability(capability)
    }

    /// Whether `s` is a string this manager could have produced as an entity
    /// reference. Served from the cached prefix without calling the
    /// interface when one is cached.
    pub fn is_entity_reference_string(&self, s: &str) -> bool {
        if let Some(prefix) = self.prefix.read().unwrap().as_deref() {
            return s.starts_with(prefix);
        }
        self.interface.is_entity_reference_string(s, &self.host_session)
    }

    /// Validates `s` and wraps it in an [`EntityReference`], failing with an
    /// [`InputValidationError`] if it is not a valid entity reference string.
    pub fn create_entity_reference(
        &self,
        s: String,
    ) -> Result<EntityReference, InputValidationError> {
        if self.is_entity_reference_string(&s) {
            Ok(EntityReference::new_unchecked(s))
        } else {
            Err(InputValidationError::InvalidEntityReference(s))
        }
    }

    /// As [`Manager::create_entity_reference`], but returns `None` instead
    /// of failing.
    pub fn create_entity_reference_if_valid(&self, s: String) -> Option<EntityReference> {
        self.is_entity_reference_string(&s)
            .then(|| EntityReference::new_unchecked(s))
    }

    /// Discards any internal caches.
    pub fn flush_caches(&self) -> ManagerInterfaceResult<()> {
        self.interface.flush_caches(&self.host_session)
    }

    /// Rewrites a copy of `terms`' values according to the manager's
    /// vocabulary. The caller's map is never observably mutated.
    pub fn update_terminology(
        &self,
        terms: &BTreeMap<String, String>,
    ) -> ManagerInterfaceResult<BTreeMap<String, String>> {
        self.interface
            .update_terminology(terms.clone(), &self.host_session)
    }

    /// The declared policy for each of `trait_sets` under `access`.
    pub fn management_policy(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: PolicyAccess,
        context: &Context,
    ) -> ManagerInterfaceResult<Vec<TraitsData>> {
        self.interface
            .management_policy(trait_sets, access, context, &self.host_session)
    }

    // -- Context lifecycle --------------------------------------------------

    /// Creates a new root [`Context`] with an empty locale. Calls
    /// `interface.create_state` only when `statefulContexts` is declared.
    pub fn create_context(&self) -> ManagerInterfaceResult<Context> {
        let mut context = Context::new();
        if self.interface.has_capability(Capability::StatefulContexts) {
            let state = self.interface.create_state(&self.host_session)?;
            context.set_manager_state(Some(state));
        }
        Ok(context)
    }

    /// Produces a new [`Context`] whose locale is a deep copy of `parent`'s,
    /// and whose manager state is obtained from `interface.create_child_state`
    /// only when `parent` has state — otherwise `create_child_state` is not
    /// called and the child has no state either.
    pub fn create_child_context(&self, parent: &Context) -> ManagerInterfaceResult<Context> {
        let mut child = Context::with_locale(parent.locale.clone());
        if let Some(parent_state) = parent.manager_state() {
            let state = self
                .interface
                .create_child_state(parent_state, &self.host_session)?;
            child.set_manager_state(Some(state));
        }
        Ok(child)
    }

    /// Serialises `context`'s manager state to an opaque token, or returns
    /// the empty string without calling the interface if it has none.
    pub fn persistence_token_for_context(
        &self,
        context: &Context,
    ) -> ManagerInterfaceResult<String> {
        match context.manager_state() {
            Some(state) => self
                .interface
                .persistence_token_for_state(state, &self.host_session),
            None => Ok(String::new()),
        }
    }

    /// The inverse of [`Manager::persistence_token_for_context`]. An empty
    /// token produces a stateless [`Context`] without calling the interface.
    pub fn context_from_persistence_token(&self, token: &str) -> ManagerInterfaceResult<Context> {
        if token.is_empty() {
            return Ok(Context::new());
        }
        let state = self
            .interface
            .state_from_persistence_token(token, &self.host_session)?;
        let mut context = Context::new();
        context.set_manager_state(Some(state));
        Ok(context)
    }

    // -- resolve --------------------------------------------------------

    /// Callback form of `resolve`.
    pub fn resolve_with_callback(
        &self,
        references: &[EntityReference],
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
        callbacks: &mut BatchCallbacks<'_, TraitsData>,
    ) -> ManagerInterfaceResult<()> {
        self.interface
            .resolve(references, trait_set, access, context, &self.host_session, callbacks)
    }

    fn resolve_results(
        &self,
        references: &[EntityReference],
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
    ) -> ManagerInterfaceResult<BatchOutcome<TraitsData>> {
        run_batch(references.len(), |callbacks| {
            self.resolve_with_callback(references, trait_set, access, context, callbacks)
        })
    }

    /// Batch-throwing form of `resolve`.
    pub fn resolve(
        &self,
        references: &[EntityReference],
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
    ) -> Result<Vec<TraitsData>, BatchDispatchError> {
        let outcome = self.resolve_results(references, trait_set, access, context)?;
        Ok(project_throwing(outcome, Some(access.name()), &reference_strings(references))?)
    }

    /// Batch-variant form of `resolve`.
    pub fn resolve_variant(
        &self,
        references: &[EntityReference],
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<TraitsData>>, BatchDispatchError> {
        let outcome = self.resolve_results(references, trait_set, access, context)?;
        Ok(project_variant(outcome.results))
    }

    /// Singular throwing form of `resolve`: wraps `reference` in a length-1
    /// list and forwards, exactly as the batch form would.
    pub fn resolve_singular(
        &self,
        reference: &EntityReference,
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
    ) -> Result<TraitsData, BatchDispatchError> {
        let references = [reference.clone()];
        let outcome = self.resolve_results(&references, trait_set, access, context)?;
        Ok(project_singular_throwing(outcome, Some(access.name()), Some(reference.to_string()))?)
    }

    /// Singular variant form of `resolve`.
    pub fn resolve_singular_variant(
        &self,
        reference: &EntityReference,
        trait_set: &BTreeSet<String>,
        access: ResolveAccess,
        context: &Context,
    ) -> Result<BatchElement<TraitsData>, BatchDispatchError> {
        let references = [reference.clone()];
        let outcome = self.resolve_results(&references, trait_set, access, context)?;
        Ok(project_singular_variant(outcome))
    }

    // -- entityExists -----------------------------------------------------

    pub fn entity_exists_with_callback(
        &self,
        references: &[EntityReference],
        context: &Context,
        callbacks: &mut BatchCallbacks<'_, bool>,
    ) -> ManagerInterfaceResult<()> {
        self.interface
            .entity_exists(references, context, &self.host_session, callbacks)
    }

    fn entity_exists_results(
        &self,
        references: &[EntityReference],
        context: &Context,
    ) -> ManagerInterfaceResult<BatchOutcome<bool>> {
        run_batch(references.len(), |callbacks| {
            self.entity_exists_with_callback(references, context, callbacks)
        })
    }

    pub fn entity_exists(
        &self,
        references: &[EntityReference],
        context: &Context,
    ) -> Result<Vec<bool>, BatchDispatchError> {
        let outcome = self.entity_exists_results(references, context)?;
        Ok(project_throwing(outcome, None, &reference_strings(references))?)
    }

    pub fn entity_exists_variant(
        &self,
        references: &[EntityReference],
        context: &Context,
    ) -> Result<Vec<BatchElement<bool>>, BatchDispatchError> {
        let outcome = self.entity_exists_results(references, context)?;
        Ok(project_variant(outcome.results))
    }

    pub fn entity_exists_singular(
        &self,
        reference: &EntityReference,
        context: &Context,
    ) -> Result<bool, BatchDispatchError> {
        let references = [reference.clone()];
        let outcome = self.entity_exists_results(&references, context)?;
        Ok(project_singular_throwing(outcome, None, Some(reference.to_string()))?)
    }

    pub fn entity_exists_singular_variant(
        &self,
        reference: &EntityReference,
        context: &Context,
    ) -> Result<BatchElement<bool>, BatchDispatchError> {
        let references = [reference.clone()];
        let outcome = self.entity_exists_results(&references, context)?;
        Ok(project_singular_variant(outcome))
    }

    // -- preflight / register ---------------------------------------------

    fn check_publishing_lengths(
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        mismatch: impl Fn(usize, usize) -> InputValidationError,
    ) -> Result<(), InputValidationError> {
        if references.len() != traits_datas.len() {
            return Err(mismatch(references.len(), traits_datas.len()));
        }
        Ok(())
    }

    pub fn preflight_with_callback(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
        callbacks: &mut BatchCallbacks<'_, EntityReference>,
    ) -> ManagerInterfaceResult<()> {
        self.interface.preflight(
            references,
            traits_datas,
            access,
            context,
            &self.host_session,
            callbacks,
        )
    }

    fn preflight_results(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
    ) -> ManagerInterfaceResult<BatchOutcome<EntityReference>> {
        run_batch(references.len(), |callbacks| {
            self.preflight_with_callback(references, traits_datas, access, context, callbacks)
        })
    }

    /// Batch-throwing form of `preflight`. Fails synchronously if
    /// `references` and `traits_datas` differ in length.
    pub fn preflight(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<EntityReference>, BatchDispatchError> {
        Self::check_publishing_lengths(references, traits_datas, |refs, data| {
            InputValidationError::PreflightLengthMismatch { refs, data }
        })?;
        let outcome = self.preflight_results(references, traits_datas, access, context)?;
        Ok(project_throwing(outcome, Some(access.name()), &reference_strings(references))?)
    }

    /// Batch-variant form of `preflight`.
    pub fn preflight_variant(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<EntityReference>>, BatchDispatchError> {
        Self::check_publishing_lengths(references, traits_datas, |refs, data| {
            InputValidationError::PreflightLengthMismatch { refs, data }
        })?;
        let outcome = self.preflight_results(references, traits_datas, access, context)?;
        Ok(project_variant(outcome.results))
    }

    /// Singular throwing form of `preflight`: wraps `reference`/`data` in
    /// length-1 lists and forwards, exactly as the batch form would.
    pub fn preflight_singular(
        &self,
        reference: &EntityReference,
        data: &TraitsData,
        access: PublishingAccess,
        context: &Context,
    ) -> Result<EntityReference, BatchDispatchError> {
        let references = [reference.clone()];
        let traits_datas = [data.clone()];
        let outcome = self.preflight_results(&references, &traits_datas, access, context)?;
        Ok(project_singular_throwing(outcome, Some(access.name()), Some(reference.to_string()))?)
    }

    /// Singular variant form of `preflight`.
    pub fn preflight_singular_variant(
        &self,
        reference: &EntityReference,
        data: &TraitsData,
        access: PublishingAccess,
        context: &Context,
    ) -> Result<BatchElement<EntityReference>, BatchDispatchError> {
        let references = [reference.clone()];
        let traits_datas = [data.clone()];
        let outcome = self.preflight_results(&references, &traits_datas, access, context)?;
        Ok(project_singular_variant(outcome))
    }

    pub fn register_with_callback(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
        callbacks: &mut BatchCallbacks<'_, EntityReference>,
    ) -> ManagerInterfaceResult<()> {
        self.interface.register(
            references,
            traits_datas,
            access,
            context,
            &self.host_session,
            callbacks,
        )
    }

    fn register_results(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
    ) -> ManagerInterfaceResult<BatchOutcome<EntityReference>> {
        run_batch(references.len(), |callbacks| {
            self.register_with_callback(references, traits_datas, access, context, callbacks)
        })
    }

    /// Batch-throwing form of `register`. Fails synchronously if
    /// `references` and `traits_datas` differ in length.
    pub fn register(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<EntityReference>, BatchDispatchError> {
        Self::check_publishing_lengths(references, traits_datas, |refs, data| {
            InputValidationError::RegisterLengthMismatch { refs, data }
        })?;
        let outcome = self.register_results(references, traits_datas, access, context)?;
        Ok(project_throwing(outcome, Some(access.name()), &reference_strings(references))?)
    }

    /// Batch-variant form of `register`.
    pub fn register_variant(
        &self,
        references: &[EntityReference],
        traits_datas: &[TraitsData],
        access: PublishingAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<EntityReference>>, BatchDispatchError> {
        Self::check_publishing_lengths(references, traits_datas, |refs, data| {
            InputValidationError::RegisterLengthMismatch { refs, data }
        })?;
        let outcome = self.register_results(references, traits_datas, access, context)?;
        Ok(project_variant(outcome.results))
    }

    /// Singular throwing form of `register`: wraps `reference`/`data` in
    /// length-1 lists and forwards, exactly as the batch form would.
    pub fn register_singular(
        &self,
        reference: &EntityReference,
        data: &TraitsData,
        access: PublishingAccess,
        context: &Context,
    ) -> Result<EntityReference, BatchDispatchError> {
        let references = [reference.clone()];
        let traits_datas = [data.clone()];
        let outcome = self.register_results(&references, &traits_datas, access, context)?;
        Ok(project_singular_throwing(outcome, Some(access.name()), Some(reference.to_string()))?)
    }

    /// Singular variant form of `register`.
    pub fn register_singular_variant(
        &self,
        reference: &EntityReference,
        data: &TraitsData,
        access: PublishingAccess,
        context: &Context,
    ) -> Result<BatchElement<EntityReference>, BatchDispatchError> {
        let references = [reference.clone()];
        let traits_datas = [data.clone()];
        let outcome = self.register_results(&references, &traits_datas, access, context)?;
        Ok(project_singular_variant(outcome))
    }

    // -- defaultEntityReference --------------------------------------------

    pub fn default_entity_reference_with_callback(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: DefaultEntityAccess,
        context: &Context,
        callbacks: &mut BatchCallbacks<'_, Option<EntityReference>>,
    ) -> ManagerInterfaceResult<()> {
        self.interface
            .default_entity_reference(trait_sets, access, context, &self.host_session, callbacks)
    }

    fn default_entity_reference_results(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: DefaultEntityAccess,
        context: &Context,
    ) -> ManagerInterfaceResult<BatchOutcome<Option<EntityReference>>> {
        run_batch(trait_sets.len(), |callbacks| {
            self.default_entity_reference_with_callback(trait_sets, access, context, callbacks)
        })
    }

    pub fn default_entity_reference(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<Vec<Option<EntityReference>>, BatchDispatchError> {
        let outcome = self.default_entity_reference_results(trait_sets, access, context)?;
        Ok(project_throwing(outcome, Some(access.name()), &[])?)
    }

    pub fn default_entity_reference_variant(
        &self,
        trait_sets: &[BTreeSet<String>],
        access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<Option<EntityReference>>>, BatchDispatchError> {
        let outcome = self.default_entity_reference_results(trait_sets, access, context)?;
        Ok(project_variant(outcome.results))
    }

    /// Singular throwing form of `defaultEntityReference`: wraps `trait_set`
    /// in a length-1 list and forwards, exactly as the batch form would.
    pub fn default_entity_reference_singular(
        &self,
        trait_set: &BTreeSet<String>,
        access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<Option<EntityReference>, BatchDispatchError> {
        let trait_sets = [trait_set.clone()];
        let outcome = self.default_entity_reference_results(&trait_sets, access, context)?;
        Ok(project_singular_throwing(outcome, Some(access.name()), None)?)
    }

    /// Singular variant form of `defaultEntityReference`.
    pub fn default_entity_reference_singular_variant(
        &self,
        trait_set: &BTreeSet<String>,
        access: DefaultEntityAccess,
        context: &Context,
    ) -> Result<BatchElement<Option<EntityReference>>, BatchDispatchError> {
        let trait_sets = [trait_set.clone()];
        let outcome = self.default_entity_reference_results(&trait_sets, access, context)?;
        Ok(project_singular_variant(outcome))
    }

    // -- entityTraits -------------------------------------------------------

    pub fn entity_traits_with_callback(
        &self,
        references: &[EntityReference],
        access: EntityTraitsAccess,
        context: &Context,
        callbacks: &mut BatchCallbacks<'_, BTreeSet<String>>,
    ) -> ManagerInterfaceResult<()> {
        self.interface
            .entity_traits(references, access, context, &self.host_session, callbacks)
    }

    fn entity_traits_results(
        &self,
        references: &[EntityReference],
        access: EntityTraitsAccess,
        context: &Context,
    ) -> ManagerInterfaceResult<BatchOutcome<BTreeSet<String>>> {
        run_batch(references.len(), |callbacks| {
            self.entity_traits_with_callback(references, access, context, callbacks)
        })
    }

    pub fn entity_traits(
        &self,
        references: &[EntityReference],
        access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<Vec<BTreeSet<String>>, BatchDispatchError> {
        let outcome = self.entity_traits_results(references, access, context)?;
        Ok(project_throwing(outcome, Some(access.name()), &reference_strings(references))?)
    }

    pub fn entity_traits_variant(
        &self,
        references: &[EntityReference],
        access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<BTreeSet<String>>>, BatchDispatchError> {
        let outcome = self.entity_traits_results(references, access, context)?;
        Ok(project_variant(outcome.results))
    }

    /// Singular throwing form of `entityTraits`: wraps `reference` in a
    /// length-1 list and forwards, exactly as the batch form would.
    pub fn entity_traits_singular(
        &self,
        reference: &EntityReference,
        access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<BTreeSet<String>, BatchDispatchError> {
        let references = [reference.clone()];
        let outcome = self.entity_traits_results(&references, access, context)?;
        Ok(project_singular_throwing(outcome, Some(access.name()), Some(reference.to_string()))?)
    }

    /// Singular variant form of `entityTraits`.
    pub fn entity_traits_singular_variant(
        &self,
        reference: &EntityReference,
        access: EntityTraitsAccess,
        context: &Context,
    ) -> Result<BatchElement<BTreeSet<String>>, BatchDispatchError> {
        let references = [reference.clone()];
        let outcome = self.entity_traits_results(&references, access, context)?;
        Ok(project_singular_variant(outcome))
    }

    // -- getWithRelationship(s) ---------------------------------------------

    fn wrap_pagers(
        &self,
        results: Vec<Result<Arc<dyn EntityReferencePagerInterface>, BatchElementError>>,
    ) -> Vec<Result<EntityReferencePager, BatchElementError>> {
        let host_session = Arc::new(HostSession::new(
            Arc::clone(self.host_session.host()),
            Arc::clone(self.host_session.logger()),
        ));
        results
            .into_iter()
            .map(|result| {
                result.map(|interface| EntityReferencePager::new(interface, Arc::clone(&host_session)))
            })
            .collect()
    }

    /// Batch-variant form of `getWithRelationship`: one relationship trait
    /// set shared by every input reference. There is no throwing form in
    /// this middleware — pagers are too stateful a result to discard on the
    /// first per-element error, so callers always receive the full variant
    /// vector.
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationship(
        &self,
        references: &[EntityReference],
        relationship_trait_set: &TraitsData,
        page_size: usize,
        result_trait_set: &BTreeSet<String>,
        access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<EntityReferencePager>>, BatchDispatchError> {
        if page_size == 0 {
            return Err(InputValidationError::ZeroPageSize.into());
        }

        let references = references.to_vec();
        let relationship_trait_set = relationship_trait_set.clone();
        let result_trait_set = result_trait_set.clone();
        let context = context.clone();

        let outcome = run_batch(references.len(), |callbacks| {
            self.interface.get_with_relationship(
                &references,
                &relationship_trait_set,
                page_size,
                &result_trait_set,
                access,
                &context,
                &self.host_session,
                callbacks,
            )
        })?;

        Ok(project_variant(self.wrap_pagers(outcome.results)))
    }

    /// As [`Manager::get_with_relationship`], but with a distinct
    /// relationship trait set per input reference.
    #[allow(clippy::too_many_arguments)]
    pub fn get_with_relationships(
        &self,
        references: &[EntityReference],
        relationship_trait_sets: &[TraitsData],
        page_size: usize,
        result_trait_set: &BTreeSet<String>,
        access: RelationsAccess,
        context: &Context,
    ) -> Result<Vec<BatchElement<EntityReferencePager>>, BatchDispatchError> {
        if page_size == 0 {
            return Err(InputValidationError::ZeroPageSize.into());
        }

        let references_owned = references.to_vec();
        let relationship_trait_sets = relationship_trait_sets.to_vec();
        let result_trait_set = result_trait_set.clone();
        let context = context.clone();

        let outcome = run_batch(references.len(), |callbacks| {
            self.interface.get_with_relationships(
                &references_owned,
                &relationship_trait_sets,
                page_size,
                &result_trait_set,
                access,
                &context,
                &self.host_session,
                callbacks,
            )
        })?;

        Ok(project_variant(self.wrap_pagers(outcome.results)))
    }
}

fn reference_strings(references: &[EntityReference]) -> Vec<String> {
    references.iter().map(|r| r.to_string()).collect()
}
