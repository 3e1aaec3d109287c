use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, RwLock};

use openassetio_core_rs::access::{
    DefaultEntityAccess, EntityTraitsAccess, PolicyAccess, PublishingAccess, RelationsAccess,
    ResolveAccess,
};
use openassetio_core_rs::batch::{BatchCallbacks, BatchElementError};
use openassetio_core_rs::capability::Capability;
use openassetio_core_rs::context::{Context, HostSession, ManagerStateBase};
use openassetio_core_rs::entity_reference::EntityReference;
use openassetio_core_rs::manager_interface::{EntityReferencePagerInterface, ManagerInterface};
use openassetio_core_rs::traits_data::{PropertyValue, TraitsData};
use openassetio_core_rs::utils::ManagerInterfaceResult;

const ALL_CAPABILITIES: [Capability; 10] = [
    Capability::StatefulContexts,
    Capability::CustomTerminology,
    Capability::Resolution,
    Capability::Publishing,
    Capability::RelationshipQueries,
    Capability::ExistenceQueries,
    Capability::DefaultEntityReferences,
    Capability::EntityReferenceIdentification,
    Capability::ManagementPolicyQueries,
    Capability::EntityTraitIntrospection,
];

/// What a single scripted batch callback delivery should report.
pub enum ScriptedOutcome<T> {
    Success(T),
    Error(BatchElementError),
}

/// The manager-state payload produced by [`StubManagerInterface`].
#[derive(Debug, PartialEq)]
pub struct StubState(pub u32);

struct StubPager;

impl EntityReferencePagerInterface for StubPager {
    fn has_next(&self, _host_session: &HostSession) -> ManagerInterfaceResult<bool> {
        Ok(false)
    }

    fn get(&self, _host_session: &HostSession) -> ManagerInterfaceResult<Vec<EntityReference>> {
        Ok(Vec::new())
    }

    fn next(&self, _host_session: &HostSession) -> ManagerInterfaceResult<()> {
        Ok(())
    }
}

/// A configurable `ManagerInterface` test double.
///
/// Each end-to-end scenario in the spec dials in a different slice of
/// behaviour (which capabilities are declared, what `info()` returns, what
/// order batched callbacks fire in) — a single fixed no-op stand-in can't
/// cover all of them, so this one is built around interior-mutable scripts
/// and a call log instead.
pub struct StubManagerInterface {
    identifier: String,
    capabilities: RwLock<BTreeSet<Capability>>,
    info: Mutex<BTreeMap<String, PropertyValue>>,
    calls: Mutex<Vec<String>>,
    resolve_script: Mutex<Vec<(usize, ScriptedOutcome<TraitsData>)>>,
    register_script: Mutex<Vec<(usize, ScriptedOutcome<EntityReference>)>>,
    reference_prefix: Mutex<String>,
    create_child_state_calls: Mutex<u32>,
}

impl StubManagerInterface {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            capabilities: RwLock::new(ALL_CAPABILITIES.into_iter().collect()),
            info: Mutex::new(BTreeMap::new()),
            calls: Mutex::new(Vec::new()),
            resolve_script: Mutex::new(Vec::new()),
            register_script: Mutex::new(Vec::new()),
            reference_prefix: Mutex::new("asset://".to_string()),
            create_child_state_calls: Mutex::new(0),
        }
    }

    pub fn remove_capability(&self, capability: Capability) {
        self.capabilities.write().unwrap().remove(&capability);
    }

    pub fn set_info(&self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        self.info.lock().unwrap().insert(key.into(), value.into());
    }

    pub fn script_resolve(&self, script: Vec<(usize, ScriptedOutcome<TraitsData>)>) {
        *self.resolve_script.lock().unwrap() = script;
    }

    pub fn script_register(&self, script: Vec<(usize, ScriptedOutcome<EntityReference>)>) {
        *self.register_script.lock().unwrap() = script;
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn create_child_state_call_count(&self) -> u32 {
        *self.create_child_state_calls.lock().unwrap()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

impl ManagerInterface for StubManagerInterface {
    fn identifier(&self) -> String {
        self.identifier.clone()
    }

    fn display_name(&self) -> String {
        format!("Stub Manager ({})", self.identifier)
    }

    fn info(&self) -> BTreeMap<String, PropertyValue> {
        self.info.lock().unwrap().clone()
    }

    fn settings(
        &self,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<BTreeMap<String, PropertyValue>> {
        Ok(BTreeMap::new())
    }

    fn initialize(
        &self,
        _settings: BTreeMap<String, PropertyValue>,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<()> {
        self.record("initialize");
        Ok(())
    }

    fn flush_caches(&self, _host_session: &HostSession) -> ManagerInterfaceResult<()> {
        Ok(())
    }

    fn update_terminology(
        &self,
        terms: BTreeMap<String, String>,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<BTreeMap<String, String>> {
        Ok(terms)
    }

    fn has_capability(&self, capability: Capability) -> bool {
        self.record(format!("has_capability:{}", capability.name()));
        self.capabilities.read().unwrap().contains(&capability)
    }

    fn is_entity_reference_string(&self, s: &str, _host_session: &HostSession) -> bool {
        self.record("is_entity_reference_string");
        s.starts_with(self.reference_prefix.lock().unwrap().as_str())
    }

    fn create_state(
        &self,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<Arc<dyn ManagerStateBase>> {
        self.record("create_state");
        Ok(Arc::new(StubState(0)))
    }

    fn create_child_state(
        &self,
        parent: &Arc<dyn ManagerStateBase>,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<Arc<dyn ManagerStateBase>> {
        *self.create_child_state_calls.lock().unwrap() += 1;
        let parent = parent
            .as_any()
            .downcast_ref::<StubState>()
            .expect("parent state is always a StubState in these tests");
        Ok(Arc::new(StubState(parent.0 + 1)))
    }

    fn persistence_token_for_state(
        &self,
        state: &Arc<dyn ManagerStateBase>,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<String> {
        let state = state
            .as_any()
            .downcast_ref::<StubState>()
            .expect("state is always a StubState in these tests");
        Ok(format!("token:{}", state.0))
    }

    fn state_from_persistence_token(
        &self,
        token: &str,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<Arc<dyn ManagerStateBase>> {
        let value: u32 = token
            .strip_prefix("token:")
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| format!("malformed persistence token: {token}"))?;
        Ok(Arc::new(StubState(value)))
    }

    fn management_policy(
        &self,
        trait_sets: &[BTreeSet<String>],
        _access: PolicyAccess,
        _context: &Context,
        _host_session: &HostSession,
    ) -> ManagerInterfaceResult<Vec<TraitsData>> {
        Ok(trait_sets.iter().map(|_| TraitsData::new()).collect())
    }

    fn resolve(
        &self,
        references: &[EntityReference],
        _trait_set: &BTreeSet<String>,
        _access: ResolveAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, TraitsData>,
    ) -> ManagerInterfaceResult<()> {
        let script = std::mem::take(&mut *self.resolve_script.lock().unwrap());
        if script.is_empty() {
            for index in 0..references.len() {
                callbacks.success(index, TraitsData::new());
            }
        } else {
            for (index, outcome) in script {
                match outcome {
                    ScriptedOutcome::Success(value) => callbacks.success(index, value),
                    ScriptedOutcome::Error(error) => callbacks.error(index, error),
                }
            }
        }
        Ok(())
    }

    fn entity_exists(
        &self,
        references: &[EntityReference],
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, bool>,
    ) -> ManagerInterfaceResult<()> {
        for index in 0..references.len() {
            callbacks.success(index, true);
        }
        Ok(())
    }

    fn preflight(
        &self,
        references: &[EntityReference],
        _traits_datas: &[TraitsData],
        _access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, EntityReference>,
    ) -> ManagerInterfaceResult<()> {
        for (index, reference) in references.iter().enumerate() {
            callbacks.success(index, reference.clone());
        }
        Ok(())
    }

    fn register(
        &self,
        references: &[EntityReference],
        _traits_datas: &[TraitsData],
        _access: PublishingAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, EntityReference>,
    ) -> ManagerInterfaceResult<()> {
        let script = std::mem::take(&mut *self.register_script.lock().unwrap());
        if script.is_empty() {
            for (index, reference) in references.iter().enumerate() {
                callbacks.success(index, reference.clone());
            }
        } else {
            for (index, outcome) in script {
                match outcome {
                    ScriptedOutcome::Success(value) => callbacks.success(index, value),
                    ScriptedOutcome::Error(error) => callbacks.error(index, error),
                }
            }
        }
        Ok(())
    }

    fn default_entity_reference(
        &self,
        trait_sets: &[BTreeSet<String>],
        _access: DefaultEntityAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, Option<EntityReference>>,
    ) -> ManagerInterfaceResult<()> {
        for index in 0..trait_sets.len() {
            callbacks.success(index, None);
        }
        Ok(())
    }

    fn entity_traits(
        &self,
        references: &[EntityReference],
        _access: EntityTraitsAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, BTreeSet<String>>,
    ) -> ManagerInterfaceResult<()> {
        for index in 0..references.len() {
            callbacks.success(index, BTreeSet::new());
        }
        Ok(())
    }

    fn get_with_relationship(
        &self,
        references: &[EntityReference],
        _relationship_trait_set: &TraitsData,
        _page_size: usize,
        _result_trait_set: &BTreeSet<String>,
        _access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, Arc<dyn EntityReferencePagerInterface>>,
    ) -> ManagerInterfaceResult<()> {
        for index in 0..references.len() {
            callbacks.success(index, Arc::new(StubPager));
        }
        Ok(())
    }

    fn get_with_relationships(
        &self,
        references: &[EntityReference],
        _relationship_trait_sets: &[TraitsData],
        _page_size: usize,
        _result_trait_set: &BTreeSet<String>,
        _access: RelationsAccess,
        _context: &Context,
        _host_session: &HostSession,
        callbacks: &mut BatchCallbacks<'_, Arc<dyn EntityReferencePagerInterface>>,
    ) -> ManagerInterfaceResult<()> {
        for index in 0..references.len() {
            callbacks.success(index, Arc::new(StubPager));
        }
        Ok(())
    }
}
