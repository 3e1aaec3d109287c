//! Context and manager-state lifecycle, and the host-supplied session pair
//! threaded through every call.

use std::any::Any;
use std::fmt::Debug;
use std::sync::Arc;

use crate::log::Logger;
use crate::traits_data::TraitsData;

/// An opaque, manager-owned value embedded in a [`Context`].
///
/// The core never inspects a manager state's concrete type; it only ever
/// moves it between interface calls. Modeled as a type-erased owned handle
/// (design notes §9) rather than any specific payload, so host and manager
/// may disagree about the concrete type without coupling. A manager
/// implementation written in Rust recovers its own state via
/// [`std::any::Any`]'s downcast methods on the boxed trait object.
pub trait ManagerStateBase: Any + Debug + Send + Sync {
    /// Upcasts to `&dyn Any` so concrete manager implementations can
    /// downcast their own state back out.
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any + Debug + Send + Sync> ManagerStateBase for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Caller-scoped state carried through a sequence of related manager calls.
///
/// Produced by [`crate::manager::Manager::create_context`] and
/// [`crate::manager::Manager::create_child_context`]. `locale` describes the
/// calling site; `manager_state` is opaque and absent unless the manager
/// declares the `statefulContexts` capability.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub locale: TraitsData,
    manager_state: Option<Arc<dyn ManagerStateBase>>,
}

impl Context {
    /// Creates a context with an empty locale and no manager state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a context with the given locale and no manager state.
    pub fn with_locale(locale: TraitsData) -> Self {
        Self {
            locale,
            manager_state: None,
        }
    }

    pub fn manager_state(&self) -> Option<&Arc<dyn ManagerStateBase>> {
        self.manager_state.as_ref()
    }

    pub fn set_manager_state(&mut self, state: Option<Arc<dyn ManagerStateBase>>) {
        self.manager_state = state;
    }

    pub fn has_manager_state(&self) -> bool {
        self.manager_state.is_some()
    }
}

/// The minimal identity contract a host exposes to the manager it embeds.
pub trait HostInterface: Send + Sync {
    /// A stable, reverse-DNS-style identifier for the host.
    fn identifier(&self) -> String;

    /// A human-readable name for the host.
    fn display_name(&self) -> String;
}

/// The pair of ([`HostInterface`], [`Logger`]) passed into every manager call.
///
/// Shared between the host and the [`crate::manager::Manager`]; the Manager
/// never mutates either member.
pub struct HostSession {
    host: Arc<dyn HostInterface>,
    logger: Arc<dyn Logger>,
}

impl HostSession {
    pub fn new(host: Arc<dyn HostInterface>, logger: Arc<dyn Logger>) -> Self {
        Self { host, logger }
    }

    pub fn host(&self) -> &Arc<dyn HostInterface> {
        &self.host
    }

    pub fn logger(&self) -> &Arc<dyn Logger> {
        &self.logger
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    struct StubState(u32);

    #[test]
    fn context_defaults_to_no_manager_state() {
        let context = Context::new();
        assert!(!context.has_manager_state());
    }

    #[test]
    fn manager_state_downcasts_back_to_its_concrete_type() {
        let mut context = Context::new();
        context.set_manager_state(Some(Arc::new(StubState(7))));

        let state = context.manager_state().unwrap();
        let stub = state.as_any().downcast_ref::<StubState>().unwrap();
        assert_eq!(stub, &StubState(7));
    }
}
