//! Ties a [`PluginSystem`] to [`Manager`] construction.

use std::sync::Arc;

use crate::context::HostSession;
use crate::manager::Manager;
use crate::plugin_system::PluginSystem;
use crate::utils::error::CreateManagerError;

/// Instantiates plug-ins discovered by a [`PluginSystem`] and wraps them in a
/// [`Manager`] bound to a caller-provided [`HostSession`].
pub struct ManagerFactory {
    plugin_system: Arc<PluginSystem>,
}

impl ManagerFactory {
    pub fn new(plugin_system: Arc<PluginSystem>) -> Self {
        Self { plugin_system }
    }

    /// The identifiers of every plug-in the underlying [`PluginSystem`] has
    /// discovered.
    pub fn identifiers(&self) -> Vec<String> {
        self.plugin_system.identifiers()
    }

    /// Instantiates the plug-in named `identifier` and wraps it in a
    /// [`Manager`] bound to `host_session`.
    ///
    /// When `initialize` is `false`, the returned `Manager` has not had
    /// `Manager::initialize` called on it — useful for a test harness that
    /// wants a fresh, uninitialized instance per test.
    pub fn create_manager(
        &self,
        identifier: &str,
        host_session: Arc<HostSession>,
        initialize: bool,
        settings: std::collections::BTreeMap<String, crate::traits_data::PropertyValue>,
    ) -> Result<Manager, CreateManagerError> {
        let interface = self
            .plugin_system
            .create_interface(identifier)
            .ok_or_else(|| CreateManagerError::UnknownIdentifier(identifier.to_string()))?
            .map_err(CreateManagerError::Interface)?;

        let manager = Manager::new(interface, host_session);
        if initialize {
            manager.initialize(settings)?;
        }
        Ok(manager)
    }
}
