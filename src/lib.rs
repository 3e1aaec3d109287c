//! # openassetio-core-rs
//!
//! Host-facing middleware that decouples content-creation hosts from asset
//! management systems. A host consults a *manager* — a pluggable asset
//! backend — through a narrow, batched API to identify, resolve, publish,
//! and relate *entities* referenced by opaque strings.
//!
//! This crate provides the [`Manager`](manager::Manager) façade: it wraps a
//! [`ManagerInterface`](manager_interface::ManagerInterface) plug-in and
//! enforces the contract on its behalf — capability gating at
//! initialization, input validation, the batch-dispatch and result-policy
//! engine shared by every batched operation, and the manager-state lifecycle
//! carried by [`context::Context`]. It does not itself talk to any asset
//! store, cache entity data, own threads, or perform network I/O: it is a
//! contract-enforcing adapter.
//!
//! ## Core components
//!
//! - [`traits_data::TraitsData`] — the typed property bag keyed by
//!   `(traitId, propertyKey)` that is the universal payload.
//! - [`entity_reference::EntityReference`] — a validated opaque string
//!   wrapper, only constructible through a path that has checked the string
//!   against a manager's `isEntityReferenceString` predicate.
//! - [`context::Context`] and [`context::HostSession`] — scoped opaque
//!   manager state, persistence tokens, and the (host, logger) pair threaded
//!   through every call.
//! - [`manager::Manager`] — the façade described above.
//! - [`manager_interface::ManagerInterface`] — the plug-in contract the
//!   façade consumes.
//! - [`plugin_system::PluginSystem`] and [`manager_factory::ManagerFactory`]
//!   — filesystem and process-entry-point plug-in discovery, tied to
//!   `Manager` construction.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::collections::BTreeMap;
//! use std::sync::Arc;
//!
//! use openassetio_core_rs::context::{HostInterface, HostSession};
//! use openassetio_core_rs::log::ConsoleLogger;
//! use openassetio_core_rs::manager::Manager;
//! use openassetio_core_rs::manager_interface::ManagerInterface;
//!
//! struct ExampleHost;
//!
//! impl HostInterface for ExampleHost {
//!     fn identifier(&self) -> String {
//!         "org.example.host".to_string()
//!     }
//!
//!     fn display_name(&self) -> String {
//!         "Example Host".to_string()
//!     }
//! }
//!
//! fn make_manager(interface: Arc<dyn ManagerInterface>) -> Manager {
//!     let host_session = Arc::new(HostSession::new(
//!         Arc::new(ExampleHost),
//!         Arc::new(ConsoleLogger::default()),
//!     ));
//!     let manager = Manager::new(interface, host_session);
//!     manager.initialize(BTreeMap::new()).expect("manager failed to initialize");
//!     manager
//! }
//! ```

#![warn(missing_docs)]

/// Access-mode enumerations accepted by the batched operations.
pub mod access;

/// The batch-dispatch and result-policy engine shared by every batched
/// `Manager` operation.
pub mod batch;

/// The closed capability set mirrored between `Manager` and `ManagerInterface`.
pub mod capability;

/// Context and manager-state lifecycle, and the host-supplied session pair
/// threaded through every call.
pub mod context;

/// A thin, validated newtype wrapping an entity reference string.
pub mod entity_reference;

/// Severity-tagged structured logging.
pub mod log;

/// The host-facing `Manager` façade.
pub mod manager;

/// Ties a `PluginSystem` to `Manager` construction.
pub mod manager_factory;

/// The plug-in contract consumed by the `Manager` façade.
pub mod manager_interface;

/// A paged cursor over entity references returned by a relationship query.
pub mod pager;

/// Filesystem and process-entry-point discovery of `ManagerInterface` plug-ins.
pub mod plugin_system;

/// The universal payload type: a typed property bag.
pub mod traits_data;

/// Error taxonomy and other shared utilities.
pub mod utils;

/// Re-exports of the most commonly used types.
///
/// A host embedding a manager typically only needs what this module
/// re-exports; the per-concern modules remain the place to reach for
/// anything more specific (e.g. a particular error variant).
pub mod prelude {
    pub use crate::access::*;
    pub use crate::batch::{
        BatchElement, BatchElementError, BatchElementErrorCode, BatchElementErrorPolicyTag,
    };
    pub use crate::capability::Capability;
    pub use crate::context::{Context, HostInterface, HostSession, ManagerStateBase};
    pub use crate::entity_reference::EntityReference;
    pub use crate::log::{ConsoleLogger, Logger, NullLogger, Severity};
    pub use crate::manager::Manager;
    pub use crate::manager_factory::ManagerFactory;
    pub use crate::manager_interface::{EntityReferencePagerInterface, ManagerInterface};
    pub use crate::pager::EntityReferencePager;
    pub use crate::plugin_system::PluginSystem;
    pub use crate::traits_data::{PropertyValue, TraitsData};
}
