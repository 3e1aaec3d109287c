//! Filesystem and process-entry-point discovery of [`ManagerInterface`]
//! plug-ins.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::log::{Logger, Severity};
use crate::manager_interface::ManagerInterface;
use crate::utils::error::{ManagerInterfaceResult, ScanError};

#[cfg(feature = "plugin_system")]
const DYLIB_EXTENSION: &str = std::env::consts::DLL_EXTENSION;

#[cfg(feature = "plugin_system")]
const IDENTIFIER_SYMBOL: &[u8] = b"openassetio_plugin_identifier\0";

#[cfg(feature = "plugin_system")]
const CREATE_SYMBOL: &[u8] = b"openassetio_plugin_create\0";

/// Default process entry-point group name, matching the source convention.
pub const DEFAULT_ENTRY_POINT_GROUP: &str = "openassetio.manager_plugin";

/// A statically-registered plug-in, collected via the `entry_points` feature.
///
/// This is the compiled-binary analogue of an `importlib.metadata` entry
/// point: since a Rust binary has no runtime package index to query, a
/// plug-in crate instead registers itself at link time and `scan_entry_points`
/// enumerates whatever landed in the given group.
#[cfg(feature = "entry_points")]
pub struct EntryPointPlugin {
    pub group: &'static str,
    pub identifier: &'static str,
    pub create: fn() -> Arc<dyn ManagerInterface>,
}

#[cfg(feature = "entry_points")]
inventory::collect!(EntryPointPlugin);

struct PluginRecord {
    path: PathBuf,
    create: Arc<dyn Fn() -> ManagerInterfaceResult<Arc<dyn ManagerInterface>> + Send + Sync>,
}

/// Discovers and instantiates [`ManagerInterface`] plug-ins from filesystem
/// paths and, optionally, process entry points.
///
/// `scan` is idempotent-additive: repeated calls accumulate plug-ins, and an
/// identifier already held is never displaced by a later scan — left-most
/// path wins on collision, matching the ordering the source test suite pins
/// down (`scan("A:C")` then `scan("C:A")` after `reset` must flip the winner).
pub struct PluginSystem {
    plugins: RwLock<BTreeMap<String, PluginRecord>>,
    #[cfg(feature = "plugin_system")]
    libraries: RwLock<Vec<libloading::Library>>,
}

impl Default for PluginSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginSystem {
    pub fn new() -> Self {
        Self {
            plugins: RwLock::new(BTreeMap::new()),
            #[cfg(feature = "plugin_system")]
            libraries: RwLock::new(Vec::new()),
        }
    }

    /// Scans `paths` (platform-path-separator-delimited directories) for
    /// plug-in modules, adding any newly discovered identifiers. Already-held
    /// identifiers are left untouched even if a later path also has a plug-in
    /// with the same identifier.
    #[cfg(feature = "plugin_system")]
    pub fn scan(&self, paths: &str) -> Result<(), ScanError> {
        for dir in std::env::split_paths(paths) {
            self.scan_directory(&dir)?;
        }
        Ok(())
    }

    #[cfg(feature = "plugin_system")]
    fn scan_directory(&self, dir: &Path) -> Result<(), ScanError> {
        let entries = std::fs::read_dir(dir).map_err(|source| ScanError::ReadDir {
            path: dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ScanError::ReadDir {
                path: dir.display().to_string(),
                source,
            })?;
            // `metadata` (as opposed to `symlink_metadata`) follows symlinks.
            let metadata = std::fs::metadata(entry.path()).map_err(|source| ScanError::ReadDir {
                path: entry.path().display().to_string(),
                source,
            })?;

            let library_path = if metadata.is_dir() {
                match self.find_library_in_package(&entry.path())? {
                    Some(path) => path,
                    None => continue,
                }
            } else if entry.path().extension().and_then(|ext| ext.to_str()) == Some(DYLIB_EXTENSION)
            {
                entry.path()
            } else {
                continue;
            };

            self.load_plugin(&library_path)?;
        }

        Ok(())
    }

    #[cfg(feature = "plugin_system")]
    fn find_library_in_package(&self, package_dir: &Path) -> Result<Option<PathBuf>, ScanError> {
        let entries = std::fs::read_dir(package_dir).map_err(|source| ScanError::ReadDir {
            path: package_dir.display().to_string(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|source| ScanError::ReadDir {
                path: package_dir.display().to_string(),
                source,
            })?;
            if entry.path().extension().and_then(|ext| ext.to_str()) == Some(DYLIB_EXTENSION) {
                return Ok(Some(entry.path()));
            }
        }

        Ok(None)
    }

    #[cfg(feature = "plugin_system")]
    fn load_plugin(&self, path: &Path) -> Result<(), ScanError> {
        // Safety: loading an arbitrary shared library is inherently unsafe;
        // the caller is trusted to only scan directories containing
        // well-formed openassetio manager plug-ins.
        let library = unsafe { libloading::Library::new(path) }.map_err(|source| {
            ScanError::LoadLibrary {
                path: path.display().to_string(),
                source: Box::new(source),
            }
        })?;

        let identifier_fn: libloading::Symbol<unsafe extern "C" fn() -> *const std::os::raw::c_char> =
            unsafe { library.get(IDENTIFIER_SYMBOL) }.map_err(|_| ScanError::MissingEntryPoint {
                path: path.display().to_string(),
            })?;
        let create_fn: libloading::Symbol<
            unsafe extern "C" fn() -> *mut Box<dyn ManagerInterface>,
        > = unsafe { library.get(CREATE_SYMBOL) }.map_err(|_| ScanError::MissingEntryPoint {
            path: path.display().to_string(),
        })?;

        let identifier = unsafe {
            std::ffi::CStr::from_ptr(identifier_fn())
                .to_string_lossy()
                .into_owned()
        };

        let path_owned = path.to_path_buf();
        let create_fn = *create_fn;
        let create: Arc<dyn Fn() -> ManagerInterfaceResult<Arc<dyn ManagerInterface>> + Send + Sync> =
            Arc::new(move || {
                let boxed = unsafe { Box::from_raw(create_fn()) };
                Ok(Arc::from(*boxed))
            });

        {
            let mut plugins = self.plugins.write().unwrap();
            plugins
                .entry(identifier)
                .or_insert(PluginRecord {
                    path: path_owned,
                    create,
                });
        }
        self.libraries.write().unwrap().push(library);

        Ok(())
    }

    /// Enumerates plug-ins statically registered under `group` via the
    /// `entry_points` feature. Returns `false` after logging a warning and
    /// performing no work when that feature is disabled — mirroring the
    /// source contract's graceful degradation when its metadata facility is
    /// unavailable.
    #[cfg(feature = "entry_points")]
    pub fn scan_entry_points(&self, group: &str, _logger: &dyn Logger) -> bool {
        let mut plugins = self.plugins.write().unwrap();
        for registered in inventory::iter::<EntryPointPlugin> {
            if registered.group != group {
                continue;
            }
            plugins
                .entry(registered.identifier.to_string())
                .or_insert_with(|| PluginRecord {
                    path: PathBuf::new(),
                    create: {
                        let create_fn = registered.create;
                        Arc::new(move || Ok(create_fn()))
                    },
                });
        }
        true
    }

    /// As above, but always returns `false` and logs a warning: built without
    /// the `entry_points` feature, this process has no static plug-in
    /// registry to enumerate.
    #[cfg(not(feature = "entry_points"))]
    pub fn scan_entry_points(&self, _group: &str, logger: &dyn Logger) -> bool {
        logger.log(
            Severity::Warning,
            "PluginSystem: cannot load entry point plugins because this binary was built \
             without the `entry_points` feature.",
        );
        false
    }

    /// Clears all discovered plug-ins (and, with the `plugin_system`
    /// feature, unloads their libraries).
    pub fn reset(&self) {
        self.plugins.write().unwrap().clear();
        #[cfg(feature = "plugin_system")]
        self.libraries.write().unwrap().clear();
    }

    /// The identifiers of every plug-in currently known to this system.
    pub fn identifiers(&self) -> Vec<String> {
        self.plugins.read().unwrap().keys().cloned().collect()
    }

    /// The filesystem path a plug-in was loaded from, or an empty path for
    /// one registered via `scan_entry_points`.
    pub fn plugin_path(&self, identifier: &str) -> Option<PathBuf> {
        self.plugins
            .read()
            .unwrap()
            .get(identifier)
            .map(|record| record.path.clone())
    }

    /// Instantiates the `ManagerInterface` for `identifier`, or `None` if no
    /// plug-in with that identifier has been discovered.
    pub fn create_interface(
        &self,
        identifier: &str,
    ) -> Option<ManagerInterfaceResult<Arc<dyn ManagerInterface>>> {
        let create = self.plugins.read().unwrap().get(identifier)?.create.clone();
        Some(create())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::NullLogger;

    #[test]
    fn fresh_system_has_no_plugins() {
        let system = PluginSystem::new();
        assert!(system.identifiers().is_empty());
    }

    #[test]
    fn reset_clears_everything() {
        let system = PluginSystem::new();
        system
            .plugins
            .write()
            .unwrap()
            .insert(
                "test.plugin".to_string(),
                PluginRecord {
                    path: PathBuf::from("/fake"),
                    create: Arc::new(|| Err("not a real plugin".into())),
                },
            );
        assert_eq!(system.identifiers(), vec!["test.plugin".to_string()]);
        system.reset();
        assert!(system.identifiers().is_empty());
    }

    #[cfg(not(feature = "entry_points"))]
    #[test]
    fn scan_entry_points_degrades_gracefully_without_the_feature() {
        let system = PluginSystem::new();
        assert!(!system.scan_entry_points(DEFAULT_ENTRY_POINT_GROUP, &NullLogger));
    }

    fn insert_stub(system: &PluginSystem, identifier: &str, path: &str) {
        system
            .plugins
            .write()
            .unwrap()
            .entry(identifier.to_string())
            .or_insert(PluginRecord {
                path: PathBuf::from(path),
                create: Arc::new(|| Err("not a real plugin".into())),
            });
    }

    /// Exercises the left-most-wins collision rule directly against the
    /// insertion primitive `load_plugin` funnels every discovered plug-in
    /// through. Standing in for a full directory scan of real plug-in
    /// dylibs, which this workspace has no fixture crates to build.
    #[test]
    fn identifier_collisions_resolve_to_the_first_path_inserted() {
        let system = PluginSystem::new();
        insert_stub(&system, "org.example.shared", "/plugins/a");
        insert_stub(&system, "org.example.shared", "/plugins/c");

        assert_eq!(
            system.plugin_path("org.example.shared"),
            Some(PathBuf::from("/plugins/a"))
        );

        system.reset();
        insert_stub(&system, "org.example.shared", "/plugins/c");
        insert_stub(&system, "org.example.shared", "/plugins/a");

        assert_eq!(
            system.plugin_path("org.example.shared"),
            Some(PathBuf::from("/plugins/c"))
        );
    }

    /// Two separate scans accumulate rather than replace each other's
    /// discoveries, as long as their identifiers don't collide.
    #[test]
    fn repeated_insertion_passes_are_additive() {
        let system = PluginSystem::new();
        insert_stub(&system, "org.example.a", "/plugins/a");
        insert_stub(&system, "org.example.b", "/plugins/b");

        let mut identifiers = system.identifiers();
        identifiers.sort();
        assert_eq!(
            identifiers,
            vec!["org.example.a".to_string(), "org.example.b".to_string()]
        );
    }
}
