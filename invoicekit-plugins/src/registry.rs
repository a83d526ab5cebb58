//! Backend name -> plugin constructor directory.
//!
//! The registry is an ordinary value owned by whoever composes the
//! application. [`register_builtin_backends`] is the bootstrap list of the
//! backends compiled into this build; optional backends are simply absent
//! when their feature is off.

use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::backends::{FilesPlugin, MemoryPlugin};
use crate::error::{PluginError, PluginResult};
use crate::plugin::StoragePlugin;

/// Builds a fresh, uninitialized plugin instance.
pub type PluginConstructor = fn() -> Box<dyn StoragePlugin>;

fn construct<P: StoragePlugin + Default + 'static>() -> Box<dyn StoragePlugin> {
    Box::new(P::default())
}

#[derive(Debug, Clone, Default)]
pub struct PluginRegistry {
    constructors: BTreeMap<String, PluginConstructor>,
}

impl PluginRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every backend compiled into this build.
    pub fn with_builtin_backends() -> Self {
        let mut registry = Self::new();
        register_builtin_backends(&mut registry);
        registry
    }

    /// Binds `name` to `constructor`. Fails if the name is taken.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: PluginConstructor,
    ) -> PluginResult<()> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(PluginError::DuplicateBackend(name));
        }
        info!(backend = %name, "Storage backend registered");
        self.constructors.insert(name, constructor);
        Ok(())
    }

    /// Registers `P` under the name its instances report.
    pub fn register_plugin<P: StoragePlugin + Default + 'static>(&mut self) -> PluginResult<()> {
        let name = P::default().name();
        self.register(name, construct::<P>)
    }

    pub fn get(&self, name: &str) -> Option<PluginConstructor> {
        self.constructors.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.constructors.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Removes `name`; `true` if it was registered.
    pub fn unregister(&mut self, name: &str) -> bool {
        let removed = self.constructors.remove(name).is_some();
        if removed {
            debug!(backend = %name, "Storage backend unregistered");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.constructors.clear();
    }

    /// A new, uninitialized plugin for `name`.
    pub fn create(&self, name: &str) -> PluginResult<Box<dyn StoragePlugin>> {
        let constructor = self.get(name).ok_or_else(|| PluginError::UnknownBackend {
            name: name.to_string(),
            available: self.list(),
        })?;
        Ok(constructor())
    }
}

/// The backends compiled into this build, by registry name.
pub fn builtin_backends() -> Vec<(&'static str, PluginConstructor)> {
    #[cfg_attr(not(feature = "sqlite"), allow(unused_mut))]
    let mut backends = vec![
        (MemoryPlugin::NAME, construct::<MemoryPlugin> as PluginConstructor),
        (FilesPlugin::NAME, construct::<FilesPlugin> as PluginConstructor),
    ];
    #[cfg(feature = "sqlite")]
    backends.push((
        crate::backends::SqlitePlugin::NAME,
        construct::<crate::backends::SqlitePlugin> as PluginConstructor,
    ));
    backends
}

/// Registers every built-in backend not already present in `registry`.
pub fn register_builtin_backends(registry: &mut PluginRegistry) {
    for (name, constructor) in builtin_backends() {
        if let Err(e) = registry.register(name, constructor) {
            debug!(backend = name, "Keeping existing registration: {}", e);
        }
    }
}
