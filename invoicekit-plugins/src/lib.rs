//! Pluggable persistence for InvoiceKit.
//!
//! A [`PluginRegistry`] maps backend names to plugin constructors, every
//! plugin implements [`StoragePlugin`], and a [`RepositoryFactory`] turns a
//! backend name plus configuration into ready repositories:
//!
//! ```no_run
//! use invoicekit_plugins::{PluginConfig, RepositoryFactory};
//! use invoicekit_model::Client;
//!
//! let factory = RepositoryFactory::new("files", PluginConfig::new().with_root_dir("./data"))?;
//! let clients = factory.create_client_repository()?;
//! let _acme = clients.create(Client::new("Acme"))?;
//! # Ok::<(), invoicekit_plugins::PluginError>(())
//! ```
//!
//! Built-in backends: `memory`, `files`, and `sqlite` (feature `sqlite`).

pub mod backends;
mod error;
mod factory;
mod plugin;
mod registry;
mod settings;

pub use error::{PluginError, PluginResult};
pub use factory::RepositoryFactory;
pub use plugin::{PluginConfig, RepositorySet, StoragePlugin};
pub use registry::{PluginConstructor, PluginRegistry, builtin_backends, register_builtin_backends};
pub use settings::{BackendKind, ENV_PREFIX, StorageSettings};
