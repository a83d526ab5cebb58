//! Single entry point from a backend name and configuration to repositories.

use invoicekit_model::{AuditLogEntry, Client, Company, Invoice, Payment, PaymentNote, Product};
use invoicekit_storage::SharedRepository;
use tracing::{info, warn};

use crate::error::PluginResult;
use crate::plugin::{PluginConfig, StoragePlugin};
use crate::registry::PluginRegistry;
use crate::settings::StorageSettings;

/// Owns one initialized plugin and hands out its repositories.
///
/// Construction resolves, constructs and initializes the plugin immediately.
/// The plugin is cleaned up by [`cleanup`](Self::cleanup) or, failing that,
/// when the factory is dropped.
pub struct RepositoryFactory {
    backend: String,
    config: PluginConfig,
    plugin: Box<dyn StoragePlugin>,
    cleaned_up: bool,
}

impl RepositoryFactory {
    /// Uses a registry holding every backend compiled into this build.
    pub fn new(backend: &str, config: PluginConfig) -> PluginResult<Self> {
        Self::with_registry(&PluginRegistry::with_builtin_backends(), backend, config)
    }

    pub fn with_registry(
        registry: &PluginRegistry,
        backend: &str,
        config: PluginConfig,
    ) -> PluginResult<Self> {
        let mut plugin = registry.create(backend)?;
        plugin.initialize(&config)?;
        info!(backend = %backend, "Repository factory ready");
        Ok(Self {
            backend: backend.to_string(),
            config,
            plugin,
            cleaned_up: false,
        })
    }

    pub fn from_settings(settings: &StorageSettings) -> PluginResult<Self> {
        Self::new(settings.backend.as_str(), settings.to_plugin_config())
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn config(&self) -> &PluginConfig {
        &self.config
    }

    pub fn plugin(&self) -> &dyn StoragePlugin {
        self.plugin.as_ref()
    }

    pub fn create_invoice_repository(&self) -> PluginResult<SharedRepository<Invoice>> {
        self.plugin.create_invoice_repository(&self.config)
    }

    pub fn create_client_repository(&self) -> PluginResult<SharedRepository<Client>> {
        self.plugin.create_client_repository(&self.config)
    }

    pub fn create_payment_repository(&self) -> PluginResult<SharedRepository<Payment>> {
        self.plugin.create_payment_repository(&self.config)
    }

    pub fn create_company_repository(&self) -> PluginResult<SharedRepository<Company>> {
        self.plugin.create_company_repository(&self.config)
    }

    pub fn create_product_repository(&self) -> PluginResult<SharedRepository<Product>> {
        self.plugin.create_product_repository(&self.config)
    }

    pub fn create_payment_note_repository(&self) -> PluginResult<SharedRepository<PaymentNote>> {
        self.plugin.create_payment_note_repository(&self.config)
    }

    pub fn create_audit_repository(&self) -> PluginResult<SharedRepository<AuditLogEntry>> {
        self.plugin.create_audit_repository(&self.config)
    }

    pub fn health_check(&self) -> bool {
        self.plugin.health_check()
    }

    /// Releases the plugin's resources. Once this succeeds later calls do
    /// nothing; after a failure the next call (or the drop) retries.
    pub fn cleanup(&mut self) -> PluginResult<()> {
        if self.cleaned_up {
            return Ok(());
        }
        self.plugin.cleanup()?;
        self.cleaned_up = true;
        info!(backend = %self.backend, "Repository factory cleaned up");
        Ok(())
    }

    pub fn is_cleaned_up(&self) -> bool {
        self.cleaned_up
    }
}

impl Drop for RepositoryFactory {
    fn drop(&mut self) {
        if let Err(e) = self.cleanup() {
            warn!(backend = %self.backend, "Cleanup on drop failed: {}", e);
        }
    }
}
