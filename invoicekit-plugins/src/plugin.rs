//! The contract every storage backend implements.

use invoicekit_model::{AuditLogEntry, Client, Company, Invoice, Payment, PaymentNote, Product};
use invoicekit_storage::{DocumentFormat, SharedRepository};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::{PluginError, PluginResult};

/// Options handed to a plugin on initialization.
///
/// Each backend reads the options it understands and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PluginConfig {
    /// Connection URL for database backends.
    pub database_url: Option<String>,
    /// Log every SQL statement.
    pub echo: bool,
    /// Root directory of the files backend.
    pub root_dir: Option<PathBuf>,
    /// Format of newly written documents in the files backend.
    pub file_format: Option<DocumentFormat>,
    /// Backend-specific options without a dedicated field.
    pub extra: BTreeMap<String, String>,
}

impl PluginConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    #[must_use]
    pub fn with_root_dir(mut self, root_dir: impl Into<PathBuf>) -> Self {
        self.root_dir = Some(root_dir.into());
        self
    }

    #[must_use]
    pub fn with_file_format(mut self, format: DocumentFormat) -> Self {
        self.file_format = Some(format);
        self
    }

    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.extra.get(key).map(String::as_str)
    }
}

/// One repository per entity kind, all backed by the same store.
#[derive(Clone)]
pub struct RepositorySet {
    pub invoices: SharedRepository<Invoice>,
    pub clients: SharedRepository<Client>,
    pub payments: SharedRepository<Payment>,
    pub companies: SharedRepository<Company>,
    pub products: SharedRepository<Product>,
    pub payment_notes: SharedRepository<PaymentNote>,
    pub audit_logs: SharedRepository<AuditLogEntry>,
}

/// A storage backend: memory, a directory of documents, a database.
///
/// Repositories are only available between [`initialize`](Self::initialize)
/// and [`cleanup`](Self::cleanup); before that every `create_*` method fails
/// with [`PluginError::NotInitialized`]. Repeated `create_*` calls return
/// handles to the same underlying store.
pub trait StoragePlugin: Send + Sync {
    /// Registry key of the backend.
    fn name(&self) -> &'static str;

    /// Acquires the backend's resources. A second call is a no-op.
    fn initialize(&mut self, config: &PluginConfig) -> PluginResult<()>;

    /// The repositories, once initialized.
    fn repositories(&self) -> Option<&RepositorySet>;

    /// Liveness probe; never fails, only reports.
    fn health_check(&self) -> bool;

    /// Releases resources. Safe to call more than once. Repositories obtained
    /// earlier must not be used afterwards.
    fn cleanup(&mut self) -> PluginResult<()>;

    fn is_initialized(&self) -> bool {
        self.repositories().is_some()
    }

    fn require_repositories(&self) -> PluginResult<&RepositorySet> {
        self.repositories()
            .ok_or_else(|| PluginError::NotInitialized(self.name().to_string()))
    }

    fn create_invoice_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<Invoice>> {
        Ok(Arc::clone(&self.require_repositories()?.invoices))
    }

    fn create_client_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<Client>> {
        Ok(Arc::clone(&self.require_repositories()?.clients))
    }

    fn create_payment_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<Payment>> {
        Ok(Arc::clone(&self.require_repositories()?.payments))
    }

    fn create_company_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<Company>> {
        Ok(Arc::clone(&self.require_repositories()?.companies))
    }

    fn create_product_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<Product>> {
        Ok(Arc::clone(&self.require_repositories()?.products))
    }

    fn create_payment_note_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<PaymentNote>> {
        Ok(Arc::clone(&self.require_repositories()?.payment_notes))
    }

    fn create_audit_repository(
        &self,
        _config: &PluginConfig,
    ) -> PluginResult<SharedRepository<AuditLogEntry>> {
        Ok(Arc::clone(&self.require_repositories()?.audit_logs))
    }
}
