use invoicekit_model::{AuditLogEntry, Client, Company, Invoice, Payment, PaymentNote, Product};
use invoicekit_storage::MemoryRepository;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::PluginResult;
use crate::plugin::{PluginConfig, RepositorySet, StoragePlugin};

struct MemoryStores {
    invoices: Arc<MemoryRepository<Invoice>>,
    clients: Arc<MemoryRepository<Client>>,
    payments: Arc<MemoryRepository<Payment>>,
    companies: Arc<MemoryRepository<Company>>,
    products: Arc<MemoryRepository<Product>>,
    payment_notes: Arc<MemoryRepository<PaymentNote>>,
    audit_logs: Arc<MemoryRepository<AuditLogEntry>>,
}

impl MemoryStores {
    fn new() -> Self {
        Self {
            invoices: Arc::new(MemoryRepository::new()),
            clients: Arc::new(MemoryRepository::new()),
            payments: Arc::new(MemoryRepository::new()),
            companies: Arc::new(MemoryRepository::new()),
            products: Arc::new(MemoryRepository::new()),
            payment_notes: Arc::new(MemoryRepository::new()),
            audit_logs: Arc::new(MemoryRepository::new()),
        }
    }

    fn repository_set(&self) -> RepositorySet {
        RepositorySet {
            invoices: self.invoices.clone(),
            clients: self.clients.clone(),
            payments: self.payments.clone(),
            companies: self.companies.clone(),
            products: self.products.clone(),
            payment_notes: self.payment_notes.clone(),
            audit_logs: self.audit_logs.clone(),
        }
    }

    fn clear(&self) -> PluginResult<()> {
        self.invoices.clear()?;
        self.clients.clear()?;
        self.payments.clear()?;
        self.companies.clear()?;
        self.products.clear()?;
        self.payment_notes.clear()?;
        self.audit_logs.clear()?;
        Ok(())
    }
}

/// Keeps everything in process memory; nothing survives the plugin.
#[derive(Default)]
pub struct MemoryPlugin {
    stores: Option<MemoryStores>,
    repositories: Option<RepositorySet>,
}

impl MemoryPlugin {
    pub const NAME: &'static str = "memory";
}

impl StoragePlugin for MemoryPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, _config: &PluginConfig) -> PluginResult<()> {
        if self.stores.is_some() {
            debug!(backend = Self::NAME, "Plugin already initialized");
            return Ok(());
        }
        let stores = MemoryStores::new();
        self.repositories = Some(stores.repository_set());
        self.stores = Some(stores);
        info!(backend = Self::NAME, "Storage plugin initialized");
        Ok(())
    }

    fn repositories(&self) -> Option<&RepositorySet> {
        self.repositories.as_ref()
    }

    fn health_check(&self) -> bool {
        self.stores.is_some()
    }

    fn cleanup(&mut self) -> PluginResult<()> {
        self.repositories = None;
        if let Some(stores) = self.stores.take() {
            stores.clear()?;
            info!(backend = Self::NAME, "Storage plugin cleaned up");
        }
        Ok(())
    }
}
