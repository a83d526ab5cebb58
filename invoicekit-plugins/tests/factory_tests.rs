//! Repository factory over the built-in backends.

use chrono::NaiveDate;
use invoicekit_model::{Client, Invoice, InvoiceLine, InvoiceStatus, Payment};
use invoicekit_plugins::{
    BackendKind, PluginConfig, PluginError, PluginRegistry, RepositoryFactory, RepositorySet,
    StorageSettings, StoragePlugin,
};
use invoicekit_storage::{
    ClientQueries, DocumentFormat, InvoiceQueries, PaymentQueries, StorageError,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn files_config(root: &std::path::Path) -> PluginConfig {
    PluginConfig::new().with_root_dir(root)
}

/// Create, read, update, paginate and delete through a factory's repositories.
fn exercise_client_crud(factory: &RepositoryFactory) {
    let clients = factory.create_client_repository().unwrap();

    let acme = clients.create(Client::new("Acme").with_tax_id("B-1")).unwrap();
    assert_eq!(acme.id, 1);
    clients.create(Client::new("Globex")).unwrap();
    clients.create(Client::new("Initech")).unwrap();

    let mut renamed = clients.get_by_id(1).unwrap().unwrap();
    renamed.name = "Acme Corp".into();
    clients.update(renamed).unwrap();
    assert_eq!(clients.get_by_id(1).unwrap().unwrap().name, "Acme Corp");
    assert_eq!(clients.get_by_tax_id("B-1").unwrap().unwrap().name, "Acme Corp");

    let page = clients.get_all(1, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Globex");

    assert!(clients.delete(1).unwrap());
    assert!(!clients.delete(1).unwrap());
    assert_eq!(clients.get_by_id(1).unwrap(), None);

    let mut missing = Client::new("Nobody");
    missing.id = 77;
    assert!(matches!(
        clients.update(missing),
        Err(StorageError::NotFound { id: 77, .. })
    ));
}

// ================================================================
// Construction
// ================================================================

#[test]
fn unknown_backend_fails_with_available_names() {
    let err = RepositoryFactory::new("postgres", PluginConfig::new()).err().unwrap();
    match err {
        PluginError::UnknownBackend { name, available } => {
            assert_eq!(name, "postgres");
            assert!(available.contains(&"memory".to_string()));
            assert!(available.contains(&"files".to_string()));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn custom_registry_limits_backends() {
    let mut registry = PluginRegistry::with_builtin_backends();
    registry.unregister("memory");

    let err = RepositoryFactory::with_registry(&registry, "memory", PluginConfig::new())
        .err()
        .unwrap();
    assert!(matches!(err, PluginError::UnknownBackend { .. }));
}

#[test]
fn construction_initializes_plugin() {
    let factory = RepositoryFactory::new("memory", PluginConfig::new()).unwrap();
    assert_eq!(factory.backend(), "memory");
    assert!(factory.plugin().is_initialized());
    assert!(factory.health_check());
}

#[test]
fn initialization_errors_surface_from_construction() {
    let config = PluginConfig::new().with_database_url("mysql://localhost/invoices");
    if cfg!(feature = "sqlite") {
        let err = RepositoryFactory::new("sqlite", config).err().unwrap();
        assert!(matches!(err, PluginError::InvalidConfig(_)));
    }
}

// ================================================================
// Memory backend
// ================================================================

#[test]
fn memory_backend_crud() {
    let factory = RepositoryFactory::new("memory", PluginConfig::new()).unwrap();
    exercise_client_crud(&factory);
}

#[test]
fn repeated_requests_share_the_store() {
    let factory = RepositoryFactory::new("memory", PluginConfig::new()).unwrap();
    let first = factory.create_invoice_repository().unwrap();
    let second = factory.create_invoice_repository().unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    first
        .create(Invoice::new("INV-1", 1, date(2024, 1, 1), date(2024, 1, 31)))
        .unwrap();
    assert_eq!(second.get_by_number("INV-1").unwrap().unwrap().id, 1);
}

#[test]
fn separate_factories_are_isolated() {
    let a = RepositoryFactory::new("memory", PluginConfig::new()).unwrap();
    let b = RepositoryFactory::new("memory", PluginConfig::new()).unwrap();
    a.create_client_repository().unwrap().create(Client::new("only in a")).unwrap();
    assert!(b.create_client_repository().unwrap().get_all(0, 10).unwrap().is_empty());
}

#[test]
fn cleanup_is_idempotent_and_releases_repositories() {
    let mut factory = RepositoryFactory::new("memory", PluginConfig::new()).unwrap();
    let clients = factory.create_client_repository().unwrap();
    clients.create(Client::new("temporary")).unwrap();

    factory.cleanup().unwrap();
    factory.cleanup().unwrap();
    assert!(factory.is_cleaned_up());
    assert!(!factory.health_check());
    assert!(clients.get_all(0, 10).unwrap().is_empty());
    assert!(matches!(
        factory.create_client_repository(),
        Err(PluginError::NotInitialized(ref name)) if name == "memory"
    ));
}

static FLAKY_CLEANUP_CALLS: AtomicUsize = AtomicUsize::new(0);

/// Fails its first cleanup and succeeds afterwards.
#[derive(Default)]
struct FlakyCleanupPlugin {
    cleanups: usize,
}

impl StoragePlugin for FlakyCleanupPlugin {
    fn name(&self) -> &'static str {
        "flaky"
    }

    fn initialize(&mut self, _config: &PluginConfig) -> Result<(), PluginError> {
        Ok(())
    }

    fn repositories(&self) -> Option<&RepositorySet> {
        None
    }

    fn health_check(&self) -> bool {
        true
    }

    fn cleanup(&mut self) -> Result<(), PluginError> {
        self.cleanups += 1;
        FLAKY_CLEANUP_CALLS.fetch_add(1, Ordering::SeqCst);
        if self.cleanups == 1 {
            return Err(PluginError::Io(std::io::Error::other("connection busy")));
        }
        Ok(())
    }
}

#[test]
fn failed_cleanup_is_retried_on_drop() {
    let mut registry = PluginRegistry::new();
    registry.register_plugin::<FlakyCleanupPlugin>().unwrap();

    let mut factory =
        RepositoryFactory::with_registry(&registry, "flaky", PluginConfig::new()).unwrap();
    assert!(matches!(factory.cleanup(), Err(PluginError::Io(_))));
    assert!(!factory.is_cleaned_up());

    drop(factory);
    assert_eq!(FLAKY_CLEANUP_CALLS.load(Ordering::SeqCst), 2);
}

// ================================================================
// Files backend
// ================================================================

#[test]
fn files_backend_crud_and_layout() {
    let tmp = TempDir::new().unwrap();
    let factory = RepositoryFactory::new("files", files_config(tmp.path())).unwrap();
    exercise_client_crud(&factory);

    let clients_dir = tmp.path().join("clients");
    assert!(clients_dir.join("_meta.json").exists());
    assert!(clients_dir.join("2.json").exists());
    for dir in ["invoices", "payments", "companies", "products", "payment_notes", "audit_logs"] {
        assert!(tmp.path().join(dir).is_dir(), "missing {dir}");
    }
}

#[test]
fn files_backend_uses_configured_format() {
    let tmp = TempDir::new().unwrap();
    let config = files_config(tmp.path()).with_file_format(DocumentFormat::Xml);
    let factory = RepositoryFactory::new("files", config).unwrap();

    let invoices = factory.create_invoice_repository().unwrap();
    let invoice = invoices
        .create(
            Invoice::new("INV-7", 2, date(2024, 5, 1), date(2024, 5, 31))
                .with_line(InvoiceLine::new("Design", 4.0, 75.0))
                .with_status(InvoiceStatus::Unpaid),
        )
        .unwrap();

    assert!(tmp.path().join("invoices/1.xml").exists());
    assert_eq!(invoices.get_by_id(1).unwrap().unwrap(), invoice);
    assert_eq!(invoices.get_overdue(date(2024, 6, 15)).unwrap().len(), 1);
}

#[test]
fn files_backend_data_survives_a_new_factory() {
    let tmp = TempDir::new().unwrap();
    {
        let factory = RepositoryFactory::new("files", files_config(tmp.path())).unwrap();
        let payments = factory.create_payment_repository().unwrap();
        payments.create(Payment::new(1, 50.0, date(2024, 2, 1))).unwrap();
        payments.create(Payment::new(1, 25.0, date(2024, 2, 2))).unwrap();
    }

    let factory = RepositoryFactory::new("files", files_config(tmp.path())).unwrap();
    let payments = factory.create_payment_repository().unwrap();
    assert_eq!(payments.total_for_invoice(1).unwrap(), 75.0);
    assert_eq!(
        payments.create(Payment::new(2, 10.0, date(2024, 2, 3))).unwrap().id,
        3
    );
}

// ================================================================
// Settings
// ================================================================

#[test]
fn from_settings_builds_files_factory() {
    let tmp = TempDir::new().unwrap();
    let settings = StorageSettings {
        backend: BackendKind::Files,
        storage_path: tmp.path().to_path_buf(),
        file_format: DocumentFormat::Markdown,
        ..StorageSettings::default()
    };

    let factory = RepositoryFactory::from_settings(&settings).unwrap();
    assert_eq!(factory.backend(), "files");
    assert_eq!(factory.config().root_dir.as_deref(), Some(tmp.path()));

    factory
        .create_client_repository()
        .unwrap()
        .create(Client::new("Markdown Ltd"))
        .unwrap();
    assert!(tmp.path().join("clients/1.md").exists());
}

#[test]
fn from_settings_with_unavailable_backend() {
    let settings = StorageSettings {
        backend: BackendKind::Mysql,
        ..StorageSettings::default()
    };
    assert!(matches!(
        RepositoryFactory::from_settings(&settings),
        Err(PluginError::UnknownBackend { ref name, .. }) if name == "mysql"
    ));
}

// ================================================================
// SQLite backend
// ================================================================

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_backend_crud_in_memory() {
    let config = PluginConfig::new().with_database_url("sqlite://").with_echo(true);
    let factory = RepositoryFactory::new("sqlite", config).unwrap();
    assert!(factory.health_check());
    exercise_client_crud(&factory);
}

#[cfg(feature = "sqlite")]
#[test]
fn sqlite_backend_file_database() {
    let tmp = TempDir::new().unwrap();
    let url = format!("sqlite:///{}", tmp.path().join("db/invoices.db").display());
    {
        let factory =
            RepositoryFactory::new("sqlite", PluginConfig::new().with_database_url(url.clone()))
                .unwrap();
        factory
            .create_client_repository()
            .unwrap()
            .create(Client::new("Stored"))
            .unwrap();
    }
    assert!(tmp.path().join("db/invoices.db").exists());

    let mut factory =
        RepositoryFactory::new("sqlite", PluginConfig::new().with_database_url(url)).unwrap();
    let clients = factory.create_client_repository().unwrap();
    assert_eq!(clients.get_by_name("Stored").unwrap().unwrap().id, 1);

    factory.cleanup().unwrap();
    assert!(!factory.health_check());
}
