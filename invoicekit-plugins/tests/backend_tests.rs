//! Lifecycle of each built-in backend driven directly through `StoragePlugin`.

use invoicekit_model::{Client, Product};
use invoicekit_plugins::backends::{FilesPlugin, MemoryPlugin};
use invoicekit_plugins::{PluginConfig, PluginError, StoragePlugin};
use invoicekit_storage::{CodecSupport, DocumentFormat, ProductQueries, StorageError};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

// ── Memory ──────────────────────────────────────────────────────

#[test]
fn memory_uninitialized_plugin_has_no_repositories() {
    let plugin = MemoryPlugin::default();
    assert!(!plugin.is_initialized());
    assert!(!plugin.health_check());
    assert!(matches!(
        plugin.create_client_repository(&PluginConfig::new()),
        Err(PluginError::NotInitialized(_))
    ));
}

#[test]
fn memory_second_initialize_keeps_data() {
    let mut plugin = MemoryPlugin::default();
    let config = PluginConfig::new();
    plugin.initialize(&config).unwrap();
    let clients = plugin.create_client_repository(&config).unwrap();
    clients.create(Client::new("Acme")).unwrap();

    plugin.initialize(&config).unwrap();
    let again = plugin.create_client_repository(&config).unwrap();
    assert_eq!(again.get_all(0, 10).unwrap().len(), 1);
}

#[test]
fn memory_cleanup_drops_data_and_allows_reinitialize() {
    let mut plugin = MemoryPlugin::default();
    let config = PluginConfig::new();
    plugin.initialize(&config).unwrap();
    let products = plugin.create_product_repository(&config).unwrap();
    products.create(Product::new("Widget", 9.5).with_code("W-1")).unwrap();

    plugin.cleanup().unwrap();
    assert!(!plugin.is_initialized());
    assert!(products.get_by_code("W-1").unwrap().is_none());

    plugin.initialize(&config).unwrap();
    let fresh = plugin.create_product_repository(&config).unwrap();
    assert_eq!(fresh.create(Product::new("Gadget", 1.0)).unwrap().id, 1);
}

// ── Files ───────────────────────────────────────────────────────

#[test]
fn files_initialize_creates_layout() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("nested/data");
    let mut plugin = FilesPlugin::default();
    plugin.initialize(&PluginConfig::new().with_root_dir(&root)).unwrap();

    assert_eq!(plugin.root_dir(), Some(root.as_path()));
    assert!(root.join("invoices").is_dir());
    assert!(root.join("audit_logs").is_dir());
    assert!(plugin.health_check());
    assert!(!root.join(".health-probe").exists());
}

#[test]
fn files_health_fails_once_root_is_gone() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("data");
    let mut plugin = FilesPlugin::default();
    plugin.initialize(&PluginConfig::new().with_root_dir(&root)).unwrap();

    fs::remove_dir_all(&root).unwrap();
    assert!(!plugin.health_check());
}

#[test]
fn files_health_fails_before_initialize() {
    assert!(!FilesPlugin::default().health_check());
}

#[test]
fn files_records_written_in_configured_format() {
    let tmp = TempDir::new().unwrap();
    let config = PluginConfig::new()
        .with_root_dir(tmp.path())
        .with_file_format(DocumentFormat::Xml);
    let mut plugin = FilesPlugin::default();
    plugin.initialize(&config).unwrap();

    let clients = plugin.create_client_repository(&config).unwrap();
    clients.create(Client::new("Xml Ltd")).unwrap();
    let text = fs::read_to_string(tmp.path().join("clients/1.xml")).unwrap();
    assert!(text.contains("<name>Xml Ltd</name>"));
}

#[test]
fn files_restricted_codecs_reject_yaml_documents() {
    let tmp = TempDir::new().unwrap();
    let config = PluginConfig::new().with_root_dir(tmp.path());
    let mut plugin = FilesPlugin::with_codecs(CodecSupport::required_only());
    plugin.initialize(&config).unwrap();

    fs::write(tmp.path().join("clients/4.yaml"), "id: 4\nname: Yaml Inc\n").unwrap();
    let clients = plugin.create_client_repository(&config).unwrap();
    assert!(matches!(
        clients.get_by_id(4),
        Err(StorageError::MissingOptionalCodec { codec: "YAML", .. })
    ));
}

#[test]
fn files_cleanup_leaves_documents() {
    let tmp = TempDir::new().unwrap();
    let config = PluginConfig::new().with_root_dir(tmp.path());
    let mut plugin = FilesPlugin::default();
    plugin.initialize(&config).unwrap();
    plugin
        .create_client_repository(&config)
        .unwrap()
        .create(Client::new("Kept"))
        .unwrap();

    plugin.cleanup().unwrap();
    assert!(tmp.path().join("clients/1.json").exists());
    assert!(tmp.path().join("clients/_meta.json").exists());
    assert!(!plugin.is_initialized());
    assert!(!plugin.health_check());
    assert_eq!(plugin.root_dir(), None);
    assert!(matches!(
        plugin.create_client_repository(&config),
        Err(PluginError::NotInitialized(_))
    ));
    plugin.cleanup().unwrap();

    plugin.initialize(&config).unwrap();
    let clients = plugin.create_client_repository(&config).unwrap();
    assert_eq!(clients.get_all(0, 10).unwrap().len(), 1);
    assert_eq!(clients.create(Client::new("Next")).unwrap().id, 2);
}

// ── SQLite ──────────────────────────────────────────────────────

#[cfg(feature = "sqlite")]
mod sqlite {
    use super::*;
    use pretty_assertions::assert_eq;
    use invoicekit_plugins::backends::SqlitePlugin;

    #[test]
    fn in_memory_database() {
        let config = PluginConfig::new().with_database_url("sqlite:///:memory:");
        let mut plugin = SqlitePlugin::default();
        plugin.initialize(&config).unwrap();
        assert!(plugin.health_check());

        let clients = plugin.create_client_repository(&config).unwrap();
        assert_eq!(clients.create(Client::new("Acme")).unwrap().id, 1);
    }

    #[test]
    fn file_database_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("a/b/invoices.db");
        let config =
            PluginConfig::new().with_database_url(format!("sqlite:///{}", path.display()));
        let mut plugin = SqlitePlugin::default();
        plugin.initialize(&config).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn invalid_url_is_rejected() {
        let config = PluginConfig::new().with_database_url("postgres://db/invoices");
        let mut plugin = SqlitePlugin::default();
        assert!(matches!(
            plugin.initialize(&config),
            Err(PluginError::InvalidConfig(_))
        ));
        assert!(!plugin.is_initialized());
    }

    #[test]
    fn cleanup_closes_the_database() {
        let config = PluginConfig::new().with_database_url(":memory:");
        let mut plugin = SqlitePlugin::default();
        plugin.initialize(&config).unwrap();
        plugin.cleanup().unwrap();

        assert!(!plugin.health_check());
        assert!(matches!(
            plugin.create_invoice_repository(&config),
            Err(PluginError::NotInitialized(_))
        ));
    }
}
