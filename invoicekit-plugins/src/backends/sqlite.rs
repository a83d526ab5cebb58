use invoicekit_model::{
    AuditLogEntry, Client, Company, EntityKind, Invoice, Payment, PaymentNote, Product,
};
use invoicekit_storage::SqliteDatabase;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{PluginError, PluginResult};
use crate::plugin::{PluginConfig, RepositorySet, StoragePlugin};

/// Database used when the configuration names none.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:///invoices.db";

/// Where a `sqlite://` URL points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqliteTarget {
    Memory,
    File(PathBuf),
}

/// Parses `sqlite:///relative.db`, `sqlite:////absolute.db`, `sqlite://`
/// and `sqlite:///:memory:`. A bare `:memory:` is accepted too.
pub fn parse_sqlite_url(url: &str) -> PluginResult<SqliteTarget> {
    let url = url.trim();
    if url == ":memory:" {
        return Ok(SqliteTarget::Memory);
    }
    let rest = url
        .strip_prefix("sqlite://")
        .ok_or_else(|| PluginError::InvalidConfig(format!("'{url}' is not a sqlite:// URL")))?;
    if rest.is_empty() {
        return Ok(SqliteTarget::Memory);
    }
    let path = rest.strip_prefix('/').ok_or_else(|| {
        PluginError::InvalidConfig(format!(
            "'{url}' names a host; use sqlite:///<path> for a database file"
        ))
    })?;
    match path {
        "" | ":memory:" => Ok(SqliteTarget::Memory),
        path => Ok(SqliteTarget::File(PathBuf::from(path))),
    }
}

/// One SQLite connection, one table per entity kind.
#[derive(Default)]
pub struct SqlitePlugin {
    database: Option<SqliteDatabase>,
    repositories: Option<RepositorySet>,
}

impl SqlitePlugin {
    pub const NAME: &'static str = "sqlite";
}

impl StoragePlugin for SqlitePlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, config: &PluginConfig) -> PluginResult<()> {
        if self.database.is_some() {
            debug!(backend = Self::NAME, "Plugin already initialized");
            return Ok(());
        }

        let url = config.database_url.as_deref().unwrap_or(DEFAULT_DATABASE_URL);
        let database = match parse_sqlite_url(url)? {
            SqliteTarget::Memory => SqliteDatabase::open_in_memory(config.echo)?,
            SqliteTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                SqliteDatabase::open(&path, config.echo)?
            }
        };

        self.repositories = Some(RepositorySet {
            invoices: Arc::new(database.repository::<Invoice>(EntityKind::Invoice)),
            clients: Arc::new(database.repository::<Client>(EntityKind::Client)),
            payments: Arc::new(database.repository::<Payment>(EntityKind::Payment)),
            companies: Arc::new(database.repository::<Company>(EntityKind::Company)),
            products: Arc::new(database.repository::<Product>(EntityKind::Product)),
            payment_notes: Arc::new(database.repository::<PaymentNote>(EntityKind::PaymentNote)),
            audit_logs: Arc::new(database.repository::<AuditLogEntry>(EntityKind::AuditLog)),
        });
        self.database = Some(database);
        info!(backend = Self::NAME, url, echo = config.echo, "Storage plugin initialized");
        Ok(())
    }

    fn repositories(&self) -> Option<&RepositorySet> {
        self.repositories.as_ref()
    }

    fn health_check(&self) -> bool {
        self.database.as_ref().is_some_and(|db| db.ping().is_ok())
    }

    fn cleanup(&mut self) -> PluginResult<()> {
        self.repositories = None;
        if self.database.take().is_some() {
            info!(backend = Self::NAME, "Storage plugin cleaned up");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sqlite_urls() {
        assert_eq!(
            parse_sqlite_url("sqlite:///invoices.db").unwrap(),
            SqliteTarget::File(PathBuf::from("invoices.db"))
        );
        assert_eq!(
            parse_sqlite_url("sqlite:////var/lib/invoices.db").unwrap(),
            SqliteTarget::File(PathBuf::from("/var/lib/invoices.db"))
        );
        assert_eq!(parse_sqlite_url("sqlite://").unwrap(), SqliteTarget::Memory);
        assert_eq!(parse_sqlite_url("sqlite:///:memory:").unwrap(), SqliteTarget::Memory);
        assert_eq!(parse_sqlite_url(":memory:").unwrap(), SqliteTarget::Memory);
    }

    #[test]
    fn rejects_other_urls() {
        assert!(matches!(
            parse_sqlite_url("postgresql://localhost/invoices"),
            Err(PluginError::InvalidConfig(_))
        ));
        assert!(matches!(
            parse_sqlite_url("sqlite://host/invoices.db"),
            Err(PluginError::InvalidConfig(_))
        ));
    }
}
