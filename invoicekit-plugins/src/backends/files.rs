use invoicekit_model::{EntityKind, Record};
use invoicekit_storage::{CodecSupport, DocumentFormat, FileRepository, SharedRepository};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::PluginResult;
use crate::plugin::{PluginConfig, RepositorySet, StoragePlugin};

/// Root directory used when the configuration names none.
pub const DEFAULT_ROOT_DIR: &str = "./data";

const HEALTH_PROBE: &str = ".health-probe";

/// One directory of documents per entity kind under a common root.
#[derive(Default)]
pub struct FilesPlugin {
    codecs: Option<CodecSupport>,
    root_dir: Option<PathBuf>,
    repositories: Option<RepositorySet>,
}

impl FilesPlugin {
    pub const NAME: &'static str = "files";

    /// A plugin restricted to `codecs` instead of everything compiled in.
    pub fn with_codecs(codecs: CodecSupport) -> Self {
        Self {
            codecs: Some(codecs),
            ..Self::default()
        }
    }

    pub fn root_dir(&self) -> Option<&Path> {
        self.root_dir.as_deref()
    }
}

fn open_repository<T: Record>(
    root: &Path,
    kind: EntityKind,
    format: DocumentFormat,
    codecs: CodecSupport,
) -> PluginResult<SharedRepository<T>> {
    let repo = FileRepository::<T>::open(root, kind.collection_name(), format, codecs)?;
    Ok(Arc::new(repo))
}

impl StoragePlugin for FilesPlugin {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn initialize(&mut self, config: &PluginConfig) -> PluginResult<()> {
        if self.repositories.is_some() {
            debug!(backend = Self::NAME, "Plugin already initialized");
            return Ok(());
        }

        let root = config
            .root_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROOT_DIR));
        let format = config.file_format.unwrap_or_default();
        let codecs = self.codecs.unwrap_or_else(CodecSupport::detect);
        fs::create_dir_all(&root)?;

        self.repositories = Some(RepositorySet {
            invoices: open_repository(&root, EntityKind::Invoice, format, codecs)?,
            clients: open_repository(&root, EntityKind::Client, format, codecs)?,
            payments: open_repository(&root, EntityKind::Payment, format, codecs)?,
            companies: open_repository(&root, EntityKind::Company, format, codecs)?,
            products: open_repository(&root, EntityKind::Product, format, codecs)?,
            payment_notes: open_repository(&root, EntityKind::PaymentNote, format, codecs)?,
            audit_logs: open_repository(&root, EntityKind::AuditLog, format, codecs)?,
        });
        info!(
            backend = Self::NAME,
            root = %root.display(),
            format = %format,
            "Storage plugin initialized"
        );
        self.root_dir = Some(root);
        Ok(())
    }

    fn repositories(&self) -> Option<&RepositorySet> {
        self.repositories.as_ref()
    }

    /// Root exists, is a directory and accepts a new file.
    fn health_check(&self) -> bool {
        let Some(root) = &self.root_dir else {
            return false;
        };
        if !root.is_dir() {
            return false;
        }
        let probe = root.join(HEALTH_PROBE);
        match fs::write(&probe, b"ok").and_then(|()| fs::remove_file(&probe)) {
            Ok(()) => true,
            Err(e) => {
                warn!(backend = Self::NAME, root = %root.display(), "Health probe failed: {}", e);
                false
            }
        }
    }

    /// Documents stay on disk; only the handles are released.
    fn cleanup(&mut self) -> PluginResult<()> {
        self.repositories = None;
        if let Some(root) = self.root_dir.take() {
            info!(backend = Self::NAME, root = %root.display(), "Storage plugin cleaned up");
        }
        Ok(())
    }
}
