//! Storage settings: defaults, an optional TOML file, then `INVOICES_*`
//! environment variables, in increasing precedence.
//!
//! ```toml
//! backend = "files"
//! storage_path = "./data"
//! file_format = "xml"
//! ```

use invoicekit_storage::DocumentFormat;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::error::{PluginError, PluginResult};
use crate::plugin::PluginConfig;

/// Prefix of every environment variable read by [`StorageSettings::apply_env`].
pub const ENV_PREFIX: &str = "INVOICES_";

/// Storage backends known to the configuration surface.
///
/// Postgres and MySQL are accepted here but have no plugin in this build, so
/// selecting them fails at factory construction with the available names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Memory,
    Files,
    Sqlite,
    Postgres,
    Mysql,
}

impl BackendKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BackendKind::Memory => "memory",
            BackendKind::Files => "files",
            BackendKind::Sqlite => "sqlite",
            BackendKind::Postgres => "postgres",
            BackendKind::Mysql => "mysql",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(BackendKind::Memory),
            "files" => Ok(BackendKind::Files),
            "sqlite" => Ok(BackendKind::Sqlite),
            "postgres" => Ok(BackendKind::Postgres),
            "mysql" => Ok(BackendKind::Mysql),
            other => Err(PluginError::InvalidConfig(format!(
                "unknown backend '{other}' (expected memory, files, sqlite, postgres or mysql)"
            ))),
        }
    }
}

/// Structured configuration the repository factory is built from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: BackendKind,
    pub database_url: Option<String>,
    pub database_echo: bool,
    /// Root directory of the files backend.
    pub storage_path: PathBuf,
    /// Format of new documents in the files backend.
    pub file_format: DocumentFormat,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            database_url: None,
            database_echo: false,
            storage_path: PathBuf::from("./data"),
            file_format: DocumentFormat::Json,
        }
    }
}

impl StorageSettings {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> PluginResult<Self> {
        let mut settings = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        settings.apply_env()?;
        Ok(settings)
    }

    /// Defaults overridden by the process environment.
    pub fn from_env() -> PluginResult<Self> {
        let mut settings = Self::default();
        settings.apply_env()?;
        Ok(settings)
    }

    pub fn from_toml_str(contents: &str) -> PluginResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_toml_file(path: &Path) -> PluginResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let settings = Self::from_toml_str(&contents)?;
        info!(path = %path.display(), backend = %settings.backend, "Loaded storage settings");
        Ok(settings)
    }

    pub fn apply_env(&mut self) -> PluginResult<()> {
        self.apply_env_with(|key| std::env::var(key).ok())
    }

    /// Overrides fields from `INVOICES_*` variables resolved through `lookup`.
    /// Values are case-insensitive; an empty `INVOICES_DATABASE_URL` clears the URL.
    pub fn apply_env_with<F>(&mut self, lookup: F) -> PluginResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(value) = var("BACKEND") {
            self.backend = value.parse()?;
        }
        if let Some(value) = var("DATABASE_URL") {
            let value = value.trim();
            self.database_url = (!value.is_empty()).then(|| value.to_string());
        }
        if let Some(value) = var("DATABASE_ECHO") {
            self.database_echo = parse_bool("INVOICES_DATABASE_ECHO", &value)?;
        }
        if let Some(value) = var("STORAGE_PATH") {
            self.storage_path = PathBuf::from(value);
        }
        if let Some(value) = var("FILE_FORMAT") {
            self.file_format = value
                .parse()
                .map_err(|e| PluginError::InvalidConfig(format!("INVOICES_FILE_FORMAT: {e}")))?;
        }
        Ok(())
    }

    /// The option bag handed to the selected plugin.
    ///
    /// The storage path and file format only matter to the files backend and
    /// are left out for the others.
    pub fn to_plugin_config(&self) -> PluginConfig {
        let mut config = PluginConfig::new().with_echo(self.database_echo);
        if let Some(url) = &self.database_url {
            config = config.with_database_url(url.clone());
        }
        if self.backend == BackendKind::Files {
            config = config
                .with_root_dir(self.storage_path.clone())
                .with_file_format(self.file_format);
        }
        config
    }

    /// The database URL with everything after the scheme masked.
    pub fn redacted_database_url(&self) -> Option<String> {
        self.database_url.as_deref().map(|url| match url.split_once("://") {
            Some((scheme, _)) => format!("{scheme}://***"),
            None => "***".to_string(),
        })
    }
}

fn parse_bool(name: &str, value: &str) -> PluginResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(PluginError::InvalidConfig(format!(
            "{name}: '{other}' is not a boolean"
        ))),
    }
}
