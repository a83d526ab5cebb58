//! Built-in storage backends.

mod files;
mod memory;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use files::{DEFAULT_ROOT_DIR, FilesPlugin};
pub use memory::MemoryPlugin;
#[cfg(feature = "sqlite")]
pub use sqlite::{DEFAULT_DATABASE_URL, SqlitePlugin, SqliteTarget, parse_sqlite_url};
