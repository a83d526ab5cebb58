//! Storage layer for InvoiceKit.
//!
//! Provides the repository contract every backend implements and the
//! building blocks of the built-in backends.
//!
//! # Architecture
//!
//! - [`Repository`] is the CRUD contract, one instance per entity kind
//! - [`FileDocumentStore`] keeps one document per record in a directory, in
//!   JSON, XML, Markdown frontmatter or (with the `yaml` feature) YAML
//! - [`MemoryRepository`] keeps records in process memory
//! - `SqliteDatabase` (feature `sqlite`) keeps records in SQLite tables
//! - [`queries`] adds kind-specific finders on top of any repository

pub mod codec;
mod error;
mod file_repository;
mod file_store;
mod memory;
pub mod queries;
mod repository;
mod sequence;
#[cfg(feature = "sqlite")]
mod sqlite;

pub use codec::{CodecSupport, DocumentFormat};
pub use error::{StorageError, StorageResult};
pub use file_repository::FileRepository;
pub use file_store::FileDocumentStore;
pub use memory::MemoryRepository;
pub use queries::{
    AuditLogQueries, ClientQueries, CompanyQueries, InvoiceQueries, InvoiceSummary,
    PaymentNoteQueries, PaymentQueries, ProductQueries,
};
pub use repository::{Repository, SharedRepository};
pub use sequence::META_FILE;
#[cfg(feature = "sqlite")]
pub use sqlite::{SqliteDatabase, SqliteRepository};
