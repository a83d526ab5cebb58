use invoicekit_model::Record;
use std::path::Path;

use crate::codec::{CodecSupport, DocumentFormat};
use crate::error::{StorageError, StorageResult};
use crate::file_store::FileDocumentStore;
use crate::repository::{Repository, paginate};

/// [`Repository`] over a [`FileDocumentStore`].
#[derive(Debug)]
pub struct FileRepository<T: Record> {
    store: FileDocumentStore<T>,
}

impl<T: Record> FileRepository<T> {
    pub fn new(store: FileDocumentStore<T>) -> Self {
        Self { store }
    }

    /// Opens the store for `entity_name` under `root_dir`.
    pub fn open(
        root_dir: impl AsRef<Path>,
        entity_name: &str,
        default_format: DocumentFormat,
        codecs: CodecSupport,
    ) -> StorageResult<Self> {
        FileDocumentStore::with_codecs(root_dir, entity_name, default_format, codecs).map(Self::new)
    }

    pub fn store(&self) -> &FileDocumentStore<T> {
        &self.store
    }

    /// Creates a record in an explicit format instead of the store default.
    pub fn create_as(&self, mut entity: T, format: DocumentFormat) -> StorageResult<T> {
        let id = self.store.get_next_id()?;
        entity.set_id(id);
        self.store.save(&entity, id, Some(format))?;
        Ok(entity)
    }
}

impl<T: Record> Repository<T> for FileRepository<T> {
    fn create(&self, mut entity: T) -> StorageResult<T> {
        let id = self.store.get_next_id()?;
        entity.set_id(id);
        self.store.save(&entity, id, None)?;
        Ok(entity)
    }

    fn get_by_id(&self, id: i64) -> StorageResult<Option<T>> {
        self.store.load(id)
    }

    fn get_all(&self, skip: usize, limit: usize) -> StorageResult<Vec<T>> {
        let ids = paginate(self.store.ids()?, skip, limit);
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.store.load(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    fn update(&self, entity: T) -> StorageResult<T> {
        let id = entity.id();
        if !self.store.exists(id)? {
            return Err(StorageError::NotFound {
                kind: T::TYPE_NAME,
                id,
            });
        }
        self.store.save(&entity, id, None)?;
        Ok(entity)
    }

    fn delete(&self, id: i64) -> StorageResult<bool> {
        self.store.delete(id)
    }
}
