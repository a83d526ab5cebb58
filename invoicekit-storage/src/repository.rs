use invoicekit_model::Record;
use std::sync::Arc;

use crate::error::StorageResult;

/// CRUD operations every backend provides for one entity kind.
///
/// Ids are allocated by the repository; the id carried by the record passed
/// to [`create`](Repository::create) is ignored.
pub trait Repository<T: Record>: Send + Sync {
    /// Allocates a new id, persists the record under it and returns it.
    fn create(&self, entity: T) -> StorageResult<T>;

    fn get_by_id(&self, id: i64) -> StorageResult<Option<T>>;

    /// Records ordered by ascending id. A `skip` past the end yields an empty page.
    fn get_all(&self, skip: usize, limit: usize) -> StorageResult<Vec<T>>;

    /// Replaces the stored record with the same id.
    ///
    /// Fails with [`StorageError::NotFound`](crate::StorageError::NotFound)
    /// when no record has that id.
    fn update(&self, entity: T) -> StorageResult<T>;

    /// `true` when a record was removed; deleting a missing id is not an error.
    fn delete(&self, id: i64) -> StorageResult<bool>;

    /// Every record, ordered by id.
    fn list_all(&self) -> StorageResult<Vec<T>> {
        self.get_all(0, usize::MAX)
    }
}

/// A repository shared between the plugin that owns it and its callers.
pub type SharedRepository<T> = Arc<dyn Repository<T>>;

/// Applies `skip`/`limit` to an id-ordered sequence.
pub(crate) fn paginate<T>(records: impl IntoIterator<Item = T>, skip: usize, limit: usize) -> Vec<T> {
    records.into_iter().skip(skip).take(limit).collect()
}
