//! One directory of documents per entity kind.
//!
//! Layout of an entity directory:
//!
//! ```text
//! <root>/<entity>/_meta.json            {"next_id": n}
//! <root>/<entity>/<id>.<ext>            json | yaml | yml | xml | md
//! <root>/<entity>/<id>.<friendly>.<ext> same document, human-readable name
//! ```
//!
//! A document keeps its file name and format across saves unless a different
//! format is requested explicitly.

use invoicekit_model::{EntityShape, Record};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::codec::{CodecSupport, DocumentFormat, decode_document, encode_document};
use crate::error::{StorageError, StorageResult};
use crate::sequence::SequenceCounter;

/// File-backed document store for records of type `T`.
#[derive(Debug)]
pub struct FileDocumentStore<T: Record> {
    entity_name: String,
    entity_dir: PathBuf,
    default_format: DocumentFormat,
    codecs: CodecSupport,
    shape: EntityShape,
    counter: SequenceCounter,
    _record: PhantomData<fn() -> T>,
}

impl<T: Record> FileDocumentStore<T> {
    /// Opens (creating if needed) `<root_dir>/<entity_name>` with every codec
    /// compiled into this build.
    pub fn open(
        root_dir: impl AsRef<Path>,
        entity_name: &str,
        default_format: DocumentFormat,
    ) -> StorageResult<Self> {
        Self::with_codecs(root_dir, entity_name, default_format, CodecSupport::detect())
    }

    /// Like [`open`](Self::open) but with an explicit codec set.
    ///
    /// Opening never fails for lack of a codec, even when `default_format`
    /// needs one; the error surfaces on the first save that uses it.
    pub fn with_codecs(
        root_dir: impl AsRef<Path>,
        entity_name: &str,
        default_format: DocumentFormat,
        codecs: CodecSupport,
    ) -> StorageResult<Self> {
        let entity_dir = root_dir.as_ref().join(entity_name);
        fs::create_dir_all(&entity_dir)?;

        let floor = scan_ids(&entity_dir)?
            .last()
            .map_or(1, |max| max.saturating_add(1));
        let counter = SequenceCounter::load(&entity_dir, floor);

        debug!(
            entity = entity_name,
            dir = %entity_dir.display(),
            format = %default_format,
            yaml = codecs.yaml_available(),
            "Opened document store"
        );

        Ok(Self {
            entity_name: entity_name.to_string(),
            entity_dir,
            default_format,
            codecs,
            shape: T::shape(),
            counter,
            _record: PhantomData,
        })
    }

    pub fn entity_dir(&self) -> &Path {
        &self.entity_dir
    }

    pub fn default_format(&self) -> DocumentFormat {
        self.default_format
    }

    pub fn codecs(&self) -> CodecSupport {
        self.codecs
    }

    /// Allocates the next id and persists the counter before returning it.
    pub fn get_next_id(&self) -> StorageResult<i64> {
        self.counter.allocate()
    }

    /// The id the next allocation would return, without allocating it.
    pub fn peek_next_id(&self) -> StorageResult<i64> {
        self.counter.peek()
    }

    /// Locates the document for `id`, whatever its format or friendly name.
    ///
    /// Exact names `{id}.{ext}` win, probed in [`DocumentFormat::LOOKUP_EXTENSIONS`]
    /// order. Otherwise the smallest file name starting with `"{id}."` and
    /// ending in a known extension is used.
    pub fn find_document(&self, id: i64) -> StorageResult<Option<PathBuf>> {
        for ext in DocumentFormat::LOOKUP_EXTENSIONS {
            let path = self.entity_dir.join(format!("{id}.{ext}"));
            if path.is_file() {
                return Ok(Some(path));
            }
        }

        let prefix = format!("{id}.");
        let mut best: Option<(String, PathBuf)> = None;
        for entry in fs::read_dir(&self.entity_dir)? {
            let entry = entry?;
            let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
                continue;
            };
            if !name.starts_with(&prefix) {
                continue;
            }
            let path = entry.path();
            if !path.is_file() || DocumentFormat::of_path(&path).is_none() {
                continue;
            }
            if best.as_ref().is_none_or(|(current, _)| name < *current) {
                best = Some((name, path));
            }
        }
        Ok(best.map(|(_, path)| path))
    }

    /// Writes `entity` as document `id` and returns the file written.
    ///
    /// With `format == None` an existing document keeps its format and name,
    /// and a new one uses the store's default format. Requesting a different
    /// format than the existing document's replaces that file.
    pub fn save(
        &self,
        entity: &T,
        id: i64,
        format: Option<DocumentFormat>,
    ) -> StorageResult<PathBuf> {
        let existing = self.find_document(id)?;

        let (target, target_format) = match (&existing, format) {
            (Some(path), None) => (path.clone(), format_of(path)?),
            (Some(path), Some(requested)) if DocumentFormat::of_path(path) == Some(requested) => {
                (path.clone(), requested)
            }
            (_, requested) => {
                let fmt = requested.unwrap_or(self.default_format);
                (self.document_path(id, fmt), fmt)
            }
        };

        let mut value = serde_json::to_value(entity)?;
        if let Value::Object(fields) = &mut value {
            fields.insert("id".to_string(), Value::from(id));
        }
        let text = encode_document(&value, target_format, T::TYPE_NAME, self.codecs, &target)?;
        fs::write(&target, text)?;

        if let Some(old) = existing.filter(|old| *old != target) {
            fs::remove_file(&old)?;
            debug!(
                entity = %self.entity_name,
                id,
                from = %old.display(),
                to = %target.display(),
                "Replaced document with new format"
            );
        }

        debug!(entity = %self.entity_name, id, path = %target.display(), "Saved document");
        Ok(target)
    }

    /// Reads document `id`; `None` when no file exists for it.
    pub fn load(&self, id: i64) -> StorageResult<Option<T>> {
        let Some(path) = self.find_document(id)? else {
            return Ok(None);
        };
        self.read_document(id, &path).map(Some)
    }

    /// Every document in the directory, ordered by id.
    pub fn load_all(&self) -> StorageResult<Vec<T>> {
        let ids = self.ids()?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.load(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }

    /// Removes document `id`; `false` when there was nothing to remove.
    pub fn delete(&self, id: i64) -> StorageResult<bool> {
        match self.find_document(id)? {
            Some(path) => {
                fs::remove_file(&path)?;
                debug!(entity = %self.entity_name, id, path = %path.display(), "Deleted document");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn exists(&self, id: i64) -> StorageResult<bool> {
        Ok(self.find_document(id)?.is_some())
    }

    /// Ids of all documents on disk, ascending and without duplicates.
    pub fn ids(&self) -> StorageResult<Vec<i64>> {
        scan_ids(&self.entity_dir)
    }

    /// Removes every document and restarts the id sequence at 1.
    pub fn clear(&self) -> StorageResult<()> {
        let mut removed = 0usize;
        for entry in fs::read_dir(&self.entity_dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.is_file() && entry.file_name().to_str().and_then(document_id).is_some() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
        self.counter.reset()?;
        debug!(entity = %self.entity_name, removed, "Cleared document store");
        Ok(())
    }

    fn document_path(&self, id: i64, format: DocumentFormat) -> PathBuf {
        self.entity_dir.join(format!("{id}.{}", format.extension()))
    }

    fn read_document(&self, id: i64, path: &Path) -> StorageResult<T> {
        let format = format_of(path)?;
        let text = fs::read_to_string(path)?;
        let value = decode_document(&text, format, &self.shape, self.codecs, path)?;
        let mut record: T = serde_json::from_value(value)?;
        // The file name is authoritative for the id.
        if record.id() != id {
            record.set_id(id);
        }
        debug!(entity = %self.entity_name, id, path = %path.display(), "Loaded document");
        Ok(record)
    }
}

fn format_of(path: &Path) -> StorageResult<DocumentFormat> {
    DocumentFormat::of_path(path).ok_or_else(|| {
        StorageError::UnsupportedFormat(
            path.extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default(),
        )
    })
}

fn scan_ids(dir: &Path) -> StorageResult<Vec<i64>> {
    let mut ids = BTreeSet::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if let Some(id) = entry.file_name().to_str().and_then(document_id) {
            ids.insert(id);
        }
    }
    Ok(ids.into_iter().collect())
}

/// Id encoded in a document file name: digits, a dot, then anything ending
/// in a known extension. Metadata (`_`) and hidden (`.`) files never match.
fn document_id(file_name: &str) -> Option<i64> {
    if file_name.starts_with(['_', '.']) {
        return None;
    }
    let (digits, rest) = file_name.split_once('.')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let ext = rest.rsplit('.').next()?;
    DocumentFormat::from_extension(ext)?;
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::document_id;

    #[test]
    fn document_ids_from_file_names() {
        assert_eq!(document_id("7.json"), Some(7));
        assert_eq!(document_id("7.acme-invoice.json"), Some(7));
        assert_eq!(document_id("12.yml"), Some(12));
        assert_eq!(document_id("_meta.json"), None);
        assert_eq!(document_id(".7.json"), None);
        assert_eq!(document_id("7.txt"), None);
        assert_eq!(document_id("7"), None);
        assert_eq!(document_id("x7.json"), None);
        assert_eq!(document_id("-1.json"), None);
        assert_eq!(document_id(".json"), None);
    }
}
