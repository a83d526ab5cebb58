use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::EntityShape;

/// A persistable record identified by an integer id.
///
/// Storage backends only see records through this trait: the serde
/// representation is the canonical ordered field mapping, and `shape()`
/// declares how each field must be read back from lossy formats.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Name of the record type, used as the XML root element.
    const TYPE_NAME: &'static str;

    fn id(&self) -> i64;

    fn set_id(&mut self, id: i64);

    fn shape() -> EntityShape;
}
