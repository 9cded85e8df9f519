//! Uploaded files

use super::{property_name, PropertyConverter, PropertyIter};
use crate::events::{Property, PropertyFactory, PropertyValue};
use crate::snapshot::{FileCollection, FileEntry};

/// Three properties per file key: `FileName`, `ContentLength`, `ContentType`
pub struct FileConverter<'f> {
    factory: &'f dyn PropertyFactory,
    prefix: String,
}

impl<'f> FileConverter<'f> {
    pub fn new(factory: &'f dyn PropertyFactory, prefix: impl Into<String>) -> Self {
        Self {
            factory,
            prefix: prefix.into(),
        }
    }

    fn file_properties(&self, key: &str, file: &FileEntry) -> [Property; 3] {
        let create = |field: &str, value: PropertyValue| {
            self.factory
                .create_property(&property_name(&self.prefix, key, Some(field)), value)
        };

        [
            create("FileName", file.file_name.as_str().into()),
            create("ContentLength", file.content_length.into()),
            create("ContentType", file.content_type.as_str().into()),
        ]
    }
}

impl PropertyConverter for FileConverter<'_> {
    type Collection = FileCollection;
    const PROPERTIES_PER_ENTRY: usize = 3;

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn convert<'a>(&'a self, collection: Option<&'a FileCollection>) -> PropertyIter<'a> {
        let Some(collection) = collection else {
            return Box::new(std::iter::empty());
        };

        Box::new(
            collection
                .iter()
                .flat_map(move |(key, file)| self.file_properties(key, file)),
        )
    }
}
