//! Form fields, headers and query parameters

use super::{property_name, PropertyConverter, PropertyIter};
use crate::events::{PropertyFactory, PropertyValue};
use crate::snapshot::NameValueCollection;

/// One `prefix[key]` property per key, carrying the value as the collection exposes it
pub struct NameValueConverter<'f> {
    factory: &'f dyn PropertyFactory,
    prefix: String,
}

impl<'f> NameValueConverter<'f> {
    pub fn new(factory: &'f dyn PropertyFactory, prefix: impl Into<String>) -> Self {
        Self {
            factory,
            prefix: prefix.into(),
        }
    }
}

impl PropertyConverter for NameValueConverter<'_> {
    type Collection = NameValueCollection;
    const PROPERTIES_PER_ENTRY: usize = 1;

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn convert<'a>(&'a self, collection: Option<&'a NameValueCollection>) -> PropertyIter<'a> {
        let Some(collection) = collection else {
            return Box::new(std::iter::empty());
        };

        Box::new(collection.iter().map(move |(key, value)| {
            self.factory.create_property(
                &property_name(&self.prefix, key, None),
                PropertyValue::from(value),
            )
        }))
    }
}
