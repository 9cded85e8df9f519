//! Named property values

use super::value::PropertyValue;
use serde::Serialize;

/// A named value attached to a log event
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    name: String,
    value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &PropertyValue {
        &self.value
    }

    pub fn into_parts(self) -> (String, PropertyValue) {
        (self.name, self.value)
    }
}
