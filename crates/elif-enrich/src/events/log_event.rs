//! Log event record with add-if-absent property merging

use super::property::Property;
use super::value::PropertyValue;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeStruct, Serializer};
use tracing::Level;

/// A structured log event as it travels through the enrichment pipeline.
///
/// Properties keep their insertion order. Names are unique: [`LogEvent::add_property_if_absent`]
/// silently drops a property whose name is already present, so the first writer wins.
#[derive(Debug, Clone)]
pub struct LogEvent {
    timestamp: DateTime<Utc>,
    level: Level,
    message: String,
    properties: IndexMap<String, PropertyValue>,
}

impl LogEvent {
    /// Create an event stamped with the current time
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self::with_timestamp(Utc::now(), level, message)
    }

    pub fn with_timestamp(timestamp: DateTime<Utc>, level: Level, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
            properties: IndexMap::new(),
        }
    }

    /// Builder-style property for caller-set values
    pub fn with_property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.add_or_update_property(Property::new(name, value));
        self
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Add the property unless one with the same name exists.
    ///
    /// Returns `true` when the property was added.
    pub fn add_property_if_absent(&mut self, property: Property) -> bool {
        let (name, value) = property.into_parts();
        if self.properties.contains_key(&name) {
            return false;
        }
        self.properties.insert(name, value);
        true
    }

    /// Add the property, replacing any existing value in place
    pub fn add_or_update_property(&mut self, property: Property) {
        let (name, value) = property.into_parts();
        self.properties.insert(name, value);
    }

    pub fn remove_property(&mut self, name: &str) -> Option<PropertyValue> {
        self.properties.shift_remove(name)
    }

    pub fn contains_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// Properties in insertion order
    pub fn properties(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.properties.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Render the event as a JSON object
    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl Serialize for LogEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("LogEvent", 4)?;
        state.serialize_field("timestamp", &self.timestamp.to_rfc3339())?;
        state.serialize_field("level", self.level.as_str())?;
        state.serialize_field("message", &self.message)?;
        state.serialize_field("properties", &self.properties)?;
        state.end()
    }
}
