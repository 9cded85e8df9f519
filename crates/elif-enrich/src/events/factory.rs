//! Property construction

use super::property::Property;
use super::value::PropertyValue;

/// Builds immutable properties from a name and a value.
///
/// Enrichers never construct [`Property`] directly; the pipeline hands them a factory so
/// hosts can intercept property creation (interning names, capping value sizes, ...).
pub trait PropertyFactory: Send + Sync {
    fn create_property(&self, name: &str, value: PropertyValue) -> Property;
}

/// Factory that stores names and values as given
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultPropertyFactory;

impl PropertyFactory for DefaultPropertyFactory {
    fn create_property(&self, name: &str, value: PropertyValue) -> Property {
        Property::new(name, value)
    }
}
