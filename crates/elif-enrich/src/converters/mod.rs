//! Flattening of request collections into named properties
//!
//! All converters build names through [`property_name`], so every collection kind follows
//! the same `prefix[key].Field` shape that log queries and dashboards rely on.

pub mod cookie;
pub mod file;
pub mod name_value;

pub use cookie::CookieConverter;
pub use file::FileConverter;
pub use name_value::NameValueConverter;

use crate::events::Property;

/// Lazy sequence of properties produced by a converter
pub type PropertyIter<'a> = Box<dyn Iterator<Item = Property> + 'a>;

/// Turns one composite collection into properties.
///
/// An absent or empty collection yields an empty sequence. Calling `convert` again on the
/// same collection yields the same sequence. Duplicate names are possible when the source
/// repeats a key; resolving them is left to the event's add-if-absent merge.
pub trait PropertyConverter {
    type Collection: ?Sized;

    /// Properties emitted for each entry of the collection
    const PROPERTIES_PER_ENTRY: usize;

    /// Name prefix shared by every property this converter emits
    fn prefix(&self) -> &str;

    fn convert<'a>(&'a self, collection: Option<&'a Self::Collection>) -> PropertyIter<'a>;
}

/// `prefix[key]` or `prefix[key].field`
pub fn property_name(prefix: &str, key: &str, field: Option<&str>) -> String {
    let mut name = String::with_capacity(
        prefix.len() + key.len() + 3 + field.map_or(0, str::len),
    );
    name.push_str(prefix);
    name.push('[');
    name.push_str(key);
    name.push(']');
    if let Some(field) = field {
        name.push('.');
        name.push_str(field);
    }
    name
}
