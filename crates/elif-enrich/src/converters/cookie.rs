//! Request cookies

use super::{property_name, PropertyConverter, PropertyIter};
use crate::events::{Property, PropertyFactory, PropertyValue};
use crate::snapshot::{CookieCollection, CookieEntry};
use chrono::{DateTime, Utc};

/// Universal sortable pattern, always UTC: `2020-01-01 00:00:00Z`
const EXPIRES_FORMAT: &str = "%Y-%m-%d %H:%M:%SZ";

/// Five properties per cookie: `Name`, `Value`, `Domain`, `Expires`, `Path`
pub struct CookieConverter<'f> {
    factory: &'f dyn PropertyFactory,
    prefix: String,
}

impl<'f> CookieConverter<'f> {
    pub fn new(factory: &'f dyn PropertyFactory, prefix: impl Into<String>) -> Self {
        Self {
            factory,
            prefix: prefix.into(),
        }
    }

    fn cookie_properties(&self, cookie: &CookieEntry) -> [Property; 5] {
        let create = |field: &str, value: PropertyValue| {
            self.factory
                .create_property(&property_name(&self.prefix, &cookie.name, Some(field)), value)
        };

        [
            create("Name", cookie.name.as_str().into()),
            create("Value", cookie.value.as_str().into()),
            create("Domain", cookie.domain.as_str().into()),
            create("Expires", cookie.expires.map(format_expires).into()),
            create("Path", cookie.path.as_str().into()),
        ]
    }
}

impl PropertyConverter for CookieConverter<'_> {
    type Collection = CookieCollection;
    const PROPERTIES_PER_ENTRY: usize = 5;

    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn convert<'a>(&'a self, collection: Option<&'a CookieCollection>) -> PropertyIter<'a> {
        let Some(collection) = collection else {
            return Box::new(std::iter::empty());
        };

        Box::new(
            collection
                .iter()
                .flat_map(move |cookie| self.cookie_properties(cookie)),
        )
    }
}

pub(crate) fn format_expires(expires: DateTime<Utc>) -> String {
    expires.format(EXPIRES_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::DefaultPropertyFactory;
    use chrono::TimeZone;

    fn convert(collection: &CookieCollection) -> Vec<Property> {
        CookieConverter::new(&DefaultPropertyFactory, "Request.Cookies")
            .convert(Some(collection))
            .collect()
    }

    #[test]
    fn test_five_properties_per_cookie() {
        let cookies: CookieCollection = (1..=3)
            .map(|i| CookieEntry::new(format!("test-{}", i), format!("cookie {}", i)))
            .collect();

        let properties = convert(&cookies);
        assert_eq!(properties.len(), 15);

        let names: Vec<&str> = properties[..5].iter().map(Property::name).collect();
        assert_eq!(
            names,
            vec![
                "Request.Cookies[test-1].Name",
                "Request.Cookies[test-1].Value",
                "Request.Cookies[test-1].Domain",
                "Request.Cookies[test-1].Expires",
                "Request.Cookies[test-1].Path",
            ]
        );
        assert!(properties[5].name().starts_with("Request.Cookies[test-2]"));
    }

    #[test]
    fn test_cookie_values() {
        let expires = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let cookies: CookieCollection = [CookieEntry::new("test-1", "My First Cookie!")
            .with_expires(expires)]
        .into_iter()
        .collect();

        let properties = convert(&cookies);
        assert_eq!(properties[0].value().as_str(), Some("test-1"));
        assert_eq!(properties[1].value().as_str(), Some("My First Cookie!"));
        assert_eq!(properties[2].value().as_str(), Some(""));
        assert_eq!(properties[3].value().as_str(), Some("2020-01-01 00:00:00Z"));
        assert_eq!(properties[4].value().as_str(), Some("/"));
    }

    #[test]
    fn test_session_cookie_has_null_expiry() {
        let cookies: CookieCollection = [CookieEntry::new("sid", "1")].into_iter().collect();
        let properties = convert(&cookies);
        assert_eq!(properties[3].value(), &PropertyValue::null());
    }

    #[test]
    fn test_expires_is_rendered_in_utc() {
        let offset = chrono::FixedOffset::east_opt(2 * 3600).unwrap();
        let local = offset.with_ymd_and_hms(2021, 6, 15, 12, 30, 45).unwrap();
        assert_eq!(format_expires(local.with_timezone(&Utc)), "2021-06-15 10:30:45Z");
    }

    #[test]
    fn test_repeated_names_are_emitted() {
        let cookies: CookieCollection = [CookieEntry::new("dup", "first"), CookieEntry::new("dup", "second")]
            .into_iter()
            .collect();

        let properties = convert(&cookies);
        assert_eq!(properties.len(), 10);
        assert_eq!(properties[1].name(), properties[6].name());
    }

    #[test]
    fn test_absent_collection() {
        let converter = CookieConverter::new(&DefaultPropertyFactory, "Request.Cookies");
        assert_eq!(converter.convert(None).count(), 0);
    }
}
