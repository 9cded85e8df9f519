//! Composite request collections: cookies, uploaded files and name/value pairs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A cookie sent with the request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CookieEntry {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub domain: String,
    /// `None` for session cookies
    #[serde(default)]
    pub expires: Option<DateTime<Utc>>,
    #[serde(default = "default_cookie_path")]
    pub path: String,
}

fn default_cookie_path() -> String {
    "/".to_string()
}

impl CookieEntry {
    /// Session cookie scoped to `/` with no domain
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: String::new(),
            expires: None,
            path: default_cookie_path(),
        }
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = domain.into();
        self
    }

    pub fn with_expires(mut self, expires: DateTime<Utc>) -> Self {
        self.expires = Some(expires);
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// Cookies in the order the request carried them. Repeated names are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CookieCollection {
    cookies: Vec<CookieEntry>,
}

impl CookieCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cookie: CookieEntry) {
        self.cookies.push(cookie);
    }

    /// First cookie with the given name
    pub fn get(&self, name: &str) -> Option<&CookieEntry> {
        self.cookies.iter().find(|cookie| cookie.name == name)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CookieEntry> {
        self.cookies.iter()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }
}

impl FromIterator<CookieEntry> for CookieCollection {
    fn from_iter<I: IntoIterator<Item = CookieEntry>>(iter: I) -> Self {
        Self {
            cookies: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CookieCollection {
    type Item = &'a CookieEntry;
    type IntoIter = std::slice::Iter<'a, CookieEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.cookies.iter()
    }
}

/// An uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub file_name: String,
    pub content_length: u64,
    pub content_type: String,
}

impl FileEntry {
    pub fn new(
        file_name: impl Into<String>,
        content_length: u64,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            content_length,
            content_type: content_type.into(),
        }
    }
}

/// A file together with the form field key it was submitted under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyedFile {
    pub key: String,
    #[serde(flatten)]
    pub file: FileEntry,
}

/// Uploaded files keyed by form field, in submission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileCollection {
    files: Vec<KeyedFile>,
}

impl FileCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: impl Into<String>, file: FileEntry) {
        self.files.push(KeyedFile {
            key: key.into(),
            file,
        });
    }

    /// First file submitted under the key
    pub fn get(&self, key: &str) -> Option<&FileEntry> {
        self.files
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.file)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FileEntry)> {
        self.files
            .iter()
            .map(|entry| (entry.key.as_str(), &entry.file))
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FileEntry)> for FileCollection {
    fn from_iter<I: IntoIterator<Item = (K, FileEntry)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (key, file) in iter {
            collection.add(key, file);
        }
        collection
    }
}

/// One key of a name/value collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValueEntry {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// Form fields, headers or query parameters.
///
/// A key added twice is collapsed into the first entry: keys compare ASCII case-insensitively,
/// the first spelling and position are kept, and values are joined with `,`. Absent values do
/// not take part in the join. Each key therefore appears once, carrying its combined value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<NameValueEntry>", into = "Vec<NameValueEntry>")]
pub struct NameValueCollection {
    entries: Vec<NameValueEntry>,
}

impl NameValueCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value, merging it into an existing entry for the same key
    pub fn add(&mut self, key: impl Into<String>, value: Option<String>) {
        let key = key.into();
        match self
            .entries
            .iter_mut()
            .find(|entry| entry.key.eq_ignore_ascii_case(&key))
        {
            Some(existing) => {
                let Some(value) = value else {
                    return;
                };
                match existing.value {
                    Some(ref mut current) => {
                        current.push(',');
                        current.push_str(&value);
                    }
                    None => existing.value = Some(value),
                }
            }
            None => self.entries.push(NameValueEntry { key, value }),
        }
    }

    /// Combined value for the key. `Some(None)` means the key exists without a value.
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries
            .iter()
            .find(|entry| entry.key.eq_ignore_ascii_case(key))
            .map(|entry| entry.value.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|entry| (entry.key.as_str(), entry.value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<NameValueEntry>> for NameValueCollection {
    fn from(entries: Vec<NameValueEntry>) -> Self {
        let mut collection = Self::new();
        for entry in entries {
            collection.add(entry.key, entry.value);
        }
        collection
    }
}

impl From<NameValueCollection> for Vec<NameValueEntry> {
    fn from(collection: NameValueCollection) -> Self {
        collection.entries
    }
}

impl<K, V> FromIterator<(K, V)> for NameValueCollection
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut collection = Self::new();
        for (key, value) in iter {
            collection.add(key, Some(value.into()));
        }
        collection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_value_collapses_repeated_keys() {
        let mut form = NameValueCollection::new();
        form.add("tag", Some("a".to_string()));
        form.add("other", Some("x".to_string()));
        form.add("TAG", Some("b".to_string()));

        assert_eq!(form.len(), 2);
        assert_eq!(form.get("tag"), Some(Some("a,b")));
        assert_eq!(form.keys().collect::<Vec<_>>(), vec!["tag", "other"]);
    }

    #[test]
    fn test_name_value_absent_values() {
        let mut headers = NameValueCollection::new();
        headers.add("X-Empty", None);
        assert_eq!(headers.get("x-empty"), Some(None));

        headers.add("X-Empty", Some("later".to_string()));
        assert_eq!(headers.get("X-Empty"), Some(Some("later")));

        headers.add("X-Empty", None);
        assert_eq!(headers.get("X-Empty"), Some(Some("later")));
        assert_eq!(headers.get("missing"), None);
    }

    #[test]
    fn test_name_value_from_iterator() {
        let params: NameValueCollection = [("username", "john_smith"), ("password", "secret")]
            .into_iter()
            .collect();

        assert!(params.contains_key("USERNAME"));
        assert_eq!(
            params.iter().collect::<Vec<_>>(),
            vec![("username", Some("john_smith")), ("password", Some("secret"))]
        );
    }

    #[test]
    fn test_name_value_deserialization_collapses() {
        let json = r#"[{"key":"a","value":"1"},{"key":"A","value":"2"},{"key":"b","value":null}]"#;
        let collection: NameValueCollection = serde_json::from_str(json).unwrap();

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get("a"), Some(Some("1,2")));
        assert_eq!(collection.get("b"), Some(None));
    }

    #[test]
    fn test_cookie_defaults() {
        let cookie = CookieEntry::new("test-1", "My First Cookie!");
        assert_eq!(cookie.domain, "");
        assert_eq!(cookie.path, "/");
        assert!(cookie.expires.is_none());

        let parsed: CookieEntry = serde_json::from_str(r#"{"name":"n","value":"v"}"#).unwrap();
        assert_eq!(parsed, CookieEntry::new("n", "v"));
    }

    #[test]
    fn test_file_collection_lookup() {
        let files: FileCollection = [
            ("avatar", FileEntry::new("me.png", 10, "image/png")),
            ("avatar", FileEntry::new("other.png", 20, "image/png")),
        ]
        .into_iter()
        .collect();

        assert_eq!(files.len(), 2);
        assert_eq!(files.get("avatar").map(|f| f.content_length), Some(10));
        assert_eq!(files.keys().collect::<Vec<_>>(), vec!["avatar", "avatar"]);
    }
}
