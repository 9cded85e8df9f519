//! Owned, in-memory snapshots
//!
//! Host adapters copy what they need from their request type into [`RequestInfo`] once per
//! request; tests build it directly.

use super::collections::{
    CookieCollection, CookieEntry, FileCollection, FileEntry, NameValueCollection,
};
use super::context::ContextSnapshot;
use super::request::RequestSnapshot;
use crate::error::SnapshotResult;
use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use url::Url;

/// Plain-data request snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestInfo {
    pub accept_types: Vec<String>,
    pub anonymous_id: Option<String>,
    pub application_path: Option<String>,
    #[serde(with = "encoding_label")]
    pub content_encoding: Option<&'static Encoding>,
    pub content_length: u64,
    pub content_type: Option<String>,
    pub http_method: Option<String>,
    pub is_authenticated: bool,
    pub is_local: bool,
    pub is_secure_connection: bool,
    pub physical_application_path: Option<String>,
    pub physical_path: Option<String>,
    pub raw_url: Option<String>,
    pub request_type: Option<String>,
    pub total_bytes: u64,
    pub url: Option<Url>,
    pub url_referrer: Option<Url>,
    pub user_agent: Option<String>,
    pub user_host_address: Option<String>,
    pub user_host_name: Option<String>,
    pub cookies: Option<CookieCollection>,
    pub files: Option<FileCollection>,
    pub form: Option<NameValueCollection>,
    pub headers: Option<NameValueCollection>,
    pub params: Option<NameValueCollection>,
}

impl RequestInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the method; `request_type` follows it unless already set
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        let method = method.into();
        if self.request_type.is_none() {
            self.request_type = Some(method.clone());
        }
        self.http_method = Some(method);
        self
    }

    pub fn with_url(mut self, url: Url) -> Self {
        self.url = Some(url);
        self
    }

    pub fn with_accept_types<I, S>(mut self, accept_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.accept_types = accept_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_content_encoding(mut self, encoding: &'static Encoding) -> Self {
        self.content_encoding = Some(encoding);
        self
    }

    pub fn with_cookie(mut self, cookie: CookieEntry) -> Self {
        self.cookies.get_or_insert_with(CookieCollection::new).push(cookie);
        self
    }

    pub fn with_file(mut self, key: impl Into<String>, file: FileEntry) -> Self {
        self.files.get_or_insert_with(FileCollection::new).add(key, file);
        self
    }

    pub fn with_form_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.form
            .get_or_insert_with(NameValueCollection::new)
            .add(key, Some(value.into()));
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(NameValueCollection::new)
            .add(key, Some(value.into()));
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(NameValueCollection::new)
            .add(key, Some(value.into()));
        self
    }

    pub fn into_shared(self) -> Arc<dyn RequestSnapshot> {
        Arc::new(self)
    }
}

impl RequestSnapshot for RequestInfo {
    fn accept_types(&self) -> SnapshotResult<&[String]> {
        Ok(&self.accept_types)
    }

    fn anonymous_id(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.anonymous_id.as_deref())
    }

    fn application_path(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.application_path.as_deref())
    }

    fn content_encoding(&self) -> SnapshotResult<Option<&'static Encoding>> {
        Ok(self.content_encoding)
    }

    fn content_length(&self) -> SnapshotResult<u64> {
        Ok(self.content_length)
    }

    fn content_type(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.content_type.as_deref())
    }

    fn http_method(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.http_method.as_deref())
    }

    fn is_authenticated(&self) -> SnapshotResult<bool> {
        Ok(self.is_authenticated)
    }

    fn is_local(&self) -> SnapshotResult<bool> {
        Ok(self.is_local)
    }

    fn is_secure_connection(&self) -> SnapshotResult<bool> {
        Ok(self.is_secure_connection)
    }

    fn physical_application_path(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.physical_application_path.as_deref())
    }

    fn physical_path(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.physical_path.as_deref())
    }

    fn raw_url(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.raw_url.as_deref())
    }

    fn request_type(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.request_type.as_deref())
    }

    fn total_bytes(&self) -> SnapshotResult<u64> {
        Ok(self.total_bytes)
    }

    fn url(&self) -> SnapshotResult<Option<&Url>> {
        Ok(self.url.as_ref())
    }

    fn url_referrer(&self) -> SnapshotResult<Option<&Url>> {
        Ok(self.url_referrer.as_ref())
    }

    fn user_agent(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.user_agent.as_deref())
    }

    fn user_host_address(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.user_host_address.as_deref())
    }

    fn user_host_name(&self) -> SnapshotResult<Option<&str>> {
        Ok(self.user_host_name.as_deref())
    }

    fn cookies(&self) -> SnapshotResult<Option<&CookieCollection>> {
        Ok(self.cookies.as_ref())
    }

    fn files(&self) -> SnapshotResult<Option<&FileCollection>> {
        Ok(self.files.as_ref())
    }

    fn form(&self) -> SnapshotResult<Option<&NameValueCollection>> {
        Ok(self.form.as_ref())
    }

    fn headers(&self) -> SnapshotResult<Option<&NameValueCollection>> {
        Ok(self.headers.as_ref())
    }

    fn params(&self) -> SnapshotResult<Option<&NameValueCollection>> {
        Ok(self.params.as_ref())
    }
}

/// Plain-data context snapshot holding one request
#[derive(Clone)]
pub struct ContextInfo {
    request: Arc<dyn RequestSnapshot>,
}

impl ContextInfo {
    pub fn new(request: impl RequestSnapshot + 'static) -> Self {
        Self {
            request: Arc::new(request),
        }
    }

    pub fn from_shared(request: Arc<dyn RequestSnapshot>) -> Self {
        Self { request }
    }

    pub fn into_shared(self) -> Arc<dyn ContextSnapshot> {
        Arc::new(self)
    }
}

impl ContextSnapshot for ContextInfo {
    fn request(&self) -> SnapshotResult<Arc<dyn RequestSnapshot>> {
        Ok(Arc::clone(&self.request))
    }
}

impl std::fmt::Debug for ContextInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextInfo").finish_non_exhaustive()
    }
}

/// Serializes an encoding as its canonical name, accepts any WHATWG label
mod encoding_label {
    use encoding_rs::Encoding;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        encoding: &Option<&'static Encoding>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match encoding {
            Some(encoding) => serializer.serialize_some(encoding.name()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<&'static Encoding>, D::Error> {
        let label: Option<String> = Option::deserialize(deserializer)?;
        label
            .map(|label| {
                Encoding::for_label(label.as_bytes())
                    .ok_or_else(|| D::Error::custom(format!("unknown encoding label '{}'", label)))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builders_fill_collections() {
        let request = RequestInfo::new()
            .with_method("POST")
            .with_form_field("username", "john_smith")
            .with_header("Accept", "application/json")
            .with_param("page", "2")
            .with_cookie(CookieEntry::new("session", "abc"))
            .with_file("upload", FileEntry::new("a.txt", 3, "text/plain"));

        assert_eq!(request.http_method().unwrap(), Some("POST"));
        assert_eq!(request.request_type().unwrap(), Some("POST"));
        assert_eq!(request.form().unwrap().map(NameValueCollection::len), Some(1));
        assert_eq!(request.headers().unwrap().map(NameValueCollection::len), Some(1));
        assert_eq!(request.params().unwrap().map(NameValueCollection::len), Some(1));
        assert_eq!(request.cookies().unwrap().map(CookieCollection::len), Some(1));
        assert_eq!(request.files().unwrap().map(FileCollection::len), Some(1));
    }

    #[test]
    fn test_unset_collections_are_absent() {
        let request = RequestInfo::new();
        assert!(request.cookies().unwrap().is_none());
        assert!(request.form().unwrap().is_none());
        assert!(request.accept_types().unwrap().is_empty());
    }

    #[test]
    fn test_encoding_serializes_as_canonical_name() {
        let request = RequestInfo::new().with_content_encoding(encoding_rs::UTF_16LE);
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["content_encoding"], json!("UTF-16LE"));
    }

    #[test]
    fn test_deserialize_from_json() {
        let request: RequestInfo = serde_json::from_value(json!({
            "http_method": "GET",
            "content_encoding": "utf8",
            "url": "http://serilog.net/",
            "headers": [{ "key": "Accept", "value": "text/html" }]
        }))
        .unwrap();

        assert_eq!(request.http_method().unwrap(), Some("GET"));
        assert_eq!(request.content_encoding().unwrap(), Some(encoding_rs::UTF_8));
        assert_eq!(request.url().unwrap().map(Url::as_str), Some("http://serilog.net/"));
        assert_eq!(
            request.headers().unwrap().and_then(|h| h.get("accept")),
            Some(Some("text/html"))
        );
    }

    #[test]
    fn test_unknown_encoding_label_is_rejected() {
        let result: Result<RequestInfo, _> =
            serde_json::from_value(json!({ "content_encoding": "not-an-encoding" }));
        assert!(result.is_err());
    }

    #[test]
    fn test_context_exposes_request() {
        let context = ContextInfo::new(RequestInfo {
            total_bytes: 42,
            ..RequestInfo::default()
        });

        let request = context.request().unwrap();
        assert_eq!(request.total_bytes().unwrap(), 42);
    }
}
