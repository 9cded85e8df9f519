//! Test fixtures and utilities
//!
//! Fixed providers, a request whose accessors can be made to fail, and a fully populated
//! sample request. Used by this crate's tests and by host adapters testing their own wiring.

use crate::error::{SnapshotError, SnapshotResult};
use crate::snapshot::{
    ContextInfo, ContextProvider, ContextSnapshot, CookieCollection, CookieEntry, FileCollection,
    FileEntry, NameValueCollection, RequestInfo, RequestProvider, RequestSnapshot,
};
use chrono::{TimeZone, Utc};
use encoding_rs::Encoding;
use std::collections::HashSet;
use std::sync::Arc;
use url::Url;

/// Provider that always returns the same request
pub fn provider_for(request: impl RequestSnapshot + 'static) -> impl RequestProvider {
    let request: Arc<dyn RequestSnapshot> = Arc::new(request);
    move || Some(Arc::clone(&request))
}

/// Provider that always returns the same context
pub fn context_provider_for(context: impl ContextSnapshot + 'static) -> impl ContextProvider {
    let context: Arc<dyn ContextSnapshot> = Arc::new(context);
    move || Some(Arc::clone(&context))
}

/// Provider with no active request or context
pub fn absent_provider() -> AbsentProvider {
    AbsentProvider
}

/// Answers `None` as both a request and a context provider
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsentProvider;

impl RequestProvider for AbsentProvider {
    fn current_request(&self) -> Option<Arc<dyn RequestSnapshot>> {
        None
    }
}

impl ContextProvider for AbsentProvider {
    fn current_context(&self) -> Option<Arc<dyn ContextSnapshot>> {
        None
    }
}

/// Context whose nested request cannot be read
#[derive(Debug, Clone)]
pub struct FailingContext {
    message: String,
}

impl FailingContext {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for FailingContext {
    fn default() -> Self {
        Self::new("request has been disposed")
    }
}

impl ContextSnapshot for FailingContext {
    fn request(&self) -> SnapshotResult<Arc<dyn RequestSnapshot>> {
        Err(SnapshotError::new("Request", self.message.as_str()))
    }
}

/// Request whose chosen accessors fail.
///
/// Fields are named as in property names (`"HttpMethod"`, `"AnonymousID"`) and collections by
/// their prefix segment (`"Cookies"`, `"Form"`).
#[derive(Debug, Clone)]
pub struct FailingRequest {
    inner: RequestInfo,
    failing: HashSet<String>,
}

impl FailingRequest {
    pub fn new(inner: RequestInfo) -> Self {
        Self {
            inner,
            failing: HashSet::new(),
        }
    }

    pub fn failing(mut self, field: impl Into<String>) -> Self {
        self.failing.insert(field.into());
        self
    }

    fn read<'a, T>(
        &'a self,
        field: &str,
        value: impl FnOnce(&'a RequestInfo) -> T,
    ) -> SnapshotResult<T> {
        if self.failing.contains(field) {
            return Err(SnapshotError::new(field, "request object is no longer available"));
        }
        Ok(value(&self.inner))
    }
}

impl RequestSnapshot for FailingRequest {
    fn accept_types(&self) -> SnapshotResult<&[String]> {
        self.read("AcceptTypes", |r| r.accept_types.as_slice())
    }

    fn anonymous_id(&self) -> SnapshotResult<Option<&str>> {
        self.read("AnonymousID", |r| r.anonymous_id.as_deref())
    }

    fn application_path(&self) -> SnapshotResult<Option<&str>> {
        self.read("ApplicationPath", |r| r.application_path.as_deref())
    }

    fn content_encoding(&self) -> SnapshotResult<Option<&'static Encoding>> {
        self.read("ContentEncoding", |r| r.content_encoding)
    }

    fn content_length(&self) -> SnapshotResult<u64> {
        self.read("ContentLength", |r| r.content_length)
    }

    fn content_type(&self) -> SnapshotResult<Option<&str>> {
        self.read("ContentType", |r| r.content_type.as_deref())
    }

    fn http_method(&self) -> SnapshotResult<Option<&str>> {
        self.read("HttpMethod", |r| r.http_method.as_deref())
    }

    fn is_authenticated(&self) -> SnapshotResult<bool> {
        self.read("IsAuthenticated", |r| r.is_authenticated)
    }

    fn is_local(&self) -> SnapshotResult<bool> {
        self.read("IsLocal", |r| r.is_local)
    }

    fn is_secure_connection(&self) -> SnapshotResult<bool> {
        self.read("IsSecureConnection", |r| r.is_secure_connection)
    }

    fn physical_application_path(&self) -> SnapshotResult<Option<&str>> {
        self.read("PhysicalApplicationPath", |r| r.physical_application_path.as_deref())
    }

    fn physical_path(&self) -> SnapshotResult<Option<&str>> {
        self.read("PhysicalPath", |r| r.physical_path.as_deref())
    }

    fn raw_url(&self) -> SnapshotResult<Option<&str>> {
        self.read("RawUrl", |r| r.raw_url.as_deref())
    }

    fn request_type(&self) -> SnapshotResult<Option<&str>> {
        self.read("RequestType", |r| r.request_type.as_deref())
    }

    fn total_bytes(&self) -> SnapshotResult<u64> {
        self.read("TotalBytes", |r| r.total_bytes)
    }

    fn url(&self) -> SnapshotResult<Option<&Url>> {
        self.read("Url", |r| r.url.as_ref())
    }

    fn url_referrer(&self) -> SnapshotResult<Option<&Url>> {
        self.read("UrlReferrer", |r| r.url_referrer.as_ref())
    }

    fn user_agent(&self) -> SnapshotResult<Option<&str>> {
        self.read("UserAgent", |r| r.user_agent.as_deref())
    }

    fn user_host_address(&self) -> SnapshotResult<Option<&str>> {
        self.read("UserHostAddress", |r| r.user_host_address.as_deref())
    }

    fn user_host_name(&self) -> SnapshotResult<Option<&str>> {
        self.read("UserHostName", |r| r.user_host_name.as_deref())
    }

    fn cookies(&self) -> SnapshotResult<Option<&CookieCollection>> {
        self.read("Cookies", |r| r.cookies.as_ref())
    }

    fn files(&self) -> SnapshotResult<Option<&FileCollection>> {
        self.read("Files", |r| r.files.as_ref())
    }

    fn form(&self) -> SnapshotResult<Option<&NameValueCollection>> {
        self.read("Form", |r| r.form.as_ref())
    }

    fn headers(&self) -> SnapshotResult<Option<&NameValueCollection>> {
        self.read("Headers", |r| r.headers.as_ref())
    }

    fn params(&self) -> SnapshotResult<Option<&NameValueCollection>> {
        self.read("Params", |r| r.params.as_ref())
    }
}

/// A POST to `https://example.com/orders?page=2` with every field populated
pub fn sample_request() -> RequestInfo {
    let url = Url::parse("https://example.com/orders?page=2").ok();
    let referrer = Url::parse("https://example.com/").ok();
    let expires = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).single();

    let request = RequestInfo {
        anonymous_id: Some("anon-42".to_string()),
        application_path: Some("/".to_string()),
        content_length: 23,
        content_type: Some("application/x-www-form-urlencoded".to_string()),
        is_authenticated: true,
        is_local: false,
        is_secure_connection: true,
        physical_application_path: Some("/srv/app/".to_string()),
        physical_path: Some("/srv/app/orders".to_string()),
        raw_url: Some("/orders?page=2".to_string()),
        total_bytes: 23,
        url,
        url_referrer: referrer,
        user_agent: Some("Mozilla/5.0".to_string()),
        user_host_address: Some("127.0.0.1".to_string()),
        user_host_name: Some("localhost".to_string()),
        ..RequestInfo::new()
    }
    .with_method("POST")
    .with_accept_types(["text/html", "application/json"])
    .with_content_encoding(encoding_rs::UTF_8)
    .with_form_field("username", "john_smith")
    .with_header("Host", "example.com")
    .with_param("page", "2")
    .with_file("avatar", FileEntry::new("me.png", 512, "image/png"));

    let mut session = CookieEntry::new("session", "abc123").with_domain("example.com");
    if let Some(expires) = expires {
        session = session.with_expires(expires);
    }
    request.with_cookie(session)
}

/// Sample request wrapped in a context
pub fn sample_context() -> ContextInfo {
    ContextInfo::new(sample_request())
}
