//! Read-only view of the active request

use super::collections::{CookieCollection, FileCollection, NameValueCollection};
use crate::error::SnapshotResult;
use encoding_rs::Encoding;
use url::Url;

/// Point-in-time view of the request being served.
///
/// Adapters implement this over their host's request type. Every accessor is fallible so a
/// host whose request object can fail mid-read (disposed streams, lazily parsed forms) can
/// report it; the enricher decides whether a failure skips one property or the whole pass.
/// Absent optional data is `Ok(None)`, never an error.
pub trait RequestSnapshot: Send + Sync {
    /// Accepted MIME types in the order the client sent them
    fn accept_types(&self) -> SnapshotResult<&[String]>;

    fn anonymous_id(&self) -> SnapshotResult<Option<&str>>;

    fn application_path(&self) -> SnapshotResult<Option<&str>>;

    fn content_encoding(&self) -> SnapshotResult<Option<&'static Encoding>>;

    fn content_length(&self) -> SnapshotResult<u64>;

    fn content_type(&self) -> SnapshotResult<Option<&str>>;

    fn http_method(&self) -> SnapshotResult<Option<&str>>;

    fn is_authenticated(&self) -> SnapshotResult<bool>;

    fn is_local(&self) -> SnapshotResult<bool>;

    fn is_secure_connection(&self) -> SnapshotResult<bool>;

    fn physical_application_path(&self) -> SnapshotResult<Option<&str>>;

    fn physical_path(&self) -> SnapshotResult<Option<&str>>;

    fn raw_url(&self) -> SnapshotResult<Option<&str>>;

    fn request_type(&self) -> SnapshotResult<Option<&str>>;

    /// Total size of the request body in bytes
    fn total_bytes(&self) -> SnapshotResult<u64>;

    fn url(&self) -> SnapshotResult<Option<&Url>>;

    fn url_referrer(&self) -> SnapshotResult<Option<&Url>>;

    fn user_agent(&self) -> SnapshotResult<Option<&str>>;

    fn user_host_address(&self) -> SnapshotResult<Option<&str>>;

    fn user_host_name(&self) -> SnapshotResult<Option<&str>>;

    fn cookies(&self) -> SnapshotResult<Option<&CookieCollection>>;

    fn files(&self) -> SnapshotResult<Option<&FileCollection>>;

    fn form(&self) -> SnapshotResult<Option<&NameValueCollection>>;

    fn headers(&self) -> SnapshotResult<Option<&NameValueCollection>>;

    /// Query string, form, cookie and server variables merged, as the host exposes them
    fn params(&self) -> SnapshotResult<Option<&NameValueCollection>>;
}
