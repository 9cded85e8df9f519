//! # Request Enricher
//!
//! Flattens the active request into `Request.*` properties: one per scalar field, plus the
//! cookies, files, form, headers and params collections through their converters.

use super::Enricher;
use crate::config::{EnricherConfig, FailurePolicy};
use crate::converters::{CookieConverter, FileConverter, NameValueConverter, PropertyConverter};
use crate::diagnostics::SELF_LOG_TARGET;
use crate::error::{EnrichError, EnrichResult, SnapshotResult};
use crate::events::{LogEvent, PropertyFactory, PropertyValue};
use crate::snapshot::{
    NameValueCollection, RequestProvider, RequestSnapshot, ScopedContextProvider,
};
use encoding_rs::Encoding;
use std::sync::Arc;
use url::Url;

/// Namespace of every property this enricher emits
pub const REQUEST_PREFIX: &str = "Request";

pub const COOKIES_PREFIX: &str = "Request.Cookies";
pub const FILES_PREFIX: &str = "Request.Files";
pub const FORM_PREFIX: &str = "Request.Form";
pub const HEADERS_PREFIX: &str = "Request.Headers";
pub const PARAMS_PREFIX: &str = "Request.Params";

/// Name/value collections of a request
#[derive(Debug, Clone, Copy)]
enum NameValueRead {
    Form,
    Headers,
    Params,
}

impl NameValueRead {
    fn read(self, request: &dyn RequestSnapshot) -> SnapshotResult<Option<&NameValueCollection>> {
        match self {
            Self::Form => request.form(),
            Self::Headers => request.headers(),
            Self::Params => request.params(),
        }
    }
}

/// Scalar request fields, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestField {
    AcceptTypes,
    AnonymousId,
    ApplicationPath,
    ContentEncoding,
    ContentLength,
    ContentType,
    HttpMethod,
    IsAuthenticated,
    IsLocal,
    IsSecureConnection,
    PhysicalApplicationPath,
    PhysicalPath,
    RawUrl,
    RequestType,
    TotalBytes,
    Url,
    UrlReferrer,
    UserAgent,
    UserHostAddress,
    UserHostName,
}

impl RequestField {
    pub const ALL: [RequestField; 20] = [
        Self::AcceptTypes,
        Self::AnonymousId,
        Self::ApplicationPath,
        Self::ContentEncoding,
        Self::ContentLength,
        Self::ContentType,
        Self::HttpMethod,
        Self::IsAuthenticated,
        Self::IsLocal,
        Self::IsSecureConnection,
        Self::PhysicalApplicationPath,
        Self::PhysicalPath,
        Self::RawUrl,
        Self::RequestType,
        Self::TotalBytes,
        Self::Url,
        Self::UrlReferrer,
        Self::UserAgent,
        Self::UserHostAddress,
        Self::UserHostName,
    ];

    /// Field name as it appears in property names
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AcceptTypes => "AcceptTypes",
            Self::AnonymousId => "AnonymousID",
            Self::ApplicationPath => "ApplicationPath",
            Self::ContentEncoding => "ContentEncoding",
            Self::ContentLength => "ContentLength",
            Self::ContentType => "ContentType",
            Self::HttpMethod => "HttpMethod",
            Self::IsAuthenticated => "IsAuthenticated",
            Self::IsLocal => "IsLocal",
            Self::IsSecureConnection => "IsSecureConnection",
            Self::PhysicalApplicationPath => "PhysicalApplicationPath",
            Self::PhysicalPath => "PhysicalPath",
            Self::RawUrl => "RawUrl",
            Self::RequestType => "RequestType",
            Self::TotalBytes => "TotalBytes",
            Self::Url => "Url",
            Self::UrlReferrer => "UrlReferrer",
            Self::UserAgent => "UserAgent",
            Self::UserHostAddress => "UserHostAddress",
            Self::UserHostName => "UserHostName",
        }
    }

    /// `Request.<Field>`
    pub fn property_name(self) -> String {
        format!("{}.{}", REQUEST_PREFIX, self.as_str())
    }

    /// Read the field and coerce it to its property value
    pub fn read(self, request: &dyn RequestSnapshot) -> SnapshotResult<PropertyValue> {
        let value = match self {
            Self::AcceptTypes => {
                PropertyValue::sequence(request.accept_types()?.iter().map(String::as_str))
            }
            Self::AnonymousId => request.anonymous_id()?.into(),
            Self::ApplicationPath => request.application_path()?.into(),
            Self::ContentEncoding => request.content_encoding()?.map(Encoding::name).into(),
            Self::ContentLength => request.content_length()?.into(),
            Self::ContentType => request.content_type()?.into(),
            Self::HttpMethod => request.http_method()?.into(),
            Self::IsAuthenticated => request.is_authenticated()?.into(),
            Self::IsLocal => request.is_local()?.into(),
            Self::IsSecureConnection => request.is_secure_connection()?.into(),
            Self::PhysicalApplicationPath => request.physical_application_path()?.into(),
            Self::PhysicalPath => request.physical_path()?.into(),
            Self::RawUrl => request.raw_url()?.into(),
            Self::RequestType => request.request_type()?.into(),
            Self::TotalBytes => request.total_bytes()?.into(),
            Self::Url => url_value(request.url()?),
            Self::UrlReferrer => url_value(request.url_referrer()?),
            Self::UserAgent => request.user_agent()?.into(),
            Self::UserHostAddress => request.user_host_address()?.into(),
            Self::UserHostName => request.user_host_name()?.into(),
        };
        Ok(value)
    }
}

/// Unset URIs render as the empty string
fn url_value(url: Option<&Url>) -> PropertyValue {
    url.map(Url::as_str).unwrap_or_default().into()
}

/// Enriches events with the request returned by its provider
pub struct RequestEnricher {
    provider: Arc<dyn RequestProvider>,
    config: EnricherConfig,
}

impl RequestEnricher {
    pub fn new(provider: impl RequestProvider + 'static) -> Self {
        Self::with_config(provider, EnricherConfig::default())
    }

    pub fn with_config(provider: impl RequestProvider + 'static, config: EnricherConfig) -> Self {
        Self::from_shared(Arc::new(provider), config)
    }

    pub fn from_shared(provider: Arc<dyn RequestProvider>, config: EnricherConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &EnricherConfig {
        &self.config
    }

    /// An unreadable request is a failure under the policy, not an absent request
    fn current_request(&self) -> EnrichResult<Option<Arc<dyn RequestSnapshot>>> {
        match self.provider.try_current_request() {
            Ok(request) => Ok(request),
            Err(error) => {
                self.handle_failure(EnrichError::field(REQUEST_PREFIX, error))?;
                Ok(None)
            }
        }
    }

    /// Report or propagate a failed read, depending on the failure policy
    fn handle_failure(&self, error: EnrichError) -> EnrichResult<()> {
        match self.config.failure_policy {
            FailurePolicy::Abort => Err(error),
            FailurePolicy::Isolate => {
                tracing::warn!(
                    target: SELF_LOG_TARGET,
                    enricher = self.name(),
                    error = %error,
                    "Skipped request property"
                );
                Ok(())
            }
        }
    }

    fn merge_scalars(
        &self,
        event: &mut LogEvent,
        factory: &dyn PropertyFactory,
        request: &dyn RequestSnapshot,
    ) -> EnrichResult<()> {
        for field in RequestField::ALL {
            let name = field.property_name();
            match field.read(request) {
                Ok(value) => {
                    event.add_property_if_absent(factory.create_property(&name, value));
                }
                Err(error) => self.handle_failure(EnrichError::field(name, error))?,
            }
        }
        Ok(())
    }

    fn merge_collection<'a, V>(
        &self,
        event: &mut LogEvent,
        converter: &'a V,
        collection: SnapshotResult<Option<&'a V::Collection>>,
        entry_count: impl Fn(&V::Collection) -> usize,
    ) -> EnrichResult<()>
    where
        V: PropertyConverter,
    {
        let prefix = converter.prefix();
        let collection = match collection {
            Ok(collection) => collection,
            Err(error) => return self.handle_failure(EnrichError::collection(prefix, error)),
        };

        let mut limit = usize::MAX;
        if let (Some(max), Some(collection)) = (self.config.max_collection_entries, collection) {
            let entries = entry_count(collection);
            if entries > max {
                tracing::warn!(
                    target: SELF_LOG_TARGET,
                    enricher = self.name(),
                    collection = prefix,
                    entries,
                    max,
                    "Truncated request collection"
                );
                limit = max.saturating_mul(V::PROPERTIES_PER_ENTRY);
            }
        }

        for property in converter.convert(collection).take(limit) {
            event.add_property_if_absent(property);
        }
        Ok(())
    }
}

impl Default for RequestEnricher {
    /// Reads the request of the innermost [`ContextScope`](crate::snapshot::ContextScope)
    fn default() -> Self {
        Self::new(ScopedContextProvider::new())
    }
}

impl Enricher for RequestEnricher {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn PropertyFactory) -> EnrichResult<()> {
        let Some(request) = self.current_request()? else {
            return Ok(());
        };
        let request = request.as_ref();

        self.merge_scalars(event, factory, request)?;

        let config = &self.config;

        if config.include_cookies {
            let converter = CookieConverter::new(factory, COOKIES_PREFIX);
            self.merge_collection(event, &converter, request.cookies(), |c| c.len())?;
        }

        if config.include_files {
            let converter = FileConverter::new(factory, FILES_PREFIX);
            self.merge_collection(event, &converter, request.files(), |c| c.len())?;
        }

        for (enabled, prefix, read) in [
            (config.include_form, FORM_PREFIX, NameValueRead::Form),
            (config.include_headers, HEADERS_PREFIX, NameValueRead::Headers),
            (config.include_params, PARAMS_PREFIX, NameValueRead::Params),
        ] {
            if enabled {
                let converter = NameValueConverter::new(factory, prefix);
                self.merge_collection(event, &converter, read.read(request), |c| c.len())?;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "RequestEnricher"
    }
}
