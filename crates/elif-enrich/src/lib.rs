//! # elif-enrich
//!
//! Request-context enrichment for structured log events. While a request is being served,
//! every log event gets the request's metadata attached as flat, queryable properties:
//! `Request.HttpMethod`, `Request.Cookies[session].Expires`, `Request.Headers[Host]` and so on.
//!
//! Host adapters expose the current request through [`RequestSnapshot`] and a provider;
//! enrichers merge with add-if-absent, so properties set by the caller always win.
//!
//! ```
//! use elif_enrich::{ContextInfo, ContextScope, EnricherChain, LogEvent, RequestEnricher, RequestInfo};
//! use tracing::Level;
//!
//! let chain = EnricherChain::new().with(RequestEnricher::default());
//! let context = ContextInfo::new(RequestInfo::new().with_method("GET")).into_shared();
//!
//! let event = ContextScope::run(context, || chain.enriched(LogEvent::new(Level::INFO, "hello")));
//! assert_eq!(event.property("Request.HttpMethod").and_then(|v| v.as_str()), Some("GET"));
//! ```

pub mod config;
pub mod converters;
pub mod diagnostics;
pub mod enrichers;
pub mod error;
pub mod events;
pub mod snapshot;
pub mod testing;

// Re-exports for easy access
pub use config::{EnricherConfig, FailurePolicy};
pub use diagnostics::{init_diagnostics, DiagnosticsConfig, SELF_LOG_TARGET};
pub use error::{EnrichError, EnrichResult, SnapshotError, SnapshotResult};
pub use events::{DefaultPropertyFactory, LogEvent, Property, PropertyFactory, PropertyValue, Scalar};

pub use converters::{
    property_name, CookieConverter, FileConverter, NameValueConverter, PropertyConverter,
};
pub use enrichers::{
    Enricher, EnricherChain, RequestEnricher, RequestField, TotalBytesEnricher, REQUEST_PREFIX,
    TOTAL_BYTES_PROPERTY,
};
pub use snapshot::{
    ContextInfo, ContextProvider, ContextScope, ContextScopeGuard, ContextSnapshot,
    CookieCollection, CookieEntry, FileCollection, FileEntry, NameValueCollection, RequestInfo,
    RequestProvider, RequestSnapshot, ScopedContextProvider,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
