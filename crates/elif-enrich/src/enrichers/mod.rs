//! Log event enrichers

pub mod chain;
pub mod request;
pub mod total_bytes;

pub use chain::EnricherChain;
pub use request::{
    RequestEnricher, RequestField, COOKIES_PREFIX, FILES_PREFIX, FORM_PREFIX, HEADERS_PREFIX,
    PARAMS_PREFIX, REQUEST_PREFIX,
};
pub use total_bytes::{TotalBytesEnricher, TOTAL_BYTES_PROPERTY};

use crate::error::EnrichResult;
use crate::events::{LogEvent, PropertyFactory};

/// Attaches computed properties to a log event.
///
/// Called once per event, synchronously, on the thread that logs. Implementations merge with
/// [`LogEvent::add_property_if_absent`] so caller-set properties and earlier enrichers win.
pub trait Enricher: Send + Sync {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn PropertyFactory) -> EnrichResult<()>;

    /// Name used in failure reports
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}
