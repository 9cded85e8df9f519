//! Single-property enricher for the request body size

use super::Enricher;
use crate::error::{EnrichError, EnrichResult};
use crate::events::{LogEvent, PropertyFactory};
use crate::snapshot::{ContextProvider, ScopedContextProvider};
use std::sync::Arc;

pub const TOTAL_BYTES_PROPERTY: &str = "TotalBytes";

/// Adds `TotalBytes` from the request nested in the current context.
///
/// A failed read is returned as [`EnrichError::Field`]; run it inside an
/// [`EnricherChain`](super::EnricherChain) to have the failure reported instead.
pub struct TotalBytesEnricher {
    provider: Arc<dyn ContextProvider>,
}

impl TotalBytesEnricher {
    pub fn new(provider: impl ContextProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    pub fn from_shared(provider: Arc<dyn ContextProvider>) -> Self {
        Self { provider }
    }
}

impl Default for TotalBytesEnricher {
    fn default() -> Self {
        Self::new(ScopedContextProvider::new())
    }
}

impl Enricher for TotalBytesEnricher {
    fn enrich(&self, event: &mut LogEvent, factory: &dyn PropertyFactory) -> EnrichResult<()> {
        let Some(context) = self.provider.current_context() else {
            return Ok(());
        };

        let total_bytes = context
            .request()
            .and_then(|request| request.total_bytes())
            .map_err(|e| EnrichError::field(TOTAL_BYTES_PROPERTY, e))?;

        event.add_property_if_absent(
            factory.create_property(TOTAL_BYTES_PROPERTY, total_bytes.into()),
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TotalBytesEnricher"
    }
}
