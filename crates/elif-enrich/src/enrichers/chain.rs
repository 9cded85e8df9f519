//! Enricher chain for applying multiple enrichers to one event

use super::Enricher;
use crate::diagnostics::SELF_LOG_TARGET;
use crate::error::EnrichError;
use crate::events::{DefaultPropertyFactory, LogEvent, PropertyFactory};
use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Enrichers applied in registration order, sharing one property factory.
///
/// Failures never reach the caller as errors or panics. Each one is reported on the
/// self-diagnostic channel and returned from [`EnricherChain::enrich`], and the remaining
/// enrichers still run.
pub struct EnricherChain {
    enrichers: Vec<Box<dyn Enricher>>,
    factory: Arc<dyn PropertyFactory>,
}

impl EnricherChain {
    /// Create an empty chain using [`DefaultPropertyFactory`]
    pub fn new() -> Self {
        Self::with_factory(Arc::new(DefaultPropertyFactory))
    }

    pub fn with_factory(factory: Arc<dyn PropertyFactory>) -> Self {
        Self {
            enrichers: Vec::new(),
            factory,
        }
    }

    /// Add an enricher to the end of the chain
    pub fn with<E: Enricher + 'static>(mut self, enricher: E) -> Self {
        self.push(enricher);
        self
    }

    pub fn push<E: Enricher + 'static>(&mut self, enricher: E) {
        self.enrichers.push(Box::new(enricher));
    }

    pub fn len(&self) -> usize {
        self.enrichers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrichers.is_empty()
    }

    /// Enricher names, for debugging
    pub fn names(&self) -> Vec<&'static str> {
        self.enrichers.iter().map(|e| e.name()).collect()
    }

    /// Run every enricher against `event`, returning the failures that were reported
    pub fn enrich(&self, event: &mut LogEvent) -> Vec<EnrichError> {
        let factory = self.factory.as_ref();
        let mut failures = Vec::new();

        for enricher in &self.enrichers {
            let outcome = catch_unwind(AssertUnwindSafe(|| enricher.enrich(event, factory)));

            let error = match outcome {
                Ok(Ok(())) => continue,
                Ok(Err(error)) => error,
                Err(payload) => {
                    EnrichError::panicked(enricher.name(), panic_message(payload.as_ref()))
                }
            };

            tracing::warn!(
                target: SELF_LOG_TARGET,
                enricher = enricher.name(),
                error = %error,
                "Enricher failed; event emitted without its properties"
            );
            failures.push(error);
        }

        failures
    }

    /// Consume and return the enriched event
    pub fn enriched(&self, mut event: LogEvent) -> LogEvent {
        self.enrich(&mut event);
        event
    }
}

impl Default for EnricherChain {
    fn default() -> Self {
        Self::new()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "Unknown panic occurred".to_string()
    }
}
