//! Access to the currently active request or context
//!
//! Providers are injected into enrichers at construction. Returning `None` is the normal
//! answer when no request is being served (startup, background jobs) and is not an error.

use super::context::ContextSnapshot;
use super::request::RequestSnapshot;
use crate::error::SnapshotResult;
use std::sync::Arc;

/// Supplies the request active on the calling thread, if any
pub trait RequestProvider: Send + Sync {
    fn current_request(&self) -> Option<Arc<dyn RequestSnapshot>>;

    /// Like [`current_request`](Self::current_request), but reports a request that exists and
    /// cannot be read instead of treating it as absent
    fn try_current_request(&self) -> SnapshotResult<Option<Arc<dyn RequestSnapshot>>> {
        Ok(self.current_request())
    }
}

/// Supplies the context active on the calling thread, if any
pub trait ContextProvider: Send + Sync {
    fn current_context(&self) -> Option<Arc<dyn ContextSnapshot>>;
}

impl<F> RequestProvider for F
where
    F: Fn() -> Option<Arc<dyn RequestSnapshot>> + Send + Sync,
{
    fn current_request(&self) -> Option<Arc<dyn RequestSnapshot>> {
        self()
    }
}

impl<F> ContextProvider for F
where
    F: Fn() -> Option<Arc<dyn ContextSnapshot>> + Send + Sync,
{
    fn current_context(&self) -> Option<Arc<dyn ContextSnapshot>> {
        self()
    }
}
