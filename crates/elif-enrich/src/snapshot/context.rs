//! Read-only view of the ambient request context

use super::request::RequestSnapshot;
use crate::error::SnapshotResult;
use std::sync::Arc;

/// The context a request is served in. Only the nested request is exposed.
pub trait ContextSnapshot: Send + Sync {
    fn request(&self) -> SnapshotResult<Arc<dyn RequestSnapshot>>;
}
