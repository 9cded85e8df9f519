//! Thread-scoped ambient context
//!
//! A host enters a [`ContextScope`] for the duration of a request on the thread that serves
//! it; [`ScopedContextProvider`] hands the innermost entered context to enrichers. Scopes nest
//! and are removed when their guard drops. Async hosts that move requests between threads
//! should implement [`ContextProvider`] over their own task-local storage instead.

use super::context::ContextSnapshot;
use super::provider::{ContextProvider, RequestProvider};
use super::request::RequestSnapshot;
use crate::diagnostics::SELF_LOG_TARGET;
use crate::error::SnapshotResult;
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;
use std::sync::Arc;

struct ScopeEntry {
    id: u64,
    context: Arc<dyn ContextSnapshot>,
}

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ScopeEntry>> = const { RefCell::new(Vec::new()) };
    static NEXT_SCOPE_ID: Cell<u64> = const { Cell::new(0) };
}

/// Entry point for making a context ambient on the current thread
pub struct ContextScope;

impl ContextScope {
    /// Make `context` the current context until the returned guard drops
    pub fn enter(context: Arc<dyn ContextSnapshot>) -> ContextScopeGuard {
        let id = NEXT_SCOPE_ID.with(|next| {
            let id = next.get();
            next.set(id.wrapping_add(1));
            id
        });
        CONTEXT_STACK.with(|stack| stack.borrow_mut().push(ScopeEntry { id, context }));
        ContextScopeGuard {
            id,
            _not_send: PhantomData,
        }
    }

    /// Run `f` with `context` as the current context
    pub fn run<R>(context: Arc<dyn ContextSnapshot>, f: impl FnOnce() -> R) -> R {
        let _guard = Self::enter(context);
        f()
    }

    /// Number of contexts entered on this thread
    pub fn depth() -> usize {
        CONTEXT_STACK.with(|stack| stack.borrow().len())
    }

    fn current() -> Option<Arc<dyn ContextSnapshot>> {
        CONTEXT_STACK.with(|stack| stack.borrow().last().map(|entry| Arc::clone(&entry.context)))
    }
}

/// Removes the context it entered when dropped. Bound to the thread that created it.
///
/// Guards may be dropped in any order; each one removes only its own entry, so the innermost
/// context still alive stays current.
#[must_use = "the context is removed as soon as the guard is dropped"]
pub struct ContextScopeGuard {
    id: u64,
    _not_send: PhantomData<*const ()>,
}

impl Drop for ContextScopeGuard {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(position) = stack.iter().rposition(|entry| entry.id == self.id) {
                stack.remove(position);
            }
        });
    }
}

/// Provider reading the innermost [`ContextScope`] of the calling thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopedContextProvider;

impl ScopedContextProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ContextProvider for ScopedContextProvider {
    fn current_context(&self) -> Option<Arc<dyn ContextSnapshot>> {
        ContextScope::current()
    }
}

impl RequestProvider for ScopedContextProvider {
    fn current_request(&self) -> Option<Arc<dyn RequestSnapshot>> {
        match self.try_current_request() {
            Ok(request) => request,
            Err(error) => {
                tracing::warn!(
                    target: SELF_LOG_TARGET,
                    error = %error,
                    "Scoped context has no readable request"
                );
                None
            }
        }
    }

    fn try_current_request(&self) -> SnapshotResult<Option<Arc<dyn RequestSnapshot>>> {
        ContextScope::current()
            .map(|context| context.request())
            .transpose()
    }
}
