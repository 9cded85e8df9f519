pub mod collections;
pub mod context;
pub mod info;
pub mod provider;
pub mod request;
pub mod scoped;

pub use collections::{
    CookieCollection, CookieEntry, FileCollection, FileEntry, KeyedFile, NameValueCollection,
    NameValueEntry,
};
pub use context::ContextSnapshot;
pub use info::{ContextInfo, RequestInfo};
pub use provider::{ContextProvider, RequestProvider};
pub use request::RequestSnapshot;
pub use scoped::{ContextScope, ContextScopeGuard, ScopedContextProvider};
