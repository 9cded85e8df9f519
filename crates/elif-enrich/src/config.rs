//! Enricher configuration

use serde::{Deserialize, Serialize};

/// What to do when reading a snapshot field fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Skip the failing property or collection, report it, keep enriching
    #[default]
    Isolate,
    /// Stop the pass at the first failure and return the error
    Abort,
}

/// Configuration for [`RequestEnricher`](crate::enrichers::RequestEnricher)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnricherConfig {
    /// Failure handling for snapshot reads
    pub failure_policy: FailurePolicy,
    /// Emit `Request.Cookies[...]` properties
    pub include_cookies: bool,
    /// Emit `Request.Files[...]` properties
    pub include_files: bool,
    /// Emit `Request.Form[...]` properties
    pub include_form: bool,
    /// Emit `Request.Headers[...]` properties
    pub include_headers: bool,
    /// Emit `Request.Params[...]` properties
    pub include_params: bool,
    /// Upper bound on entries flattened per collection (unbounded when `None`)
    pub max_collection_entries: Option<usize>,
}

impl Default for EnricherConfig {
    fn default() -> Self {
        Self {
            failure_policy: FailurePolicy::Isolate,
            include_cookies: true,
            include_files: true,
            include_form: true,
            include_headers: true,
            include_params: true,
            max_collection_entries: None,
        }
    }
}

impl EnricherConfig {
    /// Abort the pass on the first failing read
    pub fn strict() -> Self {
        Self {
            failure_policy: FailurePolicy::Abort,
            ..Self::default()
        }
    }

    /// Scalar fields only, no collections
    pub fn minimal() -> Self {
        Self {
            include_cookies: false,
            include_files: false,
            include_form: false,
            include_headers: false,
            include_params: false,
            ..Self::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    pub fn with_cookies(mut self, enabled: bool) -> Self {
        self.include_cookies = enabled;
        self
    }

    pub fn with_files(mut self, enabled: bool) -> Self {
        self.include_files = enabled;
        self
    }

    pub fn with_form(mut self, enabled: bool) -> Self {
        self.include_form = enabled;
        self
    }

    pub fn with_headers(mut self, enabled: bool) -> Self {
        self.include_headers = enabled;
        self
    }

    pub fn with_params(mut self, enabled: bool) -> Self {
        self.include_params = enabled;
        self
    }

    pub fn with_max_collection_entries(mut self, max: usize) -> Self {
        self.max_collection_entries = Some(max);
        self
    }

    pub fn unbounded_collections(mut self) -> Self {
        self.max_collection_entries = None;
        self
    }
}
