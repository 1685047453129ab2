//! Authentication-rejection hook
//!
//! Any request anywhere in the application may come back with a 401. The
//! client reports each of them to one registered callback instead of leaving
//! the check to every caller.

use reqwest::Method;
use std::sync::{Arc, PoisonError, RwLock};

/// The request whose response was an authentication rejection
#[derive(Clone, PartialEq, Eq)]
pub struct RejectedRequest {
    pub method: Method,
    pub path: String,
    /// Bearer credential the request was sent with
    pub credential: Option<Arc<String>>,
}

impl std::fmt::Debug for RejectedRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RejectedRequest")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("credential", &self.credential.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Callback invoked on authentication rejection
pub type RejectionCallback = Arc<dyn Fn(&RejectedRequest) + Send + Sync>;

/// Single-slot registry for the rejection callback
#[derive(Default)]
pub struct RejectionHook {
    callback: RwLock<Option<RejectionCallback>>,
}

impl RejectionHook {
    /// Install the callback, replacing any previous one
    pub fn set(&self, callback: RejectionCallback) {
        *self
            .callback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    pub fn clear(&self) {
        *self
            .callback
            .write()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_set(&self) -> bool {
        self.callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Invoke the callback, if any. Returns whether one was installed.
    pub fn trigger(&self, rejected: &RejectedRequest) -> bool {
        // Released before the call so the callback may re-install itself
        let callback = self
            .callback
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        match callback {
            Some(callback) => {
                callback(rejected);
                true
            }
            None => false,
        }
    }
}
