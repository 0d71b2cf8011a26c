//! One-shot cache of the json document backing a view.

use crate::error::Result;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Holds the outcome of the first fetch of a document.
///
/// The fetch runs at most once per cell. Concurrent first accesses block on
/// the cell's lock until the fetch completes and then share its outcome. A
/// failed fetch is kept as well, a new cell is needed to try again.
#[derive(Debug, Default)]
pub struct DocumentCell {
    state: Mutex<Option<Result<Arc<Value>>>>,
}

impl DocumentCell {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached outcome or populate it with `fetch`.
    ///
    /// # Errors
    /// Returns the error produced by the first `fetch`.
    pub fn get_or_fetch(&self, fetch: impl FnOnce() -> Result<Value>) -> Result<Arc<Value>> {
        let mut guard = self.state.lock();
        if let Some(outcome) = guard.as_ref() {
            tracing::debug!("Using cached document");
            return outcome.clone();
        }
        let outcome = fetch().map(Arc::new);
        *guard = Some(outcome.clone());
        outcome
    }
}

/// Value at the json `pointer`, if every step exists and is not null.
pub(crate) fn dig<'a>(document: &'a Value, pointer: &str) -> Option<&'a Value> {
    document.pointer(pointer).filter(|v| !v.is_null())
}

/// String at the json `pointer`, if present.
pub(crate) fn dig_str(document: &Value, pointer: &str) -> Option<String> {
    dig(document, pointer)
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
}
