//! Handler resolution with an explicit, per-process registry.
//!
//! The registry owns its cache. Create one at startup, pass it by reference
//! to whatever serves requests, and drop or [`clear`](HandlerRegistry::clear)
//! it to reset. There is no global state.

#![allow(clippy::result_large_err)]

use ontolock_core::definition::{ApiDefinition, HandlerRef};
use ontolock_core::errors::{ExError, ExErrorKind};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Executable handler code behind a [`HandlerRef`]
pub trait Handler: Send + Sync {
    /// Run the handler on already-validated input.
    ///
    /// # Errors
    ///
    /// Whatever the handler reports.
    fn call(&self, input: &Value) -> Result<Value, ExError>;
}

/// Turns a reference into a handler (file import, symbol lookup, ...)
pub trait HandlerLoader: Send + Sync {
    /// Load the handler named by `reference`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if nothing answers to the reference.
    fn load(&self, reference: &HandlerRef) -> Result<Arc<dyn Handler>, ExError>;
}

/// Caches loaded handlers by reference
pub struct HandlerRegistry {
    loader: Box<dyn HandlerLoader>,
    cache: Mutex<HashMap<HandlerRef, Arc<dyn Handler>>>,
}

impl HandlerRegistry {
    pub fn new(loader: Box<dyn HandlerLoader>) -> Self {
        Self {
            loader,
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn cache(&self) -> Result<MutexGuard<'_, HashMap<HandlerRef, Arc<dyn Handler>>>, ExError> {
        self.cache.lock().map_err(|_| {
            ExError::new(ExErrorKind::Internal)
                .with_op("resolve_handler")
                .with_message("handler cache lock poisoned")
        })
    }

    /// Resolve a handler, loading it on first use.
    ///
    /// # Errors
    ///
    /// Whatever the loader returns on a cache miss.
    pub fn resolve(&self, reference: &HandlerRef) -> Result<Arc<dyn Handler>, ExError> {
        if let Some(handler) = self.cache()?.get(reference) {
            return Ok(Arc::clone(handler));
        }

        // Load outside the lock; a concurrent miss may load twice, first insert wins.
        tracing::debug!(op = "resolve_handler", handler = reference.as_str(), "loading handler");
        let loaded = self.loader.load(reference)?;
        let mut cache = self.cache()?;
        let handler = cache.entry(reference.clone()).or_insert(loaded);
        Ok(Arc::clone(handler))
    }

    /// Resolve the handler of one function of `definition`.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no such function, or the function declares no handler
    /// - whatever the loader returns
    pub fn resolve_function(
        &self,
        definition: &ApiDefinition,
        function: &str,
    ) -> Result<Arc<dyn Handler>, ExError> {
        let reference = definition
            .functions
            .get(function)
            .and_then(|f| f.handler.as_ref())
            .ok_or_else(|| {
                ExError::new(ExErrorKind::NotFound)
                    .with_op("resolve_handler")
                    .with_function(function)
                    .with_message("function has no handler")
            })?;
        self.resolve(reference).map_err(|e| e.with_function(function))
    }

    /// Resolve every handler the definition declares, failing on the first error
    ///
    /// # Errors
    ///
    /// The first loader error, tagged with its function name.
    pub fn preload(&self, definition: &ApiDefinition) -> Result<usize, ExError> {
        for (name, function) in &definition.functions {
            if let Some(reference) = &function.handler {
                self.resolve(reference).map_err(|e| e.with_function(name.as_str()))?;
            }
        }
        Ok(self.len())
    }

    /// Number of cached handlers
    pub fn len(&self) -> usize {
        self.cache().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every cached handler
    pub fn clear(&self) {
        if let Ok(mut cache) = self.cache() {
            cache.clear();
        }
    }
}
