//! Read Tracking
//!
//! A primitive field value cannot be subscribed to directly; the
//! subscription has to attach to the owning source, scoped to the field
//! key. When a selector reads such a field it gets back a bare value, and
//! the reconciler needs to know which (source, key) pair produced it.
//!
//! [`TrackingScope`] closes that gap. The binding creates one scope per
//! selector call; the selector reads primitive fields through
//! [`TrackingScope::read_field`], which returns the current value and
//! appends the (source, key) pair to an ordered capture buffer. After the
//! call the binding consumes the scope and matches captured reads to the
//! bare values in the returned list, position by position.
//!
//! # Implementation Notes
//!
//! The scope is a plain value owned by the render call, not ambient state.
//! It is dropped on every exit path, including a panicking selector, so
//! there is no tracking flag that can leak between components.

use std::fmt;
use std::sync::Arc;

use super::source::{FieldKey, Source};

/// One primitive field read recorded during a selector call.
pub struct FieldRead<V> {
    pub(crate) source: Arc<dyn Source<V>>,
    pub(crate) key: FieldKey,
}

impl<V> FieldRead<V> {
    /// The source the field was read from.
    pub fn source(&self) -> &Arc<dyn Source<V>> {
        &self.source
    }

    /// The field key that was read.
    pub fn key(&self) -> &FieldKey {
        &self.key
    }
}

impl<V> fmt::Debug for FieldRead<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRead")
            .field("source", &self.source.id())
            .field("key", &self.key)
            .finish()
    }
}

/// Read-tracking context for a single selector call.
///
/// # Read Order
///
/// Captured reads are matched to the selector's returned list by position:
/// the n-th bare value in the list is assumed to be the n-th field read
/// through this scope. Reading fields in a different order than they
/// appear in the returned list silently produces wrong subscription
/// targets. This is a precondition on the selector, not a checked error.
pub struct TrackingScope<V> {
    reads: Vec<FieldRead<V>>,
}

impl<V> TrackingScope<V> {
    /// Create an empty scope.
    pub fn new() -> Self {
        Self { reads: Vec::new() }
    }

    /// Read a primitive field from `source`, recording the read.
    ///
    /// Returns the field's current value; the (source, key) pair is
    /// appended to the capture buffer in read order.
    pub fn read_field(&mut self, source: &Arc<dyn Source<V>>, key: impl Into<FieldKey>) -> V {
        let key = key.into();
        let value = source.read_field(&key);
        self.reads.push(FieldRead {
            source: Arc::clone(source),
            key,
        });
        value
    }

    /// Number of reads recorded so far.
    pub fn recorded(&self) -> usize {
        self.reads.len()
    }

    /// Consume the scope, yielding the ordered capture buffer.
    pub(crate) fn finish(self) -> Vec<FieldRead<V>> {
        self.reads
    }
}

impl<V> Default for TrackingScope<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for TrackingScope<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingScope")
            .field("recorded", &self.reads.len())
            .finish()
    }
}
