//! Source Interface
//!
//! The narrow interface through which the reconciler consumes an observable
//! store. The store itself lives outside this crate; anything that can hand
//! out values, accept scoped change subscriptions, and release them by id
//! can sit behind [`Source`].
//!
//! # Identity
//!
//! Sources are compared by identity, never by value. Each source mints a
//! process-unique [`SourceId`] at construction; two handles to the same
//! source report the same id, and the reconciler's positional diff treats
//! equal ids as "the same source".
//!
//! # Subscription Ownership
//!
//! [`Source::subscribe`] returns a plain [`SubscriptionId`]; ownership of
//! the registration lives in the [`Subscription`] guard, which pairs the id
//! with the source that issued it and unsubscribes exactly once, on drop.
//! Implementations must treat `unsubscribe` with an unknown id as a no-op.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Unique identifier for a source.
///
/// Generated from an atomic counter so identity comparison works across
/// threads without any shared registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceId(u64);

impl SourceId {
    /// Generate a new unique source ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SourceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Key naming a primitive sub-value within a source.
///
/// Cheap to clone; field keys are copied into every tracked entry and
/// subscription scope that references them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldKey(Arc<str>);

impl FieldKey {
    /// Create a field key from anything string-like.
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// The key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FieldKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for FieldKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Callback invoked when a subscribed value changes.
///
/// The reconciler hands every subscription it creates a clone of the same
/// `Arc`, so a component's change callback is one stable function for the
/// component's whole lifetime.
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// Identifier a source hands back for one change registration.
pub type SubscriptionId = u64;

/// What a subscription attaches to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionScope {
    /// The source as a whole: any change notifies.
    Whole,
    /// A single primitive field: only changes to that field notify.
    Field(FieldKey),
}

/// An observable value holder.
///
/// Implemented by the store layer, consumed by the reconciler. All methods
/// are callable through `Arc<dyn Source<V>>`.
pub trait Source<V>: Send + Sync {
    /// The source's identity.
    fn id(&self) -> SourceId;

    /// Read the source's current value.
    fn read(&self) -> V;

    /// Read the current value of one primitive field.
    fn read_field(&self, key: &FieldKey) -> V;

    /// Register a change callback for the given scope.
    ///
    /// Returns the id to pass back to [`Source::unsubscribe`].
    fn subscribe(&self, scope: SubscriptionScope, on_change: ChangeCallback) -> SubscriptionId;

    /// Remove a registration. Unknown ids must be ignored.
    fn unsubscribe(&self, subscription: SubscriptionId);
}

/// Ownership guard for one active change registration.
///
/// Created by the reconciler when a slot subscribes, held in that slot
/// until the entry changes or the binding is torn down. Dropping the guard
/// unsubscribes; because guards are moved and never cloned, each
/// registration is released at most once.
pub struct Subscription<V> {
    source: Arc<dyn Source<V>>,
    id: SubscriptionId,
}

impl<V> Subscription<V> {
    /// Wrap a registration the given source just issued.
    pub fn new(source: Arc<dyn Source<V>>, id: SubscriptionId) -> Self {
        Self { source, id }
    }

    /// Identity of the subscribed source.
    pub fn source_id(&self) -> SourceId {
        self.source.id()
    }

    /// The registration id issued by the source.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl<V> Drop for Subscription<V> {
    fn drop(&mut self) {
        self.source.unsubscribe(self.id);
    }
}

impl<V> fmt::Debug for Subscription<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("source", &self.source.id())
            .field("id", &self.id)
            .finish()
    }
}
