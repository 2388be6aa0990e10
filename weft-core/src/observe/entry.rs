//! Tracked Entries
//!
//! The selector returns an ordered list of [`SelectorResult`] values;
//! reconciliation stores an ordered list of [`TrackedEntry`] values. The
//! two differ in exactly one place: a bare `Value` in the selector output
//! is a placeholder that [`resolve`] rewrites into the field reference
//! captured for it during tracking, or into a literal when no captured
//! read remains.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use super::source::{FieldKey, Source, SourceId};
use super::tracking::FieldRead;

/// Inline capacity for per-binding entry and slot lists. Selectors rarely
/// track more values than this.
pub(crate) const INLINE_ENTRIES: usize = 4;

pub(crate) type Entries<V> = SmallVec<[TrackedEntry<V>; INLINE_ENTRIES]>;

/// One positional result from a selector.
pub enum SelectorResult<V> {
    /// Track the source as a whole.
    Source(Arc<dyn Source<V>>),
    /// A bare primitive: a placeholder for a field read recorded through
    /// the tracking scope, or a plain literal.
    Value(V),
    /// An empty slot; renders as `None` and produces no subscription.
    Empty,
}

impl<V> fmt::Debug for SelectorResult<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorResult::Source(source) => {
                f.debug_tuple("Source").field(&source.id()).finish()
            }
            SelectorResult::Value(_) => f.write_str("Value"),
            SelectorResult::Empty => f.write_str("Empty"),
        }
    }
}

/// One positional slot of reconciliation state.
pub enum TrackedEntry<V> {
    /// A whole-source dependency.
    Source(Arc<dyn Source<V>>),
    /// A field reference: a primitive sub-value subscribed to through its
    /// owning source, scoped to the field key.
    Field(Arc<dyn Source<V>>, FieldKey),
    /// A literal value; carried through to extraction, never subscribed.
    Literal(V),
    /// An empty slot.
    Empty,
}

impl<V> TrackedEntry<V> {
    /// The subscription target this entry names, if any.
    pub(crate) fn target(&self) -> Option<(SourceId, Option<&FieldKey>)> {
        match self {
            TrackedEntry::Source(source) => Some((source.id(), None)),
            TrackedEntry::Field(source, key) => Some((source.id(), Some(key))),
            TrackedEntry::Literal(_) | TrackedEntry::Empty => None,
        }
    }

    /// Whether `self` and `other` name the same subscription target.
    ///
    /// Two entries without a target (literals, empties) compare equal
    /// here: neither holds a subscription, so the slot needs no work.
    pub(crate) fn same_target(&self, other: &TrackedEntry<V>) -> bool {
        self.target() == other.target()
    }
}

impl<V> fmt::Debug for TrackedEntry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackedEntry::Source(source) => f.debug_tuple("Source").field(&source.id()).finish(),
            TrackedEntry::Field(source, key) => f
                .debug_tuple("Field")
                .field(&source.id())
                .field(key)
                .finish(),
            TrackedEntry::Literal(_) => f.write_str("Literal"),
            TrackedEntry::Empty => f.write_str("Empty"),
        }
    }
}

/// Resolve raw selector results against the reads captured while the
/// selector ran.
///
/// The n-th `Value` entry is replaced by the n-th captured field read. A
/// `Value` entry with no remaining captured read is a plain literal.
/// Surplus captured reads are ignored.
pub(crate) fn resolve<V>(raw: Vec<SelectorResult<V>>, reads: Vec<FieldRead<V>>) -> Entries<V> {
    let mut reads = reads.into_iter();
    raw.into_iter()
        .map(|result| match result {
            SelectorResult::Source(source) => TrackedEntry::Source(source),
            SelectorResult::Value(value) => match reads.next() {
                Some(read) => TrackedEntry::Field(read.source, read.key),
                None => TrackedEntry::Literal(value),
            },
            SelectorResult::Empty => TrackedEntry::Empty,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::source::{ChangeCallback, SubscriptionId, SubscriptionScope};
    use crate::observe::tracking::TrackingScope;

    struct Plain {
        id: SourceId,
    }

    impl Plain {
        fn new() -> Arc<dyn Source<i64>> {
            Arc::new(Self { id: SourceId::new() })
        }
    }

    impl Source<i64> for Plain {
        fn id(&self) -> SourceId {
            self.id
        }

        fn read(&self) -> i64 {
            0
        }

        fn read_field(&self, _key: &FieldKey) -> i64 {
            0
        }

        fn subscribe(&self, _scope: SubscriptionScope, _on_change: ChangeCallback) -> SubscriptionId {
            0
        }

        fn unsubscribe(&self, _subscription: SubscriptionId) {}
    }

    fn field_read(source: &Arc<dyn Source<i64>>, key: &str) -> FieldRead<i64> {
        let mut scope = TrackingScope::new();
        scope.read_field(source, key);
        scope.finish().remove(0)
    }

    #[test]
    fn values_resolve_to_captured_reads_in_order() {
        let a = Plain::new();
        let b = Plain::new();
        let reads = vec![field_read(&a, "x"), field_read(&b, "y")];
        let raw = vec![
            SelectorResult::Value(1),
            SelectorResult::Source(a.clone()),
            SelectorResult::Value(2),
        ];

        let entries = resolve(raw, reads);

        match &entries[0] {
            TrackedEntry::Field(source, key) => {
                assert_eq!(source.id(), a.id());
                assert_eq!(key.as_str(), "x");
            }
            other => panic!("expected field entry, got {other:?}"),
        }
        match &entries[1] {
            TrackedEntry::Source(source) => assert_eq!(source.id(), a.id()),
            other => panic!("expected source entry, got {other:?}"),
        }
        match &entries[2] {
            TrackedEntry::Field(source, key) => {
                assert_eq!(source.id(), b.id());
                assert_eq!(key.as_str(), "y");
            }
            other => panic!("expected field entry, got {other:?}"),
        }
    }

    #[test]
    fn unmatched_value_becomes_literal() {
        let entries = resolve::<i64>(vec![SelectorResult::Value(42)], Vec::new());
        match &entries[0] {
            TrackedEntry::Literal(value) => assert_eq!(*value, 42),
            other => panic!("expected literal entry, got {other:?}"),
        }
    }

    #[test]
    fn surplus_reads_are_ignored() {
        let a = Plain::new();
        let reads = vec![field_read(&a, "x"), field_read(&a, "y")];
        let entries = resolve(vec![SelectorResult::Value(0)], reads);

        assert_eq!(entries.len(), 1);
        match &entries[0] {
            TrackedEntry::Field(_, key) => assert_eq!(key.as_str(), "x"),
            other => panic!("expected field entry, got {other:?}"),
        }
    }

    #[test]
    fn empty_passes_through() {
        let entries = resolve::<i64>(vec![SelectorResult::Empty], Vec::new());
        assert!(matches!(entries[0], TrackedEntry::Empty));
    }

    #[test]
    fn same_target_matrix() {
        let a = Plain::new();
        let b = Plain::new();
        let key = FieldKey::from("k");

        let source_a = TrackedEntry::Source(a.clone());
        let source_b = TrackedEntry::Source(b.clone());
        let field_a = TrackedEntry::Field(a.clone(), key.clone());
        let field_a2 = TrackedEntry::Field(a.clone(), FieldKey::from("other"));
        let field_b = TrackedEntry::Field(b.clone(), key.clone());
        let literal = TrackedEntry::Literal(9);
        let empty = TrackedEntry::Empty;

        // Same source, same kind.
        assert!(source_a.same_target(&TrackedEntry::Source(a.clone())));
        assert!(field_a.same_target(&TrackedEntry::Field(a.clone(), key.clone())));

        // Different source or key.
        assert!(!source_a.same_target(&source_b));
        assert!(!field_a.same_target(&field_b));
        assert!(!field_a.same_target(&field_a2));

        // Kind changes always differ.
        assert!(!source_a.same_target(&field_a));
        assert!(!field_a.same_target(&source_a));
        assert!(!source_a.same_target(&empty));
        assert!(!field_a.same_target(&literal));

        // No-target entries need no slot work among themselves.
        assert!(literal.same_target(&empty));
        assert!(empty.same_target(&TrackedEntry::Literal(1)));
    }
}
