//! Selector Binding
//!
//! [`SelectorBinding`] is the per-mount reconciliation state: the entries
//! returned by the last completed render and, positionally aligned with
//! them, the subscription each entry holds. One binding is created when a
//! component mounts, borrowed mutably by every render, and destroyed on
//! unmount.
//!
//! # How a Render Works
//!
//! 1. Run the selector under a fresh [`TrackingScope`].
//!
//! 2. Resolve the returned list: bare values become the field references
//!    captured for them, in order.
//!
//! 3. Diff the resolved entries positionally against the previous render.
//!    Unchanged slots keep their subscription untouched; changed slots
//!    release the old subscription first, then subscribe to the new
//!    entry's source with the binding's change callback.
//!
//! 4. Extract the value for each entry, reading sources after the
//!    subscriptions are in place.
//!
//! The change callback is cloned from the same `Arc` for every
//! subscription, so from the sources' point of view the component has one
//! stable callback for its whole lifetime. The callback requests a
//! re-render from the host; any batching is the host's concern.
//!
//! # Teardown
//!
//! [`SelectorBinding::release`] drops every live subscription and leaves
//! the binding inert; it is idempotent, and `Drop` calls it, so unmount
//! cleanup happens exactly once whether the host releases explicitly or
//! just drops the binding.

use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{debug, trace};

use super::entry::{resolve, Entries, SelectorResult, TrackedEntry, INLINE_ENTRIES};
use super::source::{ChangeCallback, Subscription, SubscriptionScope};
use super::tracking::TrackingScope;

type Slots<V> = SmallVec<[Option<Subscription<V>>; INLINE_ENTRIES]>;

/// Per-mount selector reconciliation state.
///
/// # Type Parameters
///
/// - `V`: the value type sources hold. Must be Clone + Send + Sync.
pub struct SelectorBinding<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Entries from the last completed render.
    previous: Entries<V>,

    /// Subscription slots, positionally aligned with `previous`. An entry
    /// with a subscription target holds `Some`; literal and empty entries
    /// hold `None`.
    slots: Slots<V>,

    /// The component's change callback. Every subscription created over
    /// the binding's lifetime clones this same `Arc`.
    on_change: ChangeCallback,

    /// Set by `release`; a released binding renders nothing and
    /// subscribes to nothing.
    released: bool,
}

impl<V> SelectorBinding<V>
where
    V: Clone + Send + Sync + 'static,
{
    /// Create a binding for a freshly mounted component.
    ///
    /// `on_change` is invoked by subscribed sources whenever a tracked
    /// value changes; it should request a re-render from the host
    /// framework.
    pub fn new<F>(on_change: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            previous: SmallVec::new(),
            slots: SmallVec::new(),
            on_change: Arc::new(on_change),
            released: false,
        }
    }

    /// Run one render: track, resolve, reconcile, extract.
    ///
    /// Returns the current value for each entry the selector produced:
    /// `None` for empty slots, the literal itself for literals, and the
    /// source's (or field's) current value for tracked entries, read
    /// after reconciliation.
    ///
    /// Selectors must read primitive fields through the scope in the same
    /// order the resulting values appear in the returned list; see
    /// [`TrackingScope`].
    pub fn render<F>(&mut self, selector: F) -> Vec<Option<V>>
    where
        F: FnOnce(&mut TrackingScope<V>) -> Vec<SelectorResult<V>>,
    {
        if self.released {
            trace!("render on released binding ignored");
            return Vec::new();
        }

        let mut scope = TrackingScope::new();
        let raw = selector(&mut scope);
        let entries = resolve(raw, scope.finish());

        self.reconcile(entries);

        self.previous
            .iter()
            .map(|entry| match entry {
                TrackedEntry::Empty => None,
                TrackedEntry::Literal(value) => Some(value.clone()),
                TrackedEntry::Field(source, key) => Some(source.read_field(key)),
                TrackedEntry::Source(source) => Some(source.read()),
            })
            .collect()
    }

    /// Diff `entries` against the previous render and apply the
    /// subscription deltas slot by slot.
    fn reconcile(&mut self, entries: Entries<V>) {
        let n = entries.len().max(self.previous.len());
        while self.slots.len() < n {
            self.slots.push(None);
        }

        for i in 0..n {
            let unchanged = match (entries.get(i), self.previous.get(i)) {
                (Some(new), Some(prev)) => new.same_target(prev),
                _ => false,
            };
            if unchanged {
                continue;
            }

            // Release before the slot is reassigned.
            if let Some(old) = self.slots[i].take() {
                trace!(
                    slot = i,
                    source = old.source_id().raw(),
                    "released subscription"
                );
                drop(old);
            }

            self.slots[i] = match entries.get(i) {
                Some(TrackedEntry::Source(source)) => {
                    let id =
                        source.subscribe(SubscriptionScope::Whole, Arc::clone(&self.on_change));
                    trace!(slot = i, source = source.id().raw(), "subscribed to source");
                    Some(Subscription::new(Arc::clone(source), id))
                }
                Some(TrackedEntry::Field(source, key)) => {
                    let id = source.subscribe(
                        SubscriptionScope::Field(key.clone()),
                        Arc::clone(&self.on_change),
                    );
                    trace!(
                        slot = i,
                        source = source.id().raw(),
                        key = %key,
                        "subscribed to field"
                    );
                    Some(Subscription::new(Arc::clone(source), id))
                }
                Some(TrackedEntry::Literal(_)) | Some(TrackedEntry::Empty) | None => None,
            };
        }

        // Slots stay positionally aligned with the entries just stored;
        // truncation drops whatever the shrunk tail still held.
        self.slots.truncate(entries.len());
        self.previous = entries;
        debug_assert_eq!(self.slots.len(), self.previous.len());
    }

    /// Release every active subscription and leave the binding inert.
    ///
    /// Idempotent: the second and later calls release nothing. `Drop`
    /// calls this, so an explicit release followed by the binding going
    /// out of scope does not double-release.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        let live = self.slots.iter().filter(|slot| slot.is_some()).count();
        debug!(slots = self.slots.len(), live, "binding released");

        self.slots.clear();
        self.previous.clear();
    }

    /// Number of entries tracked by the last render.
    pub fn slot_count(&self) -> usize {
        self.previous.len()
    }

    /// Number of slots currently holding a live subscription.
    pub fn active_subscriptions(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Whether the binding has been torn down.
    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<V> Drop for SelectorBinding<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn drop(&mut self) {
        self.release();
    }
}

impl<V> fmt::Debug for SelectorBinding<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectorBinding")
            .field("slots", &self.slot_count())
            .field("active", &self.active_subscriptions())
            .field("released", &self.released)
            .finish()
    }
}
