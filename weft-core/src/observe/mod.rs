//! Selector Tracking & Subscription Reconciliation
//!
//! This module binds a rendering component's data requirements to a set of
//! observable value sources. It keeps exactly one active subscription per
//! currently-referenced source and requests a re-render whenever any
//! subscribed value changes.
//!
//! # Concepts
//!
//! ## Sources
//!
//! A [`Source`] is an opaque observable value holder, identified by a
//! process-unique [`SourceId`]. Sources expose whole-value and per-field
//! reads, and accept change subscriptions scoped either to the whole source
//! or to a single field. The store behind the trait is not implemented here.
//!
//! ## Selectors
//!
//! A selector is a component-supplied computation that reads zero or more
//! sources and returns an ordered list of [`SelectorResult`] entries, one
//! per value the component wants to render. Primitive fields are read
//! through a [`TrackingScope`], which records each read so the bare value in
//! the returned list can be resolved back to its owning (source, field)
//! pair.
//!
//! ## Reconciliation
//!
//! A [`SelectorBinding`] holds the entries and subscriptions from the last
//! completed render. Each render diffs the new entry list positionally
//! against the previous one: unchanged slots keep their subscription,
//! changed slots release the old subscription before creating the new one,
//! and slots that disappeared are released. Tearing the binding down
//! releases everything exactly once.
//!
//! # Implementation Notes
//!
//! Read tracking is an explicit value passed into the selector rather than
//! a process-wide flag flipped around the call. There is no ambient state
//! to reset, and a panicking selector cannot leave tracking stuck enabled
//! for whichever component renders next.

mod binding;
mod entry;
mod source;
mod tracking;

pub use binding::SelectorBinding;
pub use entry::{SelectorResult, TrackedEntry};
pub use source::{
    ChangeCallback, FieldKey, Source, SourceId, Subscription, SubscriptionId, SubscriptionScope,
};
pub use tracking::{FieldRead, TrackingScope};
