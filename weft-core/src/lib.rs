//! Weft Core
//!
//! This crate provides the core runtime for the Weft reactive view-binding
//! framework. It implements:
//!
//! - Selector read-tracking for observable value sources
//! - Positional subscription reconciliation across renders
//! - Exactly-once subscription cleanup on unmount
//!
//! The observable store itself and the host framework's render scheduler are
//! deliberately out of scope: both are consumed through narrow interfaces so
//! that any store or UI shell can sit on either side of the binding.
//!
//! # Architecture
//!
//! The crate is organized around one module:
//!
//! - `observe`: the selector tracker and subscription reconciler, together
//!   with the source and subscription interfaces it consumes
//!
//! # Example
//!
//! ```rust,ignore
//! use weft_core::observe::{SelectorBinding, SelectorResult};
//!
//! // At mount: one binding per component, with a stable redraw callback.
//! let mut binding = SelectorBinding::new(|| request_redraw());
//!
//! // On every render: run the selector, get the values to draw.
//! let values = binding.render(|scope| {
//!     vec![
//!         SelectorResult::Source(settings.clone()),
//!         SelectorResult::Value(scope.read_field(&profile, "name")),
//!     ]
//! });
//!
//! // Changing `settings` or `profile.name` now fires the redraw callback.
//! // On unmount the binding releases both subscriptions.
//! drop(binding);
//! ```

pub mod observe;
