//! Reactive form engine for the dynform system.
//!
//! A [`form::Form`] is built from a field catalog. Edits flow through it:
//! the edited field's declared condition and its registered listeners run
//! derived-value [`handlers`], whose writes land in the [`model::FormModel`]
//! and in the change log. Handler writes are tagged as derived and never
//! notify listeners, so one edit propagates exactly one step.

pub mod dispatch;
pub mod events;
pub mod form;
pub mod handlers;
pub mod model;

pub use form::{Form, FormError};
