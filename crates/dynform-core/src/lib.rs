//! Core types for the dynform system.
//!
//! A form is described by a catalog of [`descriptor::FieldDescriptor`]s, usually
//! loaded from a JSON document. This crate holds the descriptor model, the
//! scalar [`value::FieldValue`] type, calendar helpers, and catalog parsing and
//! validation. The reactive form itself lives in `dynform-engine`.

pub mod catalog;
pub mod dates;
pub mod descriptor;
pub mod enums;
pub mod validation;
pub mod value;
