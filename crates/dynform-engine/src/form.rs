//! The reactive form: model, rules and change propagation.
//!
//! Edits arrive through [`Form::set_value`], [`Form::set_raw`] or
//! [`Form::patch`]. After the edited values land, every handler attached to
//! an edited field runs once: first the field's declared condition, then its
//! registered listeners. Handler writes carry [`ChangeSource::Derived`] and
//! do not propagate further, which keeps the `duration` <-> `endDate`
//! coupling to a single step.

use tracing::{debug, warn};

use dynform_core::catalog::Catalog;
use dynform_core::descriptor::FieldDescriptor;
use dynform_core::validation::{validate_catalog, ValidationError};
use dynform_core::value::FieldValue;

use crate::dispatch::{resolve_condition, Listeners};
use crate::events::{ChangeEvent, ChangeSource};
use crate::handlers::Handler;
use crate::model::{Control, FormModel, DERIVED_ONLY, HANDLER_FIELDS};

/// Errors returned by form operations.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("unknown field: {0}")]
    UnknownField(String),

    #[error("field {0} is derived and cannot be edited directly")]
    DerivedField(String),

    #[error("invalid catalog: {0}")]
    Invalid(#[from] ValidationError),
}

/// A form instance built from a catalog.
#[derive(Debug, Clone)]
pub struct Form {
    descriptors: Vec<FieldDescriptor>,
    model: FormModel,
    listeners: Listeners,
    changes: Vec<ChangeEvent>,
}

impl Form {
    /// Build a form from a loaded catalog.
    pub fn build(catalog: &Catalog) -> Result<Self, FormError> {
        Self::from_descriptors(catalog.fields.clone())
    }

    /// Build a form from descriptors: one required control per descriptor,
    /// plus optional controls for any handler field the catalog leaves out.
    pub fn from_descriptors(descriptors: Vec<FieldDescriptor>) -> Result<Self, FormError> {
        validate_catalog(&descriptors)?;

        let mut model = FormModel::new();
        for descriptor in &descriptors {
            model.add_field(descriptor);
        }
        for (name, field_type) in HANDLER_FIELDS {
            model.add_control(
                name,
                Control {
                    value: FieldValue::Empty,
                    field_type,
                    required: false,
                },
            );
        }
        debug!(
            declared = descriptors.len(),
            controls = model.len(),
            "form built"
        );

        let mut form = Self {
            descriptors,
            model,
            listeners: Listeners::coupled_dates(),
            changes: Vec::new(),
        };
        form.derive_from_defaults()?;
        Ok(form)
    }

    pub fn descriptors(&self) -> &[FieldDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: &str) -> Option<&FieldDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    pub fn model(&self) -> &FormModel {
        &self.model
    }

    pub fn value(&self, name: &str) -> Option<&FieldValue> {
        self.model.get(name)
    }

    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// Listener registry, for attaching extra field -> handler rules.
    pub fn listeners_mut(&mut self) -> &mut Listeners {
        &mut self.listeners
    }

    /// Every change applied so far, oldest first.
    pub fn changes(&self) -> &[ChangeEvent] {
        &self.changes
    }

    /// Drain the change log.
    pub fn take_changes(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.changes)
    }

    /// Apply a single user edit and propagate it. A handler that would write
    /// back into the edited field is skipped, so the edit is never lost.
    pub fn set_value(&mut self, name: &str, value: impl Into<FieldValue>) -> Result<(), FormError> {
        self.check_editable(name)?;
        self.write(name, value.into(), ChangeSource::User)?;
        self.propagate(&[name.to_owned()])
    }

    /// Apply a user edit given as text, coerced to the field's type.
    pub fn set_raw(&mut self, name: &str, raw: &str) -> Result<(), FormError> {
        let value = self.coerce(name, raw)?;
        self.set_value(name, value)
    }

    /// Coerce text to the type of the control `name`.
    pub fn coerce(&self, name: &str, raw: &str) -> Result<FieldValue, FormError> {
        self.model
            .control(name)
            .map(|c| FieldValue::coerce(raw, &c.field_type))
            .ok_or_else(|| FormError::UnknownField(name.to_owned()))
    }

    /// Apply several values as one programmatic patch.
    ///
    /// All values land before any handler runs. A handler whose target field
    /// is itself part of the patch is skipped: the patch states that value
    /// explicitly. In particular, patching `duration` and `endDate` together
    /// keeps both as given and recomputes neither. Nothing is written if any
    /// name is unknown or derived.
    pub fn patch<I, K, V>(&mut self, values: I) -> Result<(), FormError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<FieldValue>,
    {
        let values: Vec<(String, FieldValue)> = values
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_owned(), v.into()))
            .collect();
        for (name, _) in &values {
            self.check_editable(name)?;
        }

        for (name, value) in &values {
            self.write(name, value.clone(), ChangeSource::Patch)?;
        }

        let names: Vec<String> = values.into_iter().map(|(n, _)| n).collect();
        self.propagate(&names)
    }

    /// Run the declared condition of the catalog field `name`, if it has one.
    /// Returns whether a handler wrote a value.
    pub fn dispatch(&mut self, name: &str) -> Result<bool, FormError> {
        match self.descriptor(name) {
            Some(descriptor) => {
                let handler = resolve_condition(descriptor);
                self.run_opt(handler)
            }
            None if self.model.contains(name) => Ok(false),
            None => Err(FormError::UnknownField(name.to_owned())),
        }
    }

    /// Run the condition declared by `descriptor` against this form.
    /// Unknown handler names are a no-op.
    pub fn handle_condition(&mut self, descriptor: &FieldDescriptor) -> Result<bool, FormError> {
        let handler = resolve_condition(descriptor);
        self.run_opt(handler)
    }

    // -----------------------------------------------------------------------
    // Internal helpers
    // -----------------------------------------------------------------------

    fn check_editable(&self, name: &str) -> Result<(), FormError> {
        if !self.model.contains(name) {
            return Err(FormError::UnknownField(name.to_owned()));
        }
        if DERIVED_ONLY.contains(&name) {
            return Err(FormError::DerivedField(name.to_owned()));
        }
        Ok(())
    }

    /// Declared condition first, then listeners, without repeats.
    fn handlers_for(&self, name: &str) -> Vec<Handler> {
        let mut handlers: Vec<Handler> = self
            .descriptor(name)
            .and_then(resolve_condition)
            .into_iter()
            .collect();
        for handler in self.listeners.for_field(name) {
            if !handlers.contains(handler) {
                handlers.push(*handler);
            }
        }
        handlers
    }

    /// Run the handlers of every catalog field seeded with a default, as if
    /// the defaults had been patched in. Writes are derived.
    fn derive_from_defaults(&mut self) -> Result<(), FormError> {
        let seeded: Vec<String> = self
            .descriptors
            .iter()
            .filter(|d| self.model.get(&d.name).is_some_and(|v| !v.is_empty()))
            .map(|d| d.name.clone())
            .collect();
        self.propagate(&seeded)
    }

    /// Run the handlers of each `edited` field once, in order. A handler
    /// whose target is itself one of `edited` is skipped: that value was
    /// given explicitly.
    fn propagate(&mut self, edited: &[String]) -> Result<(), FormError> {
        let mut ran: Vec<Handler> = Vec::new();
        for name in edited {
            for handler in self.handlers_for(name) {
                if ran.contains(&handler) {
                    continue;
                }
                if edited.iter().any(|n| n == handler.target()) {
                    warn!(
                        field = %name,
                        %handler,
                        target = handler.target(),
                        "handler target was set explicitly; keeping the given value"
                    );
                    continue;
                }
                ran.push(handler);
                self.run(handler)?;
            }
        }
        Ok(())
    }

    fn run_opt(&mut self, handler: Option<Handler>) -> Result<bool, FormError> {
        match handler {
            Some(h) => self.run(h),
            None => Ok(false),
        }
    }

    fn run(&mut self, handler: Handler) -> Result<bool, FormError> {
        match handler.compute(&self.model) {
            Some(write) => {
                self.write(write.field, write.value, ChangeSource::Derived(handler))?;
                Ok(true)
            }
            None => {
                debug!(%handler, "inputs missing, no write");
                Ok(false)
            }
        }
    }

    fn write(&mut self, name: &str, value: FieldValue, source: ChangeSource) -> Result<(), FormError> {
        let previous = self.model.set(name, value.clone())?;
        debug!(field = name, %value, ?source, "value changed");
        self.changes.push(ChangeEvent {
            field: name.to_owned(),
            previous,
            value,
            source,
        });
        Ok(())
    }
}
