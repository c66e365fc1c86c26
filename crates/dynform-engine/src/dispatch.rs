//! Condition resolution and per-field listener registration.

use std::collections::HashMap;

use tracing::debug;

use dynform_core::descriptor::FieldDescriptor;

use crate::handlers::Handler;
use crate::model::{DURATION, END_DATE};

/// Resolve the handler declared by `descriptor.conditions.onChange`.
///
/// Returns `None` when the field declares no condition or names a handler
/// that does not exist; the latter is logged and otherwise ignored.
pub fn resolve_condition(descriptor: &FieldDescriptor) -> Option<Handler> {
    let name = descriptor.on_change()?;
    let handler = Handler::resolve(name);
    if handler.is_none() {
        debug!(field = %descriptor.name, handler = %name, "ignoring unknown condition handler");
    }
    handler
}

/// Handlers registered against field names, run when that field is edited.
#[derive(Debug, Clone, Default)]
pub struct Listeners {
    by_field: HashMap<String, Vec<Handler>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    /// The coupling every form carries: an `endDate` edit recomputes
    /// `duration`, a `duration` edit recomputes `endDate`.
    pub fn coupled_dates() -> Self {
        let mut listeners = Self::new();
        listeners.register(END_DATE, Handler::UpdateDuration);
        listeners.register(DURATION, Handler::UpdateEndDate);
        listeners
    }

    /// Run `handler` whenever `field` is edited. Registering the same pair
    /// twice has no effect.
    pub fn register(&mut self, field: &str, handler: Handler) {
        let handlers = self.by_field.entry(field.to_owned()).or_default();
        if !handlers.contains(&handler) {
            handlers.push(handler);
        }
    }

    /// Handlers for `field`, in registration order.
    pub fn for_field(&self, field: &str) -> &[Handler] {
        self.by_field.get(field).map(Vec::as_slice).unwrap_or(&[])
    }
}
