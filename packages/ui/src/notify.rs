//! Single-slot transient notification.
//!
//! Only the latest message is ever visible. Each call bumps a generation
//! counter and schedules a hide tagged with that generation; a hide whose
//! generation is no longer current does nothing, so the latest message always
//! stays up for the full delay.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use crate::adapter::{Severity, UiAdapter};

pub struct Notifier<U> {
    ui: Rc<U>,
    generation: Rc<Cell<u64>>,
    dismiss_after: Duration,
}

impl<U: UiAdapter + 'static> Notifier<U> {
    pub fn new(ui: Rc<U>, dismiss_after: Duration) -> Self {
        Self {
            ui,
            generation: Rc::new(Cell::new(0)),
            dismiss_after,
        }
    }

    pub fn show(&self, text: &str, severity: Severity) {
        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        self.ui.show_notification(text, severity);

        let ui = Rc::clone(&self.ui);
        let current = Rc::clone(&self.generation);
        self.ui.schedule(
            self.dismiss_after,
            Box::new(move || {
                if current.get() == generation {
                    ui.hide_notification();
                }
            }),
        );
    }
}
