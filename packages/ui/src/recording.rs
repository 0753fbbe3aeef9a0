//! UiAdapter that records what it was asked to do. Timers are queued and only
//! run when a test fires them.

use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

use crate::adapter::{Severity, UiAdapter};
use crate::effects::{ElementGroup, UserView};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Button {
    pub label: String,
    pub disabled: bool,
    original_label: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RecordedState {
    pub visibility: HashMap<ElementGroup, bool>,
    pub user_view: Option<UserView>,
    pub navigations: Vec<String>,
    pub buttons: Vec<Button>,
    pub busy_calls: usize,
    pub notification: Option<(String, Severity)>,
    pub notification_visible: bool,
    pub notifications_created: usize,
}

pub type Timer = (Duration, Box<dyn FnOnce()>);

#[derive(Default)]
pub struct RecordingUi {
    state: RefCell<RecordedState>,
    timers: RefCell<Vec<Timer>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_submit_buttons(labels: &[&str]) -> Self {
        let ui = Self::new();
        ui.state.borrow_mut().buttons = labels
            .iter()
            .map(|label| Button {
                label: label.to_string(),
                disabled: false,
                original_label: None,
            })
            .collect();
        ui
    }

    pub fn state(&self) -> RecordedState {
        self.state.borrow().clone()
    }

    pub fn button_labels(&self) -> Vec<String> {
        self.state.borrow().buttons.iter().map(|b| b.label.clone()).collect()
    }

    pub fn any_button_disabled(&self) -> bool {
        self.state.borrow().buttons.iter().any(|b| b.disabled)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.borrow().len()
    }

    pub fn take_next_timer(&self) -> Option<Timer> {
        let mut timers = self.timers.borrow_mut();
        if timers.is_empty() {
            None
        } else {
            Some(timers.remove(0))
        }
    }

    /// Run every queued timer in scheduling order.
    pub fn fire_timers(&self) {
        let timers: Vec<Timer> = self.timers.borrow_mut().drain(..).collect();
        for (_, task) in timers {
            task();
        }
    }
}

impl UiAdapter for RecordingUi {
    fn set_visible(&self, group: ElementGroup, visible: bool) {
        self.state.borrow_mut().visibility.insert(group, visible);
    }

    fn render_user(&self, view: &UserView) {
        self.state.borrow_mut().user_view = Some(view.clone());
    }

    fn navigate(&self, url: &str) {
        self.state.borrow_mut().navigations.push(url.to_string());
    }

    fn set_submit_busy(&self, label: &str) {
        let mut state = self.state.borrow_mut();
        state.busy_calls += 1;
        for button in &mut state.buttons {
            if button.original_label.is_none() {
                button.original_label = Some(button.label.clone());
            }
            button.disabled = true;
            button.label = label.to_string();
        }
    }

    fn restore_submit(&self) {
        for button in &mut self.state.borrow_mut().buttons {
            button.disabled = false;
            if let Some(original) = button.original_label.take() {
                button.label = original;
            }
        }
    }

    fn show_notification(&self, text: &str, severity: Severity) {
        let mut state = self.state.borrow_mut();
        if state.notification.is_none() {
            state.notifications_created += 1;
        }
        state.notification = Some((text.to_string(), severity));
        state.notification_visible = true;
    }

    fn hide_notification(&self) {
        self.state.borrow_mut().notification_visible = false;
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        self.timers.borrow_mut().push((delay, task));
    }
}
