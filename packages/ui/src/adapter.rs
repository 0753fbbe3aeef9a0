//! The seam between the coordinator and whatever renders the page.

use std::time::Duration;

use crate::effects::{ElementGroup, UserView};

/// Severity of a status message; doubles as its CSS class.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn css_class(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// Rendering and navigation operations the coordinator needs.
///
/// All methods are infallible from the coordinator's point of view; an adapter
/// that cannot find an element simply has nothing to update.
pub trait UiAdapter {
    /// Show or hide every element in `group`.
    fn set_visible(&self, group: ElementGroup, visible: bool);

    /// Update every name, email and avatar element.
    fn render_user(&self, view: &UserView);

    /// Leave the current page.
    fn navigate(&self, url: &str);

    /// Disable every submit button and replace its label with `label`,
    /// remembering the original label.
    fn set_submit_busy(&self, label: &str);

    /// Re-enable every submit button and restore its original label.
    fn restore_submit(&self);

    /// Put `text` into the notification slot, creating it on first use.
    fn show_notification(&self, text: &str, severity: Severity);

    fn hide_notification(&self);

    /// Run `task` once after `delay`.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>);
}
