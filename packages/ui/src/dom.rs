//! # DOM adapter (browser only)
//!
//! [`DomUi`] carries out coordinator effects on the static invoicing pages. It
//! never owns any markup beyond the notification slot; everything else is found
//! by class or attribute selector on every call, so pages opt in just by
//! tagging their elements.
//!
//! | Selector | Updated by |
//! |----------|-----------|
//! | `.auth-hidden`, `.auth-required` | `set_visible` (`display: block` / `none`) |
//! | `.user-name`, `.user-email` | `render_user` (text content) |
//! | `.user-avatar` | `render_user` (an `<img>` when there is a photo, else one initial) |
//! | `button[type="submit"]` | `set_submit_busy` / `restore_submit`, original label kept in `data-original-text` |
//! | `.auth-message` | `show_notification` / `hide_notification`, created at the top of `<body>` on first use |
//!
//! Missing elements are skipped silently.

use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlButtonElement, HtmlElement, Window};

use crate::adapter::{Severity, UiAdapter};
use crate::effects::{Avatar, ElementGroup, UserView};

const SUBMIT_BUTTONS: &str = r#"button[type="submit"]"#;
const MESSAGE_CLASS: &str = "auth-message";
const ORIGINAL_TEXT: &str = "originalText";
const AVATAR_STYLE: &str = "width: 100%; height: 100%; border-radius: 50%;";

/// UiAdapter over the live document.
#[derive(Clone, Debug)]
pub struct DomUi {
    window: Window,
    document: Document,
}

impl DomUi {
    /// Attach to the current window. `None` outside a browser page.
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    /// Location pathname of the current page.
    pub fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    /// Hostname of the current page.
    pub fn hostname(&self) -> String {
        self.window.location().hostname().unwrap_or_default()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    fn elements(&self, selector: &str) -> Vec<HtmlElement> {
        let Ok(list) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect()
    }

    fn submit_buttons(&self) -> Vec<HtmlButtonElement> {
        self.elements(SUBMIT_BUTTONS)
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlButtonElement>().ok())
            .collect()
    }

    fn set_display(el: &HtmlElement, visible: bool) {
        let value = if visible { "block" } else { "none" };
        let _ = el.style().set_property("display", value);
    }

    fn render_avatar(&self, el: &HtmlElement, avatar: &Avatar) {
        match avatar {
            Avatar::Image(url) => {
                el.set_text_content(None);
                let Ok(img) = self.document.create_element("img") else {
                    return;
                };
                let _ = img.set_attribute("src", url);
                let _ = img.set_attribute("alt", "User Avatar");
                let _ = img.set_attribute("style", AVATAR_STYLE);
                let _ = el.append_child(&img);
            }
            Avatar::Initial(initial) => el.set_text_content(Some(&initial.to_string())),
        }
    }

    fn message_slot(&self) -> Option<HtmlElement> {
        if let Some(existing) = self.elements(&format!(".{MESSAGE_CLASS}")).into_iter().next() {
            return Some(existing);
        }
        let body = self.document.body()?;
        let slot = self
            .document
            .create_element("div")
            .ok()?
            .dyn_into::<HtmlElement>()
            .ok()?;
        slot.set_class_name(MESSAGE_CLASS);
        let first = body.first_child();
        body.insert_before(&slot, first.as_ref()).ok()?;
        Some(slot)
    }
}

impl UiAdapter for DomUi {
    fn set_visible(&self, group: ElementGroup, visible: bool) {
        for el in self.elements(group.selector()) {
            Self::set_display(&el, visible);
        }
    }

    fn render_user(&self, view: &UserView) {
        for el in self.elements(".user-name") {
            el.set_text_content(Some(&view.name));
        }
        for el in self.elements(".user-email") {
            el.set_text_content(Some(&view.email));
        }
        if let Some(avatar) = &view.avatar {
            for el in self.elements(".user-avatar") {
                self.render_avatar(&el, avatar);
            }
        }
    }

    fn navigate(&self, url: &str) {
        tracing::debug!(url, "navigating");
        if self.window.location().set_href(url).is_err() {
            tracing::warn!(url, "navigation rejected");
        }
    }

    fn set_submit_busy(&self, label: &str) {
        for button in self.submit_buttons() {
            button.set_disabled(true);
            let dataset = button.dataset();
            if dataset.get(ORIGINAL_TEXT).is_none() {
                let original = button.text_content().unwrap_or_default();
                let _ = dataset.set(ORIGINAL_TEXT, &original);
            }
            button.set_text_content(Some(label));
        }
    }

    fn restore_submit(&self) {
        for button in self.submit_buttons() {
            button.set_disabled(false);
            let dataset = button.dataset();
            if let Some(original) = dataset.get(ORIGINAL_TEXT) {
                button.set_text_content(Some(&original));
                dataset.delete(ORIGINAL_TEXT);
            }
        }
    }

    fn show_notification(&self, text: &str, severity: Severity) {
        let Some(slot) = self.message_slot() else {
            tracing::warn!(text, "no document body for status message");
            return;
        };
        slot.set_text_content(Some(text));
        slot.set_class_name(&format!("{MESSAGE_CLASS} {}", severity.css_class()));
        Self::set_display(&slot, true);
    }

    fn hide_notification(&self) {
        for el in self.elements(&format!(".{MESSAGE_CLASS}")) {
            Self::set_display(&el, false);
        }
    }

    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        Timeout::new(millis, move || task()).forget();
    }
}
