//! Wires the page's forms and buttons to the coordinator.
//!
//! Every handler is optional: a page binds whatever it carries and ignores
//! the rest. Failures are already shown to the user by the coordinator, so
//! handlers only log them.

use std::rc::Rc;

use api::FirebaseProvider;
use store::LocalStore;
use ui::{AuthCoordinator, DomUi};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, Event, HtmlInputElement};

pub type Coordinator = AuthCoordinator<FirebaseProvider, LocalStore, DomUi>;

pub fn bind_page(document: &Document, coordinator: &Rc<Coordinator>) {
    if let Some(form) = document.get_element_by_id("loginForm") {
        let fields = form.clone();
        listen(&form, "submit", coordinator, move |coordinator, event| {
            event.prevent_default();
            let email = input_value(&fields, "#loginEmail");
            let password = input_value(&fields, "#loginPassword");
            spawn_local(async move {
                if let Err(e) = coordinator.handle_login(&email, &password).await {
                    tracing::debug!(error = %e, "login form");
                }
            });
        });
    }

    if let Some(form) = document.get_element_by_id("registerForm") {
        let fields = form.clone();
        listen(&form, "submit", coordinator, move |coordinator, event| {
            event.prevent_default();
            let name = input_value(&fields, "#registerName");
            let email = input_value(&fields, "#registerEmail");
            let password = input_value(&fields, "#registerPassword");
            spawn_local(async move {
                if let Err(e) = coordinator.handle_register(&name, &email, &password).await {
                    tracing::debug!(error = %e, "register form");
                }
            });
        });
    }

    for button in elements(document, ".google-signin") {
        listen(&button, "click", coordinator, |coordinator, event| {
            event.prevent_default();
            spawn_local(async move {
                if let Err(e) = coordinator.sign_in_with_popup().await {
                    tracing::debug!(error = %e, "google sign-in");
                }
            });
        });
    }

    for button in elements(document, ".logout-btn") {
        listen(&button, "click", coordinator, |coordinator, event| {
            event.prevent_default();
            spawn_local(async move {
                if let Err(e) = coordinator.sign_out().await {
                    tracing::debug!(error = %e, "sign-out");
                }
            });
        });
    }
}

fn listen<F>(target: &Element, event: &str, coordinator: &Rc<Coordinator>, handler: F)
where
    F: Fn(Rc<Coordinator>, Event) + 'static,
{
    let coordinator = Rc::clone(coordinator);
    let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        handler(Rc::clone(&coordinator), event)
    });
    if target
        .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        .is_err()
    {
        tracing::warn!(event, "could not bind listener");
    }
    listener.forget();
}

fn elements(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(list) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn input_value(form: &Element, selector: &str) -> String {
    form.query_selector(selector)
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
        .unwrap_or_default()
}
