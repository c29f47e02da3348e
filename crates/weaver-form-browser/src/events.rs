//! Click delegation for field buttons.
//!
//! Rendered markup is replaced wholesale on every action, so listeners are
//! never attached to the buttons themselves. One document-level listener
//! looks for the closest `button[editjs-action]` above the click target.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use weaver_form_core::{ACTION_ATTRIBUTE, Form, FormAction, TARGET_ATTRIBUTE};

use crate::dom::BrowserDom;

/// The action a click on `target` asks for, if it landed on a field button.
pub fn action_for_target(target: &web_sys::Element) -> Option<FormAction> {
    let selector = format!("button[{}]", ACTION_ATTRIBUTE);
    let button = target.closest(&selector).ok().flatten()?;
    let action = button.get_attribute(ACTION_ATTRIBUTE)?;
    let block_id = button.get_attribute(TARGET_ATTRIBUTE)?;
    let parsed = FormAction::from_attributes(&action, &block_id);
    if parsed.is_none() {
        tracing::warn!(action = %action, block_id = %block_id, "ignoring malformed field button");
    }
    parsed
}

/// The action carried by a click event.
pub fn action_for_event(event: &web_sys::Event) -> Option<FormAction> {
    let target = event.target()?.dyn_into::<web_sys::Element>().ok()?;
    action_for_target(&target)
}

/// Route clicks on field buttons anywhere in the document to `form`.
///
/// The listener is removed when the returned value is dropped.
pub fn delegate_actions(dom: &BrowserDom, form: Rc<RefCell<Form>>) -> EventListener {
    let mut page = dom.clone();
    EventListener::new_with_options(
        dom.document(),
        "click",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(action) = action_for_event(event) else {
                return;
            };
            event.prevent_default();
            if let Err(err) = form.borrow_mut().dispatch(&mut page, &action) {
                tracing::error!(error = %err, block_id = %action.block_id, "field action failed");
            }
        },
    )
}
