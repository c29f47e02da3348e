//! Submit rerouting.
//!
//! View-mode controls are disabled and named only by generated ids, so a
//! plain submit would post nothing useful. The form's submit buttons are
//! turned into plain buttons that first re-enable and name every input.

use gloo_events::EventListener;
use wasm_bindgen::JsCast;
use weaver_form_core::{FormError, submit_name};

use crate::dom::{BrowserDom, dom_error};

fn node_elements<T: JsCast>(list: &web_sys::NodeList) -> impl Iterator<Item = T> + '_ {
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<T>().ok())
}

/// Enable and name every generated input inside forms matching `selector`.
///
/// Inputs that already carry a `name` keep it.
pub fn prepare_inputs(dom: &BrowserDom, selector: &str) -> Result<usize, FormError> {
    let inputs = dom
        .document()
        .query_selector_all(&format!("{} input", selector))
        .map_err(dom_error)?;

    let mut named = 0;
    for input in node_elements::<web_sys::HtmlInputElement>(&inputs) {
        input.set_disabled(false);
        if input.has_attribute("name") {
            continue;
        }
        let id = input.id();
        if let Some(name) = submit_name(&id) {
            input.set_attribute("name", name).map_err(dom_error)?;
            named += 1;
        }
    }
    Ok(named)
}

/// Take over the submit buttons of forms matching `selector`.
///
/// Returns one listener per rerouted button; dropping them restores nothing
/// but stops the takeover.
pub fn reroute_submit(dom: &BrowserDom, selector: &str) -> Result<Vec<EventListener>, FormError> {
    let buttons = dom
        .document()
        .query_selector_all(&format!("{} button[type=submit]", selector))
        .map_err(dom_error)?;

    let mut listeners = Vec::new();
    for button in node_elements::<web_sys::Element>(&buttons) {
        button.set_attribute("type", "button").map_err(dom_error)?;

        let page = dom.clone();
        let selector = selector.to_string();
        listeners.push(EventListener::new(&button, "click", move |_| {
            let submitted = prepare_inputs(&page, &selector).and_then(|named| {
                tracing::debug!(named, "submitting form");
                let form = page
                    .document()
                    .query_selector(&selector)
                    .map_err(dom_error)?
                    .and_then(|el| el.dyn_into::<web_sys::HtmlFormElement>().ok())
                    .ok_or_else(|| FormError::Dom(format!("no form matches `{}`", selector)))?;
                form.submit().map_err(dom_error)
            });
            if let Err(err) = submitted {
                tracing::error!(error = %err, "form submission failed");
            }
        }));
    }
    tracing::debug!(buttons = listeners.len(), "rerouted submit buttons");
    Ok(listeners)
}
