//! Bindings for the upload modal and the drag-and-drop widget inside it.
//!
//! Both are page-provided globals: Bootstrap's jQuery modal plugin and
//! Dropzone. They are only touched when a form has upload bridges.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_utils::format::JsValueSerdeExt;
use serde::Serialize;
use wasm_bindgen::prelude::*;
use weaver_form_core::{Form, FormError, ModalOptions, UploadBridge};

use crate::dom::{BrowserDom, dom_error};

#[wasm_bindgen]
extern "C" {
    /// A jQuery selection.
    pub type JQuery;

    #[wasm_bindgen(catch, js_name = jQuery)]
    fn jquery(selector: &str) -> Result<JQuery, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn modal(this: &JQuery, arg: &JsValue) -> Result<JsValue, JsValue>;

    /// A Dropzone instance bound to a form element.
    #[derive(Clone)]
    pub type Dropzone;

    #[wasm_bindgen(catch, constructor, js_class = "Dropzone")]
    fn new(selector: &str, options: &JsValue) -> Result<Dropzone, JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &Dropzone, event: &str, handler: &js_sys::Function);

    #[wasm_bindgen(method, js_name = removeFile)]
    fn remove_file(this: &Dropzone, file: &JsValue);
}

/// Serialize to a plain JS object.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, FormError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|err| FormError::Dom(err.to_string()))
}

fn modal_command(popup_id: &str, arg: &JsValue) -> Result<(), FormError> {
    jquery(&format!("#{}", popup_id))
        .and_then(|selection| selection.modal(arg))
        .map(|_| ())
        .map_err(dom_error)
}

/// Stop Dropzone from attaching itself to every `.dropzone` form.
pub fn disable_auto_discover() -> Result<(), FormError> {
    let global = js_sys::global();
    let dropzone = js_sys::Reflect::get(&global, &JsValue::from_str("Dropzone")).map_err(dom_error)?;
    if dropzone.is_undefined() {
        return Err(FormError::Dom("Dropzone is not loaded".to_string()));
    }
    js_sys::Reflect::set(&dropzone, &JsValue::from_str("autoDiscover"), &JsValue::FALSE)
        .map_err(dom_error)?;
    Ok(())
}

/// Text for a widget error, which is either a string or a response object.
fn error_text(message: &JsValue) -> String {
    if let Some(text) = message.as_string() {
        return text;
    }
    match message.into_serde::<serde_json::Value>() {
        Ok(serde_json::Value::Object(map)) => match map.get("error") {
            Some(serde_json::Value::String(error)) => error.clone(),
            _ => serde_json::Value::Object(map).to_string(),
        },
        Ok(other) => other.to_string(),
        Err(_) => "upload failed".to_string(),
    }
}

/// A wired-up upload widget and the callbacks it holds.
pub struct UploadWidget {
    pub bridge: UploadBridge,
    pub dropzone: Dropzone,
    _callbacks: Vec<Closure<dyn FnMut(JsValue, JsValue)>>,
}

impl UploadWidget {
    /// Initialise the bridge's modal and widget, routing results to `form`.
    pub fn attach(
        bridge: &UploadBridge,
        backdrop: &str,
        dom: &BrowserDom,
        form: Rc<RefCell<Form>>,
    ) -> Result<Self, FormError> {
        modal_command(&bridge.popup_id, &to_js(&ModalOptions::new(backdrop))?)?;

        let dropzone = Dropzone::new(
            &format!("#{}", bridge.form_id),
            &to_js(&bridge.widget_options())?,
        )
        .map_err(dom_error)?;

        let on_success = {
            let (form, dropzone, bridge) = (form.clone(), dropzone.clone(), bridge.clone());
            let mut page = dom.clone();
            Closure::<dyn FnMut(JsValue, JsValue)>::new(move |file: JsValue, response: JsValue| {
                dropzone.remove_file(&file);
                let response = match response.as_string() {
                    Some(text) => serde_json::Value::String(text),
                    None => response.into_serde().unwrap_or(serde_json::Value::Null),
                };
                let result = form
                    .borrow_mut()
                    .complete_upload(&mut page, &bridge.origin_block_id, &response)
                    .and_then(|()| modal_command(&bridge.popup_id, &JsValue::from_str("hide")));
                if let Err(err) = result {
                    tracing::error!(error = %err, block_id = %bridge.origin_block_id, "storing upload failed");
                }
            })
        };

        let on_error = {
            let (form, dropzone, bridge) = (form, dropzone.clone(), bridge.clone());
            let mut page = dom.clone();
            Closure::<dyn FnMut(JsValue, JsValue)>::new(move |file: JsValue, message: JsValue| {
                dropzone.remove_file(&file);
                let message = error_text(&message);
                let result = form
                    .borrow_mut()
                    .fail_upload(&mut page, &bridge.origin_block_id, &message)
                    .and_then(|()| modal_command(&bridge.popup_id, &JsValue::from_str("hide")));
                if let Err(err) = result {
                    tracing::error!(error = %err, block_id = %bridge.origin_block_id, "reporting upload failure failed");
                }
            })
        };

        dropzone.on("success", on_success.as_ref().unchecked_ref());
        dropzone.on("error", on_error.as_ref().unchecked_ref());
        tracing::debug!(popup = %bridge.popup_id, form = %bridge.form_id, "upload widget attached");

        Ok(Self {
            bridge: bridge.clone(),
            dropzone,
            _callbacks: vec![on_success, on_error],
        })
    }
}
