//! JsForm - the form wrapper for JavaScript.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use weaver_form_browser::{BrowserDom, MountedForm, mount_form};
use weaver_form_core::{ActionKind, FormAction, FormOptions, StatePatch};

use crate::types::{FieldSummary, FormSummary, UploadSummary};

/// A mounted form exposed to JavaScript.
///
/// Keep the instance alive for as long as the page should stay interactive;
/// freeing it detaches the click, upload and submit listeners.
#[wasm_bindgen]
pub struct JsForm {
    mounted: MountedForm,
}

#[wasm_bindgen]
impl JsForm {
    /// Discover, render and wire up every field on the page.
    ///
    /// `options` may be omitted; missing keys take their defaults.
    pub fn mount(options: JsValue) -> Result<JsForm, JsError> {
        let options: FormOptions = if options.is_undefined() || options.is_null() {
            FormOptions::default()
        } else {
            serde_wasm_bindgen::from_value(options)
                .map_err(|e| JsError::new(&format!("Invalid form options: {}", e)))?
        };
        let mounted = mount_form(BrowserDom::from_window()?, &options)?;
        Ok(Self { mounted })
    }

    /// Re-render every field in view mode.
    pub fn render(&mut self) -> Result<(), JsError> {
        let mut dom = self.mounted.dom().clone();
        self.mounted.form().borrow_mut().render_all(&mut dom)?;
        Ok(())
    }

    /// Fields and upload widgets on the page.
    pub fn summary(&self) -> FormSummary {
        let form = self.mounted.form().borrow();
        FormSummary {
            fields: form
                .fields()
                .map(|field| {
                    let mode = form.mode(field.block_id()).unwrap_or_default();
                    FieldSummary::new(field, mode)
                })
                .collect(),
            uploads: form.upload_bridges().iter().map(UploadSummary::from).collect(),
        }
    }

    /// Perform an `edit`, `update` or `cancel` action on a field.
    pub fn dispatch(&mut self, action: &str, block_id: &str) -> Result<(), JsError> {
        let kind = ActionKind::parse(action)
            .ok_or_else(|| JsError::new(&format!("Unknown action: {}", action)))?;
        let mut dom = self.mounted.dom().clone();
        self.mounted
            .form()
            .borrow_mut()
            .dispatch(&mut dom, &FormAction::new(kind, block_id))?;
        Ok(())
    }

    /// Show a field's edit rendering.
    pub fn edit(&mut self, block_id: &str) -> Result<(), JsError> {
        let mut dom = self.mounted.dom().clone();
        self.mounted.form().borrow_mut().enter_edit(&mut dom, block_id)?;
        Ok(())
    }

    /// Return a field to view mode, storing `value` if it is non-empty.
    pub fn update(&mut self, block_id: &str, value: Option<String>) -> Result<(), JsError> {
        let mut dom = self.mounted.dom().clone();
        self.mounted
            .form()
            .borrow_mut()
            .commit_and_view(&mut dom, block_id, value.as_deref())?;
        Ok(())
    }

    /// Return a field to view mode without committing.
    pub fn cancel(&mut self, block_id: &str) -> Result<(), JsError> {
        let mut dom = self.mounted.dom().clone();
        self.mounted.form().borrow_mut().cancel(&mut dom, block_id)?;
        Ok(())
    }

    /// A field's state, or `undefined` for unknown ids.
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self, block_id: &str) -> Result<JsValue, JsError> {
        let form = self.mounted.form().borrow();
        match form.state(self.mounted.dom(), block_id) {
            Some(state) => Ok(state.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Import a state object into a field and show its view rendering.
    #[wasm_bindgen(js_name = setState)]
    pub fn set_state(&mut self, block_id: &str, state: JsValue) -> Result<(), JsError> {
        let json: serde_json::Value = serde_wasm_bindgen::from_value(state)
            .map_err(|e| JsError::new(&format!("Invalid state: {}", e)))?;
        let patch = StatePatch::from_json(&json)?;
        let mut dom = self.mounted.dom().clone();
        self.mounted
            .form()
            .borrow_mut()
            .commit_state(&mut dom, block_id, &patch)?;
        Ok(())
    }

    /// Store an upload result that arrived outside the built-in widget.
    #[wasm_bindgen(js_name = completeUpload)]
    pub fn complete_upload(&mut self, block_id: &str, response: JsValue) -> Result<(), JsError> {
        let response: serde_json::Value = serde_wasm_bindgen::from_value(response)
            .map_err(|e| JsError::new(&format!("Invalid upload response: {}", e)))?;
        let mut dom = self.mounted.dom().clone();
        self.mounted
            .form()
            .borrow_mut()
            .complete_upload(&mut dom, block_id, &response)?;
        Ok(())
    }

    /// Show an upload error on a field until its next successful upload.
    #[wasm_bindgen(js_name = failUpload)]
    pub fn fail_upload(&mut self, block_id: &str, message: &str) -> Result<(), JsError> {
        let mut dom = self.mounted.dom().clone();
        self.mounted
            .form()
            .borrow_mut()
            .fail_upload(&mut dom, block_id, message)?;
        Ok(())
    }
}
