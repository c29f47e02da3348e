//! Hand-off between upload fields and the page's drag-and-drop widget.

use serde::Serialize;

use crate::field::{Editor, Field, UploadSettings};
use crate::FormError;

/// Form field name the widget posts files under when none is configured.
const DEFAULT_PARAM_NAME: &str = "file";

/// One upload field that delegates to an external widget in a modal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadBridge {
    /// Control block of the field to update on completion.
    pub origin_block_id: String,
    /// Modal hosting the widget (`popupform-id`).
    pub popup_id: String,
    /// Form element the widget attaches to (`popupform-formid`).
    pub form_id: String,
    /// Posted field name (`ajax-upload-formfieldname`).
    pub field_name: String,
    pub max_files: u32,
    pub max_file_size_mb: u32,
    /// Comma-separated accepted MIME types.
    pub file_types: String,
}

impl UploadBridge {
    /// The bridge for `field`, if it is an upload field using the external widget.
    pub fn for_field(field: &Field) -> Result<Option<Self>, FormError> {
        if !matches!(field.editor(), Editor::Upload(_)) {
            return Ok(None);
        }
        let core = field.core();
        let settings = UploadSettings::from_field(core);
        if !settings.use_external_widget {
            return Ok(None);
        }

        Ok(Some(Self {
            origin_block_id: core.ids.block.clone(),
            popup_id: core.required("popupform-id")?.to_string(),
            form_id: core.required("popupform-formid")?.to_string(),
            field_name: core
                .attributes
                .common("ajax-upload-formfieldname")
                .unwrap_or(DEFAULT_PARAM_NAME)
                .to_string(),
            max_files: settings.max_files,
            max_file_size_mb: settings.max_size_mb,
            file_types: settings.accept(),
        }))
    }

    /// Options for constructing the widget on `form_id`.
    pub fn widget_options(&self) -> WidgetOptions {
        WidgetOptions {
            param_name: self.field_name.clone(),
            max_files: self.max_files,
            max_filesize: self.max_file_size_mb,
            accepted_files: self.file_types.clone(),
        }
    }
}

/// Construction options understood by the drag-and-drop widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    pub param_name: String,
    pub max_files: u32,
    /// Megabytes.
    pub max_filesize: u32,
    pub accepted_files: String,
}

/// Options for the modal hosting the widget.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalOptions {
    pub backdrop: String,
    pub keyboard: bool,
    pub focus: bool,
    pub show: bool,
}

impl ModalOptions {
    /// A closed modal that only the field's own trigger opens.
    pub fn new(backdrop: impl Into<String>) -> Self {
        Self {
            backdrop: backdrop.into(),
            keyboard: false,
            focus: true,
            show: false,
        }
    }
}

/// The value to store for a completed upload response.
///
/// Responses carrying a `path` key store that path; bare strings are stored
/// as-is; anything else is stored as its JSON text.
pub fn upload_payload(response: &serde_json::Value) -> String {
    match response {
        serde_json::Value::Object(map) => match map.get("path") {
            Some(serde_json::Value::String(path)) => path.clone(),
            Some(other) => other.to_string(),
            None => response.to_string(),
        },
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
