//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;
use weaver_form_core::{Field, Mode, UploadBridge};

/// One field as seen from a page script.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct FieldSummary {
    pub block_id: String,
    /// The placeholder's id.
    pub element_id: String,
    /// `text`, `checkbox`, `radio`, `dropdown` or `upload`.
    pub kind: String,
    pub value: Option<String>,
    /// `view` or `edit`.
    pub mode: String,
}

impl FieldSummary {
    pub fn new(field: &Field, mode: Mode) -> Self {
        Self {
            block_id: field.block_id().to_string(),
            element_id: field.ids().element.clone(),
            kind: field.kind().to_string(),
            value: field.value().map(str::to_string),
            mode: match mode {
                Mode::View => "view",
                Mode::Edit => "edit",
            }
            .to_string(),
        }
    }
}

/// An upload field handled by the drag-and-drop widget.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct UploadSummary {
    pub block_id: String,
    pub popup_id: String,
    pub form_id: String,
    pub field_name: String,
    pub max_files: u32,
    pub max_file_size_mb: u32,
    pub file_types: String,
}

impl From<&UploadBridge> for UploadSummary {
    fn from(bridge: &UploadBridge) -> Self {
        Self {
            block_id: bridge.origin_block_id.clone(),
            popup_id: bridge.popup_id.clone(),
            form_id: bridge.form_id.clone(),
            field_name: bridge.field_name.clone(),
            max_files: bridge.max_files,
            max_file_size_mb: bridge.max_file_size_mb,
            file_types: bridge.file_types.clone(),
        }
    }
}

/// Every field on the page, in document order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub fields: Vec<FieldSummary>,
    pub uploads: Vec<UploadSummary>,
}
