//! Fields and their renderers.
//!
//! A `Field` owns everything derived from its placeholder: the ids of the
//! elements it renders, its classified attributes, and its current value.
//! The control-specific part lives in an [`Editor`] variant, chosen once at
//! discovery time.

mod checkbox;
mod radio;
mod select;
mod text;
mod upload;

pub use checkbox::CheckboxEditor;
pub use radio::RadioEditor;
pub use select::SelectEditor;
pub use text::TextEditor;
pub use upload::{UploadEditor, UploadKind, UploadSettings, file_icon};

use std::collections::BTreeMap;
use std::fmt;

use crate::attributes::{
    Bucket, ClassifiedAttributes, EDITOR_ATTRIBUTE, Mode, VALUE_ATTRIBUTE, is_switched_on,
    is_valid_attribute_name,
};
use crate::dom::{DomPort, ElementSnapshot, OptionEntry, Placeholder};
use crate::html::{Markup, merged_class};
use crate::state::{FieldProperties, FieldState, StatePatch};
use crate::FormError;

/// The control kinds a placeholder can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorKind {
    Text,
    Checkbox,
    Radio,
    Dropdown,
    Upload,
}

impl EditorKind {
    /// Parse an `editor` attribute value, ignoring case.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "checkbox" => Some(Self::Checkbox),
            "radio" => Some(Self::Radio),
            "dropdown" => Some(Self::Dropdown),
            "upload" => Some(Self::Upload),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Dropdown => "dropdown",
            Self::Upload => "upload",
        }
    }
}

impl fmt::Display for EditorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Element ids derived from the placeholder id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIds {
    pub element: String,
    pub block: String,
    pub view_control: String,
    pub view_edit_button: String,
    pub edit_control: String,
    pub update_button: String,
    pub cancel_button: String,
}

/// Prefix of every id the form generates.
pub const ID_PREFIX: &str = "editjs_";

impl FieldIds {
    pub fn new(element_id: &str) -> Self {
        Self {
            element: element_id.to_string(),
            block: block_id(element_id),
            view_control: format!("{ID_PREFIX}view_{element_id}"),
            view_edit_button: format!("{ID_PREFIX}view_editbutton_{element_id}"),
            edit_control: format!("{ID_PREFIX}edit_input_{element_id}"),
            update_button: format!("{ID_PREFIX}edit_updatebutton_{element_id}"),
            cancel_button: format!("{ID_PREFIX}edit_cancelbutton_{element_id}"),
        }
    }
}

/// Control-block id for a placeholder id.
pub fn block_id(element_id: &str) -> String {
    format!("{ID_PREFIX}{element_id}")
}

/// The name a generated control is submitted under: its placeholder id.
///
/// Returns `None` for ids the form did not generate.
pub fn submit_name(control_id: &str) -> Option<&str> {
    let rest = control_id.strip_prefix(ID_PREFIX)?;
    let name = rest
        .strip_prefix("view_")
        .or_else(|| rest.strip_prefix("edit_input_"))
        .unwrap_or(rest);
    (!name.is_empty()).then_some(name)
}

/// The parts of a field every renderer reads.
#[derive(Debug, Clone)]
pub struct FieldCore {
    pub ids: FieldIds,
    pub attributes: ClassifiedAttributes,
    pub value: Option<String>,
    /// The placeholder's native `checked` flag.
    pub native_checked: bool,
}

impl FieldCore {
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Look up a common attribute, failing if it is missing.
    pub fn required(&self, name: &str) -> Result<&str, FormError> {
        self.attributes.common(name).ok_or_else(|| {
            FormError::configuration(
                &self.ids.element,
                format!("missing required `{}` attribute", name),
            )
        })
    }

    /// Options from the source named by the `list` attribute.
    pub fn options(&self, dom: &dyn DomPort) -> Result<Vec<OptionEntry>, FormError> {
        let list_id = self.required("list")?;
        dom.options_source(list_id).ok_or_else(|| {
            FormError::configuration(
                &self.ids.element,
                format!("options source `{}` not found on the page", list_id),
            )
        })
    }

    /// The Edit button shown next to view-mode controls.
    pub(crate) fn edit_button(&self, markup: &mut Markup, class: &str, label: &str) -> fmt::Result {
        markup.raw("<button")?;
        markup.attr("class", class)?;
        markup.attr("id", &self.ids.view_edit_button)?;
        action_attrs(markup, "edit", &self.ids.block)?;
        markup.raw(" type=\"button\"><i class=\"fa fa-pencil-alt\"></i>")?;
        markup.text(label)?;
        markup.raw("</button>")
    }

    /// The Update and Cancel buttons shown next to edit-mode controls.
    pub(crate) fn commit_buttons(
        &self,
        markup: &mut Markup,
        update_class: &str,
        labelled: bool,
    ) -> fmt::Result {
        markup.raw("<button")?;
        markup.attr("class", update_class)?;
        markup.attr("id", &self.ids.update_button)?;
        action_attrs(markup, "update", &self.ids.block)?;
        markup.raw(" type=\"button\"><i class=\"fa fa-save\"></i>")?;
        if labelled {
            markup.raw("Update")?;
        }
        markup.raw("</button><button class=\"btn btn-outline-secondary\"")?;
        markup.attr("id", &self.ids.cancel_button)?;
        action_attrs(markup, "cancel", &self.ids.block)?;
        markup.raw(" type=\"button\"><i class=\"fa fa-undo\"></i>")?;
        if labelled {
            markup.raw("Cancel")?;
        }
        markup.raw("</button>")
    }
}

fn action_attrs(markup: &mut Markup, action: &str, block: &str) -> fmt::Result {
    markup.attr("editjs-action", action)?;
    markup.attr("editjs-id", block)
}

/// Produces the two renderings of a field.
pub trait FieldRenderer {
    fn render_view(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError>;

    fn render_edit(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError>;
}

/// The control-specific half of a field.
#[derive(Debug, Clone)]
pub enum Editor {
    Text(TextEditor),
    Checkbox(CheckboxEditor),
    Radio(RadioEditor),
    Dropdown(SelectEditor),
    Upload(UploadEditor),
}

impl Editor {
    pub fn kind(&self) -> EditorKind {
        match self {
            Editor::Text(_) => EditorKind::Text,
            Editor::Checkbox(_) => EditorKind::Checkbox,
            Editor::Radio(_) => EditorKind::Radio,
            Editor::Dropdown(_) => EditorKind::Dropdown,
            Editor::Upload(_) => EditorKind::Upload,
        }
    }

    fn renderer(&self) -> &dyn FieldRenderer {
        match self {
            Editor::Text(e) => e,
            Editor::Checkbox(e) => e,
            Editor::Radio(e) => e,
            Editor::Dropdown(e) => e,
            Editor::Upload(e) => e,
        }
    }
}

/// One editable data-entry unit.
#[derive(Debug, Clone)]
pub struct Field {
    core: FieldCore,
    editor: Editor,
}

impl Field {
    /// Build a field of the given kind from its placeholder.
    pub fn new(kind: EditorKind, placeholder: &Placeholder) -> Result<Self, FormError> {
        if placeholder.id.trim().is_empty() {
            return Err(FormError::Construction(
                "placeholder element has no id".to_string(),
            ));
        }

        let attributes = ClassifiedAttributes::classify(placeholder.attributes.iter().cloned());
        let core = FieldCore {
            ids: FieldIds::new(&placeholder.id),
            value: attributes.current_value.clone(),
            attributes,
            native_checked: placeholder.checked,
        };

        let editor = match kind {
            EditorKind::Text => Editor::Text(TextEditor),
            EditorKind::Checkbox => Editor::Checkbox(CheckboxEditor),
            EditorKind::Radio => Editor::Radio(RadioEditor),
            EditorKind::Dropdown => Editor::Dropdown(SelectEditor),
            EditorKind::Upload => Editor::Upload(UploadEditor::default()),
        };

        Ok(Self { core, editor })
    }

    pub fn core(&self) -> &FieldCore {
        &self.core
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    pub fn kind(&self) -> EditorKind {
        self.editor.kind()
    }

    pub fn ids(&self) -> &FieldIds {
        &self.core.ids
    }

    pub fn block_id(&self) -> &str {
        &self.core.ids.block
    }

    pub fn attributes(&self) -> &ClassifiedAttributes {
        &self.core.attributes
    }

    pub fn value(&self) -> Option<&str> {
        self.core.value.as_deref()
    }

    pub fn set_value(&mut self, value: Option<String>) {
        self.core.value = value;
    }

    pub fn render_view(&self, dom: &dyn DomPort) -> Result<String, FormError> {
        self.editor.renderer().render_view(&self.core, dom)
    }

    pub fn render_edit(&self, dom: &dyn DomPort) -> Result<String, FormError> {
        self.editor.renderer().render_edit(&self.core, dom)
    }

    pub fn render(&self, mode: Mode, dom: &dyn DomPort) -> Result<String, FormError> {
        match mode {
            Mode::View => self.render_view(dom),
            Mode::Edit => self.render_edit(dom),
        }
    }

    /// Snapshot the field from whichever of its controls is live.
    pub fn export_state(&self, dom: &dyn DomPort) -> FieldState {
        let live = dom
            .element(&self.core.ids.view_control)
            .or_else(|| dom.element(&self.core.ids.edit_control))
            .unwrap_or_else(|| self.synthesized_control());

        let unary = |name: &str| live.attribute(name).is_some_and(is_switched_on);

        let mut attributes = BTreeMap::new();
        let mut classes = Vec::new();
        for attribute in &live.attributes {
            if attribute.name.eq_ignore_ascii_case("class") {
                classes.extend(
                    attribute
                        .value
                        .split_whitespace()
                        .map(str::to_lowercase),
                );
            } else {
                attributes.insert(attribute.name.to_lowercase(), attribute.value.clone());
            }
        }

        FieldState {
            value: self.core.value.clone(),
            properties: FieldProperties {
                is_disabled: unary("disabled"),
                is_selected: unary("selected"),
                is_checked: live.checked || unary("checked"),
                is_active: unary("active"),
            },
            attributes,
            classes,
        }
    }

    /// A stand-in for the view control, built from the view and common buckets.
    fn synthesized_control(&self) -> ElementSnapshot {
        let attributes = &self.core.attributes;
        let mut control = ElementSnapshot::new(self.core.ids.view_control.clone(), "div");
        for attribute in attributes
            .for_mode(Mode::View)
            .filter(|a| a.name != "class")
        {
            control.attributes.push(attribute.clone());
        }
        let class = merged_class(attributes.for_mode(Mode::View));
        control.with_attribute("class", class.to_string())
    }

    /// Fold a state patch into the field's attributes and value.
    pub fn import_state(&mut self, patch: &StatePatch) {
        let attributes = &mut self.core.attributes;

        if let Some(properties) = &patch.properties {
            for (name, on) in properties.flags() {
                attributes.set(Bucket::Common, name, on.to_string());
            }
            if let Some(checked) = properties.is_checked {
                self.core.native_checked = checked;
            }
        }

        if let Some(patched) = &patch.attributes {
            for (name, value) in patched {
                let name = name.to_lowercase();
                if matches!(name.as_str(), "id" | VALUE_ATTRIBUTE | EDITOR_ATTRIBUTE) {
                    continue;
                }
                if !is_valid_attribute_name(&name) {
                    tracing::warn!(field = %self.core.ids.element, name = %name, "skipping invalid attribute name");
                    continue;
                }
                attributes.set_routed(&name, value.clone());
            }
        }

        if let Some(value) = &patch.value {
            self.core.value = value.clone().map(|v| v.into_text());
        }

        if let Editor::Upload(upload) = &mut self.editor {
            upload.clear_error();
        }
    }

    /// Validate and import a JSON state payload.
    pub fn import_json(&mut self, state: &serde_json::Value) -> Result<(), FormError> {
        let patch = StatePatch::from_json(state)?;
        self.import_state(&patch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dom::MemoryDom;
    use crate::state::PropertiesPatch;

    fn text_field() -> Field {
        Field::new(
            EditorKind::Text,
            &Placeholder::new(
                "name",
                [
                    ("editor", "text"),
                    ("value", "Alice"),
                    ("data-x", "1"),
                    ("view-title", "T"),
                    ("edit-placeholder", "P"),
                    ("disabled", "true"),
                ],
            ),
        )
        .unwrap()
    }

    #[test]
    fn test_ids_derive_from_placeholder_id() {
        let ids = FieldIds::new("email");
        assert_eq!(ids.block, "editjs_email");
        assert_eq!(ids.view_control, "editjs_view_email");
        assert_eq!(ids.view_edit_button, "editjs_view_editbutton_email");
        assert_eq!(ids.edit_control, "editjs_edit_input_email");
        assert_eq!(ids.update_button, "editjs_edit_updatebutton_email");
        assert_eq!(ids.cancel_button, "editjs_edit_cancelbutton_email");
    }

    #[test]
    fn test_submit_names() {
        assert_eq!(submit_name("editjs_view_email"), Some("email"));
        assert_eq!(submit_name("editjs_edit_input_email"), Some("email"));
        assert_eq!(submit_name("editjs_email"), Some("email"));
        assert_eq!(submit_name("editjs_"), None);
        assert_eq!(submit_name("csrf_token"), None);
    }

    #[test]
    fn test_editor_kind_parse_ignores_case() {
        assert_eq!(EditorKind::parse("DropDown"), Some(EditorKind::Dropdown));
        assert_eq!(EditorKind::parse("textarea"), None);
    }

    #[test]
    fn test_empty_id_is_a_construction_error() {
        let err = Field::new(EditorKind::Text, &Placeholder::new("", [("editor", "text")]));
        assert!(matches!(err, Err(FormError::Construction(_))));
    }

    #[test]
    fn test_export_without_live_controls() {
        let state = text_field().export_state(&MemoryDom::new());
        assert_eq!(state.value.as_deref(), Some("Alice"));
        assert!(state.properties.is_disabled);
        assert!(!state.properties.is_checked);
        assert_eq!(state.attributes.get("title").map(String::as_str), Some("T"));
        assert_eq!(state.attributes.get("data-x").map(String::as_str), Some("1"));
        assert!(!state.attributes.contains_key("placeholder"));
        assert_eq!(state.classes, ["form-control"]);
    }

    #[test]
    fn test_export_reads_the_live_view_control() {
        let field = text_field();
        let mut dom = MemoryDom::new();
        dom.set_control(
            field.block_id(),
            ElementSnapshot::new(field.ids().view_control.clone(), "input")
                .with_attribute("class", "Wide  readonly")
                .with_attribute("selected", "false")
                .with_checked(true),
        );

        let state = field.export_state(&dom);
        assert_eq!(state.classes, ["wide", "readonly"]);
        assert!(state.properties.is_checked);
        assert!(!state.properties.is_selected);
        assert!(!state.properties.is_disabled);
    }

    #[test]
    fn test_import_keeps_unknown_attributes() {
        let mut field = text_field();
        field.import_state(
            &StatePatch::default()
                .with_attribute("data-track", "42")
                .with_attribute("Edit-Hint", "type here"),
        );
        let attrs = field.attributes();
        assert_eq!(attrs.get(Bucket::Common, "data-track"), Some("42"));
        assert_eq!(attrs.get(Bucket::Edit, "hint"), Some("type here"));
        assert_eq!(field.value(), Some("Alice"));
    }

    #[test]
    fn test_import_ignores_reserved_names() {
        let mut field = text_field();
        field.import_state(
            &StatePatch::default()
                .with_attribute("id", "other")
                .with_attribute("value", "Mallory")
                .with_attribute("editor", "radio"),
        );
        assert_eq!(field.value(), Some("Alice"));
        assert_eq!(field.ids().element, "name");
        assert_eq!(field.attributes().get(Bucket::Common, "editor"), None);
        assert_eq!(field.kind(), EditorKind::Text);
    }

    #[test]
    fn test_property_flags_become_attributes() {
        let mut field = text_field();
        field.import_state(&StatePatch::default().with_properties(PropertiesPatch {
            is_disabled: Some(false),
            is_active: Some(true),
            ..Default::default()
        }));
        let attrs = field.attributes();
        assert_eq!(attrs.get(Bucket::Common, "disabled"), Some("false"));
        assert_eq!(attrs.get(Bucket::Common, "active"), Some("true"));
        assert_eq!(attrs.get(Bucket::Common, "checked"), None);

        let state = field.export_state(&MemoryDom::new());
        assert!(!state.properties.is_disabled);
        assert!(state.properties.is_active);
    }

    #[test]
    fn test_export_import_is_stable() {
        let dom = MemoryDom::new();
        let mut field = text_field();

        let first = field.export_state(&dom);
        field.import_state(&first.clone().into());
        let second = field.export_state(&dom);
        field.import_state(&second.clone().into());
        let third = field.export_state(&dom);

        assert_eq!(first.value, second.value);
        assert_eq!(first.properties, second.properties);
        assert_eq!(second, third);
    }

    #[test]
    fn test_import_is_idempotent() {
        let patch = StatePatch::value("Bob").with_attribute("data-x", "2");
        let mut once = text_field();
        once.import_state(&patch);
        let mut twice = once.clone();
        twice.import_state(&patch);

        assert_eq!(once.attributes(), twice.attributes());
        assert_eq!(once.value(), twice.value());
    }

    #[test]
    fn test_null_value_clears_and_lists_join() {
        let mut field = text_field();
        field.import_json(&json!({ "value": null })).unwrap();
        assert_eq!(field.value(), None);

        field.import_json(&json!({ "value": ["a", "b"] })).unwrap();
        assert_eq!(field.value(), Some("a,b"));
    }

    #[test]
    fn test_import_json_rejects_malformed_state() {
        let mut field = text_field();
        assert!(matches!(
            field.import_json(&json!("Bob")),
            Err(FormError::Format { .. })
        ));
        assert!(matches!(
            field.import_json(&json!({ "value": 3 })),
            Err(FormError::Format { .. })
        ));
        assert_eq!(field.value(), Some("Alice"));
    }

    #[test]
    fn test_unchecking_overrides_native_checked() {
        let mut field = Field::new(
            EditorKind::Checkbox,
            &Placeholder::new("agree", [("editor", "checkbox")]).checked(true),
        )
        .unwrap();
        assert!(CheckboxEditor::is_checked(field.core()));

        field.import_state(&StatePatch::default().with_properties(PropertiesPatch {
            is_checked: Some(false),
            ..Default::default()
        }));
        assert!(!CheckboxEditor::is_checked(field.core()));
    }

    #[test]
    fn test_import_skips_invalid_attribute_names() {
        let mut field = text_field();
        let before = field.attributes().clone();
        field
            .import_json(&json!({
                "attributes": { "onfocus=alert(1) autofocus x": "y", "view-": "z" }
            }))
            .unwrap();
        assert_eq!(field.attributes(), &before);

        let html = field.render_view(&MemoryDom::new()).unwrap();
        assert!(!html.contains("onfocus"));
        assert!(!html.contains(" =\"z\""));
    }

    #[test]
    fn test_imported_checked_flag_is_written_once() {
        let mut field = Field::new(
            EditorKind::Checkbox,
            &Placeholder::new("agree", [("editor", "checkbox")]),
        )
        .unwrap();
        field.import_json(&json!({ "properties": { "isChecked": true } })).unwrap();

        let html = field.render_view(&MemoryDom::new()).unwrap();
        assert_eq!(html.matches(" checked").count(), 1);
        assert!(!html.contains("checked=\"true\""));
    }
}
