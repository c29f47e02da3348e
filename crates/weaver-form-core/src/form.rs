//! The form controller.
//!
//! A `Form` is built once per page from its placeholders and then driven by
//! user actions. Each action targets one field by its control-block id and
//! ends with that block's markup replaced by a fresh rendering.

use std::collections::HashSet;

use crate::actions::{ActionKind, FormAction};
use crate::attributes::{EDITOR_ATTRIBUTE, Mode};
use crate::bridge::{UploadBridge, upload_payload};
use crate::dom::{DomPort, flatten_options};
use crate::field::{Editor, EditorKind, Field, RadioEditor, SelectEditor, block_id};
use crate::html::Markup;
use crate::options::FormOptions;
use crate::state::{FieldState, PatchValue, PropertiesPatch, StatePatch};
use crate::FormError;

#[derive(Debug)]
struct Slot {
    field: Field,
    mode: Mode,
}

/// Every field on a page, in document order.
#[derive(Debug, Default)]
pub struct Form {
    slots: Vec<Slot>,
    bridges: Vec<UploadBridge>,
}

impl Form {
    /// Build fields from the page's placeholders and swap each placeholder
    /// for an empty control block.
    ///
    /// Placeholders naming an unknown editor are skipped, but still replaced.
    pub fn discover(dom: &mut dyn DomPort, options: &FormOptions) -> Result<Self, FormError> {
        let placeholders = dom.placeholders(&options.placeholder_tag);
        let mut form = Form::default();
        let mut seen = HashSet::new();

        for placeholder in &placeholders {
            if !seen.insert(placeholder.id.as_str()) {
                return Err(FormError::Construction(format!(
                    "duplicate placeholder id `{}`",
                    placeholder.id
                )));
            }

            let editor = placeholder
                .attribute(EDITOR_ATTRIBUTE)
                .filter(|e| !e.is_empty())
                .ok_or_else(|| {
                    FormError::configuration(&placeholder.id, "missing `editor` attribute")
                })?;
            let Some(kind) = EditorKind::parse(editor) else {
                tracing::warn!(field = %placeholder.id, editor, "skipping unrecognized editor");
                continue;
            };

            let field = Field::new(kind, placeholder)?;
            if let Some(bridge) = UploadBridge::for_field(&field)? {
                form.bridges.push(bridge);
            }
            form.slots.push(Slot {
                field,
                mode: Mode::View,
            });
        }

        for placeholder in &placeholders {
            let mut html = Markup::new();
            html.raw("<div")?;
            html.attr("id", &block_id(&placeholder.id))?;
            html.raw("></div>")?;
            dom.replace_element(&placeholder.id, html.as_str())?;
        }

        tracing::debug!(
            fields = form.slots.len(),
            uploads = form.bridges.len(),
            "discovered form"
        );
        Ok(form)
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.slots.iter().map(|slot| &slot.field)
    }

    /// The field rendered into control block `block_id`.
    pub fn field(&self, block_id: &str) -> Option<&Field> {
        self.slot(block_id).map(|slot| &slot.field)
    }

    pub fn field_mut(&mut self, block_id: &str) -> Option<&mut Field> {
        self.slot_mut(block_id).map(|slot| &mut slot.field)
    }

    /// Which rendering a field currently shows.
    pub fn mode(&self, block_id: &str) -> Option<Mode> {
        self.slot(block_id).map(|slot| slot.mode)
    }

    pub fn upload_bridges(&self) -> &[UploadBridge] {
        &self.bridges
    }

    fn slot(&self, block_id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.field.block_id() == block_id)
    }

    fn slot_mut(&mut self, block_id: &str) -> Option<&mut Slot> {
        self.slots
            .iter_mut()
            .find(|slot| slot.field.block_id() == block_id)
    }

    /// Render every field in view mode.
    pub fn render_all(&mut self, dom: &mut dyn DomPort) -> Result<(), FormError> {
        for slot in &mut self.slots {
            show(slot, dom, Mode::View)?;
        }
        Ok(())
    }

    /// Swap a field to its edit rendering. Unknown ids are ignored.
    pub fn enter_edit(&mut self, dom: &mut dyn DomPort, block_id: &str) -> Result<(), FormError> {
        let Some(slot) = self.slot_mut(block_id) else {
            tracing::warn!(block_id, "edit requested for unknown field");
            return Ok(());
        };
        show(slot, dom, Mode::Edit)
    }

    /// Return a field to view mode, storing `value` first if it is non-empty.
    pub fn commit_and_view(
        &mut self,
        dom: &mut dyn DomPort,
        block_id: &str,
        value: Option<&str>,
    ) -> Result<(), FormError> {
        let Some(slot) = self.slot_mut(block_id) else {
            tracing::warn!(block_id, "commit requested for unknown field");
            return Ok(());
        };
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            slot.field.set_value(Some(value.to_string()));
            if let Editor::Upload(upload) = slot.field.editor_mut() {
                upload.clear_error();
            }
        }
        show(slot, dom, Mode::View)
    }

    /// Return a field to view mode, discarding edits.
    pub fn cancel(&mut self, dom: &mut dyn DomPort, block_id: &str) -> Result<(), FormError> {
        self.commit_and_view(dom, block_id, None)
    }

    /// Import `patch` into a field and return it to view mode.
    pub fn commit_state(
        &mut self,
        dom: &mut dyn DomPort,
        block_id: &str,
        patch: &StatePatch,
    ) -> Result<(), FormError> {
        let Some(slot) = self.slot_mut(block_id) else {
            tracing::warn!(block_id, "state committed to unknown field");
            return Ok(());
        };
        slot.field.import_state(patch);
        show(slot, dom, Mode::View)
    }

    /// Snapshot a field's state.
    pub fn state(&self, dom: &dyn DomPort, block_id: &str) -> Option<FieldState> {
        self.field(block_id).map(|field| field.export_state(dom))
    }

    /// Carry out a user action.
    pub fn dispatch(&mut self, dom: &mut dyn DomPort, action: &FormAction) -> Result<(), FormError> {
        tracing::debug!(action = %action.kind, block_id = %action.block_id, "dispatch");
        let block_id = action.block_id.as_str();
        match action.kind {
            ActionKind::Edit => self.enter_edit(dom, block_id),
            ActionKind::Cancel => self.cancel(dom, block_id),
            ActionKind::Update => {
                let Some(field) = self.field(block_id) else {
                    tracing::warn!(block_id, "update requested for unknown field");
                    return Ok(());
                };
                match read_edit_control(field, &*dom)? {
                    Some(patch) => self.commit_state(dom, block_id, &patch),
                    None => self.commit_and_view(dom, block_id, None),
                }
            }
        }
    }

    /// Store the result of an external upload and re-render the field.
    pub fn complete_upload(
        &mut self,
        dom: &mut dyn DomPort,
        block_id: &str,
        response: &serde_json::Value,
    ) -> Result<(), FormError> {
        let payload = upload_payload(response);
        tracing::debug!(block_id, payload = %payload, "upload complete");
        self.commit_state(dom, block_id, &StatePatch::value(payload))
    }

    /// Record a failed external upload; the field's view shows the message
    /// until the next successful upload or commit.
    pub fn fail_upload(
        &mut self,
        dom: &mut dyn DomPort,
        block_id: &str,
        message: &str,
    ) -> Result<(), FormError> {
        let Some(slot) = self.slot_mut(block_id) else {
            tracing::warn!(block_id, "upload failure for unknown field");
            return Ok(());
        };
        if slot.field.kind() != EditorKind::Upload {
            return Err(FormError::configuration(
                &slot.field.ids().element,
                "upload failure reported for a non-upload field",
            ));
        }
        if let Editor::Upload(upload) = slot.field.editor_mut() {
            upload.set_error(message);
        }
        tracing::warn!(block_id, message, "upload failed");
        show(slot, dom, Mode::View)
    }
}

fn show(slot: &mut Slot, dom: &mut dyn DomPort, mode: Mode) -> Result<(), FormError> {
    let html = slot.field.render(mode, &*dom)?;
    dom.replace_element(slot.field.block_id(), &html)?;
    slot.mode = mode;
    Ok(())
}

/// The patch an Update click commits, read from the field's live edit control.
///
/// `None` means nothing to commit.
fn read_edit_control(field: &Field, dom: &dyn DomPort) -> Result<Option<StatePatch>, FormError> {
    let ids = field.ids();
    let live = || {
        let control = dom.element(&ids.edit_control);
        if control.is_none() {
            tracing::warn!(control = %ids.edit_control, "edit control is not on the page");
        }
        control
    };

    let patch = match field.editor() {
        Editor::Text(_) => live()
            .and_then(|control| control.value)
            .filter(|value| !value.is_empty())
            .map(StatePatch::value),
        Editor::Checkbox(_) => live().map(|control| {
            StatePatch::value(control.value.unwrap_or_default()).with_properties(
                PropertiesPatch {
                    is_checked: Some(control.checked),
                    ..Default::default()
                },
            )
        }),
        Editor::Radio(_) => {
            let options = field.core().options(dom)?;
            let checked = flatten_options(&options)
                .enumerate()
                .find_map(|(index, option)| {
                    let id = RadioEditor::option_id(field.core(), Mode::Edit, index);
                    let control = dom.element(&id)?;
                    control.checked.then(|| {
                        control
                            .value
                            .clone()
                            .unwrap_or_else(|| option.value.clone())
                    })
                })
                .unwrap_or_default();
            Some(StatePatch::value(checked))
        }
        Editor::Dropdown(_) => live().map(|control| {
            let value = if SelectEditor::allow_multiple(field.core()) {
                Some(PatchValue::List(control.selected))
            } else {
                control.selected.into_iter().next().map(PatchValue::Text)
            };
            StatePatch {
                value: Some(value),
                ..Default::default()
            }
        }),
        Editor::Upload(_) => None,
    };
    Ok(patch)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::dom::{ElementSnapshot, MemoryDom, OptionEntry, OptionItem, Placeholder};
    use crate::field::CheckboxEditor;

    fn page(placeholders: Vec<Placeholder>) -> MemoryDom {
        placeholders
            .into_iter()
            .fold(MemoryDom::new(), |dom, p| dom.with_placeholder("editjs", p))
    }

    fn mounted(dom: &mut MemoryDom) -> Form {
        let mut form = Form::discover(dom, &FormOptions::default()).unwrap();
        form.render_all(dom).unwrap();
        form
    }

    fn name_page() -> MemoryDom {
        page(vec![Placeholder::new(
            "name",
            [("editor", "text"), ("value", "Alice")],
        )])
    }

    #[test]
    fn test_discovery_replaces_every_placeholder() {
        let mut dom = page(vec![
            Placeholder::new("name", [("editor", "text")]),
            Placeholder::new("volume", [("editor", "slider")]),
        ]);
        let form = Form::discover(&mut dom, &FormOptions::default()).unwrap();

        assert_eq!(form.fields().count(), 1);
        assert!(form.field("editjs_name").is_some());
        assert!(form.field("editjs_volume").is_none());
        assert_eq!(dom.markup("editjs_name"), Some("<div id=\"editjs_name\"></div>"));
        assert_eq!(dom.markup("editjs_volume"), Some("<div id=\"editjs_volume\"></div>"));
        assert!(dom.placeholders("editjs").is_empty());
    }

    #[test]
    fn test_missing_editor_is_a_configuration_error() {
        let mut dom = page(vec![Placeholder::new("name", [("value", "x")])]);
        let err = Form::discover(&mut dom, &FormOptions::default()).unwrap_err();
        assert!(matches!(err, FormError::Configuration { ref field, .. } if field == "name"));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let mut dom = page(vec![
            Placeholder::new("name", [("editor", "text")]),
            Placeholder::new("name", [("editor", "checkbox")]),
        ]);
        assert!(matches!(
            Form::discover(&mut dom, &FormOptions::default()),
            Err(FormError::Construction(_))
        ));
    }

    #[test]
    fn test_custom_placeholder_tag() {
        let mut dom = MemoryDom::new()
            .with_placeholder("inplace", Placeholder::new("a", [("editor", "text")]))
            .with_placeholder("editjs", Placeholder::new("b", [("editor", "text")]));
        let options = FormOptions {
            placeholder_tag: "inplace".to_string(),
            ..Default::default()
        };
        let form = Form::discover(&mut dom, &options).unwrap();
        let blocks: Vec<_> = form.fields().map(Field::block_id).collect();
        assert_eq!(blocks, ["editjs_a"]);
    }

    #[test]
    fn test_edit_then_update_commits_the_live_value() {
        let mut dom = name_page();
        let mut form = mounted(&mut dom);
        assert_eq!(form.mode("editjs_name"), Some(Mode::View));

        form.dispatch(&mut dom, &FormAction::new(ActionKind::Edit, "editjs_name"))
            .unwrap();
        assert_eq!(form.mode("editjs_name"), Some(Mode::Edit));
        assert!(dom
            .markup("editjs_name")
            .unwrap()
            .contains("edit-id=\"editjs_edit_input_name\""));

        dom.set_control(
            "editjs_name",
            ElementSnapshot::new("editjs_edit_input_name", "input").with_value("Bob"),
        );
        form.dispatch(&mut dom, &FormAction::new(ActionKind::Update, "editjs_name"))
            .unwrap();

        assert_eq!(form.field("editjs_name").unwrap().value(), Some("Bob"));
        assert_eq!(form.mode("editjs_name"), Some(Mode::View));
        let html = dom.markup("editjs_name").unwrap();
        assert!(html.contains("value=\"Bob\""));
        assert!(html.contains("readonly disabled"));
    }

    #[test]
    fn test_cancel_discards_edits() {
        let mut dom = name_page();
        let mut form = mounted(&mut dom);
        form.enter_edit(&mut dom, "editjs_name").unwrap();
        dom.set_control(
            "editjs_name",
            ElementSnapshot::new("editjs_edit_input_name", "input").with_value("Bob"),
        );

        form.dispatch(&mut dom, &FormAction::new(ActionKind::Cancel, "editjs_name"))
            .unwrap();
        assert_eq!(form.field("editjs_name").unwrap().value(), Some("Alice"));
        assert!(dom.markup("editjs_name").unwrap().contains("value=\"Alice\""));
    }

    #[test]
    fn test_empty_text_commit_keeps_the_value() {
        let mut dom = name_page();
        let mut form = mounted(&mut dom);
        form.enter_edit(&mut dom, "editjs_name").unwrap();
        dom.set_control(
            "editjs_name",
            ElementSnapshot::new("editjs_edit_input_name", "input").with_value(""),
        );
        form.dispatch(&mut dom, &FormAction::new(ActionKind::Update, "editjs_name"))
            .unwrap();
        assert_eq!(form.field("editjs_name").unwrap().value(), Some("Alice"));

        form.commit_and_view(&mut dom, "editjs_name", Some("")).unwrap();
        assert_eq!(form.field("editjs_name").unwrap().value(), Some("Alice"));
        form.commit_and_view(&mut dom, "editjs_name", Some("Carol"))
            .unwrap();
        assert_eq!(form.field("editjs_name").unwrap().value(), Some("Carol"));
    }

    #[test]
    fn test_unknown_ids_are_ignored() {
        let mut dom = name_page();
        let mut form = mounted(&mut dom);
        for kind in [ActionKind::Edit, ActionKind::Update, ActionKind::Cancel] {
            form.dispatch(&mut dom, &FormAction::new(kind, "editjs_missing"))
                .unwrap();
        }
        assert_eq!(form.mode("editjs_name"), Some(Mode::View));
    }

    #[test]
    fn test_checkbox_update_reads_checked_flag() {
        let mut dom = page(vec![
            Placeholder::new("agree", [("editor", "checkbox"), ("value", "yes")]).checked(true),
        ]);
        let mut form = mounted(&mut dom);
        form.enter_edit(&mut dom, "editjs_agree").unwrap();
        dom.set_control(
            "editjs_agree",
            ElementSnapshot::new("editjs_edit_input_agree", "input")
                .with_attribute("type", "checkbox")
                .with_value("yes")
                .with_checked(false),
        );
        form.dispatch(&mut dom, &FormAction::new(ActionKind::Update, "editjs_agree"))
            .unwrap();

        let field = form.field("editjs_agree").unwrap();
        assert!(!CheckboxEditor::is_checked(field.core()));
        assert!(!dom.markup("editjs_agree").unwrap().contains(" checked "));
    }

    #[test]
    fn test_radio_update_reads_the_checked_option() {
        let mut dom = page(vec![Placeholder::new(
            "size",
            [("editor", "radio"), ("list", "sizes"), ("value", "s")],
        )])
        .with_options(
            "sizes",
            vec![
                OptionEntry::Item(OptionItem::new("s", "Small")),
                OptionEntry::Item(OptionItem::new("l", "Large")),
            ],
        );
        let mut form = mounted(&mut dom);
        form.enter_edit(&mut dom, "editjs_size").unwrap();
        dom.set_control(
            "editjs_size",
            ElementSnapshot::new("editjs_edit_input_size_0", "input").with_value("s"),
        );
        dom.set_control(
            "editjs_size",
            ElementSnapshot::new("editjs_edit_input_size_1", "input")
                .with_value("l")
                .with_checked(true),
        );
        form.dispatch(&mut dom, &FormAction::new(ActionKind::Update, "editjs_size"))
            .unwrap();
        assert_eq!(form.field("editjs_size").unwrap().value(), Some("l"));
    }

    #[test]
    fn test_multi_select_update_joins_selection() {
        let mut dom = page(vec![Placeholder::new(
            "fruit",
            [("editor", "dropdown"), ("list", "fruits"), ("allow-multiple", "true")],
        )])
        .with_options(
            "fruits",
            vec![
                OptionEntry::Item(OptionItem::new("apple", "Apple")),
                OptionEntry::Item(OptionItem::new("lime", "Lime")),
            ],
        );
        let mut form = mounted(&mut dom);
        form.enter_edit(&mut dom, "editjs_fruit").unwrap();
        dom.set_control(
            "editjs_fruit",
            ElementSnapshot::new("editjs_edit_input_fruit", "select")
                .with_selected(["apple", "lime"]),
        );
        form.dispatch(&mut dom, &FormAction::new(ActionKind::Update, "editjs_fruit"))
            .unwrap();
        assert_eq!(form.field("editjs_fruit").unwrap().value(), Some("apple,lime"));
        assert_eq!(dom.markup("editjs_fruit").unwrap().matches(" selected").count(), 2);
    }

    #[test]
    fn test_imported_allow_multiple_changes_the_commit() {
        let mut dom = page(vec![Placeholder::new(
            "fruit",
            [("editor", "dropdown"), ("list", "fruits")],
        )])
        .with_options(
            "fruits",
            vec![
                OptionEntry::Item(OptionItem::new("apple", "Apple")),
                OptionEntry::Item(OptionItem::new("lime", "Lime")),
            ],
        );
        let mut form = mounted(&mut dom);
        let patch = StatePatch::from_json(&json!({
            "value": "apple",
            "attributes": { "allow-multiple": "true" }
        }))
        .unwrap();
        form.commit_state(&mut dom, "editjs_fruit", &patch).unwrap();
        assert!(dom.markup("editjs_fruit").unwrap().contains(" multiple"));

        form.enter_edit(&mut dom, "editjs_fruit").unwrap();
        dom.set_control(
            "editjs_fruit",
            ElementSnapshot::new("editjs_edit_input_fruit", "select")
                .with_selected(["apple", "lime"]),
        );
        form.dispatch(&mut dom, &FormAction::new(ActionKind::Update, "editjs_fruit"))
            .unwrap();
        assert_eq!(form.field("editjs_fruit").unwrap().value(), Some("apple,lime"));
    }

    #[test]
    fn test_commit_state_preserves_custom_attributes() {
        let mut dom = page(vec![Placeholder::new(
            "name",
            [("editor", "text"), ("data-track", "1")],
        )]);
        let mut form = mounted(&mut dom);
        let patch = StatePatch::from_json(&json!({
            "value": "Dana",
            "attributes": { "data-extra": "x" }
        }))
        .unwrap();
        form.commit_state(&mut dom, "editjs_name", &patch).unwrap();

        let state = form.state(&dom, "editjs_name").unwrap();
        assert_eq!(state.value.as_deref(), Some("Dana"));
        assert_eq!(state.attributes.get("data-track").map(String::as_str), Some("1"));
        assert_eq!(state.attributes.get("data-extra").map(String::as_str), Some("x"));
        let html = dom.markup("editjs_name").unwrap();
        assert!(html.contains("data-track=\"1\""));
        assert!(html.contains("data-extra=\"x\""));
    }

    fn avatar_page() -> MemoryDom {
        page(vec![Placeholder::new(
            "avatar",
            [
                ("editor", "upload"),
                ("type", "image"),
                ("use-dropzonejs", "true"),
                ("popupform-id", "avatar-modal"),
                ("popupform-formid", "avatar-form"),
                ("value", "/img/old.png"),
            ],
        )])
    }

    #[test]
    fn test_upload_bridges_are_recorded() {
        let mut dom = avatar_page();
        let form = mounted(&mut dom);
        let bridges = form.upload_bridges();
        assert_eq!(bridges.len(), 1);
        assert_eq!(bridges[0].origin_block_id, "editjs_avatar");
        assert_eq!(bridges[0].popup_id, "avatar-modal");
    }

    #[test]
    fn test_upload_failure_then_success() {
        let mut dom = avatar_page();
        let mut form = mounted(&mut dom);

        form.fail_upload(&mut dom, "editjs_avatar", "File too large")
            .unwrap();
        assert!(dom.markup("editjs_avatar").unwrap().contains("File too large"));
        assert_eq!(
            form.field("editjs_avatar").unwrap().value(),
            Some("/img/old.png")
        );

        form.complete_upload(&mut dom, "editjs_avatar", &json!({ "path": "/img/new.png" }))
            .unwrap();
        let html = dom.markup("editjs_avatar").unwrap();
        assert!(html.contains("src=\"/img/new.png\""));
        assert!(!html.contains("alert"));
    }

    #[test]
    fn test_upload_failure_on_other_fields_is_rejected() {
        let mut dom = name_page();
        let mut form = mounted(&mut dom);
        assert!(matches!(
            form.fail_upload(&mut dom, "editjs_name", "nope"),
            Err(FormError::Configuration { .. })
        ));
    }
}
