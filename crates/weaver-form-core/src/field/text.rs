use crate::attributes::Mode;
use crate::dom::DomPort;
use crate::html::Markup;
use crate::FormError;

use super::{FieldCore, FieldRenderer};

/// Attributes the text renderer writes itself.
const TEXT_OWNED: &[&str] = &["type"];

/// Single-line input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextEditor;

impl TextEditor {
    /// HTML input subtype, from `textbox-style`.
    pub fn input_type(field: &FieldCore) -> &str {
        field.attributes.common("textbox-style").unwrap_or("text")
    }
}

impl FieldRenderer for TextEditor {
    fn render_view(&self, field: &FieldCore, _dom: &dyn DomPort) -> Result<String, FormError> {
        let mut html = Markup::new();
        html.raw("<div class=\"input-group mb-3\"")?;
        html.attr("id", &field.ids.block)?;
        html.raw("><input")?;
        html.attr("type", Self::input_type(field))?;
        html.attr("id", &field.ids.view_control)?;
        html.flag("readonly")?;
        html.flag("disabled")?;
        field.attributes.attach(&mut html, Mode::View, TEXT_OWNED)?;
        html.attr("value", field.value_str())?;
        html.raw(" /><div class=\"input-group-append\">")?;
        field.edit_button(&mut html, "btn btn-outline-secondary", "Edit")?;
        html.raw("</div></div>")?;
        Ok(html.finish())
    }

    fn render_edit(&self, field: &FieldCore, _dom: &dyn DomPort) -> Result<String, FormError> {
        let mut html = Markup::new();
        html.raw("<div class=\"input-group mb-3\"")?;
        html.attr("id", &field.ids.block)?;
        html.attr("edit-id", &field.ids.edit_control)?;
        html.raw("><input")?;
        html.attr("type", Self::input_type(field))?;
        html.attr("id", &field.ids.edit_control)?;
        field.attributes.attach(&mut html, Mode::Edit, TEXT_OWNED)?;
        html.attr("value", field.value_str())?;
        html.raw(" /><div class=\"input-group-append\">")?;
        field.commit_buttons(&mut html, "btn btn-outline-secondary", true)?;
        html.raw("</div></div>")?;
        Ok(html.finish())
    }
}
