use crate::attributes::{Bucket, Mode};
use crate::dom::DomPort;
use crate::html::{DEFAULT_CLASS, Markup};
use crate::FormError;

use super::{FieldCore, FieldRenderer};

/// Attributes the checkbox renderer writes itself.
const CHECKBOX_OWNED: &[&str] = &["type", "checked"];

/// Checkbox with a label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckboxEditor;

impl CheckboxEditor {
    /// Checked if the placeholder was natively checked or carries `checked="true"`.
    pub fn is_checked(field: &FieldCore) -> bool {
        field.native_checked || field.attributes.get(Bucket::Common, "checked") == Some("true")
    }

    fn render(&self, field: &FieldCore, mode: Mode) -> Result<String, FormError> {
        let control_id = match mode {
            Mode::View => &field.ids.view_control,
            Mode::Edit => &field.ids.edit_control,
        };

        let mut html = Markup::new();
        html.raw("<div class=\"input-group form-control border-0 mb-3\"")?;
        html.attr("id", &field.ids.block)?;
        if mode == Mode::Edit {
            html.attr("edit-id", &field.ids.edit_control)?;
        }
        html.raw("><div class=\"form-check\"><input")?;
        html.attr("id", control_id)?;
        html.raw(" type=\"checkbox\"")?;
        if mode == Mode::View {
            html.flag("readonly")?;
            html.flag("disabled")?;
        }
        field.attributes.attach_with(&mut html, mode, CHECKBOX_OWNED, |classes| {
            classes.replace(DEFAULT_CLASS, "form-check-input")
        })?;
        if Self::is_checked(field) {
            html.flag("checked")?;
        }
        html.attr("value", field.value_str())?;
        html.raw(" /><label class=\"form-check-label\"")?;
        html.attr("for", control_id)?;
        html.raw(">")?;
        html.text(field.attributes.common("label").unwrap_or_default())?;
        html.raw("</label></div><div class=\"input-group-append\">")?;
        match mode {
            Mode::View => field.edit_button(&mut html, "ml-3 btn btn-sm border-0", "")?,
            Mode::Edit => field.commit_buttons(&mut html, "ml-3 btn btn-outline-secondary", false)?,
        }
        html.raw("</div></div>")?;
        Ok(html.finish())
    }
}

impl FieldRenderer for CheckboxEditor {
    fn render_view(&self, field: &FieldCore, _dom: &dyn DomPort) -> Result<String, FormError> {
        self.render(field, Mode::View)
    }

    fn render_edit(&self, field: &FieldCore, _dom: &dyn DomPort) -> Result<String, FormError> {
        self.render(field, Mode::Edit)
    }
}
