use crate::attributes::Mode;
use crate::dom::{DomPort, flatten_options};
use crate::html::{DEFAULT_CLASS, Markup};
use crate::FormError;

use super::{FieldCore, FieldRenderer};

/// Attributes the radio renderer writes itself.
const RADIO_OWNED: &[&str] = &["name", "type", "checked"];

/// One radio button per option of the field's `list` source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RadioEditor;

impl RadioEditor {
    /// Id of the radio input for option `index`.
    pub fn option_id(field: &FieldCore, mode: Mode, index: usize) -> String {
        match mode {
            Mode::View => format!("{}_{}", field.ids.view_control, index),
            Mode::Edit => format!("{}_{}", field.ids.edit_control, index),
        }
    }

    fn render(&self, field: &FieldCore, dom: &dyn DomPort, mode: Mode) -> Result<String, FormError> {
        let options = field.options(dom)?;

        let mut html = Markup::new();
        html.raw("<div class=\"table ml-3\"")?;
        html.attr("id", &field.ids.block)?;
        html.raw("><div class=\"row\">")?;

        for (index, option) in flatten_options(&options).enumerate() {
            let option_id = Self::option_id(field, mode, index);
            html.raw("<div class=\"col-sm\"><div class=\"form-check\"><input")?;
            html.attr("id", &option_id)?;
            html.attr("name", &field.ids.element)?;
            html.raw(" type=\"radio\"")?;
            if mode == Mode::View {
                html.flag("readonly")?;
                html.flag("disabled")?;
            }
            field.attributes.attach_with(&mut html, mode, RADIO_OWNED, |classes| {
                classes.replace(DEFAULT_CLASS, "form-check-input")
            })?;
            if field.value.as_deref() == Some(option.value.as_str()) {
                html.flag("checked")?;
            }
            html.attr("value", &option.value)?;
            html.raw(" /><label class=\"form-check-label\"")?;
            html.attr("for", &option_id)?;
            html.raw(">")?;
            html.text(&option.label)?;
            html.raw("</label></div><div class=\"input-group-append\"></div></div>")?;
        }

        html.raw("<div class=\"col-sm\">")?;
        match mode {
            Mode::View => field.edit_button(&mut html, "ml-3 btn btn-sm border-0", "")?,
            Mode::Edit => {
                html.raw("<div class=\"input-group-append\">")?;
                field.commit_buttons(&mut html, "ml-3 btn btn-outline-secondary", false)?;
                html.raw("</div>")?;
            }
        }
        html.raw("</div><div class=\"col-sm\">&nbsp;</div></div></div>")?;
        Ok(html.finish())
    }
}

impl FieldRenderer for RadioEditor {
    fn render_view(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError> {
        self.render(field, dom, Mode::View)
    }

    fn render_edit(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError> {
        self.render(field, dom, Mode::Edit)
    }
}
