use crate::attributes::Mode;
use crate::dom::{DomPort, OptionEntry, OptionItem};
use crate::html::Markup;
use crate::FormError;

use super::{FieldCore, FieldRenderer};

/// Attributes the select renderer writes itself.
const SELECT_OWNED: &[&str] = &["multiple"];

/// Dropdown over the field's `list` source, with optional option groups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectEditor;

impl SelectEditor {
    /// Whether the field currently carries `allow-multiple="true"`.
    pub fn allow_multiple(field: &FieldCore) -> bool {
        field.attributes.common("allow-multiple") == Some("true")
    }

    /// Whether `value` is selected given the field's current value.
    ///
    /// Multi-selects keep their selection as a comma-separated list.
    pub fn is_selected(field: &FieldCore, value: &str) -> bool {
        match field.value.as_deref() {
            None => false,
            Some(current) if Self::allow_multiple(field) => current.split(',').any(|v| v == value),
            Some(current) => current == value,
        }
    }

    fn write_option(&self, html: &mut Markup, field: &FieldCore, item: &OptionItem) -> Result<(), FormError> {
        html.raw("<option")?;
        html.attr("value", &item.value)?;
        if Self::is_selected(field, &item.value) {
            html.flag("selected")?;
        }
        html.raw(">")?;
        html.text(&item.label)?;
        html.raw("</option>")?;
        Ok(())
    }

    fn render(&self, field: &FieldCore, dom: &dyn DomPort, mode: Mode) -> Result<String, FormError> {
        let options = field.options(dom)?;
        let control_id = match mode {
            Mode::View => &field.ids.view_control,
            Mode::Edit => &field.ids.edit_control,
        };

        let mut html = Markup::new();
        html.raw("<div class=\"input-group mb-2\"")?;
        html.attr("id", &field.ids.block)?;
        if mode == Mode::Edit {
            html.attr("edit-id", &field.ids.edit_control)?;
        }
        html.raw("><select")?;
        html.attr("id", control_id)?;
        if mode == Mode::View {
            html.flag("readonly")?;
            html.flag("disabled")?;
        }
        if Self::allow_multiple(field) {
            html.flag("multiple")?;
        }
        field.attributes.attach(&mut html, mode, SELECT_OWNED)?;
        html.raw(">")?;

        for entry in &options {
            match entry {
                OptionEntry::Group { label, items } => {
                    html.raw("<optgroup")?;
                    html.attr("label", label)?;
                    html.raw(">")?;
                    for item in items {
                        self.write_option(&mut html, field, item)?;
                    }
                    html.raw("</optgroup>")?;
                }
                OptionEntry::Item(item) => self.write_option(&mut html, field, item)?,
            }
        }

        html.raw("</select><div class=\"input-group-append\">")?;
        match mode {
            Mode::View => field.edit_button(&mut html, "ml-3 btn btn-sm border-0", "")?,
            Mode::Edit => field.commit_buttons(&mut html, "ml-3 btn btn-outline-secondary", false)?,
        }
        html.raw("</div></div>")?;
        Ok(html.finish())
    }
}

impl FieldRenderer for SelectEditor {
    fn render_view(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError> {
        self.render(field, dom, Mode::View)
    }

    fn render_edit(&self, field: &FieldCore, dom: &dyn DomPort) -> Result<String, FormError> {
        self.render(field, dom, Mode::Edit)
    }
}
