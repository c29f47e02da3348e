//! `DomPort` over the live document.

use smol_str::{SmolStr, StrExt};
use wasm_bindgen::{JsCast, JsValue};
use weaver_form_core::{
    Attribute, DomPort, ElementSnapshot, FormError, OptionEntry, OptionItem, Placeholder,
};

/// Map a JS exception into a form error.
pub fn dom_error(err: JsValue) -> FormError {
    FormError::Dom(err.as_string().unwrap_or_else(|| format!("{:?}", err)))
}

/// The page the form lives on.
#[derive(Debug, Clone)]
pub struct BrowserDom {
    document: web_sys::Document,
}

impl BrowserDom {
    pub fn new(document: web_sys::Document) -> Self {
        Self { document }
    }

    /// The current window's document.
    pub fn from_window() -> Result<Self, FormError> {
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| FormError::Dom("no document available".to_string()))?;
        Ok(Self::new(document))
    }

    pub fn document(&self) -> &web_sys::Document {
        &self.document
    }
}

/// Every attribute on an element, in source order.
fn attributes(element: &web_sys::Element) -> Vec<Attribute> {
    element
        .get_attribute_names()
        .iter()
        .filter_map(|name| name.as_string())
        .map(|name| {
            let value = element.get_attribute(&name).unwrap_or_default();
            Attribute::new(name.to_lowercase_smolstr(), value)
        })
        .collect()
}

fn elements(collection: &web_sys::HtmlCollection) -> impl Iterator<Item = web_sys::Element> + '_ {
    (0..collection.length()).filter_map(|i| collection.item(i))
}

/// The live `checked` property, for elements that have one.
fn checked_property(element: &web_sys::Element) -> bool {
    js_sys::Reflect::get(element, &JsValue::from_str("checked"))
        .ok()
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn option_item(element: &web_sys::Element) -> Option<OptionItem> {
    let option = element.dyn_ref::<web_sys::HtmlOptionElement>()?;
    Some(OptionItem::new(option.value(), option.text()))
}

fn snapshot(element: &web_sys::Element) -> ElementSnapshot {
    let tag: SmolStr = element.tag_name().to_lowercase_smolstr();
    let mut snapshot = ElementSnapshot::new(element.id(), tag);
    snapshot.attributes = attributes(element);
    snapshot.checked = checked_property(element);

    if let Some(input) = element.dyn_ref::<web_sys::HtmlInputElement>() {
        snapshot.value = Some(input.value());
    } else if let Some(select) = element.dyn_ref::<web_sys::HtmlSelectElement>() {
        snapshot.value = Some(select.value());
        snapshot.selected = elements(&select.selected_options())
            .filter_map(|option| option_item(&option))
            .map(|option| option.value)
            .collect();
    } else if let Some(text) = element.dyn_ref::<web_sys::HtmlTextAreaElement>() {
        snapshot.value = Some(text.value());
    }
    snapshot
}

impl DomPort for BrowserDom {
    fn placeholders(&self, tag: &str) -> Vec<Placeholder> {
        let found = self.document.get_elements_by_tag_name(tag);
        elements(&found)
            .map(|element| Placeholder {
                id: element.id(),
                attributes: attributes(&element),
                checked: checked_property(&element),
            })
            .collect()
    }

    fn element(&self, id: &str) -> Option<ElementSnapshot> {
        self.document
            .get_element_by_id(id)
            .map(|element| snapshot(&element))
    }

    fn options_source(&self, id: &str) -> Option<Vec<OptionEntry>> {
        let source = self.document.get_element_by_id(id)?;
        let entries = elements(&source.children())
            .filter_map(|child| match child.tag_name().to_ascii_lowercase().as_str() {
                "optgroup" => Some(OptionEntry::Group {
                    label: child.get_attribute("label").unwrap_or_default(),
                    items: elements(&child.children())
                        .filter_map(|option| option_item(&option))
                        .collect(),
                }),
                "option" => option_item(&child).map(OptionEntry::Item),
                _ => None,
            })
            .collect();
        Some(entries)
    }

    fn replace_element(&mut self, id: &str, html: &str) -> Result<(), FormError> {
        let Some(element) = self.document.get_element_by_id(id) else {
            tracing::warn!(id, "element to replace is not on the page");
            return Err(FormError::Dom(format!("no element with id `{}`", id)));
        };
        element.set_outer_html(html);
        Ok(())
    }
}
