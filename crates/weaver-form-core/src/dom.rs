//! Page abstraction for the form controller.
//!
//! Rendering itself is pure, but a few operations need to look at the page:
//! discovering placeholders, reading whichever control is live for a field,
//! reading option lists for radio and select fields, and swapping a field's
//! markup in. `DomPort` is that surface. The browser crate implements it over
//! web-sys; `MemoryDom` implements it in memory for tests and non-browser hosts.

use std::collections::HashMap;

use smol_str::SmolStr;

use crate::attributes::Attribute;
use crate::FormError;

/// A placeholder element found on the page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Placeholder {
    pub id: String,
    pub attributes: Vec<Attribute>,
    /// The element's native `checked` flag.
    pub checked: bool,
}

impl Placeholder {
    pub fn new<I, A>(id: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        Self {
            id: id.into(),
            attributes: attributes.into_iter().map(Into::into).collect(),
            checked: false,
        }
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }
}

/// What a live control looks like at the moment it is read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementSnapshot {
    pub id: String,
    /// Lowercase tag name.
    pub tag: SmolStr,
    /// Attributes as written in markup, `class` included.
    pub attributes: Vec<Attribute>,
    /// The control's live value property.
    pub value: Option<String>,
    /// The control's live checked property.
    pub checked: bool,
    /// Values of selected options, for `<select>` elements.
    pub selected: Vec<String>,
}

impl ElementSnapshot {
    pub fn new(id: impl Into<String>, tag: impl Into<SmolStr>) -> Self {
        Self {
            id: id.into(),
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attribute(mut self, name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = checked;
        self
    }

    pub fn with_selected<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }
}

/// A single `<option>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// A child of an options source: a flat option or a labelled group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionEntry {
    Item(OptionItem),
    Group { label: String, items: Vec<OptionItem> },
}

/// Every option of a source in document order, groups flattened.
pub fn flatten_options(entries: &[OptionEntry]) -> impl Iterator<Item = &OptionItem> {
    entries.iter().flat_map(|entry| match entry {
        OptionEntry::Item(item) => std::slice::from_ref(item).iter(),
        OptionEntry::Group { items, .. } => items.iter(),
    })
}

/// The page as seen by the form controller.
pub trait DomPort {
    /// Every element with the given tag, in document order.
    fn placeholders(&self, tag: &str) -> Vec<Placeholder>;

    /// Snapshot of the element with `id`, if it is on the page.
    fn element(&self, id: &str) -> Option<ElementSnapshot>;

    /// Children of the options-source element with `id`.
    fn options_source(&self, id: &str) -> Option<Vec<OptionEntry>>;

    /// Replace the element with `id` (outer HTML) by `html`.
    fn replace_element(&mut self, id: &str, html: &str) -> Result<(), FormError>;
}

impl<T: DomPort + ?Sized> DomPort for &mut T {
    fn placeholders(&self, tag: &str) -> Vec<Placeholder> {
        (**self).placeholders(tag)
    }

    fn element(&self, id: &str) -> Option<ElementSnapshot> {
        (**self).element(id)
    }

    fn options_source(&self, id: &str) -> Option<Vec<OptionEntry>> {
        (**self).options_source(id)
    }

    fn replace_element(&mut self, id: &str, html: &str) -> Result<(), FormError> {
        (**self).replace_element(id, html)
    }
}

/// An in-memory page.
///
/// Markup written by the form is kept per element id. Live controls are
/// registered against the block that contains them and disappear when that
/// block is replaced, the way the real DOM drops them on `outerHTML` writes.
#[derive(Debug, Default)]
pub struct MemoryDom {
    placeholders: Vec<(SmolStr, Placeholder)>,
    option_sources: HashMap<String, Vec<OptionEntry>>,
    controls: HashMap<String, (String, ElementSnapshot)>,
    markup: HashMap<String, String>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a placeholder with the given tag.
    pub fn with_placeholder(mut self, tag: &str, placeholder: Placeholder) -> Self {
        self.placeholders.push((SmolStr::new(tag), placeholder));
        self
    }

    pub fn with_options(mut self, id: impl Into<String>, entries: Vec<OptionEntry>) -> Self {
        self.option_sources.insert(id.into(), entries);
        self
    }

    /// Register a live control inside the block `block_id`.
    pub fn set_control(&mut self, block_id: &str, control: ElementSnapshot) {
        self.controls
            .insert(control.id.clone(), (block_id.to_string(), control));
    }

    /// Last markup written for `id`.
    pub fn markup(&self, id: &str) -> Option<&str> {
        self.markup.get(id).map(String::as_str)
    }
}

impl DomPort for MemoryDom {
    fn placeholders(&self, tag: &str) -> Vec<Placeholder> {
        self.placeholders
            .iter()
            .filter(|(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|(_, p)| p.clone())
            .collect()
    }

    fn element(&self, id: &str) -> Option<ElementSnapshot> {
        self.controls.get(id).map(|(_, control)| control.clone())
    }

    fn options_source(&self, id: &str) -> Option<Vec<OptionEntry>> {
        self.option_sources.get(id).cloned()
    }

    fn replace_element(&mut self, id: &str, html: &str) -> Result<(), FormError> {
        let is_placeholder = self.placeholders.iter().any(|(_, p)| p.id == id);
        if !is_placeholder && !self.markup.contains_key(id) {
            return Err(FormError::Dom(format!("no element with id `{}`", id)));
        }
        self.placeholders.retain(|(_, p)| p.id != id);
        self.controls.retain(|_, (block, _)| block != id);
        self.markup.remove(id);

        let new_id = root_id(html).unwrap_or(id);
        self.markup.insert(new_id.to_string(), html.to_string());
        Ok(())
    }
}

/// The `id` of the first element in a fragment.
fn root_id(html: &str) -> Option<&str> {
    let open = &html[..html.find('>')?];
    let start = open.find(" id=\"")? + 5;
    let len = open[start..].find('"')?;
    Some(&open[start..start + len])
}
