//! Attribute classification for placeholder elements.
//!
//! A placeholder describes a field once; its attributes are split into the
//! ones that only apply to the view rendering (`view-*`), the ones that only
//! apply to the edit rendering (`edit-*`) and the ones shared by both. Two
//! names are reserved: `value` seeds the field's current value and `editor`
//! picks the control kind.

use smol_str::{SmolStr, StrExt};

/// Attribute carrying the field's initial value.
pub const VALUE_ATTRIBUTE: &str = "value";
/// Attribute selecting the editor kind.
pub const EDITOR_ATTRIBUTE: &str = "editor";
/// Value that marks a unary attribute as switched off.
pub const FALSE_SENTINEL: &str = "false";

const VIEW_PREFIX: &str = "view-";
const EDIT_PREFIX: &str = "edit-";

/// A single `name="value"` pair.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Attribute {
    pub name: SmolStr,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<SmolStr>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

impl<N: Into<SmolStr>, V: Into<String>> From<(N, V)> for Attribute {
    fn from((name, value): (N, V)) -> Self {
        Self::new(name, value)
    }
}

/// Which rendering an attribute is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    View,
    Edit,
    Common,
}

impl Bucket {
    /// Route an attribute name by its prefix.
    ///
    /// Returns the bucket and the lowercased name with the prefix removed.
    pub fn route(name: &str) -> (Bucket, SmolStr) {
        if let Some(rest) = name.strip_prefix(EDIT_PREFIX) {
            (Bucket::Edit, rest.to_lowercase_smolstr())
        } else if let Some(rest) = name.strip_prefix(VIEW_PREFIX) {
            (Bucket::View, rest.to_lowercase_smolstr())
        } else {
            (Bucket::Common, name.to_lowercase_smolstr())
        }
    }
}

/// Whether `name` can be written as an attribute name.
///
/// The name must be non-empty once its `view-`/`edit-` prefix is removed and
/// must not contain whitespace, quotes, `<`, `>`, `/` or `=`.
pub fn is_valid_attribute_name(name: &str) -> bool {
    let rest = name
        .strip_prefix(EDIT_PREFIX)
        .or_else(|| name.strip_prefix(VIEW_PREFIX))
        .unwrap_or(name);
    !rest.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '<' | '>' | '/' | '='))
}

/// Render mode of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    View,
    Edit,
}

impl Mode {
    pub fn bucket(self) -> Bucket {
        match self {
            Mode::View => Bucket::View,
            Mode::Edit => Bucket::Edit,
        }
    }
}

/// Whether a unary attribute value counts as present.
pub fn is_switched_on(value: &str) -> bool {
    value != FALSE_SENTINEL
}

/// A placeholder's attributes, partitioned by rendering.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct ClassifiedAttributes {
    pub view: Vec<Attribute>,
    pub edit: Vec<Attribute>,
    pub common: Vec<Attribute>,
    /// Every kept attribute with its full lowercased name.
    pub original: Vec<Attribute>,
    pub current_value: Option<String>,
    pub editor: Option<SmolStr>,
}

impl ClassifiedAttributes {
    pub fn classify<I, A>(attributes: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Attribute>,
    {
        let mut classified = Self::default();

        for attribute in attributes {
            let Attribute { name, value } = attribute.into();

            if name == VALUE_ATTRIBUTE {
                classified.current_value = Some(value);
                continue;
            }
            if name == EDITOR_ATTRIBUTE {
                classified.editor = Some(SmolStr::new(value));
                continue;
            }
            if value.is_empty() || value == FALSE_SENTINEL {
                continue;
            }

            let (bucket, routed) = Bucket::route(&name);
            classified
                .bucket_mut(bucket)
                .push(Attribute::new(routed, value.clone()));
            classified
                .original
                .push(Attribute::new(name.to_lowercase_smolstr(), value));
        }

        classified
    }

    pub fn bucket(&self, bucket: Bucket) -> &[Attribute] {
        match bucket {
            Bucket::View => &self.view,
            Bucket::Edit => &self.edit,
            Bucket::Common => &self.common,
        }
    }

    fn bucket_mut(&mut self, bucket: Bucket) -> &mut Vec<Attribute> {
        match bucket {
            Bucket::View => &mut self.view,
            Bucket::Edit => &mut self.edit,
            Bucket::Common => &mut self.common,
        }
    }

    /// Look up an attribute value in one bucket.
    pub fn get(&self, bucket: Bucket, name: &str) -> Option<&str> {
        self.bucket(bucket)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Shorthand for a common-bucket lookup that treats empty values as absent.
    pub fn common(&self, name: &str) -> Option<&str> {
        self.get(Bucket::Common, name).filter(|v| !v.is_empty())
    }

    /// Overwrite every same-named entry, or append one if none exists.
    pub fn set(&mut self, bucket: Bucket, name: &str, value: impl Into<String>) {
        let value = value.into();
        let entries = self.bucket_mut(bucket);
        let mut found = false;
        for entry in entries.iter_mut().filter(|a| a.name == name) {
            entry.value.clone_from(&value);
            found = true;
        }
        if !found {
            entries.push(Attribute::new(name.to_lowercase_smolstr(), value));
        }
    }

    /// Route a possibly-prefixed attribute name and set it.
    pub fn set_routed(&mut self, name: &str, value: impl Into<String>) {
        let (bucket, routed) = Bucket::route(name);
        self.set(bucket, &routed, value);
    }

    /// The attributes a rendering in `mode` carries: its own bucket, then common.
    pub fn for_mode(&self, mode: Mode) -> impl Iterator<Item = &Attribute> {
        self.bucket(mode.bucket()).iter().chain(self.common.iter())
    }
}
