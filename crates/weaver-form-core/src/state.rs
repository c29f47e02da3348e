//! Field state snapshots and the patch shape used to fold changes back in.
//!
//! `FieldState` is what a field exports: its current value, the four unary
//! properties, and the attributes and classes found on whichever control is
//! live. `StatePatch` is what a field imports. It is the same shape with every
//! key optional, so an exported state can be re-imported as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::FormError;

/// The unary flags tracked on every field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldProperties {
    #[serde(alias = "IsDisabled")]
    pub is_disabled: bool,
    #[serde(alias = "IsSelected")]
    pub is_selected: bool,
    #[serde(alias = "IsChecked")]
    pub is_checked: bool,
    #[serde(alias = "IsActive")]
    pub is_active: bool,
}

/// Name of the attribute backing each property, in import order.
pub const PROPERTY_ATTRIBUTES: [&str; 4] = ["active", "checked", "selected", "disabled"];

/// A snapshot of one field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldState {
    #[serde(alias = "Value")]
    pub value: Option<String>,
    #[serde(alias = "Properties", default)]
    pub properties: FieldProperties,
    #[serde(alias = "Attributes", default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(alias = "Classes", default)]
    pub classes: Vec<String>,
}

/// Property flags to write, each optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertiesPatch {
    #[serde(alias = "IsDisabled", skip_serializing_if = "Option::is_none")]
    pub is_disabled: Option<bool>,
    #[serde(alias = "IsSelected", skip_serializing_if = "Option::is_none")]
    pub is_selected: Option<bool>,
    #[serde(alias = "IsChecked", skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
    #[serde(alias = "IsActive", skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

impl PropertiesPatch {
    /// Flags present in the patch, paired with their attribute name.
    pub fn flags(&self) -> impl Iterator<Item = (&'static str, bool)> {
        [
            self.is_active,
            self.is_checked,
            self.is_selected,
            self.is_disabled,
        ]
        .into_iter()
        .zip(PROPERTY_ATTRIBUTES)
        .filter_map(|(flag, name)| flag.map(|on| (name, on)))
    }
}

impl From<FieldProperties> for PropertiesPatch {
    fn from(p: FieldProperties) -> Self {
        Self {
            is_disabled: Some(p.is_disabled),
            is_selected: Some(p.is_selected),
            is_checked: Some(p.is_checked),
            is_active: Some(p.is_active),
        }
    }
}

/// A value as it arrives from the page: text, or a list from a multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    Text(String),
    List(Vec<String>),
}

impl PatchValue {
    pub fn into_text(self) -> String {
        match self {
            PatchValue::Text(s) => s,
            PatchValue::List(items) => items.join(","),
        }
    }
}

/// Partial state to import into a field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatePatch {
    /// `None` leaves the value alone, `Some(None)` clears it.
    #[serde(
        alias = "Value",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Option<Option<PatchValue>>,
    #[serde(alias = "Properties", default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertiesPatch>,
    #[serde(alias = "Attributes", default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<BTreeMap<String, String>>,
}

/// Distinguishes an explicit `null` from a missing key.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl StatePatch {
    /// A patch that only replaces the value.
    pub fn value(value: impl Into<String>) -> Self {
        Self {
            value: Some(Some(PatchValue::Text(value.into()))),
            ..Default::default()
        }
    }

    pub fn with_properties(mut self, properties: PropertiesPatch) -> Self {
        self.properties = Some(properties);
        self
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Parse a patch from loosely-typed JSON, checking its shape.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, FormError> {
        if !value.is_object() {
            return Err(FormError::format("state must be an object"));
        }
        Ok(Self::deserialize(value)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, FormError> {
        let value: serde_json::Value = serde_json::from_str(s)?;
        Self::from_json(&value)
    }
}

impl From<FieldState> for StatePatch {
    fn from(state: FieldState) -> Self {
        Self {
            value: Some(state.value.map(PatchValue::Text)),
            properties: Some(state.properties.into()),
            attributes: Some(state.attributes),
        }
    }
}
