//! User actions on rendered fields.
//!
//! Every button the renderers emit carries `editjs-action` (what to do) and
//! `editjs-id` (the control block it belongs to). The browser layer turns a
//! click into a `FormAction` and hands it to [`Form::dispatch`].
//!
//! [`Form::dispatch`]: crate::Form::dispatch

use std::fmt;

/// Attribute naming the action a button triggers.
pub const ACTION_ATTRIBUTE: &str = "editjs-action";
/// Attribute naming the control block a button belongs to.
pub const TARGET_ATTRIBUTE: &str = "editjs-id";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    /// Swap the view rendering for the edit rendering.
    Edit,
    /// Commit the live edit control's value and return to view.
    Update,
    /// Return to view without committing.
    Cancel,
}

impl ActionKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "edit" => Some(Self::Edit),
            "update" => Some(Self::Update),
            "cancel" => Some(Self::Cancel),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Edit => "edit",
            Self::Update => "update",
            Self::Cancel => "cancel",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An action aimed at one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormAction {
    pub kind: ActionKind,
    pub block_id: String,
}

impl FormAction {
    pub fn new(kind: ActionKind, block_id: impl Into<String>) -> Self {
        Self {
            kind,
            block_id: block_id.into(),
        }
    }

    /// Build an action from a button's `editjs-action` and `editjs-id` values.
    pub fn from_attributes(action: &str, block_id: &str) -> Option<Self> {
        let kind = ActionKind::parse(action)?;
        if block_id.is_empty() {
            return None;
        }
        Some(Self::new(kind, block_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_actions() {
        assert_eq!(ActionKind::parse("edit"), Some(ActionKind::Edit));
        assert_eq!(ActionKind::parse(" Update "), Some(ActionKind::Update));
        assert_eq!(ActionKind::parse("CANCEL"), Some(ActionKind::Cancel));
        assert_eq!(ActionKind::parse("delete"), None);
    }

    #[test]
    fn test_from_attributes_requires_a_target() {
        assert_eq!(
            FormAction::from_attributes("edit", "editjs_name"),
            Some(FormAction::new(ActionKind::Edit, "editjs_name"))
        );
        assert_eq!(FormAction::from_attributes("edit", ""), None);
        assert_eq!(FormAction::from_attributes("open", "editjs_name"), None);
    }
}
