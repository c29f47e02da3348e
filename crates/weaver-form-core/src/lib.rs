//! weaver-form-core: field state and rendering for declarative edit-in-place forms.
//!
//! This crate provides:
//! - `ClassifiedAttributes` - placeholder attributes split into view/edit/common
//! - `Field` with one `Editor` variant per control kind, rendering view and edit markup
//! - `FieldState` / `StatePatch` - exported snapshots and the import shape
//! - `Form` - the controller driven by `FormAction`s
//! - `DomPort` - the page surface, with `MemoryDom` for tests and non-browser hosts
//!
//! Nothing here touches a real browser; see `weaver-form-browser` for that.

pub mod actions;
pub mod attributes;
pub mod bridge;
pub mod dom;
pub mod error;
pub mod field;
pub mod form;
pub mod html;
pub mod options;
pub mod state;

pub use actions::{ACTION_ATTRIBUTE, ActionKind, FormAction, TARGET_ATTRIBUTE};
pub use attributes::{Attribute, Bucket, ClassifiedAttributes, Mode, is_valid_attribute_name};
pub use bridge::{ModalOptions, UploadBridge, WidgetOptions, upload_payload};
pub use dom::{DomPort, ElementSnapshot, MemoryDom, OptionEntry, OptionItem, Placeholder};
pub use error::FormError;
pub use field::{
    Editor, EditorKind, Field, FieldCore, FieldIds, FieldRenderer, ID_PREFIX, UploadKind,
    block_id, submit_name,
};
pub use form::Form;
pub use options::FormOptions;
pub use smol_str::SmolStr;
pub use state::{FieldProperties, FieldState, PatchValue, PropertiesPatch, StatePatch};
