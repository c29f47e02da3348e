//! Browser DOM layer for weaver forms.
//!
//! This crate connects a `weaver-form-core` `Form` to a live page. It
//! assumes a `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `dom`: `BrowserDom`, the `DomPort` implementation over web-sys
//! - `events`: document-level click delegation for field buttons
//! - `widget`: upload modal and drag-and-drop widget bindings
//! - `submit`: submit-button rerouting
//! - `mount`: `mount_form`, which wires all of the above together
//!
//! # Re-exports
//!
//! This crate re-exports `weaver-form-core` for convenience, so consumers
//! only need to depend on `weaver-form-browser`.

pub use weaver_form_core;
pub use weaver_form_core::*;

pub mod dom;
pub mod events;
pub mod mount;
pub mod submit;
pub mod widget;

pub use dom::{BrowserDom, dom_error};
pub use events::{action_for_event, action_for_target, delegate_actions};
pub use mount::{MountedForm, mount_form};
pub use submit::{prepare_inputs, reroute_submit};
pub use widget::UploadWidget;
