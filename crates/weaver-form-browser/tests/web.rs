//! WASM browser tests for weaver-form-browser.
//!
//! Run with: `wasm-pack test --headless --firefox` or `--chrome`

use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use weaver_form_browser::{
    ActionKind, BrowserDom, DomPort, FormAction, FormOptions, Mode, OptionEntry, action_for_target,
    mount_form, prepare_inputs,
};

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

/// Replace the test page body with `html`.
fn page(html: &str) -> BrowserDom {
    let doc = document();
    doc.body().unwrap().set_inner_html(html);
    BrowserDom::new(doc)
}

fn options() -> FormOptions {
    FormOptions {
        reroute_submit: false,
        ..Default::default()
    }
}

fn click(id: &str) {
    document()
        .get_element_by_id(id)
        .unwrap()
        .dyn_into::<web_sys::HtmlElement>()
        .unwrap()
        .click();
}

fn input(id: &str) -> web_sys::HtmlInputElement {
    document()
        .get_element_by_id(id)
        .unwrap()
        .dyn_into()
        .unwrap()
}

// === BrowserDom ===

#[wasm_bindgen_test]
fn test_placeholders_carry_their_attributes() {
    let dom = page(r#"<editjs id="name" editor="text" value="Alice" View-Title="T"></editjs>"#);
    let found = dom.placeholders("editjs");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "name");
    assert_eq!(found[0].attribute("editor"), Some("text"));
    assert_eq!(found[0].attribute("view-title"), Some("T"));
}

#[wasm_bindgen_test]
fn test_options_source_reads_groups() {
    let dom = page(
        r#"<select id="sizes">
            <option value="s">Small</option>
            <optgroup label="Big"><option value="l">Large</option></optgroup>
        </select>"#,
    );
    let entries = dom.options_source("sizes").unwrap();
    assert_eq!(entries.len(), 2);
    match &entries[1] {
        OptionEntry::Group { label, items } => {
            assert_eq!(label, "Big");
            assert_eq!(items[0].value, "l");
            assert_eq!(items[0].label, "Large");
        }
        other => panic!("expected a group, got {:?}", other),
    }
    assert!(dom.options_source("missing").is_none());
}

#[wasm_bindgen_test]
fn test_element_snapshot_reads_live_values() {
    let dom = page(r#"<input id="box" type="checkbox" value="yes" class="a b">"#);
    input("box").set_checked(true);
    let snapshot = dom.element("box").unwrap();
    assert_eq!(snapshot.tag, "input");
    assert_eq!(snapshot.value.as_deref(), Some("yes"));
    assert!(snapshot.checked);
    assert_eq!(snapshot.attribute("class"), Some("a b"));
}

// === Events ===

#[wasm_bindgen_test]
fn test_action_for_nested_click_target() {
    page(
        r#"<button editjs-action="update" editjs-id="editjs_name"><i id="icon"></i></button>"#,
    );
    let icon = document().get_element_by_id("icon").unwrap();
    assert_eq!(
        action_for_target(&icon),
        Some(FormAction::new(ActionKind::Update, "editjs_name"))
    );
}

// === Mounting ===

#[wasm_bindgen_test]
fn test_edit_update_round_trip() {
    let dom = page(r#"<form mode="editjs"><editjs id="name" editor="text" value="Alice"></editjs></form>"#);
    let mounted = mount_form(dom, &options()).unwrap();
    assert_eq!(input("editjs_view_name").value(), "Alice");

    click("editjs_view_editbutton_name");
    assert_eq!(mounted.form().borrow().mode("editjs_name"), Some(Mode::Edit));

    input("editjs_edit_input_name").set_value("Bob");
    click("editjs_edit_updatebutton_name");

    assert_eq!(mounted.form().borrow().field("editjs_name").unwrap().value(), Some("Bob"));
    assert_eq!(input("editjs_view_name").value(), "Bob");
}

#[wasm_bindgen_test]
fn test_cancel_restores_view() {
    let dom = page(r#"<editjs id="name" editor="text" value="Alice"></editjs>"#);
    let _mounted = mount_form(dom, &options()).unwrap();

    click("editjs_view_editbutton_name");
    input("editjs_edit_input_name").set_value("Bob");
    click("editjs_edit_cancelbutton_name");

    assert!(document().get_element_by_id("editjs_edit_input_name").is_none());
    assert_eq!(input("editjs_view_name").value(), "Alice");
}

#[wasm_bindgen_test]
fn test_prepare_inputs_names_generated_controls() {
    let dom = page(
        r#"<form mode="editjs"><editjs id="email" editor="text" value="a@b.c"></editjs><input id="csrf" name="csrf"></form>"#,
    );
    let mounted = mount_form(dom, &options()).unwrap();

    let named = prepare_inputs(mounted.dom(), "form[mode=editjs]").unwrap();
    assert_eq!(named, 1);
    let email = input("editjs_view_email");
    assert!(!email.disabled());
    assert_eq!(email.get_attribute("name").as_deref(), Some("email"));
    assert_eq!(input("csrf").get_attribute("name").as_deref(), Some("csrf"));
}
