use std::cell::RefCell;
use std::rc::Rc;

use gloo_events::EventListener;
use weaver_form_core::{Form, FormError, FormOptions};

use crate::dom::BrowserDom;
use crate::events::delegate_actions;
use crate::submit::reroute_submit;
use crate::widget::{UploadWidget, disable_auto_discover};

/// A form mounted on the page.
///
/// Dropping it detaches every listener and upload callback; the rendered
/// markup stays where it is.
pub struct MountedForm {
    form: Rc<RefCell<Form>>,
    dom: BrowserDom,
    _listeners: Vec<EventListener>,
    widgets: Vec<UploadWidget>,
}

impl MountedForm {
    pub fn form(&self) -> &Rc<RefCell<Form>> {
        &self.form
    }

    pub fn dom(&self) -> &BrowserDom {
        &self.dom
    }

    pub fn widgets(&self) -> &[UploadWidget] {
        &self.widgets
    }
}

/// Discover and render every field on the page, then wire up actions,
/// upload widgets and submit rerouting.
pub fn mount_form(dom: BrowserDom, options: &FormOptions) -> Result<MountedForm, FormError> {
    let mut page = dom.clone();
    let mut form = Form::discover(&mut page, options)?;
    form.render_all(&mut page)?;

    let form = Rc::new(RefCell::new(form));
    let mut listeners = vec![delegate_actions(&dom, form.clone())];

    let bridges = form.borrow().upload_bridges().to_vec();
    let mut widgets = Vec::with_capacity(bridges.len());
    if !bridges.is_empty() {
        disable_auto_discover()?;
    }
    for bridge in &bridges {
        widgets.push(UploadWidget::attach(
            bridge,
            &options.modal_backdrop,
            &dom,
            form.clone(),
        )?);
    }

    if options.reroute_submit {
        listeners.extend(reroute_submit(&dom, &options.form_selector)?);
    }

    tracing::debug!(
        fields = form.borrow().fields().count(),
        uploads = widgets.len(),
        "form mounted"
    );
    Ok(MountedForm {
        form,
        dom,
        _listeners: listeners,
        widgets,
    })
}
