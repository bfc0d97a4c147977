use crate::constants::*;
use crate::dom;
use crate::events::{listen, Listener};
use crate::http::FetchTransport;
use folio_core::contact::{ContactForm, ContactStatus, CONFIRMATION_SEC};
use folio_core::relay::{submit_contact, RelayConfig};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

struct Ctx {
    document: web::Document,
    cfg: RelayConfig,
    form: RefCell<ContactForm>,
    epoch: Instant,
}

impl Ctx {
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }

    fn read_fields(&self) {
        let d = &self.document;
        let mut f = self.form.borrow_mut();
        f.name = dom::input_value(d, CONTACT_NAME_ID);
        f.email = dom::input_value(d, CONTACT_EMAIL_ID);
        f.subject = dom::input_value(d, CONTACT_SUBJECT_ID);
        f.message = dom::input_value(d, CONTACT_MESSAGE_ID);
    }

    fn write_fields(&self) {
        let d = &self.document;
        let f = self.form.borrow();
        dom::set_input_value(d, CONTACT_NAME_ID, &f.name);
        dom::set_input_value(d, CONTACT_EMAIL_ID, &f.email);
        dom::set_input_value(d, CONTACT_SUBJECT_ID, &f.subject);
        dom::set_input_value(d, CONTACT_MESSAGE_ID, &f.message);
    }
}

pub fn wire(document: &web::Document, cfg: RelayConfig) -> Option<Listener> {
    let form_el = document.get_element_by_id(CONTACT_FORM_ID)?;
    let ctx = Rc::new(Ctx {
        document: document.clone(),
        cfg,
        form: RefCell::new(ContactForm::default()),
        epoch: Instant::now(),
    });
    render_status(&ctx);
    listen(&form_el, "submit", move |ev: web::Event| {
        ev.prevent_default();
        ctx.read_fields();
        let req = ctx.form.borrow_mut().begin_submit();
        render_status(&ctx);
        let Some(req) = req else { return };
        let ctx = ctx.clone();
        spawn_local(async move {
            let result = submit_contact(&FetchTransport, &ctx.cfg, &req).await;
            ctx.form.borrow_mut().finish_submit(result, ctx.now());
            ctx.write_fields();
            render_status(&ctx);
            if matches!(ctx.form.borrow().status(), ContactStatus::Sent(_)) {
                schedule_clear(ctx.clone());
            }
        });
    })
}

fn schedule_clear(ctx: Rc<Ctx>) {
    let Some(w) = web::window() else { return };
    let cb = Closure::once_into_js(move || {
        ctx.form.borrow_mut().tick(ctx.now());
        render_status(&ctx);
    });
    let ms = (CONFIRMATION_SEC * 1000.0) as i32;
    if let Err(e) = w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), ms) {
        log::warn!("[contact] timer: {:?}", e);
    }
}

fn render_status(ctx: &Ctx) {
    let d = &ctx.document;
    let Some(el) = d.get_element_by_id(CONTACT_STATUS_ID) else {
        return;
    };
    let form = ctx.form.borrow();
    let (text, class) = match form.status() {
        ContactStatus::Idle => ("", ""),
        ContactStatus::Sending => ("Sending…", "sending"),
        ContactStatus::Sent(msg) => (msg.as_str(), "sent"),
        ContactStatus::Failed(msg) => (msg.as_str(), "failed"),
    };
    el.set_text_content(Some(text));
    el.set_class_name(class);
    dom::set_hidden(&el, text.is_empty());
    if let Some(btn) = d
        .get_element_by_id(CONTACT_FORM_ID)
        .and_then(|f| f.query_selector("button[type=submit]").ok().flatten())
    {
        if matches!(form.status(), ContactStatus::Sending) {
            _ = btn.set_attribute("disabled", "");
        } else {
            _ = btn.remove_attribute("disabled");
        }
    }
}
