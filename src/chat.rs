use crate::constants::*;
use crate::dom;
use crate::events::{listen, Listener};
use crate::http::FetchTransport;
use crate::voice;
use folio_core::chat::{ChatSession, Role};
use folio_core::relay::{send_chat, submit_contact, RelayConfig};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

const REPLY_ATTR: &str = "data-reply";

struct Ctx {
    document: web::Document,
    cfg: RelayConfig,
    session: RefCell<ChatSession>,
}

/// Wires the chat widget if the page has one. The returned listeners keep
/// it alive.
pub fn wire(document: &web::Document, cfg: RelayConfig) -> Vec<Listener> {
    let mut out = Vec::new();
    let Some(form) = document.get_element_by_id(CHAT_FORM_ID) else {
        return out;
    };
    let ctx = Rc::new(Ctx {
        document: document.clone(),
        cfg,
        session: RefCell::new(ChatSession::new()),
    });
    render(&ctx);

    {
        let ctx = ctx.clone();
        out.extend(listen(&form, "submit", move |ev: web::Event| {
            ev.prevent_default();
            let text = dom::input_value(&ctx.document, CHAT_INPUT_ID);
            dom::set_input_value(&ctx.document, CHAT_INPUT_ID, "");
            send(ctx.clone(), &text);
        }));
    }

    // quick replies are re-rendered with the log; listen once on the log
    if let Some(log_el) = document.get_element_by_id(CHAT_LOG_ID) {
        let ctx = ctx.clone();
        out.extend(listen(&log_el, "click", move |ev: web::MouseEvent| {
            let reply = ev
                .target()
                .and_then(|t| t.dyn_into::<web::Element>().ok())
                .and_then(|el| el.get_attribute(REPLY_ATTR));
            if let Some(text) = reply {
                send(ctx.clone(), &text);
            }
        }));
    }

    if let Some(lead) = document.get_element_by_id(LEAD_FORM_ID) {
        let ctx = ctx.clone();
        out.extend(listen(&lead, "submit", move |ev: web::Event| {
            ev.prevent_default();
            capture_lead(ctx.clone());
        }));
    }

    if let Some(btn) = document.get_element_by_id(LEAD_DISMISS_ID) {
        let ctx = ctx.clone();
        out.extend(listen(&btn, "click", move |_: web::Event| {
            ctx.session.borrow_mut().dismiss_lead_form();
            render(&ctx);
        }));
    }

    if let Some(btn) = document.get_element_by_id(CHAT_SPEAK_ID) {
        let ctx = ctx.clone();
        out.extend(listen(&btn, "click", move |_: web::Event| {
            let on = {
                let mut s = ctx.session.borrow_mut();
                s.speak_replies = !s.speak_replies;
                s.speak_replies
            };
            if !on {
                voice::stop_speaking();
            }
            render(&ctx);
        }));
    }

    if let Some(btn) = document.get_element_by_id(CHAT_MIC_ID) {
        if voice::dictation_available() {
            let ctx = ctx.clone();
            out.extend(listen(&btn, "click", move |_: web::Event| {
                let ctx2 = ctx.clone();
                let started = voice::dictate(move |text| {
                    dom::set_input_value(&ctx2.document, CHAT_INPUT_ID, &text);
                    send(ctx2.clone(), &text);
                });
                if let Err(e) = started {
                    log::warn!("[voice] {:?}", e);
                }
            }));
        } else {
            _ = btn.set_attribute("disabled", "");
            _ = btn.set_attribute("title", voice::NO_DICTATION);
        }
    }

    log::info!("[chat] ready, relay {}", ctx.cfg.chat_url());
    out
}

fn send(ctx: Rc<Ctx>, text: &str) {
    let Some(msg) = ctx.session.borrow_mut().begin_send(text) else {
        return;
    };
    render(&ctx);
    spawn_local(async move {
        let result = send_chat(&FetchTransport, &ctx.cfg, &msg).await;
        let spoken = {
            let mut s = ctx.session.borrow_mut();
            let speak = s.speak_replies;
            let reply = s.finish_send(result);
            speak.then(|| reply.content.clone())
        };
        render(&ctx);
        if let Some(text) = spoken {
            voice::speak(&text);
        }
    });
}

fn capture_lead(ctx: Rc<Ctx>) {
    let name = dom::input_value(&ctx.document, LEAD_NAME_ID);
    let email = dom::input_value(&ctx.document, LEAD_EMAIL_ID);
    let req = match ctx.session.borrow().lead_request(&name, &email) {
        Ok(r) => r,
        Err(e) => {
            log::debug!("[chat] lead form incomplete: {}", e);
            return;
        }
    };
    spawn_local(async move {
        let result = submit_contact(&FetchTransport, &ctx.cfg, &req).await;
        let saved = ctx.session.borrow_mut().finish_lead(&name, result);
        if saved {
            dom::set_input_value(&ctx.document, LEAD_NAME_ID, "");
            dom::set_input_value(&ctx.document, LEAD_EMAIL_ID, "");
        }
        render(&ctx);
    });
}

fn render(ctx: &Ctx) {
    let doc = &ctx.document;
    let session = ctx.session.borrow();
    dom::set_hidden_by_id(doc, LEAD_FORM_ID, !session.lead_form_visible());
    if let Some(btn) = doc.get_element_by_id(CHAT_SPEAK_ID) {
        _ = btn.set_attribute("aria-pressed", if session.speak_replies { "true" } else { "false" });
    }
    if let Some(form) = doc.get_element_by_id(CHAT_FORM_ID) {
        _ = form.set_attribute("aria-busy", if session.loading() { "true" } else { "false" });
    }

    let Some(log_el) = doc.get_element_by_id(CHAT_LOG_ID) else {
        return;
    };
    log_el.set_text_content(None);
    let last = session.messages().len().saturating_sub(1);
    for (i, m) in session.messages().iter().enumerate() {
        let Ok(bubble) = doc.create_element("div") else {
            continue;
        };
        let role = match m.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        bubble.set_class_name(&format!("chat-msg {}", role));
        bubble.set_text_content(Some(&m.content));
        _ = log_el.append_child(&bubble);

        // only the newest reply offers shortcuts
        if i == last && !session.loading() {
            for q in &m.quick_replies {
                if let Ok(b) = doc.create_element("button") {
                    b.set_class_name("quick-reply");
                    _ = b.set_attribute("type", "button");
                    _ = b.set_attribute(REPLY_ATTR, q);
                    b.set_text_content(Some(q));
                    _ = log_el.append_child(&b);
                }
            }
        }
    }
    if session.loading() {
        if let Ok(dots) = doc.create_element("div") {
            dots.set_class_name("chat-msg assistant typing");
            dots.set_text_content(Some("…"));
            _ = log_el.append_child(&dots);
        }
    }
    log_el.set_scroll_top(log_el.scroll_height());
}
