use super::{listen, Listener};
use crate::dom;
use crate::input::speed_command;
use folio_core::{InputEvent, InputQueue};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

pub fn wire_speed_keys(queue: Rc<RefCell<InputQueue>>) -> Option<Listener> {
    let window = web::window()?;
    listen(&window, "keydown", move |ev: web::KeyboardEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
            return;
        }
        let typing = dom::window_document()
            .map(|d| dom::text_field_focused(&d))
            .unwrap_or(false);
        if let Some(cmd) = speed_command(&ev.key(), typing) {
            queue.borrow_mut().push(InputEvent::Key(cmd));
        }
    })
}
