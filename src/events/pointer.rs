use super::{listen, Listener};
use crate::input;
use folio_core::{InputEvent, InputQueue};
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
pub struct PointerWiring {
    pub canvas: web::HtmlCanvasElement,
    pub queue: Rc<RefCell<InputQueue>>,
}

/// Move/down/up listen on the window so drags survive leaving the canvas.
/// Clicks count only when they land on the canvas' box.
pub fn wire_pointer(w: &PointerWiring) -> Vec<Listener> {
    let Some(window) = web::window() else {
        return Vec::new();
    };
    let mut out = Vec::new();
    out.extend(wire_pointer_kind(&window, w, "pointermove", InputEvent::PointerMove));
    out.extend(wire_pointer_kind(&window, w, "pointerdown", InputEvent::PointerDown));
    out.extend(wire_pointer_kind(&window, w, "pointerup", InputEvent::PointerUp));
    out.extend(wire_click_kind(&window, w, "click", InputEvent::Click));
    out.extend(wire_click_kind(&window, w, "dblclick", InputEvent::DoubleClick));

    let queue = w.queue.clone();
    if let Some(root) = web::window()
        .and_then(|win| win.document())
        .and_then(|d| d.document_element())
    {
        out.extend(Listener::listen_raw(&root, "mouseleave", move |_| {
            queue.borrow_mut().push(InputEvent::PointerLeave);
        }));
    }
    let queue = w.queue.clone();
    out.extend(Listener::listen_raw(&window, "pointercancel", move |_| {
        queue.borrow_mut().push(InputEvent::PointerLeave);
    }));
    out
}

fn wire_pointer_kind(
    window: &web::Window,
    w: &PointerWiring,
    kind: &'static str,
    make: fn(Vec2) -> InputEvent,
) -> Option<Listener> {
    let w = w.clone();
    listen(window, kind, move |ev: web::PointerEvent| {
        if !w.canvas.is_connected() {
            return;
        }
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        w.queue.borrow_mut().push(make(pos));
    })
}

fn wire_click_kind(
    window: &web::Window,
    w: &PointerWiring,
    kind: &'static str,
    make: fn(Vec2) -> InputEvent,
) -> Option<Listener> {
    let w = w.clone();
    listen(window, kind, move |ev: web::MouseEvent| {
        let pos = input::pointer_canvas_px(&ev, &w.canvas);
        let rect = w.canvas.get_bounding_client_rect();
        if input::inside(pos, Vec2::new(rect.width() as f32, rect.height() as f32)) {
            w.queue.borrow_mut().push(make(pos));
        }
    })
}

/// Buttons marked `data-system-hack` fire the glitch effect's hack.
pub fn wire_hack_buttons(document: &web::Document, w: &PointerWiring) -> Vec<Listener> {
    let mut out = Vec::new();
    let Ok(list) = document.query_selector_all(&format!("[{}]", crate::constants::HACK_BUTTON_ATTR))
    else {
        return out;
    };
    for i in 0..list.length() {
        if let Some(node) = list.item(i) {
            let w = w.clone();
            out.extend(Listener::listen_raw(&node, "click", move |_| {
                let rect = w.canvas.get_bounding_client_rect();
                let center = Vec2::new(rect.width() as f32, rect.height() as f32) * 0.5;
                w.queue.borrow_mut().push(InputEvent::DoubleClick(center));
            }));
        }
    }
    out
}
