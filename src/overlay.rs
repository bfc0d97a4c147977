use crate::constants::{HINT_HIDE_MS, HINT_ID};
use crate::dom;
use std::cell::Cell;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

thread_local! {
    static HIDE_TIMER: Cell<Option<i32>> = const { Cell::new(None) };
}

pub fn speed_text(speed: f32) -> String {
    format!("Speed: {:.1}x", speed)
}

pub fn update_hint(document: &web::Document, speed: f32) {
    if let Some(el) = document.get_element_by_id(HINT_ID) {
        el.set_text_content(Some(&speed_text(speed)));
    }
}

#[inline]
pub fn show_hint(document: &web::Document) {
    dom::set_hidden_by_id(document, HINT_ID, false);
}

#[inline]
pub fn hide_hint(document: &web::Document) {
    dom::set_hidden_by_id(document, HINT_ID, true);
}

/// Shows the new speed and hides the hint again after a short pause.
/// Repeated presses restart the pause.
pub fn flash_speed_hint(document: &web::Document, speed: f32) {
    update_hint(document, speed);
    show_hint(document);

    let Some(w) = web::window() else { return };
    if let Some(prev) = HIDE_TIMER.with(|t| t.take()) {
        w.clear_timeout_with_handle(prev);
    }
    let doc = document.clone();
    let cb = Closure::once_into_js(move || {
        HIDE_TIMER.with(|t| t.set(None));
        hide_hint(&doc);
    });
    match w.set_timeout_with_callback_and_timeout_and_arguments_0(cb.unchecked_ref(), HINT_HIDE_MS) {
        Ok(id) => HIDE_TIMER.with(|t| t.set(Some(id))),
        Err(e) => log::warn!("[hint] timer: {:?}", e),
    }
}
