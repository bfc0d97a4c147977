use crate::constants::HIDDEN_CLASS;
use crate::input;
use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn by_id<T: JsCast>(document: &web::Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Matches the canvas backing store to its CSS box times the device pixel
/// ratio. Returns the CSS size, the ratio, and whether the backing store was
/// reallocated. Unchanged sizes are left alone; writing `width` clears the
/// bitmap and resets the context.
pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) -> (Vec2, f64, bool) {
    let dpr = web::window().map(|w| w.device_pixel_ratio()).unwrap_or(1.0);
    let rect = canvas.get_bounding_client_rect();
    let css = Vec2::new(rect.width() as f32, rect.height() as f32).max(Vec2::ONE);
    let (w_px, h_px) = input::backing_px(css, dpr);
    let changed = canvas.width() != w_px || canvas.height() != h_px;
    if changed {
        canvas.set_width(w_px);
        canvas.set_height(h_px);
    }
    (css, dpr, changed)
}

pub fn set_hidden(el: &web::Element, hidden: bool) {
    let cl = el.class_list();
    if hidden {
        _ = cl.add_1(HIDDEN_CLASS);
    } else {
        _ = cl.remove_1(HIDDEN_CLASS);
    }
}

pub fn set_hidden_by_id(document: &web::Document, id: &str, hidden: bool) {
    if let Some(el) = document.get_element_by_id(id) {
        set_hidden(&el, hidden);
    }
}

pub fn input_value(document: &web::Document, id: &str) -> String {
    if let Some(el) = by_id::<web::HtmlInputElement>(document, id) {
        return el.value();
    }
    by_id::<web::HtmlTextAreaElement>(document, id)
        .map(|el| el.value())
        .unwrap_or_default()
}

pub fn set_input_value(document: &web::Document, id: &str, value: &str) {
    if let Some(el) = by_id::<web::HtmlInputElement>(document, id) {
        el.set_value(value);
    } else if let Some(el) = by_id::<web::HtmlTextAreaElement>(document, id) {
        el.set_value(value);
    }
}

/// Keyboard shortcuts stay out of the way while the user is typing.
pub fn text_field_focused(document: &web::Document) -> bool {
    document
        .active_element()
        .map(|el| {
            let tag = el.tag_name();
            tag.eq_ignore_ascii_case("input")
                || tag.eq_ignore_ascii_case("textarea")
                || el
                    .dyn_ref::<web::HtmlElement>()
                    .map(|h| h.is_content_editable())
                    .unwrap_or(false)
        })
        .unwrap_or(false)
}

pub fn body_attr(document: &web::Document, name: &str) -> Option<String> {
    document.body().and_then(|b| b.get_attribute(name))
}
