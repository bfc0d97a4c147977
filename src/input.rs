use folio_core::KeyCommand;
use glam::Vec2;
use web_sys as web;

/// Maps a client-space point into the canvas' CSS pixel space. The drawing
/// transform already accounts for the device pixel ratio.
#[inline]
pub fn client_to_local(client: Vec2, rect_origin: Vec2, rect_size: Vec2, local_size: Vec2) -> Vec2 {
    if rect_size.x <= 0.0 || rect_size.y <= 0.0 {
        return local_size * 0.5;
    }
    (client - rect_origin) * (local_size / rect_size)
}

/// Backing-store pixels for a CSS box at `dpr`. Never zero.
#[inline]
pub fn backing_px(css_size: Vec2, dpr: f64) -> (u32, u32) {
    let px = |css: f32| ((f64::from(css) * dpr).round() as u32).max(1);
    (px(css_size.x), px(css_size.y))
}

#[inline]
pub fn inside(p: Vec2, size: Vec2) -> bool {
    p.x >= 0.0 && p.y >= 0.0 && p.x <= size.x && p.y <= size.y
}

#[inline]
pub fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let size = Vec2::new(rect.width() as f32, rect.height() as f32);
    client_to_local(
        Vec2::new(ev.client_x() as f32, ev.client_y() as f32),
        Vec2::new(rect.left() as f32, rect.top() as f32),
        size,
        size,
    )
}

/// Speed shortcut for `key`, unless the user is typing into a field.
#[inline]
pub fn speed_command(key: &str, typing: bool) -> Option<KeyCommand> {
    if typing {
        return None;
    }
    KeyCommand::from_key(key)
}
