//! Renderer over an abstract 2D surface. The web crate backs `Surface` with a
//! `CanvasRenderingContext2d`; tests back it with a recording spy.

use crate::entity::{Entity, Shape};
use glam::Vec2;
use std::f32::consts::TAU;

/// Inset (px) between a silhouette and its clipped text payload.
pub const PAYLOAD_INSET: f32 = 8.0;
pub const PAYLOAD_FONT: &str = "bold 13px monospace";
pub const PAYLOAD_LINE_HEIGHT: f32 = 18.0;

/// Minimal immediate-mode drawing API, modelled on the canvas 2D context.
pub trait Surface {
    fn size(&self) -> Vec2;
    fn clear(&mut self);
    fn save(&mut self);
    fn restore(&mut self);
    fn set_alpha(&mut self, alpha: f32);
    fn set_fill(&mut self, css: &str);
    fn set_stroke(&mut self, css: &str, width: f32);
    fn set_glow(&mut self, css: &str, blur: f32);
    fn set_font(&mut self, css: &str);
    fn begin_path(&mut self);
    fn move_to(&mut self, p: Vec2);
    fn line_to(&mut self, p: Vec2);
    fn arc(&mut self, center: Vec2, radius: f32);
    fn rect(&mut self, origin: Vec2, size: Vec2);
    fn close_path(&mut self);
    fn fill(&mut self);
    fn stroke(&mut self);
    fn clip(&mut self);
    fn fill_rect(&mut self, origin: Vec2, size: Vec2);
    fn fill_text(&mut self, text: &str, at: Vec2);
    fn measure_text(&self, text: &str) -> f32;
}

/// Adds the silhouette of `shape` at `center` with bounding `radius` to the
/// current path.
pub fn trace_shape<S: Surface + ?Sized>(s: &mut S, shape: Shape, center: Vec2, radius: f32) {
    match shape {
        Shape::Circle => s.arc(center, radius),
        Shape::Polygon { sides } => {
            let n = sides.max(3);
            for i in 0..n {
                let angle = TAU / n as f32 * i as f32;
                let p = center + Vec2::new(angle.cos(), angle.sin()) * radius;
                if i == 0 {
                    s.move_to(p);
                } else {
                    s.line_to(p);
                }
            }
            s.close_path();
        }
        Shape::Rectangle { aspect } => {
            let half = Vec2::new(radius, radius * aspect);
            s.rect(center - half, half * 2.0);
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RenderStyle {
    pub glow: f32,
    pub alpha: f32,
    pub draw_payload: bool,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            glow: 16.0,
            alpha: 0.85,
            draw_payload: true,
        }
    }
}

/// Draws the entity pass. Reads entities only.
pub struct Renderer {
    pub style: RenderStyle,
}

impl Renderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn draw_entities<S: Surface + ?Sized>(&self, s: &mut S, entities: &[Entity]) {
        for e in entities {
            self.draw_entity(s, e);
        }
    }

    pub fn draw_entity<S: Surface + ?Sized>(&self, s: &mut S, e: &Entity) {
        s.save();
        s.set_alpha((self.style.alpha * e.alpha).clamp(0.0, 1.0));
        s.set_fill(&e.color);
        if self.style.glow > 0.0 {
            s.set_glow(&e.color, self.style.glow);
        }
        s.begin_path();
        trace_shape(s, e.shape, e.position, e.radius);
        s.fill();
        s.restore();

        if self.style.draw_payload {
            if let Some(payload) = &e.payload {
                draw_clipped_text(s, e, payload.text());
            }
        }
    }
}

/// Text payload clipped to an inset copy of the entity silhouette.
pub fn draw_clipped_text<S: Surface + ?Sized>(s: &mut S, e: &Entity, text: &str) {
    let inner = e.radius - PAYLOAD_INSET;
    if inner <= 0.0 {
        return;
    }
    s.save();
    s.begin_path();
    trace_shape(s, e.shape, e.position, inner);
    s.clip();
    s.set_font(PAYLOAD_FONT);
    s.set_fill("#fff");
    let origin = e.position + Vec2::new(-e.radius + 18.0, -10.0);
    for (i, line) in text.lines().enumerate() {
        s.fill_text(line, origin + Vec2::new(0.0, i as f32 * PAYLOAD_LINE_HEIGHT));
    }
    s.restore();
}
