use crate::dom;
use folio_core::{EngineError, Surface};
use glam::Vec2;
use std::f64::consts::TAU;
use wasm_bindgen::JsCast;
use web_sys as web;

/// `Surface` over a 2D canvas context, in CSS pixels.
pub struct CanvasSurface {
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    size: Vec2,
    dpr: f64,
}

impl CanvasSurface {
    pub fn from_canvas(canvas: &web::HtmlCanvasElement) -> Result<Self, EngineError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|e| EngineError::SurfaceUnavailable(format!("{:?}", e)))?
            .ok_or_else(|| EngineError::SurfaceUnavailable("no 2d context".into()))?
            .dyn_into::<web::CanvasRenderingContext2d>()
            .map_err(|e| EngineError::SurfaceUnavailable(format!("{:?}", e)))?;
        let mut s = Self {
            canvas: canvas.clone(),
            ctx,
            size: Vec2::ONE,
            dpr: 0.0,
        };
        s.sync_size();
        Ok(s)
    }

    /// Re-reads the CSS box. Returns the new size when it changed.
    pub fn sync_size(&mut self) -> Option<Vec2> {
        let (css, dpr, reallocated) = dom::sync_canvas_backing_size(&self.canvas);
        // a fresh backing store starts with the identity transform
        if reallocated || dpr != self.dpr {
            _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
            self.dpr = dpr;
        }
        if css != self.size {
            self.size = css;
            Some(css)
        } else {
            None
        }
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn clear(&mut self) {
        self.ctx
            .clear_rect(0.0, 0.0, self.size.x as f64, self.size.y as f64);
    }

    fn save(&mut self) {
        self.ctx.save();
    }

    fn restore(&mut self) {
        self.ctx.restore();
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.ctx.set_global_alpha(alpha as f64);
    }

    fn set_fill(&mut self, css: &str) {
        self.ctx.set_fill_style_str(css);
    }

    fn set_stroke(&mut self, css: &str, width: f32) {
        self.ctx.set_stroke_style_str(css);
        self.ctx.set_line_width(width as f64);
    }

    fn set_glow(&mut self, css: &str, blur: f32) {
        self.ctx.set_shadow_color(css);
        self.ctx.set_shadow_blur(blur as f64);
    }

    fn set_font(&mut self, css: &str) {
        self.ctx.set_font(css);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, p: Vec2) {
        self.ctx.move_to(p.x as f64, p.y as f64);
    }

    fn line_to(&mut self, p: Vec2) {
        self.ctx.line_to(p.x as f64, p.y as f64);
    }

    fn arc(&mut self, center: Vec2, radius: f32) {
        self.ctx.move_to((center.x + radius) as f64, center.y as f64);
        _ = self
            .ctx
            .arc(center.x as f64, center.y as f64, radius.max(0.0) as f64, 0.0, TAU);
    }

    fn rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx
            .rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn close_path(&mut self) {
        self.ctx.close_path();
    }

    fn fill(&mut self) {
        self.ctx.fill();
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn clip(&mut self) {
        self.ctx.clip();
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2) {
        self.ctx
            .fill_rect(origin.x as f64, origin.y as f64, size.x as f64, size.y as f64);
    }

    fn fill_text(&mut self, text: &str, at: Vec2) {
        _ = self.ctx.fill_text(text, at.x as f64, at.y as f64);
    }

    fn measure_text(&self, text: &str) -> f32 {
        self.ctx
            .measure_text(text)
            .map(|m| m.width() as f32)
            .unwrap_or(0.0)
    }
}
