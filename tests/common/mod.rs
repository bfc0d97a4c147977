// Test doubles shared by the host-side suites: a recording drawing surface,
// a frame scheduler spy and a canned relay transport.

#![allow(dead_code)]

use folio_core::error::{EngineError, RelayError};
use folio_core::relay::{RelayResponse, RelayTransport};
use folio_core::{FrameHandle, FrameScheduler, Surface};
use glam::Vec2;
use serde_json::Value;
use std::cell::RefCell;

#[derive(Clone, Debug, PartialEq)]
pub enum Op {
    Clear,
    Fill,
    Stroke,
    FillRect,
    Text(String),
    Clip,
    Arc(Vec2, f32),
    Rect(Vec2, Vec2),
}

#[derive(Default)]
pub struct SpySurface {
    pub size: Vec2,
    pub ops: Vec<Op>,
    pub depth: i32,
}

impl SpySurface {
    pub fn new(w: f32, h: f32) -> Self {
        Self {
            size: Vec2::new(w, h),
            ..Self::default()
        }
    }

    pub fn draws(&self) -> usize {
        self.ops
            .iter()
            .filter(|o| matches!(o, Op::Fill | Op::Stroke | Op::FillRect | Op::Text(_)))
            .count()
    }

    pub fn texts(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|o| match o {
                Op::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for SpySurface {
    fn size(&self) -> Vec2 {
        self.size
    }
    fn clear(&mut self) {
        self.ops.push(Op::Clear);
    }
    fn save(&mut self) {
        self.depth += 1;
    }
    fn restore(&mut self) {
        self.depth -= 1;
    }
    fn set_alpha(&mut self, _alpha: f32) {}
    fn set_fill(&mut self, _css: &str) {}
    fn set_stroke(&mut self, _css: &str, _width: f32) {}
    fn set_glow(&mut self, _css: &str, _blur: f32) {}
    fn set_font(&mut self, _css: &str) {}
    fn begin_path(&mut self) {}
    fn move_to(&mut self, _p: Vec2) {}
    fn line_to(&mut self, _p: Vec2) {}
    fn arc(&mut self, center: Vec2, radius: f32) {
        self.ops.push(Op::Arc(center, radius));
    }
    fn rect(&mut self, origin: Vec2, size: Vec2) {
        self.ops.push(Op::Rect(origin, size));
    }
    fn close_path(&mut self) {}
    fn fill(&mut self) {
        self.ops.push(Op::Fill);
    }
    fn stroke(&mut self) {
        self.ops.push(Op::Stroke);
    }
    fn clip(&mut self) {
        self.ops.push(Op::Clip);
    }
    fn fill_rect(&mut self, _origin: Vec2, _size: Vec2) {
        self.ops.push(Op::FillRect);
    }
    fn fill_text(&mut self, text: &str, _at: Vec2) {
        self.ops.push(Op::Text(text.to_string()));
    }
    fn measure_text(&self, text: &str) -> f32 {
        text.len() as f32 * 7.0
    }
}

#[derive(Default)]
pub struct SpyScheduler {
    pub next: FrameHandle,
    pub live: Vec<FrameHandle>,
    pub cancelled: Vec<FrameHandle>,
    pub fail: bool,
}

impl FrameScheduler for SpyScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
        if self.fail {
            return Err(EngineError::Scheduler("no animation frames".into()));
        }
        self.next += 1;
        self.live.push(self.next);
        Ok(self.next)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.live.retain(|h| *h != handle);
        self.cancelled.push(handle);
    }
}

impl SpyScheduler {
    /// Hands the oldest outstanding frame to the caller, as the host would.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        if self.live.is_empty() {
            None
        } else {
            Some(self.live.remove(0))
        }
    }
}

/// Answers every POST with a fixed response and records what was sent.
pub struct MockRelay {
    pub reply: Result<RelayResponse, RelayError>,
    pub sent: RefCell<Vec<(String, Value)>>,
}

impl MockRelay {
    pub fn json(status: u16, body: Value) -> Self {
        Self {
            reply: Ok(RelayResponse {
                status,
                body: body.to_string(),
            }),
            sent: RefCell::new(Vec::new()),
        }
    }

    pub fn offline() -> Self {
        Self {
            reply: Err(RelayError::Network("connection refused".into())),
            sent: RefCell::new(Vec::new()),
        }
    }
}

impl RelayTransport for MockRelay {
    async fn post_json(&self, url: &str, body: &Value) -> Result<RelayResponse, RelayError> {
        self.sent.borrow_mut().push((url.to_string(), body.clone()));
        self.reply.clone()
    }
}
