//! Holo data streams: slanted light columns that lean with the pointer,
//! glyphs falling along them and short-lived "data burst" popups.

use super::{palette, Effect, EffectCtx, Preset};
use crate::boundary::BoundaryPolicy;
use crate::constants::HOLO_CYAN;
use crate::entity::Shape;
use crate::forces::ForceParams;
use crate::input::InputOptions;
use crate::render::{RenderStyle, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

pub const STREAM_COUNT: usize = 7;
pub const GLYPHS_PER_STREAM: usize = 6;
pub const BURST_PERIOD_SEC: f64 = 1.2;
pub const BURST_CHANCE: f64 = 0.25;
pub const BURST_LIFETIME_SEC: f64 = 1.8;
const MAX_LEAN_DEG: f32 = 20.0;
const POINTER_LEAN_DEG: f32 = 40.0;
const GLYPH_MARGIN: f32 = 4.0;
const TRACK_GAIN: f32 = 0.05;
const TRACK_DAMPING: f32 = 0.1;

pub const SNIPPETS: [&str; 10] = [
    "const x = 42;",
    "function greet() { return \"Hi!\"; }",
    "let data = fetch(\"/api/data\");",
    "if (user.isActive) {...}",
    "console.log(\"Holo Stream!\");",
    "for (let i=0; i<10; i++) {...}",
    "<div className=\"hologram\" />",
    "export default function App() {...}",
    "useEffect(() => {...}, [])",
    "return <Hologram />;",
];

pub fn preset(bounds: Bounds) -> Preset {
    Preset {
        store: StoreConfig {
            count: STREAM_COUNT * GLYPHS_PER_STREAM,
            bounds,
            min_size: 1.5,
            max_size: 2.5,
            palette: palette(&[HOLO_CYAN, "#b2fffc"]),
            max_initial_speed: 0.0,
        },
        forces: ForceParams {
            // terminal fall speed ~2.4 px/frame
            passive: Vec2::new(0.0, 0.05),
            boundary: BoundaryPolicy::WrapVertical,
            ..ForceParams::default()
        },
        input: InputOptions::default(),
        style: RenderStyle {
            glow: 10.0,
            alpha: 0.8,
            draw_payload: false,
        },
        effect: Box::new(HoloStreams::default()),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Burst {
    /// Fractional position within the surface.
    pub at: Vec2,
    pub code: &'static str,
    pub born: f64,
}

#[derive(Debug, Default)]
pub struct HoloStreams {
    /// Per-stream resting lean in degrees.
    lean: Vec<f32>,
    /// Per-stream floating snippet.
    captions: Vec<Option<&'static str>>,
    /// Pointer x as a fraction of the width.
    pointer_u: f32,
    bursts: Vec<Burst>,
    next_burst: f64,
    now: f64,
}

impl HoloStreams {
    pub fn bursts(&self) -> &[Burst] {
        &self.bursts
    }

    fn angle(&self, stream: usize) -> f32 {
        let lean = self.lean.get(stream).copied().unwrap_or(0.0);
        (lean + (self.pointer_u - 0.5) * POINTER_LEAN_DEG).to_radians()
    }

    /// Column x at height `y`, skewed about the vertical middle.
    pub fn column_x(&self, stream: usize, y: f32, b: Bounds) -> f32 {
        let x0 = (stream + 1) as f32 * b.width / (STREAM_COUNT + 1) as f32;
        x0 + self.angle(stream).tan() * (y - b.height * 0.5)
    }

    /// Where a glyph of `stream` at height `y` is held. Follows the column
    /// but stays inside the surface, so wrapping only ever happens on y.
    pub fn glyph_x(&self, stream: usize, y: f32, b: Bounds) -> f32 {
        self.column_x(stream, y, b)
            .clamp(GLYPH_MARGIN, (b.width - GLYPH_MARGIN).max(GLYPH_MARGIN))
    }
}

impl Effect for HoloStreams {
    fn name(&self) -> &'static str {
        "streams"
    }

    fn prepare(&mut self, store: &mut ParticleStore, rng: &mut StdRng) {
        let b = store.bounds();
        self.pointer_u = 0.5;
        self.lean = (0..STREAM_COUNT)
            .map(|_| rng.gen_range(-MAX_LEAN_DEG..MAX_LEAN_DEG))
            .collect();
        self.captions = (0..STREAM_COUNT)
            .map(|_| rng.gen_bool(0.5).then(|| SNIPPETS[rng.gen_range(0..SNIPPETS.len())]))
            .collect();
        self.next_burst = BURST_PERIOD_SEC;
        for (i, e) in store.entities_mut().iter_mut().enumerate() {
            let stream = i / GLYPHS_PER_STREAM;
            e.shape = Shape::Rectangle { aspect: 3.0 };
            e.position.x = self.glyph_x(stream, e.position.y, b);
            e.velocity = Vec2::new(0.0, rng.gen_range(1.0..3.0));
        }
    }

    fn advance(&mut self, ctx: EffectCtx<'_>) {
        let now = ctx.tick.now;
        self.now = now;
        let b = ctx.store.bounds();
        if ctx.influence.engaged {
            self.pointer_u = (ctx.influence.point.x / b.width).clamp(0.0, 1.0);
        }

        self.bursts.retain(|burst| now - burst.born < BURST_LIFETIME_SEC);
        if now >= self.next_burst {
            self.next_burst = now + BURST_PERIOD_SEC;
            if ctx.rng.gen_bool(BURST_CHANCE) {
                self.bursts.push(Burst {
                    at: Vec2::new(ctx.rng.gen_range(0.1..0.9), ctx.rng.gen_range(0.1..0.9)),
                    code: SNIPPETS[ctx.rng.gen_range(0..SNIPPETS.len())],
                    born: now,
                });
            }
        }

        for (i, e) in ctx.store.entities().iter().enumerate() {
            let target = self.glyph_x(i / GLYPHS_PER_STREAM, e.position.y, b);
            if let Some(slot) = ctx.steer.get_mut(i) {
                slot.x += (target - e.position.x) * TRACK_GAIN - e.velocity.x * TRACK_DAMPING;
            }
        }
    }

    fn draw_under(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let b = store.bounds();
        for i in 0..STREAM_COUNT {
            let top = Vec2::new(self.column_x(i, 0.0, b), 0.0);
            let bottom = Vec2::new(self.column_x(i, b.height, b), b.height);
            s.save();
            s.set_glow(HOLO_CYAN, 18.0);
            s.set_alpha(0.18);
            s.set_stroke(HOLO_CYAN, 6.0);
            s.begin_path();
            s.move_to(top);
            s.line_to(bottom);
            s.stroke();
            s.set_alpha(0.7);
            s.set_stroke("#fff", 1.0);
            s.stroke();
            if let Some(text) = self.captions.get(i).copied().flatten() {
                let y = b.height / 3.0;
                s.set_font("12px monospace");
                s.set_fill("#a5f3fc");
                s.set_alpha(0.8);
                let w = s.measure_text(text);
                s.fill_text(text, Vec2::new(self.column_x(i, y, b) - w * 0.5, y));
            }
            s.restore();
        }
    }

    fn draw_over(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let b = store.bounds();
        s.save();
        s.set_font("12px monospace");
        for burst in &self.bursts {
            let age = ((self.now - burst.born) / BURST_LIFETIME_SEC).clamp(0.0, 1.0) as f32;
            let at = burst.at * b.size();
            let size = Vec2::new(s.measure_text(burst.code).max(80.0) + 32.0, 44.0);
            s.set_alpha(0.8 * (1.0 - age));
            s.set_glow(HOLO_CYAN, 18.0);
            s.set_fill("#a5f3fc");
            s.fill_rect(at, size);
            s.set_fill("#0e7490");
            s.fill_text("DATA BURST", at + Vec2::new(16.0, 18.0));
            s.set_fill("#164e63");
            s.fill_text(burst.code, at + Vec2::new(16.0, 34.0));
        }
        s.set_alpha(0.04);
        s.set_glow(HOLO_CYAN, 0.0);
        s.set_fill(HOLO_CYAN);
        let mut y = 8.0;
        while y < b.height {
            s.fill_rect(Vec2::new(0.0, y), Vec2::new(b.width, 2.0));
            y += 10.0;
        }
        s.restore();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::Tick;
    use crate::influence::ExternalInfluence;
    use rand::SeedableRng;

    fn setup() -> (ParticleStore, StdRng, HoloStreams) {
        let p = preset(Bounds::new(800.0, 400.0));
        let mut rng = StdRng::seed_from_u64(4);
        let mut store = ParticleStore::spawn(&p.store, &mut rng).unwrap();
        let mut fx = HoloStreams::default();
        fx.prepare(&mut store, &mut rng);
        (store, rng, fx)
    }

    #[test]
    fn columns_are_evenly_spaced_at_mid_height() {
        let (store, _, fx) = setup();
        let b = store.bounds();
        for i in 0..STREAM_COUNT {
            let x = fx.column_x(i, 200.0, b);
            assert!((x - (i + 1) as f32 * 100.0).abs() < 1e-3);
        }
    }

    #[test]
    fn pointer_leans_columns() {
        let (mut store, mut rng, mut fx) = setup();
        let b = store.bounds();
        let before = fx.column_x(0, 0.0, b);
        let mut inf = ExternalInfluence::at_center(b);
        inf.move_to(Vec2::new(800.0, 200.0));
        let mut steer = vec![Vec2::ZERO; store.len()];
        fx.advance(EffectCtx {
            store: &mut store,
            influence: &inf,
            steer: &mut steer,
            rng: &mut rng,
            tick: Tick { dt: 0.016, speed: 1.0, now: 0.1 },
        });
        // top of a column moves left as the skew grows
        assert!(fx.column_x(0, 0.0, b) < before);
    }

    #[test]
    fn glyph_targets_stay_inside_when_columns_lean_off_the_edge() {
        let (store, _, mut fx) = setup();
        let b = store.bounds();
        fx.lean = vec![MAX_LEAN_DEG; STREAM_COUNT];
        fx.pointer_u = 1.0;
        // outermost column leaves the surface at the top
        assert!(fx.column_x(0, 0.0, b) < 0.0);
        for i in 0..STREAM_COUNT {
            for y in [0.0, 50.0, 200.0, 350.0, 400.0] {
                let x = fx.glyph_x(i, y, b);
                assert!((0.0..=b.width).contains(&x), "stream {i} y {y}: {x}");
            }
        }
    }

    #[test]
    fn bursts_expire() {
        let (mut store, mut rng, mut fx) = setup();
        fx.bursts.push(Burst { at: Vec2::splat(0.5), code: SNIPPETS[0], born: 0.0 });
        let inf = ExternalInfluence::at_center(store.bounds());
        let mut steer = vec![Vec2::ZERO; store.len()];
        fx.next_burst = 100.0;
        fx.advance(EffectCtx {
            store: &mut store,
            influence: &inf,
            steer: &mut steer,
            rng: &mut rng,
            tick: Tick { dt: 0.016, speed: 1.0, now: 2.0 },
        });
        assert!(fx.bursts().is_empty());
    }
}
