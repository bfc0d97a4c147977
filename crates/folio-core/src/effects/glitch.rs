//! Glitch matrix: static code blocks over scanlines, with periodic glitch
//! bursts, random decryptions and a double-click "system hack".

use super::{palette, Effect, EffectCtx, Preset};
use crate::boundary::BoundaryPolicy;
use crate::constants::HOLO_CYAN;
use crate::entity::{Payload, Shape};
use crate::forces::ForceParams;
use crate::input::{InputEvent, InputOptions};
use crate::render::{RenderStyle, Renderer, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

pub const BLOCK_COUNT: usize = 18;
pub const DECRYPT_PERIOD_SEC: f64 = 7.0;
pub const DECRYPT_CHANCE: f64 = 0.08;
pub const DECRYPT_SEC: f64 = 1.2;
pub const HACK_GLITCH_SEC: f64 = 0.9;
pub const HACK_MESSAGE_SEC: f64 = 2.2;
const NOISE_BARS: usize = 8;
const JITTER: f32 = 8.0;
const BLOCK_FILL: &str = "#0f172a";
const DECRYPT_FILL: &str = "#f59e42";

pub const CODE_BLOCKS: [&str; 10] = [
    "const secret = \"...\";",
    "if (user.isHacker) { hack(); }",
    "function decrypt() { /* ... */ }",
    "console.log(\"Matrix online\");",
    "let glitch = true;",
    "for (let i=0;i<42;i++){...}",
    "/* SYSTEM OVERRIDE */",
    "ACCESS GRANTED",
    "EASTER EGG FOUND",
    "function systemHack() { return \"hacked!\"; }",
];

pub const EASTER_EGGS: [&str; 5] = [
    "You found the rabbit hole!",
    "Wake up, Neo.",
    "Follow the white rabbit.",
    "There is no spoon.",
    "01101100 01101111 01101100",
];

pub fn preset(bounds: Bounds) -> Preset {
    Preset {
        store: StoreConfig {
            count: BLOCK_COUNT,
            bounds,
            min_size: 40.0,
            max_size: 90.0,
            palette: palette(&[BLOCK_FILL]),
            max_initial_speed: 0.0,
        },
        forces: ForceParams {
            friction: 0.9,
            boundary: BoundaryPolicy::reflect(0.5),
            ..ForceParams::default()
        },
        input: InputOptions::default(),
        style: RenderStyle {
            glow: 12.0,
            alpha: 0.92,
            draw_payload: false,
        },
        effect: Box::new(GlitchMatrix::default()),
    }
}

#[derive(Clone, Copy, Debug, Default)]
struct Jitter {
    offset: Vec2,
    alpha: f32,
}

#[derive(Debug, Default)]
pub struct GlitchMatrix {
    glitch_until: f64,
    next_glitch: f64,
    next_decrypt: f64,
    decrypt_until: f64,
    decrypted: Vec<bool>,
    easter_egg: Option<(&'static str, f64)>,
    jitter: Vec<Jitter>,
    noise: Vec<(Vec2, Vec2)>,
    now: f64,
}

impl GlitchMatrix {
    pub fn glitching(&self) -> bool {
        self.now < self.glitch_until
    }

    pub fn easter_egg(&self) -> Option<&'static str> {
        self.easter_egg
            .filter(|&(_, until)| self.now < until)
            .map(|(msg, _)| msg)
    }

    pub fn decrypted(&self) -> &[bool] {
        &self.decrypted
    }

    fn restore_code(store: &mut ParticleStore) {
        for (i, e) in store.entities_mut().iter_mut().enumerate() {
            e.payload = Some(Payload::Code(CODE_BLOCKS[i % CODE_BLOCKS.len()].to_string()));
        }
    }
}

impl Effect for GlitchMatrix {
    fn name(&self) -> &'static str {
        "glitch"
    }

    fn prepare(&mut self, store: &mut ParticleStore, rng: &mut StdRng) {
        let b = store.bounds();
        for e in store.entities_mut() {
            let h = rng.gen_range(28.0..44.0_f32);
            let half = Vec2::new(e.radius, h * 0.5);
            let top_left = Vec2::new(
                rng.gen_range(0.075..0.925_f32) * b.width,
                rng.gen_range(0.1..0.9_f32) * b.height,
            );
            e.shape = Shape::Rectangle { aspect: half.y / half.x };
            e.position = top_left + half;
        }
        Self::restore_code(store);
        self.decrypted = vec![false; store.len()];
        self.jitter = vec![Jitter::default(); store.len()];
        self.next_glitch = rng.gen_range(1.8..3.2);
        self.next_decrypt = DECRYPT_PERIOD_SEC;
    }

    fn advance(&mut self, ctx: EffectCtx<'_>) {
        let now = ctx.tick.now;
        self.now = now;
        let rng = ctx.rng;

        if now >= self.next_glitch {
            self.glitch_until = now + rng.gen_range(0.18..0.4);
            self.next_glitch = now + rng.gen_range(1.8..3.2);
        }

        if now >= self.next_decrypt {
            self.next_decrypt = now + DECRYPT_PERIOD_SEC;
            self.decrypt_until = now + DECRYPT_SEC;
            for (e, d) in ctx.store.entities_mut().iter_mut().zip(&mut self.decrypted) {
                *d = rng.gen_bool(DECRYPT_CHANCE);
                if *d {
                    let egg = EASTER_EGGS[rng.gen_range(0..EASTER_EGGS.len())];
                    e.payload = Some(Payload::Code(egg.to_string()));
                }
            }
        } else if self.decrypt_until > 0.0 && now >= self.decrypt_until {
            self.decrypt_until = 0.0;
            self.decrypted.iter_mut().for_each(|d| *d = false);
            Self::restore_code(ctx.store);
        }

        let b = ctx.store.bounds();
        if self.glitching() {
            for j in &mut self.jitter {
                j.offset = Vec2::new(rng.gen_range(-JITTER..JITTER), rng.gen_range(-JITTER..JITTER));
                j.alpha = rng.gen_range(0.5..1.0);
            }
            self.noise = (0..NOISE_BARS)
                .map(|_| {
                    (
                        Vec2::new(rng.gen_range(0.0..b.width), rng.gen_range(0.0..b.height)),
                        Vec2::new(rng.gen_range(40.0..120.0), rng.gen_range(2.0..8.0)),
                    )
                })
                .collect();
        } else if !self.noise.is_empty() {
            self.noise.clear();
            self.jitter.iter_mut().for_each(|j| *j = Jitter::default());
        }
    }

    fn on_input(&mut self, ev: &InputEvent, _store: &mut ParticleStore, rng: &mut StdRng, now: f64) {
        if let InputEvent::DoubleClick(_) = ev {
            self.glitch_until = now + HACK_GLITCH_SEC;
            let egg = EASTER_EGGS[rng.gen_range(0..EASTER_EGGS.len())];
            self.easter_egg = Some((egg, now + HACK_MESSAGE_SEC));
            self.now = now;
            log::info!("[glitch] system hack");
        }
    }

    fn draw_under(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let b = store.bounds();
        s.save();
        s.set_alpha(0.13);
        s.set_fill(HOLO_CYAN);
        let mut y = 0.0;
        while y < b.height {
            s.fill_rect(Vec2::new(0.0, y), Vec2::new(b.width, 2.0));
            y += 4.0;
        }
        s.restore();
    }

    fn draw_entities(&self, s: &mut dyn Surface, store: &ParticleStore, renderer: &Renderer) {
        let glitch = self.glitching();
        let (edge, blur) = if glitch { ("#fff", 24.0) } else { (HOLO_CYAN, renderer.style.glow) };
        s.set_font("13px monospace");
        for (i, e) in store.entities().iter().enumerate() {
            let decrypted = self.decrypted.get(i).copied().unwrap_or(false);
            let j = self.jitter.get(i).copied().unwrap_or_default();
            let half = e.half_extents();
            let origin = e.position - half;
            s.save();
            s.set_alpha(if glitch { j.alpha } else { renderer.style.alpha });
            s.set_glow(edge, blur);
            s.set_fill(if decrypted { DECRYPT_FILL } else { e.color.as_str() });
            s.set_stroke(edge, 2.5);
            s.begin_path();
            s.rect(origin + j.offset, half * 2.0);
            s.fill();
            s.stroke();
            if let Some(p) = &e.payload {
                s.set_alpha(1.0);
                s.set_fill(if decrypted { "#fff" } else { HOLO_CYAN });
                s.fill_text(p.text(), origin + Vec2::new(12.0, half.y * 2.0 / 1.6));
            }
            s.restore();
        }
    }

    fn draw_over(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let b = store.bounds();
        if let Some(msg) = self.easter_egg() {
            s.save();
            s.set_alpha(1.0);
            s.set_fill(DECRYPT_FILL);
            s.set_glow("#fff", 32.0);
            let w = s.measure_text(msg);
            s.fill_text(msg, Vec2::new(b.width * 0.5 - w * 0.5, b.height * 0.5));
            s.restore();
        }
        if !self.noise.is_empty() {
            s.save();
            s.set_alpha(0.18);
            s.set_fill("#fff");
            for (at, size) in &self.noise {
                s.fill_rect(*at, *size);
            }
            s.restore();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forces::Tick;
    use crate::influence::ExternalInfluence;
    use rand::SeedableRng;

    fn setup() -> (ParticleStore, StdRng, GlitchMatrix) {
        let p = preset(Bounds::new(800.0, 400.0));
        let mut rng = StdRng::seed_from_u64(8);
        let mut store = ParticleStore::spawn(&p.store, &mut rng).unwrap();
        let mut fx = GlitchMatrix::default();
        fx.prepare(&mut store, &mut rng);
        (store, rng, fx)
    }

    fn advance(fx: &mut GlitchMatrix, store: &mut ParticleStore, rng: &mut StdRng, now: f64) {
        let inf = ExternalInfluence::at_center(store.bounds());
        let mut steer = vec![Vec2::ZERO; store.len()];
        fx.advance(EffectCtx {
            store,
            influence: &inf,
            steer: &mut steer,
            rng,
            tick: Tick { dt: 0.016, speed: 1.0, now },
        });
    }

    #[test]
    fn blocks_have_code_and_block_shape() {
        let (store, _, _) = setup();
        for (i, e) in store.entities().iter().enumerate() {
            let h = e.half_extents() * 2.0;
            assert!((80.0..=180.0).contains(&h.x));
            assert!((28.0..=44.0).contains(&h.y));
            assert_eq!(e.payload.as_ref().map(|p| p.text()), Some(CODE_BLOCKS[i % 10]));
        }
    }

    #[test]
    fn double_click_triggers_hack() {
        let (mut store, mut rng, mut fx) = setup();
        fx.on_input(&InputEvent::DoubleClick(Vec2::ZERO), &mut store, &mut rng, 0.5);
        assert!(fx.glitching());
        assert!(fx.easter_egg().is_some());
        advance(&mut fx, &mut store, &mut rng, 1.5);
        assert!(!fx.glitching());
        assert!(fx.easter_egg().is_some());
        advance(&mut fx, &mut store, &mut rng, 2.8);
        assert!(fx.easter_egg().is_none());
    }

    #[test]
    fn decryption_restores_code() {
        let (mut store, mut rng, mut fx) = setup();
        fx.decrypted[0] = true;
        store.entities_mut()[0].payload = Some(Payload::Code(EASTER_EGGS[0].into()));
        fx.decrypt_until = 1.0;
        advance(&mut fx, &mut store, &mut rng, 1.1);
        assert!(fx.decrypted().iter().all(|d| !d));
        assert_eq!(store.entities()[0].payload, Some(Payload::Code(CODE_BLOCKS[0].into())));
    }
}
