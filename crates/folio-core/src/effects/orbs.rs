//! Gravity code orbs: a handful of large draggable shapes that fall, bounce,
//! bump each other and carry rotating code snippets.

use super::{palette, Effect, EffectCtx, Preset};
use crate::boundary::BoundaryPolicy;
use crate::constants::*;
use crate::entity::{Payload, Shape};
use crate::forces::{ForceParams, PointerParams};
use crate::input::InputOptions;
use crate::render::{trace_shape, RenderStyle, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;

pub const ORB_COUNT: usize = 6;
pub const SNIPPET_SWAP_SEC: f64 = 4.0;
pub const SNIPPET_SWAP_CHANCE: f64 = 0.2;

pub const SNIPPETS: [&str; 6] = [
    "function greet(name) {\n  return 'Hello, ' + name;\n}",
    "const sum = (a, b) => a + b;",
    "for (let i = 0; i < 10; i++) {\n  console.log(i);\n}",
    "const user = { name: 'AI', role: 'assistant' };",
    "if (active) {\n  doWork();\n}",
    "class Orb {\n  constructor() {\n    this.energy = 100;\n  }\n}",
];

const SHAPES: [Shape; 3] = [
    Shape::Circle,
    Shape::Polygon { sides: 6 },
    Shape::Rectangle { aspect: 1.0 },
];

pub fn preset(bounds: Bounds) -> Preset {
    Preset {
        store: StoreConfig {
            count: ORB_COUNT,
            bounds,
            min_size: 48.0,
            max_size: 70.0,
            palette: palette(&NEON_PALETTE),
            max_initial_speed: 0.5,
        },
        forces: ForceParams {
            pointer: Some(PointerParams {
                radius: POINTER_RADIUS,
                attract: 0.0008,
                repel: 0.0004,
            }),
            passive: Vec2::new(0.0, 0.01),
            friction: DEFAULT_FRICTION,
            boundary: BoundaryPolicy::Reflect {
                restitution_x: 1.0,
                restitution_y: 0.9,
            },
            collision: Some(COLLISION_CORRECTION),
            interaction_boost: true,
            ..ForceParams::default()
        },
        input: InputOptions {
            hover: true,
            drag: true,
            click_to_open: true,
        },
        style: RenderStyle {
            glow: 24.0,
            alpha: 0.85,
            draw_payload: true,
        },
        effect: Box::new(GravityOrbs::default()),
    }
}

#[derive(Debug, Default)]
pub struct GravityOrbs {
    next_swap: f64,
}

impl Effect for GravityOrbs {
    fn name(&self) -> &'static str {
        "orbs"
    }

    fn prepare(&mut self, store: &mut ParticleStore, _rng: &mut StdRng) {
        for (i, e) in store.entities_mut().iter_mut().enumerate() {
            e.shape = SHAPES[i % SHAPES.len()];
            e.payload = Some(Payload::Code(SNIPPETS[i % SNIPPETS.len()].to_string()));
        }
        self.next_swap = SNIPPET_SWAP_SEC;
    }

    fn advance(&mut self, ctx: EffectCtx<'_>) {
        if ctx.tick.now < self.next_swap {
            return;
        }
        self.next_swap = ctx.tick.now + SNIPPET_SWAP_SEC;
        for e in ctx.store.entities_mut() {
            if ctx.rng.gen_bool(SNIPPET_SWAP_CHANCE) {
                let pick = SNIPPETS[ctx.rng.gen_range(0..SNIPPETS.len())];
                e.payload = Some(Payload::Code(pick.to_string()));
            }
        }
    }

    fn draw_over(&self, s: &mut dyn Surface, store: &ParticleStore) {
        for e in store.entities().iter().filter(|e| e.flags.open) {
            s.save();
            s.begin_path();
            trace_shape(s, Shape::Circle, e.position, e.radius + 10.0);
            s.set_fill("rgba(0,0,0,0.85)");
            s.fill();
            s.set_font("bold 16px monospace");
            s.set_fill("#fff");
            let origin = e.position + Vec2::new(-e.radius + 20.0, -e.radius);
            s.fill_text("Project Details:", origin);
            if let Some(p) = &e.payload {
                for (i, line) in p.text().lines().enumerate() {
                    s.fill_text(line, origin + Vec2::new(0.0, 20.0 * (i + 1) as f32));
                }
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

    #[test]
    fn prepare_assigns_shapes_and_snippets() {
        let p = preset(Bounds::new(800.0, 400.0));
        let mut rng = StdRng::seed_from_u64(11);
        let mut store = ParticleStore::spawn(&p.store, &mut rng).unwrap();
        let mut fx = GravityOrbs::default();
        fx.prepare(&mut store, &mut rng);
        assert_eq!(store.len(), ORB_COUNT);
        assert_eq!(store.entities()[1].shape, Shape::Polygon { sides: 6 });
        assert!(store.entities().iter().all(|e| e.payload.is_some()));
    }

    #[test]
    fn snippets_only_rotate_on_schedule() {
        let p = preset(Bounds::new(800.0, 400.0));
        let mut rng = StdRng::seed_from_u64(5);
        let mut store = ParticleStore::spawn(&p.store, &mut rng).unwrap();
        let mut fx = GravityOrbs::default();
        fx.prepare(&mut store, &mut rng);
        let inf = ExternalInfluence::at_center(store.bounds());
        let mut steer = vec![Vec2::ZERO; store.len()];

        let before: Vec<_> = store.entities().iter().map(|e| e.payload.clone()).collect();
        let tick = Tick { dt: 0.016, speed: 1.0, now: 1.0 };
        fx.advance(EffectCtx {
            store: &mut store,
            influence: &inf,
            steer: &mut steer,
            rng: &mut rng,
            tick,
        });
        let after: Vec<_> = store.entities().iter().map(|e| e.payload.clone()).collect();
        assert_eq!(before, after);

        fx.advance(EffectCtx {
            store: &mut store,
            influence: &inf,
            steer: &mut steer,
            rng: &mut rng,
            tick: Tick { now: 4.0, ..tick },
        });
        assert_eq!(fx.next_swap, 8.0);
    }
}
