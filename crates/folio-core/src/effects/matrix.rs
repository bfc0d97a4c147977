//! Particle matrix: a dense field of shimmering specks that clump at short
//! range, spread at mid range and wrap at the edges.

use super::{palette, Effect, EffectCtx, Preset};
use crate::boundary::BoundaryPolicy;
use crate::constants::MATRIX_PALETTE;
use crate::entity::Shape;
use crate::forces::{ForceParams, PairwiseParams, PointerParams};
use crate::input::InputOptions;
use crate::render::RenderStyle;
use crate::store::{Bounds, ParticleStore, StoreConfig};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use std::f32::consts::TAU;

pub const PARTICLE_COUNT: usize = 1200;
pub const POINTER_RADIUS: f32 = 100.0;
const SHIMMER_RATE: f32 = 0.04;
const SHIMMER_DEPTH: f32 = 0.18;
const PRESSED_GLOW: f32 = 0.18;
const HOVER_GLOW: f32 = 0.08;

pub fn preset(bounds: Bounds) -> Preset {
    Preset {
        store: StoreConfig {
            count: PARTICLE_COUNT,
            bounds,
            // half of a 1.5..3.5 px square
            min_size: 0.75,
            max_size: 1.75,
            palette: palette(&MATRIX_PALETTE),
            max_initial_speed: 0.08,
        },
        forces: ForceParams {
            pairwise: Some(PairwiseParams::default()),
            pointer: Some(PointerParams {
                radius: POINTER_RADIUS,
                attract: 0.01,
                repel: 0.008,
            }),
            boundary: BoundaryPolicy::Wrap,
            ..ForceParams::default()
        },
        input: InputOptions::default(),
        style: RenderStyle {
            glow: 8.0,
            alpha: 1.0,
            draw_payload: false,
        },
        effect: Box::new(ParticleMatrix::default()),
    }
}

#[derive(Debug, Default)]
pub struct ParticleMatrix {
    base_alpha: Vec<f32>,
}

impl Effect for ParticleMatrix {
    fn name(&self) -> &'static str {
        "matrix"
    }

    fn prepare(&mut self, store: &mut ParticleStore, rng: &mut StdRng) {
        self.base_alpha.clear();
        for e in store.entities_mut() {
            e.shape = Shape::Rectangle { aspect: 1.0 };
            if let Some(c) = MATRIX_PALETTE.choose(rng) {
                e.color = c.to_string();
            }
            e.phase = rng.gen_range(0.0..TAU);
            let base = rng.gen_range(0.18..0.5);
            e.alpha = base;
            self.base_alpha.push(base);
        }
    }

    fn advance(&mut self, ctx: EffectCtx<'_>) {
        let k = ctx.tick.k();
        let inf = ctx.influence;
        for (e, &base) in ctx.store.entities_mut().iter_mut().zip(&self.base_alpha) {
            e.phase = (e.phase + (SHIMMER_RATE + ctx.rng.gen_range(0.0..0.01)) * k) % TAU;
            let mut a = base + e.phase.sin() * SHIMMER_DEPTH + ctx.rng.gen_range(0.0..0.05);
            if inf.engaged && e.position.distance(inf.point) < POINTER_RADIUS {
                a += if inf.pressed { PRESSED_GLOW } else { HOVER_GLOW };
            }
            e.alpha = a.clamp(0.0, 1.0);
        }
    }
}
