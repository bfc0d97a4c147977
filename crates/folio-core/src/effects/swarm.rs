//! Particle swarm: particles steer toward a target formation that changes
//! every few seconds, shy away from the pointer and link up when close.

use super::{initials_of, palette, Effect, EffectCtx, Preset, PresetOptions};
use crate::boundary::BoundaryPolicy;
use crate::constants::*;
use crate::forces::ForceParams;
use crate::input::InputOptions;
use crate::render::{RenderStyle, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use std::f32::consts::TAU;

pub const SWARM_COUNT: usize = 90;
pub const PATTERN_PERIOD_SEC: f64 = 9.0;
pub const LINK_DISTANCE: f32 = 38.0;
const SEEK_GAIN: f32 = 0.08;
const SEEK_BLEND: f32 = 0.2;
const SHY_RADIUS: f32 = 120.0;
const SHY_GAIN: f32 = 1.5;
const CLOUD_HALF: Vec2 = Vec2::new(160.0, 90.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Formation {
    Ring,
    Initials,
    Cloud,
}

impl Formation {
    fn next(self) -> Self {
        match self {
            Formation::Ring => Formation::Initials,
            Formation::Initials => Formation::Cloud,
            Formation::Cloud => Formation::Ring,
        }
    }
}

pub fn preset(bounds: Bounds, opts: &PresetOptions) -> Preset {
    Preset {
        store: StoreConfig {
            count: SWARM_COUNT,
            bounds,
            min_size: 6.0,
            max_size: 9.0,
            palette: palette(&NEON_PALETTE),
            max_initial_speed: 0.0,
        },
        forces: ForceParams {
            friction: 0.999,
            boundary: BoundaryPolicy::reflect(1.0),
            ..ForceParams::default()
        },
        input: InputOptions::default(),
        style: RenderStyle {
            glow: 16.0,
            alpha: 0.85,
            draw_payload: false,
        },
        effect: Box::new(Swarm::new(opts.initials.as_deref().unwrap_or("User"))),
    }
}

#[derive(Debug)]
pub struct Swarm {
    formation: Formation,
    next_switch: f64,
    /// Right-leaning initials band when the first initial's code point is odd.
    lean: f32,
    /// Offsets from the centre for the cloud formation, drawn on switch.
    cloud: Vec<Vec2>,
}

impl Swarm {
    pub fn new(name: &str) -> Self {
        let first = initials_of(name).chars().next().map(|c| c as u32).unwrap_or(0);
        Self {
            formation: Formation::Ring,
            next_switch: PATTERN_PERIOD_SEC,
            lean: if first % 2 == 1 { 40.0 } else { -40.0 },
            cloud: Vec::new(),
        }
    }

    pub fn formation(&self) -> Formation {
        self.formation
    }

    /// Formation slot `i` of `n`, relative to `center`.
    pub fn target(&self, i: usize, n: usize, center: Vec2) -> Vec2 {
        let t = i as f32 / n.max(1) as f32;
        let angle = t * TAU;
        match self.formation {
            Formation::Ring => {
                center
                    + Vec2::new(
                        angle.cos() * 120.0 + (angle * 3.0).sin() * 18.0,
                        angle.sin() * 120.0 + (angle * 2.0).cos() * 18.0,
                    )
            }
            Formation::Initials => {
                center + Vec2::new(angle.sin() * 110.0 + self.lean, angle.cos() * 60.0)
            }
            Formation::Cloud => center + self.cloud.get(i).copied().unwrap_or(Vec2::ZERO),
        }
    }

    fn scatter(&mut self, n: usize, rng: &mut StdRng) {
        self.cloud = (0..n)
            .map(|_| {
                Vec2::new(
                    rng.gen_range(-CLOUD_HALF.x..CLOUD_HALF.x),
                    rng.gen_range(-CLOUD_HALF.y..CLOUD_HALF.y),
                )
            })
            .collect();
    }
}

impl Effect for Swarm {
    fn name(&self) -> &'static str {
        "swarm"
    }

    fn prepare(&mut self, store: &mut ParticleStore, rng: &mut StdRng) {
        self.scatter(store.len(), rng);
        let center = store.bounds().center();
        for (e, off) in store.entities_mut().iter_mut().zip(&self.cloud) {
            e.position = center + *off;
        }
    }

    fn advance(&mut self, ctx: EffectCtx<'_>) {
        if ctx.tick.now >= self.next_switch {
            self.formation = self.formation.next();
            self.next_switch = ctx.tick.now + PATTERN_PERIOD_SEC;
            if self.formation == Formation::Cloud {
                self.scatter(ctx.store.len(), ctx.rng);
            }
            log::debug!("[swarm] formation {:?}", self.formation);
        }

        let n = ctx.store.len();
        let center = ctx.store.bounds().center();
        let pointer = ctx.influence;
        for (i, e) in ctx.store.entities().iter().enumerate() {
            let mut target = self.target(i, n, center);
            if pointer.engaged {
                let away = e.position - pointer.point;
                let d = away.length();
                if d < SHY_RADIUS {
                    target += away * ((SHY_RADIUS - d) / SHY_RADIUS) * SHY_GAIN;
                }
            }
            let desired = (target - e.position) * SEEK_GAIN;
            if let Some(slot) = ctx.steer.get_mut(i) {
                *slot += (desired - e.velocity) * SEEK_BLEND;
            }
        }
    }

    fn draw_under(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let es = store.entities();
        s.save();
        s.set_alpha(0.18);
        for (i, a) in es.iter().enumerate() {
            for b in &es[i + 1..] {
                if a.position.distance(b.position) < LINK_DISTANCE {
                    s.set_stroke(&a.color, 1.2);
                    s.begin_path();
                    s.move_to(a.position);
                    s.line_to(b.position);
                    s.stroke();
                }
            }
        }
        s.restore();
    }
}
