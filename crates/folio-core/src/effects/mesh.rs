//! Neural mesh: fixed nodes joined by random synapses that carry data
//! packets. Clicks pulse a random subset of nodes.

use super::{palette, Effect, EffectCtx, Preset, PresetOptions};
use crate::boundary::BoundaryPolicy;
use crate::constants::HOLO_CYAN;
use crate::forces::ForceParams;
use crate::input::{InputEvent, InputOptions};
use crate::render::{RenderStyle, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use fnv::FnvHashSet;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::Rng;
use smallvec::SmallVec;

pub const NODE_COUNT: usize = 18;
pub const CONNECTIONS_PER_NODE: usize = 3;
pub const PACKET_STEP_SEC: f32 = 0.03;
pub const PACKET_SPAWN_CHANCE: f64 = 0.25;
pub const PULSE_CHANCE: f64 = 0.4;
pub const PULSE_SEC: f64 = 0.4;
pub const MORPH_AT_SEC: f64 = 1.2;

const NODE_RADIUS: f32 = 8.0;
const PULSE_RADIUS: f32 = 13.0;
const NODE_ALPHA: f32 = 0.4;
const PULSE_ALPHA: f32 = 0.7;

pub fn preset(bounds: Bounds, opts: &PresetOptions) -> Preset {
    Preset {
        store: StoreConfig {
            count: NODE_COUNT,
            bounds,
            min_size: NODE_RADIUS,
            max_size: NODE_RADIUS,
            palette: palette(&[HOLO_CYAN]),
            max_initial_speed: 0.0,
        },
        forces: ForceParams {
            friction: 0.9,
            boundary: BoundaryPolicy::reflect(0.5),
            ..ForceParams::default()
        },
        input: InputOptions::default(),
        style: RenderStyle {
            glow: 8.0,
            alpha: 1.0,
            draw_payload: false,
        },
        effect: Box::new(NeuralMesh::new(opts.initials.is_some())),
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Packet {
    pub from: usize,
    pub to: usize,
    pub t: f32,
}

#[derive(Debug)]
pub struct NeuralMesh {
    links: Vec<SmallVec<[usize; CONNECTIONS_PER_NODE]>>,
    packets: Vec<Packet>,
    step_acc: f32,
    pulse: Vec<bool>,
    pulse_until: f64,
    morph: bool,
}

impl NeuralMesh {
    pub fn new(morph: bool) -> Self {
        Self {
            links: Vec::new(),
            packets: Vec::new(),
            step_acc: 0.0,
            pulse: Vec::new(),
            pulse_until: 0.0,
            morph,
        }
    }

    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.links
            .iter()
            .enumerate()
            .flat_map(|(from, ts)| ts.iter().map(move |&to| (from, to)))
    }

    pub fn packets(&self) -> &[Packet] {
        &self.packets
    }

    fn wire(&mut self, n: usize, rng: &mut StdRng) {
        let per = CONNECTIONS_PER_NODE.min(n.saturating_sub(1));
        self.links = (0..n)
            .map(|i| {
                let mut picked = FnvHashSet::default();
                let mut out = SmallVec::new();
                while out.len() < per {
                    let t = rng.gen_range(0..n);
                    if t != i && picked.insert(t) {
                        out.push(t);
                    }
                }
                out
            })
            .collect();
    }

    fn step_packets(&mut self, rng: &mut StdRng) {
        for p in &mut self.packets {
            p.t += PACKET_STEP_SEC;
        }
        self.packets.retain(|p| p.t < 1.0);
        if rng.gen_bool(PACKET_SPAWN_CHANCE) {
            let total: usize = self.links.iter().map(|l| l.len()).sum();
            if total > 0 {
                let pick = rng.gen_range(0..total);
                let picked = self.links().nth(pick);
                if let Some((from, to)) = picked {
                    self.packets.push(Packet { from, to, t: 0.0 });
                }
            }
        }
    }
}

impl Effect for NeuralMesh {
    fn name(&self) -> &'static str {
        "mesh"
    }

    fn prepare(&mut self, store: &mut ParticleStore, rng: &mut StdRng) {
        self.wire(store.len(), rng);
        self.pulse = vec![false; store.len()];
        for e in store.entities_mut() {
            e.alpha = NODE_ALPHA;
        }
    }

    fn advance(&mut self, ctx: EffectCtx<'_>) {
        let now = ctx.tick.now;
        if self.morph && now >= MORPH_AT_SEC {
            self.morph = false;
            let c = ctx.store.bounds().center();
            for (i, e) in ctx.store.entities_mut().iter_mut().take(2).enumerate() {
                let dx = if i == 0 { -30.0 } else { 30.0 };
                e.position = c + Vec2::new(dx, 0.0);
                e.velocity = Vec2::ZERO;
            }
        }

        if self.pulse_until > 0.0 && now >= self.pulse_until {
            self.pulse_until = 0.0;
            self.pulse.iter_mut().for_each(|p| *p = false);
        }
        for (e, &on) in ctx.store.entities_mut().iter_mut().zip(&self.pulse) {
            e.radius = if on { PULSE_RADIUS } else { NODE_RADIUS };
            e.alpha = if on { PULSE_ALPHA } else { NODE_ALPHA };
        }

        self.step_acc += ctx.tick.dt * ctx.tick.speed;
        while self.step_acc >= PACKET_STEP_SEC {
            self.step_acc -= PACKET_STEP_SEC;
            self.step_packets(ctx.rng);
        }
    }

    fn on_input(&mut self, ev: &InputEvent, _store: &mut ParticleStore, rng: &mut StdRng, now: f64) {
        if let InputEvent::Click(_) = ev {
            for p in &mut self.pulse {
                *p = rng.gen_bool(PULSE_CHANCE);
            }
            self.pulse_until = now + PULSE_SEC;
        }
    }

    fn draw_under(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let es = store.entities();
        s.save();
        s.set_alpha(0.18);
        s.set_stroke(HOLO_CYAN, 1.5);
        s.begin_path();
        for (from, to) in self.links() {
            if let (Some(a), Some(b)) = (es.get(from), es.get(to)) {
                s.move_to(a.position);
                s.line_to(b.position);
            }
        }
        s.stroke();
        s.restore();
    }

    fn draw_over(&self, s: &mut dyn Surface, store: &ParticleStore) {
        let es = store.entities();
        s.save();
        s.set_alpha(0.7);
        s.set_fill(HOLO_CYAN);
        s.set_glow(HOLO_CYAN, 8.0);
        for p in &self.packets {
            if let (Some(a), Some(b)) = (es.get(p.from), es.get(p.to)) {
                s.begin_path();
                s.arc(a.position.lerp(b.position, p.t), 4.0);
                s.fill();
            }
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

    fn setup(initials: Option<&str>) -> (ParticleStore, StdRng, NeuralMesh) {
        let opts = PresetOptions {
            initials: initials.map(String::from),
            ..PresetOptions::default()
        };
        let p = preset(Bounds::new(800.0, 400.0), &opts);
        let mut rng = StdRng::seed_from_u64(21);
        let mut store = ParticleStore::spawn(&p.store, &mut rng).unwrap();
        let mut fx = NeuralMesh::new(opts.initials.is_some());
        fx.prepare(&mut store, &mut rng);
        (store, rng, fx)
    }

    fn advance(fx: &mut NeuralMesh, store: &mut ParticleStore, rng: &mut StdRng, dt: f32, now: f64) {
        let inf = ExternalInfluence::at_center(store.bounds());
        let mut steer = vec![Vec2::ZERO; store.len()];
        fx.advance(EffectCtx {
            store,
            influence: &inf,
            steer: &mut steer,
            rng,
            tick: Tick { dt, speed: 1.0, now },
        });
    }

    #[test]
    fn every_node_has_distinct_links() {
        let (_, _, fx) = setup(None);
        assert_eq!(fx.links().count(), NODE_COUNT * CONNECTIONS_PER_NODE);
        for (i, ts) in fx.links.iter().enumerate() {
            let uniq: FnvHashSet<_> = ts.iter().collect();
            assert_eq!(uniq.len(), ts.len());
            assert!(!ts.contains(&i));
        }
    }

    #[test]
    fn packets_travel_and_expire() {
        let (mut store, mut rng, mut fx) = setup(None);
        let mut now = 0.0;
        for _ in 0..200 {
            now += 0.03;
            advance(&mut fx, &mut store, &mut rng, 0.03, now);
            assert!(fx.packets().iter().all(|p| p.t >= 0.0 && p.t < 1.0));
        }
        assert!(!fx.packets().is_empty());
    }

    #[test]
    fn click_pulses_then_settles() {
        let (mut store, mut rng, mut fx) = setup(None);
        fx.pulse = vec![true; store.len()];
        fx.pulse_until = 1.4;
        advance(&mut fx, &mut store, &mut rng, 0.016, 1.0);
        assert!(store.entities().iter().all(|e| e.radius == PULSE_RADIUS));
        advance(&mut fx, &mut store, &mut rng, 0.016, 1.5);
        assert!(store.entities().iter().all(|e| e.radius == NODE_RADIUS));

        fx.on_input(&InputEvent::Click(Vec2::ZERO), &mut store, &mut rng, 2.0);
        assert_eq!(fx.pulse_until, 2.4);
    }

    #[test]
    fn initials_morph_first_two_nodes() {
        let (mut store, mut rng, mut fx) = setup(Some("FK"));
        advance(&mut fx, &mut store, &mut rng, 0.016, 0.5);
        assert_ne!(store.entities()[0].position, Vec2::new(370.0, 200.0));
        advance(&mut fx, &mut store, &mut rng, 0.016, 1.3);
        assert_eq!(store.entities()[0].position, Vec2::new(370.0, 200.0));
        assert_eq!(store.entities()[1].position, Vec2::new(430.0, 200.0));
    }
}
