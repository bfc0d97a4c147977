//! One mounted background: the store plus everything that moves and draws it.

use crate::constants::MAX_FRAME_DT;
use crate::effects::{Effect, EffectCtx, Preset};
use crate::error::EngineError;
use crate::forces::{ForceStep, Tick};
use crate::influence::ExternalInfluence;
use crate::input::{InputAdapter, InputEvent, SpeedControl};
use crate::render::{Renderer, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct Scene {
    store: ParticleStore,
    spawn: StoreConfig,
    forces: ForceStep,
    influence: ExternalInfluence,
    input: InputAdapter,
    speed: SpeedControl,
    renderer: Renderer,
    effect: Box<dyn Effect>,
    rng: StdRng,
    steer: Vec<Vec2>,
    clock: f64,
}

impl Scene {
    pub fn new(preset: Preset, seed: u64) -> Result<Self, EngineError> {
        let Preset {
            store,
            forces,
            input,
            style,
            mut effect,
        } = preset;
        let mut rng = StdRng::seed_from_u64(seed);
        let forces = ForceStep::new(forces)?;
        let spawn = store;
        let mut store = ParticleStore::spawn(&spawn, &mut rng)?;
        effect.prepare(&mut store, &mut rng);
        log::info!("[mount] {} with {} entities", effect.name(), store.len());
        Ok(Self {
            influence: ExternalInfluence::at_center(store.bounds()),
            store,
            spawn,
            forces,
            input: InputAdapter::new(input),
            speed: SpeedControl::default(),
            renderer: Renderer::new(style),
            effect,
            rng,
            steer: Vec::new(),
            clock: 0.0,
        })
    }

    pub fn name(&self) -> &'static str {
        self.effect.name()
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParticleStore {
        &mut self.store
    }

    pub fn influence(&self) -> &ExternalInfluence {
        &self.influence
    }

    pub fn speed(&self) -> f32 {
        self.speed.value()
    }

    /// Scene time in seconds, advanced by clamped and speed-scaled deltas.
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Rescales the layout to the new surface. A store first laid out in a
    /// collapsed box holds no usable arrangement, so it is spawned afresh.
    pub fn resize(&mut self, bounds: Bounds) {
        if !bounds.is_valid() || bounds.is_collapsed() || !self.store.bounds().is_collapsed() {
            self.store.resize(bounds);
            return;
        }
        let config = StoreConfig {
            bounds,
            ..self.spawn.clone()
        };
        match ParticleStore::spawn(&config, &mut self.rng) {
            Ok(mut store) => {
                self.effect.prepare(&mut store, &mut self.rng);
                self.influence = ExternalInfluence::at_center(bounds);
                self.store = store;
                self.spawn = config;
                log::debug!("[mount] {} respawned at {}x{}", self.effect.name(), bounds.width, bounds.height);
            }
            Err(e) => {
                log::warn!("[mount] respawn failed: {}", e);
                self.store.resize(bounds);
            }
        }
    }

    /// Feeds drained events to the adapter and effect. Returns the new speed
    /// multiplier when a key command changed it.
    pub fn apply_input<I>(&mut self, events: I) -> Option<f32>
    where
        I: IntoIterator<Item = InputEvent>,
    {
        let mut changed = None;
        for ev in events {
            if let InputEvent::Key(cmd) = ev {
                let before = self.speed.value();
                let after = self.speed.apply(cmd);
                if after != before {
                    log::info!("[keys] speed {:.1}", after);
                    changed = Some(after);
                }
                continue;
            }
            self.input
                .handle(&ev, &mut self.store, &mut self.influence, self.clock);
            self.effect
                .on_input(&ev, &mut self.store, &mut self.rng, self.clock);
        }
        changed
    }

    /// Advances effect timers and physics by `dt` seconds. Non-finite or
    /// negative deltas advance nothing; long gaps are clamped.
    pub fn update(&mut self, dt: f32) {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let speed = self.speed.value();
        self.clock += f64::from(dt * speed);
        let tick = Tick {
            dt,
            speed,
            now: self.clock,
        };

        self.steer.clear();
        self.steer.resize(self.store.len(), Vec2::ZERO);
        self.effect.advance(EffectCtx {
            store: &mut self.store,
            influence: &self.influence,
            steer: &mut self.steer,
            rng: &mut self.rng,
            tick,
        });
        self.forces
            .apply(&mut self.store, &self.influence, tick, &self.steer);
    }

    pub fn render(&self, s: &mut dyn Surface) {
        s.clear();
        self.effect.draw_under(s, &self.store);
        self.effect.draw_entities(s, &self.store, &self.renderer);
        self.effect.draw_over(s, &self.store);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::{preset, EffectKind, PresetOptions};
    use crate::input::KeyCommand;

    fn scene(kind: EffectKind) -> Scene {
        let p = preset(kind, Bounds::new(800.0, 400.0), &PresetOptions::default());
        Scene::new(p, 42).unwrap()
    }

    #[test]
    fn key_commands_change_speed_and_report_it() {
        let mut s = scene(EffectKind::Orbs);
        let changed = s.apply_input([
            InputEvent::Key(KeyCommand::SpeedUp),
            InputEvent::Key(KeyCommand::SpeedUp),
        ]);
        assert_eq!(changed, Some(1.2));
        assert!((s.speed() - 1.2).abs() < 1e-6);
    }

    #[test]
    fn scene_mounted_in_collapsed_box_spreads_out_after_layout() {
        for kind in [EffectKind::Mesh, EffectKind::Glitch] {
            let p = preset(kind, Bounds::new(1.0, 1.0), &PresetOptions::default());
            let mut s = Scene::new(p, 7).unwrap();
            s.resize(Bounds::new(800.0, 400.0));
            for _ in 0..600 {
                s.update(1.0 / 60.0);
            }
            let xs: Vec<f32> = s.store().entities().iter().map(|e| e.position.x).collect();
            let spread = xs.iter().cloned().fold(f32::MIN, f32::max)
                - xs.iter().cloned().fold(f32::MAX, f32::min);
            assert!(spread > 200.0, "{kind:?} spread {spread}");
            assert_eq!(s.store().bounds(), Bounds::new(800.0, 400.0));
        }
    }

    #[test]
    fn ordinary_resize_keeps_the_layout() {
        let mut s = scene(EffectKind::Mesh);
        let before: Vec<Vec2> = s.store().entities().iter().map(|e| e.position).collect();
        s.resize(Bounds::new(1600.0, 800.0));
        for (e, p) in s.store().entities().iter().zip(before) {
            assert!((e.position - p * 2.0).length() < 1e-3);
        }
    }

    #[test]
    fn clock_follows_clamped_scaled_dt() {
        let mut s = scene(EffectKind::Swarm);
        s.update(1.0);
        assert!((s.clock() - f64::from(MAX_FRAME_DT)).abs() < 1e-9);
        s.update(f32::NAN);
        s.update(-1.0);
        assert!((s.clock() - f64::from(MAX_FRAME_DT)).abs() < 1e-9);
    }

    #[test]
    fn zero_dt_changes_nothing() {
        let mut s = scene(EffectKind::Matrix);
        let before: Vec<_> = s.store().entities().iter().map(|e| e.position).collect();
        s.update(0.0);
        let after: Vec<_> = s.store().entities().iter().map(|e| e.position).collect();
        assert_eq!(before, after);
    }
}
