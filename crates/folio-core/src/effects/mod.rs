//! Effect presets. Every background runs on the same store/force/render
//! engine; an `Effect` adds the per-background timers, steering and
//! decorations on top.

use crate::error::EngineError;
use crate::forces::{ForceParams, Tick};
use crate::influence::ExternalInfluence;
use crate::input::{InputEvent, InputOptions};
use crate::render::{RenderStyle, Renderer, Surface};
use crate::store::{Bounds, ParticleStore, StoreConfig};
use glam::Vec2;
use rand::rngs::StdRng;
use std::str::FromStr;

pub mod glitch;
pub mod matrix;
pub mod mesh;
pub mod orbs;
pub mod streams;
pub mod swarm;

/// Mutable view handed to `Effect::advance` before the force step runs.
pub struct EffectCtx<'a> {
    pub store: &'a mut ParticleStore,
    pub influence: &'a ExternalInfluence,
    /// Zeroed, one slot per entity; added to the force step's acceleration.
    pub steer: &'a mut [Vec2],
    pub rng: &'a mut StdRng,
    pub tick: Tick,
}

pub trait Effect {
    fn name(&self) -> &'static str;

    /// Runs once after the store is spawned.
    fn prepare(&mut self, _store: &mut ParticleStore, _rng: &mut StdRng) {}

    /// Timers and steering; runs every update before forces.
    fn advance(&mut self, _ctx: EffectCtx<'_>) {}

    /// Sees every drained event after the input adapter has.
    fn on_input(
        &mut self,
        _ev: &InputEvent,
        _store: &mut ParticleStore,
        _rng: &mut StdRng,
        _now: f64,
    ) {
    }

    fn draw_under(&self, _s: &mut dyn Surface, _store: &ParticleStore) {}

    fn draw_entities(&self, s: &mut dyn Surface, store: &ParticleStore, renderer: &Renderer) {
        renderer.draw_entities(s, store.entities());
    }

    fn draw_over(&self, _s: &mut dyn Surface, _store: &ParticleStore) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectKind {
    Orbs,
    Swarm,
    Mesh,
    Glitch,
    Matrix,
    Streams,
}

impl FromStr for EffectKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orbs" | "gravity-orbs" => Ok(EffectKind::Orbs),
            "swarm" | "particle-swarm" => Ok(EffectKind::Swarm),
            "mesh" | "neural-mesh" => Ok(EffectKind::Mesh),
            "glitch" | "glitch-matrix" => Ok(EffectKind::Glitch),
            "matrix" | "particle-matrix" => Ok(EffectKind::Matrix),
            "streams" | "holo-streams" => Ok(EffectKind::Streams),
            other => Err(EngineError::UnknownEffect(other.to_string())),
        }
    }
}

/// Page-supplied knobs shared by all presets.
#[derive(Clone, Debug, Default)]
pub struct PresetOptions {
    /// Owner initials for effects that morph into letters.
    pub initials: Option<String>,
    /// Overrides the preset's entity count.
    pub count: Option<usize>,
}

/// Everything a scene needs to come up.
pub struct Preset {
    pub store: StoreConfig,
    pub forces: ForceParams,
    pub input: InputOptions,
    pub style: RenderStyle,
    pub effect: Box<dyn Effect>,
}

pub fn preset(kind: EffectKind, bounds: Bounds, opts: &PresetOptions) -> Preset {
    let mut p = match kind {
        EffectKind::Orbs => orbs::preset(bounds),
        EffectKind::Swarm => swarm::preset(bounds, opts),
        EffectKind::Mesh => mesh::preset(bounds, opts),
        EffectKind::Glitch => glitch::preset(bounds),
        EffectKind::Matrix => matrix::preset(bounds),
        EffectKind::Streams => streams::preset(bounds),
    };
    if let Some(n) = opts.count {
        p.store.count = n;
    }
    p
}

pub(crate) fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

/// Initials of a display name: first letter of each word, uppercased.
pub fn initials_of(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_effect_names() {
        assert_eq!("orbs".parse::<EffectKind>().unwrap(), EffectKind::Orbs);
        assert_eq!(" Neural-Mesh ".parse::<EffectKind>().unwrap(), EffectKind::Mesh);
        assert_eq!(
            "plasma".parse::<EffectKind>().unwrap_err(),
            EngineError::UnknownEffect("plasma".into())
        );
    }

    #[test]
    fn initials_take_first_letters() {
        assert_eq!(initials_of("farhan kabir"), "FK");
        assert_eq!(initials_of("  "), "");
    }

    #[test]
    fn every_preset_validates() {
        let b = Bounds::new(800.0, 400.0);
        for kind in [
            EffectKind::Orbs,
            EffectKind::Swarm,
            EffectKind::Mesh,
            EffectKind::Glitch,
            EffectKind::Matrix,
            EffectKind::Streams,
        ] {
            let p = preset(kind, b, &PresetOptions::default());
            p.store.validate().unwrap();
            p.forces.validate().unwrap();
        }
    }
}
