//! Per-frame force/update step shared by every effect.
//!
//! Order per frame: pairwise interaction, pointer interaction, passive
//! force, integration, boundary handling, then a collision pass over the
//! whole store. Accelerations are computed from a snapshot of positions
//! before any entity moves, so the result does not depend on entity order.

use crate::boundary::BoundaryPolicy;
use crate::collision::resolve_collisions;
use crate::constants::*;
use crate::entity::Entity;
use crate::error::EngineError;
use crate::grid::SpatialGrid;
use crate::influence::ExternalInfluence;
use crate::store::ParticleStore;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PairwiseParams {
    pub cluster_radius: f32,
    pub disperse_radius: f32,
    /// Acceleration per px of offset toward neighbours inside the cluster radius.
    pub cluster_strength: f32,
    /// Acceleration per px of offset away from neighbours in the disperse band.
    pub disperse_strength: f32,
}

impl Default for PairwiseParams {
    fn default() -> Self {
        Self {
            cluster_radius: CLUSTER_RADIUS,
            disperse_radius: DISPERSE_RADIUS,
            cluster_strength: 0.0005,
            disperse_strength: 0.0001,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerParams {
    pub radius: f32,
    /// Pressed pointer pulls with `attract * (radius - distance)`.
    pub attract: f32,
    /// Released pointer pushes with `repel * (radius - distance)`.
    pub repel: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceParams {
    pub pairwise: Option<PairwiseParams>,
    pub pointer: Option<PointerParams>,
    /// Constant acceleration (gravity or drift).
    pub passive: Vec2,
    pub friction: f32,
    pub boundary: BoundaryPolicy,
    /// Fraction of penetration corrected per frame; `None` disables collisions.
    pub collision: Option<f32>,
    /// Hovered and recently touched entities move faster.
    pub interaction_boost: bool,
    pub max_speed: f32,
}

impl Default for ForceParams {
    fn default() -> Self {
        Self {
            pairwise: None,
            pointer: None,
            passive: Vec2::ZERO,
            friction: DEFAULT_FRICTION,
            boundary: BoundaryPolicy::Wrap,
            collision: None,
            interaction_boost: false,
            max_speed: MAX_SPEED,
        }
    }
}

impl ForceParams {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(EngineError::InvalidForces("friction must be in (0, 1)"));
        }
        if !(self.max_speed > 0.0) {
            return Err(EngineError::InvalidForces("max_speed must be positive"));
        }
        if !self.passive.is_finite() {
            return Err(EngineError::InvalidForces("passive force must be finite"));
        }
        if let Some(p) = self.pairwise {
            if !(p.cluster_radius > 0.0 && p.disperse_radius >= p.cluster_radius) {
                return Err(EngineError::InvalidForces(
                    "pairwise radii must satisfy 0 < cluster <= disperse",
                ));
            }
        }
        if let Some(p) = self.pointer {
            if !(p.radius > 0.0) {
                return Err(EngineError::InvalidForces("pointer radius must be positive"));
            }
        }
        if let BoundaryPolicy::Reflect {
            restitution_x,
            restitution_y,
        } = self.boundary
        {
            if !(0.0..=1.0).contains(&restitution_x) || !(0.0..=1.0).contains(&restitution_y) {
                return Err(EngineError::InvalidForces("restitution must be in [0, 1]"));
            }
        }
        if let Some(c) = self.collision {
            if !(c > 0.0 && c <= 1.0) {
                return Err(EngineError::InvalidForces("collision correction must be in (0, 1]"));
            }
        }
        Ok(())
    }
}

/// Timing for one update. `k` is the number of 60 Hz frames this update
/// stands for, already scaled by the global speed multiplier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    pub dt: f32,
    pub speed: f32,
    /// Scene clock in seconds at the end of this update.
    pub now: f64,
}

impl Tick {
    #[inline]
    pub fn k(&self) -> f32 {
        (self.dt * FRAMES_PER_SEC * self.speed).max(0.0)
    }
}

/// Owns the per-frame scratch buffers so stepping does not allocate.
pub struct ForceStep {
    pub params: ForceParams,
    accel: Vec<Vec2>,
    grid: SpatialGrid,
}

impl ForceStep {
    pub fn new(params: ForceParams) -> Result<Self, EngineError> {
        params.validate()?;
        let cell = params
            .pairwise
            .map(|p| p.disperse_radius)
            .unwrap_or(DISPERSE_RADIUS);
        Ok(Self {
            params,
            accel: Vec::new(),
            grid: SpatialGrid::new(cell),
        })
    }

    /// Advance the store by one tick. `steer` holds optional per-entity
    /// accelerations supplied by the effect; it may be empty.
    pub fn apply(
        &mut self,
        store: &mut ParticleStore,
        influence: &ExternalInfluence,
        tick: Tick,
        steer: &[Vec2],
    ) {
        let k = tick.k();
        let bounds = store.bounds();
        let p = self.params;

        self.accel.clear();
        self.accel.resize(store.len(), Vec2::ZERO);

        if let Some(pw) = p.pairwise {
            pairwise_accel(store.entities(), &pw, &mut self.grid, &mut self.accel);
        }

        for (i, e) in store.entities_mut().iter_mut().enumerate() {
            let mut a = self.accel[i] + p.passive;
            if let Some(s) = steer.get(i) {
                a += *s;
            }
            if let Some(ptr) = p.pointer {
                if influence.engaged {
                    a += pointer_accel(e.position, influence, &ptr);
                }
            }

            if e.flags.dragged {
                e.velocity = Vec2::ZERO;
            } else {
                e.velocity += a * k;
                e.velocity *= p.friction.powf(k);
                e.velocity = e.velocity.clamp_length_max(p.max_speed);
                let boost = if p.interaction_boost {
                    interaction_boost(e, tick.now)
                } else {
                    1.0
                };
                e.position += e.velocity * k * boost;
            }

            p.boundary.apply(e, bounds);

            if !e.is_finite() {
                log::warn!("[physics] non-finite entity {} reset to centre", i);
                e.position = bounds.center();
                e.velocity = Vec2::ZERO;
            }
        }

        if let Some(c) = p.collision {
            resolve_collisions(store.entities_mut(), c, k);
        }
    }
}

fn pairwise_accel(
    entities: &[Entity],
    pw: &PairwiseParams,
    grid: &mut SpatialGrid,
    out: &mut [Vec2],
) {
    grid.rebuild(entities.iter().map(|e| &e.position));
    for (i, e) in entities.iter().enumerate() {
        let mut a = Vec2::ZERO;
        grid.for_each_near(e.position, pw.disperse_radius, |j| {
            if j == i {
                return;
            }
            let offset = entities[j].position - e.position;
            let d = offset.length();
            if d < pw.cluster_radius {
                a += offset * pw.cluster_strength;
            } else if d < pw.disperse_radius {
                a -= offset * pw.disperse_strength;
            }
        });
        out[i] += a;
    }
}

#[inline]
fn pointer_accel(pos: Vec2, influence: &ExternalInfluence, ptr: &PointerParams) -> Vec2 {
    let to_pointer = influence.point - pos;
    let d = to_pointer.length();
    if d >= ptr.radius || d < 1e-4 {
        return Vec2::ZERO;
    }
    let dir = to_pointer / d;
    let falloff = ptr.radius - d;
    if influence.pressed {
        dir * falloff * ptr.attract
    } else {
        -dir * falloff * ptr.repel
    }
}

/// Displacement multiplier for entities the user is playing with.
pub fn interaction_boost(e: &Entity, now: f64) -> f32 {
    if e.flags.dragged {
        return BOOST_DRAGGED;
    }
    if e.flags.hovered {
        return BOOST_HOVERED;
    }
    match e.flags.last_interaction {
        Some(t) if now - t < BOOST_RECENT_WINDOW_SEC && now >= t => {
            (BOOST_RECENT - (now - t) as f32).max(1.0)
        }
        _ => 1.0,
    }
}
