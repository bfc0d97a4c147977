use crate::entity::Entity;
use crate::store::Bounds;

/// Edge behaviour. One policy per scene, applied to every entity each frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BoundaryPolicy {
    /// Leaving one edge re-enters from the opposite edge at the same
    /// perpendicular coordinate.
    Wrap,
    /// Falls through top and bottom like `Wrap`; the side edges hold the
    /// silhouette inside and stop sideways motion.
    WrapVertical,
    /// Entity silhouette stays inside the bounds. The normal velocity
    /// component flips sign and is scaled by the per-axis restitution.
    Reflect { restitution_x: f32, restitution_y: f32 },
}

impl BoundaryPolicy {
    pub const fn reflect(restitution: f32) -> Self {
        BoundaryPolicy::Reflect {
            restitution_x: restitution,
            restitution_y: restitution,
        }
    }

    pub fn apply(&self, e: &mut Entity, bounds: Bounds) {
        match *self {
            BoundaryPolicy::Wrap => {
                e.position.x = wrap_axis(e.position.x, bounds.width);
                e.position.y = wrap_axis(e.position.y, bounds.height);
            }
            BoundaryPolicy::WrapVertical => {
                let half = e.half_extents();
                reflect_axis(&mut e.position.x, &mut e.velocity.x, half.x, bounds.width, 0.0);
                e.position.y = wrap_axis(e.position.y, bounds.height);
            }
            BoundaryPolicy::Reflect {
                restitution_x,
                restitution_y,
            } => {
                let half = e.half_extents();
                reflect_axis(
                    &mut e.position.x,
                    &mut e.velocity.x,
                    half.x,
                    bounds.width,
                    restitution_x,
                );
                reflect_axis(
                    &mut e.position.y,
                    &mut e.velocity.y,
                    half.y,
                    bounds.height,
                    restitution_y,
                );
            }
        }
    }
}

#[inline]
fn wrap_axis(p: f32, extent: f32) -> f32 {
    if p >= 0.0 && p < extent {
        return p;
    }
    let w = p.rem_euclid(extent);
    // rem_euclid may round up to `extent` for tiny negative inputs
    if w >= extent {
        0.0
    } else {
        w
    }
}

#[inline]
fn reflect_axis(p: &mut f32, v: &mut f32, half: f32, extent: f32, restitution: f32) {
    let (lo, hi) = if extent > half * 2.0 {
        (half, extent - half)
    } else {
        (extent * 0.5, extent * 0.5)
    };
    if *p < lo {
        *p = lo;
        if *v < 0.0 {
            *v = -*v * restitution;
        }
    } else if *p > hi {
        *p = hi;
        if *v > 0.0 {
            *v = -*v * restitution;
        }
    }
}
