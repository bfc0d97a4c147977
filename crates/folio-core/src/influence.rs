use crate::store::Bounds;
use glam::Vec2;

/// Pointer-derived input shared between the input adapter (sole writer) and
/// the force step (reader).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExternalInfluence {
    pub point: Vec2,
    pub pressed: bool,
    /// Pointer is over the page and has reported at least one position.
    /// Pointer forces are skipped while this is false.
    pub engaged: bool,
}

impl ExternalInfluence {
    /// Initial value before any pointer event: centre of the surface.
    pub fn at_center(bounds: Bounds) -> Self {
        Self {
            point: bounds.center(),
            pressed: false,
            engaged: false,
        }
    }

    pub fn move_to(&mut self, point: Vec2) {
        if point.is_finite() {
            self.point = point;
            self.engaged = true;
        }
    }

    pub fn release(&mut self) {
        self.pressed = false;
    }

    /// Pointer left the page: forces stop, last position is kept.
    pub fn disengage(&mut self) {
        self.pressed = false;
        self.engaged = false;
    }
}
