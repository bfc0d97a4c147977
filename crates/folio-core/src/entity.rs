//! Simulated entities: particles, orbs, nodes and blocks all share this shape.

use glam::Vec2;

/// Silhouette used by the renderer and by pointer hit-testing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Circle,
    /// Regular polygon with `sides` vertices on the bounding circle.
    Polygon { sides: u8 },
    /// Axis-aligned box. Half-width is the entity radius, half-height is
    /// `radius * aspect`.
    Rectangle { aspect: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
    /// Source text drawn inside the silhouette, one line per `\n`.
    Code(String),
    Category(String),
}

impl Payload {
    pub fn text(&self) -> &str {
        match self {
            Payload::Code(s) | Payload::Category(s) => s,
        }
    }
}

/// Transient pointer state attached to an entity. Written by the input
/// adapter only.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InteractionFlags {
    pub hovered: bool,
    pub dragged: bool,
    /// Scene clock (seconds) of the last click, grab or release.
    pub last_interaction: Option<f64>,
    /// Pointer minus centre at grab time.
    pub drag_offset: Vec2,
    /// Detail overlay toggled by click.
    pub open: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Entity {
    pub position: Vec2,
    pub velocity: Vec2,
    pub radius: f32,
    pub color: String,
    pub alpha: f32,
    pub shape: Shape,
    pub payload: Option<Payload>,
    pub flags: InteractionFlags,
    /// Free-running phase for shimmer/pulse effects.
    pub phase: f32,
}

impl Entity {
    pub fn new(position: Vec2, radius: f32, color: impl Into<String>) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            radius: radius.max(f32::EPSILON),
            color: color.into(),
            alpha: 1.0,
            shape: Shape::Circle,
            payload: None,
            flags: InteractionFlags::default(),
            phase: 0.0,
        }
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.shape = shape;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    #[inline]
    pub fn half_extents(&self) -> Vec2 {
        match self.shape {
            Shape::Rectangle { aspect } => Vec2::new(self.radius, self.radius * aspect),
            _ => Vec2::splat(self.radius),
        }
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.velocity.is_finite()
    }

    /// Pointer hit-test against the silhouette's bounding region.
    pub fn contains(&self, point: Vec2) -> bool {
        match self.shape {
            Shape::Rectangle { .. } => {
                let d = (point - self.position).abs();
                let h = self.half_extents();
                d.x <= h.x && d.y <= h.y
            }
            _ => point.distance(self.position) < self.radius,
        }
    }
}
