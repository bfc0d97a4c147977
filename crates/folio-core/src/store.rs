use crate::constants::MIN_LAYOUT_PX;
use crate::entity::Entity;
use crate::error::EngineError;
use glam::Vec2;
use rand::Rng;

/// Drawing-surface extent in local pixel coordinates; origin top-left.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x <= self.width && p.y <= self.height
    }

    /// True for a box too small to have come from a real layout, such as a
    /// canvas measured while its section was hidden.
    pub fn is_collapsed(&self) -> bool {
        self.width < MIN_LAYOUT_PX || self.height < MIN_LAYOUT_PX
    }

    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Clone, Debug)]
pub struct StoreConfig {
    pub count: usize,
    pub bounds: Bounds,
    pub min_size: f32,
    pub max_size: f32,
    pub palette: Vec<String>,
    /// Initial velocity components are drawn from `[-v, v]`.
    pub max_initial_speed: f32,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.bounds.is_valid() {
            return Err(EngineError::InvalidStore("bounds must be positive"));
        }
        if !(self.min_size > 0.0) {
            return Err(EngineError::InvalidStore("min_size must be positive"));
        }
        if self.max_size < self.min_size {
            return Err(EngineError::InvalidStore("max_size below min_size"));
        }
        if self.palette.is_empty() {
            return Err(EngineError::InvalidStore("palette is empty"));
        }
        if !(self.max_initial_speed >= 0.0) {
            return Err(EngineError::InvalidStore("max_initial_speed must be >= 0"));
        }
        Ok(())
    }
}

/// Ordered, exclusively owned entity collection for one mounted effect.
#[derive(Clone, Debug)]
pub struct ParticleStore {
    entities: Vec<Entity>,
    bounds: Bounds,
}

impl ParticleStore {
    /// Randomized spawn. Entities that fit are placed fully inside the bounds.
    pub fn spawn(config: &StoreConfig, rng: &mut impl Rng) -> Result<Self, EngineError> {
        config.validate()?;
        let b = config.bounds;
        let entities = (0..config.count)
            .map(|i| {
                let radius = if config.max_size > config.min_size {
                    rng.gen_range(config.min_size..config.max_size)
                } else {
                    config.min_size
                };
                let x = sample_axis(rng, radius, b.width);
                let y = sample_axis(rng, radius, b.height);
                let v = config.max_initial_speed;
                let velocity = if v > 0.0 {
                    Vec2::new(rng.gen_range(-v..=v), rng.gen_range(-v..=v))
                } else {
                    Vec2::ZERO
                };
                let color = config.palette[i % config.palette.len()].clone();
                Entity::new(Vec2::new(x, y), radius, color).with_velocity(velocity)
            })
            .collect();
        Ok(Self { entities, bounds: b })
    }

    pub fn from_entities(entities: Vec<Entity>, bounds: Bounds) -> Self {
        Self { entities, bounds }
    }

    #[inline]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[inline]
    pub fn entities_mut(&mut self) -> &mut [Entity] {
        &mut self.entities
    }

    /// Bulk replace. The collection is swapped wholesale, never patched.
    pub fn replace_all(&mut self, entities: Vec<Entity>) {
        self.entities = entities;
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Surface resized: positions are rescaled so the layout keeps its shape.
    pub fn resize(&mut self, bounds: Bounds) {
        if !bounds.is_valid() || bounds == self.bounds {
            return;
        }
        let scale = bounds.size() / self.bounds.size();
        for e in &mut self.entities {
            e.position *= scale;
        }
        self.bounds = bounds;
    }
}

fn sample_axis(rng: &mut impl Rng, radius: f32, extent: f32) -> f32 {
    if extent > radius * 2.0 {
        rng.gen_range(radius..extent - radius)
    } else {
        extent * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config() -> StoreConfig {
        StoreConfig {
            count: 40,
            bounds: Bounds::new(800.0, 400.0),
            min_size: 4.0,
            max_size: 9.0,
            palette: vec!["#00fff7".into(), "#39ff14".into()],
            max_initial_speed: 0.5,
        }
    }

    #[test]
    fn spawn_respects_config() {
        let mut rng = StdRng::seed_from_u64(7);
        let store = ParticleStore::spawn(&config(), &mut rng).unwrap();
        assert_eq!(store.len(), 40);
        for (i, e) in store.entities().iter().enumerate() {
            assert!(e.radius >= 4.0 && e.radius < 9.0);
            assert!(e.position.x >= e.radius && e.position.x <= 800.0 - e.radius);
            assert!(e.position.y >= e.radius && e.position.y <= 400.0 - e.radius);
            assert!(e.velocity.x.abs() <= 0.5 && e.velocity.y.abs() <= 0.5);
            assert_eq!(e.color, config().palette[i % 2]);
        }
    }

    #[test]
    fn spawn_rejects_empty_palette() {
        let mut cfg = config();
        cfg.palette.clear();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            ParticleStore::spawn(&cfg, &mut rng).unwrap_err(),
            EngineError::InvalidStore("palette is empty")
        );
    }

    #[test]
    fn spawn_rejects_inverted_sizes() {
        let mut cfg = config();
        cfg.max_size = 1.0;
        let mut rng = StdRng::seed_from_u64(1);
        assert!(ParticleStore::spawn(&cfg, &mut rng).is_err());
    }

    #[test]
    fn oversized_entities_spawn_at_center() {
        let mut cfg = config();
        cfg.bounds = Bounds::new(10.0, 10.0);
        cfg.min_size = 20.0;
        cfg.max_size = 20.0;
        let mut rng = StdRng::seed_from_u64(3);
        let store = ParticleStore::spawn(&cfg, &mut rng).unwrap();
        assert!(store.entities().iter().all(|e| e.position == Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn resize_rescales_positions() {
        let e = Entity::new(Vec2::new(400.0, 200.0), 5.0, "#fff");
        let mut store = ParticleStore::from_entities(vec![e], Bounds::new(800.0, 400.0));
        store.resize(Bounds::new(400.0, 800.0));
        assert_eq!(store.entities()[0].position, Vec2::new(200.0, 400.0));
        assert_eq!(store.bounds(), Bounds::new(400.0, 800.0));
    }
}
