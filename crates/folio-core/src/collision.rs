use crate::entity::Entity;
use glam::Vec2;

/// Soft, iterative overlap resolution. Each overlapping pair receives an
/// opposing velocity nudge of `correction * penetration * k` along the
/// centre line, split so the smaller entity takes the larger share. A
/// dragged entity is pinned and its partner absorbs the whole nudge.
pub fn resolve_collisions(entities: &mut [Entity], correction: f32, k: f32) {
    if k <= 0.0 || correction <= 0.0 {
        return;
    }
    let n = entities.len();
    for i in 0..n {
        for j in (i + 1)..n {
            let (head, tail) = entities.split_at_mut(j);
            let a = &mut head[i];
            let b = &mut tail[0];
            let delta = a.position - b.position;
            let dist = delta.length();
            let reach = a.radius + b.radius;
            if dist >= reach {
                continue;
            }
            let normal = if dist > 1e-4 { delta / dist } else { Vec2::X };
            let push = normal * (reach - dist) * correction * k;
            let (wa, wb) = match (a.flags.dragged, b.flags.dragged) {
                (true, true) => continue,
                (true, false) => (0.0, 1.0),
                (false, true) => (1.0, 0.0),
                (false, false) => (b.radius / reach, a.radius / reach),
            };
            a.velocity += push * wa;
            b.velocity -= push * wb;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlapping_pair_is_pushed_apart() {
        let mut es = vec![
            Entity::new(Vec2::new(0.0, 0.0), 10.0, "#fff"),
            Entity::new(Vec2::new(15.0, 0.0), 10.0, "#fff"),
        ];
        resolve_collisions(&mut es, 0.05, 1.0);
        assert!(es[0].velocity.x < 0.0);
        assert!(es[1].velocity.x > 0.0);
        assert!((es[0].velocity.x + es[1].velocity.x).abs() < 1e-6);
        assert_eq!(es[0].velocity.y, 0.0);
    }

    #[test]
    fn smaller_entity_takes_larger_share() {
        let mut es = vec![
            Entity::new(Vec2::new(0.0, 0.0), 30.0, "#fff"),
            Entity::new(Vec2::new(35.0, 0.0), 10.0, "#fff"),
        ];
        resolve_collisions(&mut es, 0.05, 1.0);
        assert!(es[1].velocity.x.abs() > es[0].velocity.x.abs());
    }

    #[test]
    fn dragged_entity_is_pinned() {
        let mut es = vec![
            Entity::new(Vec2::new(0.0, 0.0), 10.0, "#fff"),
            Entity::new(Vec2::new(5.0, 0.0), 10.0, "#fff"),
        ];
        es[0].flags.dragged = true;
        resolve_collisions(&mut es, 0.05, 1.0);
        assert_eq!(es[0].velocity, Vec2::ZERO);
        assert!((es[1].velocity.x - 0.75).abs() < 1e-5);
    }

    #[test]
    fn zero_delta_changes_nothing() {
        let mut es = vec![
            Entity::new(Vec2::new(0.0, 0.0), 10.0, "#fff"),
            Entity::new(Vec2::new(0.0, 0.0), 10.0, "#fff"),
        ];
        resolve_collisions(&mut es, 0.05, 0.0);
        assert!(es.iter().all(|e| e.velocity == Vec2::ZERO));
    }
}
