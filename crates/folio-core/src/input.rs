//! Input queue and adapter. Listeners only enqueue; the scene drains the
//! queue once per frame before the force step runs.

use crate::constants::*;
use crate::influence::ExternalInfluence;
use crate::store::ParticleStore;
use glam::Vec2;
use std::collections::VecDeque;

/// Pointer travel (px) after which a press counts as a drag, not a click.
const CLICK_SLOP: f32 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp(Vec2),
    PointerLeave,
    Click(Vec2),
    DoubleClick(Vec2),
    Key(KeyCommand),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    SpeedUp,
    SpeedDown,
}

impl KeyCommand {
    #[inline]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "+" | "=" => Some(KeyCommand::SpeedUp),
            "-" | "_" => Some(KeyCommand::SpeedDown),
            _ => None,
        }
    }
}

/// Global animation speed multiplier, adjusted from the keyboard.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpeedControl(f32);

impl Default for SpeedControl {
    fn default() -> Self {
        SpeedControl(SPEED_DEFAULT)
    }
}

impl SpeedControl {
    #[inline]
    pub fn value(&self) -> f32 {
        self.0
    }

    pub fn apply(&mut self, cmd: KeyCommand) -> f32 {
        let delta = match cmd {
            KeyCommand::SpeedUp => SPEED_STEP,
            KeyCommand::SpeedDown => -SPEED_STEP,
        };
        let next = ((self.0 + delta) * 10.0).round() / 10.0;
        self.0 = next.clamp(SPEED_MIN, SPEED_MAX);
        self.0
    }
}

/// FIFO of raw events written by listeners and drained by the frame. Once
/// closed it drops everything pushed to it.
#[derive(Default, Debug)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
    closed: bool,
}

impl InputQueue {
    pub fn push(&mut self, ev: InputEvent) {
        if !self.closed {
            self.events.push_back(ev);
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
        self.events.clear();
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn drain(&mut self) -> impl Iterator<Item = InputEvent> + '_ {
        self.events.drain(..)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputOptions {
    pub hover: bool,
    pub drag: bool,
    pub click_to_open: bool,
}

#[derive(Clone, Copy, Debug)]
struct DragState {
    index: usize,
    origin: Vec2,
    last: Vec2,
    prev: Vec2,
    travelled: bool,
}

/// Translates pointer events into the external influence and the per-entity
/// hover/drag flags, and applies flick and ripple impulses on release.
#[derive(Debug, Default)]
pub struct InputAdapter {
    pub options: InputOptions,
    drag: Option<DragState>,
    suppress_click: bool,
}

impl InputAdapter {
    pub fn new(options: InputOptions) -> Self {
        Self {
            options,
            drag: None,
            suppress_click: false,
        }
    }

    pub fn dragging(&self) -> Option<usize> {
        self.drag.map(|d| d.index)
    }

    pub fn handle(
        &mut self,
        ev: &InputEvent,
        store: &mut ParticleStore,
        influence: &mut ExternalInfluence,
        now: f64,
    ) {
        match *ev {
            InputEvent::PointerMove(p) => {
                influence.move_to(p);
                self.on_move(p, store);
            }
            InputEvent::PointerDown(p) => {
                influence.move_to(p);
                influence.pressed = true;
                self.suppress_click = false;
                self.on_down(p, store, now);
            }
            InputEvent::PointerUp(p) => {
                influence.move_to(p);
                influence.release();
                self.on_release(store, now);
            }
            InputEvent::PointerLeave => {
                influence.disengage();
                self.on_release(store, now);
            }
            InputEvent::Click(p) => {
                if self.suppress_click {
                    self.suppress_click = false;
                } else if self.options.click_to_open {
                    if let Some(e) = store.entities_mut().iter_mut().find(|e| e.contains(p)) {
                        e.flags.open = !e.flags.open;
                        e.flags.last_interaction = Some(now);
                    }
                }
            }
            InputEvent::DoubleClick(_) | InputEvent::Key(_) => {}
        }
    }

    fn on_move(&mut self, p: Vec2, store: &mut ParticleStore) {
        if let Some(drag) = self.drag.as_mut() {
            drag.prev = drag.last;
            drag.last = p;
            if p.distance(drag.origin) > CLICK_SLOP {
                drag.travelled = true;
            }
            if let Some(e) = store.entities_mut().get_mut(drag.index) {
                e.position = p - e.flags.drag_offset;
            }
        }
        if self.options.hover {
            for e in store.entities_mut() {
                e.flags.hovered = e.contains(p);
            }
        }
    }

    fn on_down(&mut self, p: Vec2, store: &mut ParticleStore, now: f64) {
        for e in store.entities_mut() {
            e.flags.hovered = false;
        }
        if !self.options.drag {
            return;
        }
        let hit = store.entities().iter().position(|e| e.contains(p));
        if let Some(index) = hit {
            let e = &mut store.entities_mut()[index];
            e.flags.dragged = true;
            e.flags.drag_offset = p - e.position;
            e.flags.last_interaction = Some(now);
            self.drag = Some(DragState {
                index,
                origin: p,
                last: p,
                prev: p,
                travelled: false,
            });
            log::debug!("[input] grab entity {}", index);
        }
    }

    fn on_release(&mut self, store: &mut ParticleStore, now: f64) {
        if let Some(drag) = self.drag.take() {
            let flick = (drag.last - drag.prev) * FLICK_GAIN;
            if let Some(e) = store.entities_mut().get_mut(drag.index) {
                e.flags.dragged = false;
                e.velocity = flick;
                e.flags.last_interaction = Some(now);
            }
            ripple(store, drag.index, drag.last);
            self.suppress_click = drag.travelled;
        }
        for e in store.entities_mut() {
            e.flags.hovered = false;
            e.flags.dragged = false;
        }
    }
}

/// One-time radial push on every entity near `center`, except `skip`.
pub fn ripple(store: &mut ParticleStore, skip: usize, center: Vec2) {
    for (i, e) in store.entities_mut().iter_mut().enumerate() {
        if i == skip {
            continue;
        }
        let away = e.position - center;
        let d = away.length();
        if d < RIPPLE_RADIUS && d > 1e-4 {
            e.velocity += away / d * RIPPLE_IMPULSE;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Entity;
    use crate::store::Bounds;

    fn orbs() -> ParticleStore {
        ParticleStore::from_entities(
            vec![
                Entity::new(Vec2::new(100.0, 100.0), 30.0, "#fff"),
                Entity::new(Vec2::new(250.0, 100.0), 30.0, "#fff"),
                Entity::new(Vec2::new(700.0, 380.0), 30.0, "#fff"),
            ],
            Bounds::new(800.0, 400.0),
        )
    }

    fn adapter() -> InputAdapter {
        InputAdapter::new(InputOptions {
            hover: true,
            drag: true,
            click_to_open: true,
        })
    }

    #[test]
    fn key_mapping_matches_shortcuts() {
        assert_eq!(KeyCommand::from_key("+"), Some(KeyCommand::SpeedUp));
        assert_eq!(KeyCommand::from_key("="), Some(KeyCommand::SpeedUp));
        assert_eq!(KeyCommand::from_key("-"), Some(KeyCommand::SpeedDown));
        assert_eq!(KeyCommand::from_key("_"), Some(KeyCommand::SpeedDown));
        assert_eq!(KeyCommand::from_key("x"), None);
    }

    #[test]
    fn speed_is_clamped_and_rounded() {
        let mut s = SpeedControl::default();
        for _ in 0..40 {
            s.apply(KeyCommand::SpeedUp);
        }
        assert_eq!(s.value(), 3.0);
        for _ in 0..40 {
            s.apply(KeyCommand::SpeedDown);
        }
        assert!((s.value() - 0.2).abs() < 1e-6);
        s.apply(KeyCommand::SpeedUp);
        assert!((s.value() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn hover_follows_pointer() {
        let mut store = orbs();
        let mut inf = ExternalInfluence::at_center(store.bounds());
        let mut a = adapter();
        a.handle(&InputEvent::PointerMove(Vec2::new(105.0, 95.0)), &mut store, &mut inf, 0.0);
        assert!(store.entities()[0].flags.hovered);
        assert!(!store.entities()[1].flags.hovered);
        assert!(inf.engaged);
    }

    #[test]
    fn drag_flick_and_ripple() {
        let mut store = orbs();
        let mut inf = ExternalInfluence::at_center(store.bounds());
        let mut a = adapter();
        a.handle(&InputEvent::PointerDown(Vec2::new(110.0, 100.0)), &mut store, &mut inf, 1.0);
        assert_eq!(a.dragging(), Some(0));
        assert!(inf.pressed);
        a.handle(&InputEvent::PointerMove(Vec2::new(140.0, 100.0)), &mut store, &mut inf, 1.1);
        a.handle(&InputEvent::PointerMove(Vec2::new(150.0, 110.0)), &mut store, &mut inf, 1.2);
        assert_eq!(store.entities()[0].position, Vec2::new(140.0, 110.0));

        let before_near = store.entities()[1].velocity;
        let before_far = store.entities()[2].velocity;
        a.handle(&InputEvent::PointerUp(Vec2::new(150.0, 110.0)), &mut store, &mut inf, 1.3);

        let dragged = &store.entities()[0];
        assert!(!dragged.flags.dragged);
        assert!((dragged.velocity - Vec2::new(2.0, 2.0)).length() < 1e-5);
        assert!(store.entities()[1].velocity.x > before_near.x);
        assert_eq!(store.entities()[2].velocity, before_far);
        assert!(!inf.pressed);
    }

    #[test]
    fn click_toggles_open_unless_it_ended_a_drag() {
        let mut store = orbs();
        let mut inf = ExternalInfluence::at_center(store.bounds());
        let mut a = adapter();
        a.handle(&InputEvent::Click(Vec2::new(250.0, 100.0)), &mut store, &mut inf, 0.0);
        assert!(store.entities()[1].flags.open);

        a.handle(&InputEvent::PointerDown(Vec2::new(250.0, 100.0)), &mut store, &mut inf, 1.0);
        a.handle(&InputEvent::PointerMove(Vec2::new(300.0, 100.0)), &mut store, &mut inf, 1.0);
        a.handle(&InputEvent::PointerUp(Vec2::new(300.0, 100.0)), &mut store, &mut inf, 1.0);
        a.handle(&InputEvent::Click(Vec2::new(300.0, 100.0)), &mut store, &mut inf, 1.0);
        assert!(store.entities()[1].flags.open);
    }

    #[test]
    fn leave_releases_drag_and_disengages() {
        let mut store = orbs();
        let mut inf = ExternalInfluence::at_center(store.bounds());
        let mut a = adapter();
        a.handle(&InputEvent::PointerDown(Vec2::new(100.0, 100.0)), &mut store, &mut inf, 0.0);
        a.handle(&InputEvent::PointerLeave, &mut store, &mut inf, 0.1);
        assert_eq!(a.dragging(), None);
        assert!(!inf.engaged && !inf.pressed);
        assert!(store.entities().iter().all(|e| !e.flags.dragged));
    }

    #[test]
    fn queue_drains_in_order() {
        let mut q = InputQueue::default();
        q.push(InputEvent::PointerLeave);
        q.push(InputEvent::Key(KeyCommand::SpeedUp));
        let drained: Vec<_> = q.drain().collect();
        assert_eq!(
            drained,
            vec![InputEvent::PointerLeave, InputEvent::Key(KeyCommand::SpeedUp)]
        );
        assert!(q.is_empty());
    }
}
