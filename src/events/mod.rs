pub mod guard;
pub mod keyboard;
pub mod pointer;

pub use guard::{Attached, AttachedSet, Detach};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

/// The DOM side of a listener: target, event name and the JS callback.
pub struct DomListener {
    target: web::EventTarget,
    kind: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Detach for DomListener {
    fn detach(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
    }
}

/// A registered DOM listener. Dropping it removes the listener.
pub type Listener = Attached<DomListener>;
pub type Listeners = AttachedSet<DomListener>;

impl Attached<DomListener> {
    pub fn listen_raw<T, F>(target: &T, kind: &'static str, handler: F) -> Option<Self>
    where
        T: AsRef<web::EventTarget>,
        F: FnMut(web::Event) + 'static,
    {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(web::Event)>);
        let target: web::EventTarget = target.as_ref().clone();
        match target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref()) {
            Ok(()) => Some(Attached::new(DomListener {
                target,
                kind,
                closure,
            })),
            Err(e) => {
                log::warn!("[events] could not listen for {}: {:?}", kind, e);
                None
            }
        }
    }
}

/// Same as `Listener::listen_raw`, for handlers that want the concrete event type.
pub fn listen<T, E, F>(target: &T, kind: &'static str, mut handler: F) -> Option<Listener>
where
    T: AsRef<web::EventTarget>,
    E: JsCast,
    F: FnMut(E) + 'static,
{
    Listener::listen_raw(target, kind, move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    })
}
