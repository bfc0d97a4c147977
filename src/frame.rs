use crate::events::{self, Listener, Listeners};
use crate::overlay;
use crate::render::CanvasSurface;
use folio_core::effects::{self, EffectKind, PresetOptions};
use folio_core::store::Bounds;
use folio_core::{DriverState, EngineError, FrameDriver, FrameHandle, FrameOutcome, FrameScheduler, InputQueue, Scene};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

type Tick = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` behind the driver's scheduler seam.
#[derive(Clone)]
pub struct RafScheduler {
    window: web::Window,
    tick: Tick,
}

impl FrameScheduler for RafScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError> {
        let tick = self.tick.borrow();
        let cb = tick
            .as_ref()
            .ok_or_else(|| EngineError::Scheduler("frame callback released".into()))?;
        self.window
            .request_animation_frame(cb.as_ref().unchecked_ref())
            .map_err(|e| EngineError::Scheduler(format!("{:?}", e)))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        _ = self.window.cancel_animation_frame(handle);
    }
}

pub struct MountOptions {
    pub kind: EffectKind,
    pub preset: PresetOptions,
    pub seed: u64,
}

/// One live background: driver, its canvas and every listener it owns.
pub struct Mounted {
    driver: Rc<RefCell<FrameDriver>>,
    sched: Rc<RefCell<RafScheduler>>,
    last: Rc<RefCell<Instant>>,
    listeners: Rc<RefCell<Listeners>>,
    name: &'static str,
}

pub fn mount(canvas: &web::HtmlCanvasElement, opts: MountOptions) -> anyhow::Result<Mounted> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    let document = window
        .document()
        .ok_or_else(|| anyhow::anyhow!("no document"))?;

    let surface = CanvasSurface::from_canvas(canvas)?;
    let size = folio_core::Surface::size(&surface);
    let preset = effects::preset(opts.kind, Bounds::new(size.x, size.y), &opts.preset);
    let scene = Scene::new(preset, opts.seed)?;
    let name = scene.name();

    let driver = Rc::new(RefCell::new(FrameDriver::new(scene)));
    let surface = Rc::new(RefCell::new(surface));
    let queue = Rc::new(RefCell::new(InputQueue::default()));
    let last = Rc::new(RefCell::new(Instant::now()));
    let tick: Tick = Rc::new(RefCell::new(None));
    let listeners: Rc<RefCell<Listeners>> = Rc::new(RefCell::new(Listeners::default()));
    // layout is re-read after a window resize, and every frame while the
    // canvas has no box yet
    let resized = Rc::new(Cell::new(false));
    let sched = Rc::new(RefCell::new(RafScheduler {
        window: window.clone(),
        tick: tick.clone(),
    }));

    {
        let driver = driver.clone();
        let surface = surface.clone();
        let queue = queue.clone();
        let sched = sched.clone();
        let last = last.clone();
        let doc = document.clone();
        let listeners = listeners.clone();
        let resized = resized.clone();
        *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let now = Instant::now();
            let dt = now.duration_since(*last.borrow()).as_secs_f32();
            *last.borrow_mut() = now;

            let mut surface = surface.borrow_mut();
            let collapsed = driver.borrow().scene().store().bounds().is_collapsed();
            if resized.replace(false) || collapsed {
                if let Some(size) = surface.sync_size() {
                    driver
                        .borrow_mut()
                        .scene_mut()
                        .resize(Bounds::new(size.x, size.y));
                }
            }
            let out = driver.borrow_mut().on_frame(
                dt,
                &mut queue.borrow_mut(),
                &mut *surface,
                &mut *sched.borrow_mut(),
            );
            if let FrameOutcome::Rendered {
                speed_changed: Some(speed),
            } = out
            {
                overlay::flash_speed_hint(&doc, speed);
            }
            if driver.borrow().state() == DriverState::Stopped {
                listeners.borrow_mut().release();
            }
        }) as Box<dyn FnMut()>));
    }

    let wiring = events::pointer::PointerWiring {
        canvas: canvas.clone(),
        queue: queue.clone(),
    };
    {
        let mut set = listeners.borrow_mut();
        set.extend(events::pointer::wire_pointer(&wiring));
        set.extend(events::pointer::wire_hack_buttons(&document, &wiring));
        set.extend(events::keyboard::wire_speed_keys(queue));
        let resized = resized.clone();
        set.extend(Listener::listen_raw(&window, "resize", move |_| resized.set(true)));
    }

    driver.borrow_mut().start(&mut *sched.borrow_mut())?;
    Ok(Mounted {
        driver,
        sched,
        last,
        listeners,
        name,
    })
}

impl Mounted {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn set_visible(&self, visible: bool) {
        let mut driver = self.driver.borrow_mut();
        let mut sched = self.sched.borrow_mut();
        if visible {
            if driver.state() == DriverState::Suspended {
                *self.last.borrow_mut() = Instant::now();
                if let Err(e) = driver.resume(&mut *sched) {
                    log::error!("[frame] resume {}: {}", self.name, e);
                }
            }
        } else {
            driver.suspend(&mut *sched);
        }
    }

    /// Cancels the pending frame, removes listeners and drops the frame
    /// callback. Nothing draws after this returns.
    pub fn unmount(self) {
        self.driver.borrow_mut().stop(&mut *self.sched.borrow_mut());
        self.listeners.borrow_mut().release();
        let released = self.sched.borrow().tick.borrow_mut().take();
        drop(released);
        log::info!("[mount] {} unmounted", self.name);
    }
}
