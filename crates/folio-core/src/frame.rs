//! Frame driver: owns a scene and decides, per host callback, whether to
//! step and draw. The host supplies the scheduler (`requestAnimationFrame`
//! on the web, a spy in tests).

use crate::error::EngineError;
use crate::input::InputQueue;
use crate::render::Surface;
use crate::scene::Scene;

pub type FrameHandle = i32;

pub trait FrameScheduler {
    fn request_frame(&mut self) -> Result<FrameHandle, EngineError>;
    fn cancel_frame(&mut self, handle: FrameHandle);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Idle,
    Running,
    /// Page hidden; no frames requested until resumed.
    Suspended,
    /// Torn down. Terminal.
    Stopped,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FrameOutcome {
    Rendered { speed_changed: Option<f32> },
    Skipped,
}

pub struct FrameDriver {
    scene: Scene,
    state: DriverState,
    pending: Option<FrameHandle>,
}

impl FrameDriver {
    pub fn new(scene: Scene) -> Self {
        Self {
            scene,
            state: DriverState::Idle,
            pending: None,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn start<S: FrameScheduler + ?Sized>(&mut self, sched: &mut S) -> Result<(), EngineError> {
        match self.state {
            DriverState::Idle | DriverState::Suspended => {
                self.pending = Some(sched.request_frame()?);
                self.state = DriverState::Running;
                Ok(())
            }
            DriverState::Running => Ok(()),
            DriverState::Stopped => Err(EngineError::Scheduler("driver stopped".into())),
        }
    }

    /// Host callback for a granted frame. Drains input, steps, draws and
    /// requests the next frame, or does nothing unless running.
    pub fn on_frame<F: FrameScheduler + ?Sized>(
        &mut self,
        dt: f32,
        queue: &mut InputQueue,
        surface: &mut dyn Surface,
        sched: &mut F,
    ) -> FrameOutcome {
        self.pending = None;
        if self.state != DriverState::Running {
            if self.state == DriverState::Stopped {
                queue.close();
            }
            return FrameOutcome::Skipped;
        }
        let speed_changed = self.scene.apply_input(queue.drain());
        self.scene.update(dt);
        self.scene.render(surface);
        match sched.request_frame() {
            Ok(h) => self.pending = Some(h),
            Err(e) => {
                log::error!("[frame] {}; stopping {}", e, self.scene.name());
                self.state = DriverState::Stopped;
                queue.close();
            }
        }
        FrameOutcome::Rendered { speed_changed }
    }

    pub fn suspend<F: FrameScheduler + ?Sized>(&mut self, sched: &mut F) {
        if self.state == DriverState::Running {
            self.cancel_pending(sched);
            self.state = DriverState::Suspended;
            log::debug!("[frame] suspend {}", self.scene.name());
        }
    }

    pub fn resume<F: FrameScheduler + ?Sized>(&mut self, sched: &mut F) -> Result<(), EngineError> {
        if self.state == DriverState::Suspended {
            log::debug!("[frame] resume {}", self.scene.name());
            self.start(sched)?;
        }
        Ok(())
    }

    /// Cancels any outstanding frame. Later callbacks draw nothing.
    pub fn stop<F: FrameScheduler + ?Sized>(&mut self, sched: &mut F) {
        if self.state != DriverState::Stopped {
            self.cancel_pending(sched);
            self.state = DriverState::Stopped;
            log::info!("[frame] stop {}", self.scene.name());
        }
    }

    fn cancel_pending<F: FrameScheduler + ?Sized>(&mut self, sched: &mut F) {
        if let Some(h) = self.pending.take() {
            sched.cancel_frame(h);
        }
    }
}
