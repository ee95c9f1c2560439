use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use foundation::time::Time;

use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LoopControl {
    /// The host should schedule another tick.
    Continue,
    Stop,
}

/// Shared cancellation flag for a [`RenderLoop`].
///
/// Clones observe the same flag, so the host can keep one handle while the
/// loop itself lives inside an animation-frame callback. A loop that stops
/// on its own sets the flag too, so `is_cancelled` means "will not run again".
#[derive(Debug, Clone, Default)]
pub struct LoopHandle {
    cancelled: Rc<Cell<bool>>,
}

impl LoopHandle {
    pub fn cancel(&self) {
        self.cancelled.set(true);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

type Step<E> = Box<dyn FnMut(Frame) -> Result<(), E>>;

/// A self-rescheduling per-frame callback with a deterministic stop.
///
/// The loop does not schedule anything itself: the host calls [`tick`] once
/// per animation frame and schedules the next call only while it returns
/// [`LoopControl::Continue`]. A step error stops the loop for good.
///
/// [`tick`]: RenderLoop::tick
pub struct RenderLoop<E> {
    name: &'static str,
    step: Step<E>,
    handle: LoopHandle,
    last: Option<Frame>,
    stopped: bool,
}

impl<E: Display> RenderLoop<E> {
    pub fn new(name: &'static str, step: impl FnMut(Frame) -> Result<(), E> + 'static) -> Self {
        Self {
            name,
            step: Box::new(step),
            handle: LoopHandle::default(),
            last: None,
            stopped: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn handle(&self) -> LoopHandle {
        self.handle.clone()
    }

    pub fn frames_run(&self) -> u64 {
        self.last.map_or(0, |f| f.index + 1)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped || self.handle.is_cancelled()
    }

    pub fn tick(&mut self, now: Time) -> LoopControl {
        if self.is_stopped() {
            self.stopped = true;
            return LoopControl::Stop;
        }

        let frame = match self.last {
            None => Frame::first(now),
            Some(prev) => prev.next(now),
        };

        match (self.step)(frame) {
            Ok(()) => {
                self.last = Some(frame);
                LoopControl::Continue
            }
            Err(err) => {
                tracing::error!(
                    loop_name = self.name,
                    frame = frame.index,
                    "render loop stopped: {err}"
                );
                self.stopped = true;
                self.handle.cancel();
                LoopControl::Stop
            }
        }
    }
}

/// Handles of the loops a host has started, so they can all be stopped at
/// once. Finished loops are forgotten on the next access.
#[derive(Debug, Default)]
pub struct LoopRegistry {
    handles: RefCell<Vec<LoopHandle>>,
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, handle: LoopHandle) {
        self.prune();
        self.handles.borrow_mut().push(handle);
    }

    pub fn running(&self) -> usize {
        self.prune();
        self.handles.borrow().len()
    }

    /// Cancels every loop still running and returns how many there were.
    pub fn cancel_all(&self) -> usize {
        self.prune();
        let handles = std::mem::take(&mut *self.handles.borrow_mut());
        for handle in &handles {
            handle.cancel();
        }
        handles.len()
    }

    fn prune(&self) {
        self.handles.borrow_mut().retain(|h| !h.is_cancelled());
    }
}
