//! The environment a scene runs in.
//!
//! The browser host lives in the web app crate. [`HeadlessHost`] backs each
//! surface with a [`RecordingContext`] so scenes can run natively.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::convert::Infallible;
use std::rc::Rc;

use gpu::context::GlContext;
use gpu::recording::{Faults, RecordingContext};
use gpu::surface::{Surface, Viewport};

/// A numeric input (an `<input type="range">`) read as raw text.
pub trait AngleInput {
    fn raw_value(&self) -> String;
}

pub trait Host {
    type Surface: Surface;
    type Context: GlContext;
    type Input: AngleInput;
    /// Failures of the host itself (DOM calls), as opposed to GPU setup.
    type Error;

    fn viewport(&self) -> Viewport;
    fn create_surface(&self) -> Result<Self::Surface, Self::Error>;
    fn acquire_context(&self, surface: &Self::Surface) -> Option<Self::Context>;
    fn find_input(&self, id: &str) -> Option<Self::Input>;
}

#[derive(Debug, Clone)]
pub struct HeadlessSurface {
    size: Rc<Cell<Viewport>>,
    context: RecordingContext,
}

impl HeadlessSurface {
    /// Everything drawn onto this surface, whether or not a scene acquired it.
    pub fn context(&self) -> &RecordingContext {
        &self.context
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> Viewport {
        self.size.get()
    }

    fn resize(&self, size: Viewport) {
        self.size.set(size);
    }
}

#[derive(Debug, Clone, Default)]
pub struct HeadlessInput(Rc<RefCell<String>>);

impl HeadlessInput {
    pub fn set(&self, value: impl Into<String>) {
        *self.0.borrow_mut() = value.into();
    }
}

impl AngleInput for HeadlessInput {
    fn raw_value(&self) -> String {
        self.0.borrow().clone()
    }
}

#[derive(Debug)]
pub struct HeadlessHost {
    viewport: Cell<Viewport>,
    webgl: bool,
    faults: Faults,
    inputs: RefCell<BTreeMap<String, HeadlessInput>>,
}

impl HeadlessHost {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport: Cell::new(viewport),
            webgl: true,
            faults: Faults::default(),
            inputs: RefCell::new(BTreeMap::new()),
        }
    }

    /// Every surface of this host refuses to hand out a context.
    pub fn without_webgl(mut self) -> Self {
        self.webgl = false;
        self
    }

    pub fn with_faults(mut self, faults: Faults) -> Self {
        self.faults = faults;
        self
    }

    /// Simulates a window resize.
    pub fn set_viewport(&self, viewport: Viewport) {
        self.viewport.set(viewport);
    }

    pub fn add_input(&self, id: &str, value: impl Into<String>) -> HeadlessInput {
        let input = HeadlessInput::default();
        input.set(value);
        self.inputs
            .borrow_mut()
            .insert(id.to_string(), input.clone());
        input
    }
}

impl Host for HeadlessHost {
    type Surface = HeadlessSurface;
    type Context = RecordingContext;
    type Input = HeadlessInput;
    type Error = Infallible;

    fn viewport(&self) -> Viewport {
        self.viewport.get()
    }

    fn create_surface(&self) -> Result<HeadlessSurface, Infallible> {
        Ok(HeadlessSurface {
            size: Rc::new(Cell::new(Viewport::new(300, 150))),
            context: RecordingContext::with_faults(self.faults),
        })
    }

    fn acquire_context(&self, surface: &HeadlessSurface) -> Option<RecordingContext> {
        self.webgl.then(|| surface.context.clone())
    }

    fn find_input(&self, id: &str) -> Option<HeadlessInput> {
        self.inputs.borrow().get(id).cloned()
    }
}
