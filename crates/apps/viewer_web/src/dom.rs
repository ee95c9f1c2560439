//! [`Host`] over the page's `window` and `document`.

use gpu::surface::{Surface, Viewport};
use scene::host::{AngleInput, Host};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, HtmlCanvasElement, HtmlInputElement, WebGlRenderingContext, Window};

use crate::webgl::WebGl;

pub struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        Ok(Self { window, document })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }
}

fn dimension(value: Result<JsValue, JsValue>) -> u32 {
    value
        .ok()
        .and_then(|v| v.as_f64())
        .map_or(0, |v| v.max(0.0) as u32)
}

pub struct CanvasSurface(HtmlCanvasElement);

impl CanvasSurface {
    pub fn element(&self) -> &HtmlCanvasElement {
        &self.0
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> Viewport {
        Viewport::new(self.0.width(), self.0.height())
    }

    fn resize(&self, size: Viewport) {
        self.0.set_width(size.width);
        self.0.set_height(size.height);
    }
}

pub struct SliderElement(HtmlInputElement);

impl AngleInput for SliderElement {
    fn raw_value(&self) -> String {
        self.0.value()
    }
}

impl Host for DomHost {
    type Surface = CanvasSurface;
    type Context = WebGl;
    type Input = SliderElement;
    type Error = JsValue;

    fn viewport(&self) -> Viewport {
        Viewport::new(
            dimension(self.window.inner_width()),
            dimension(self.window.inner_height()),
        )
    }

    fn create_surface(&self) -> Result<CanvasSurface, JsValue> {
        let canvas = self
            .document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()?;
        Ok(CanvasSurface(canvas))
    }

    fn acquire_context(&self, surface: &CanvasSurface) -> Option<WebGl> {
        surface
            .0
            .get_context("webgl")
            .ok()
            .flatten()?
            .dyn_into::<WebGlRenderingContext>()
            .ok()
            .map(WebGl::new)
    }

    fn find_input(&self, id: &str) -> Option<SliderElement> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(SliderElement)
    }
}
