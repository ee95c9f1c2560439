use console_error_panic_hook::set_once;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::Element;

use runtime::diagnostics::DiagnosticSink;
use scene::config::SceneConfig;
use scene::setup::Setup;
use scene::{axis, rotating, triangle};

mod animation;
mod console;
mod dom;
mod webgl;

use console::ConsoleSink;
use dom::DomHost;

pub const TRIANGLE_MOUNT_ID: &str = "triangle-content";
pub const ROTATING_MOUNT_ID: &str = "rotating-tringle-automatic-content";
pub const AXIS_MOUNT_ID: &str = "rotating-tringle-content";

thread_local! {
    static CONFIG: RefCell<SceneConfig> = RefCell::new(SceneConfig::default());
}

fn config() -> SceneConfig {
    CONFIG.with(|config| config.borrow().clone())
}

/// The element a scene's canvas is appended to. A page without it simply
/// does not show that scene.
fn mount_point(host: &DomHost, id: &str) -> Option<Element> {
    host.document().get_element_by_id(id)
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Replaces the scene configuration used by later mounts. Fields left out
/// of `config_json` keep their defaults.
#[wasm_bindgen]
pub fn configure(config_json: &str) -> Result<(), JsValue> {
    let parsed =
        SceneConfig::from_json(config_json).map_err(|err| JsValue::from_str(&err.to_string()))?;
    CONFIG.with(|config| *config.borrow_mut() = parsed);
    Ok(())
}

#[wasm_bindgen]
pub fn mount_triangle() -> Result<(), JsValue> {
    let host = DomHost::new()?;
    let Some(holder) = mount_point(&host, TRIANGLE_MOUNT_ID) else {
        return Ok(());
    };
    let output = triangle::mount(&host, &ConsoleSink)?;
    holder.append_child(output.surface.element())?;
    Ok(())
}

#[wasm_bindgen]
pub fn mount_rotating_triangle() -> Result<(), JsValue> {
    let host = DomHost::new()?;
    let Some(holder) = mount_point(&host, ROTATING_MOUNT_ID) else {
        return Ok(());
    };
    let output = rotating::mount(&host, &config(), &ConsoleSink)?;
    holder.append_child(output.surface.element())?;
    if let Setup::Ready(scene) = output.setup {
        animation::run(host.window(), scene.into_render_loop())?;
    }
    Ok(())
}

#[wasm_bindgen]
pub fn mount_axis_triangle() -> Result<(), JsValue> {
    let host = DomHost::new()?;
    let Some(holder) = mount_point(&host, AXIS_MOUNT_ID) else {
        return Ok(());
    };
    let sink: Rc<dyn DiagnosticSink> = Rc::new(ConsoleSink);
    let output = axis::mount(&host, &config(), &*sink)?;
    holder.append_child(output.surface.element())?;
    if let Setup::Ready(scene) = output.setup {
        animation::run(host.window(), scene.into_render_loop(sink))?;
    }
    Ok(())
}

#[wasm_bindgen]
pub fn mount_all() -> Result<(), JsValue> {
    mount_triangle()?;
    mount_rotating_triangle()?;
    mount_axis_triangle()
}

/// Stops every running animation; returns how many were cancelled.
#[wasm_bindgen]
pub fn stop_animations() -> usize {
    animation::stop_all()
}
