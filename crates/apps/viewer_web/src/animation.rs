//! Drives a [`RenderLoop`] from `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use foundation::time::Time;
use runtime::render_loop::{LoopControl, LoopHandle, LoopRegistry, RenderLoop};
use scene::error::FrameError;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Window;

thread_local! {
    static RUNNING: LoopRegistry = LoopRegistry::new();
}

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Schedules the first tick and keeps rescheduling while the loop returns
/// [`LoopControl::Continue`]. The returned handle cancels it.
pub fn run(
    window: &Window,
    mut render_loop: RenderLoop<FrameError>,
) -> Result<LoopHandle, JsValue> {
    let handle = render_loop.handle();
    let name = render_loop.name();

    // The callback reschedules itself, so it holds an Rc to its own slot.
    let slot: FrameCallback = Rc::new(RefCell::new(None));
    let next = slot.clone();
    let scheduler = window.clone();

    let callback = Closure::wrap(Box::new(move |timestamp_ms: f64| {
        if render_loop.tick(Time::from_millis(timestamp_ms)) == LoopControl::Stop {
            // Breaks the slot cycle; wasm-bindgen frees the closure once this
            // invocation returns.
            drop(next.borrow_mut().take());
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            let function = callback.as_ref().unchecked_ref::<js_sys::Function>();
            if let Err(err) = scheduler.request_animation_frame(function) {
                web_sys::console::error_2(&JsValue::from_str(name), &err);
            }
        }
    }) as Box<dyn FnMut(f64)>);

    window.request_animation_frame(callback.as_ref().unchecked_ref::<js_sys::Function>())?;
    *slot.borrow_mut() = Some(callback);

    RUNNING.with(|running| running.register(handle.clone()));
    Ok(handle)
}

/// Cancels every loop started by [`run`] that is still running. Each stops at
/// its next tick and releases its callback.
pub fn stop_all() -> usize {
    RUNNING.with(LoopRegistry::cancel_all)
}
