use runtime::diagnostics::{Diagnostic, DiagnosticSink};
use wasm_bindgen::JsValue;

/// Writes diagnostics with `console.error(message, infoLog)`.
#[derive(Debug, Default, Copy, Clone)]
pub struct ConsoleSink;

impl DiagnosticSink for ConsoleSink {
    fn report(&self, diagnostic: Diagnostic) {
        let message = JsValue::from_str(&diagnostic.message);
        match &diagnostic.info_log {
            Some(log) => web_sys::console::error_2(&message, &JsValue::from_str(log)),
            None => web_sys::console::error_1(&message),
        }
    }
}
