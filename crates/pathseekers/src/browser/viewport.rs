//! Viewport sampling and the scoped resize subscription.

use gloo_events::EventListener;
use pathseekers_core::Viewport;
use web_sys::Window;

/// Read the window's current viewport.
pub fn sample(window: &Window) -> Viewport {
    let read = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0)
    };
    Viewport {
        width: read(window.inner_width()),
        height: read(window.inner_height()),
        device_pixel_ratio: window.device_pixel_ratio(),
    }
}

/// Delivers a fresh [`Viewport`] on every `resize` event.
///
/// The listener is removed when the watcher is dropped.
#[derive(Debug)]
pub struct ViewportWatcher {
    _listener: EventListener,
}

impl ViewportWatcher {
    /// Subscribe to resize events on `window`.
    pub fn new<F>(window: &Window, mut on_sample: F) -> Self
    where
        F: FnMut(Viewport) + 'static,
    {
        let target = window.clone();
        let listener = EventListener::new(window, "resize", move |_event| {
            on_sample(sample(&target));
        });
        Self {
            _listener: listener,
        }
    }
}
