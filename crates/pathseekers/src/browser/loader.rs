//! Module delivery over browser globals.
//!
//! The loader script installs a global factory
//! `(canvas, config, onProgress) -> Promise<instance>`; the instance exposes
//! a fullscreen entry point taking `1` or `0`.

use super::error::{describe_js, LoaderError};
use js_sys::{Function, Object, Promise, Reflect};
use pathseekers_core::{
    ControlError, ModuleConfig, ModuleLoader, ProgressSink, RuntimeBindings, RuntimeHandle,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlCanvasElement, HtmlScriptElement, Window};

/// Running module instance.
pub struct BrowserRuntime {
    instance: JsValue,
    fullscreen_method: String,
    // Kept alive for as long as the instance may still report progress.
    _on_progress: Closure<dyn FnMut(f64)>,
}

impl std::fmt::Debug for BrowserRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserRuntime")
            .field("fullscreen_method", &self.fullscreen_method)
            .finish_non_exhaustive()
    }
}

impl RuntimeHandle for BrowserRuntime {
    fn set_fullscreen(&self, enabled: bool) -> Result<(), ControlError> {
        let method = Reflect::get(&self.instance, &JsValue::from_str(&self.fullscreen_method))
            .ok()
            .and_then(|m| m.dyn_into::<Function>().ok())
            .ok_or_else(|| ControlError::Unsupported(self.fullscreen_method.clone()))?;

        let flag = JsValue::from_f64(if enabled { 1.0 } else { 0.0 });
        method
            .call1(&self.instance, &flag)
            .map(|_| ())
            .map_err(|err| ControlError::Rejected(describe_js(&err)))
    }
}

/// [`ModuleLoader`] backed by the page's `window`.
#[derive(Debug, Clone)]
pub struct BrowserModuleLoader {
    window: Window,
    surface: HtmlCanvasElement,
    bindings: RuntimeBindings,
}

impl BrowserModuleLoader {
    /// Create a loader targeting `surface`.
    pub fn new(window: Window, surface: HtmlCanvasElement, bindings: RuntimeBindings) -> Self {
        Self {
            window,
            surface,
            bindings,
        }
    }

    fn factory(&self) -> Option<Function> {
        Reflect::get(&self.window, &JsValue::from_str(&self.bindings.factory_global))
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

impl ModuleLoader for BrowserModuleLoader {
    type Handle = BrowserRuntime;
    type Error = LoaderError;

    async fn load_script(&self, url: &str) -> Result<(), LoaderError> {
        let document = self.window.document().ok_or(LoaderError::NoDocument)?;
        let body = document.body().ok_or(LoaderError::NoDocument)?;

        let script = document
            .create_element("script")?
            .dyn_into::<HtmlScriptElement>()
            .map_err(|_| LoaderError::Js("created element is not a script".to_string()))?;
        script.set_src(url);
        script.set_async(true);

        let loaded = Promise::new(&mut |resolve, reject| {
            script.set_onload(Some(&resolve));
            script.set_onerror(Some(&reject));
        });
        body.append_child(&script)?;

        let outcome = JsFuture::from(loaded).await;
        script.set_onload(None);
        script.set_onerror(None);
        outcome
            .map(|_| ())
            .map_err(|_| LoaderError::ScriptRejected(url.to_string()))
    }

    fn has_factory(&self) -> bool {
        self.factory().is_some()
    }

    fn install_input_routing(&self, surface_id: &str) -> Result<(), LoaderError> {
        let global = &self.bindings.input_routing_global;
        if global.is_empty() {
            return Ok(());
        }

        let element = self
            .window
            .document()
            .ok_or(LoaderError::NoDocument)?
            .get_element_by_id(surface_id)
            .ok_or_else(|| LoaderError::MissingElement(surface_id.to_string()))?;

        let key = JsValue::from_str(global);
        let existing = Reflect::get(&self.window, &key)?;
        let target: Object = if existing.is_object() {
            existing.unchecked_into()
        } else {
            Object::new()
        };
        Reflect::set(
            &target,
            &JsValue::from_str(&self.bindings.input_routing_property),
            &element,
        )?;
        Reflect::set(&self.window, &key, &target)?;
        log::debug!(
            "routed keyboard input to `#{surface_id}` via `{global}.{}`",
            self.bindings.input_routing_property
        );
        Ok(())
    }

    async fn instantiate(
        &self,
        config: &ModuleConfig,
        progress: ProgressSink<BrowserRuntime>,
    ) -> Result<BrowserRuntime, LoaderError> {
        let factory = self
            .factory()
            .ok_or_else(|| LoaderError::MissingFactory(self.bindings.factory_global.clone()))?;

        let js_config = js_sys::JSON::parse(&config.to_json()?)?;
        let on_progress = Closure::<dyn FnMut(f64)>::new(move |value: f64| {
            progress.report(value);
        });

        let promise = match factory
            .call3(
                &JsValue::NULL,
                &self.surface,
                &js_config,
                on_progress.as_ref().unchecked_ref(),
            )
            .map(JsCast::dyn_into::<Promise>)
        {
            Ok(Ok(promise)) => promise,
            Ok(Err(_)) => {
                // The module may still hold the callback.
                on_progress.forget();
                return Err(LoaderError::NotAPromise);
            }
            Err(err) => {
                on_progress.forget();
                return Err(LoaderError::from(err));
            }
        };

        match JsFuture::from(promise).await {
            Ok(instance) => Ok(BrowserRuntime {
                instance,
                fullscreen_method: self.bindings.fullscreen_method.clone(),
                _on_progress: on_progress,
            }),
            Err(err) => {
                // The module may still hold the callback.
                on_progress.forget();
                Err(LoaderError::FactoryRejected(describe_js(&err)))
            }
        }
    }
}
