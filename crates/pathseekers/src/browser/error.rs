//! Errors raised while talking to the module through browser globals.

use thiserror::Error;

/// Loader-side failure. Converted to a [`pathseekers_core::BootstrapError`]
/// by the bootstrap driver.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// No window or document (e.g. running in a worker).
    #[error("no browser document available")]
    NoDocument,
    /// No element with the given id in the document.
    #[error("element `#{0}` not found")]
    MissingElement(String),
    /// The loader script failed to fetch or execute.
    #[error("script `{0}` failed to load")]
    ScriptRejected(String),
    /// The global factory is missing or not callable.
    #[error("global `{0}` is not a function")]
    MissingFactory(String),
    /// The factory returned something other than a promise.
    #[error("factory did not return a promise")]
    NotAPromise,
    /// The factory's promise rejected.
    #[error("{0}")]
    FactoryRejected(String),
    /// The configuration could not be serialized.
    #[error("config serialization failed: {0}")]
    Config(#[from] serde_json::Error),
    /// Any other JavaScript exception.
    #[error("javascript error: {0}")]
    Js(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for LoaderError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        Self::Js(describe_js(&value))
    }
}

/// Best-effort human readable text for a thrown JS value.
#[cfg(target_arch = "wasm32")]
pub fn describe_js(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
