//! Browser runtime for the Pathseekers launcher.
//!
//! This module binds the platform-independent controller in
//! `pathseekers-core` to the page: viewport sampling, loader script
//! injection, the global module factory and the overlay elements.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod loader;
#[cfg(target_arch = "wasm32")]
pub mod viewport;

// Cross-platform modules
pub mod error;
pub mod manifest;
pub mod overlay;

#[cfg(target_arch = "wasm32")]
pub use app::Launcher;
pub use error::LoaderError;
#[cfg(target_arch = "wasm32")]
pub use loader::{BrowserModuleLoader, BrowserRuntime};
pub use manifest::{embedded_manifest, manifest_or_default, EMBEDDED_MANIFEST};
#[cfg(target_arch = "wasm32")]
pub use overlay::OverlayView;
pub use overlay::OverlayPlan;
#[cfg(target_arch = "wasm32")]
pub use viewport::ViewportWatcher;
