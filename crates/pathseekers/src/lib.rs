//! Pathseekers: browser launcher for the A* vs JPS benchmark module.
//!
//! The benchmark itself is an externally built module (loader script, data,
//! framework and code payloads). This crate fetches it, instantiates it on
//! the page's canvas with a device-adapted configuration, reports load
//! progress and gates interaction until it is ready.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { Launcher } from './pkg/pathseekers.js';
//!
//! async function main() {
//!     await init();
//!     const launcher = new Launcher();
//!     launcher.start();
//! }
//! ```

#![allow(
    clippy::doc_markdown,
    clippy::missing_const_for_fn,
    clippy::use_self,
    clippy::needless_pass_by_value,
    clippy::future_not_send,
    unreachable_pub
)]

pub use pathseekers_core;
pub use pathseekers_core::{
    BootstrapError, DeviceProfile, LauncherManifest, LoadState, ModuleConfig, Overlay, Viewport,
};

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserModuleLoader, BrowserRuntime, Launcher};

pub use browser::{embedded_manifest, LoaderError, OverlayPlan};
