//! Core logic for the Pathseekers module launcher.
//!
//! This crate is platform independent and holds everything with state,
//! timing or failure handling:
//! - Device profiling: [`Viewport`], [`DeviceProfile`], [`DeviceProfiler`]
//! - Instantiation config: [`ConfigBuilder`], [`ModuleConfig`]
//! - Lifecycle: [`BootstrapController`], [`LoadState`], [`bootstrap::run`]
//! - Presentation: [`Overlay`]
//! - Post-ready controls: [`RuntimeHandle`]
//! - Configuration file: [`LauncherManifest`]
//!
//! The browser bindings live in the `pathseekers` crate.

pub mod bootstrap;
mod config;
mod device;
mod lifecycle;
mod manifest;
mod overlay;
mod runtime;

pub use bootstrap::{BootstrapRequest, ModuleLoader, ProgressSink, SharedController};
pub use config::{
    BuildUrls, ConfigBuilder, ModuleConfig, ModuleIdentity, PixelRatio, PixelRatioPolicy,
};
pub use device::{DeviceProfile, DeviceProfiler, Viewport, MOBILE_BREAKPOINT};
pub use lifecycle::{BootstrapController, BootstrapError, LoadState, StateListener};
pub use manifest::{LauncherManifest, ManifestError, RuntimeBindings, SurfaceConfig};
pub use overlay::{progress_percent, Overlay};
pub use runtime::{ControlError, RuntimeHandle};
