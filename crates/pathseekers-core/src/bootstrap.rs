//! Async bootstrap driver.
//!
//! [`run`] walks a [`BootstrapController`] through one attempt using a
//! [`ModuleLoader`] for every interaction with the external module. It never
//! returns an error: failures end up as [`crate::LoadState::Failed`].

use crate::config::ModuleConfig;
use crate::lifecycle::BootstrapController;
use crate::runtime::RuntimeHandle;
use std::cell::RefCell;
use std::fmt::Display;
use std::rc::{Rc, Weak};

/// Controller shared between the driver, the progress sink and the UI.
pub type SharedController<H> = Rc<RefCell<BootstrapController<H>>>;

/// Create a fresh shared controller.
#[must_use]
pub fn shared<H>() -> SharedController<H> {
    Rc::new(RefCell::new(BootstrapController::new()))
}

/// Receives progress callbacks from the module factory.
///
/// Holds only a weak reference: once the page session (and with it the
/// controller) is gone, late callbacks are dropped.
pub struct ProgressSink<H> {
    controller: Weak<RefCell<BootstrapController<H>>>,
}

impl<H> Clone for ProgressSink<H> {
    fn clone(&self) -> Self {
        Self {
            controller: Weak::clone(&self.controller),
        }
    }
}

impl<H> std::fmt::Debug for ProgressSink<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSink")
            .field("attached", &(self.controller.strong_count() > 0))
            .finish()
    }
}

impl<H> ProgressSink<H> {
    /// Attach a sink to a controller.
    #[must_use]
    pub fn new(controller: &SharedController<H>) -> Self {
        Self {
            controller: Rc::downgrade(controller),
        }
    }

    /// Report progress in `[0, 1]`. Returns `false` if it was not applied.
    pub fn report(&self, progress: f64) -> bool {
        let Some(controller) = self.controller.upgrade() else {
            return false;
        };
        let Ok(mut controller) = controller.try_borrow_mut() else {
            log::warn!("progress {progress} arrived during a state update, dropped");
            return false;
        };
        controller.progress(progress)
    }
}

/// The external module delivery.
///
/// Implemented over the browser's globals in the `pathseekers` crate and by
/// test doubles natively.
#[allow(async_fn_in_trait)]
pub trait ModuleLoader {
    /// Handle produced by a successful instantiation.
    type Handle: RuntimeHandle;
    /// Error reported by the loader or the factory.
    type Error: Display;

    /// Fetch and execute the loader script.
    async fn load_script(&self, url: &str) -> Result<(), Self::Error>;

    /// Whether the loader script installed the factory.
    fn has_factory(&self) -> bool;

    /// Install the ambient input-routing configuration for the surface.
    fn install_input_routing(&self, surface_id: &str) -> Result<(), Self::Error>;

    /// Invoke the factory.
    async fn instantiate(
        &self,
        config: &ModuleConfig,
        progress: ProgressSink<Self::Handle>,
    ) -> Result<Self::Handle, Self::Error>;
}

/// Inputs for one bootstrap attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct BootstrapRequest {
    /// Loader script URL.
    pub loader_url: String,
    /// Rendering surface element id.
    pub surface_id: String,
    /// Whether the surface was found in the document.
    pub surface_present: bool,
    /// Configuration, fixed for the whole attempt.
    pub config: ModuleConfig,
}

/// Run one bootstrap attempt to completion.
///
/// Only the first call per controller does anything; later calls return
/// immediately. No `RefCell` borrow is held across an await point.
pub async fn run<L: ModuleLoader>(
    controller: &SharedController<L::Handle>,
    loader: &L,
    request: BootstrapRequest,
) {
    let BootstrapRequest {
        loader_url,
        surface_id,
        surface_present,
        config,
    } = request;

    if !controller
        .borrow_mut()
        .begin(surface_present, config.clone())
    {
        return;
    }

    log::info!("loading module script {loader_url}");
    if let Err(err) = loader.load_script(&loader_url).await {
        controller.borrow_mut().script_failed(err.to_string());
        return;
    }

    let factory_present = loader.has_factory();
    if !controller.borrow_mut().script_loaded(factory_present) {
        return;
    }

    // Must be in place before the factory runs; the module reads it during
    // instantiation.
    if let Err(err) = loader.install_input_routing(&surface_id) {
        log::warn!("input routing not installed: {err}");
    }

    let sink = ProgressSink::new(controller);
    match loader.instantiate(&config, sink).await {
        Ok(handle) => {
            controller.borrow_mut().instantiated(handle);
        }
        Err(err) => {
            controller.borrow_mut().instantiation_failed(err.to_string());
        }
    }
}
