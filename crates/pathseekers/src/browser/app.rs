//! WASM entry point.

use super::loader::{BrowserModuleLoader, BrowserRuntime};
use super::manifest::embedded_manifest;
use super::overlay::{OverlayPlan, OverlayView};
use super::viewport::{self, ViewportWatcher};
use gloo_events::EventListener;
use pathseekers_core::bootstrap::{self, shared};
use pathseekers_core::{
    BootstrapRequest, DeviceProfiler, LauncherManifest, LoadState, Overlay, SharedController,
};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, HtmlCanvasElement, Window};

/// Launcher bound to the host page.
///
/// Dropping it (or calling `free()` from JS) detaches the resize and click
/// listeners. A pending instantiation is not cancelled.
#[wasm_bindgen]
pub struct Launcher {
    window: Window,
    manifest: LauncherManifest,
    controller: SharedController<BrowserRuntime>,
    profiler: Rc<RefCell<DeviceProfiler>>,
    view: Rc<OverlayView>,
    watcher: Option<ViewportWatcher>,
    fullscreen_click: Option<EventListener>,
}

#[wasm_bindgen]
impl Launcher {
    /// Create a launcher using the manifest compiled into the bundle.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<Launcher, JsValue> {
        Self::from_manifest(embedded_manifest())
    }

    /// Create a launcher from a YAML manifest. Fails if it does not validate.
    pub fn with_manifest(yaml: &str) -> Result<Launcher, JsValue> {
        let manifest = LauncherManifest::load(yaml)
            .map_err(|e| JsValue::from_str(&format!("Invalid launcher manifest: {e}")))?;
        Self::from_manifest(manifest)
    }

    /// Mount: subscribe to resizes, wire the controls and start the
    /// bootstrap. Calling it again has no effect.
    pub fn start(&mut self) {
        if self.controller.borrow().is_started() {
            log::debug!("launcher already started");
            return;
        }

        self.attach_listeners();

        let document = self.window.document();
        let surface_id = self.manifest.surface.element_id.clone();
        let surface = document
            .as_ref()
            .and_then(|d| d.get_element_by_id(&surface_id))
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        // Resizes before start() had no watcher yet.
        let changed = self
            .profiler
            .borrow_mut()
            .sample(viewport::sample(&self.window));
        if changed {
            render(
                &self.view,
                self.controller.borrow().state(),
                &self.profiler.borrow(),
            );
        }
        let viewport = self.profiler.borrow().viewport();
        let config = self
            .manifest
            .config_builder()
            .build(viewport.profile(), viewport.device_pixel_ratio);
        let request = BootstrapRequest {
            loader_url: self.manifest.build.loader_url.clone(),
            surface_id,
            surface_present: surface.is_some(),
            config,
        };

        let Some(surface) = surface else {
            // Records MissingSurface through the same guarded path.
            self.controller
                .borrow_mut()
                .begin(false, request.config);
            return;
        };

        let loader = BrowserModuleLoader::new(
            self.window.clone(),
            surface,
            self.manifest.runtime.clone(),
        );
        let controller = Rc::clone(&self.controller);
        wasm_bindgen_futures::spawn_local(async move {
            bootstrap::run(&controller, &loader, request).await;
        });
    }

    /// Ask the module to enter fullscreen. Returns `false` before ready.
    pub fn request_fullscreen(&self) -> bool {
        self.controller.borrow().request_fullscreen()
    }

    /// Current state name (`idle`, `script-loading`, `instantiating`,
    /// `ready`, `failed`).
    pub fn state(&self) -> String {
        self.controller.borrow().state().label().to_string()
    }

    /// Failure message, if bootstrap failed.
    pub fn error(&self) -> Option<String> {
        self.controller
            .borrow()
            .state()
            .error()
            .map(ToString::to_string)
    }

    /// Loading progress as a whole percentage.
    pub fn progress_percent(&self) -> u8 {
        pathseekers_core::progress_percent(self.controller.borrow().state().progress())
    }

    /// Whether the module is interactive.
    pub fn is_ready(&self) -> bool {
        self.controller.borrow().state().is_ready()
    }

    /// Name of the visible overlay (`orientation`, `failure`, `loading`, `none`).
    pub fn overlay(&self) -> String {
        let profile = self.profiler.borrow().profile();
        self.controller.borrow().overlay(profile).name().to_string()
    }
}

impl Launcher {
    fn from_manifest(manifest: LauncherManifest) -> Result<Launcher, JsValue> {
        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;

        let profiler = Rc::new(RefCell::new(DeviceProfiler::new(viewport::sample(&window))));
        let view = Rc::new(OverlayView::from_document(&document, &manifest.surface));
        let controller = shared::<BrowserRuntime>();

        {
            let profiler = Rc::clone(&profiler);
            let view = Rc::clone(&view);
            controller.borrow_mut().subscribe(move |state: &LoadState| {
                render(&view, state, &profiler.borrow());
            });
        }

        render(&view, &LoadState::Idle, &profiler.borrow());

        Ok(Self {
            window,
            manifest,
            controller,
            profiler,
            view,
            watcher: None,
            fullscreen_click: None,
        })
    }

    fn attach_listeners(&mut self) {
        let profiler = Rc::clone(&self.profiler);
        let controller = Rc::clone(&self.controller);
        let view = Rc::clone(&self.view);
        self.watcher = Some(ViewportWatcher::new(&self.window, move |sample| {
            profiler.borrow_mut().sample(sample);
            if let Ok(controller) = controller.try_borrow() {
                render(&view, controller.state(), &profiler.borrow());
            }
        }));

        if let Some(button) = self.view.fullscreen_button() {
            let controller = Rc::clone(&self.controller);
            self.fullscreen_click = Some(EventListener::new(button, "click", move |_event| {
                if let Ok(controller) = controller.try_borrow() {
                    controller.request_fullscreen();
                }
            }));
        }
    }
}

fn render(view: &OverlayView, state: &LoadState, profiler: &DeviceProfiler) {
    let overlay = Overlay::select(state, profiler.profile());
    view.apply(&OverlayPlan::new(&overlay, state.is_ready()));
}

/// Initialize logging and the panic hook.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_ok() {
        log::info!("Running on wasm32.");
    }
}
