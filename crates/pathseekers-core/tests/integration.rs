//! End-to-end bootstrap scenarios against a scripted module.

use pathseekers_core::bootstrap::{self, shared};
use pathseekers_core::{
    BootstrapError, BootstrapRequest, ControlError, DeviceProfile, LauncherManifest, LoadState,
    ModuleConfig, ModuleLoader, Overlay, ProgressSink, RuntimeHandle, Viewport,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// =============================================================================
// Scripted module
// =============================================================================

#[derive(Debug, Default)]
struct Handle {
    fullscreen_calls: Rc<Cell<u32>>,
}

impl RuntimeHandle for Handle {
    fn set_fullscreen(&self, enabled: bool) -> Result<(), ControlError> {
        assert!(enabled);
        self.fullscreen_calls.set(self.fullscreen_calls.get() + 1);
        Ok(())
    }
}

#[derive(Default)]
struct ScriptedModule {
    script_error: Option<String>,
    installs_factory: bool,
    progress: Vec<f64>,
    reject_with: Option<String>,
    log: RefCell<Vec<String>>,
    factory_calls: Cell<u32>,
    script_loads: Cell<u32>,
    seen_config: RefCell<Option<ModuleConfig>>,
    fullscreen_calls: Rc<Cell<u32>>,
}

impl ScriptedModule {
    fn resolving(progress: &[f64]) -> Self {
        Self {
            installs_factory: true,
            progress: progress.to_vec(),
            ..Self::default()
        }
    }
}

impl ModuleLoader for ScriptedModule {
    type Handle = Handle;
    type Error = String;

    async fn load_script(&self, url: &str) -> Result<(), String> {
        self.script_loads.set(self.script_loads.get() + 1);
        self.log.borrow_mut().push(format!("script {url}"));
        match &self.script_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn has_factory(&self) -> bool {
        self.installs_factory
    }

    fn install_input_routing(&self, surface_id: &str) -> Result<(), String> {
        self.log.borrow_mut().push(format!("routing {surface_id}"));
        Ok(())
    }

    async fn instantiate(
        &self,
        config: &ModuleConfig,
        progress: ProgressSink<Handle>,
    ) -> Result<Handle, String> {
        self.factory_calls.set(self.factory_calls.get() + 1);
        self.log.borrow_mut().push("factory".to_string());
        *self.seen_config.borrow_mut() = Some(config.clone());
        for p in &self.progress {
            progress.report(*p);
        }
        match &self.reject_with {
            Some(err) => Err(err.clone()),
            None => Ok(Handle {
                fullscreen_calls: Rc::clone(&self.fullscreen_calls),
            }),
        }
    }
}

fn request(viewport: Viewport) -> BootstrapRequest {
    let manifest = LauncherManifest::default();
    BootstrapRequest {
        loader_url: manifest.build.loader_url.clone(),
        surface_id: manifest.surface.element_id.clone(),
        surface_present: true,
        config: manifest
            .config_builder()
            .build(viewport.profile(), viewport.device_pixel_ratio),
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_desktop_bootstrap_reaches_ready() {
    let viewport = Viewport::new(1024.0, 768.0).with_pixel_ratio(1.5);
    let profile = viewport.profile();
    assert_eq!(
        profile,
        DeviceProfile {
            is_mobile: false,
            is_portrait: false
        }
    );

    let controller = shared::<Handle>();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    controller
        .borrow_mut()
        .subscribe(move |state: &LoadState| sink.borrow_mut().push(state.progress()));

    let module = ScriptedModule::resolving(&[0.2, 0.6, 1.0]);
    pollster::block_on(bootstrap::run(&controller, &module, request(viewport)));

    let controller = controller.borrow();
    assert_eq!(controller.state(), &LoadState::Ready);
    assert_eq!(controller.overlay(profile), Overlay::None);
    assert!(controller.handle().is_some());
    assert_eq!(module.seen_config.borrow().as_ref().map(|c| c.pixel_ratio), Some(1.5));
    // script-loading, instantiating(0), three progress updates, ready
    assert_eq!(*seen.borrow(), vec![0.0, 0.0, 0.2, 0.6, 1.0, 1.0]);
}

#[test]
fn test_input_routing_installed_before_factory() {
    let controller = shared::<Handle>();
    let module = ScriptedModule::resolving(&[]);
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));

    assert_eq!(
        *module.log.borrow(),
        vec![
            "script /Build/BuildWeb.loader.js".to_string(),
            "routing unity-canvas".to_string(),
            "factory".to_string(),
        ]
    );
}

#[test]
fn test_retrigger_does_not_spawn_second_factory() {
    let controller = shared::<Handle>();
    let module = ScriptedModule::resolving(&[0.5]);
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));

    assert_eq!(module.script_loads.get(), 1);
    assert_eq!(module.factory_calls.get(), 1);
    assert!(controller.borrow().state().is_ready());
}

#[test]
fn test_phone_portrait_gated_while_pending() {
    let viewport = Viewport::new(400.0, 800.0);
    let profile = viewport.profile();
    assert!(profile.is_mobile && profile.is_portrait);

    let controller = shared::<Handle>();
    {
        let mut controller = controller.borrow_mut();
        controller.begin(true, request(viewport).config);
        controller.script_loaded(true);
        controller.progress(0.3);
    }
    assert_eq!(controller.borrow().overlay(profile), Overlay::OrientationGate);
}

#[test]
fn test_factory_rejection_becomes_failed_state() {
    let controller = shared::<Handle>();
    let module = ScriptedModule {
        reject_with: Some("wasm load failed".to_string()),
        ..ScriptedModule::resolving(&[0.1])
    };
    let profile = Viewport::default().profile();
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));

    let controller = controller.borrow();
    assert_eq!(
        controller.state(),
        &LoadState::Failed(BootstrapError::InstantiationFailure(
            "wasm load failed".to_string()
        ))
    );
    assert_eq!(controller.overlay(profile), Overlay::Failure);
    assert!(controller.handle().is_none());
    assert!(!controller.request_fullscreen());
}

#[test]
fn test_missing_factory_skips_instantiation() {
    let controller = shared::<Handle>();
    let module = ScriptedModule::default();
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));

    assert_eq!(
        controller.borrow().state().error(),
        Some(&BootstrapError::MissingFactory)
    );
    assert_eq!(module.factory_calls.get(), 0);
    assert_eq!(
        *module.log.borrow(),
        vec!["script /Build/BuildWeb.loader.js".to_string()]
    );
}

#[test]
fn test_script_error_becomes_failed_state() {
    let controller = shared::<Handle>();
    let module = ScriptedModule {
        script_error: Some("404".to_string()),
        ..ScriptedModule::resolving(&[])
    };
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));

    assert_eq!(
        controller.borrow().state().error(),
        Some(&BootstrapError::ScriptLoad("404".to_string()))
    );
    assert_eq!(module.factory_calls.get(), 0);
}

#[test]
fn test_missing_surface_never_loads_script() {
    let controller = shared::<Handle>();
    let module = ScriptedModule::resolving(&[]);
    let mut req = request(Viewport::default());
    req.surface_present = false;
    pollster::block_on(bootstrap::run(&controller, &module, req));

    assert_eq!(
        controller.borrow().state().error(),
        Some(&BootstrapError::MissingSurface)
    );
    assert_eq!(module.script_loads.get(), 0);
}

#[test]
fn test_fullscreen_forwarded_only_after_ready() {
    let controller = shared::<Handle>();
    assert!(!controller.borrow().request_fullscreen());

    let module = ScriptedModule::resolving(&[1.0]);
    pollster::block_on(bootstrap::run(&controller, &module, request(Viewport::default())));

    assert!(controller.borrow().request_fullscreen());
    assert_eq!(module.fullscreen_calls.get(), 1);
}

#[test]
fn test_mobile_config_uses_fixed_ratio() {
    let controller = shared::<Handle>();
    let module = ScriptedModule::resolving(&[]);
    let viewport = Viewport::new(700.0, 400.0).with_pixel_ratio(3.0);
    pollster::block_on(bootstrap::run(&controller, &module, request(viewport)));

    assert_eq!(
        controller.borrow().config().map(|c| c.pixel_ratio),
        Some(2.0)
    );
}
