//! Manifest embedded into the wasm bundle.

use pathseekers_core::LauncherManifest;

/// `assets/launcher.yaml`, compiled in.
pub const EMBEDDED_MANIFEST: &str = include_str!("../../assets/launcher.yaml");

/// Parse a manifest, falling back to defaults if it is unusable.
pub fn manifest_or_default(yaml: &str) -> LauncherManifest {
    LauncherManifest::load(yaml).unwrap_or_else(|err| {
        log::warn!("Failed to load launcher manifest: {err}, falling back to default");
        LauncherManifest::default()
    })
}

/// The embedded manifest.
pub fn embedded_manifest() -> LauncherManifest {
    manifest_or_default(EMBEDDED_MANIFEST)
}
