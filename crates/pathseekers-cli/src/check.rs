//! Manifest validation against a build directory.

use pathseekers_core::{LauncherManifest, ModuleConfig};
use std::fs;
use std::path::{Path, PathBuf};

/// Where a build URL was looked for and whether it was found. Remote URLs
/// have no local location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStatus {
    pub field: &'static str,
    pub url: String,
    pub location: Option<PathBuf>,
    pub present: bool,
}

/// Parse and validate a manifest, then look for its build under `root`.
pub fn run(manifest_path: &Path, root: &Path) -> Result<(), String> {
    println!("Checking manifest: {}", manifest_path.display());

    let content = fs::read_to_string(manifest_path)
        .map_err(|e| format!("Failed to read manifest: {}", e))?;
    let manifest =
        LauncherManifest::load(&content).map_err(|e| format!("Manifest invalid: {}", e))?;

    println!("Manifest valid!");
    println!(
        "  Product: {} {} ({})",
        manifest.identity.product_name,
        manifest.identity.product_version,
        manifest.identity.company_name
    );
    println!("  Surface: #{}", manifest.surface.element_id);
    println!("  Factory: {}", manifest.runtime.factory_global);

    let statuses = inspect(&manifest, root);
    let mut missing = 0;
    for status in &statuses {
        match (&status.location, status.present) {
            (None, _) => println!("  {:<22} {} (remote, skipped)", status.field, status.url),
            (Some(path), true) => println!("  {:<22} {}", status.field, path.display()),
            (Some(path), false) => {
                missing += 1;
                println!("  {:<22} {} MISSING", status.field, path.display());
            }
        }
    }

    for (label, profile) in sample_profiles() {
        let config: ModuleConfig = manifest.config_builder().build(profile, 1.0);
        log::info!(
            "{} config: devicePixelRatio={}",
            label,
            config.pixel_ratio
        );
    }

    if missing > 0 {
        return Err(format!(
            "{} build artifact(s) missing under {}",
            missing,
            root.display()
        ));
    }
    Ok(())
}

/// Resolve every build URL of `manifest` against `root`.
pub fn inspect(manifest: &LauncherManifest, root: &Path) -> Vec<ArtifactStatus> {
    manifest
        .build
        .entries()
        .into_iter()
        .map(|(field, url)| {
            let location = local_path(root, url);
            let present = location.as_deref().is_some_and(|path| {
                if field == "streaming_assets_url" {
                    path.is_dir()
                } else {
                    path.is_file()
                }
            });
            ArtifactStatus {
                field,
                url: url.to_string(),
                location,
                present,
            }
        })
        .collect()
}

fn local_path(root: &Path, url: &str) -> Option<PathBuf> {
    if url.contains("://") || url.starts_with("//") {
        return None;
    }
    let path = url.split(['?', '#']).next().unwrap_or_default();
    Some(root.join(path.trim_start_matches('/')))
}

fn sample_profiles() -> [(&'static str, pathseekers_core::DeviceProfile); 2] {
    use pathseekers_core::Viewport;
    [
        ("desktop", Viewport::new(1280.0, 800.0).profile()),
        ("mobile", Viewport::new(700.0, 390.0).profile()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_build(name: &str, files: &[&str]) -> PathBuf {
        let root = std::env::temp_dir().join(format!("pathseekers-check-{}", name));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(root.join("Build")).unwrap();
        for file in files {
            fs::write(root.join(file), b"").unwrap();
        }
        root
    }

    const FULL_BUILD: [&str; 4] = [
        "Build/BuildWeb.loader.js",
        "Build/BuildWeb.data",
        "Build/BuildWeb.framework.js",
        "Build/BuildWeb.wasm",
    ];

    #[test]
    fn test_inspect_complete_build() {
        let root = temp_build("complete", &FULL_BUILD);
        fs::create_dir_all(root.join("StreamingAssets")).unwrap();

        let statuses = inspect(&LauncherManifest::default(), &root);
        assert_eq!(statuses.len(), 5);
        assert!(statuses.iter().all(|s| s.present));
        assert_eq!(statuses[0].field, "loader_url");

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_inspect_reports_missing_files() {
        let root = temp_build("missing", &FULL_BUILD[..2]);

        let statuses = inspect(&LauncherManifest::default(), &root);
        let missing: Vec<&str> = statuses
            .iter()
            .filter(|s| !s.present)
            .map(|s| s.field)
            .collect();
        assert_eq!(
            missing,
            vec!["framework_url", "code_url", "streaming_assets_url"]
        );

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_remote_urls_are_skipped() {
        let mut manifest = LauncherManifest::default();
        manifest.build.data_url = "https://cdn.example.com/BuildWeb.data".to_string();

        let statuses = inspect(&manifest, Path::new("/nonexistent"));
        let data = statuses.iter().find(|s| s.field == "data_url").unwrap();
        assert_eq!(data.location, None);
        assert!(!data.present);
    }

    #[test]
    fn test_local_path_strips_query_and_leading_slash() {
        assert_eq!(
            local_path(Path::new("www"), "/Build/BuildWeb.wasm?v=2"),
            Some(PathBuf::from("www/Build/BuildWeb.wasm"))
        );
        assert_eq!(local_path(Path::new("www"), "//cdn/x.js"), None);
    }

    #[test]
    fn test_run_fails_on_invalid_manifest() {
        let root = temp_build("invalid", &FULL_BUILD);
        let manifest = root.join("launcher.yaml");
        fs::write(&manifest, "build:\n  loader_url: ''\n").unwrap();

        let err = run(&manifest, &root).unwrap_err();
        assert!(err.starts_with("Manifest invalid"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_run_fails_on_missing_artifacts() {
        let root = temp_build("run-missing", &FULL_BUILD[..1]);
        let manifest = root.join("launcher.yaml");
        fs::write(&manifest, "identity:\n  product_version: '2.0'\n").unwrap();

        let err = run(&manifest, &root).unwrap_err();
        assert!(err.contains("missing"));

        let _ = fs::remove_dir_all(&root);
    }

    #[test]
    fn test_run_passes_on_complete_build() {
        let root = temp_build("run-ok", &FULL_BUILD);
        fs::create_dir_all(root.join("StreamingAssets")).unwrap();
        let manifest = root.join("launcher.yaml");
        fs::write(&manifest, "{}\n").unwrap();

        assert!(run(&manifest, &root).is_ok());

        let _ = fs::remove_dir_all(&root);
    }
}
