//! Launcher manifest loaded from `launcher.yaml`.
//!
//! Every field has a default matching the shipped build, so an empty
//! document is a valid manifest.

use crate::config::{BuildUrls, ConfigBuilder, ModuleIdentity, PixelRatioPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for manifest parsing and validation.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// YAML parsing error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
    /// Missing or empty required field
    #[error("Missing required field: {0}")]
    MissingField(String),
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Error message
        message: String,
    },
}

/// DOM element identifiers used by the host page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Rendering surface (canvas) element id.
    pub element_id: String,
    /// Loading overlay element id.
    pub loading_overlay_id: String,
    /// Element showing the loading percentage.
    pub progress_label_id: String,
    /// Element whose width tracks progress.
    pub progress_bar_id: String,
    /// Orientation gate overlay element id.
    pub orientation_overlay_id: String,
    /// Failure overlay element id.
    pub failure_overlay_id: String,
    /// Fullscreen button element id.
    pub fullscreen_button_id: String,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            element_id: "unity-canvas".to_string(),
            loading_overlay_id: "loading-overlay".to_string(),
            progress_label_id: "loading-percent".to_string(),
            progress_bar_id: "loading-bar".to_string(),
            orientation_overlay_id: "orientation-overlay".to_string(),
            failure_overlay_id: "failure-overlay".to_string(),
            fullscreen_button_id: "fullscreen-button".to_string(),
        }
    }
}

/// Names of the globals and entry points the module exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeBindings {
    /// Global factory installed by the loader script.
    pub factory_global: String,
    /// Global object read by the module for input routing. Empty disables it.
    pub input_routing_global: String,
    /// Property on that object naming the element that receives keyboard input.
    pub input_routing_property: String,
    /// Fullscreen method on the runtime instance.
    pub fullscreen_method: String,
}

impl Default for RuntimeBindings {
    fn default() -> Self {
        Self {
            factory_global: "createUnityInstance".to_string(),
            input_routing_global: "Module".to_string(),
            input_routing_property: "keyboardListeningElement".to_string(),
            fullscreen_method: "SetFullscreen".to_string(),
        }
    }
}

/// Launcher manifest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherManifest {
    /// Build artifact URLs.
    pub build: BuildUrls,
    /// Identity reported to the module.
    pub identity: ModuleIdentity,
    /// Host page elements.
    pub surface: SurfaceConfig,
    /// Pixel ratio per device class.
    pub pixel_ratio: PixelRatioPolicy,
    /// Module globals and entry points.
    pub runtime: RuntimeBindings,
}

impl LauncherManifest {
    /// Parse a manifest from YAML without validating it.
    pub fn from_yaml(yaml: &str) -> Result<Self, ManifestError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse and validate.
    pub fn load(yaml: &str) -> Result<Self, ManifestError> {
        let manifest = Self::from_yaml(yaml)?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Serialize back to YAML.
    pub fn to_yaml(&self) -> Result<String, ManifestError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check that every required field is usable.
    pub fn validate(&self) -> Result<(), ManifestError> {
        for (name, url) in self.build.entries() {
            require(&format!("build.{name}"), url)?;
        }
        require("surface.element_id", &self.surface.element_id)?;
        require("runtime.factory_global", &self.runtime.factory_global)?;
        require("runtime.fullscreen_method", &self.runtime.fullscreen_method)?;
        if !self.runtime.input_routing_global.is_empty() {
            require(
                "runtime.input_routing_property",
                &self.runtime.input_routing_property,
            )?;
        }

        for (field, ratio) in [
            ("pixel_ratio.mobile", self.pixel_ratio.mobile),
            ("pixel_ratio.desktop", self.pixel_ratio.desktop),
        ] {
            if !ratio.is_valid() {
                return Err(ManifestError::InvalidValue {
                    field: field.to_string(),
                    message: "must be `native` or a positive number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Configuration builder for this manifest.
    #[must_use]
    pub fn config_builder(&self) -> ConfigBuilder {
        ConfigBuilder::new(
            self.build.clone(),
            self.identity.clone(),
            self.pixel_ratio,
        )
    }
}

fn require(field: &str, value: &str) -> Result<(), ManifestError> {
    if value.trim().is_empty() {
        Err(ManifestError::MissingField(field.to_string()))
    } else {
        Ok(())
    }
}
