//! Module instantiation configuration.
//!
//! [`ConfigBuilder`] turns a [`DeviceProfile`] plus fixed identity constants
//! into the [`ModuleConfig`] handed to the module factory. Building is pure
//! and cannot fail.

use crate::device::DeviceProfile;
use serde::{Deserialize, Serialize};

/// Addresses of the module's build artifacts. Passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildUrls {
    /// Loader script that installs the global factory.
    pub loader_url: String,
    /// Data payload.
    pub data_url: String,
    /// Framework script.
    pub framework_url: String,
    /// Binary code payload.
    pub code_url: String,
    /// Streaming assets root.
    pub streaming_assets_url: String,
}

impl Default for BuildUrls {
    fn default() -> Self {
        Self {
            loader_url: "/Build/BuildWeb.loader.js".to_string(),
            data_url: "/Build/BuildWeb.data".to_string(),
            framework_url: "/Build/BuildWeb.framework.js".to_string(),
            code_url: "/Build/BuildWeb.wasm".to_string(),
            streaming_assets_url: "StreamingAssets".to_string(),
        }
    }
}

impl BuildUrls {
    /// All URLs with their manifest field names, loader first.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("loader_url", &self.loader_url),
            ("data_url", &self.data_url),
            ("framework_url", &self.framework_url),
            ("code_url", &self.code_url),
            ("streaming_assets_url", &self.streaming_assets_url),
        ]
    }
}

/// Identity metadata reported to the module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleIdentity {
    /// Company name.
    pub company_name: String,
    /// Product name.
    pub product_name: String,
    /// Product version.
    pub product_version: String,
}

impl Default for ModuleIdentity {
    fn default() -> Self {
        Self {
            company_name: "Research Project".to_string(),
            product_name: "A* vs JPS Benchmark".to_string(),
            product_version: "1.0".to_string(),
        }
    }
}

/// Pixel ratio selection for one device class.
///
/// In YAML this is either the keyword `native` or a positive number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PixelRatioRepr", into = "PixelRatioRepr")]
pub enum PixelRatio {
    /// Use the host's reported device pixel ratio.
    Native,
    /// Use a fixed factor regardless of the host.
    Fixed(f64),
}

impl PixelRatio {
    /// Resolve against the host's native ratio.
    ///
    /// Non-finite or non-positive inputs fall back to `1.0`.
    #[must_use]
    pub fn resolve(self, native: f64) -> f64 {
        let ratio = match self {
            Self::Native => native,
            Self::Fixed(factor) => factor,
        };
        if ratio.is_finite() && ratio > 0.0 {
            ratio
        } else {
            1.0
        }
    }

    /// Whether a fixed factor is usable.
    #[must_use]
    pub fn is_valid(self) -> bool {
        match self {
            Self::Native => true,
            Self::Fixed(factor) => factor.is_finite() && factor > 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum PixelRatioRepr {
    Factor(f64),
    Keyword(String),
}

impl TryFrom<PixelRatioRepr> for PixelRatio {
    type Error = String;

    fn try_from(repr: PixelRatioRepr) -> Result<Self, Self::Error> {
        match repr {
            PixelRatioRepr::Factor(factor) => Ok(Self::Fixed(factor)),
            PixelRatioRepr::Keyword(word) if word.eq_ignore_ascii_case("native") => {
                Ok(Self::Native)
            }
            PixelRatioRepr::Keyword(word) => Err(format!(
                "expected `native` or a number for pixel ratio, got `{word}`"
            )),
        }
    }
}

impl From<PixelRatio> for PixelRatioRepr {
    fn from(ratio: PixelRatio) -> Self {
        match ratio {
            PixelRatio::Native => Self::Keyword("native".to_string()),
            PixelRatio::Fixed(factor) => Self::Factor(factor),
        }
    }
}

/// Pixel ratio per device class.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixelRatioPolicy {
    /// Ratio for mobile profiles. Upscaled to offset the small canvas.
    pub mobile: PixelRatio,
    /// Ratio for desktop profiles.
    pub desktop: PixelRatio,
}

impl Default for PixelRatioPolicy {
    fn default() -> Self {
        Self {
            mobile: PixelRatio::Fixed(2.0),
            desktop: PixelRatio::Native,
        }
    }
}

impl PixelRatioPolicy {
    /// Pick the ratio for a profile.
    #[must_use]
    pub fn select(&self, profile: DeviceProfile, native: f64) -> f64 {
        if profile.is_mobile {
            self.mobile.resolve(native)
        } else {
            self.desktop.resolve(native)
        }
    }
}

/// Configuration handed to the module factory.
///
/// Field names serialize to the shape the module's loader expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleConfig {
    /// Data payload URL.
    pub data_url: String,
    /// Framework script URL.
    pub framework_url: String,
    /// Binary code URL.
    pub code_url: String,
    /// Streaming assets root.
    pub streaming_assets_url: String,
    /// Company name.
    pub company_name: String,
    /// Product name.
    pub product_name: String,
    /// Product version.
    pub product_version: String,
    /// The drawing buffer tracks the surface's CSS size.
    #[serde(rename = "matchWebGLToCanvasSize")]
    pub match_host_surface_size: bool,
    /// Pixel ratio for the drawing buffer.
    #[serde(rename = "devicePixelRatio")]
    pub pixel_ratio: f64,
}

impl ModuleConfig {
    /// Serialize to the JSON object passed to the factory.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Builds [`ModuleConfig`] values from a device profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigBuilder {
    urls: BuildUrls,
    identity: ModuleIdentity,
    policy: PixelRatioPolicy,
}

impl ConfigBuilder {
    /// Create a builder from its fixed inputs.
    #[must_use]
    pub const fn new(urls: BuildUrls, identity: ModuleIdentity, policy: PixelRatioPolicy) -> Self {
        Self {
            urls,
            identity,
            policy,
        }
    }

    /// Build artifact URLs.
    #[must_use]
    pub const fn urls(&self) -> &BuildUrls {
        &self.urls
    }

    /// Build the configuration for one bootstrap attempt.
    #[must_use]
    pub fn build(&self, profile: DeviceProfile, native_pixel_ratio: f64) -> ModuleConfig {
        ModuleConfig {
            data_url: self.urls.data_url.clone(),
            framework_url: self.urls.framework_url.clone(),
            code_url: self.urls.code_url.clone(),
            streaming_assets_url: self.urls.streaming_assets_url.clone(),
            company_name: self.identity.company_name.clone(),
            product_name: self.identity.product_name.clone(),
            product_version: self.identity.product_version.clone(),
            match_host_surface_size: true,
            pixel_ratio: self.policy.select(profile, native_pixel_ratio),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: DeviceProfile = DeviceProfile {
        is_mobile: false,
        is_portrait: false,
    };
    const MOBILE: DeviceProfile = DeviceProfile {
        is_mobile: true,
        is_portrait: false,
    };

    #[test]
    fn test_desktop_uses_native_ratio() {
        let config = ConfigBuilder::default().build(DESKTOP, 1.25);
        assert_eq!(config.pixel_ratio, 1.25);
        assert!(config.match_host_surface_size);
    }

    #[test]
    fn test_mobile_uses_fixed_factor() {
        let config = ConfigBuilder::default().build(MOBILE, 3.0);
        assert_eq!(config.pixel_ratio, 2.0);
    }

    #[test]
    fn test_invalid_native_ratio_falls_back() {
        assert_eq!(PixelRatio::Native.resolve(f64::NAN), 1.0);
        assert_eq!(PixelRatio::Native.resolve(0.0), 1.0);
        assert_eq!(PixelRatio::Fixed(-2.0).resolve(2.0), 1.0);
    }

    #[test]
    fn test_urls_passed_verbatim() {
        let urls = BuildUrls {
            data_url: "cdn://x/y.data?v=3".to_string(),
            ..BuildUrls::default()
        };
        let builder = ConfigBuilder::new(urls, ModuleIdentity::default(), PixelRatioPolicy::default());
        let config = builder.build(DESKTOP, 1.0);
        assert_eq!(config.data_url, "cdn://x/y.data?v=3");
        assert_eq!(config.code_url, "/Build/BuildWeb.wasm");
    }

    #[test]
    fn test_config_json_shape() {
        let json = ConfigBuilder::default().build(DESKTOP, 1.0).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["dataUrl"], "/Build/BuildWeb.data");
        assert_eq!(value["frameworkUrl"], "/Build/BuildWeb.framework.js");
        assert_eq!(value["streamingAssetsUrl"], "StreamingAssets");
        assert_eq!(value["productName"], "A* vs JPS Benchmark");
        assert_eq!(value["matchWebGLToCanvasSize"], true);
        assert_eq!(value["devicePixelRatio"], 1.0);
    }

    #[test]
    fn test_pixel_ratio_yaml_forms() {
        let policy: PixelRatioPolicy =
            serde_yaml_ng::from_str("mobile: 1.5\ndesktop: native\n").unwrap();
        assert_eq!(policy.mobile, PixelRatio::Fixed(1.5));
        assert_eq!(policy.desktop, PixelRatio::Native);

        let err = serde_yaml_ng::from_str::<PixelRatioPolicy>("mobile: huge\n");
        assert!(err.is_err());
    }
}
