//! Device classification from viewport samples.
//!
//! A [`DeviceProfile`] is derived from exactly one [`Viewport`] sample, so the
//! mobile and portrait flags always describe the same moment.

use serde::{Deserialize, Serialize};

/// Viewport widths strictly below this are treated as mobile (logical pixels).
pub const MOBILE_BREAKPOINT: f64 = 768.0;

/// One sample of the host viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
    /// Native device pixel ratio reported by the host.
    pub device_pixel_ratio: f64,
}

impl Viewport {
    /// Create a viewport sample with a pixel ratio of 1.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio: 1.0,
        }
    }

    /// Set the native pixel ratio.
    #[must_use]
    pub const fn with_pixel_ratio(mut self, ratio: f64) -> Self {
        self.device_pixel_ratio = ratio;
        self
    }

    /// Classify this sample.
    #[must_use]
    pub fn profile(&self) -> DeviceProfile {
        DeviceProfile::from_viewport(self)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1024.0, 768.0)
    }
}

/// Device class and orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Viewport is narrower than [`MOBILE_BREAKPOINT`].
    pub is_mobile: bool,
    /// Viewport is strictly taller than it is wide.
    pub is_portrait: bool,
}

impl DeviceProfile {
    /// Derive a profile from a single viewport sample.
    #[must_use]
    pub fn from_viewport(viewport: &Viewport) -> Self {
        Self {
            is_mobile: viewport.width < MOBILE_BREAKPOINT,
            is_portrait: viewport.height > viewport.width,
        }
    }

    /// Mobile held in portrait: the module is unusable until rotated.
    #[must_use]
    pub const fn needs_rotation(&self) -> bool {
        self.is_mobile && self.is_portrait
    }
}

/// Tracks the latest viewport sample and the profile derived from it.
#[derive(Debug, Clone, Default)]
pub struct DeviceProfiler {
    viewport: Viewport,
    profile: DeviceProfile,
    samples: u64,
}

impl DeviceProfiler {
    /// Create a profiler seeded with an initial sample.
    #[must_use]
    pub fn new(initial: Viewport) -> Self {
        Self {
            viewport: initial,
            profile: initial.profile(),
            samples: 1,
        }
    }

    /// Record a new sample. Returns `true` if the profile changed.
    pub fn sample(&mut self, viewport: Viewport) -> bool {
        let next = viewport.profile();
        let changed = next != self.profile;
        self.viewport = viewport;
        self.profile = next;
        self.samples += 1;
        if changed {
            log::debug!(
                "device profile changed: mobile={} portrait={} ({}x{})",
                next.is_mobile,
                next.is_portrait,
                viewport.width,
                viewport.height
            );
        }
        changed
    }

    /// Current profile.
    #[must_use]
    pub const fn profile(&self) -> DeviceProfile {
        self.profile
    }

    /// Most recent sample.
    #[must_use]
    pub const fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Number of samples recorded, including the initial one.
    #[must_use]
    pub const fn sample_count(&self) -> u64 {
        self.samples
    }
}
