//! Overlay selection for the presentation host.
//!
//! Exactly one [`Overlay`] is shown at a time, chosen by priority:
//! orientation gate, failure, loading, then none.

use crate::device::DeviceProfile;
use crate::lifecycle::LoadState;

/// Convert a progress fraction to a whole percentage in `[0, 100]`.
#[must_use]
pub fn progress_percent(progress: f64) -> u8 {
    if !progress.is_finite() {
        return 0;
    }
    (progress.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// The overlay layered above the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// Ask the user to rotate a phone held in portrait.
    OrientationGate,
    /// Generic failure affordance.
    Failure,
    /// Loading indicator.
    Loading {
        /// Progress fraction in `[0, 1]`.
        progress: f64,
    },
    /// Nothing; the surface is interactive.
    None,
}

impl Overlay {
    /// Pick the overlay for a state and device.
    #[must_use]
    pub fn select(state: &LoadState, profile: DeviceProfile) -> Self {
        if profile.needs_rotation() {
            Self::OrientationGate
        } else if state.is_failed() {
            Self::Failure
        } else if !state.is_ready() {
            Self::Loading {
                progress: state.progress().clamp(0.0, 1.0),
            }
        } else {
            Self::None
        }
    }

    /// Percentage shown by the loading overlay.
    #[must_use]
    pub fn percent(&self) -> Option<u8> {
        match self {
            Self::Loading { progress } => Some(progress_percent(*progress)),
            _ => None,
        }
    }

    /// Bar width as a CSS percentage string, e.g. `"42%"`.
    #[must_use]
    pub fn bar_width(&self) -> Option<String> {
        match self {
            Self::Loading { progress } => Some(format!("{}%", progress * 100.0)),
            _ => None,
        }
    }

    /// Whether pointer and keyboard input to the surface is blocked.
    #[must_use]
    pub const fn blocks_interaction(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// Stable name, used as a DOM data attribute.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::OrientationGate => "orientation",
            Self::Failure => "failure",
            Self::Loading { .. } => "loading",
            Self::None => "none",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::BootstrapError;
    use proptest::prelude::*;

    const DESKTOP: DeviceProfile = DeviceProfile {
        is_mobile: false,
        is_portrait: false,
    };
    const PHONE_PORTRAIT: DeviceProfile = DeviceProfile {
        is_mobile: true,
        is_portrait: true,
    };
    const PHONE_LANDSCAPE: DeviceProfile = DeviceProfile {
        is_mobile: true,
        is_portrait: false,
    };

    fn all_states() -> Vec<LoadState> {
        vec![
            LoadState::Idle,
            LoadState::ScriptLoading,
            LoadState::Instantiating { progress: 0.3 },
            LoadState::Ready,
            LoadState::Failed(BootstrapError::MissingFactory),
        ]
    }

    #[test]
    fn test_orientation_gate_beats_every_state() {
        for state in all_states() {
            assert_eq!(Overlay::select(&state, PHONE_PORTRAIT), Overlay::OrientationGate);
        }
    }

    #[test]
    fn test_desktop_portrait_is_not_gated() {
        let tall_desktop = DeviceProfile {
            is_mobile: false,
            is_portrait: true,
        };
        assert_eq!(Overlay::select(&LoadState::Ready, tall_desktop), Overlay::None);
    }

    #[test]
    fn test_loading_until_ready() {
        let overlay = Overlay::select(&LoadState::Instantiating { progress: 0.42 }, PHONE_LANDSCAPE);
        assert_eq!(overlay, Overlay::Loading { progress: 0.42 });
        assert_eq!(overlay.percent(), Some(42));
        assert!(overlay.blocks_interaction());

        assert_eq!(
            Overlay::select(&LoadState::ScriptLoading, DESKTOP).percent(),
            Some(0)
        );
    }

    #[test]
    fn test_ready_shows_nothing() {
        let overlay = Overlay::select(&LoadState::Ready, DESKTOP);
        assert_eq!(overlay, Overlay::None);
        assert!(!overlay.blocks_interaction());
        assert_eq!(overlay.percent(), None);
    }

    #[test]
    fn test_failure_replaces_loading() {
        let state = LoadState::Failed(BootstrapError::InstantiationFailure("x".to_string()));
        assert_eq!(Overlay::select(&state, DESKTOP), Overlay::Failure);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(progress_percent(0.0), 0);
        assert_eq!(progress_percent(0.004), 0);
        assert_eq!(progress_percent(0.005), 1);
        assert_eq!(progress_percent(0.999), 100);
        assert_eq!(progress_percent(1.0), 100);
        assert_eq!(progress_percent(f64::NAN), 0);
    }

    #[test]
    fn test_bar_width() {
        let overlay = Overlay::Loading { progress: 0.5 };
        assert_eq!(overlay.bar_width().as_deref(), Some("50%"));
        assert_eq!(Overlay::None.bar_width(), None);
    }

    proptest! {
        #[test]
        fn prop_percent_is_rounded_and_bounded(p in 0.0f64..=1.0) {
            let percent = progress_percent(p);
            prop_assert!(percent <= 100);
            prop_assert_eq!(f64::from(percent), (p * 100.0).round());
        }

        #[test]
        fn prop_percent_bounded_for_any_input(p in any::<f64>()) {
            prop_assert!(progress_percent(p) <= 100);
        }
    }
}
