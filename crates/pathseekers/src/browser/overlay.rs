//! DOM overlays above the rendering surface.
//!
//! [`OverlayPlan`] is the platform-independent description of what the page
//! should show; `OverlayView` applies it to the document on wasm.

use pathseekers_core::Overlay;

/// Element visibility and content for one overlay selection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayPlan {
    /// Loading overlay visible.
    pub loading_visible: bool,
    /// Orientation gate visible.
    pub orientation_visible: bool,
    /// Failure affordance visible.
    pub failure_visible: bool,
    /// Text for the percentage label, e.g. `"42%"`.
    pub percent_label: Option<String>,
    /// CSS width for the progress bar.
    pub bar_width: Option<String>,
    /// Fullscreen button enabled.
    pub fullscreen_enabled: bool,
    /// Value for the surface's `data-overlay` attribute.
    pub overlay_name: &'static str,
}

impl OverlayPlan {
    /// Build the plan for an overlay.
    ///
    /// The fullscreen control is only offered when nothing covers the
    /// surface and the module is ready.
    #[must_use]
    pub fn new(overlay: &Overlay, controls_enabled: bool) -> Self {
        Self {
            loading_visible: matches!(overlay, Overlay::Loading { .. }),
            orientation_visible: matches!(overlay, Overlay::OrientationGate),
            failure_visible: matches!(overlay, Overlay::Failure),
            percent_label: overlay.percent().map(|p| format!("{p}%")),
            bar_width: overlay.bar_width(),
            fullscreen_enabled: controls_enabled && !overlay.blocks_interaction(),
            overlay_name: overlay.name(),
        }
    }

    /// Number of overlays visible at once. Always 0 or 1.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        [
            self.loading_visible,
            self.orientation_visible,
            self.failure_visible,
        ]
        .into_iter()
        .filter(|v| *v)
        .count()
    }
}

#[cfg(target_arch = "wasm32")]
pub use dom::OverlayView;

#[cfg(target_arch = "wasm32")]
mod dom {
    use super::OverlayPlan;
    use pathseekers_core::SurfaceConfig;
    use wasm_bindgen::JsCast;
    use web_sys::{Document, HtmlButtonElement, HtmlElement};

    /// Overlay elements looked up once from the document.
    ///
    /// Missing elements are skipped; the page stays usable without them.
    #[derive(Debug, Clone)]
    pub struct OverlayView {
        surface: Option<HtmlElement>,
        loading: Option<HtmlElement>,
        percent: Option<HtmlElement>,
        bar: Option<HtmlElement>,
        orientation: Option<HtmlElement>,
        failure: Option<HtmlElement>,
        fullscreen: Option<HtmlButtonElement>,
    }

    fn lookup<T: JsCast>(document: &Document, id: &str) -> Option<T> {
        if id.is_empty() {
            return None;
        }
        let element = document.get_element_by_id(id)?.dyn_into::<T>().ok();
        if element.is_none() {
            log::warn!("overlay element `#{id}` missing or of unexpected type");
        }
        element
    }

    impl OverlayView {
        /// Look up every element named in the surface config.
        pub fn from_document(document: &Document, surface: &SurfaceConfig) -> Self {
            Self {
                surface: lookup(document, &surface.element_id),
                loading: lookup(document, &surface.loading_overlay_id),
                percent: lookup(document, &surface.progress_label_id),
                bar: lookup(document, &surface.progress_bar_id),
                orientation: lookup(document, &surface.orientation_overlay_id),
                failure: lookup(document, &surface.failure_overlay_id),
                fullscreen: lookup(document, &surface.fullscreen_button_id),
            }
        }

        /// The fullscreen button, if present.
        pub fn fullscreen_button(&self) -> Option<&HtmlButtonElement> {
            self.fullscreen.as_ref()
        }

        /// Apply a plan to the document.
        pub fn apply(&self, plan: &OverlayPlan) {
            if let Some(el) = &self.loading {
                el.set_hidden(!plan.loading_visible);
            }
            if let Some(el) = &self.orientation {
                el.set_hidden(!plan.orientation_visible);
            }
            if let Some(el) = &self.failure {
                el.set_hidden(!plan.failure_visible);
            }
            if let (Some(el), Some(text)) = (&self.percent, &plan.percent_label) {
                el.set_text_content(Some(text));
            }
            if let (Some(el), Some(width)) = (&self.bar, &plan.bar_width) {
                let _ = el.style().set_property("width", width);
            }
            if let Some(button) = &self.fullscreen {
                button.set_disabled(!plan.fullscreen_enabled);
                button.set_hidden(!plan.fullscreen_enabled);
            }
            if let Some(surface) = &self.surface {
                let _ = surface.set_attribute("data-overlay", plan.overlay_name);
            }
        }
    }
}
